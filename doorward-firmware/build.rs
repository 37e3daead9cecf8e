//! Build script for doorward-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates access.toml at compile time

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::PathBuf;

/// Characters present on the 4×4 keypad
const KEYPAD_CHARS: &str = "0123456789ABCD*#";

/// Keys with a control meaning, not allowed in the initial code
const RESERVED_KEYS: &str = "*D";

/// Longest code the input buffer can hold
const MAX_CODE_LEN: usize = 32;

fn main() {
    setup_linker();
    validate_config();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tlink-rp.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");

    // Re-run if memory.x changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate access.toml configuration at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=access.toml");

    let content = fs::read_to_string("access.toml")
        .unwrap_or_else(|e| fail(&[format!("cannot read access.toml: {}", e)]));

    let config: toml::Value = toml::from_str(&content)
        .unwrap_or_else(|e| fail(&[format!("access.toml is not valid TOML: {}", e)]));

    let mut errors = Vec::new();
    validate_layout(&config, &mut errors);
    validate_access(&config, &mut errors);
    validate_presence(&config, &mut errors);
    validate_lock(&config, &mut errors);
    validate_indicator(&config, &mut errors);
    validate_intervals(&config, &mut errors);

    if !errors.is_empty() {
        fail(&errors);
    }

    println!("cargo:warning=access.toml validated successfully");
}

/// Abort the build with one line per problem
fn fail(errors: &[String]) -> ! {
    let lines: Vec<String> = errors.iter().map(|e| format!("  - {}", e)).collect();
    panic!("\ninvalid access.toml:\n{}\n", lines.join("\n"));
}

/// Sections and the keys each one accepts
const LAYOUT: &[(&str, &[&str])] = &[
    ("access", &["initial_code"]),
    ("presence", &["threshold_cm", "echo_timeout_us"]),
    ("lock", &["open_angle", "closed_angle", "hold_ms"]),
    ("indicator", &["off", "dim", "bright"]),
    ("keypad", &["debounce_ms"]),
    ("loop", &["interval_ms"]),
];

/// Reject unknown sections and keys (the firmware parser would too)
fn validate_layout(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(root) = config.as_table() else {
        return;
    };

    for (name, section) in root {
        let Some(keys) = LAYOUT.iter().find(|(s, _)| *s == name.as_str()).map(|(_, k)| *k) else {
            errors.push(format!("unknown section [{}]", name));
            continue;
        };

        let Some(table) = section.as_table() else {
            errors.push(format!("[{}] must be a table", name));
            continue;
        };

        for key in table.keys() {
            if !keys.contains(&key.as_str()) {
                errors.push(format!("[{}] unknown key '{}'", name, key));
            }
        }
    }
}

/// Integer value of `section.key`, if present
fn get_int(config: &toml::Value, section: &str, key: &str, errors: &mut Vec<String>) -> Option<i64> {
    match config.get(section)?.get(key)? {
        toml::Value::Integer(v) => Some(*v),
        _ => {
            errors.push(format!("[{}] {} must be an integer", section, key));
            None
        }
    }
}

fn check_range(
    config: &toml::Value,
    section: &str,
    key: &str,
    range: std::ops::RangeInclusive<i64>,
    errors: &mut Vec<String>,
) -> Option<i64> {
    let value = get_int(config, section, key, errors)?;
    if !range.contains(&value) {
        errors.push(format!(
            "[{}] {} must be {}-{}",
            section,
            key,
            range.start(),
            range.end()
        ));
        return None;
    }
    Some(value)
}

fn validate_access(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(value) = config.get("access").and_then(|a| a.get("initial_code")) else {
        return;
    };

    let Some(code) = value.as_str() else {
        errors.push("[access] initial_code must be a string".to_string());
        return;
    };

    if code.is_empty() {
        errors.push("[access] initial_code cannot be empty".to_string());
    }
    if code.chars().count() > MAX_CODE_LEN {
        errors.push(format!(
            "[access] initial_code longer than {} keys",
            MAX_CODE_LEN
        ));
    }
    for c in code.chars() {
        if !KEYPAD_CHARS.contains(c) {
            errors.push(format!("[access] initial_code has non-keypad '{}'", c));
        } else if RESERVED_KEYS.contains(c) {
            errors.push(format!("[access] initial_code cannot contain '{}'", c));
        }
    }
}

fn validate_presence(config: &toml::Value, errors: &mut Vec<String>) {
    check_range(config, "presence", "threshold_cm", 1..=u16::MAX as i64, errors);
    check_range(config, "presence", "echo_timeout_us", 1..=u32::MAX as i64, errors);
}

fn validate_lock(config: &toml::Value, errors: &mut Vec<String>) {
    let open = check_range(config, "lock", "open_angle", 0..=180, errors).unwrap_or(90);
    let closed = check_range(config, "lock", "closed_angle", 0..=180, errors).unwrap_or(0);
    if open == closed {
        errors.push("[lock] open_angle and closed_angle must differ".to_string());
    }
    check_range(config, "lock", "hold_ms", 0..=u32::MAX as i64, errors);
}

fn validate_indicator(config: &toml::Value, errors: &mut Vec<String>) {
    let off = check_range(config, "indicator", "off", 0..=255, errors).unwrap_or(0);
    let dim = check_range(config, "indicator", "dim", 0..=255, errors).unwrap_or(50);
    let bright = check_range(config, "indicator", "bright", 0..=255, errors).unwrap_or(255);
    if !(off < dim && dim < bright) {
        errors.push("[indicator] levels must satisfy off < dim < bright".to_string());
    }
}

fn validate_intervals(config: &toml::Value, errors: &mut Vec<String>) {
    check_range(config, "keypad", "debounce_ms", 1..=u32::MAX as i64, errors);
    check_range(config, "loop", "interval_ms", 1..=u32::MAX as i64, errors);
}
