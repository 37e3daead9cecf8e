//! Simple TOML parser for the access configuration
//!
//! This is a minimal line-oriented parser that handles only the subset
//! needed for `access.toml`. It does NOT support full TOML syntax.
//!
//! Supported features:
//! - Key = value pairs (string, integer)
//! - [section] headers
//! - Comments (# ...), including after values
//! - Underscore digit separators (30_000)
//!
//! Missing keys keep their default value. The result is validated
//! before it is returned.

use heapless::String;

use super::types::{AccessConfig, ConfigError};

/// Parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Unknown or malformed section header
    InvalidSection,
    /// Key not valid in its section
    UnknownKey,
    /// Line is not `key = value`, or value has the wrong type
    InvalidValue,
    /// Parsed values failed validation
    Invalid(ConfigError),
}

impl From<ConfigError> for ParseError {
    fn from(e: ConfigError) -> Self {
        ParseError::Invalid(e)
    }
}

/// Current parsing context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Access,
    Presence,
    Lock,
    Indicator,
    Keypad,
    Loop,
}

/// Parse TOML text into a validated configuration
pub fn parse_config(input: &str) -> Result<AccessConfig, ParseError> {
    let mut config = AccessConfig::default();
    let mut section = Section::Root;

    for line in input.lines() {
        let line = line.trim();

        // Skip empty lines and comments
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if line.starts_with('[') {
            let header = strip_comment(line);
            if !header.ends_with(']') {
                return Err(ParseError::InvalidSection);
            }
            section = parse_section_header(&header[1..header.len() - 1])?;
            continue;
        }

        let (key, value) = parse_key_value(line).ok_or(ParseError::InvalidValue)?;
        apply_value(section, key, value, &mut config)?;
    }

    config.validate()?;
    Ok(config)
}

fn parse_section_header(header: &str) -> Result<Section, ParseError> {
    match header.trim() {
        "access" => Ok(Section::Access),
        "presence" => Ok(Section::Presence),
        "lock" => Ok(Section::Lock),
        "indicator" => Ok(Section::Indicator),
        "keypad" => Ok(Section::Keypad),
        "loop" => Ok(Section::Loop),
        _ => Err(ParseError::InvalidSection),
    }
}

fn apply_value(
    section: Section,
    key: &str,
    value: &str,
    config: &mut AccessConfig,
) -> Result<(), ParseError> {
    match (section, key) {
        (Section::Access, "initial_code") => {
            config.set_initial_code(parse_string(value)?)?;
        }

        (Section::Presence, "threshold_cm") => config.presence_threshold_cm = parse_int(value)?,
        (Section::Presence, "echo_timeout_us") => config.echo_timeout_us = parse_int(value)?,

        (Section::Lock, "open_angle") => config.open_angle = parse_int(value)?,
        (Section::Lock, "closed_angle") => config.closed_angle = parse_int(value)?,
        (Section::Lock, "hold_ms") => config.unlock_hold_ms = parse_int(value)?,

        (Section::Indicator, "off") => config.indicator.off = parse_int(value)?,
        (Section::Indicator, "dim") => config.indicator.dim = parse_int(value)?,
        (Section::Indicator, "bright") => config.indicator.bright = parse_int(value)?,

        (Section::Keypad, "debounce_ms") => config.keypad_debounce_ms = parse_int(value)?,

        (Section::Loop, "interval_ms") => config.loop_interval_ms = parse_int(value)?,

        _ => return Err(ParseError::UnknownKey),
    }
    Ok(())
}

/// Remove a trailing comment that is not inside a string
fn strip_comment(text: &str) -> &str {
    let mut in_string = false;
    for (i, c) in text.char_indices() {
        match c {
            '"' => in_string = !in_string,
            '#' if !in_string => return text[..i].trim(),
            _ => {}
        }
    }
    text.trim()
}

fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let eq_pos = line.find('=')?;
    let key = line[..eq_pos].trim();
    let value = strip_comment(&line[eq_pos + 1..]);

    if key.is_empty() || value.is_empty() {
        return None;
    }

    Some((key, value))
}

/// Parse a quoted string value
fn parse_string(value: &str) -> Result<&str, ParseError> {
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        Ok(&value[1..value.len() - 1])
    } else {
        Err(ParseError::InvalidValue)
    }
}

/// Parse an integer value, allowing `_` separators
fn parse_int<T: core::str::FromStr>(value: &str) -> Result<T, ParseError> {
    let mut digits: String<16> = String::new();
    for c in value.chars().filter(|&c| c != '_') {
        digits.push(c).map_err(|_| ParseError::InvalidValue)?;
    }
    digits.parse().map_err(|_| ParseError::InvalidValue)
}
