//! Access codes
//!
//! Both the stored code and the input buffer are fixed-capacity strings
//! of keypad characters.

use heapless::String;

use crate::config::ConfigError;
use crate::keypad::Key;

/// Maximum number of keys in a code or in the input buffer
pub const MAX_CODE_LEN: usize = 32;

/// A sequence of keypad characters
pub type Code = String<MAX_CODE_LEN>;

/// Build a code from text, checking that every character is a usable code key
///
/// `*` can never be part of a code since it confirms entry. `D` is
/// refused as well: typing it during normal entry starts a code change,
/// so a code containing it could never be entered.
pub fn parse_code(text: &str) -> Result<Code, ConfigError> {
    if text.is_empty() {
        return Err(ConfigError::EmptyCode);
    }

    let mut code = Code::new();
    for c in text.chars() {
        let key = Key::new(c).ok_or(ConfigError::InvalidKey(c))?;
        if key.is_confirm() || key.is_change_code() {
            return Err(ConfigError::ReservedKey(c));
        }
        code.push(c).map_err(|_| ConfigError::CodeTooLong)?;
    }

    Ok(code)
}

/// Compare two codes in time independent of the first mismatch position
pub fn codes_match(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.bytes()
        .zip(b.bytes())
        .fold(0u8, |diff, (x, y)| diff | (x ^ y))
        == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_default_code() {
        let code = parse_code("123A").unwrap();
        assert_eq!(code.as_str(), "123A");
    }

    #[test]
    fn test_parse_rejects_bad_codes() {
        assert_eq!(parse_code(""), Err(ConfigError::EmptyCode));
        assert_eq!(parse_code("12E4"), Err(ConfigError::InvalidKey('E')));
        assert_eq!(parse_code("12*4"), Err(ConfigError::ReservedKey('*')));
        assert_eq!(parse_code("D123"), Err(ConfigError::ReservedKey('D')));
        assert_eq!(
            parse_code("123456789012345678901234567890123"),
            Err(ConfigError::CodeTooLong)
        );
    }

    #[test]
    fn test_hash_is_allowed() {
        assert!(parse_code("#1#2").is_ok());
    }

    #[test]
    fn test_codes_match() {
        assert!(codes_match("123A", "123A"));
        assert!(!codes_match("123A", "123B"));
        assert!(!codes_match("123A", "123"));
        assert!(!codes_match("", "1"));
        assert!(codes_match("", ""));
    }
}
