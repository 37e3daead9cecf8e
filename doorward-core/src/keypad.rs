//! Keypad key model
//!
//! The lock uses a 4×4 membrane keypad. Only two keys carry meaning for
//! the access controller: `*` confirms the typed code and `D` starts a
//! code change. Everything else, `#` included, is an ordinary code symbol.

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Number of keypad rows
pub const ROWS: usize = 4;

/// Number of keypad columns
pub const COLS: usize = 4;

/// Key layout of the 4×4 matrix, indexed `[row][col]`
pub const KEYMAP: [[char; COLS]; ROWS] = [
    ['1', '2', '3', 'A'],
    ['4', '5', '6', 'B'],
    ['7', '8', '9', 'C'],
    ['*', '0', '#', 'D'],
];

/// A single keypad key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Key(char);

impl Key {
    /// Confirms the code typed so far
    pub const CONFIRM: Key = Key('*');

    /// Enters code change mode (only from normal entry)
    pub const CHANGE_CODE: Key = Key('D');

    /// Create a key from its character
    ///
    /// Returns `None` for characters that are not on the keypad.
    pub const fn new(c: char) -> Option<Self> {
        if Self::is_keypad_char(c) {
            Some(Key(c))
        } else {
            None
        }
    }

    /// Look up the key at a matrix position
    pub fn at(row: usize, col: usize) -> Option<Self> {
        KEYMAP
            .get(row)
            .and_then(|r| r.get(col))
            .map(|&c| Key(c))
    }

    /// Check whether a character exists on the keypad
    pub const fn is_keypad_char(c: char) -> bool {
        matches!(c, '0'..='9' | 'A'..='D' | '*' | '#')
    }

    /// The key's character
    pub const fn as_char(self) -> char {
        self.0
    }

    /// Check if this is the confirm key
    pub fn is_confirm(self) -> bool {
        self == Self::CONFIRM
    }

    /// Check if this is the change-code key
    pub fn is_change_code(self) -> bool {
        self == Self::CHANGE_CODE
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<char> for Key {
    type Error = char;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        Key::new(c).ok_or(c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_keymap_entry_is_a_key() {
        for (r, row) in KEYMAP.iter().enumerate() {
            for (c, &ch) in row.iter().enumerate() {
                assert_eq!(Key::at(r, c), Key::new(ch));
                assert!(Key::new(ch).is_some());
            }
        }
    }

    #[test]
    fn test_rejects_non_keypad_chars() {
        assert!(Key::new('E').is_none());
        assert!(Key::new('a').is_none());
        assert!(Key::new(' ').is_none());
        assert_eq!(Key::try_from('x'), Err('x'));
    }

    #[test]
    fn test_special_keys() {
        assert!(Key::CONFIRM.is_confirm());
        assert!(Key::CHANGE_CODE.is_change_code());
        // '#' has no special meaning
        let hash = Key::new('#').unwrap();
        assert!(!hash.is_confirm());
        assert!(!hash.is_change_code());
    }

    #[test]
    fn test_out_of_range_position() {
        assert!(Key::at(4, 0).is_none());
        assert!(Key::at(0, 4).is_none());
        assert_eq!(Key::at(3, 0), Some(Key::CONFIRM));
        assert_eq!(Key::at(3, 3), Some(Key::CHANGE_CODE));
    }
}
