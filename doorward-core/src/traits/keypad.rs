//! Keypad trait

use crate::keypad::Key;

/// Errors that can occur while scanning the keypad
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum KeypadError {
    /// GPIO access failed
    Pin,
}

/// Trait for key matrix readers
pub trait Keypad {
    /// Poll for a new key press
    ///
    /// Returns each press once; holding a key does not repeat it.
    /// `now_ms` is the loop clock, used for debouncing.
    fn poll(&mut self, now_ms: u32) -> Result<Option<Key>, KeypadError>;

    /// Forget any key state from earlier polls
    ///
    /// Called when polling stops, so the next press after a gap is
    /// always reported.
    fn reset(&mut self) {}
}
