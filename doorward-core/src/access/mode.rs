//! Access mode definition
//!
//! The indicator and the meaning of every key are a function of the
//! current mode. Transitions are explicit, finite, and deterministic.

use crate::indicator::IndicatorLevel;

/// Access controller modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    /// Nobody in front of the door; keypad is ignored
    #[default]
    Idle,
    /// Normal code entry
    Entry,
    /// Code change requested, waiting for the current code
    VerifyOld,
    /// Current code confirmed, waiting for the replacement code
    EnterNew,
}

/// Internal triggers that move the mode
///
/// Produced by the controller after it has interpreted a key or a
/// presence change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Trigger {
    /// Someone stepped in front of the sensor
    PresenceDetected,
    /// Nobody is in front of the sensor anymore
    PresenceLost,
    /// Change-code key pressed
    ChangeCode,
    /// Confirmed input matched the stored code
    CodeMatched,
    /// Confirmed input did not match the stored code
    CodeMismatched,
    /// Replacement code was stored
    NewCodeStored,
    /// Replacement code was refused (empty)
    NewCodeRefused,
}

impl Mode {
    /// Check if someone is present in this mode
    pub fn is_present(&self) -> bool {
        !matches!(self, Mode::Idle)
    }

    /// Check if a code change is in progress
    pub fn is_changing_code(&self) -> bool {
        matches!(self, Mode::VerifyOld | Mode::EnterNew)
    }

    /// Indicator level for this mode
    pub fn indicator(&self) -> IndicatorLevel {
        match self {
            Mode::Idle => IndicatorLevel::Off,
            Mode::Entry => IndicatorLevel::Dim,
            Mode::VerifyOld | Mode::EnterNew => IndicatorLevel::Bright,
        }
    }

    /// Process a trigger and return the next mode
    pub fn transition(self, trigger: Trigger) -> Self {
        use Mode::*;
        use Trigger::*;

        match (self, trigger) {
            // Presence loss wins from every mode
            (_, PresenceLost) => Idle,

            (Idle, PresenceDetected) => Entry,

            (Entry, ChangeCode) => VerifyOld,
            (Entry, CodeMatched) => Entry,
            (Entry, CodeMismatched) => Entry,

            (VerifyOld, CodeMatched) => EnterNew,
            (VerifyOld, CodeMismatched) => Entry,

            (EnterNew, NewCodeStored) => Entry,
            (EnterNew, NewCodeRefused) => Entry,

            // Default: stay in current mode
            _ => self,
        }
    }
}
