//! Configuration type definitions
//!
//! Tunables for the access loop. Defaults reproduce the stock lock:
//! code `123A`, 20 cm presence range, 90° latch swing held for 5 s.

use crate::access::{parse_code, Code};
use crate::indicator::IndicatorLevels;
use crate::lock::DEFAULT_HOLD_MS;
use crate::presence::DEFAULT_THRESHOLD_CM;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Factory unlock code
pub const DEFAULT_CODE: &str = "123A";

/// Maximum servo angle (degrees)
pub const MAX_ANGLE: u8 = 180;

/// Configuration validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Code has no keys
    EmptyCode,
    /// Code longer than the input buffer
    CodeTooLong,
    /// Character not on the keypad
    InvalidKey(char),
    /// Key with a control meaning (`*`, `D`)
    ReservedKey(char),
    /// Presence threshold of zero would never detect anyone
    ZeroThreshold,
    /// Servo angle above 180°
    AngleOutOfRange,
    /// Open and closed angles are equal
    SameAngles,
    /// Indicator levels not strictly increasing
    LevelsNotOrdered,
    /// Loop interval, debounce or echo timeout of zero
    ZeroInterval,
}

/// Access loop configuration
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AccessConfig {
    /// Code valid after power-on
    pub initial_code: Code,
    /// Presence range (cm, inclusive)
    pub presence_threshold_cm: u16,
    /// Echo wait limit per measurement phase (µs)
    pub echo_timeout_us: u32,
    /// Latch open time (ms)
    pub unlock_hold_ms: u32,
    /// Servo angle when unlocked (degrees)
    pub open_angle: u8,
    /// Servo angle when locked (degrees)
    pub closed_angle: u8,
    /// Indicator intensities
    pub indicator: IndicatorLevels,
    /// Minimum time between keypad scans (ms)
    pub keypad_debounce_ms: u32,
    /// Access loop period (ms)
    pub loop_interval_ms: u32,
}

impl Default for AccessConfig {
    fn default() -> Self {
        let mut initial_code = Code::new();
        let _ = initial_code.push_str(DEFAULT_CODE);

        Self {
            initial_code,
            presence_threshold_cm: DEFAULT_THRESHOLD_CM,
            echo_timeout_us: 30_000,
            unlock_hold_ms: DEFAULT_HOLD_MS,
            open_angle: 90,
            closed_angle: 0,
            indicator: IndicatorLevels::default(),
            keypad_debounce_ms: 10,
            loop_interval_ms: 10,
        }
    }
}

impl AccessConfig {
    /// Check every field
    pub fn validate(&self) -> Result<(), ConfigError> {
        parse_code(&self.initial_code)?;

        if self.presence_threshold_cm == 0 {
            return Err(ConfigError::ZeroThreshold);
        }
        if self.open_angle > MAX_ANGLE || self.closed_angle > MAX_ANGLE {
            return Err(ConfigError::AngleOutOfRange);
        }
        if self.open_angle == self.closed_angle {
            return Err(ConfigError::SameAngles);
        }
        if !self.indicator.is_ordered() {
            return Err(ConfigError::LevelsNotOrdered);
        }
        if self.loop_interval_ms == 0 || self.keypad_debounce_ms == 0 || self.echo_timeout_us == 0
        {
            return Err(ConfigError::ZeroInterval);
        }

        Ok(())
    }

    /// Replace the initial code, validating it
    pub fn set_initial_code(&mut self, text: &str) -> Result<(), ConfigError> {
        self.initial_code = parse_code(text)?;
        Ok(())
    }
}
