//! Status indicator levels
//!
//! The LED has no state of its own: off when nobody is present, dim
//! during normal entry, bright while a code change is in progress.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Full-scale indicator intensity
pub const LEVEL_MAX: u8 = 255;

/// Coarse indicator state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IndicatorLevel {
    #[default]
    Off,
    Dim,
    Bright,
}

/// Intensity for each indicator level, on a 0..=255 scale
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct IndicatorLevels {
    pub off: u8,
    pub dim: u8,
    pub bright: u8,
}

impl Default for IndicatorLevels {
    fn default() -> Self {
        Self {
            off: 0,
            dim: 50,
            bright: LEVEL_MAX,
        }
    }
}

impl IndicatorLevels {
    /// Intensity for a level
    pub fn intensity(&self, level: IndicatorLevel) -> u8 {
        match level {
            IndicatorLevel::Off => self.off,
            IndicatorLevel::Dim => self.dim,
            IndicatorLevel::Bright => self.bright,
        }
    }

    /// Check that the levels are strictly increasing
    pub fn is_ordered(&self) -> bool {
        self.off < self.dim && self.dim < self.bright
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_intensities() {
        let levels = IndicatorLevels::default();
        assert_eq!(levels.intensity(IndicatorLevel::Off), 0);
        assert_eq!(levels.intensity(IndicatorLevel::Dim), 50);
        assert_eq!(levels.intensity(IndicatorLevel::Bright), 255);
        assert!(levels.is_ordered());
    }

    #[test]
    fn test_unordered_levels() {
        let levels = IndicatorLevels {
            off: 0,
            dim: 200,
            bright: 100,
        };
        assert!(!levels.is_ordered());
    }
}
