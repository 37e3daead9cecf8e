//! Presence detection
//!
//! Converts ultrasonic echo times into distance and tracks whether
//! someone stands in front of the door.

use crate::access::Event;
use crate::traits::SensorError;

/// Default presence threshold (cm)
pub const DEFAULT_THRESHOLD_CM: u16 = 20;

/// Convert an echo round-trip time to distance in whole centimetres
///
/// Sound travels 0.034 cm/µs and the echo covers the distance twice,
/// so `cm = µs × 0.017`, truncated.
pub fn echo_to_distance_cm(echo_us: u32) -> u32 {
    (echo_us as u64 * 17 / 1000) as u32
}

/// Tracks the presence flag across measurement cycles
#[derive(Debug, Clone)]
pub struct PresenceDetector {
    threshold_cm: u16,
    present: bool,
    /// Distance from the last good reading
    last_distance_cm: Option<u32>,
}

impl PresenceDetector {
    /// Create a detector; nobody is present initially
    pub fn new(threshold_cm: u16) -> Self {
        Self {
            threshold_cm,
            present: false,
            last_distance_cm: None,
        }
    }

    /// Current presence flag
    pub fn is_present(&self) -> bool {
        self.present
    }

    /// Distance from the last good reading
    pub fn last_distance_cm(&self) -> Option<u32> {
        self.last_distance_cm
    }

    /// Configured threshold
    pub fn threshold_cm(&self) -> u16 {
        self.threshold_cm
    }

    /// Feed one echo measurement
    ///
    /// Failed or zero-length readings count as "nobody nearby". Returns an
    /// event only when the presence flag changes.
    pub fn update(&mut self, reading: Result<u32, SensorError>) -> Option<Event> {
        let distance = match reading {
            Ok(echo_us) if echo_us > 0 => Some(echo_to_distance_cm(echo_us)),
            _ => None,
        };
        self.last_distance_cm = distance;

        let present = distance.is_some_and(|cm| cm <= self.threshold_cm as u32);
        if present == self.present {
            return None;
        }

        self.present = present;
        Some(if present {
            Event::PresenceDetected
        } else {
            Event::PresenceLost
        })
    }
}

impl Default for PresenceDetector {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD_CM)
    }
}
