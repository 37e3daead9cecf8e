//! Door latch sequencing
//!
//! An unlock swings the latch open, holds it for a fixed time, then
//! closes it again. The hold is tracked against the loop clock instead
//! of blocking, so the keypad and sensor keep running while the door is
//! open.
//!
//! ```ignore
//! let mut seq = UnlockSequence::new(5000);
//! if let Some(pos) = seq.request(now_ms) {
//!     lock.set_position(pos)?;
//! }
//!
//! // Every loop cycle:
//! if let Some(pos) = seq.update(now_ms) {
//!     if lock.set_position(pos).is_ok() {
//!         seq.confirm_closed();
//!     }
//! }
//! ```
//!
//! The sequence only counts as locked once the close has been confirmed,
//! so a failed close is retried on every following update.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default time the latch stays open (ms)
pub const DEFAULT_HOLD_MS: u32 = 5000;

/// Latch position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum LockPosition {
    #[default]
    Closed,
    Open,
}

/// Sequence state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LockState {
    #[default]
    Locked,
    /// Open since the given loop time (ms)
    Unlocked { since_ms: u32 },
}

/// Timed unlock sequence
#[derive(Debug, Clone)]
pub struct UnlockSequence {
    hold_ms: u32,
    state: LockState,
}

impl UnlockSequence {
    /// Create a sequence with the given hold time
    pub fn new(hold_ms: u32) -> Self {
        Self {
            hold_ms,
            state: LockState::Locked,
        }
    }

    /// Current state
    pub fn state(&self) -> LockState {
        self.state
    }

    /// Position the latch should currently be in
    pub fn position(&self) -> LockPosition {
        match self.state {
            LockState::Locked => LockPosition::Closed,
            LockState::Unlocked { .. } => LockPosition::Open,
        }
    }

    /// Check if the latch is open
    pub fn is_unlocked(&self) -> bool {
        matches!(self.state, LockState::Unlocked { .. })
    }

    /// Start (or restart) the hold
    ///
    /// Returns the position to command, or `None` if the latch is already
    /// open; in that case the hold restarts from `now_ms`.
    pub fn request(&mut self, now_ms: u32) -> Option<LockPosition> {
        let was_locked = !self.is_unlocked();
        self.state = LockState::Unlocked { since_ms: now_ms };
        was_locked.then_some(LockPosition::Open)
    }

    /// Advance the sequence
    ///
    /// Returns `Closed` once the hold has elapsed, and keeps returning it
    /// until [`confirm_closed`](Self::confirm_closed) is called.
    pub fn update(&mut self, now_ms: u32) -> Option<LockPosition> {
        match self.state {
            LockState::Unlocked { since_ms } if now_ms.wrapping_sub(since_ms) >= self.hold_ms => {
                Some(LockPosition::Closed)
            }
            _ => None,
        }
    }

    /// Record that the latch has been closed
    pub fn confirm_closed(&mut self) {
        self.state = LockState::Locked;
    }

    /// Remaining hold time (ms), zero when locked
    pub fn remaining_ms(&self, now_ms: u32) -> u32 {
        match self.state {
            LockState::Locked => 0,
            LockState::Unlocked { since_ms } => {
                self.hold_ms.saturating_sub(now_ms.wrapping_sub(since_ms))
            }
        }
    }
}

impl Default for UnlockSequence {
    fn default() -> Self {
        Self::new(DEFAULT_HOLD_MS)
    }
}
