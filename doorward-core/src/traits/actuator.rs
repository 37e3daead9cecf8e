//! Latch and indicator output traits

use crate::indicator::IndicatorLevel;
use crate::lock::LockPosition;

/// Errors that can occur when driving an output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ActuatorError {
    /// PWM duty update failed
    Pwm,
}

/// Trait for the door latch actuator
pub trait LockActuator {
    /// Move the latch
    fn set_position(&mut self, position: LockPosition) -> Result<(), ActuatorError>;

    /// Last commanded position
    fn position(&self) -> LockPosition;
}

/// Trait for the status indicator output
pub trait IndicatorOutput {
    /// Show a level
    fn set_level(&mut self, level: IndicatorLevel) -> Result<(), ActuatorError>;

    /// Level currently shown
    fn level(&self) -> IndicatorLevel;
}
