//! Hardware abstraction traits
//!
//! These traits define the interface between the access logic
//! and board-specific peripheral drivers.

pub mod actuator;
pub mod keypad;
pub mod sensor;

pub use actuator::{ActuatorError, IndicatorOutput, LockActuator};
pub use keypad::{Keypad, KeypadError};
pub use sensor::{DistanceSensor, SensorError};
