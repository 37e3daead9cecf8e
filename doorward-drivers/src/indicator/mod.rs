//! Status indicator outputs

pub mod pwm_led;

pub use pwm_led::PwmIndicator;
