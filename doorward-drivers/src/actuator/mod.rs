//! Door latch actuators

pub mod servo;

pub use servo::{ServoConfig, ServoLock};
