//! Distance sensor implementations

pub mod hcsr04;

pub use hcsr04::{EchoClock, Hcsr04};
