//! Distance sensor trait

/// Errors that can occur while measuring distance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorError {
    /// No echo pulse started before the timeout (nothing in range)
    NoEcho,
    /// Echo line was already high before the trigger
    EchoStuck,
    /// Echo pulse empty or longer than the timeout (nothing in range)
    OutOfRange,
    /// GPIO access failed
    Pin,
}

/// Trait for ultrasonic distance sensors
///
/// Implementations fire one measurement and report the echo round-trip
/// time; conversion to distance happens in [`crate::presence`].
pub trait DistanceSensor {
    /// Trigger a measurement and return the echo duration in microseconds
    fn measure_echo_us(&mut self) -> Result<u32, SensorError>;
}
