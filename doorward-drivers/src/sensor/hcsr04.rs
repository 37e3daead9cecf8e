//! HC-SR04 ultrasonic distance sensor
//!
//! The sensor is started with a 10 µs HIGH pulse on TRIG. It then raises
//! ECHO for as long as the sound takes to come back, so the width of the
//! ECHO pulse is the round-trip time.
//!
//! Both waits (for the rising edge, then for the falling edge) are bounded
//! by the configured timeout. The measurement busy-waits; at the default
//! 30 ms timeout one call takes at most ~60 ms.

use doorward_core::traits::{DistanceSensor, SensorError};
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};

/// Default limit for each wait phase (µs)
pub const DEFAULT_TIMEOUT_US: u32 = 30_000;

/// Free-running microsecond clock used to time the echo pulse
pub trait EchoClock {
    /// Current time in microseconds
    fn micros(&mut self) -> u64;
}

/// HC-SR04 driver
pub struct Hcsr04<T, E, D, C> {
    trig: T,
    echo: E,
    delay: D,
    clock: C,
    timeout_us: u32,
}

impl<T, E, D, C> Hcsr04<T, E, D, C>
where
    T: OutputPin,
    E: InputPin,
    D: DelayNs,
    C: EchoClock,
{
    /// Create a new driver
    ///
    /// `timeout_us` bounds both the wait for the echo to start and the
    /// echo pulse itself.
    pub fn new(trig: T, echo: E, delay: D, clock: C, timeout_us: u32) -> Self {
        Self {
            trig,
            echo,
            delay,
            clock,
            timeout_us,
        }
    }

    /// Configured timeout
    pub fn timeout_us(&self) -> u32 {
        self.timeout_us
    }

    fn trigger(&mut self) -> Result<(), SensorError> {
        self.trig.set_low().map_err(|_| SensorError::Pin)?;
        self.delay.delay_us(2);
        self.trig.set_high().map_err(|_| SensorError::Pin)?;
        self.delay.delay_us(10);
        self.trig.set_low().map_err(|_| SensorError::Pin)
    }

    fn elapsed_since(&mut self, start: u64) -> u64 {
        self.clock.micros().wrapping_sub(start)
    }
}

impl<T, E, D, C> DistanceSensor for Hcsr04<T, E, D, C>
where
    T: OutputPin,
    E: InputPin,
    D: DelayNs,
    C: EchoClock,
{
    fn measure_echo_us(&mut self) -> Result<u32, SensorError> {
        // A pulse from a previous measurement would corrupt this one
        if self.echo.is_high().map_err(|_| SensorError::Pin)? {
            return Err(SensorError::EchoStuck);
        }

        self.trigger()?;
        let timeout = self.timeout_us as u64;

        let start = self.clock.micros();
        while self.echo.is_low().map_err(|_| SensorError::Pin)? {
            if self.elapsed_since(start) > timeout {
                return Err(SensorError::NoEcho);
            }
        }

        let rise = self.clock.micros();
        let width = loop {
            let elapsed = self.elapsed_since(rise);
            if self.echo.is_low().map_err(|_| SensorError::Pin)? {
                break elapsed;
            }
            if elapsed > timeout {
                return Err(SensorError::OutOfRange);
            }
        };

        if width == 0 {
            return Err(SensorError::OutOfRange);
        }

        Ok(width as u32)
    }
}
