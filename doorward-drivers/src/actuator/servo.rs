//! Hobby servo door latch
//!
//! Drives a standard 50 Hz hobby servo (SG90 class) whose pulse width
//! maps linearly onto 0-180°. The PWM channel must already run at the
//! servo frame rate; this driver only sets the duty cycle.

use doorward_core::config::MAX_ANGLE;
use doorward_core::lock::LockPosition;
use doorward_core::traits::{ActuatorError, LockActuator};
use embedded_hal::pwm::SetDutyCycle;

/// Servo timing and latch angles
#[derive(Debug, Clone)]
pub struct ServoConfig {
    /// Pulse width at 0° (µs)
    pub min_pulse_us: u16,
    /// Pulse width at 180° (µs)
    pub max_pulse_us: u16,
    /// PWM frame period (µs)
    pub period_us: u16,
    /// Angle when unlocked (degrees)
    pub open_angle: u8,
    /// Angle when locked (degrees)
    pub closed_angle: u8,
}

impl Default for ServoConfig {
    fn default() -> Self {
        Self {
            min_pulse_us: 500,
            max_pulse_us: 2500,
            period_us: 20_000,
            open_angle: 90,
            closed_angle: 0,
        }
    }
}

impl ServoConfig {
    /// Pulse width for an angle, clamped to 180°
    pub fn pulse_us(&self, angle: u8) -> u16 {
        let angle = angle.min(MAX_ANGLE) as u32;
        let span = self.max_pulse_us.saturating_sub(self.min_pulse_us) as u32;
        self.min_pulse_us + (span * angle / MAX_ANGLE as u32) as u16
    }

    /// Angle for a latch position
    pub fn angle(&self, position: LockPosition) -> u8 {
        match position {
            LockPosition::Open => self.open_angle,
            LockPosition::Closed => self.closed_angle,
        }
    }
}

/// Servo-driven latch
pub struct ServoLock<P> {
    pwm: P,
    config: ServoConfig,
    position: LockPosition,
}

impl<P: SetDutyCycle> ServoLock<P> {
    /// Wrap a PWM channel
    ///
    /// The output is not touched until the first `set_position`.
    pub fn new(pwm: P, config: ServoConfig) -> Self {
        Self {
            pwm,
            config,
            position: LockPosition::Closed,
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &ServoConfig {
        &self.config
    }
}

impl<P: SetDutyCycle> LockActuator for ServoLock<P> {
    fn set_position(&mut self, position: LockPosition) -> Result<(), ActuatorError> {
        let pulse = self.config.pulse_us(self.config.angle(position));
        self.pwm
            .set_duty_cycle_fraction(pulse, self.config.period_us)
            .map_err(|_| ActuatorError::Pwm)?;
        self.position = position;
        Ok(())
    }

    fn position(&self) -> LockPosition {
        self.position
    }
}
