//! PWM-dimmed status LED

use doorward_core::indicator::{IndicatorLevel, IndicatorLevels, LEVEL_MAX};
use doorward_core::traits::{ActuatorError, IndicatorOutput};
use embedded_hal::pwm::SetDutyCycle;

/// LED on a PWM channel, brightness on a 0-255 scale
pub struct PwmIndicator<P> {
    pwm: P,
    levels: IndicatorLevels,
    /// Level last written, `None` before the first write
    level: Option<IndicatorLevel>,
}

impl<P: SetDutyCycle> PwmIndicator<P> {
    pub fn new(pwm: P, levels: IndicatorLevels) -> Self {
        Self {
            pwm,
            levels,
            level: None,
        }
    }
}

impl<P: SetDutyCycle> IndicatorOutput for PwmIndicator<P> {
    fn set_level(&mut self, level: IndicatorLevel) -> Result<(), ActuatorError> {
        if self.level == Some(level) {
            return Ok(());
        }

        let value = self.levels.intensity(level);
        self.pwm
            .set_duty_cycle_fraction(value as u16, LEVEL_MAX as u16)
            .map_err(|_| ActuatorError::Pwm)?;
        self.level = Some(level);
        Ok(())
    }

    fn level(&self) -> IndicatorLevel {
        self.level.unwrap_or_default()
    }
}
