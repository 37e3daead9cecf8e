//! Board wiring constants and clock glue

use doorward_drivers::sensor::EchoClock;
use embassy_time::Instant;

/// PWM clock divider for the servo slice (125 MHz / 64)
pub const SERVO_PWM_DIVIDER: u8 = 64;

/// PWM wrap value giving a 20 ms servo frame at the divided clock
pub const SERVO_PWM_TOP: u16 = 39_062;

/// Echo timing from the Embassy uptime clock
pub struct UptimeClock;

impl EchoClock for UptimeClock {
    fn micros(&mut self) -> u64 {
        Instant::now().as_micros()
    }
}
