//! Access loop task
//!
//! Runs one `AccessSystem::step` per loop interval. The ultrasonic
//! measurement busy-waits for the echo, so a cycle can overrun the
//! interval; the `Ticker` then fires back to back until it has caught up.

use defmt::*;
use embassy_rp::gpio::{Input, Output};
use embassy_rp::pwm::PwmOutput;
use embassy_time::{Delay, Duration, Instant, Ticker};

use doorward_core::access::Notice;
use doorward_core::system::AccessSystem;
use doorward_drivers::actuator::ServoLock;
use doorward_drivers::indicator::PwmIndicator;
use doorward_drivers::keypad::MatrixKeypad;
use doorward_drivers::sensor::Hcsr04;

use crate::board::UptimeClock;
use crate::channels::DIAG_CHANNEL;

/// The access loop wired to RP2040 peripherals
pub type FirmwareSystem = AccessSystem<
    Hcsr04<Output<'static>, Input<'static>, Delay, UptimeClock>,
    MatrixKeypad<Output<'static>, Input<'static>, 4, 4>,
    ServoLock<PwmOutput<'static>>,
    PwmIndicator<PwmOutput<'static>>,
>;

/// Access task - owns all access state and peripherals
#[embassy_executor::task]
pub async fn access_task(mut system: FirmwareSystem, interval_ms: u32) {
    info!("Access task started");

    for notice in system.start() {
        report(notice);
    }

    let mut ticker = Ticker::every(Duration::from_millis(interval_ms as u64));
    let start = Instant::now();

    loop {
        ticker.next().await;

        // Wraps after ~49 days; the unlock timer uses wrapping arithmetic
        let now_ms = start.elapsed().as_millis() as u32;

        for notice in system.step(now_ms) {
            report(notice);
        }

        trace!(
            "mode={:?} distance={:?}",
            system.controller().mode(),
            system.presence().last_distance_cm()
        );
    }
}

/// Log a notice and queue it for the diagnostic UART
fn report(notice: Notice) {
    match &notice {
        Notice::InputUpdated(input) => debug!("Input: {}", input.as_str()),
        n if n.is_fault() => warn!("{:?}", n),
        n => info!("{:?}", n),
    }

    if DIAG_CHANNEL.try_send(notice).is_err() {
        trace!("Diagnostic channel full, line dropped");
    }
}
