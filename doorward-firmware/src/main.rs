//! Doorward - Keypad Door Lock Firmware
//!
//! Main firmware binary for RP2040-based boards. An HC-SR04 wakes the
//! keypad when someone is in front of the door, a matching code swings
//! the servo latch open, and every event is reported on UART0.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::peripherals::UART0;
use embassy_rp::pwm::{Config as PwmConfig, Pwm};
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use embassy_time::Delay;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use doorward_core::config::{parse_config, AccessConfig};
use doorward_core::system::AccessSystem;
use doorward_drivers::actuator::{ServoConfig, ServoLock};
use doorward_drivers::indicator::PwmIndicator;
use doorward_drivers::keypad::MatrixKeypad;
use doorward_drivers::sensor::Hcsr04;

mod board;
mod channels;
mod tasks;

use crate::board::UptimeClock;

/// Embedded configuration (compiled into firmware)
/// Edit access.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../access.toml");

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 256]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 16]> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Doorward firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config = load_config();

    // Diagnostic UART (115200 8N1)
    let tx_buf = TX_BUF.init([0u8; 256]);
    let rx_buf = RX_BUF.init([0u8; 16]);
    let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, UartConfig::default());
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    let (tx, _rx) = uart.split();
    info!("UART initialized for diagnostics");

    // Ultrasonic sensor
    let trig = Output::new(p.PIN_4, Level::Low);
    let echo = Input::new(p.PIN_5, Pull::Down);
    let sensor = Hcsr04::new(trig, echo, Delay, UptimeClock, config.echo_timeout_us);

    // Keypad: rows idle high, columns pulled up
    let rows = [
        Output::new(p.PIN_6, Level::High),
        Output::new(p.PIN_7, Level::High),
        Output::new(p.PIN_8, Level::High),
        Output::new(p.PIN_9, Level::High),
    ];
    let cols = [
        Input::new(p.PIN_10, Pull::Up),
        Input::new(p.PIN_11, Pull::Up),
        Input::new(p.PIN_12, Pull::Up),
        Input::new(p.PIN_13, Pull::Up),
    ];
    let keypad = MatrixKeypad::new_4x4(rows, cols, config.keypad_debounce_ms);

    // Servo on slice 1 channel A at 50 Hz
    let mut servo_pwm = PwmConfig::default();
    servo_pwm.divider = board::SERVO_PWM_DIVIDER.into();
    servo_pwm.top = board::SERVO_PWM_TOP;
    let (servo_out, _) = Pwm::new_output_a(p.PWM_SLICE1, p.PIN_2, servo_pwm).split();
    let servo = ServoLock::new(
        unwrap!(servo_out),
        ServoConfig {
            open_angle: config.open_angle,
            closed_angle: config.closed_angle,
            ..ServoConfig::default()
        },
    );

    // Indicator LED on slice 4 channel B
    let (_, led_out) = Pwm::new_output_b(p.PWM_SLICE4, p.PIN_25, PwmConfig::default()).split();
    let indicator = PwmIndicator::new(unwrap!(led_out), config.indicator);

    // load_config only hands out validated configurations
    let system = unwrap!(AccessSystem::new(&config, sensor, keypad, servo, indicator));
    info!(
        "Access system ready: threshold={}cm, hold={}ms, loop={}ms",
        config.presence_threshold_cm, config.unlock_hold_ms, config.loop_interval_ms
    );

    // Spawn tasks
    spawner.spawn(tasks::diag_tx_task(tx)).unwrap();
    spawner
        .spawn(tasks::access_task(system, config.loop_interval_ms))
        .unwrap();

    info!("All tasks spawned, firmware running");

    // Main task has nothing else to do - all work happens in spawned tasks
    loop {
        embassy_time::Timer::after_secs(60).await;
        trace!("Main loop heartbeat");
    }
}

/// Parse the embedded configuration, falling back to defaults
fn load_config() -> AccessConfig {
    match parse_config(EMBEDDED_CONFIG) {
        Ok(config) => {
            info!("Loaded embedded configuration");
            config
        }
        Err(e) => {
            error!("Embedded config rejected: {:?}, using defaults", e);
            AccessConfig::default()
        }
    }
}
