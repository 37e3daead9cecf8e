//! Access loop driver
//!
//! Ties the peripherals to the access controller. One call to
//! [`AccessSystem::step`] is one cycle of the control loop:
//!
//! 1. Measure distance and update the presence flag
//! 2. If someone is present, poll the keypad and forward any key
//! 3. Start the unlock sequence when the controller asks for it
//! 4. Close the latch once the hold has elapsed
//! 5. Update the indicator when its level changed
//!
//! Peripheral errors come back as notices; a step never fails.

use heapless::Vec;

use crate::access::{AccessController, Command, Event, Notice, Reaction};
use crate::config::{AccessConfig, ConfigError};
use crate::indicator::IndicatorLevel;
use crate::lock::{LockPosition, UnlockSequence};
use crate::presence::PresenceDetector;
use crate::traits::{DistanceSensor, IndicatorOutput, Keypad, LockActuator, SensorError};

/// Upper bound of notices one step can produce
pub const MAX_NOTICES_PER_STEP: usize = 8;

/// Notices produced by one step, in order
pub type Notices = Vec<Notice, MAX_NOTICES_PER_STEP>;

/// The complete access loop
pub struct AccessSystem<S, K, L, I> {
    sensor: S,
    keypad: K,
    lock: L,
    indicator: I,
    controller: AccessController,
    presence: PresenceDetector,
    unlock: UnlockSequence,
    /// Level last written to the indicator
    shown: Option<IndicatorLevel>,
    /// Sensor error of the current failure streak (reported once)
    sensor_fault: Option<SensorError>,
}

impl<S, K, L, I> AccessSystem<S, K, L, I>
where
    S: DistanceSensor,
    K: Keypad,
    L: LockActuator,
    I: IndicatorOutput,
{
    /// Assemble the loop from its peripherals
    ///
    /// The configuration is validated first; an empty initial code would
    /// let a bare `*` open the door.
    pub fn new(
        config: &AccessConfig,
        sensor: S,
        keypad: K,
        lock: L,
        indicator: I,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        Ok(Self {
            sensor,
            keypad,
            lock,
            indicator,
            controller: AccessController::new(config.initial_code.clone()),
            presence: PresenceDetector::new(config.presence_threshold_cm),
            unlock: UnlockSequence::new(config.unlock_hold_ms),
            shown: None,
            sensor_fault: None,
        })
    }

    /// Drive the outputs to their safe state: latch closed, indicator off
    pub fn start(&mut self) -> Notices {
        let mut notices = Notices::new();
        if let Err(e) = self.lock.set_position(LockPosition::Closed) {
            push(&mut notices, Notice::ActuatorFault(e));
        }
        self.refresh_indicator(&mut notices);
        notices
    }

    /// Run one loop cycle
    pub fn step(&mut self, now_ms: u32) -> Notices {
        let mut notices = Notices::new();

        let reading = self.sensor.measure_echo_us();
        self.track_sensor_fault(reading, &mut notices);

        if let Some(event) = self.presence.update(reading) {
            if event == Event::PresenceLost {
                self.keypad.reset();
            }
            let reaction = self.controller.handle(event);
            self.react(reaction, now_ms, &mut notices);
        }

        if self.presence.is_present() {
            match self.keypad.poll(now_ms) {
                Ok(Some(key)) => {
                    let reaction = self.controller.handle(Event::KeyPressed(key));
                    self.react(reaction, now_ms, &mut notices);
                }
                Ok(None) => {}
                Err(e) => push(&mut notices, Notice::KeypadFault(e)),
            }
        }

        // Retried every step until the latch reports closed
        if let Some(position) = self.unlock.update(now_ms) {
            if self.move_latch(position, &mut notices) {
                self.unlock.confirm_closed();
            }
        }

        self.refresh_indicator(&mut notices);
        notices
    }

    /// Access controller state
    pub fn controller(&self) -> &AccessController {
        &self.controller
    }

    /// Presence detector state
    pub fn presence(&self) -> &PresenceDetector {
        &self.presence
    }

    /// Unlock sequence state
    pub fn unlock(&self) -> &UnlockSequence {
        &self.unlock
    }

    /// Distance sensor
    pub fn sensor_mut(&mut self) -> &mut S {
        &mut self.sensor
    }

    /// Keypad
    pub fn keypad_mut(&mut self) -> &mut K {
        &mut self.keypad
    }

    /// Latch actuator
    pub fn lock(&self) -> &L {
        &self.lock
    }

    /// Indicator output
    pub fn indicator(&self) -> &I {
        &self.indicator
    }

    fn react(&mut self, reaction: Reaction, now_ms: u32, notices: &mut Notices) {
        if let Some(notice) = reaction.notice {
            push(notices, notice);
        }

        match reaction.command {
            Some(Command::Unlock) => {
                if let Some(position) = self.unlock.request(now_ms) {
                    self.move_latch(position, notices);
                }
            }
            None => {}
        }
    }

    /// Drive the latch; returns whether the write succeeded
    fn move_latch(&mut self, position: LockPosition, notices: &mut Notices) -> bool {
        match self.lock.set_position(position) {
            Ok(()) => {
                push(
                    notices,
                    match position {
                        LockPosition::Open => Notice::DoorOpened,
                        LockPosition::Closed => Notice::DoorClosed,
                    },
                );
                true
            }
            Err(e) => {
                push(notices, Notice::ActuatorFault(e));
                false
            }
        }
    }

    fn refresh_indicator(&mut self, notices: &mut Notices) {
        let level = self.controller.indicator();
        if self.shown == Some(level) {
            return;
        }

        match self.indicator.set_level(level) {
            Ok(()) => self.shown = Some(level),
            Err(e) => push(notices, Notice::ActuatorFault(e)),
        }
    }

    fn track_sensor_fault(&mut self, reading: Result<u32, SensorError>, notices: &mut Notices) {
        match reading {
            // Nothing in range is the normal idle case
            Ok(_) | Err(SensorError::NoEcho | SensorError::OutOfRange) => self.sensor_fault = None,
            Err(e) => {
                if self.sensor_fault != Some(e) {
                    push(notices, Notice::SensorFault(e));
                }
                self.sensor_fault = Some(e);
            }
        }
    }
}

fn push(notices: &mut Notices, notice: Notice) {
    // Capacity covers the worst case of one step
    let _ = notices.push(notice);
}
