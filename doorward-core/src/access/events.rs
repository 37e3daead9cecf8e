//! Events fed into the access controller and what comes back out

use core::fmt;

use super::code::Code;
use crate::keypad::Key;
use crate::traits::{ActuatorError, KeypadError, SensorError};

/// Events that drive the access controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    /// Presence flag went from false to true
    PresenceDetected,
    /// Presence flag went from true to false
    PresenceLost,
    /// A key was pressed while someone was present
    KeyPressed(Key),
}

impl Event {
    /// Check if this event comes from the presence sensor
    pub fn is_presence_event(&self) -> bool {
        matches!(self, Event::PresenceDetected | Event::PresenceLost)
    }

    /// Check if this event is a key press
    pub fn is_key_event(&self) -> bool {
        matches!(self, Event::KeyPressed(_))
    }
}

/// Commands the controller asks the peripherals to carry out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Run the unlock sequence
    Unlock,
}

/// Diagnostic notices
///
/// Every notice renders as one line of text for the serial log.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Notice {
    /// A key was appended; carries the whole input buffer
    InputUpdated(Code),
    /// Input buffer is full, key dropped
    BufferFull,
    /// Entered code matched, door opening
    CodeAccepted,
    /// Entered code did not match
    CodeRejected,
    /// Code change mode entered
    ChangeModeEntered,
    /// Current code confirmed during a change
    CurrentCodeAccepted,
    /// Current code wrong during a change, change aborted
    CurrentCodeRejected,
    /// Stored code replaced
    CodeChanged,
    /// Empty replacement code refused, change aborted
    NewCodeRejected,
    /// Someone stepped in front of the door
    PresenceDetected,
    /// Nobody present, session state cleared
    SessionReset,
    /// Latch moved to the open position
    DoorOpened,
    /// Latch moved back to the closed position
    DoorClosed,
    /// Distance measurement failed
    SensorFault(SensorError),
    /// Keypad scan failed
    KeypadFault(KeypadError),
    /// Servo or indicator output failed
    ActuatorFault(ActuatorError),
}

impl Notice {
    /// Check if this notice reports a peripheral fault
    pub fn is_fault(&self) -> bool {
        matches!(
            self,
            Notice::SensorFault(_) | Notice::KeypadFault(_) | Notice::ActuatorFault(_)
        )
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::InputUpdated(input) => f.write_str(input),
            Notice::BufferFull => f.write_str("Input Full. Key Ignored."),
            Notice::CodeAccepted => f.write_str("Password Correct. Door Opened."),
            Notice::CodeRejected => f.write_str("Password Incorrect."),
            Notice::ChangeModeEntered => f.write_str("Entering Password Change Mode."),
            Notice::CurrentCodeAccepted => {
                f.write_str("Current Password Correct. Enter New Password.")
            }
            Notice::CurrentCodeRejected => {
                f.write_str("Incorrect Password. Exiting Password Change Mode.")
            }
            Notice::CodeChanged => f.write_str("Password Changed Successfully."),
            Notice::NewCodeRejected => {
                f.write_str("Empty Password Rejected. Exiting Password Change Mode.")
            }
            Notice::PresenceDetected => f.write_str("Person Detected."),
            Notice::SessionReset => f.write_str("Nobody Nearby. System Reset."),
            Notice::DoorOpened => f.write_str("Door Unlocked."),
            Notice::DoorClosed => f.write_str("Door Locked."),
            Notice::SensorFault(e) => write!(f, "Sensor Fault: {:?}", e),
            Notice::KeypadFault(e) => write!(f, "Keypad Fault: {:?}", e),
            Notice::ActuatorFault(e) => write!(f, "Actuator Fault: {:?}", e),
        }
    }
}

/// Result of handling one event
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Reaction {
    /// Diagnostic line to log, if any
    pub notice: Option<Notice>,
    /// Peripheral command to execute, if any
    pub command: Option<Command>,
}

impl Reaction {
    /// Nothing happened
    pub const fn none() -> Self {
        Self {
            notice: None,
            command: None,
        }
    }

    /// Only a notice
    pub fn notice(notice: Notice) -> Self {
        Self {
            notice: Some(notice),
            command: None,
        }
    }

    /// Attach a command
    pub fn with_command(mut self, command: Command) -> Self {
        self.command = Some(command);
        self
    }

    /// Check if the reaction asks for an unlock
    pub fn unlocks(&self) -> bool {
        self.command == Some(Command::Unlock)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_kinds() {
        assert!(Event::PresenceDetected.is_presence_event());
        assert!(Event::PresenceLost.is_presence_event());
        assert!(!Event::KeyPressed(Key::CONFIRM).is_presence_event());
        assert!(Event::KeyPressed(Key::CONFIRM).is_key_event());
    }

    #[test]
    fn test_notice_lines() {
        assert_eq!(
            Notice::CodeAccepted.to_string(),
            "Password Correct. Door Opened."
        );
        assert_eq!(Notice::CodeRejected.to_string(), "Password Incorrect.");
        assert_eq!(
            Notice::CurrentCodeRejected.to_string(),
            "Incorrect Password. Exiting Password Change Mode."
        );

        let mut input = Code::new();
        input.push_str("12#").unwrap();
        assert_eq!(Notice::InputUpdated(input).to_string(), "12#");
    }

    #[test]
    fn test_fault_notices() {
        assert!(Notice::SensorFault(SensorError::NoEcho).is_fault());
        assert!(Notice::ActuatorFault(ActuatorError::Pwm).is_fault());
        assert!(!Notice::CodeRejected.is_fault());
        assert_eq!(
            Notice::SensorFault(SensorError::NoEcho).to_string(),
            "Sensor Fault: NoEcho"
        );
    }

    #[test]
    fn test_reaction_builders() {
        assert_eq!(Reaction::none(), Reaction::default());
        let reaction = Reaction::notice(Notice::CodeAccepted).with_command(Command::Unlock);
        assert!(reaction.unlocks());
        assert!(!Reaction::notice(Notice::CodeRejected).unlocks());
    }
}
