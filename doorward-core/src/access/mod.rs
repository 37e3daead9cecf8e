//! Access control state machine
//!
//! Interprets keypad presses and presence changes: code entry, unlock
//! requests and the two-step code change flow.

pub mod code;
pub mod controller;
pub mod events;
pub mod mode;

pub use code::{codes_match, parse_code, Code, MAX_CODE_LEN};
pub use controller::AccessController;
pub use events::{Command, Event, Notice, Reaction};
pub use mode::{Mode, Trigger};
