//! Board-agnostic core logic for the doorward keypad lock
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Hardware abstraction traits (distance sensor, keypad, latch, indicator)
//! - Access state machine and code handling
//! - Presence detection and the timed unlock sequence
//! - The access loop tying peripherals together
//! - Configuration type definitions and parsing

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod access;
pub mod config;
pub mod indicator;
pub mod keypad;
pub mod lock;
pub mod presence;
pub mod system;
pub mod traits;
