//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in doorward-core on top of `embedded-hal` pins and PWM channels:
//!
//! - Ultrasonic distance sensor (HC-SR04)
//! - Matrix keypad scanner
//! - Servo door latch
//! - PWM status LED

#![no_std]
#![deny(unsafe_code)]

pub mod actuator;
pub mod indicator;
pub mod keypad;
pub mod sensor;
