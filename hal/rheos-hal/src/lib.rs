//! Hardware abstraction for the Rheos block runtime
//!
//! Digital pins and PWM use the `embedded-hal` 1.0 traits directly. This
//! crate adds the abstractions `embedded-hal` does not cover (blocking ADC
//! sampling) plus mock implementations of all of them for host tests.

#![no_std]
#![deny(unsafe_code)]

pub mod adc;

#[cfg(feature = "mock")]
pub mod mock;

pub use adc::AdcChannel;
