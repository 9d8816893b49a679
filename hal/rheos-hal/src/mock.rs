//! Mock hardware for host tests
//!
//! Infallible in-memory implementations of the pin, PWM and ADC traits.
//! Each mock records enough state for a test to assert on what the block
//! graph actually did to the hardware.

use core::convert::Infallible;

use embedded_hal::digital;
use embedded_hal::pwm;

use crate::adc::AdcChannel;

/// Mock digital pin
///
/// Usable as both an output (records level and transition count) and an
/// input (level is set by the test).
#[derive(Debug, Default)]
pub struct MockPin {
    /// Current pin level
    pub level: bool,
    /// Number of level changes since creation
    pub transitions: u32,
}

impl MockPin {
    /// Create a pin at the given initial level
    pub fn with_level(level: bool) -> Self {
        Self {
            level,
            transitions: 0,
        }
    }

    /// Drive the level from the test side (simulated external signal)
    pub fn drive(&mut self, level: bool) {
        if self.level != level {
            self.transitions += 1;
        }
        self.level = level;
    }
}

impl digital::ErrorType for MockPin {
    type Error = Infallible;
}

impl digital::OutputPin for MockPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        if self.level {
            self.transitions += 1;
        }
        self.level = false;
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        if !self.level {
            self.transitions += 1;
        }
        self.level = true;
        Ok(())
    }
}

impl digital::StatefulOutputPin for MockPin {
    fn is_set_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.level)
    }

    fn is_set_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.level)
    }
}

impl digital::InputPin for MockPin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.level)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.level)
    }
}

/// Mock PWM channel recording the last duty written
#[derive(Debug)]
pub struct MockPwm {
    /// Last duty value written
    pub duty: u16,
    /// Full-scale duty value
    pub max: u16,
}

impl Default for MockPwm {
    fn default() -> Self {
        Self { duty: 0, max: 255 }
    }
}

impl pwm::ErrorType for MockPwm {
    type Error = Infallible;
}

impl pwm::SetDutyCycle for MockPwm {
    fn max_duty_cycle(&self) -> u16 {
        self.max
    }

    fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Self::Error> {
        self.duty = duty;
        Ok(())
    }
}

/// Mock ADC channel returning a test-controlled count
#[derive(Debug)]
pub struct MockAdc {
    /// Count returned by the next conversion
    pub counts: u16,
    /// Full-scale count
    pub max: u16,
    /// Number of conversions performed
    pub reads: u32,
}

impl Default for MockAdc {
    fn default() -> Self {
        Self {
            counts: 0,
            max: 4095,
            reads: 0,
        }
    }
}

impl MockAdc {
    /// Create an ADC that reads the given count
    pub fn with_counts(counts: u16) -> Self {
        Self {
            counts,
            ..Default::default()
        }
    }
}

impl AdcChannel for MockAdc {
    type Error = Infallible;

    fn read(&mut self) -> Result<u16, Self::Error> {
        self.reads += 1;
        Ok(self.counts)
    }

    fn max_count(&self) -> u16 {
        self.max
    }
}
