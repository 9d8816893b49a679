//! Hardware I/O blocks
//!
//! Generic over `embedded-hal` 1.0 digital/PWM traits and the
//! `rheos-hal` ADC trait. Pin errors do not abort propagation; a failed
//! write simply leaves the hardware unchanged for that event.

use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal::pwm::SetDutyCycle;

use rheos_core::block::{Block, Fired, PortRefs};
use rheos_core::port::{InputPort, OutputPort, Value};
use rheos_core::ports;
use rheos_hal::AdcChannel;

use crate::fire;

/// Drives a digital output pin from its input value
///
/// Any truthy value sets the pin high, falsy sets it low.
pub struct DigitalOut<P> {
    pin: P,
    /// Level input
    pub input: InputPort,
}

impl<P: OutputPin> DigitalOut<P> {
    /// Create a digital output block on the given pin
    pub fn new(pin: P) -> Self {
        Self {
            pin,
            input: InputPort::default(),
        }
    }

    /// Borrow the underlying pin (for host tests)
    pub fn pin(&self) -> &P {
        &self.pin
    }
}

impl<P: OutputPin> Block for DigitalOut<P> {
    fn inputs(&mut self) -> PortRefs<'_, InputPort> {
        ports![&mut self.input]
    }

    fn outputs(&mut self) -> PortRefs<'_, OutputPort> {
        PortRefs::new()
    }

    fn evaluate(&mut self) -> Fired {
        if self.input.value.is_truthy() {
            let _ = self.pin.set_high();
        } else {
            let _ = self.pin.set_low();
        }
        Fired::new()
    }
}

/// Samples a digital input pin on each trigger
pub struct DigitalIn<P> {
    pin: P,
    /// Sample trigger
    pub trigger: InputPort,
    /// Sampled level
    pub value: OutputPort,
}

impl<P: InputPin> DigitalIn<P> {
    /// Create a digital input block on the given pin
    pub fn new(pin: P) -> Self {
        Self {
            pin,
            trigger: InputPort::default(),
            value: OutputPort::default(),
        }
    }

    /// Borrow the underlying pin (for host tests)
    pub fn pin_mut(&mut self) -> &mut P {
        &mut self.pin
    }
}

impl<P: InputPin> Block for DigitalIn<P> {
    fn inputs(&mut self) -> PortRefs<'_, InputPort> {
        ports![&mut self.trigger]
    }

    fn outputs(&mut self) -> PortRefs<'_, OutputPort> {
        ports![&mut self.value]
    }

    fn evaluate(&mut self) -> Fired {
        match self.pin.is_high() {
            Ok(level) => {
                self.value.set(Value::Bool(level));
                fire(&[0])
            }
            Err(_) => Fired::new(),
        }
    }
}

/// Reads an ADC channel on each trigger and scales into a range
///
/// Raw counts map linearly onto `lo..=hi`; zero counts give `lo`, full
/// scale gives `hi`.
pub struct AnalogIn<A> {
    adc: A,
    lo: f32,
    hi: f32,
    /// Sample trigger
    pub trigger: InputPort,
    /// Scaled reading
    pub value: OutputPort,
}

impl<A: AdcChannel> AnalogIn<A> {
    /// Parameter index for the range low end
    pub const PARAM_LO: u8 = 0;
    /// Parameter index for the range high end
    pub const PARAM_HI: u8 = 1;

    /// Create an analog input scaling counts onto `lo..=hi`
    pub fn new(adc: A, lo: f32, hi: f32) -> Self {
        Self {
            adc,
            lo,
            hi,
            trigger: InputPort::default(),
            value: OutputPort::default(),
        }
    }
}

impl<A: AdcChannel> Block for AnalogIn<A> {
    fn inputs(&mut self) -> PortRefs<'_, InputPort> {
        ports![&mut self.trigger]
    }

    fn outputs(&mut self) -> PortRefs<'_, OutputPort> {
        ports![&mut self.value]
    }

    fn evaluate(&mut self) -> Fired {
        let Ok(counts) = self.adc.read() else {
            return Fired::new();
        };
        let full_scale = self.adc.max_count().max(1) as f32;
        let scaled = self.lo + (counts as f32 / full_scale) * (self.hi - self.lo);
        self.value.set(Value::Float(scaled));
        fire(&[0])
    }

    fn set_param(&mut self, index: u8, value: Value) -> bool {
        match (index, value.as_float()) {
            (Self::PARAM_LO, Some(v)) => {
                self.lo = v;
                true
            }
            (Self::PARAM_HI, Some(v)) => {
                self.hi = v;
                true
            }
            _ => false,
        }
    }

    fn param(&self, index: u8) -> Option<Value> {
        match index {
            Self::PARAM_LO => Some(Value::Float(self.lo)),
            Self::PARAM_HI => Some(Value::Float(self.hi)),
            _ => None,
        }
    }
}

/// Drives a PWM channel from a 0–100 percent input
pub struct PwmOut<P> {
    pin: P,
    /// Duty input in percent (`Float`, clamped to 0..=100)
    pub input: InputPort,
}

impl<P: SetDutyCycle> PwmOut<P> {
    /// Create a PWM output block on the given channel
    pub fn new(pin: P) -> Self {
        Self {
            pin,
            input: InputPort::default(),
        }
    }

    /// Borrow the underlying channel (for host tests)
    pub fn pin(&self) -> &P {
        &self.pin
    }
}

impl<P: SetDutyCycle> Block for PwmOut<P> {
    fn inputs(&mut self) -> PortRefs<'_, InputPort> {
        ports![&mut self.input]
    }

    fn outputs(&mut self) -> PortRefs<'_, OutputPort> {
        PortRefs::new()
    }

    fn evaluate(&mut self) -> Fired {
        let Some(percent) = self.input.value.as_float() else {
            return Fired::new();
        };
        let percent = percent.clamp(0.0, 100.0) as u8;
        let _ = self.pin.set_duty_cycle_percent(percent);
        Fired::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rheos_hal::mock::{MockAdc, MockPin, MockPwm};

    #[test]
    fn test_digital_out_follows_input() {
        let mut out = DigitalOut::new(MockPin::default());
        out.accept(0, Value::Bool(true));
        assert!(out.pin().level);
        out.accept(0, Value::Int(0));
        assert!(!out.pin().level);
        assert_eq!(out.pin().transitions, 2);
    }

    #[test]
    fn test_digital_in_samples_on_trigger() {
        let mut din = DigitalIn::new(MockPin::with_level(true));
        let fired = din.accept(0, Value::Int(1));
        assert_eq!(fired.as_slice(), &[0]);
        assert_eq!(din.value.value, Value::Bool(true));

        din.pin_mut().drive(false);
        din.accept(0, Value::Int(2));
        assert_eq!(din.value.value, Value::Bool(false));
    }

    #[test]
    fn test_analog_in_scales_range() {
        // Half scale on a 0..=100 range
        let mut ain = AnalogIn::new(MockAdc::with_counts(2048), 0.0, 100.0);
        ain.accept(0, Value::Int(1));
        let v = ain.value.value.as_float().unwrap();
        assert!((v - 50.0).abs() < 0.1);
    }

    #[test]
    fn test_analog_in_range_params() {
        let mut ain = AnalogIn::new(MockAdc::with_counts(4095), 0.0, 1.0);
        assert!(ain.set_param(AnalogIn::<MockAdc>::PARAM_HI, Value::Float(3.3)));
        ain.accept(0, Value::Int(1));
        let v = ain.value.value.as_float().unwrap();
        assert!((v - 3.3).abs() < 0.01);
    }

    #[test]
    fn test_pwm_out_sets_duty() {
        let mut pwm = PwmOut::new(MockPwm::default());
        pwm.accept(0, Value::Float(50.0));
        // 50% of the 255 full scale
        assert_eq!(pwm.pin().duty, 127);
    }

    #[test]
    fn test_pwm_out_clamps_percent() {
        let mut pwm = PwmOut::new(MockPwm::default());
        pwm.accept(0, Value::Float(250.0));
        assert_eq!(pwm.pin().duty, 255);
        pwm.accept(0, Value::Float(-10.0));
        assert_eq!(pwm.pin().duty, 0);
    }
}
