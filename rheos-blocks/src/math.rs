//! Scalar math blocks
//!
//! All of these work in the `Float` domain; other value kinds fire
//! nothing (route through [`crate::TypeCast`] first).

use rheos_core::block::{Block, Fired, PortRefs};
use rheos_core::port::{InputPort, OutputPort, Value};
use rheos_core::ports;

use crate::fire;

/// Multiplies its input by a constant
pub struct Gain {
    gain: f32,
    /// Signal input
    pub input: InputPort,
    /// Scaled output
    pub output: OutputPort,
}

impl Gain {
    /// Parameter index for the gain factor
    pub const PARAM_GAIN: u8 = 0;

    /// Create a gain block
    pub fn new(gain: f32) -> Self {
        Self {
            gain,
            input: InputPort::default(),
            output: OutputPort::default(),
        }
    }
}

impl Block for Gain {
    fn inputs(&mut self) -> PortRefs<'_, InputPort> {
        ports![&mut self.input]
    }

    fn outputs(&mut self) -> PortRefs<'_, OutputPort> {
        ports![&mut self.output]
    }

    fn evaluate(&mut self) -> Fired {
        let Some(v) = self.input.value.as_float() else {
            return Fired::new();
        };
        self.output.set(Value::Float(v * self.gain));
        fire(&[0])
    }

    fn set_param(&mut self, index: u8, value: Value) -> bool {
        match (index, value.as_float()) {
            (Self::PARAM_GAIN, Some(g)) => {
                self.gain = g;
                true
            }
            _ => false,
        }
    }

    fn param(&self, index: u8) -> Option<Value> {
        match index {
            Self::PARAM_GAIN => Some(Value::Float(self.gain)),
            _ => None,
        }
    }
}

/// Adds a constant to its input
pub struct Offset {
    offset: f32,
    /// Signal input
    pub input: InputPort,
    /// Shifted output
    pub output: OutputPort,
}

impl Offset {
    /// Parameter index for the offset
    pub const PARAM_OFFSET: u8 = 0;

    /// Create an offset block
    pub fn new(offset: f32) -> Self {
        Self {
            offset,
            input: InputPort::default(),
            output: OutputPort::default(),
        }
    }
}

impl Block for Offset {
    fn inputs(&mut self) -> PortRefs<'_, InputPort> {
        ports![&mut self.input]
    }

    fn outputs(&mut self) -> PortRefs<'_, OutputPort> {
        ports![&mut self.output]
    }

    fn evaluate(&mut self) -> Fired {
        let Some(v) = self.input.value.as_float() else {
            return Fired::new();
        };
        self.output.set(Value::Float(v + self.offset));
        fire(&[0])
    }

    fn set_param(&mut self, index: u8, value: Value) -> bool {
        match (index, value.as_float()) {
            (Self::PARAM_OFFSET, Some(o)) => {
                self.offset = o;
                true
            }
            _ => false,
        }
    }

    fn param(&self, index: u8) -> Option<Value> {
        match index {
            Self::PARAM_OFFSET => Some(Value::Float(self.offset)),
            _ => None,
        }
    }
}

/// Adds its two inputs
#[derive(Default)]
pub struct Sum2 {
    /// First addend
    pub a: InputPort,
    /// Second addend
    pub b: InputPort,
    /// Sum output
    pub output: OutputPort,
}

impl Block for Sum2 {
    fn inputs(&mut self) -> PortRefs<'_, InputPort> {
        ports![&mut self.a, &mut self.b]
    }

    fn outputs(&mut self) -> PortRefs<'_, OutputPort> {
        ports![&mut self.output]
    }

    fn evaluate(&mut self) -> Fired {
        let (Some(a), Some(b)) = (self.a.value.as_float(), self.b.value.as_float()) else {
            return Fired::new();
        };
        self.output.set(Value::Float(a + b));
        fire(&[0])
    }
}

/// Multiplies its two inputs
#[derive(Default)]
pub struct Mult2 {
    /// First factor
    pub a: InputPort,
    /// Second factor
    pub b: InputPort,
    /// Product output
    pub output: OutputPort,
}

impl Block for Mult2 {
    fn inputs(&mut self) -> PortRefs<'_, InputPort> {
        ports![&mut self.a, &mut self.b]
    }

    fn outputs(&mut self) -> PortRefs<'_, OutputPort> {
        ports![&mut self.output]
    }

    fn evaluate(&mut self) -> Fired {
        let (Some(a), Some(b)) = (self.a.value.as_float(), self.b.value.as_float()) else {
            return Fired::new();
        };
        self.output.set(Value::Float(a * b));
        fire(&[0])
    }
}

/// Accumulates `input × dt` per sample
pub struct Integrator {
    dt: f32,
    acc: f32,
    /// Signal input
    pub input: InputPort,
    /// Accumulated output
    pub output: OutputPort,
}

impl Integrator {
    /// Parameter index for the sample interval
    pub const PARAM_DT: u8 = 0;

    /// Create an integrator with the given sample interval (seconds)
    pub fn new(dt: f32) -> Self {
        Self {
            dt,
            acc: 0.0,
            input: InputPort::default(),
            output: OutputPort::default(),
        }
    }

    /// Zero the accumulator
    pub fn reset(&mut self) {
        self.acc = 0.0;
    }
}

impl Block for Integrator {
    fn inputs(&mut self) -> PortRefs<'_, InputPort> {
        ports![&mut self.input]
    }

    fn outputs(&mut self) -> PortRefs<'_, OutputPort> {
        ports![&mut self.output]
    }

    fn evaluate(&mut self) -> Fired {
        let Some(v) = self.input.value.as_float() else {
            return Fired::new();
        };
        self.acc += v * self.dt;
        self.output.set(Value::Float(self.acc));
        fire(&[0])
    }

    fn set_param(&mut self, index: u8, value: Value) -> bool {
        match (index, value.as_float()) {
            (Self::PARAM_DT, Some(dt)) if dt > 0.0 => {
                self.dt = dt;
                true
            }
            _ => false,
        }
    }

    fn param(&self, index: u8) -> Option<Value> {
        match index {
            Self::PARAM_DT => Some(Value::Float(self.dt)),
            _ => None,
        }
    }
}

/// Single-pole low-pass filter: `y += alpha × (x - y)`
///
/// The first sample initializes the state directly, so the filter does
/// not ramp up from zero.
pub struct LowPass {
    alpha: f32,
    state: Option<f32>,
    /// Signal input
    pub input: InputPort,
    /// Filtered output
    pub output: OutputPort,
}

impl LowPass {
    /// Parameter index for the filter coefficient
    pub const PARAM_ALPHA: u8 = 0;

    /// Create a filter with coefficient `alpha` (clamped to 0..=1)
    pub fn new(alpha: f32) -> Self {
        Self {
            alpha: alpha.clamp(0.0, 1.0),
            state: None,
            input: InputPort::default(),
            output: OutputPort::default(),
        }
    }
}

impl Block for LowPass {
    fn inputs(&mut self) -> PortRefs<'_, InputPort> {
        ports![&mut self.input]
    }

    fn outputs(&mut self) -> PortRefs<'_, OutputPort> {
        ports![&mut self.output]
    }

    fn evaluate(&mut self) -> Fired {
        let Some(x) = self.input.value.as_float() else {
            return Fired::new();
        };
        let y = match self.state {
            None => x,
            Some(y) => y + self.alpha * (x - y),
        };
        self.state = Some(y);
        self.output.set(Value::Float(y));
        fire(&[0])
    }

    fn set_param(&mut self, index: u8, value: Value) -> bool {
        match (index, value.as_float()) {
            (Self::PARAM_ALPHA, Some(a)) => {
                self.alpha = a.clamp(0.0, 1.0);
                true
            }
            _ => false,
        }
    }

    fn param(&self, index: u8) -> Option<Value> {
        match index {
            Self::PARAM_ALPHA => Some(Value::Float(self.alpha)),
            _ => None,
        }
    }
}
