//! Value conversion and routing blocks

use rheos_core::block::{Block, Fired, PortRefs};
use rheos_core::port::{InputPort, OutputPort, Value, ValueKind};
use rheos_core::ports;

use crate::fire;

/// Converts any value to a target kind
///
/// Conversions saturate: floats outside the integer range clamp, and
/// values outside 0..=255 clamp when casting to `Byte`.
pub struct TypeCast {
    target: ValueKind,
    /// Value input
    pub input: InputPort,
    /// Converted output
    pub output: OutputPort,
}

impl TypeCast {
    /// Create a cast to the given kind
    pub fn new(target: ValueKind) -> Self {
        Self {
            target,
            input: InputPort::default(),
            output: OutputPort::default(),
        }
    }

    fn cast(&self, value: Value) -> Value {
        match self.target {
            ValueKind::Bool => Value::Bool(value.is_truthy()),
            ValueKind::Int => Value::Int(match value {
                Value::Bool(b) => b as i32,
                Value::Int(v) => v,
                Value::Float(v) => v as i32,
                Value::Byte(v) => v as i32,
            }),
            ValueKind::Float => Value::Float(match value {
                Value::Bool(b) => b as i32 as f32,
                Value::Int(v) => v as f32,
                Value::Float(v) => v,
                Value::Byte(v) => v as f32,
            }),
            ValueKind::Byte => Value::Byte(match value {
                Value::Bool(b) => b as u8,
                Value::Int(v) => v.clamp(0, 255) as u8,
                Value::Float(v) => v.clamp(0.0, 255.0) as u8,
                Value::Byte(v) => v,
            }),
        }
    }
}

impl Block for TypeCast {
    fn inputs(&mut self) -> PortRefs<'_, InputPort> {
        ports![&mut self.input]
    }

    fn outputs(&mut self) -> PortRefs<'_, OutputPort> {
        ports![&mut self.output]
    }

    fn evaluate(&mut self) -> Fired {
        let converted = self.cast(self.input.value);
        self.output.set(converted);
        fire(&[0])
    }
}

/// Two-way selector: routes input `a` or `b` to the output
///
/// Evaluates when all three inputs have arrived; a falsy `select` picks
/// `a`, truthy picks `b`.
#[derive(Default)]
pub struct Mux2 {
    /// Channel selector
    pub select: InputPort,
    /// Channel 0 input
    pub a: InputPort,
    /// Channel 1 input
    pub b: InputPort,
    /// Selected value
    pub output: OutputPort,
}

impl Block for Mux2 {
    fn inputs(&mut self) -> PortRefs<'_, InputPort> {
        ports![&mut self.select, &mut self.a, &mut self.b]
    }

    fn outputs(&mut self) -> PortRefs<'_, OutputPort> {
        ports![&mut self.output]
    }

    fn evaluate(&mut self) -> Fired {
        let selected = if self.select.value.is_truthy() {
            self.b.value
        } else {
            self.a.value
        };
        self.output.set(selected);
        fire(&[0])
    }
}

/// Two-way router: sends the input to output `a` or `b`
///
/// A falsy `select` fires output 0 (`a`), truthy fires output 1 (`b`).
/// Only the selected output fires.
#[derive(Default)]
pub struct Demux2 {
    /// Channel selector
    pub select: InputPort,
    /// Value input
    pub input: InputPort,
    /// Channel 0 output
    pub a: OutputPort,
    /// Channel 1 output
    pub b: OutputPort,
}

impl Block for Demux2 {
    fn inputs(&mut self) -> PortRefs<'_, InputPort> {
        ports![&mut self.select, &mut self.input]
    }

    fn outputs(&mut self) -> PortRefs<'_, OutputPort> {
        ports![&mut self.a, &mut self.b]
    }

    fn evaluate(&mut self) -> Fired {
        if self.select.value.is_truthy() {
            self.b.set(self.input.value);
            fire(&[1])
        } else {
            self.a.set(self.input.value);
            fire(&[0])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cast_to_int_saturates() {
        let mut cast = TypeCast::new(ValueKind::Int);
        cast.accept(0, Value::Float(1e12));
        assert_eq!(cast.output.value, Value::Int(i32::MAX));
        cast.accept(0, Value::Float(2.9));
        assert_eq!(cast.output.value, Value::Int(2));
    }

    #[test]
    fn test_cast_to_bool() {
        let mut cast = TypeCast::new(ValueKind::Bool);
        cast.accept(0, Value::Int(0));
        assert_eq!(cast.output.value, Value::Bool(false));
        cast.accept(0, Value::Float(0.5));
        assert_eq!(cast.output.value, Value::Bool(true));
    }

    #[test]
    fn test_cast_to_byte_clamps() {
        let mut cast = TypeCast::new(ValueKind::Byte);
        cast.accept(0, Value::Int(300));
        assert_eq!(cast.output.value, Value::Byte(255));
        cast.accept(0, Value::Int(-5));
        assert_eq!(cast.output.value, Value::Byte(0));
    }

    #[test]
    fn test_mux_selects_channel() {
        let mut mux = Mux2::default();
        mux.accept(0, Value::Bool(false));
        mux.accept(1, Value::Int(10));
        let fired = mux.accept(2, Value::Int(20));
        assert_eq!(fired.as_slice(), &[0]);
        assert_eq!(mux.output.value, Value::Int(10));

        mux.accept(0, Value::Bool(true));
        mux.accept(1, Value::Int(10));
        mux.accept(2, Value::Int(20));
        assert_eq!(mux.output.value, Value::Int(20));
    }

    #[test]
    fn test_demux_routes_channel() {
        let mut demux = Demux2::default();
        demux.accept(0, Value::Bool(true));
        let fired = demux.accept(1, Value::Int(7));
        assert_eq!(fired.as_slice(), &[1]);
        assert_eq!(demux.b.value, Value::Int(7));

        demux.accept(0, Value::Bool(false));
        let fired = demux.accept(1, Value::Int(8));
        assert_eq!(fired.as_slice(), &[0]);
        assert_eq!(demux.a.value, Value::Int(8));
    }
}
