//! Level and edge logic blocks

use rheos_core::block::{Block, Fired, PortRefs};
use rheos_core::port::{InputPort, OutputPort, Value};
use rheos_core::ports;

use crate::fire;

/// Alternates its boolean output on every trigger
pub struct Toggle {
    /// Trigger input (any truthy or falsy value)
    pub trigger: InputPort,
    /// Alternating level
    pub out: OutputPort,
}

impl Default for Toggle {
    fn default() -> Self {
        let mut out = OutputPort::default();
        out.value = Value::Bool(false);
        Self {
            trigger: InputPort::default(),
            out,
        }
    }
}

impl Toggle {
    /// Create a toggle starting low
    pub fn new() -> Self {
        Self::default()
    }
}

impl Block for Toggle {
    fn inputs(&mut self) -> PortRefs<'_, InputPort> {
        ports![&mut self.trigger]
    }

    fn outputs(&mut self) -> PortRefs<'_, OutputPort> {
        ports![&mut self.out]
    }

    fn evaluate(&mut self) -> Fired {
        let Some(level) = self.out.value.as_bool() else {
            return Fired::new();
        };
        self.out.set(Value::Bool(!level));
        fire(&[0])
    }
}

/// Which level change fires the trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Edge {
    Rising,
    Falling,
    Either,
}

/// Fires a trigger when its boolean input changes level
///
/// The first delivered level only arms the detector; nothing fires until
/// a change is seen.
pub struct EdgeDetect {
    edge: Edge,
    last: Option<bool>,
    /// Sampled level input
    pub input: InputPort,
    /// Fires on the configured edge; carries the new level
    pub trigger: OutputPort,
}

impl EdgeDetect {
    /// Create a detector for the given edge
    pub fn new(edge: Edge) -> Self {
        Self {
            edge,
            last: None,
            input: InputPort::default(),
            trigger: OutputPort::default(),
        }
    }
}

impl Block for EdgeDetect {
    fn inputs(&mut self) -> PortRefs<'_, InputPort> {
        ports![&mut self.input]
    }

    fn outputs(&mut self) -> PortRefs<'_, OutputPort> {
        ports![&mut self.trigger]
    }

    fn evaluate(&mut self) -> Fired {
        let Some(level) = self.input.value.as_bool() else {
            return Fired::new();
        };
        let fired = match self.last {
            None => false,
            Some(prev) => match self.edge {
                Edge::Rising => !prev && level,
                Edge::Falling => prev && !level,
                Edge::Either => prev != level,
            },
        };
        self.last = Some(level);
        if fired {
            self.trigger.set(Value::Bool(level));
            fire(&[0])
        } else {
            Fired::new()
        }
    }
}
