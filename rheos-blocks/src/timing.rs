//! Time base and trigger-division blocks

use rheos_core::block::{Block, Fired, PortRefs};
use rheos_core::port::{InputPort, OutputPort, Value};
use rheos_core::ports;

use crate::fire;

/// The program's time base
///
/// Has no inputs; the engine evaluates it directly on every hardware
/// tick. Fires its `tick` output with a monotonically increasing count.
#[derive(Default)]
pub struct TickSource {
    count: u32,
    /// Tick count output
    pub tick: OutputPort,
}

impl TickSource {
    /// Create a tick source starting at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Ticks seen so far
    pub fn count(&self) -> u32 {
        self.count
    }
}

impl Block for TickSource {
    fn inputs(&mut self) -> PortRefs<'_, InputPort> {
        PortRefs::new()
    }

    fn outputs(&mut self) -> PortRefs<'_, OutputPort> {
        ports![&mut self.tick]
    }

    fn evaluate(&mut self) -> Fired {
        self.count = self.count.wrapping_add(1);
        self.tick.set(Value::Int(self.count as i32));
        fire(&[0])
    }
}

/// Divides a trigger stream
///
/// Counts incoming triggers and fires `overflow` with the total overflow
/// count every `period` triggers. Dividing a 1 ms time base by 500 gives
/// a 500 ms trigger.
pub struct Counter {
    /// Trigger input
    pub trigger: InputPort,
    /// Fires every `period` triggers; carries the overflow total
    pub overflow: OutputPort,
    period: u32,
    current: u32,
    total: i32,
}

impl Counter {
    /// Parameter index for the period
    pub const PARAM_PERIOD: u8 = 0;

    /// Create a counter firing every `period` triggers (minimum 1)
    pub fn new(period: u32) -> Self {
        Self {
            trigger: InputPort::default(),
            overflow: OutputPort::default(),
            period: period.max(1),
            current: 0,
            total: 0,
        }
    }

    /// Current period
    pub fn period(&self) -> u32 {
        self.period
    }
}

impl Block for Counter {
    fn inputs(&mut self) -> PortRefs<'_, InputPort> {
        ports![&mut self.trigger]
    }

    fn outputs(&mut self) -> PortRefs<'_, OutputPort> {
        ports![&mut self.overflow]
    }

    fn evaluate(&mut self) -> Fired {
        self.current += 1;
        if self.current >= self.period {
            self.current = 0;
            self.total = self.total.wrapping_add(1);
            self.overflow.set(Value::Int(self.total));
            fire(&[0])
        } else {
            Fired::new()
        }
    }

    fn set_param(&mut self, index: u8, value: Value) -> bool {
        match (index, value.as_int()) {
            (Self::PARAM_PERIOD, Some(p)) if p > 0 => {
                self.period = p as u32;
                true
            }
            _ => false,
        }
    }

    fn param(&self, index: u8) -> Option<Value> {
        match index {
            Self::PARAM_PERIOD => Some(Value::Int(self.period as i32)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_source_counts() {
        let mut src = TickSource::new();
        assert_eq!(src.evaluate().as_slice(), &[0]);
        assert_eq!(src.evaluate().as_slice(), &[0]);
        assert_eq!(src.tick.value, Value::Int(2));
        assert_eq!(src.count(), 2);
    }

    #[test]
    fn test_counter_fires_on_period() {
        let mut counter = Counter::new(3);
        assert!(counter.accept(0, Value::Int(1)).is_empty());
        assert!(counter.accept(0, Value::Int(2)).is_empty());
        let fired = counter.accept(0, Value::Int(3));
        assert_eq!(fired.as_slice(), &[0]);
        assert_eq!(counter.overflow.value, Value::Int(1));

        // Second full period fires total 2
        counter.accept(0, Value::Int(4));
        counter.accept(0, Value::Int(5));
        counter.accept(0, Value::Int(6));
        assert_eq!(counter.overflow.value, Value::Int(2));
    }

    #[test]
    fn test_counter_period_clamped() {
        let mut counter = Counter::new(0);
        assert_eq!(counter.period(), 1);
        // Fires on every trigger
        assert_eq!(counter.accept(0, Value::Int(1)).as_slice(), &[0]);
    }

    #[test]
    fn test_counter_period_param() {
        let mut counter = Counter::new(10);
        assert!(counter.set_param(Counter::PARAM_PERIOD, Value::Int(2)));
        assert_eq!(counter.param(0), Some(Value::Int(2)));
        assert!(!counter.set_param(0, Value::Int(0)));
        assert!(!counter.set_param(0, Value::Float(2.0)));
        assert!(!counter.set_param(3, Value::Int(2)));
    }
}
