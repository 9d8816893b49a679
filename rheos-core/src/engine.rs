//! Bounded event engine
//!
//! Propagates values through a program graph breadth-first: a fired output
//! endpoint is queued, its value delivered to every connected input, and
//! any outputs the targets fire are queued behind it. The queue is a fixed
//! `heapless::Deque`, so propagation cost and memory are bounded and the
//! engine never recurses.

use heapless::Deque;

use crate::graph::{Endpoint, Program};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Errors the engine can hit while propagating
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EngineError {
    /// Event queue filled up; the graph fans out more than DEPTH allows
    QueueOverflow,
    /// Dispatch reached a block index outside the program
    UnknownBlock { block: u8 },
    /// Dispatch reached an output port the block does not have
    BadPort { endpoint: Endpoint },
}

/// Running counters, reported over the monitor link
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EngineStats {
    /// Hardware ticks processed
    pub ticks: u32,
    /// Output events delivered
    pub events: u32,
    /// Deepest the event queue has been
    pub peak_depth: u16,
}

/// Event engine with a `DEPTH`-entry propagation queue
///
/// One engine drives one program; the program itself is passed into each
/// call so a static program struct can live in a different task or cell.
pub struct Engine<const DEPTH: usize> {
    queue: Deque<Endpoint, DEPTH>,
    stats: EngineStats,
}

impl<const DEPTH: usize> Engine<DEPTH> {
    /// Create an idle engine
    pub const fn new() -> Self {
        Self {
            queue: Deque::new(),
            stats: EngineStats {
                ticks: 0,
                events: 0,
                peak_depth: 0,
            },
        }
    }

    /// Current counters
    pub fn stats(&self) -> EngineStats {
        self.stats
    }

    /// Drop any queued events (after a fault, before restarting)
    pub fn clear(&mut self) {
        while self.queue.pop_front().is_some() {}
    }

    /// Process one hardware tick
    ///
    /// Evaluates the program's tick block and propagates everything it
    /// fires until the graph is quiescent.
    pub fn tick<P: Program + ?Sized>(&mut self, program: &mut P) -> Result<(), EngineError> {
        self.stats.ticks = self.stats.ticks.wrapping_add(1);

        let tick_block = program.tick_block();
        let fired = program
            .block_mut(tick_block)
            .ok_or(EngineError::UnknownBlock { block: tick_block })?
            .evaluate();
        for port in &fired {
            self.enqueue(Endpoint::new(tick_block, *port))?;
        }

        self.drain(program)
    }

    /// Propagate from an output that fired outside the tick path
    ///
    /// For asynchronous sources (pin-change interrupts, received bytes):
    /// the caller updates the block's output port first, then injects the
    /// endpoint.
    pub fn inject<P: Program + ?Sized>(
        &mut self,
        program: &mut P,
        from: Endpoint,
    ) -> Result<(), EngineError> {
        self.enqueue(from)?;
        self.drain(program)
    }

    /// Deliver queued events until the queue is empty
    fn drain<P: Program + ?Sized>(&mut self, program: &mut P) -> Result<(), EngineError> {
        while let Some(from) = self.queue.pop_front() {
            self.stats.events = self.stats.events.wrapping_add(1);

            let value = {
                let block = program
                    .block_mut(from.block)
                    .ok_or(EngineError::UnknownBlock { block: from.block })?;
                let outputs = block.outputs();
                match outputs.get(from.port as usize) {
                    Some(p) => p.value,
                    None => return Err(EngineError::BadPort { endpoint: from }),
                }
            };

            // Index-based scan keeps the connection borrow out of the
            // delivery call below.
            for i in 0..program.connections().len() {
                let conn = program.connections()[i];
                if conn.from != from {
                    continue;
                }
                let target = conn.to;
                let fired = program
                    .block_mut(target.block)
                    .ok_or(EngineError::UnknownBlock {
                        block: target.block,
                    })?
                    .accept(target.port, value);
                for port in &fired {
                    self.enqueue(Endpoint::new(target.block, *port))?;
                }
            }
        }
        Ok(())
    }

    fn enqueue(&mut self, endpoint: Endpoint) -> Result<(), EngineError> {
        self.queue
            .push_back(endpoint)
            .map_err(|_| EngineError::QueueOverflow)?;
        let depth = self.queue.len() as u16;
        if depth > self.stats.peak_depth {
            self.stats.peak_depth = depth;
        }
        Ok(())
    }
}

impl<const DEPTH: usize> Default for Engine<DEPTH> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::{Block, Fired, PortRefs};
    use crate::graph::Connection;
    use crate::port::{InputPort, OutputPort, Value};
    use crate::ports;

    /// Fires an incrementing count on every evaluation
    #[derive(Default)]
    struct Ticker {
        count: i32,
        tick: OutputPort,
    }

    impl Block for Ticker {
        fn inputs(&mut self) -> PortRefs<'_, InputPort> {
            PortRefs::new()
        }

        fn outputs(&mut self) -> PortRefs<'_, OutputPort> {
            ports![&mut self.tick]
        }

        fn evaluate(&mut self) -> Fired {
            self.count += 1;
            self.tick.set(Value::Int(self.count));
            let mut fired = Fired::new();
            let _ = fired.push(0);
            fired
        }
    }

    /// Doubles its integer input
    #[derive(Default)]
    struct Doubler {
        input: InputPort,
        output: OutputPort,
    }

    impl Block for Doubler {
        fn inputs(&mut self) -> PortRefs<'_, InputPort> {
            ports![&mut self.input]
        }

        fn outputs(&mut self) -> PortRefs<'_, OutputPort> {
            ports![&mut self.output]
        }

        fn evaluate(&mut self) -> Fired {
            let Some(v) = self.input.value.as_int() else {
                return Fired::new();
            };
            self.output.set(Value::Int(v * 2));
            let mut fired = Fired::new();
            let _ = fired.push(0);
            fired
        }
    }

    /// Remembers every integer delivered to it
    #[derive(Default)]
    struct Sink {
        input: InputPort,
        received: heapless::Vec<i32, 16>,
    }

    impl Block for Sink {
        fn inputs(&mut self) -> PortRefs<'_, InputPort> {
            ports![&mut self.input]
        }

        fn outputs(&mut self) -> PortRefs<'_, OutputPort> {
            PortRefs::new()
        }

        fn evaluate(&mut self) -> Fired {
            if let Some(v) = self.input.value.as_int() {
                let _ = self.received.push(v);
            }
            Fired::new()
        }
    }

    struct Chain {
        ticker: Ticker,
        doubler: Doubler,
        sink: Sink,
        connections: [Connection; 2],
    }

    impl Chain {
        fn new() -> Self {
            Self {
                ticker: Ticker::default(),
                doubler: Doubler::default(),
                sink: Sink::default(),
                connections: [Connection::link(0, 0, 1, 0), Connection::link(1, 0, 2, 0)],
            }
        }
    }

    impl Program for Chain {
        fn block_mut(&mut self, id: u8) -> Option<&mut dyn Block> {
            match id {
                0 => Some(&mut self.ticker),
                1 => Some(&mut self.doubler),
                2 => Some(&mut self.sink),
                _ => None,
            }
        }

        fn block_count(&self) -> u8 {
            3
        }

        fn connections(&self) -> &[Connection] {
            &self.connections
        }

        fn tick_block(&self) -> u8 {
            0
        }
    }

    #[test]
    fn test_tick_propagates_through_chain() {
        let mut program = Chain::new();
        let mut engine: Engine<8> = Engine::new();

        engine.tick(&mut program).unwrap();
        engine.tick(&mut program).unwrap();
        engine.tick(&mut program).unwrap();

        assert_eq!(program.sink.received.as_slice(), &[2, 4, 6]);
        let stats = engine.stats();
        assert_eq!(stats.ticks, 3);
        // Two fired outputs per tick: ticker and doubler
        assert_eq!(stats.events, 6);
    }

    #[test]
    fn test_fanout_delivers_to_all_targets() {
        struct Fan {
            ticker: Ticker,
            a: Sink,
            b: Sink,
            connections: [Connection; 2],
        }

        impl Program for Fan {
            fn block_mut(&mut self, id: u8) -> Option<&mut dyn Block> {
                match id {
                    0 => Some(&mut self.ticker),
                    1 => Some(&mut self.a),
                    2 => Some(&mut self.b),
                    _ => None,
                }
            }

            fn block_count(&self) -> u8 {
                3
            }

            fn connections(&self) -> &[Connection] {
                &self.connections
            }

            fn tick_block(&self) -> u8 {
                0
            }
        }

        let mut program = Fan {
            ticker: Ticker::default(),
            a: Sink::default(),
            b: Sink::default(),
            connections: [Connection::link(0, 0, 1, 0), Connection::link(0, 0, 2, 0)],
        };
        let mut engine: Engine<8> = Engine::new();

        engine.tick(&mut program).unwrap();
        assert_eq!(program.a.received.as_slice(), &[1]);
        assert_eq!(program.b.received.as_slice(), &[1]);
    }

    #[test]
    fn test_queue_overflow_is_reported() {
        // DEPTH 1 cannot hold the fan-out of two fired outputs in flight
        struct Wide {
            ticker: Ticker,
            d1: Doubler,
            d2: Doubler,
            connections: [Connection; 2],
        }

        impl Program for Wide {
            fn block_mut(&mut self, id: u8) -> Option<&mut dyn Block> {
                match id {
                    0 => Some(&mut self.ticker),
                    1 => Some(&mut self.d1),
                    2 => Some(&mut self.d2),
                    _ => None,
                }
            }

            fn block_count(&self) -> u8 {
                3
            }

            fn connections(&self) -> &[Connection] {
                &self.connections
            }

            fn tick_block(&self) -> u8 {
                0
            }
        }

        let mut program = Wide {
            ticker: Ticker::default(),
            d1: Doubler::default(),
            d2: Doubler::default(),
            connections: [Connection::link(0, 0, 1, 0), Connection::link(0, 0, 2, 0)],
        };
        let mut engine: Engine<1> = Engine::new();

        // Tick itself fits (one event), but delivery fires both doublers
        // while one event is already queued.
        assert_eq!(engine.tick(&mut program), Err(EngineError::QueueOverflow));

        engine.clear();
        assert_eq!(engine.stats().peak_depth, 1);
    }

    #[test]
    fn test_inject_async_source() {
        let mut program = Chain::new();
        let mut engine: Engine<8> = Engine::new();

        // Simulate an async source: update the ticker output by hand,
        // then inject its endpoint.
        program.ticker.tick.set(Value::Int(21));
        engine
            .inject(&mut program, Endpoint::new(0, 0))
            .unwrap();

        assert_eq!(program.sink.received.as_slice(), &[42]);
        assert_eq!(engine.stats().ticks, 0);
    }
}
