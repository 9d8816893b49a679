//! Property tests for graph propagation
//!
//! Builds runtime-assembled chains and checks the invariants the engine
//! promises: breadth-first delivery, bounded queues, and per-tick
//! recalculation of every block on the path.

use proptest::prelude::*;

use rheos_core::block::{Block, Fired, PortRefs};
use rheos_core::engine::Engine;
use rheos_core::graph::{validate, Program};
use rheos_core::port::{InputPort, OutputPort, Value};
use rheos_core::ports;
use rheos_core::subprogram::GraphProgram;

/// Fires an incrementing count on every evaluation
#[derive(Default)]
struct Count {
    count: i32,
    out: OutputPort,
}

impl Block for Count {
    fn inputs(&mut self) -> PortRefs<'_, InputPort> {
        PortRefs::new()
    }

    fn outputs(&mut self) -> PortRefs<'_, OutputPort> {
        ports![&mut self.out]
    }

    fn evaluate(&mut self) -> Fired {
        self.count += 1;
        self.out.set(Value::Int(self.count));
        let mut fired = Fired::new();
        let _ = fired.push(0);
        fired
    }
}

/// Adds a constant to its integer input
struct AddConst {
    offset: i32,
    input: InputPort,
    output: OutputPort,
}

impl AddConst {
    fn new(offset: i32) -> Self {
        Self {
            offset,
            input: InputPort::default(),
            output: OutputPort::default(),
        }
    }
}

impl Block for AddConst {
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
        self.output.set(Value::Int(v + self.offset));
        let mut fired = Fired::new();
        let _ = fired.push(0);
        fired
    }
}

/// Terminal block; delivered values are read back through its input port
#[derive(Default)]
struct Probe {
    input: InputPort,
}

impl Block for Probe {
    fn inputs(&mut self) -> PortRefs<'_, InputPort> {
        ports![&mut self.input]
    }

    fn outputs(&mut self) -> PortRefs<'_, OutputPort> {
        PortRefs::new()
    }

    fn evaluate(&mut self) -> Fired {
        Fired::new()
    }
}

/// Count -> n × AddConst -> Probe; returns (graph, probe index)
fn chain(offsets: &[i32]) -> (GraphProgram, u8) {
    let mut graph = GraphProgram::new();
    let source = graph.add_block(Box::new(Count::default()));
    graph.set_tick_block(source);

    let mut prev = source;
    for &offset in offsets {
        let id = graph.add_block(Box::new(AddConst::new(offset)));
        graph.link(prev, 0, id, 0);
        prev = id;
    }
    let probe = graph.add_block(Box::new(Probe::default()));
    graph.link(prev, 0, probe, 0);
    (graph, probe)
}

/// Last value delivered to the probe, read back through its input port
fn probe_last(graph: &mut GraphProgram, probe: u8) -> Option<i32> {
    let block = graph.block_mut(probe).expect("probe exists");
    block.inputs()[0].value.as_int()
}

proptest! {
    /// A chain of adders delivers count + sum(offsets) on every tick.
    #[test]
    fn chain_delivers_offset_sum(
        offsets in prop::collection::vec(-100i32..100, 1..6),
        ticks in 1u32..25,
    ) {
        let (mut graph, probe) = chain(&offsets);
        validate(&mut graph).unwrap();

        let mut engine: Engine<32> = Engine::new();
        for _ in 0..ticks {
            engine.tick(&mut graph).unwrap();
        }

        let sum: i32 = offsets.iter().sum();
        prop_assert_eq!(probe_last(&mut graph, probe), Some(ticks as i32 + sum));
    }

    /// Event counts scale linearly with ticks: every tick fires the source
    /// plus each adder exactly once.
    #[test]
    fn events_scale_linearly(len in 1usize..6, ticks in 1u32..25) {
        let offsets = vec![1i32; len];
        let (mut graph, _) = chain(&offsets);
        validate(&mut graph).unwrap();

        let mut engine: Engine<32> = Engine::new();
        for _ in 0..ticks {
            engine.tick(&mut graph).unwrap();
        }

        let stats = engine.stats();
        prop_assert_eq!(stats.ticks, ticks);
        prop_assert_eq!(stats.events, ticks * (len as u32 + 1));
        // A linear chain never holds more than one event at a time
        prop_assert_eq!(stats.peak_depth, 1);
    }
}
