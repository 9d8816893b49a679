//! Runtime-assembled graphs and subprogram composition
//!
//! Firmware programs are usually static structs, but composition needs
//! owned graphs: a [`Subprogram`] wraps a [`GraphProgram`] behind boundary
//! ports so a whole inner graph acts as a single block in an outer
//! program. Inner connections may name the wrapper itself through the
//! [`BOUNDARY`] sentinel.
//!
//! Requires the `alloc` feature (blocks are boxed).

use alloc::boxed::Box;
use alloc::vec::Vec;

use heapless::Deque;

use crate::block::{Block, Fired, PortRefs, MAX_PORTS};
use crate::graph::{Connection, Endpoint, GraphError, Program};
use crate::port::{InputPort, OutputPort, Value};

/// Block index addressing the wrapper's own boundary ports in inner
/// connections
pub const BOUNDARY: u8 = 0xFF;

/// Event queue depth for a subprogram's internal pump
const PUMP_DEPTH: usize = 32;

/// An owned, runtime-assembled program
#[derive(Default)]
pub struct GraphProgram {
    blocks: Vec<Box<dyn Block>>,
    connections: Vec<Connection>,
    tick_block: u8,
}

impl GraphProgram {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a block, returning its index
    pub fn add_block(&mut self, block: Box<dyn Block>) -> u8 {
        self.blocks.push(block);
        (self.blocks.len() - 1) as u8
    }

    /// Wire an output port to an input port
    pub fn connect(&mut self, from: Endpoint, to: Endpoint) {
        self.connections.push(Connection::new(from, to));
    }

    /// Shorthand for [`connect`](Self::connect) with raw indices
    pub fn link(&mut self, from_block: u8, from_port: u8, to_block: u8, to_port: u8) {
        self.connect(
            Endpoint::new(from_block, from_port),
            Endpoint::new(to_block, to_port),
        );
    }

    /// Choose the block evaluated on each hardware tick
    pub fn set_tick_block(&mut self, id: u8) {
        self.tick_block = id;
    }
}

impl Program for GraphProgram {
    fn block_mut(&mut self, id: u8) -> Option<&mut dyn Block> {
        match self.blocks.get_mut(id as usize) {
            Some(b) => Some(&mut **b),
            None => None,
        }
    }

    fn block_count(&self) -> u8 {
        self.blocks.len() as u8
    }

    fn connections(&self) -> &[Connection] {
        &self.connections
    }

    fn tick_block(&self) -> u8 {
        self.tick_block
    }
}

/// An inner graph exposed as one block of an outer program
///
/// Boundary inputs do not follow the all-inputs firing rule: each arriving
/// value propagates into the inner graph immediately, and the wrapper
/// reports as fired exactly the boundary outputs the propagation wrote.
pub struct Subprogram {
    inner: GraphProgram,
    inputs: Vec<InputPort>,
    outputs: Vec<OutputPort>,
    /// Latched when the internal pump queue ever filled up
    overflowed: bool,
}

impl Subprogram {
    /// Wrap a graph behind `n_inputs` × `n_outputs` boundary ports
    ///
    /// Returns `None` if either count exceeds [`MAX_PORTS`].
    pub fn new(inner: GraphProgram, n_inputs: usize, n_outputs: usize) -> Option<Self> {
        if n_inputs > MAX_PORTS || n_outputs > MAX_PORTS {
            return None;
        }
        let mut inputs = Vec::new();
        inputs.resize_with(n_inputs, InputPort::default);
        let mut outputs = Vec::new();
        outputs.resize_with(n_outputs, OutputPort::default);
        Some(Self {
            inner,
            inputs,
            outputs,
            overflowed: false,
        })
    }

    /// True if the internal pump ever dropped an event
    pub fn overflowed(&self) -> bool {
        self.overflowed
    }

    /// Check inner connections, allowing [`BOUNDARY`] endpoints on either
    /// side (the tick block is not checked; subprograms are driven through
    /// their boundary, not ticked)
    pub fn validate(&mut self) -> Result<(), GraphError> {
        for i in 0..self.inner.connections().len() {
            let conn = self.inner.connections()[i];

            if conn.from.block == BOUNDARY {
                if conn.from.port as usize >= self.inputs.len() {
                    return Err(GraphError::BadOutputPort { endpoint: conn.from });
                }
            } else {
                let block = self
                    .inner
                    .block_mut(conn.from.block)
                    .ok_or(GraphError::UnknownBlock {
                        block: conn.from.block,
                    })?;
                if conn.from.port as usize >= block.outputs().len() {
                    return Err(GraphError::BadOutputPort { endpoint: conn.from });
                }
            }

            if conn.to.block == BOUNDARY {
                if conn.to.port as usize >= self.outputs.len() {
                    return Err(GraphError::BadInputPort { endpoint: conn.to });
                }
            } else {
                let block = self
                    .inner
                    .block_mut(conn.to.block)
                    .ok_or(GraphError::UnknownBlock {
                        block: conn.to.block,
                    })?;
                if conn.to.port as usize >= block.inputs().len() {
                    return Err(GraphError::BadInputPort { endpoint: conn.to });
                }
            }
        }
        Ok(())
    }

    /// Breadth-first propagation inside the wrapper, boundary-aware
    fn pump(&mut self, seed: Endpoint) {
        let mut queue: Deque<Endpoint, PUMP_DEPTH> = Deque::new();
        if queue.push_back(seed).is_err() {
            self.overflowed = true;
            return;
        }

        while let Some(from) = queue.pop_front() {
            let value = if from.block == BOUNDARY {
                self.inputs.get(from.port as usize).map(|p| p.value)
            } else {
                self.inner.block_mut(from.block).and_then(|b| {
                    b.outputs().get(from.port as usize).map(|p| p.value)
                })
            };
            let Some(value) = value else { continue };

            for i in 0..self.inner.connections().len() {
                let conn = self.inner.connections()[i];
                if conn.from != from {
                    continue;
                }
                if conn.to.block == BOUNDARY {
                    if let Some(out) = self.outputs.get_mut(conn.to.port as usize) {
                        out.set(value);
                    }
                } else if let Some(block) = self.inner.block_mut(conn.to.block) {
                    let fired = block.accept(conn.to.port, value);
                    for port in &fired {
                        if queue
                            .push_back(Endpoint::new(conn.to.block, *port))
                            .is_err()
                        {
                            self.overflowed = true;
                        }
                    }
                }
            }
        }
    }
}

impl Block for Subprogram {
    fn inputs(&mut self) -> PortRefs<'_, InputPort> {
        self.inputs.iter_mut().collect()
    }

    fn outputs(&mut self) -> PortRefs<'_, OutputPort> {
        self.outputs.iter_mut().collect()
    }

    fn evaluate(&mut self) -> Fired {
        // The wrapper only recalculates through accept
        Fired::new()
    }

    fn accept(&mut self, port: u8, value: Value) -> Fired {
        if port as usize >= self.inputs.len() {
            return Fired::new();
        }

        for out in self.outputs.iter_mut() {
            out.clear();
        }
        // Boundary inputs propagate immediately; the latch never holds
        self.inputs[port as usize].value = value;

        self.pump(Endpoint::new(BOUNDARY, port));

        (0..self.outputs.len() as u8)
            .filter(|i| self.outputs[*i as usize].is_set)
            .collect()
    }
}
