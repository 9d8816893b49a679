//! Program graph model
//!
//! A program is a set of blocks addressed by index, a connection list
//! wiring output ports to input ports, and one tick block: the block the
//! engine evaluates on every hardware tick.
//!
//! Programs are usually structs with one field per block, implementing
//! [`Program`] by matching indices to fields (the generated-firmware
//! form); `rheos-core::subprogram` offers a runtime-assembled alternative
//! behind the `alloc` feature.

use crate::block::Block;

/// One port of one block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Endpoint {
    /// Block index within the program
    pub block: u8,
    /// Port index within the block (side depends on context)
    pub port: u8,
}

impl Endpoint {
    /// Create an endpoint
    pub const fn new(block: u8, port: u8) -> Self {
        Self { block, port }
    }
}

/// A directed connection from an output port to an input port
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Connection {
    /// Source output endpoint
    pub from: Endpoint,
    /// Target input endpoint
    pub to: Endpoint,
}

impl Connection {
    /// Create a connection between two endpoints
    pub const fn new(from: Endpoint, to: Endpoint) -> Self {
        Self { from, to }
    }

    /// Shorthand taking raw indices: `link(from_block, from_port, to_block, to_port)`
    pub const fn link(from_block: u8, from_port: u8, to_block: u8, to_port: u8) -> Self {
        Self {
            from: Endpoint::new(from_block, from_port),
            to: Endpoint::new(to_block, to_port),
        }
    }
}

/// A wired block program
pub trait Program {
    /// Borrow a block by index
    fn block_mut(&mut self, id: u8) -> Option<&mut dyn Block>;

    /// Number of blocks in the program
    fn block_count(&self) -> u8;

    /// The connection list
    fn connections(&self) -> &[Connection];

    /// Index of the block the engine evaluates on every hardware tick
    fn tick_block(&self) -> u8;
}

/// Iterate the input endpoints fed by an output endpoint
pub fn targets_of(connections: &[Connection], from: Endpoint) -> impl Iterator<Item = Endpoint> + '_ {
    connections.iter().filter(move |c| c.from == from).map(|c| c.to)
}

/// Errors found by [`validate`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GraphError {
    /// A connection or the tick source names a block that does not exist
    UnknownBlock { block: u8 },
    /// A connection source or the tick source names a missing output port
    BadOutputPort { endpoint: Endpoint },
    /// A connection target names a missing input port
    BadInputPort { endpoint: Endpoint },
}

/// Check every connection endpoint and the tick source against the
/// program's actual blocks and port counts
///
/// Run this once before the first tick; afterwards the engine can trust
/// the graph and dispatch without per-event checks.
pub fn validate<P: Program + ?Sized>(program: &mut P) -> Result<(), GraphError> {
    let count = program.block_count();

    let tick = program.tick_block();
    if tick >= count || program.block_mut(tick).is_none() {
        return Err(GraphError::UnknownBlock { block: tick });
    }

    for i in 0..program.connections().len() {
        let conn = program.connections()[i];
        check_output(program, count, conn.from)?;
        check_input(program, count, conn.to)?;
    }

    Ok(())
}

fn check_output<P: Program + ?Sized>(
    program: &mut P,
    count: u8,
    endpoint: Endpoint,
) -> Result<(), GraphError> {
    if endpoint.block >= count {
        return Err(GraphError::UnknownBlock {
            block: endpoint.block,
        });
    }
    let block = program
        .block_mut(endpoint.block)
        .ok_or(GraphError::UnknownBlock {
            block: endpoint.block,
        })?;
    if (endpoint.port as usize) < block.outputs().len() {
        Ok(())
    } else {
        Err(GraphError::BadOutputPort { endpoint })
    }
}

fn check_input<P: Program + ?Sized>(
    program: &mut P,
    count: u8,
    endpoint: Endpoint,
) -> Result<(), GraphError> {
    if endpoint.block >= count {
        return Err(GraphError::UnknownBlock {
            block: endpoint.block,
        });
    }
    let block = program
        .block_mut(endpoint.block)
        .ok_or(GraphError::UnknownBlock {
            block: endpoint.block,
        })?;
    if (endpoint.port as usize) < block.inputs().len() {
        Ok(())
    } else {
        Err(GraphError::BadInputPort { endpoint })
    }
}
