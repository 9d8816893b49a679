//! Board-agnostic dataflow runtime for the Rheos block system
//!
//! This crate contains everything that does not depend on specific
//! hardware:
//!
//! - Port values and the input/output port latches
//! - The `Block` trait and its all-inputs firing rule
//! - The program graph model (connections, validation)
//! - The bounded event engine that propagates values
//! - Subprogram composition (feature `alloc`)
//! - Parameter and manifest types exchanged over the monitor link
//!
//! Hardware-facing blocks live in `rheos-blocks`; the serial protocol in
//! `rheos-link`.

#![no_std]
#![deny(unsafe_code)]

#[cfg(feature = "alloc")]
extern crate alloc;

pub mod block;
pub mod config;
pub mod engine;
pub mod graph;
pub mod port;

#[cfg(feature = "alloc")]
pub mod subprogram;

pub use block::{Block, Fired, MAX_PORTS};
pub use engine::{Engine, EngineError, EngineStats};
pub use graph::{Connection, Endpoint, GraphError, Program};
pub use port::{InputPort, OutputPort, Value, ValueKind};
