//! Parameter and manifest types
//!
//! Board-agnostic types exchanged with host tools over the monitor link,
//! encoded as postcard binary data.

pub mod types;

pub use types::*;
