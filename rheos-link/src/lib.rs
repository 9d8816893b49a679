//! Monitor and tuning link for Rheos targets
//!
//! A UART-friendly protocol between a running block program and a host
//! tool: the target streams fired-output traces and engine statistics,
//! the host reads and writes block parameters live.
//!
//! # Frame format
//!
//! ```text
//! ┌──────┬─────┬──────┬────────────┬──────────┐
//! │ SYNC │ LEN │ TYPE │ PAYLOAD    │ CHECKSUM │
//! │ 1B   │ 1B  │ 1B   │ 0–58B      │ 1B       │
//! └──────┴─────┴──────┴────────────┴──────────┘
//! ```
//!
//! The checksum is the XOR of LEN, TYPE and all payload bytes. Payloads
//! are postcard-encoded `rheos-core` types, so the message layer stays in
//! lockstep with the runtime's own serialization.

#![no_std]
#![deny(unsafe_code)]

pub mod frame;
pub mod messages;

pub use frame::{Frame, FrameError, FrameParser, FRAME_SYNC, MAX_PAYLOAD_LEN};
pub use messages::{HostMessage, LinkError, TargetMessage, TraceEvent};
