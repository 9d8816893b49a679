//! Message types for the monitor link
//!
//! Two directions:
//! - Target → host: program identity, fired-output traces, engine
//!   statistics, parameter readbacks
//! - Host → target: liveness ping, parameter writes and reads
//!
//! Bodies are postcard-encoded `rheos-core` types carried in a
//! [`Frame`] payload.

use serde::{Deserialize, Serialize};

use rheos_core::config::{Manifest, ParamRequest, ParamUpdate};
use rheos_core::engine::EngineStats;
use rheos_core::port::Value;

use crate::frame::{Frame, FrameError, MAX_PAYLOAD_LEN};

// Message type IDs: target -> host
pub const MSG_HELLO: u8 = 0x01;
pub const MSG_TRACE: u8 = 0x02;
pub const MSG_STATS: u8 = 0x03;
pub const MSG_PARAM_VALUE: u8 = 0x04;

// Message type IDs: host -> target
pub const MSG_PING: u8 = 0x10;
pub const MSG_SET_PARAM: u8 = 0x11;
pub const MSG_GET_PARAM: u8 = 0x12;

/// Errors at the message layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkError {
    /// Framing problem
    Frame(FrameError),
    /// Payload did not decode as the expected type
    Codec,
    /// Frame type byte is not a known message
    UnknownType(u8),
}

impl From<FrameError> for LinkError {
    fn from(e: FrameError) -> Self {
        LinkError::Frame(e)
    }
}

/// One fired output, for live graph visualization
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TraceEvent {
    /// Block index
    pub block: u8,
    /// Output port index
    pub port: u8,
    /// Value the port fired with
    pub value: Value,
}

/// Messages from the target to the host
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TargetMessage {
    /// Program identity; also the answer to a ping
    Hello(Manifest),
    /// A fired output
    Trace(TraceEvent),
    /// Engine counters
    Stats(EngineStats),
    /// Parameter readback
    ParamValue(ParamUpdate),
}

impl TargetMessage {
    /// Encode this message into a frame
    pub fn to_frame(&self) -> Result<Frame, LinkError> {
        match self {
            TargetMessage::Hello(manifest) => encode_frame(MSG_HELLO, manifest),
            TargetMessage::Trace(event) => encode_frame(MSG_TRACE, event),
            TargetMessage::Stats(stats) => encode_frame(MSG_STATS, stats),
            TargetMessage::ParamValue(update) => encode_frame(MSG_PARAM_VALUE, update),
        }
    }

    /// Decode a received frame
    pub fn from_frame(frame: &Frame) -> Result<Self, LinkError> {
        match frame.msg_type {
            MSG_HELLO => Ok(TargetMessage::Hello(decode_payload(frame)?)),
            MSG_TRACE => Ok(TargetMessage::Trace(decode_payload(frame)?)),
            MSG_STATS => Ok(TargetMessage::Stats(decode_payload(frame)?)),
            MSG_PARAM_VALUE => Ok(TargetMessage::ParamValue(decode_payload(frame)?)),
            other => Err(LinkError::UnknownType(other)),
        }
    }
}

/// Messages from the host to the target
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HostMessage {
    /// Liveness check; the target answers with `Hello`
    Ping,
    /// Write one block parameter
    SetParam(ParamUpdate),
    /// Read one block parameter
    GetParam(ParamRequest),
}

impl HostMessage {
    /// Encode this message into a frame
    pub fn to_frame(&self) -> Result<Frame, LinkError> {
        match self {
            HostMessage::Ping => Ok(Frame::empty(MSG_PING)),
            HostMessage::SetParam(update) => encode_frame(MSG_SET_PARAM, update),
            HostMessage::GetParam(request) => encode_frame(MSG_GET_PARAM, request),
        }
    }

    /// Decode a received frame
    pub fn from_frame(frame: &Frame) -> Result<Self, LinkError> {
        match frame.msg_type {
            MSG_PING => Ok(HostMessage::Ping),
            MSG_SET_PARAM => Ok(HostMessage::SetParam(decode_payload(frame)?)),
            MSG_GET_PARAM => Ok(HostMessage::GetParam(decode_payload(frame)?)),
            other => Err(LinkError::UnknownType(other)),
        }
    }
}

fn encode_frame<T: Serialize>(msg_type: u8, body: &T) -> Result<Frame, LinkError> {
    let mut buf = [0u8; MAX_PAYLOAD_LEN];
    let used = postcard::to_slice(body, &mut buf).map_err(|_| LinkError::Codec)?;
    Ok(Frame::new(msg_type, used)?)
}

fn decode_payload<'a, T: Deserialize<'a>>(frame: &'a Frame) -> Result<T, LinkError> {
    postcard::from_bytes(&frame.payload).map_err(|_| LinkError::Codec)
}
