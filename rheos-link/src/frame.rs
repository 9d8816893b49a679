//! Frame encoding and incremental parsing
//!
//! Frame format:
//! - SYNC (1 byte): 0xC9 synchronization byte
//! - LEN (1 byte): payload length (0-58)
//! - TYPE (1 byte): message type identifier
//! - PAYLOAD (0-58 bytes): postcard-encoded message body
//! - CHECKSUM (1 byte): XOR of LEN, TYPE, and all PAYLOAD bytes

use heapless::Vec;

/// Frame synchronization byte
pub const FRAME_SYNC: u8 = 0xC9;

/// Maximum payload size in bytes
pub const MAX_PAYLOAD_LEN: usize = 58;

/// Maximum complete frame size (SYNC + LEN + TYPE + payload + CHECKSUM)
pub const MAX_FRAME_LEN: usize = 4 + MAX_PAYLOAD_LEN;

/// Errors during frame encoding or parsing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// Payload exceeds [`MAX_PAYLOAD_LEN`]
    PayloadTooLarge,
    /// Received checksum does not match the computed one
    ChecksumMismatch,
    /// Declared length exceeds [`MAX_PAYLOAD_LEN`]
    BadLength,
    /// Encode buffer too small for the frame
    BufferTooSmall,
}

/// A parsed or constructed frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Message type identifier
    pub msg_type: u8,
    /// Payload bytes
    pub payload: Vec<u8, MAX_PAYLOAD_LEN>,
}

impl Frame {
    /// Create a frame with the given type and payload
    pub fn new(msg_type: u8, payload: &[u8]) -> Result<Self, FrameError> {
        let mut p = Vec::new();
        p.extend_from_slice(payload)
            .map_err(|_| FrameError::PayloadTooLarge)?;
        Ok(Self {
            msg_type,
            payload: p,
        })
    }

    /// Create a frame with no payload
    pub fn empty(msg_type: u8) -> Self {
        Self {
            msg_type,
            payload: Vec::new(),
        }
    }

    fn checksum(len: u8, msg_type: u8, payload: &[u8]) -> u8 {
        let mut sum = len ^ msg_type;
        for &b in payload {
            sum ^= b;
        }
        sum
    }

    /// Encode into a byte buffer, returning the number of bytes written
    pub fn encode(&self, buffer: &mut [u8]) -> Result<usize, FrameError> {
        let total = 4 + self.payload.len();
        if buffer.len() < total {
            return Err(FrameError::BufferTooSmall);
        }

        let len = self.payload.len() as u8;
        buffer[0] = FRAME_SYNC;
        buffer[1] = len;
        buffer[2] = self.msg_type;
        buffer[3..3 + self.payload.len()].copy_from_slice(&self.payload);
        buffer[3 + self.payload.len()] = Self::checksum(len, self.msg_type, &self.payload);

        Ok(total)
    }

    /// Encode into an owned heapless buffer
    pub fn encode_to_vec(&self) -> Result<Vec<u8, MAX_FRAME_LEN>, FrameError> {
        let mut buffer = [0u8; MAX_FRAME_LEN];
        let len = self.encode(&mut buffer)?;
        let mut out = Vec::new();
        out.extend_from_slice(&buffer[..len])
            .map_err(|_| FrameError::BufferTooSmall)?;
        Ok(out)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    /// Hunting for the SYNC byte
    Sync,
    /// Expecting the length byte
    Len,
    /// Expecting the type byte
    Type,
    /// Collecting payload bytes
    Payload,
    /// Expecting the checksum byte
    Checksum,
}

/// Incremental frame parser
///
/// Feed received bytes one at a time; a completed frame is returned from
/// [`advance`](FrameParser::advance). After any error the parser drops
/// back to hunting for the next SYNC byte, so a corrupted frame costs at
/// most one error before resynchronization.
#[derive(Debug, Clone)]
pub struct FrameParser {
    state: ParseState,
    msg_type: u8,
    expected_len: u8,
    buffer: Vec<u8, MAX_PAYLOAD_LEN>,
}

impl Default for FrameParser {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameParser {
    /// Create a parser hunting for SYNC
    pub fn new() -> Self {
        Self {
            state: ParseState::Sync,
            msg_type: 0,
            expected_len: 0,
            buffer: Vec::new(),
        }
    }

    /// Drop any partial frame and hunt for the next SYNC byte
    pub fn reset(&mut self) {
        self.state = ParseState::Sync;
        self.buffer.clear();
    }

    /// Consume one received byte
    ///
    /// Returns `Ok(Some(frame))` when a complete, checksum-valid frame
    /// has been assembled.
    pub fn advance(&mut self, byte: u8) -> Result<Option<Frame>, FrameError> {
        match self.state {
            ParseState::Sync => {
                if byte == FRAME_SYNC {
                    self.buffer.clear();
                    self.state = ParseState::Len;
                }
                Ok(None)
            }
            ParseState::Len => {
                if byte as usize > MAX_PAYLOAD_LEN {
                    self.reset();
                    return Err(FrameError::BadLength);
                }
                self.expected_len = byte;
                self.state = ParseState::Type;
                Ok(None)
            }
            ParseState::Type => {
                self.msg_type = byte;
                self.state = if self.expected_len == 0 {
                    ParseState::Checksum
                } else {
                    ParseState::Payload
                };
                Ok(None)
            }
            ParseState::Payload => {
                // Length is pre-checked, push cannot fail
                let _ = self.buffer.push(byte);
                if self.buffer.len() == self.expected_len as usize {
                    self.state = ParseState::Checksum;
                }
                Ok(None)
            }
            ParseState::Checksum => {
                let expected = Frame::checksum(self.expected_len, self.msg_type, &self.buffer);
                if byte != expected {
                    self.reset();
                    return Err(FrameError::ChecksumMismatch);
                }
                let frame = Frame {
                    msg_type: self.msg_type,
                    payload: self.buffer.clone(),
                };
                self.reset();
                Ok(Some(frame))
            }
        }
    }
}
