//! Parameter update and program manifest definitions

use heapless::String;

use crate::port::Value;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maximum program name length
pub const MAX_NAME_LEN: usize = 16;

/// A live update to one tunable block parameter
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ParamUpdate {
    /// Block index within the program
    pub block: u8,
    /// Parameter index within the block
    pub index: u8,
    /// New parameter value
    pub value: Value,
}

/// A request to read one tunable block parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ParamRequest {
    /// Block index within the program
    pub block: u8,
    /// Parameter index within the block
    pub index: u8,
}

/// Identity of the flashed program
///
/// Lets a host tool match a running target against the graph description
/// it was generated from before trusting block/port indices.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Manifest {
    /// Program name
    pub name: String<MAX_NAME_LEN>,
    /// Program revision
    pub version: u16,
    /// Number of blocks in the graph
    pub block_count: u8,
    /// Number of connections in the graph
    pub connection_count: u8,
}

impl Manifest {
    /// Create a manifest, truncating the name to [`MAX_NAME_LEN`]
    pub fn new(name: &str, version: u16, block_count: u8, connection_count: u8) -> Self {
        let mut n = String::new();
        for c in name.chars() {
            if n.push(c).is_err() {
                break;
            }
        }
        Self {
            name: n,
            version,
            block_count,
            connection_count,
        }
    }
}

#[cfg(feature = "serde")]
mod wire {
    use super::*;

    impl ParamUpdate {
        /// Encode as postcard into `buf`, returning the used prefix
        pub fn encode<'a>(&self, buf: &'a mut [u8]) -> postcard::Result<&'a mut [u8]> {
            postcard::to_slice(self, buf)
        }

        /// Decode from postcard bytes
        pub fn decode(bytes: &[u8]) -> postcard::Result<Self> {
            postcard::from_bytes(bytes)
        }
    }

    impl ParamRequest {
        /// Encode as postcard into `buf`, returning the used prefix
        pub fn encode<'a>(&self, buf: &'a mut [u8]) -> postcard::Result<&'a mut [u8]> {
            postcard::to_slice(self, buf)
        }

        /// Decode from postcard bytes
        pub fn decode(bytes: &[u8]) -> postcard::Result<Self> {
            postcard::from_bytes(bytes)
        }
    }

    impl Manifest {
        /// Encode as postcard into `buf`, returning the used prefix
        pub fn encode<'a>(&self, buf: &'a mut [u8]) -> postcard::Result<&'a mut [u8]> {
            postcard::to_slice(self, buf)
        }

        /// Decode from postcard bytes
        pub fn decode(bytes: &[u8]) -> postcard::Result<Self> {
            postcard::from_bytes(bytes)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_truncates_name() {
        let m = Manifest::new("a-very-long-program-name", 1, 4, 3);
        assert_eq!(m.name.len(), MAX_NAME_LEN);
        assert_eq!(m.name.as_str(), "a-very-long-prog");
    }

    #[test]
    fn test_param_update_roundtrip() {
        let update = ParamUpdate {
            block: 2,
            index: 0,
            value: Value::Float(3.5),
        };
        let mut buf = [0u8; 16];
        let used = update.encode(&mut buf).unwrap();
        assert_eq!(ParamUpdate::decode(used).unwrap(), update);
    }

    #[test]
    fn test_manifest_roundtrip() {
        let m = Manifest::new("blink", 3, 4, 3);
        let mut buf = [0u8; 32];
        let used = m.encode(&mut buf).unwrap();
        assert_eq!(Manifest::decode(used).unwrap(), m);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(Manifest::decode(&[0xFF; 3]).is_err());
    }
}
