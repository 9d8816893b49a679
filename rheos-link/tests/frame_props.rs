//! Property tests for the link frame layer
//!
//! The parser must recover any frame from a clean byte stream, survive
//! arbitrary garbage between frames, and never produce a frame whose
//! checksum did not verify.

use proptest::prelude::*;

use rheos_link::{Frame, FrameParser, FRAME_SYNC, MAX_PAYLOAD_LEN};

fn feed_all(parser: &mut FrameParser, bytes: &[u8]) -> Vec<Frame> {
    let mut frames = Vec::new();
    for &b in bytes {
        if let Ok(Some(frame)) = parser.advance(b) {
            frames.push(frame);
        }
    }
    frames
}

proptest! {
    /// Any payload round-trips through encode and the byte-wise parser.
    #[test]
    fn frame_roundtrip(
        msg_type in 0u8..=255,
        payload in prop::collection::vec(any::<u8>(), 0..=MAX_PAYLOAD_LEN),
    ) {
        let frame = Frame::new(msg_type, &payload).unwrap();
        let encoded = frame.encode_to_vec().unwrap();

        let mut parser = FrameParser::new();
        let frames = feed_all(&mut parser, &encoded);
        prop_assert_eq!(frames, vec![frame]);
    }

    /// Garbage between two frames never corrupts either frame, as long as
    /// the garbage contains no SYNC byte.
    #[test]
    fn parser_survives_interframe_noise(
        payload in prop::collection::vec(any::<u8>(), 0..16),
        noise in prop::collection::vec(any::<u8>().prop_filter("not sync", |b| *b != FRAME_SYNC), 0..32),
    ) {
        let frame = Frame::new(0x02, &payload).unwrap();
        let encoded = frame.encode_to_vec().unwrap();

        let mut stream = Vec::new();
        stream.extend_from_slice(&encoded);
        stream.extend_from_slice(&noise);
        stream.extend_from_slice(&encoded);

        let mut parser = FrameParser::new();
        let mut frames = Vec::new();
        for &b in &stream {
            // Noise may produce framing errors; they must not be fatal
            if let Ok(Some(f)) = parser.advance(b) {
                frames.push(f);
            }
        }
        prop_assert!(frames.len() >= 2);
        prop_assert_eq!(&frames[0], &frame);
        prop_assert_eq!(frames.last().unwrap(), &frame);
    }

    /// A corrupted checksum is always rejected, and the parser accepts
    /// the next clean copy of the same frame afterwards.
    #[test]
    fn corrupted_checksum_rejected_then_recovered(
        msg_type in 0u8..=255,
        payload in prop::collection::vec(any::<u8>(), 0..16),
        flip_bits in 1u8..=255,
    ) {
        let frame = Frame::new(msg_type, &payload).unwrap();
        let mut corrupted = frame.encode_to_vec().unwrap().to_vec();
        let last = corrupted.len() - 1;
        corrupted[last] ^= flip_bits;

        let mut parser = FrameParser::new();
        prop_assert!(feed_all(&mut parser, &corrupted).is_empty());

        let clean = frame.encode_to_vec().unwrap();
        let frames = feed_all(&mut parser, &clean);
        prop_assert_eq!(frames, vec![frame]);
    }
}
