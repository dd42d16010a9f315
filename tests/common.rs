//! tests/common.rs
//! Keys and stream builders shared across test files

use hermes_rs::aliases::Iv16;
use hermes_rs::{SessionKeys, StreamEncoder};

/// Encryption key used by the JSON vectors in `tests/vector/data/`.
#[allow(dead_code)] // Used across multiple test files
pub const TEST_ENCRYPTION_KEY: [u8; 32] = *b"Do not use this encryption key!\0";

/// Signature key used by the JSON vectors in `tests/vector/data/`.
#[allow(dead_code)] // Used across multiple test files
pub const TEST_SIGNATURE_KEY: [u8; 16] = *b"Or this key...\0\0";

#[allow(dead_code)] // Used across multiple test files
pub const TEST_PREAMBLE: &[u8] = b"HERMES test stream\r\n";

#[allow(dead_code)] // Used across multiple test files
pub const TEST_SESSION_IV: [u8; 16] = [
    0x5A, 0xA5, 0x10, 0x11, 0x12, 0x13, 0x00, 0xFF, 0x42, 0x24, 0x81, 0x18, 0x7E, 0xE7, 0x3C, 0xC3,
];

#[allow(dead_code)] // Used across multiple test files
pub const TEST_IV_FRAGMENT: [u8; 8] = [0xB0, 0xB1, 0xB2, 0xB3, 0xB4, 0xB5, 0xB6, 0xB7];

#[allow(dead_code)] // Used across multiple test files
pub fn test_keys() -> SessionKeys {
    SessionKeys::new(TEST_ENCRYPTION_KEY, TEST_SIGNATURE_KEY)
}

/// A fully encoded stream plus the raw offsets where each segment ends.
#[allow(dead_code)] // Used across multiple test files
pub struct EncodedStream {
    pub bytes: Vec<u8>,
    /// Raw offset right after the handshake.
    pub handshake_end: usize,
    /// Raw offset right after each packet.
    pub packet_ends: Vec<usize>,
}

/// Encode a preamble, a deterministic handshake and `packets` with the test keys.
#[allow(dead_code)] // Used across multiple test files
pub fn encode_session(initial_counter: u64, packets: &[&[u8]]) -> EncodedStream {
    let mut encoder = StreamEncoder::new(Vec::new(), test_keys());
    encoder.write_preamble(TEST_PREAMBLE).unwrap();
    encoder
        .write_handshake(
            initial_counter,
            TEST_IV_FRAGMENT,
            &Iv16::new(TEST_SESSION_IV),
            [0xAB, 0xCD],
        )
        .unwrap();
    let handshake_end = encoder.bytes_written() as usize;

    let mut packet_ends = Vec::with_capacity(packets.len());
    for payload in packets {
        encoder.write_packet(payload).unwrap();
        packet_ends.push(encoder.bytes_written() as usize);
    }

    EncodedStream {
        bytes: encoder.into_inner().unwrap(),
        handshake_end,
        packet_ends,
    }
}

/// Flip the lowest bit of the last AuthCode byte of the segment ending at `segment_end`.
///
/// That byte is either a raw byte outside `0x10..=0x13` or the second half of an
/// escape pair, so the result is still well framed but carries a different AuthCode.
#[allow(dead_code)] // Used across multiple test files
pub fn corrupt_auth_code(stream: &mut [u8], segment_end: usize) {
    stream[segment_end - 3] ^= 0x01;
}

/// Deterministic filler that exercises every escaped value.
#[allow(dead_code)] // Used across multiple test files
pub fn patterned_payload(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i * 7 + 0x10) as u8).collect()
}
