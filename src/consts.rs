//! # Constants
//!
//! Wire-level constants of the Hermes session stream: control tags, the escape
//! convention, and the fixed block/AuthCode geometry.

/// Size of one cipher block and of every fixed-width field on the wire.
pub const BLOCK_SIZE: usize = 16;

/// Size of a segment AuthCode.
pub const AUTH_CODE_SIZE: usize = 16;

/// Raw byte that introduces a two-byte escape unit.
pub const ESCAPE_MARKER: u8 = 0x10;

/// Escape payload that ends the current authenticated segment (`0x10 0x04`).
pub const ESCAPE_AUTH_TRIGGER: u8 = 0x04;

/// Largest escape payload that encodes a literal (`0x10 n` → `0x10 + n`).
pub const ESCAPE_LITERAL_MAX: u8 = 0x03;

/// Logical values that must travel escaped (`0x10..=0x13`).
pub const ESCAPED_RANGE: core::ops::RangeInclusive<u8> =
    ESCAPE_MARKER..=ESCAPE_MARKER + ESCAPE_LITERAL_MAX;

/// Number of reserved ("available") bytes in the challenge segment.
pub const RESERVED_FIELD_SIZE: usize = 2;

/// Raw delimiter bytes discarded after the handshake end tag.
pub const HANDSHAKE_TRAILING_BYTES: usize = 1;

/// Raw delimiter bytes discarded after each packet AuthCode.
pub const PACKET_TRAILING_BYTES: usize = 2;

/// Default upper bound on the plaintext of a single packet (1 MiB).
///
/// Packets are buffered until authenticated, so this bounds decoder memory.
pub const DEFAULT_MAX_PACKET_LEN: usize = 1024 * 1024;

/// Stream-level control tags recognised by the session protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ControlTag {
    /// Ends the preamble and the handshake; also used as the doubled delimiter.
    SegmentEnd = 0x12,
    /// Opens the handshake segment.
    Challenge = 23,
    /// Opens every data packet.
    RawPacket = 31,
}

impl ControlTag {
    #[inline(always)]
    pub const fn byte(self) -> u8 {
        self as u8
    }

    /// Map a logical byte back to a tag, if it is one.
    pub const fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0x12 => Some(Self::SegmentEnd),
            23 => Some(Self::Challenge),
            31 => Some(Self::RawPacket),
            _ => None,
        }
    }
}
