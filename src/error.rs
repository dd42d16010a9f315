//! # Error Types
//!
//! This module defines the error types used throughout the library.
//! All operations return [`Result<T, HermesError>`](HermesError) for comprehensive error handling.
//!
//! Stream errors carry the raw byte offset at which they were detected so a caller
//! can point at the exact spot in a capture.

use std::fmt;
use thiserror::Error;

/// The authenticated segment an [`HermesError::AuthenticationFailure`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    /// The challenge segment that establishes the session IV.
    Handshake,
    /// A data packet, numbered from 0 in stream order.
    Packet(u64),
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Handshake => f.write_str("handshake"),
            Self::Packet(index) => write!(f, "packet {index}"),
        }
    }
}

/// The error type for all Hermes stream operations.
///
/// Every variant except [`Io`](Self::Io) and [`Crypto`](Self::Crypto) is a
/// protocol-level failure of the stream being decoded. In the default
/// configuration all of them abort the session.
#[derive(Error, Debug)]
pub enum HermesError {
    /// I/O error from the underlying reader or writer.
    ///
    /// A caller that abandons a stream midway surfaces here, never as a clean end.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The stream ended inside a structure (escape pair, block, AuthCode, trailer).
    #[error("stream truncated at offset {offset:#x}: {context}")]
    Truncated { offset: u64, context: &'static str },

    /// An unexpected tag or value at a defined protocol point.
    #[error("protocol violation at offset {offset:#x}: {reason}")]
    ProtocolViolation { offset: u64, reason: &'static str },

    /// The claimed AuthCode does not match the computed one.
    #[error("bad authentication for {segment} at offset {offset:#x}")]
    AuthenticationFailure { offset: u64, segment: Segment },

    /// Escape marker followed by a value outside the defined range.
    #[error("unknown escape sequence 0x10 {value:#04x} at offset {offset:#x}")]
    UnknownEscape { offset: u64, value: u8 },

    /// Cryptographic support failure (e.g. the OS random source).
    #[error("Crypto error: {0}")]
    Crypto(String),
}

impl HermesError {
    /// Raw stream offset the error was detected at, if it is a stream error.
    #[must_use]
    pub const fn offset(&self) -> Option<u64> {
        match self {
            Self::Truncated { offset, .. }
            | Self::ProtocolViolation { offset, .. }
            | Self::AuthenticationFailure { offset, .. }
            | Self::UnknownEscape { offset, .. } => Some(*offset),
            Self::Io(_) | Self::Crypto(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_offset_and_segment() {
        let err = HermesError::AuthenticationFailure {
            offset: 0x40,
            segment: Segment::Packet(2),
        };
        assert_eq!(err.to_string(), "bad authentication for packet 2 at offset 0x40");
        assert_eq!(err.offset(), Some(0x40));
    }

    #[test]
    fn io_errors_have_no_offset() {
        let err = HermesError::from(std::io::Error::other("gone"));
        assert_eq!(err.offset(), None);
    }
}
