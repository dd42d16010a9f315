// src/decryptor/mod.rs

//! Session stream decoding.
//!
//! Layers, leaf first:
//! - [`ByteSource`]: raw bytes with offset tracking
//! - [`EscapeDecoder`]: `0x10` escape convention → [`LogicalByte`]
//! - [`AuthReader`]: feeds data bytes to the segment MAC, finalizes on the trigger
//! - [`BlockReader`]: 16-byte blocks; a short block marks the end of a segment
//! - [`SessionDecoder`]: handshake + packet loop state machine
//!
//! Core API: `decrypt(input, output, &keys)?` for whole streams.

pub(crate) mod auth;
pub(crate) mod block;
pub(crate) mod decoder;
pub(crate) mod decrypt;
pub(crate) mod escape;
pub(crate) mod read;
pub(crate) mod session;
pub(crate) mod stream;

pub use auth::{AuthEvent, AuthReader};
pub use block::{BlockRead, BlockReader, Signal};
pub use decoder::{DecodeStats, SessionDecoder};
pub use decrypt::decrypt;
pub use escape::{EscapeDecoder, LogicalByte};
pub use read::ByteSource;
pub use session::{Handshake, SessionPhase};
pub use stream::Packet;
