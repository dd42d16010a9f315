// src/lib.rs

//! Decoder for the Hermes session stream: an escape-framed byte stream carrying one
//! handshake (which establishes an encrypted session IV) followed by independently
//! authenticated, encrypted data packets.
//!
//! ```text
//! raw bytes → EscapeDecoder → AuthReader (segment MAC) → BlockReader → CipherSession
//!                                                                   ↘ SessionDecoder
//! ```

pub mod aliases;
#[cfg(feature = "batch-ops")]
pub mod batch_ops;
pub mod builders;
pub mod consts;
pub mod crypto;
pub mod decryptor;
pub mod encryptor;
pub mod error;
pub mod keys;
pub mod utils;

// High-level API
pub use builders::decoder_builder::{AuthFailurePolicy, DecoderBuilder, EscapePolicy};
pub use decryptor::{decrypt, DecodeStats, Handshake, Packet, SessionDecoder};
pub use encryptor::StreamEncoder;
pub use error::{HermesError, Segment};
pub use keys::SessionKeys;

#[cfg(feature = "batch-ops")]
pub use batch_ops::decrypt_batch;
