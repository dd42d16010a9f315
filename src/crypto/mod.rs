// src/crypto/mod.rs

//! Cryptographic primitives behind the session pipeline.
//!
//! The decoder is generic over two seams:
//! - [`BlockTransform`]: the 16-byte block cipher transform (default [`Aes256Ctr`])
//! - [`SegmentMac`]: the per-segment keyed MAC (default [`HmacSha256Mac`])
//!
//! [`CipherSession`] owns the long-term key plus the current IV state and is the
//! only thing the protocol layer talks to for decryption.

pub mod cipher;
pub mod mac;
pub mod rng;

pub use cipher::{Aes256Ctr, BlockTransform, CipherSession};
pub use mac::{HmacSha256Mac, SegmentMac};
