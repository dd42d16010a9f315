// src/encryptor/mod.rs

//! Session stream encoding.
//!
//! Core API: [`StreamEncoder`]: preamble, handshake, then packets.
//! Utility: `write_escaped(writer, byte)?` and friends for raw wire writes.

pub(crate) mod encoder;
pub(crate) mod write;

pub use encoder::StreamEncoder;
pub use write::{write_auth_trigger, write_escaped, write_escaped_all, write_raw};
