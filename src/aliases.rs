//! # Secure-Gate Type Aliases
//!
//! This module provides type aliases for secure memory management using [`secure-gate`](https://github.com/Slurp9187/secure-gate).
//! Every key, IV, block and AuthCode in the session pipeline lives in one of these buffers,
//! which are zeroized on drop and only readable through `.expose_secret()`.
//!
//! ## Type Categories
//!
//! ### MAC Primitive
//! - [`HmacSha256`] - HMAC-SHA256 behind the default per-segment AuthCode
//!
//! ### Generic Secure Buffers
//! - [`SpanBuffer<N>`] - Generic secure stack buffer for any size `N`
//!
//! ### Semantic Fixed-Size Types
//! - [`Block16`] - one 16-byte cipher block
//! - [`AuthCode16`] - 16-byte segment AuthCode (computed or claimed)
//! - [`Iv16`] - 16-byte master or session IV
//! - [`EncryptionKey32`] - 32-byte long-term cipher key
//! - [`SignatureKey16`] - 16-byte long-term MAC key

use hmac::Hmac;
use sha2::Sha256;

pub type HmacSha256 = Hmac<Sha256>;

// ─────────────────────────────────────────────────────────────────────────────
// SpanBuffer: generic secure stack buffer (direct alias to secure-gate's Fixed)
// ─────────────────────────────────────────────────────────────────────────────
pub type SpanBuffer<const N: usize> = secure_gate::Fixed<[u8; N]>;

// Semantic sub-types: compile-time safe
pub type Block16 = SpanBuffer<16>; // one cipher block
pub type AuthCode16 = SpanBuffer<16>; // segment AuthCode
pub type Iv16 = SpanBuffer<16>; // master IV, session IV
pub type EncryptionKey32 = SpanBuffer<32>; // long-term cipher key
pub type SignatureKey16 = SpanBuffer<16>; // long-term MAC key
