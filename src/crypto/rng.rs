// src/crypto/rng.rs
//! OS randomness for fresh handshake material (counter, IV fragment, session IV).

use crate::aliases::SpanBuffer;
use crate::error::HermesError;
use rand::{rngs::OsRng, TryRngCore};

/// Fill a fresh secure buffer from the OS random source.
pub fn random_span<const N: usize>() -> Result<SpanBuffer<N>, HermesError> {
    let mut buf = SpanBuffer::new([0u8; N]);
    OsRng
        .try_fill_bytes(buf.expose_secret_mut())
        .map_err(|e| HermesError::Crypto(format!("OS random source failed: {e}")))?;
    Ok(buf)
}

/// Random 64-bit starting value for the segment counter.
pub fn random_counter() -> Result<u64, HermesError> {
    let bytes = random_span::<8>()?;
    Ok(u64::from_le_bytes(*bytes.expose_secret()))
}
