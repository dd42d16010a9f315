// ============================================================================
// FILE: src/utils.rs
// ============================================================================

//! Utility functions used across the library.

use subtle::ConstantTimeEq;

/// XORs two 16-byte blocks and writes the result to `output`.
///
/// Used by the counter-mode keystream in [`crate::crypto::cipher`].
///
/// # Panics (by contract)
///
/// Panics if any of the three slices is shorter than 16 bytes. All callers pass
/// `expose_secret()` views of 16-byte buffers.
#[inline(always)]
pub const fn xor_blocks(block_a: &[u8], block_b: &[u8], output: &mut [u8]) {
    let mut i = 0;
    while i < 16 {
        output[i] = block_a[i] ^ block_b[i];
        i += 1;
    }
}

/// Constant-time equality of two AuthCodes.
///
/// Any single differing byte makes the check fail.
#[must_use]
#[inline(never)]
pub fn auth_codes_match(computed: &[u8; 16], claimed: &[u8; 16]) -> bool {
    computed.ct_eq(claimed).into()
}

/// Increment a 16-byte counter block as a 128-bit big-endian integer (wrapping).
#[inline(always)]
pub fn increment_be128(counter: &mut [u8; 16]) {
    for byte in counter.iter_mut().rev() {
        let (next, carry) = byte.overflowing_add(1);
        *byte = next;
        if !carry {
            break;
        }
    }
}
