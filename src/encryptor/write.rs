//! src/encryptor/write.rs
//! Wire write helpers: raw bytes, escaped logical bytes, the auth trigger

use crate::consts::{ESCAPED_RANGE, ESCAPE_AUTH_TRIGGER, ESCAPE_MARKER};
use crate::error::HermesError;
use std::io::Write;

/// Write bytes verbatim (tags, delimiters, preamble). Returns the count written.
#[inline]
pub fn write_raw<W: Write>(writer: &mut W, data: &[u8]) -> Result<u64, HermesError> {
    writer.write_all(data).map_err(HermesError::Io)?;
    Ok(data.len() as u64)
}

/// Write one logical byte, escaping `0x10..=0x13` as `0x10, v - 0x10`.
#[inline]
pub fn write_escaped<W: Write>(writer: &mut W, byte: u8) -> Result<u64, HermesError> {
    if ESCAPED_RANGE.contains(&byte) {
        write_raw(writer, &[ESCAPE_MARKER, byte - ESCAPE_MARKER])
    } else {
        write_raw(writer, &[byte])
    }
}

/// Write a run of logical bytes with escaping.
#[inline]
pub fn write_escaped_all<W: Write>(writer: &mut W, data: &[u8]) -> Result<u64, HermesError> {
    let mut written = 0;
    for &byte in data {
        written += write_escaped(writer, byte)?;
    }
    Ok(written)
}

/// Write the `0x10 0x04` end-of-segment trigger.
#[inline]
pub fn write_auth_trigger<W: Write>(writer: &mut W) -> Result<u64, HermesError> {
    write_raw(writer, &[ESCAPE_MARKER, ESCAPE_AUTH_TRIGGER])
}
