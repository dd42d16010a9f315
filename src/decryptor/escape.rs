//! src/decryptor/escape.rs
//! Escape decoder: raw stream bytes → logical events

use crate::consts::{ESCAPE_AUTH_TRIGGER, ESCAPE_LITERAL_MAX, ESCAPE_MARKER};
use crate::decryptor::read::ByteSource;
use crate::error::HermesError;
use std::io::Read;

/// One decoded stream unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalByte {
    /// A data byte, either sent raw or as `0x10 n` for `0x10 + n`.
    Plain(u8),
    /// `0x10 0x04`: the current authenticated segment ends here.
    EndOfAuthSegment,
    /// `0x10 n` with `n` outside the defined range; carries `n`.
    Unknown(u8),
}

/// Resolves the `0x10` escape convention over a [`ByteSource`].
///
/// - any byte other than `0x10` → `Plain(byte)`
/// - `0x10 0x04` → `EndOfAuthSegment`
/// - `0x10 n` (n ≤ 3) → `Plain(0x10 + n)`
/// - `0x10 n` (otherwise) → `Unknown(n)`
#[derive(Debug)]
pub struct EscapeDecoder<R> {
    source: ByteSource<R>,
}

impl<R: Read> EscapeDecoder<R> {
    #[must_use]
    pub const fn new(reader: R) -> Self {
        Self {
            source: ByteSource::new(reader),
        }
    }

    /// Next logical event, or `None` at a clean end of stream.
    ///
    /// A stream ending between the marker and its payload is [`HermesError::Truncated`].
    pub fn next_logical_byte(&mut self) -> Result<Option<LogicalByte>, HermesError> {
        let Some(raw) = self.source.read_byte()? else {
            return Ok(None);
        };
        if raw != ESCAPE_MARKER {
            return Ok(Some(LogicalByte::Plain(raw)));
        }

        let Some(code) = self.source.read_byte()? else {
            return Err(HermesError::Truncated {
                offset: self.source.offset(),
                context: "escape pair",
            });
        };

        Ok(Some(match code {
            ESCAPE_AUTH_TRIGGER => LogicalByte::EndOfAuthSegment,
            0..=ESCAPE_LITERAL_MAX => LogicalByte::Plain(ESCAPE_MARKER + code),
            other => LogicalByte::Unknown(other),
        }))
    }

    /// Raw access for bytes that bypass escape decoding (preamble, delimiters).
    #[inline(always)]
    pub fn source_mut(&mut self) -> &mut ByteSource<R> {
        &mut self.source
    }

    #[inline(always)]
    pub const fn offset(&self) -> u64 {
        self.source.offset()
    }
}

impl<R: Read> Iterator for EscapeDecoder<R> {
    type Item = Result<LogicalByte, HermesError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_logical_byte().transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn decode(bytes: &[u8]) -> Vec<LogicalByte> {
        EscapeDecoder::new(Cursor::new(bytes.to_vec()))
            .collect::<Result<_, _>>()
            .unwrap()
    }

    #[test]
    fn escaped_literals_resolve() {
        assert_eq!(
            decode(&[0x10, 0x00, 0x10, 0x01, 0x10, 0x02, 0x10, 0x03]),
            vec![
                LogicalByte::Plain(0x10),
                LogicalByte::Plain(0x11),
                LogicalByte::Plain(0x12),
                LogicalByte::Plain(0x13),
            ]
        );
    }

    #[test]
    fn trigger_and_unknown() {
        assert_eq!(
            decode(&[0x41, 0x10, 0x04, 0x10, 0x7F]),
            vec![
                LogicalByte::Plain(0x41),
                LogicalByte::EndOfAuthSegment,
                LogicalByte::Unknown(0x7F),
            ]
        );
    }

    #[test]
    fn dangling_marker_is_truncation() {
        let mut decoder = EscapeDecoder::new(Cursor::new(vec![0x41, 0x10]));
        assert_eq!(decoder.next_logical_byte().unwrap(), Some(LogicalByte::Plain(0x41)));
        match decoder.next_logical_byte() {
            Err(HermesError::Truncated { offset, .. }) => assert_eq!(offset, 2),
            other => panic!("expected truncation, got {other:?}"),
        }
    }
}
