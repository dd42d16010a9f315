//! src/decryptor/block.rs
//! Block assembler: groups authenticated logical bytes into 16-byte blocks

use crate::aliases::{AuthCode16, Block16};
use crate::builders::decoder_builder::EscapePolicy;
use crate::consts::BLOCK_SIZE;
use crate::crypto::SegmentMac;
use crate::decryptor::auth::{AuthEvent, AuthReader};
use crate::decryptor::read::ByteSource;
use crate::error::HermesError;
use std::io::Read;
use tracing::warn;

/// A logical unit after the escape policy has been applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Byte(u8),
    SegmentEnd,
}

/// Up to 16 bytes collected before the block filled or the segment ended.
///
/// `len() < 16` means the auth trigger arrived first: end of payload, trailer follows.
pub struct BlockRead {
    block: Block16,
    len: usize,
}

impl BlockRead {
    #[inline(always)]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[inline(always)]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline(always)]
    #[must_use]
    pub const fn is_full(&self) -> bool {
        self.len == BLOCK_SIZE
    }

    /// The collected bytes (the first `len()` bytes of the block).
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.block.expose_secret()[..self.len]
    }

    /// The whole 16-byte buffer; bytes past `len()` are zero.
    #[must_use]
    pub fn into_block(self) -> Block16 {
        self.block
    }
}

/// Pulls blocks and single bytes out of an [`AuthReader`], enforcing the escape policy.
pub struct BlockReader<R, M> {
    auth: AuthReader<R, M>,
    escape_policy: EscapePolicy,
    skipped_escapes: u64,
}

impl<R: Read, M: SegmentMac> BlockReader<R, M> {
    #[must_use]
    pub fn new(auth: AuthReader<R, M>, escape_policy: EscapePolicy) -> Self {
        Self {
            auth,
            escape_policy,
            skipped_escapes: 0,
        }
    }

    /// Next byte or segment end; `None` at a clean end of stream.
    pub fn next_signal(&mut self) -> Result<Option<Signal>, HermesError> {
        loop {
            match self.auth.next_event()? {
                None => return Ok(None),
                Some(AuthEvent::Byte(byte)) => return Ok(Some(Signal::Byte(byte))),
                Some(AuthEvent::SegmentEnd) => return Ok(Some(Signal::SegmentEnd)),
                Some(AuthEvent::Unknown(value)) => {
                    let offset = self.auth.offset();
                    match self.escape_policy {
                        EscapePolicy::Reject => {
                            return Err(HermesError::UnknownEscape { offset, value })
                        }
                        EscapePolicy::Skip => {
                            warn!(offset, value, "skipping unknown escape sequence");
                            self.skipped_escapes += 1;
                        }
                    }
                }
            }
        }
    }

    /// Next data byte; end of stream or a segment end here is an error.
    pub fn next_data_byte(&mut self, context: &'static str) -> Result<u8, HermesError> {
        match self.next_signal()? {
            Some(Signal::Byte(byte)) => Ok(byte),
            Some(Signal::SegmentEnd) => Err(HermesError::ProtocolViolation {
                offset: self.offset(),
                reason: context,
            }),
            None => Err(self.truncated(context)),
        }
    }

    /// Collect up to 16 bytes; stops early at a segment end.
    ///
    /// Running out of stream before the block completes is always
    /// [`HermesError::Truncated`], never a short block.
    pub fn next_block(&mut self, context: &'static str) -> Result<BlockRead, HermesError> {
        let mut block = Block16::new([0u8; BLOCK_SIZE]);
        let mut len = 0;
        while len < BLOCK_SIZE {
            match self.next_signal()? {
                Some(Signal::Byte(byte)) => {
                    block.expose_secret_mut()[len] = byte;
                    len += 1;
                }
                Some(Signal::SegmentEnd) => break,
                None => return Err(self.truncated(context)),
            }
        }
        Ok(BlockRead { block, len })
    }

    /// A block that must be complete (challenge fields, AuthCodes).
    pub fn next_full_block(&mut self, context: &'static str) -> Result<Block16, HermesError> {
        let read = self.next_block(context)?;
        if !read.is_full() {
            return Err(HermesError::ProtocolViolation {
                offset: self.offset(),
                reason: context,
            });
        }
        Ok(read.into_block())
    }

    #[inline(always)]
    pub fn begin_segment(&mut self) {
        self.auth.begin_segment();
    }

    #[inline(always)]
    pub const fn counter(&self) -> u64 {
        self.auth.counter()
    }

    #[inline(always)]
    pub fn set_counter(&mut self, counter: u64) {
        self.auth.set_counter(counter);
    }

    #[inline(always)]
    pub fn take_computed(&mut self) -> Option<AuthCode16> {
        self.auth.take_computed()
    }

    #[inline(always)]
    pub fn source_mut(&mut self) -> &mut ByteSource<R> {
        self.auth.source_mut()
    }

    #[inline(always)]
    pub const fn offset(&self) -> u64 {
        self.auth.offset()
    }

    #[inline(always)]
    pub const fn skipped_escapes(&self) -> u64 {
        self.skipped_escapes
    }

    fn truncated(&self, context: &'static str) -> HermesError {
        HermesError::Truncated {
            offset: self.offset(),
            context,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aliases::SignatureKey16;
    use crate::crypto::HmacSha256Mac;
    use crate::decryptor::escape::EscapeDecoder;
    use std::io::Cursor;

    fn blocks(bytes: &[u8], policy: EscapePolicy) -> BlockReader<Cursor<Vec<u8>>, HmacSha256Mac> {
        let auth = AuthReader::new(
            EscapeDecoder::new(Cursor::new(bytes.to_vec())),
            SignatureKey16::new([1; 16]),
        );
        BlockReader::new(auth, policy)
    }

    #[test]
    fn full_block_then_empty_block_at_trigger() {
        let mut stream: Vec<u8> = (0x20..0x30).collect();
        stream.extend_from_slice(&[0x10, 0x04]);
        let mut reader = blocks(&stream, EscapePolicy::Reject);

        let first = reader.next_block("test").unwrap();
        assert!(first.is_full());
        assert_eq!(first.bytes(), &stream[..16]);

        let second = reader.next_block("test").unwrap();
        assert!(second.is_empty());
    }

    #[test]
    fn short_segment_gives_short_block() {
        let mut reader = blocks(&[1, 2, 3, 4, 5, 0x10, 0x04], EscapePolicy::Reject);
        let read = reader.next_block("test").unwrap();
        assert_eq!(read.len(), 5);
        assert_eq!(read.bytes(), &[1, 2, 3, 4, 5]);
    }

    #[test]
    fn end_of_stream_mid_block_is_truncation() {
        let mut reader = blocks(&[1, 2, 3], EscapePolicy::Reject);
        assert!(matches!(
            reader.next_block("payload"),
            Err(HermesError::Truncated { offset: 3, context: "payload" })
        ));
    }

    #[test]
    fn escape_policy_controls_unknown_sequences() {
        let stream = [1, 0x10, 0x22, 2, 0x10, 0x04];

        let mut strict = blocks(&stream, EscapePolicy::Reject);
        assert!(matches!(
            strict.next_block("test"),
            Err(HermesError::UnknownEscape { value: 0x22, offset: 3 })
        ));

        let mut lenient = blocks(&stream, EscapePolicy::Skip);
        let read = lenient.next_block("test").unwrap();
        assert_eq!(read.bytes(), &[1, 2]);
        assert_eq!(lenient.skipped_escapes(), 1);
    }
}
