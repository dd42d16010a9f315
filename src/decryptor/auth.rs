//! src/decryptor/auth.rs
//! Authentication accumulator adapter: every data byte feeds the active segment MAC

use crate::aliases::{AuthCode16, SignatureKey16};
use crate::crypto::SegmentMac;
use crate::decryptor::escape::{EscapeDecoder, LogicalByte};
use crate::decryptor::read::ByteSource;
use crate::error::HermesError;
use std::io::Read;

/// What the adapter hands upward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthEvent {
    /// A data byte, already fed to the active MAC.
    Byte(u8),
    /// The segment ended; its AuthCode is ready via [`AuthReader::take_computed`].
    SegmentEnd,
    /// Unknown escape payload, passed through untouched and not authenticated.
    Unknown(u8),
}

/// Wraps an [`EscapeDecoder`] and owns the segment counter and the active MAC.
///
/// Invariant: between [`begin_segment`](Self::begin_segment) and the next
/// `EndOfAuthSegment`, every `Plain` byte is fed to the MAC exactly once and in
/// stream order; nothing else is. The trigger finalizes the MAC and advances the
/// counter by one.
pub struct AuthReader<R, M> {
    decoder: EscapeDecoder<R>,
    signature_key: SignatureKey16,
    counter: u64,
    active: Option<M>,
    computed: Option<AuthCode16>,
}

impl<R: Read, M: SegmentMac> AuthReader<R, M> {
    #[must_use]
    pub fn new(decoder: EscapeDecoder<R>, signature_key: SignatureKey16) -> Self {
        Self {
            decoder,
            signature_key,
            counter: 0,
            active: None,
            computed: None,
        }
    }

    /// Start a new segment MAC keyed with the signature key and the current counter.
    pub fn begin_segment(&mut self) {
        self.active = Some(M::new(&self.signature_key, self.counter));
        self.computed = None;
    }

    /// Current segment counter.
    #[inline(always)]
    pub const fn counter(&self) -> u64 {
        self.counter
    }

    /// Overwrite the counter. An already-started MAC keeps the value it was seeded with.
    #[inline(always)]
    pub fn set_counter(&mut self, counter: u64) {
        self.counter = counter;
    }

    pub fn next_event(&mut self) -> Result<Option<AuthEvent>, HermesError> {
        let event = match self.decoder.next_logical_byte()? {
            None => return Ok(None),
            Some(LogicalByte::Plain(byte)) => {
                if let Some(mac) = self.active.as_mut() {
                    mac.update(byte);
                }
                AuthEvent::Byte(byte)
            }
            Some(LogicalByte::EndOfAuthSegment) => {
                if let Some(mac) = self.active.take() {
                    self.computed = Some(mac.finalize());
                }
                self.counter = self.counter.wrapping_add(1);
                AuthEvent::SegmentEnd
            }
            Some(LogicalByte::Unknown(value)) => AuthEvent::Unknown(value),
        };
        Ok(Some(event))
    }

    /// The finalized AuthCode of the last completed segment, if any.
    pub fn take_computed(&mut self) -> Option<AuthCode16> {
        self.computed.take()
    }

    #[inline(always)]
    pub fn source_mut(&mut self) -> &mut ByteSource<R> {
        self.decoder.source_mut()
    }

    #[inline(always)]
    pub const fn offset(&self) -> u64 {
        self.decoder.offset()
    }
}
