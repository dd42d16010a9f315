//! src/encryptor/encoder.rs
//! Session stream encoder: the exact mirror of `decryptor/`
//!
//! Produces a preamble, one handshake segment and any number of RawPacket segments,
//! each authenticated with its own segment MAC.

use crate::aliases::{Block16, Iv16};
use crate::consts::{ControlTag, BLOCK_SIZE, RESERVED_FIELD_SIZE};
use crate::crypto::rng::{random_counter, random_span};
use crate::crypto::{Aes256Ctr, BlockTransform, CipherSession, HmacSha256Mac, SegmentMac};
use crate::encryptor::write::{write_auth_trigger, write_escaped, write_escaped_all, write_raw};
use crate::error::HermesError;
use crate::keys::SessionKeys;
use std::io::Write;
use std::marker::PhantomData;

const DOUBLED_DELIMITER: [u8; 2] = [ControlTag::SegmentEnd.byte(), ControlTag::SegmentEnd.byte()];

/// Writes one session stream.
///
/// Call order: optional [`write_preamble`](Self::write_preamble), one
/// [`write_handshake`](Self::write_handshake), then [`write_packet`](Self::write_packet)
/// as often as needed.
pub struct StreamEncoder<W, C = Aes256Ctr, M = HmacSha256Mac>
where
    C: BlockTransform,
{
    writer: W,
    keys: SessionKeys,
    counter: u64,
    offset: u64,
    preamble_written: bool,
    cipher: Option<CipherSession<C>>,
    _mac: PhantomData<M>,
}

impl<W: Write> StreamEncoder<W, Aes256Ctr, HmacSha256Mac> {
    /// Encoder with the default primitives (AES-256-CTR, HMAC-SHA256).
    #[must_use]
    pub fn new(writer: W, keys: SessionKeys) -> Self {
        Self::with_primitives(writer, keys)
    }
}

impl<W, C, M> StreamEncoder<W, C, M>
where
    W: Write,
    C: BlockTransform,
    M: SegmentMac,
{
    #[must_use]
    pub fn with_primitives(writer: W, keys: SessionKeys) -> Self {
        Self {
            writer,
            keys,
            counter: 0,
            offset: 0,
            preamble_written: false,
            cipher: None,
            _mac: PhantomData,
        }
    }

    /// Free-form leading bytes, closed by a doubled `0x12`.
    ///
    /// The text itself must not contain `0x12`, which would end the preamble early.
    pub fn write_preamble(&mut self, text: &[u8]) -> Result<(), HermesError> {
        if self.preamble_written {
            return Err(self.misuse("preamble already written"));
        }
        if text.contains(&ControlTag::SegmentEnd.byte()) {
            return Err(self.misuse("preamble must not contain the segment end tag"));
        }
        self.offset += write_raw(&mut self.writer, text)?;
        self.offset += write_raw(&mut self.writer, &DOUBLED_DELIMITER)?;
        self.preamble_written = true;
        Ok(())
    }

    /// Write the handshake segment.
    ///
    /// The challenge block is `initial_counter` (8 bytes LE) ‖ `iv_fragment` and is the
    /// master IV; `session_iv` is sent encrypted under it. The handshake MAC is seeded
    /// with counter 0; packets use `initial_counter + 1` onwards.
    pub fn write_handshake(
        &mut self,
        initial_counter: u64,
        iv_fragment: [u8; 8],
        session_iv: &Iv16,
        reserved: [u8; RESERVED_FIELD_SIZE],
    ) -> Result<(), HermesError> {
        if self.cipher.is_some() {
            return Err(self.misuse("handshake already written"));
        }
        if !self.preamble_written {
            self.write_preamble(&[])?;
        }

        let mut master = [0u8; BLOCK_SIZE];
        master[..8].copy_from_slice(&initial_counter.to_le_bytes());
        master[8..].copy_from_slice(&iv_fragment);
        let master_iv = Iv16::new(master);

        let mut cipher = CipherSession::<C>::new(self.keys.encryption(), &master_iv);
        let mut encrypted_iv = Block16::new(*session_iv.expose_secret());
        cipher.encrypt_block(&mut encrypted_iv);

        let mut mac = M::new(self.keys.signature(), self.counter);
        let challenge = ControlTag::Challenge.byte();
        mac.update(challenge);
        self.offset += write_raw(&mut self.writer, &[challenge])?;
        for &byte in master_iv
            .expose_secret()
            .iter()
            .chain(encrypted_iv.expose_secret())
            .chain(&reserved)
        {
            mac.update(byte);
            self.offset += write_escaped(&mut self.writer, byte)?;
        }
        self.offset += write_auth_trigger(&mut self.writer)?;
        self.offset += write_escaped_all(&mut self.writer, mac.finalize().expose_secret())?;
        self.offset += write_raw(&mut self.writer, &DOUBLED_DELIMITER)?;

        cipher.reseed(session_iv);
        self.cipher = Some(cipher);
        self.counter = initial_counter.wrapping_add(1);
        Ok(())
    }

    /// Write the handshake with a fresh random counter, IV fragment and session IV.
    pub fn write_handshake_random(
        &mut self,
        reserved: [u8; RESERVED_FIELD_SIZE],
    ) -> Result<(), HermesError> {
        let initial_counter = random_counter()?;
        let iv_fragment = random_span::<8>()?;
        let session_iv = random_span::<16>()?;
        self.write_handshake(
            initial_counter,
            *iv_fragment.expose_secret(),
            &session_iv,
            reserved,
        )
    }

    /// Write one RawPacket segment carrying `payload`.
    pub fn write_packet(&mut self, payload: &[u8]) -> Result<(), HermesError> {
        let Some(cipher) = self.cipher.as_mut() else {
            return Err(HermesError::ProtocolViolation {
                offset: self.offset,
                reason: "handshake must be written before packets",
            });
        };

        let mut mac = M::new(self.keys.signature(), self.counter);
        let tag = ControlTag::RawPacket.byte();
        mac.update(tag);
        self.offset += write_raw(&mut self.writer, &[tag])?;

        // A trailing partial chunk still consumes one keystream block; only its
        // own length goes on the wire.
        for chunk in payload.chunks(BLOCK_SIZE) {
            let mut block = Block16::new([0u8; BLOCK_SIZE]);
            block.expose_secret_mut()[..chunk.len()].copy_from_slice(chunk);
            cipher.encrypt_block(&mut block);
            for &byte in &block.expose_secret()[..chunk.len()] {
                mac.update(byte);
                self.offset += write_escaped(&mut self.writer, byte)?;
            }
        }

        self.offset += write_auth_trigger(&mut self.writer)?;
        self.offset += write_escaped_all(&mut self.writer, mac.finalize().expose_secret())?;
        self.offset += write_raw(&mut self.writer, &DOUBLED_DELIMITER)?;
        self.counter = self.counter.wrapping_add(1);
        Ok(())
    }

    /// Counter the next segment's MAC will be seeded with.
    #[must_use]
    pub const fn counter(&self) -> u64 {
        self.counter
    }

    /// Raw bytes written so far.
    #[must_use]
    pub const fn bytes_written(&self) -> u64 {
        self.offset
    }

    /// Flush and hand back the writer.
    pub fn into_inner(mut self) -> Result<W, HermesError> {
        self.writer.flush()?;
        Ok(self.writer)
    }

    fn misuse(&self, reason: &'static str) -> HermesError {
        HermesError::ProtocolViolation {
            offset: self.offset,
            reason,
        }
    }
}
