//! src/decryptor/decoder.rs
//! Session decoder: owns all session state and drives handshake + packet loop

use crate::builders::decoder_builder::{AuthFailurePolicy, DecoderConfig};
use crate::crypto::{Aes256Ctr, BlockTransform, CipherSession, HmacSha256Mac, SegmentMac};
use crate::decryptor::auth::AuthReader;
use crate::decryptor::block::BlockReader;
use crate::decryptor::escape::EscapeDecoder;
use crate::decryptor::session::{read_handshake, Handshake, SessionPhase};
use crate::decryptor::stream::{read_packet, Packet};
use crate::error::{HermesError, Segment};
use crate::keys::SessionKeys;
use std::io::Read;
use tracing::{debug, trace, warn};

/// Counters describing what a decoder has done so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DecodeStats {
    /// A handshake was found and authenticated.
    pub session_established: bool,
    /// Authenticated packets released to the caller.
    pub packets: u64,
    /// Plaintext bytes in those packets.
    pub payload_bytes: u64,
    /// Packets withheld under [`AuthFailurePolicy::SkipPacket`].
    pub skipped_packets: u64,
    /// Unknown escapes dropped under [`EscapePolicy::Skip`](crate::builders::decoder_builder::EscapePolicy::Skip).
    pub skipped_escapes: u64,
}

/// Pull-based decoder for one session stream.
///
/// All session state (segment counter, active MAC, cipher session) lives here and is
/// only touched by the calling thread. The handshake runs lazily on the first call to
/// [`handshake`](Self::handshake) or [`next_packet`](Self::next_packet). After an error
/// has been returned the decoder is fused: further calls yield nothing.
///
/// Build one with [`DecoderBuilder`](crate::builders::decoder_builder::DecoderBuilder).
pub struct SessionDecoder<R, C = Aes256Ctr, M = HmacSha256Mac>
where
    C: BlockTransform,
{
    blocks: BlockReader<R, M>,
    keys: SessionKeys,
    config: DecoderConfig,
    phase: SessionPhase,
    failed_in: Option<SessionPhase>,
    handshake: Option<Handshake>,
    cipher: Option<CipherSession<C>>,
    next_index: u64,
    stats: DecodeStats,
}

impl<R, C, M> SessionDecoder<R, C, M>
where
    R: Read,
    C: BlockTransform,
    M: SegmentMac,
{
    pub(crate) fn new(reader: R, keys: SessionKeys, config: DecoderConfig) -> Self {
        let auth = AuthReader::new(EscapeDecoder::new(reader), keys.signature().clone());
        Self {
            blocks: BlockReader::new(auth, config.escape_policy),
            keys,
            config,
            phase: SessionPhase::PreambleSkip,
            failed_in: None,
            handshake: None,
            cipher: None,
            next_index: 0,
            stats: DecodeStats::default(),
        }
    }

    /// Run the handshake if it has not run yet.
    ///
    /// `Ok(None)` means no session is present (the stream ended in the preamble), or
    /// that an earlier call already failed.
    pub fn handshake(&mut self) -> Result<Option<&Handshake>, HermesError> {
        if self.phase == SessionPhase::PreambleSkip {
            match read_handshake::<R, C, M>(&mut self.blocks, &self.keys, &mut self.phase) {
                Ok(Some((handshake, cipher))) => {
                    debug!(
                        offset = handshake.end_offset(),
                        initial_counter = handshake.initial_counter(),
                        "session established"
                    );
                    self.stats.session_established = true;
                    self.handshake = Some(handshake);
                    self.cipher = Some(cipher);
                    self.phase = SessionPhase::PacketLoop;
                }
                Ok(None) => {
                    debug!(offset = self.blocks.offset(), "no session present");
                    self.phase = SessionPhase::Finished;
                }
                Err(e) => return Err(self.fail(e)),
            }
        }
        Ok(self.handshake.as_ref())
    }

    /// Next authenticated packet, or `None` at the clean end of the stream.
    ///
    /// A packet's payload is only returned once its AuthCode has been verified.
    pub fn next_packet(&mut self) -> Result<Option<Packet>, HermesError> {
        if self.handshake()?.is_none() {
            return Ok(None);
        }

        while self.phase == SessionPhase::PacketLoop {
            let Some(cipher) = self.cipher.as_mut() else {
                break;
            };
            let index = self.next_index;
            let read = match read_packet(&mut self.blocks, cipher, index, self.config.max_packet_len) {
                Ok(Some(read)) => read,
                Ok(None) => {
                    debug!(offset = self.blocks.offset(), packets = index, "end of stream");
                    self.phase = SessionPhase::Finished;
                    break;
                }
                Err(e) => return Err(self.fail(e)),
            };
            self.next_index += 1;

            if read.authentic {
                let len = read.packet.payload().len();
                trace!(index, counter = read.packet.counter(), len, "packet authenticated");
                self.stats.packets += 1;
                self.stats.payload_bytes += len as u64;
                return Ok(Some(read.packet));
            }

            match self.config.auth_policy {
                AuthFailurePolicy::Abort => {
                    return Err(self.fail(HermesError::AuthenticationFailure {
                        offset: read.auth_offset,
                        segment: Segment::Packet(index),
                    }));
                }
                AuthFailurePolicy::SkipPacket => {
                    warn!(
                        index,
                        offset = read.auth_offset,
                        "withholding packet that failed authentication"
                    );
                    self.stats.skipped_packets += 1;
                }
            }
        }
        Ok(None)
    }

    #[must_use]
    pub const fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// The phase that was active when the decoder failed, once [`phase`](Self::phase)
    /// is [`SessionPhase::Failed`].
    #[must_use]
    pub const fn failed_in(&self) -> Option<SessionPhase> {
        self.failed_in
    }

    /// Raw bytes consumed so far.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        self.blocks.offset()
    }

    #[must_use]
    pub const fn stats(&self) -> DecodeStats {
        DecodeStats {
            skipped_escapes: self.blocks.skipped_escapes(),
            ..self.stats
        }
    }

    #[must_use]
    pub const fn config(&self) -> &DecoderConfig {
        &self.config
    }

    fn fail(&mut self, error: HermesError) -> HermesError {
        debug!(phase = ?self.phase, offset = self.blocks.offset(), %error, "session failed");
        self.failed_in = Some(self.phase);
        self.phase = SessionPhase::Failed;
        error
    }
}

impl<R, C, M> Iterator for SessionDecoder<R, C, M>
where
    R: Read,
    C: BlockTransform,
    M: SegmentMac,
{
    type Item = Result<Packet, HermesError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_packet().transpose()
    }
}
