//! src/decryptor/session.rs
//! Handshake: preamble skip, challenge, session IV recovery, trailer check
//!
//! The master IV travels in clear but only ever decrypts the session IV; payload is
//! decrypted exclusively under the session IV, which itself only travels encrypted.

use crate::aliases::{Block16, Iv16};
use crate::consts::{ControlTag, HANDSHAKE_TRAILING_BYTES, RESERVED_FIELD_SIZE};
use crate::crypto::{BlockTransform, CipherSession, SegmentMac};
use crate::decryptor::block::{BlockReader, Signal};
use crate::decryptor::read::ByteSource;
use crate::error::{HermesError, Segment};
use crate::keys::SessionKeys;
use crate::utils::auth_codes_match;
use std::io::Read;

/// Where the session protocol currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    PreambleSkip,
    Challenge,
    SessionIvDecrypt,
    HandshakeTrailerCheck,
    PacketLoop,
    /// Clean end: no session present, or end of stream at a packet boundary.
    Finished,
    /// A fatal error was reported; nothing more will be decoded. The phase it was
    /// raised in is kept by `SessionDecoder::failed_in`.
    Failed,
}

/// What an accepted handshake established.
#[derive(Debug, Clone)]
pub struct Handshake {
    initial_counter: u64,
    master_iv: Iv16,
    session_iv: Iv16,
    reserved: [u8; RESERVED_FIELD_SIZE],
    end_offset: u64,
}

impl Handshake {
    /// Counter carried in the first 8 bytes (LE) of the challenge block.
    ///
    /// It seeds MACs from the segment after the handshake onwards; the first packet
    /// is authenticated under `initial_counter + 1`.
    #[must_use]
    pub const fn initial_counter(&self) -> u64 {
        self.initial_counter
    }

    /// The wire-visible challenge block (counter ‖ IV fragment).
    #[must_use]
    pub fn master_iv(&self) -> &Iv16 {
        &self.master_iv
    }

    /// The decrypted session IV that keys all payload decryption.
    #[must_use]
    pub fn session_iv(&self) -> &Iv16 {
        &self.session_iv
    }

    /// The two reserved ("available") bytes; unused by the protocol.
    #[must_use]
    pub const fn reserved(&self) -> [u8; RESERVED_FIELD_SIZE] {
        self.reserved
    }

    /// Raw stream offset right after the handshake.
    #[must_use]
    pub const fn end_offset(&self) -> u64 {
        self.end_offset
    }
}

/// Discard raw bytes up to and including the first `0x12`, then one more.
///
/// Returns `false` if the stream ends first: no session present.
pub(crate) fn skip_preamble<R: Read>(source: &mut ByteSource<R>) -> Result<bool, HermesError> {
    loop {
        match source.read_byte()? {
            None => return Ok(false),
            Some(byte) if byte == ControlTag::SegmentEnd.byte() => break,
            Some(_) => {}
        }
    }
    source.discard(1)?;
    Ok(true)
}

/// Require the next logical byte to be `tag`.
pub(crate) fn expect_tag<R, M>(
    blocks: &mut BlockReader<R, M>,
    tag: ControlTag,
    reason: &'static str,
) -> Result<(), HermesError>
where
    R: Read,
    M: SegmentMac,
{
    match blocks.next_signal()? {
        Some(Signal::Byte(byte)) if byte == tag.byte() => Ok(()),
        Some(_) => Err(HermesError::ProtocolViolation {
            offset: blocks.offset(),
            reason,
        }),
        None => Err(HermesError::Truncated {
            offset: blocks.offset(),
            context: reason,
        }),
    }
}

/// Run the handshake and return the established session.
///
/// `phase` is advanced as each state is entered so a failure can be attributed.
/// `Ok(None)` means the stream ended inside the preamble.
pub(crate) fn read_handshake<R, C, M>(
    blocks: &mut BlockReader<R, M>,
    keys: &SessionKeys,
    phase: &mut SessionPhase,
) -> Result<Option<(Handshake, CipherSession<C>)>, HermesError>
where
    R: Read,
    C: BlockTransform,
    M: SegmentMac,
{
    *phase = SessionPhase::PreambleSkip;
    if !skip_preamble(blocks.source_mut())? {
        return Ok(None);
    }

    // Challenge: the MAC is seeded with the counter as it stands (0); the counter
    // read below only takes effect for the segments after this one.
    *phase = SessionPhase::Challenge;
    blocks.begin_segment();
    expect_tag(blocks, ControlTag::Challenge, "challenge tag not found")?;

    let master_iv: Iv16 = blocks.next_full_block("challenge block")?;
    let mut counter_bytes = [0u8; 8];
    counter_bytes.copy_from_slice(&master_iv.expose_secret()[..8]);
    let initial_counter = u64::from_le_bytes(counter_bytes);
    blocks.set_counter(initial_counter);

    let mut cipher = CipherSession::<C>::new(keys.encryption(), &master_iv);

    *phase = SessionPhase::SessionIvDecrypt;
    let mut session_iv: Block16 = blocks.next_full_block("session IV block")?;
    let mut reserved = [0u8; RESERVED_FIELD_SIZE];
    for byte in reserved.iter_mut() {
        *byte = blocks.next_data_byte("reserved field")?;
    }
    cipher.decrypt_block(&mut session_iv);
    cipher.reseed(&session_iv);

    *phase = SessionPhase::HandshakeTrailerCheck;
    let trigger = blocks.next_block("handshake auth trigger")?;
    if !trigger.is_empty() {
        return Err(HermesError::ProtocolViolation {
            offset: blocks.offset(),
            reason: "expected auth trigger",
        });
    }
    let claimed = blocks.next_full_block("handshake auth code")?;
    expect_tag(blocks, ControlTag::SegmentEnd, "expected end tag")?;

    let authentic = blocks
        .take_computed()
        .is_some_and(|computed| auth_codes_match(computed.expose_secret(), claimed.expose_secret()));
    if !authentic {
        return Err(HermesError::AuthenticationFailure {
            offset: blocks.offset(),
            segment: Segment::Handshake,
        });
    }
    blocks.source_mut().discard(HANDSHAKE_TRAILING_BYTES)?;

    let handshake = Handshake {
        initial_counter,
        master_iv,
        session_iv,
        reserved,
        end_offset: blocks.offset(),
    };
    Ok(Some((handshake, cipher)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn preamble_without_end_tag_means_no_session() {
        let mut source = ByteSource::new(Cursor::new(b"boilerplate only".to_vec()));
        assert!(!skip_preamble(&mut source).unwrap());
    }

    #[test]
    fn preamble_consumes_doubled_delimiter() {
        let mut source = ByteSource::new(Cursor::new(vec![b'x', b'y', 0x12, 0x12, 23]));
        assert!(skip_preamble(&mut source).unwrap());
        assert_eq!(source.offset(), 4);
        assert_eq!(source.read_byte().unwrap(), Some(23));
    }
}
