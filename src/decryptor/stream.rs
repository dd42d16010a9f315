//! src/decryptor/stream.rs
//! Packet loop: one authenticated RawPacket segment per call

use crate::consts::{ControlTag, PACKET_TRAILING_BYTES};
use crate::crypto::{BlockTransform, CipherSession, SegmentMac};
use crate::decryptor::block::{BlockReader, Signal};
use crate::error::HermesError;
use crate::utils::auth_codes_match;
use std::io::Read;

/// One authenticated data packet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    index: u64,
    counter: u64,
    payload: Vec<u8>,
}

impl Packet {
    /// Position of the packet in the stream, from 0.
    #[must_use]
    pub const fn index(&self) -> u64 {
        self.index
    }

    /// Segment counter the packet's MAC was seeded with.
    #[must_use]
    pub const fn counter(&self) -> u64 {
        self.counter
    }

    /// Decrypted plaintext, exactly as long as what was sent (no padding).
    #[must_use]
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    #[must_use]
    pub fn into_payload(self) -> Vec<u8> {
        self.payload
    }
}

/// A fully read packet segment and whether its AuthCode checked out.
pub(crate) struct PacketRead {
    pub packet: Packet,
    pub authentic: bool,
    /// Offset right after the AuthCode.
    pub auth_offset: u64,
}

/// Read one RawPacket segment.
///
/// `Ok(None)` is the clean end of stream at a packet boundary. The payload is
/// buffered and returned together with the verdict; callers must not release it
/// unless `authentic` is set.
pub(crate) fn read_packet<R, C, M>(
    blocks: &mut BlockReader<R, M>,
    cipher: &mut CipherSession<C>,
    index: u64,
    max_packet_len: usize,
) -> Result<Option<PacketRead>, HermesError>
where
    R: Read,
    C: BlockTransform,
    M: SegmentMac,
{
    blocks.begin_segment();
    let counter = blocks.counter();

    match blocks.next_signal()? {
        None => return Ok(None),
        Some(Signal::Byte(byte)) if byte == ControlTag::RawPacket.byte() => {}
        Some(_) => {
            return Err(HermesError::ProtocolViolation {
                offset: blocks.offset(),
                reason: "expected raw packet tag",
            })
        }
    }

    let mut payload = Vec::new();
    loop {
        let read = blocks.next_block("early end of stream in packet payload")?;
        let len = read.len();
        let last = !read.is_full();

        // A trigger-only read (len 0) must not consume keystream.
        if len > 0 {
            if payload.len() + len > max_packet_len {
                return Err(HermesError::ProtocolViolation {
                    offset: blocks.offset(),
                    reason: "packet exceeds maximum length",
                });
            }
            let mut block = read.into_block();
            cipher.decrypt_block(&mut block);
            payload.extend_from_slice(&block.expose_secret()[..len]);
        }
        if last {
            break;
        }
    }

    let claimed = blocks.next_full_block("packet auth code")?;
    let auth_offset = blocks.offset();
    let authentic = blocks
        .take_computed()
        .is_some_and(|computed| auth_codes_match(computed.expose_secret(), claimed.expose_secret()));

    blocks.source_mut().discard(PACKET_TRAILING_BYTES)?;

    Ok(Some(PacketRead {
        packet: Packet {
            index,
            counter,
            payload,
        },
        authentic,
        auth_offset,
    }))
}
