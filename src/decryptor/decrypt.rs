//! src/decryptor/decrypt.rs
//! One-call stream decoding into a writer

use crate::builders::decoder_builder::DecoderBuilder;
use crate::decryptor::decoder::DecodeStats;
use crate::error::HermesError;
use crate::keys::SessionKeys;
use std::io::{BufReader, Read, Write};

/// Decode a whole session stream and write every authenticated payload to `output`.
///
/// Uses the strict defaults of [`DecoderBuilder`]: the first protocol or
/// authentication error aborts decoding. Payload of a packet is written only after
/// that packet authenticated, so nothing from a tampered packet reaches `output`.
/// A stream without a session (no `0x12` in the preamble) decodes to nothing.
///
/// Packets are also capped at [`DEFAULT_MAX_PACKET_LEN`](crate::consts::DEFAULT_MAX_PACKET_LEN)
/// (1 MiB) of plaintext, so an otherwise valid stream carrying a larger packet fails
/// with [`HermesError::ProtocolViolation`]. Use [`DecoderBuilder::with_max_packet_len`]
/// to decode such streams.
///
/// # Thread Safety
///
/// Each call owns its own session state, so independent streams can be decoded
/// concurrently from multiple threads (see `decrypt_batch` behind the `batch-ops` feature).
///
/// # Example
///
/// ```
/// use hermes_rs::{decrypt, SessionKeys};
/// use std::io::Cursor;
///
/// let keys = SessionKeys::new([1u8; 32], [2u8; 16]);
/// let mut plaintext = Vec::new();
/// let stats = decrypt(Cursor::new(b"plain preamble, no session"), &mut plaintext, &keys)?;
///
/// assert!(!stats.session_established);
/// assert!(plaintext.is_empty());
/// # Ok::<(), hermes_rs::HermesError>(())
/// ```
pub fn decrypt<R, W>(input: R, mut output: W, keys: &SessionKeys) -> Result<DecodeStats, HermesError>
where
    R: Read,
    W: Write,
{
    let mut decoder = DecoderBuilder::new(keys.clone()).build(BufReader::new(input));

    while let Some(packet) = decoder.next_packet()? {
        output.write_all(packet.payload())?;
    }
    output.flush()?;

    Ok(decoder.stats())
}
