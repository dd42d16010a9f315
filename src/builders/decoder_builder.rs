//! src/builders/decoder_builder.rs
//! Session decoder configuration: strict defaults, explicit opt-in recovery

use crate::consts::{BLOCK_SIZE, DEFAULT_MAX_PACKET_LEN};
use crate::crypto::{Aes256Ctr, BlockTransform, HmacSha256Mac, SegmentMac};
use crate::decryptor::SessionDecoder;
use crate::keys::SessionKeys;
use std::io::Read;

/// What to do with an escape marker followed by an out-of-range value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EscapePolicy {
    /// Abort with [`HermesError::UnknownEscape`](crate::HermesError::UnknownEscape).
    #[default]
    Reject,
    /// Log a warning, drop the two-byte sequence (not authenticated) and continue.
    Skip,
}

/// What to do when a data packet fails authentication.
///
/// A handshake authentication failure is always fatal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthFailurePolicy {
    /// Abort with [`HermesError::AuthenticationFailure`](crate::HermesError::AuthenticationFailure).
    #[default]
    Abort,
    /// Log a warning, withhold the packet's payload and continue with the next packet.
    SkipPacket,
}

/// Decoder knobs, resolved by [`DecoderBuilder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecoderConfig {
    pub escape_policy: EscapePolicy,
    pub auth_policy: AuthFailurePolicy,
    pub max_packet_len: usize,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            escape_policy: EscapePolicy::default(),
            auth_policy: AuthFailurePolicy::default(),
            max_packet_len: DEFAULT_MAX_PACKET_LEN,
        }
    }
}

/// Session decoder builder
///
/// Strong defaults: unknown escapes and packet authentication failures abort the
/// stream, packets are capped at [`DEFAULT_MAX_PACKET_LEN`].
///
/// # Example
///
/// ```
/// use hermes_rs::builders::decoder_builder::{AuthFailurePolicy, DecoderBuilder};
/// use hermes_rs::SessionKeys;
/// use std::io::Cursor;
///
/// let keys = SessionKeys::new([7u8; 32], [9u8; 16]);
/// let mut decoder = DecoderBuilder::new(keys)
///     .with_auth_policy(AuthFailurePolicy::SkipPacket)
///     .build(Cursor::new(b"no session here".to_vec()));
///
/// assert!(decoder.handshake()?.is_none());
/// # Ok::<(), hermes_rs::HermesError>(())
/// ```
#[derive(Debug, Clone)]
pub struct DecoderBuilder {
    keys: SessionKeys,
    config: DecoderConfig,
}

impl DecoderBuilder {
    #[must_use]
    pub fn new(keys: SessionKeys) -> Self {
        Self {
            keys,
            config: DecoderConfig::default(),
        }
    }

    #[must_use]
    pub fn with_escape_policy(mut self, policy: EscapePolicy) -> Self {
        self.config.escape_policy = policy;
        self
    }

    #[must_use]
    pub fn with_auth_policy(mut self, policy: AuthFailurePolicy) -> Self {
        self.config.auth_policy = policy;
        self
    }

    /// Cap on buffered plaintext per packet (minimum one block)
    #[must_use]
    pub fn with_max_packet_len(mut self, max_packet_len: usize) -> Self {
        self.config.max_packet_len = max_packet_len.max(BLOCK_SIZE);
        self
    }

    /// Current configuration
    #[must_use]
    pub const fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Decoder over `reader` with the default primitives (AES-256-CTR, HMAC-SHA256).
    ///
    /// The decoder pulls one byte at a time; wrap unbuffered readers in a
    /// [`BufReader`](std::io::BufReader).
    #[must_use]
    pub fn build<R: Read>(self, reader: R) -> SessionDecoder<R, Aes256Ctr, HmacSha256Mac> {
        self.build_with(reader)
    }

    /// Decoder over `reader` with caller-chosen cipher and MAC primitives.
    #[must_use]
    pub fn build_with<R, C, M>(self, reader: R) -> SessionDecoder<R, C, M>
    where
        R: Read,
        C: BlockTransform,
        M: SegmentMac,
    {
        SessionDecoder::new(reader, self.keys, self.config)
    }
}
