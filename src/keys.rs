//! Long-term key material for one session stream.

use crate::aliases::{EncryptionKey32, SignatureKey16};

/// The two long-term keys a stream is decoded (or encoded) with.
///
/// Key storage and rotation are out of scope; callers hand the raw bytes in and the
/// buffers are zeroized when the bundle is dropped.
#[derive(Debug, Clone)]
pub struct SessionKeys {
    encryption: EncryptionKey32,
    signature: SignatureKey16,
}

impl SessionKeys {
    #[must_use]
    pub fn new(encryption: [u8; 32], signature: [u8; 16]) -> Self {
        Self {
            encryption: EncryptionKey32::new(encryption),
            signature: SignatureKey16::new(signature),
        }
    }

    /// Cipher key (used with the master IV, then the session IV).
    #[must_use]
    pub fn encryption(&self) -> &EncryptionKey32 {
        &self.encryption
    }

    /// MAC key (used with the running segment counter).
    #[must_use]
    pub fn signature(&self) -> &SignatureKey16 {
        &self.signature
    }
}
