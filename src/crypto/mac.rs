//! src/crypto/mac.rs
//! Per-segment keyed MAC seam + HMAC-SHA256 default

use crate::aliases::{AuthCode16, HmacSha256, SignatureKey16};
use crate::consts::AUTH_CODE_SIZE;
use hmac::Mac;

/// Keyed MAC accumulating one authenticated segment byte by byte.
///
/// A fresh instance is created per segment from the long-term signature key and the
/// running segment counter; `finalize` consumes it, so a finalized accumulator can
/// never observe further bytes.
pub trait SegmentMac {
    fn new(key: &SignatureKey16, counter: u64) -> Self
    where
        Self: Sized;

    fn update(&mut self, byte: u8);

    fn finalize(self) -> AuthCode16;
}

/// HMAC-SHA256 over `counter (8 bytes LE) || segment bytes`, truncated to 16 bytes.
#[derive(Clone)]
pub struct HmacSha256Mac {
    inner: HmacSha256,
}

impl SegmentMac for HmacSha256Mac {
    #[inline]
    fn new(key: &SignatureKey16, counter: u64) -> Self {
        let mut inner = <HmacSha256 as Mac>::new_from_slice(key.expose_secret())
            .expect("HMAC accepts keys of any length");
        Mac::update(&mut inner, &counter.to_le_bytes());
        Self { inner }
    }

    #[inline(always)]
    fn update(&mut self, byte: u8) {
        Mac::update(&mut self.inner, &[byte]);
    }

    fn finalize(self) -> AuthCode16 {
        let tag = self.inner.finalize().into_bytes();
        let mut code = AuthCode16::new([0u8; AUTH_CODE_SIZE]);
        code.expose_secret_mut()
            .copy_from_slice(&tag[..AUTH_CODE_SIZE]);
        code
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mac_over(counter: u64, bytes: &[u8]) -> [u8; 16] {
        let key = SignatureKey16::new(*b"Or this key...\0\0");
        let mut mac = HmacSha256Mac::new(&key, counter);
        for &b in bytes {
            mac.update(b);
        }
        *mac.finalize().expose_secret()
    }

    #[test]
    fn deterministic_for_same_inputs() {
        assert_eq!(mac_over(7, b"payload"), mac_over(7, b"payload"));
    }

    #[test]
    fn counter_changes_code() {
        assert_ne!(mac_over(7, b"payload"), mac_over(8, b"payload"));
    }

    #[test]
    fn byte_order_changes_code() {
        assert_ne!(mac_over(0, b"ab"), mac_over(0, b"ba"));
    }
}
