//! src/crypto/cipher.rs
//! Block cipher seam + AES-256 counter-mode keystream + re-seedable cipher session

use crate::aliases::{Block16, EncryptionKey32, Iv16};
use crate::consts::BLOCK_SIZE;
use crate::utils::{increment_be128, xor_blocks};
use aes::cipher::{BlockEncrypt, KeyInit};
use aes::{Aes256Enc, Block as AesBlock};

/// A keyed transform over whole 16-byte blocks.
///
/// `init` takes the 32-byte key and a 16-byte IV; `transform_blocks` transforms
/// `block_count` consecutive blocks of `buffer` in place and advances the internal
/// IV/counter state. The session protocol only ever calls it with `block_count = 1`.
pub trait BlockTransform {
    fn init(key: &EncryptionKey32, iv: &Iv16) -> Self
    where
        Self: Sized;

    /// # Panics (by contract)
    ///
    /// Panics if `buffer` is shorter than `block_count * 16` bytes.
    fn transform_blocks(&mut self, buffer: &mut [u8], block_count: usize);
}

/// AES-256 run as a keystream generator in counter mode.
///
/// The IV is the initial counter block, incremented as a 128-bit big-endian integer
/// after every block. Encrypt and decrypt are the same operation.
pub struct Aes256Ctr {
    cipher: Aes256Enc,
    counter_block: Block16,
}

impl BlockTransform for Aes256Ctr {
    #[inline(always)]
    fn init(key: &EncryptionKey32, iv: &Iv16) -> Self {
        Self {
            cipher: Aes256Enc::new(key.expose_secret().into()),
            counter_block: Block16::new(*iv.expose_secret()),
        }
    }

    fn transform_blocks(&mut self, buffer: &mut [u8], block_count: usize) {
        assert!(
            buffer.len() >= block_count * BLOCK_SIZE,
            "buffer holds fewer than {block_count} blocks"
        );

        let mut output = Block16::new([0u8; BLOCK_SIZE]);
        for chunk in buffer.chunks_exact_mut(BLOCK_SIZE).take(block_count) {
            let mut keystream = AesBlock::from(*self.counter_block.expose_secret());
            self.cipher.encrypt_block(&mut keystream);
            xor_blocks(chunk, keystream.as_slice(), output.expose_secret_mut());
            chunk.copy_from_slice(output.expose_secret());
            increment_be128(self.counter_block.expose_secret_mut());
        }
    }
}

/// Long-term key plus the current cipher state.
///
/// A session is seeded twice during a handshake: first with the wire-visible master IV
/// (to recover the session IV), then with the decrypted session IV for all payload.
pub struct CipherSession<C: BlockTransform = Aes256Ctr> {
    key: EncryptionKey32,
    transform: C,
}

impl<C: BlockTransform> CipherSession<C> {
    #[must_use]
    pub fn new(key: &EncryptionKey32, iv: &Iv16) -> Self {
        Self {
            key: key.clone(),
            transform: C::init(key, iv),
        }
    }

    /// Re-key the transform with the same long-term key and a fresh IV.
    pub fn reseed(&mut self, iv: &Iv16) {
        self.transform = C::init(&self.key, iv);
    }

    /// Transform one block in place (decrypt direction).
    #[inline(always)]
    pub fn decrypt_block(&mut self, block: &mut Block16) {
        self.transform.transform_blocks(block.expose_secret_mut(), 1);
    }

    /// Transform one block in place (encrypt direction).
    #[inline(always)]
    pub fn encrypt_block(&mut self, block: &mut Block16) {
        self.transform.transform_blocks(block.expose_secret_mut(), 1);
    }
}
