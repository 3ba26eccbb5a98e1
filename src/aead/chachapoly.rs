//! ChaCha20-Poly1305 backend (RFC 8439)
//!
//! Unlike GCM there is a single key size: 256 bits, no variants.

use chacha20poly1305::aead::KeyInit;
use chacha20poly1305::ChaCha20Poly1305;

use super::backend::{open_detached, seal_detached, status};
use crate::catalog::CryptoAlg;
use crate::error::{CryptoError, CryptoResult};

/// Size of ChaCha20-Poly1305 key in bytes
pub const CHACHA20_POLY1305_KEY_SIZE: usize = 32;

/// Keyed ChaCha20-Poly1305 state; the key is zeroized on drop
#[derive(Clone)]
pub struct ChaChaPolyBackend {
    cipher: ChaCha20Poly1305,
}

impl std::fmt::Debug for ChaChaPolyBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChaChaPolyBackend")
            .field("cipher", &"[ChaCha20-Poly1305 Cipher]")
            .finish()
    }
}

impl ChaChaPolyBackend {
    pub const NAME: &'static str = "ChaCha20-Poly1305";

    /// Install the first 32 bytes of `key`
    pub fn new(key: &[u8]) -> CryptoResult<Self> {
        let key = key.get(..CHACHA20_POLY1305_KEY_SIZE).ok_or_else(|| {
            CryptoError::insufficient_key_material(
                CryptoAlg::ChaCha20Poly1305.name(),
                CHACHA20_POLY1305_KEY_SIZE,
                key.len(),
            )
        })?;

        let cipher = ChaCha20Poly1305::new_from_slice(key)
            .map_err(|_| CryptoError::backend_init(Self::NAME, status::CHACHAPOLY_BAD_KEY))?;

        Ok(Self { cipher })
    }

    pub fn algorithm(&self) -> CryptoAlg {
        CryptoAlg::ChaCha20Poly1305
    }

    /// Encrypt and authenticate data
    pub fn seal(
        &self,
        iv: &[u8],
        ad: &[u8],
        buffer: &mut [u8],
        tag_out: &mut [u8],
    ) -> CryptoResult<()> {
        seal_detached(&self.cipher, iv, ad, buffer, tag_out).map_err(|_| {
            log::error!("ChaCha20-Poly1305 encryption of {} bytes failed", buffer.len());
            CryptoError::encryption_failed(Self::NAME, status::CHACHAPOLY_BAD_STATE)
        })
    }

    /// Verify and decrypt data; `false` on tag mismatch
    pub fn open(&self, iv: &[u8], ad: &[u8], buffer: &mut [u8], tag: &[u8]) -> bool {
        open_detached(&self.cipher, iv, ad, buffer, tag).is_ok()
    }
}
