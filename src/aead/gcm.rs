use aes_gcm::aead::KeyInit;
use aes_gcm::{Aes128Gcm, Aes256Gcm};

use super::backend::{open_detached, seal_detached, status};
use crate::catalog::CryptoAlg;
use crate::error::{CryptoError, CryptoResult};

/// AES-192-GCM with the 96-bit nonce used on the data channel
#[cfg(feature = "aes-192")]
pub type Aes192Gcm = aes_gcm::AesGcm<aes::Aes192, aes_gcm::aead::consts::U12>;

/// Keyed AES-GCM state for one of the three AES key sizes
///
/// All sizes share the same seal/open path; only key setup differs. The
/// expanded key schedule is zeroized when the value is dropped.
#[derive(Clone)]
pub enum GcmBackend {
    Aes128(Aes128Gcm),
    #[cfg(feature = "aes-192")]
    Aes192(Aes192Gcm),
    Aes256(Aes256Gcm),
}

impl std::fmt::Debug for GcmBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GcmBackend")
            .field("algorithm", &self.algorithm().name())
            .field("cipher", &"[AES-GCM Cipher]")
            .finish()
    }
}

impl GcmBackend {
    pub const NAME: &'static str = "AES-GCM";

    /// Set up the AES key schedule for `alg` from exactly `key_size` bytes.
    ///
    /// The caller has already checked that `key` holds at least `key_size`
    /// bytes; any excess is ignored.
    pub fn new(alg: CryptoAlg, key: &[u8], key_size: usize) -> CryptoResult<Self> {
        let key = &key[..key_size];

        match alg {
            CryptoAlg::Aes128Gcm => Ok(GcmBackend::Aes128(
                Aes128Gcm::new_from_slice(key).map_err(rejected_key)?,
            )),
            #[cfg(feature = "aes-192")]
            CryptoAlg::Aes192Gcm => Ok(GcmBackend::Aes192(
                Aes192Gcm::new_from_slice(key).map_err(rejected_key)?,
            )),
            CryptoAlg::Aes256Gcm => Ok(GcmBackend::Aes256(
                Aes256Gcm::new_from_slice(key).map_err(rejected_key)?,
            )),
            other => Err(CryptoError::unsupported_algorithm(other.name())),
        }
    }

    pub fn algorithm(&self) -> CryptoAlg {
        match self {
            GcmBackend::Aes128(_) => CryptoAlg::Aes128Gcm,
            #[cfg(feature = "aes-192")]
            GcmBackend::Aes192(_) => CryptoAlg::Aes192Gcm,
            GcmBackend::Aes256(_) => CryptoAlg::Aes256Gcm,
        }
    }

    /// Encrypt `buffer` in place and write the tag to `tag_out`
    pub fn seal(
        &self,
        iv: &[u8],
        ad: &[u8],
        buffer: &mut [u8],
        tag_out: &mut [u8],
    ) -> CryptoResult<()> {
        let sealed = match self {
            GcmBackend::Aes128(cipher) => seal_detached(cipher, iv, ad, buffer, tag_out),
            #[cfg(feature = "aes-192")]
            GcmBackend::Aes192(cipher) => seal_detached(cipher, iv, ad, buffer, tag_out),
            GcmBackend::Aes256(cipher) => seal_detached(cipher, iv, ad, buffer, tag_out),
        };

        sealed.map_err(|_| {
            log::error!(
                "{}: GCM encryption of {} bytes failed",
                self.algorithm(),
                buffer.len()
            );
            CryptoError::encryption_failed(Self::NAME, status::GCM_BAD_INPUT)
        })
    }

    /// Verify `tag` over `buffer` and `ad`, then decrypt `buffer` in place.
    ///
    /// Returns `false` when the tag does not verify; `buffer` must then be
    /// treated as garbage.
    pub fn open(&self, iv: &[u8], ad: &[u8], buffer: &mut [u8], tag: &[u8]) -> bool {
        match self {
            GcmBackend::Aes128(cipher) => open_detached(cipher, iv, ad, buffer, tag),
            #[cfg(feature = "aes-192")]
            GcmBackend::Aes192(cipher) => open_detached(cipher, iv, ad, buffer, tag),
            GcmBackend::Aes256(cipher) => open_detached(cipher, iv, ad, buffer, tag),
        }
        .is_ok()
    }
}

fn rejected_key<E>(_: E) -> CryptoError {
    CryptoError::backend_init(GcmBackend::NAME, status::GCM_BAD_KEY)
}
