//! Native backend selection and the detached seal/open primitives
//!
//! A [`Backend`] is chosen once at `init` and owns exactly one keyed native
//! cipher. Both families are driven through the detached in-place AEAD
//! interface, so the tag always travels in its own slice at this layer.

use aes_gcm::aead::consts::{U12, U16};
use aes_gcm::aead::generic_array::GenericArray;
use aes_gcm::aead::{AeadCore, AeadInPlace};

use super::chachapoly::ChaChaPolyBackend;
use super::gcm::GcmBackend;
use crate::catalog::{CryptoAlg, NativeCipher};
use crate::error::CryptoResult;

/// Status codes reported by the native backends.
///
/// The RustCrypto primitives return opaque errors, so each failure site maps
/// to one fixed code here.
pub mod status {
    /// Key length rejected by the AES key schedule
    pub const GCM_BAD_KEY: i32 = -0x0016;
    /// Input rejected by GCM (e.g. message longer than GCM allows)
    pub const GCM_BAD_INPUT: i32 = -0x0014;
    /// Tag mismatch in GCM
    pub const GCM_AUTH_FAILED: i32 = -0x0012;
    /// Key length rejected by ChaCha20
    pub const CHACHAPOLY_BAD_KEY: i32 = -0x0058;
    /// Encryption refused by ChaCha20-Poly1305 (e.g. keystream exhausted)
    pub const CHACHAPOLY_BAD_STATE: i32 = -0x0054;
    /// Tag mismatch in ChaCha20-Poly1305
    pub const CHACHAPOLY_AUTH_FAILED: i32 = -0x0056;
}

/// The one live native cipher of an initialized context
#[derive(Debug, Clone)]
pub enum Backend {
    Gcm(GcmBackend),
    ChaChaPoly(ChaChaPolyBackend),
}

impl Backend {
    /// Build the backend for `alg` from a key already checked to be long enough
    pub fn new(alg: CryptoAlg, native: NativeCipher, key: &[u8], key_size: usize) -> CryptoResult<Self> {
        match native {
            NativeCipher::Aes => Ok(Backend::Gcm(GcmBackend::new(alg, key, key_size)?)),
            NativeCipher::ChaCha20 => Ok(Backend::ChaChaPoly(ChaChaPolyBackend::new(key)?)),
        }
    }

    pub fn algorithm(&self) -> CryptoAlg {
        match self {
            Backend::Gcm(gcm) => gcm.algorithm(),
            Backend::ChaChaPoly(chachapoly) => chachapoly.algorithm(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Backend::Gcm(_) => GcmBackend::NAME,
            Backend::ChaChaPoly(_) => ChaChaPolyBackend::NAME,
        }
    }

    /// Native status code this backend reports for a tag mismatch
    pub fn auth_failed_status(&self) -> i32 {
        match self {
            Backend::Gcm(_) => status::GCM_AUTH_FAILED,
            Backend::ChaChaPoly(_) => status::CHACHAPOLY_AUTH_FAILED,
        }
    }

    pub fn seal(
        &self,
        iv: &[u8],
        ad: &[u8],
        buffer: &mut [u8],
        tag_out: &mut [u8],
    ) -> CryptoResult<()> {
        match self {
            Backend::Gcm(gcm) => gcm.seal(iv, ad, buffer, tag_out),
            Backend::ChaChaPoly(chachapoly) => chachapoly.seal(iv, ad, buffer, tag_out),
        }
    }

    pub fn open(&self, iv: &[u8], ad: &[u8], buffer: &mut [u8], tag: &[u8]) -> bool {
        match self {
            Backend::Gcm(gcm) => gcm.open(iv, ad, buffer, tag),
            Backend::ChaChaPoly(chachapoly) => chachapoly.open(iv, ad, buffer, tag),
        }
    }
}

/// Encrypt `buffer` in place with a 96-bit nonce and copy the 128-bit tag out.
///
/// `iv` must be 12 bytes and `tag_out` 16 bytes; the context validates both.
pub(crate) fn seal_detached<C>(
    cipher: &C,
    iv: &[u8],
    ad: &[u8],
    buffer: &mut [u8],
    tag_out: &mut [u8],
) -> Result<(), aes_gcm::aead::Error>
where
    C: AeadInPlace + AeadCore<NonceSize = U12, TagSize = U16>,
{
    let tag = cipher.encrypt_in_place_detached(GenericArray::from_slice(iv), ad, buffer)?;
    tag_out.copy_from_slice(&tag);
    Ok(())
}

/// Verify `tag` and decrypt `buffer` in place.
///
/// Both RustCrypto backends check the tag before applying the keystream, so
/// on error `buffer` still holds ciphertext.
pub(crate) fn open_detached<C>(
    cipher: &C,
    iv: &[u8],
    ad: &[u8],
    buffer: &mut [u8],
    tag: &[u8],
) -> Result<(), aes_gcm::aead::Error>
where
    C: AeadInPlace + AeadCore<NonceSize = U12, TagSize = U16>,
{
    cipher.decrypt_in_place_detached(
        GenericArray::from_slice(iv),
        ad,
        buffer,
        GenericArray::from_slice(tag),
    )
}
