use zeroize::Zeroize;

use super::backend::Backend;
use crate::catalog::{cipher_type, CryptoAlg};
use crate::error::{error_codes, CryptoError, CryptoResult};

/// IV length shared with the data-channel framing
pub const IV_LEN: usize = 12;

/// Authentication tag length shared with the data-channel framing
pub const AUTH_TAG_LEN: usize = 16;

/// Direction a context is keyed for.
///
/// AEAD backends do not need a direction, but `init` still takes one so the
/// call looks the same as for the non-AEAD cipher contexts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Undefined,
    Encrypt,
    Decrypt,
}

/// Lifecycle state of an [`AeadCipherContext`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextState {
    Uninitialized,
    Initialized,
}

/// Algorithm-agnostic AEAD cipher context
///
/// A context is bound to one AEAD algorithm by [`init`](Self::init) and then
/// encrypts or decrypts data-channel payloads with a uniform contract:
///
/// * the IV is always [`IV_LEN`] bytes
/// * the tag is always [`AUTH_TAG_LEN`] bytes and always travels appended to
///   the ciphertext, for every backend
/// * decryption verifies the tag before any plaintext is released
///
/// The context owns at most one native backend. Re-initializing drops the
/// previous backend first, and dropping the context releases it and zeroizes
/// its key schedule.
///
/// A context serves one direction of one connection. `encrypt`/`decrypt` take
/// `&self`, but sharing a context across threads still needs external
/// synchronization around `init` and `erase`.
///
/// # Examples
///
/// ```
/// use aead_context::aead::{AeadCipherContext, Mode, AUTH_TAG_LEN};
/// use aead_context::catalog::CryptoAlg;
///
/// let key = [0x42; 32];
/// let iv = [0x24; 12];
/// let ad = b"packet header";
///
/// let mut ctx = AeadCipherContext::new();
/// ctx.init(CryptoAlg::Aes256Gcm, &key, Mode::Encrypt).unwrap();
///
/// let plaintext = b"tunnel payload";
/// let mut sealed = vec![0u8; plaintext.len() + AUTH_TAG_LEN];
/// let n = ctx.encrypt(plaintext, &mut sealed, &iv, ad).unwrap();
/// assert_eq!(n, sealed.len());
///
/// let mut opened = vec![0u8; plaintext.len()];
/// let m = ctx.decrypt(&sealed, &mut opened, &iv, None, ad).unwrap();
/// assert_eq!(&opened[..m], plaintext);
/// ```
#[derive(Debug, Default)]
pub struct AeadCipherContext {
    backend: Option<Backend>,
}

impl AeadCipherContext {
    /// Create an uninitialized context
    pub fn new() -> Self {
        Self { backend: None }
    }

    /// Key the context for `alg`.
    ///
    /// Any previous backend is torn down first, whether or not this call
    /// succeeds. Checks run in order: `mode` must name a direction, `alg` must
    /// map to a native AEAD cipher, and `key` must hold at least the
    /// algorithm's key size. Only that many leading bytes are used.
    ///
    /// # Errors
    ///
    /// * `InvalidArgument` for [`Mode::Undefined`]
    /// * `UnsupportedAlgorithm` if `alg` has no AEAD backend in this build
    /// * `InsufficientKeyMaterial` if `key` is too short
    /// * `BackendInit` if the native key setup rejects the key
    ///
    /// On error the context is left uninitialized.
    pub fn init(&mut self, alg: CryptoAlg, key: &[u8], mode: Mode) -> CryptoResult<()> {
        self.erase();

        check_mode(mode)?;

        let (native, key_size) =
            cipher_type(alg).ok_or_else(|| CryptoError::unsupported_algorithm(alg.name()))?;

        if key.len() < key_size {
            return Err(CryptoError::insufficient_key_material(
                alg.name(),
                key_size,
                key.len(),
            ));
        }

        let backend = Backend::new(alg, native, key, key_size)?;
        log::debug!("{}: cipher context keyed ({})", alg, backend.name());
        self.backend = Some(backend);

        Ok(())
    }

    /// Encrypt `input` into `output` and append the authentication tag.
    ///
    /// `output` must hold at least `input.len() + AUTH_TAG_LEN` bytes. On
    /// success `output[..input.len()]` holds the ciphertext and the next
    /// [`AUTH_TAG_LEN`] bytes hold the tag computed over the ciphertext and
    /// `ad`. Returns the number of bytes written.
    ///
    /// # Errors
    ///
    /// * `NotInitialized` before a successful `init`
    /// * `InvalidArgument` for a wrong-sized IV or a short output buffer
    /// * `EncryptionFailed` if the native backend refuses the input
    pub fn encrypt(&self, input: &[u8], output: &mut [u8], iv: &[u8], ad: &[u8]) -> CryptoResult<usize> {
        let backend = self.backend("encrypt")?;
        check_iv(iv)?;

        let length = input.len();
        let sealed_len = length + AUTH_TAG_LEN;
        if output.len() < sealed_len {
            return Err(CryptoError::invalid_argument(
                "output",
                &format!("at least {} bytes", sealed_len),
                &format!("{} bytes", output.len()),
                error_codes::OUTPUT_BUFFER_TOO_SMALL,
            ));
        }

        let (body, rest) = output.split_at_mut(length);
        body.copy_from_slice(input);
        if let Err(err) = backend.seal(iv, ad, body, &mut rest[..AUTH_TAG_LEN]) {
            body.zeroize();
            return Err(err);
        }

        Ok(sealed_len)
    }

    /// Verify and decrypt `input`, whose last [`AUTH_TAG_LEN`] bytes are the tag.
    ///
    /// `tag` exists for call-site symmetry with detached-tag cipher APIs and
    /// must be `None`: this context always reads the tag from the end of
    /// `input`. `output` must hold at least `input.len() - AUTH_TAG_LEN` bytes.
    /// Returns the plaintext length.
    ///
    /// Nothing verified-looking is ever left behind on failure: if the tag
    /// does not match, the plaintext region of `output` is zeroized before
    /// `AuthenticationFailed` is returned.
    ///
    /// # Errors
    ///
    /// * `NotInitialized` before a successful `init`
    /// * `InvalidArgument` for a wrong-sized IV, a separate `tag`, input
    ///   shorter than a tag, or a short output buffer; `output` is untouched
    /// * `AuthenticationFailed` if the ciphertext, tag or `ad` were altered
    pub fn decrypt(
        &self,
        input: &[u8],
        output: &mut [u8],
        iv: &[u8],
        tag: Option<&[u8]>,
        ad: &[u8],
    ) -> CryptoResult<usize> {
        let backend = self.backend("decrypt")?;
        check_iv(iv)?;

        if let Some(tag) = tag {
            return Err(CryptoError::invalid_argument(
                "tag",
                "None (tag is read from the end of input)",
                &format!("separate {}-byte tag", tag.len()),
                error_codes::INVALID_TAG_CONVENTION,
            ));
        }

        if input.len() < AUTH_TAG_LEN {
            return Err(CryptoError::invalid_argument(
                "input",
                &format!("at least {} bytes", AUTH_TAG_LEN),
                &format!("{} bytes", input.len()),
                error_codes::INPUT_TOO_SHORT,
            ));
        }

        let length = input.len() - AUTH_TAG_LEN;
        if output.len() < length {
            return Err(CryptoError::invalid_argument(
                "output",
                &format!("at least {} bytes", length),
                &format!("{} bytes", output.len()),
                error_codes::OUTPUT_BUFFER_TOO_SMALL,
            ));
        }

        let (ciphertext, tag) = input.split_at(length);
        let body = &mut output[..length];
        body.copy_from_slice(ciphertext);

        if !backend.open(iv, ad, body, tag) {
            body.zeroize();
            log::warn!(
                "{}: authentication failed on {}-byte ciphertext (status={})",
                backend.algorithm(),
                length,
                backend.auth_failed_status()
            );
            return Err(CryptoError::authentication_failed(backend.algorithm().name()));
        }

        Ok(length)
    }

    /// [`encrypt`](Self::encrypt) into a freshly allocated buffer
    pub fn encrypt_to_vec(&self, input: &[u8], iv: &[u8], ad: &[u8]) -> CryptoResult<Vec<u8>> {
        let mut output = vec![0u8; input.len() + AUTH_TAG_LEN];
        let written = self.encrypt(input, &mut output, iv, ad)?;
        output.truncate(written);
        Ok(output)
    }

    /// [`decrypt`](Self::decrypt) into a freshly allocated buffer
    pub fn decrypt_to_vec(&self, input: &[u8], iv: &[u8], ad: &[u8]) -> CryptoResult<Vec<u8>> {
        let mut output = vec![0u8; input.len().saturating_sub(AUTH_TAG_LEN)];
        let written = self.decrypt(input, &mut output, iv, None, ad)?;
        output.truncate(written);
        Ok(output)
    }

    /// Whether `alg` can be used to key a context in this build
    pub fn is_supported(alg: CryptoAlg) -> bool {
        cipher_type(alg).is_some()
    }

    /// The tag is always carried at the end of the ciphertext
    pub const fn requires_authtag_at_end() -> bool {
        true
    }

    pub fn is_initialized(&self) -> bool {
        self.backend.is_some()
    }

    pub fn state(&self) -> ContextState {
        match self.backend {
            Some(_) => ContextState::Initialized,
            None => ContextState::Uninitialized,
        }
    }

    /// Algorithm the context is keyed for, if any
    pub fn algorithm(&self) -> Option<CryptoAlg> {
        self.backend.as_ref().map(Backend::algorithm)
    }

    /// Release the native backend; a no-op when uninitialized
    pub fn erase(&mut self) {
        if let Some(backend) = self.backend.take() {
            log::debug!("{}: cipher context erased", backend.algorithm());
        }
    }

    fn backend(&self, operation: &str) -> CryptoResult<&Backend> {
        self.backend
            .as_ref()
            .ok_or_else(|| CryptoError::not_initialized(operation))
    }
}

impl Drop for AeadCipherContext {
    fn drop(&mut self) {
        self.erase();
    }
}

fn check_mode(mode: Mode) -> CryptoResult<()> {
    match mode {
        Mode::Encrypt | Mode::Decrypt => Ok(()),
        Mode::Undefined => Err(CryptoError::invalid_argument(
            "mode",
            "Encrypt or Decrypt",
            "Undefined",
            error_codes::INVALID_MODE,
        )),
    }
}

fn check_iv(iv: &[u8]) -> CryptoResult<()> {
    if iv.len() != IV_LEN {
        return Err(CryptoError::invalid_argument(
            "iv",
            &format!("{} bytes", IV_LEN),
            &format!("{} bytes", iv.len()),
            error_codes::INVALID_IV_LENGTH,
        ));
    }
    Ok(())
}
