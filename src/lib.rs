/*!
 * AEAD Cipher Context
 *
 * This crate implements the data-channel cipher context of a secure-tunnel
 * stack: one object that is keyed for an AEAD algorithm and then seals and
 * opens packets with a single contract, whichever backend is active.
 *
 * The supported algorithms are:
 *
 * - AES-128-GCM, AES-192-GCM and AES-256-GCM
 * - ChaCha20-Poly1305
 *
 * Key derivation, IV construction and packet framing belong to the
 * surrounding transport; this crate consumes already-derived keys and
 * already-framed buffers.
 */

/// Cipher algorithm catalog
pub mod catalog;

/// AEAD cipher context and its native backends
pub mod aead;

/// Data-channel cipher policy and negotiation
pub mod policy;

/// Common error types
pub mod error;

/// Utilities for cryptographic operations
pub mod utils;

pub use aead::{AeadCipherContext, ContextState, Mode, AUTH_TAG_LEN, IV_LEN};
pub use catalog::{CipherMode, CryptoAlg, NativeCipher};
pub use error::{CryptoError, CryptoResult};
pub use policy::CipherPolicy;

/// Provides a simplified interface to the most commonly used types.
pub mod prelude {
    pub use crate::aead::{AeadCipherContext, ContextState, Mode, AUTH_TAG_LEN, IV_LEN};
    pub use crate::catalog::CryptoAlg;
    pub use crate::error::{CryptoError, CryptoResult};
    pub use crate::policy::CipherPolicy;
}
