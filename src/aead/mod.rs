/*!
 * AEAD cipher context
 *
 * One context, keyed once for AES-GCM (128/192/256) or ChaCha20-Poly1305,
 * with a single encrypt/decrypt contract regardless of the active backend.
 */

mod backend;
mod chachapoly;
mod context;
mod gcm;

pub use backend::status;
pub use chachapoly::CHACHA20_POLY1305_KEY_SIZE;
pub use context::{AeadCipherContext, ContextState, Mode, AUTH_TAG_LEN, IV_LEN};

#[cfg(test)]
mod tests;
