use rand::{rngs::OsRng, RngCore};
use subtle::ConstantTimeEq;
use zeroize::Zeroizing;

use crate::aead::IV_LEN;
use crate::catalog::CryptoAlg;
use crate::error::{error_codes, CryptoError, CryptoResult};

/// Generate random bytes of the specified length
pub fn random_bytes(length: usize) -> CryptoResult<Vec<u8>> {
    let mut bytes = vec![0u8; length];
    OsRng.try_fill_bytes(&mut bytes).map_err(|e| {
        CryptoError::IoError(format!("OS random number generator failed: {}", e))
    })?;
    Ok(bytes)
}

/// Generate a random key sized for `alg`, wiped when dropped
pub fn random_key(alg: CryptoAlg) -> CryptoResult<Zeroizing<Vec<u8>>> {
    random_bytes(alg.key_size()).map(Zeroizing::new)
}

/// Generate a random data-channel IV
///
/// Tunnel peers normally build IVs from a packet counter; random IVs are
/// for tests and one-off messages only.
pub fn random_iv() -> CryptoResult<[u8; IV_LEN]> {
    let mut iv = [0u8; IV_LEN];
    OsRng.try_fill_bytes(&mut iv).map_err(|e| {
        CryptoError::IoError(format!("OS random number generator failed: {}", e))
    })?;
    Ok(iv)
}

/// Constant-time comparison of two byte slices to avoid timing attacks
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}

/// Convert bytes to a hexadecimal string
pub fn to_hex(data: &[u8]) -> String {
    hex::encode(data)
}

/// Convert a hexadecimal string to bytes
pub fn from_hex(hex_str: &str) -> CryptoResult<Vec<u8>> {
    hex::decode(hex_str).map_err(|e| {
        CryptoError::invalid_argument(
            "hex",
            "even-length hexadecimal string",
            &e.to_string(),
            error_codes::INVALID_ARGUMENT,
        )
    })
}
