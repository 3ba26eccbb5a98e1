/*!
 * Cipher Algorithm Catalog
 *
 * Static metadata for the ciphers a tunnel peer may name: canonical name,
 * key size, IV and tag lengths, and mode classification. The AEAD context
 * only queries this table through [`cipher_type`].
 */

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CryptoError, CryptoResult};

/// Cipher algorithms known to the data channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum CryptoAlg {
    None,
    Aes128Cbc,
    Aes192Cbc,
    Aes256Cbc,
    BfCbc,
    Aes128Gcm,
    Aes192Gcm,
    Aes256Gcm,
    ChaCha20Poly1305,
}

/// Mode classification of a catalog entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CipherMode {
    None,
    Cbc,
    Aead,
}

/// Native primitive backing an AEAD entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NativeCipher {
    Aes,
    ChaCha20,
}

const ALL: [CryptoAlg; 9] = [
    CryptoAlg::None,
    CryptoAlg::Aes128Cbc,
    CryptoAlg::Aes192Cbc,
    CryptoAlg::Aes256Cbc,
    CryptoAlg::BfCbc,
    CryptoAlg::Aes128Gcm,
    CryptoAlg::Aes192Gcm,
    CryptoAlg::Aes256Gcm,
    CryptoAlg::ChaCha20Poly1305,
];

impl CryptoAlg {
    /// Every catalog entry, in catalog order
    pub fn all() -> &'static [CryptoAlg] {
        &ALL
    }

    /// Canonical cipher name as used in tunnel configuration
    pub fn name(&self) -> &'static str {
        match self {
            CryptoAlg::None => "none",
            CryptoAlg::Aes128Cbc => "AES-128-CBC",
            CryptoAlg::Aes192Cbc => "AES-192-CBC",
            CryptoAlg::Aes256Cbc => "AES-256-CBC",
            CryptoAlg::BfCbc => "BF-CBC",
            CryptoAlg::Aes128Gcm => "AES-128-GCM",
            CryptoAlg::Aes192Gcm => "AES-192-GCM",
            CryptoAlg::Aes256Gcm => "AES-256-GCM",
            CryptoAlg::ChaCha20Poly1305 => "CHACHA20-POLY1305",
        }
    }

    /// Nominal key size in bytes
    pub fn key_size(&self) -> usize {
        match self {
            CryptoAlg::None => 0,
            CryptoAlg::Aes128Cbc | CryptoAlg::Aes128Gcm | CryptoAlg::BfCbc => 16,
            CryptoAlg::Aes192Cbc | CryptoAlg::Aes192Gcm => 24,
            CryptoAlg::Aes256Cbc | CryptoAlg::Aes256Gcm | CryptoAlg::ChaCha20Poly1305 => 32,
        }
    }

    /// Nominal IV length in bytes
    pub fn iv_length(&self) -> usize {
        match self.mode() {
            CipherMode::None => 0,
            CipherMode::Cbc => {
                if *self == CryptoAlg::BfCbc {
                    8
                } else {
                    16
                }
            }
            CipherMode::Aead => 12,
        }
    }

    /// Authentication tag length in bytes; zero for non-AEAD entries
    pub fn tag_length(&self) -> usize {
        if self.is_aead() {
            16
        } else {
            0
        }
    }

    pub fn mode(&self) -> CipherMode {
        match self {
            CryptoAlg::None => CipherMode::None,
            CryptoAlg::Aes128Cbc | CryptoAlg::Aes192Cbc | CryptoAlg::Aes256Cbc | CryptoAlg::BfCbc => {
                CipherMode::Cbc
            }
            CryptoAlg::Aes128Gcm
            | CryptoAlg::Aes192Gcm
            | CryptoAlg::Aes256Gcm
            | CryptoAlg::ChaCha20Poly1305 => CipherMode::Aead,
        }
    }

    pub fn is_aead(&self) -> bool {
        self.mode() == CipherMode::Aead
    }
}

/// Resolve an algorithm to its native AEAD primitive and required key size.
///
/// Returns `None` for anything this build cannot run as an AEAD cipher,
/// including AES-192-GCM when the `aes-192` feature is off.
pub fn cipher_type(alg: CryptoAlg) -> Option<(NativeCipher, usize)> {
    match alg {
        CryptoAlg::Aes128Gcm => Some((NativeCipher::Aes, 16)),
        #[cfg(feature = "aes-192")]
        CryptoAlg::Aes192Gcm => Some((NativeCipher::Aes, 24)),
        CryptoAlg::Aes256Gcm => Some((NativeCipher::Aes, 32)),
        CryptoAlg::ChaCha20Poly1305 => Some((NativeCipher::ChaCha20, 32)),
        _ => None,
    }
}

impl fmt::Display for CryptoAlg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CryptoAlg {
    type Err = CryptoError;

    fn from_str(s: &str) -> CryptoResult<Self> {
        let name = s.trim();
        ALL.iter()
            .copied()
            .find(|alg| alg.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| CryptoError::unknown_algorithm(name))
    }
}

impl TryFrom<String> for CryptoAlg {
    type Error = CryptoError;

    fn try_from(value: String) -> CryptoResult<Self> {
        value.parse()
    }
}

impl From<CryptoAlg> for String {
    fn from(alg: CryptoAlg) -> Self {
        alg.name().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip_case_insensitively() {
        for alg in CryptoAlg::all() {
            assert_eq!(alg.name().parse::<CryptoAlg>().unwrap(), *alg);
            assert_eq!(
                alg.name().to_lowercase().parse::<CryptoAlg>().unwrap(),
                *alg
            );
        }
        assert_eq!(
            " chacha20-poly1305 ".parse::<CryptoAlg>().unwrap(),
            CryptoAlg::ChaCha20Poly1305
        );
    }

    #[test]
    fn test_unknown_name_is_rejected() {
        let err = "AES-512-GCM".parse::<CryptoAlg>().unwrap_err();
        assert_eq!(err.error_type(), "UnknownAlgorithm");
    }

    #[test]
    fn test_cipher_type_covers_only_aead() {
        for alg in CryptoAlg::all() {
            if let Some((_, key_size)) = cipher_type(*alg) {
                assert!(alg.is_aead());
                assert_eq!(key_size, alg.key_size());
            }
        }
        assert_eq!(cipher_type(CryptoAlg::Aes256Cbc), None);
        assert_eq!(cipher_type(CryptoAlg::None), None);
        assert_eq!(
            cipher_type(CryptoAlg::ChaCha20Poly1305),
            Some((NativeCipher::ChaCha20, 32))
        );
    }

    #[cfg(feature = "aes-192")]
    #[test]
    fn test_aes_192_gcm_is_mapped() {
        assert_eq!(cipher_type(CryptoAlg::Aes192Gcm), Some((NativeCipher::Aes, 24)));
    }

    #[test]
    fn test_lengths() {
        assert_eq!(CryptoAlg::Aes128Gcm.iv_length(), 12);
        assert_eq!(CryptoAlg::Aes128Gcm.tag_length(), 16);
        assert_eq!(CryptoAlg::Aes128Cbc.iv_length(), 16);
        assert_eq!(CryptoAlg::BfCbc.iv_length(), 8);
        assert_eq!(CryptoAlg::BfCbc.tag_length(), 0);
        assert_eq!(CryptoAlg::None.key_size(), 0);
    }

    #[test]
    fn test_serde_uses_canonical_names() {
        let json = serde_json::to_string(&CryptoAlg::Aes256Gcm).unwrap();
        assert_eq!(json, "\"AES-256-GCM\"");
        let alg: CryptoAlg = serde_json::from_str("\"chacha20-poly1305\"").unwrap();
        assert_eq!(alg, CryptoAlg::ChaCha20Poly1305);
        assert!(serde_json::from_str::<CryptoAlg>("\"ROT13\"").is_err());
    }
}
