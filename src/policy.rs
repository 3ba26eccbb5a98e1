/*!
 * Data-Channel Cipher Policy
 *
 * The ordered list of AEAD ciphers a deployment is willing to key a data
 * channel with, and negotiation of that list against what a peer offers.
 */

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::aead::AeadCipherContext;
use crate::catalog::CryptoAlg;
use crate::error::{error_codes, CryptoError, CryptoResult};

/// Ordered cipher preferences for the data channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CipherPolicy {
    /// Acceptable ciphers, most preferred first
    pub data_ciphers: Vec<CryptoAlg>,
    /// Cipher to use when the peer offers nothing in common
    #[serde(default)]
    pub fallback: Option<CryptoAlg>,
}

impl Default for CipherPolicy {
    fn default() -> Self {
        Self {
            data_ciphers: vec![
                CryptoAlg::Aes256Gcm,
                CryptoAlg::Aes128Gcm,
                CryptoAlg::ChaCha20Poly1305,
            ],
            fallback: None,
        }
    }
}

impl CipherPolicy {
    /// Parse a colon-separated cipher list such as `AES-256-GCM:CHACHA20-POLY1305`
    pub fn from_data_ciphers(list: &str) -> CryptoResult<Self> {
        let data_ciphers = list
            .split(':')
            .filter(|name| !name.trim().is_empty())
            .map(str::parse)
            .collect::<CryptoResult<Vec<CryptoAlg>>>()?;

        let policy = Self {
            data_ciphers,
            fallback: None,
        };
        policy.validated()
    }

    /// Read a policy from JSON
    pub fn from_json(json: &str) -> CryptoResult<Self> {
        let policy: Self = serde_json::from_str(json)?;
        policy.validated()
    }

    /// Read a JSON policy file
    pub fn load<P: AsRef<Path>>(path: P) -> CryptoResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Render the cipher list in colon-separated form
    pub fn to_data_ciphers(&self) -> String {
        self.data_ciphers
            .iter()
            .map(CryptoAlg::name)
            .collect::<Vec<_>>()
            .join(":")
    }

    pub fn permits(&self, alg: CryptoAlg) -> bool {
        self.data_ciphers.contains(&alg) || self.fallback == Some(alg)
    }

    /// Pick the cipher to key the data channel with.
    ///
    /// Local preference order wins; `peer` only filters. Falls back to
    /// `fallback` when nothing is shared.
    pub fn negotiate(&self, peer: &[CryptoAlg]) -> Option<CryptoAlg> {
        let chosen = self
            .data_ciphers
            .iter()
            .copied()
            .find(|alg| peer.contains(alg) && AeadCipherContext::is_supported(*alg))
            .or_else(|| {
                self.fallback
                    .filter(|alg| AeadCipherContext::is_supported(*alg))
            });

        match chosen {
            Some(alg) => log::info!("Negotiated data-channel cipher {}", alg),
            None => log::info!(
                "No common data-channel cipher (local {}, peer offered {})",
                self.to_data_ciphers(),
                peer.len()
            ),
        }
        chosen
    }

    /// Like [`negotiate`](Self::negotiate), but an empty intersection is an error
    pub fn require(&self, peer: &[CryptoAlg]) -> CryptoResult<CryptoAlg> {
        self.negotiate(peer).ok_or_else(|| {
            CryptoError::policy_violation(&format!(
                "no cipher in common with local list {}",
                self.to_data_ciphers()
            ))
        })
    }

    fn validated(mut self) -> CryptoResult<Self> {
        let mut seen = Vec::with_capacity(self.data_ciphers.len());
        for alg in self.data_ciphers.iter().chain(self.fallback.iter()) {
            if !alg.is_aead() {
                return Err(CryptoError::invalid_argument(
                    "data_ciphers",
                    "AEAD ciphers only",
                    alg.name(),
                    error_codes::INVALID_ARGUMENT,
                ));
            }
        }
        self.data_ciphers.retain(|alg| {
            if seen.contains(alg) {
                false
            } else {
                seen.push(*alg);
                true
            }
        });

        if self.data_ciphers.is_empty() && self.fallback.is_none() {
            return Err(CryptoError::policy_violation("cipher list is empty"));
        }
        Ok(self)
    }
}
