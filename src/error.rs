/*!
 * Error Handling for the AEAD Cipher Context
 *
 * Provides the error taxonomy shared by the catalog, the cipher context and the
 * cipher policy, together with numeric error codes, user-facing messages and
 * suggested remediation.
 */

use std::collections::HashMap;
use thiserror::Error;

/// Error type for all AEAD context operations
#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("{algorithm}: not usable as an AEAD cipher")]
    UnsupportedAlgorithm { algorithm: String, error_code: u32 },

    #[error("Unknown cipher algorithm name: {name}")]
    UnknownAlgorithm { name: String, error_code: u32 },

    #[error("{algorithm}: insufficient key material - need {required} bytes, got {provided}")]
    InsufficientKeyMaterial {
        algorithm: String,
        required: usize,
        provided: usize,
        error_code: u32,
    },

    #[error("Backend initialization failed: {backend} key setup returned status={status}")]
    BackendInit {
        backend: String,
        status: i32,
        error_code: u32,
    },

    #[error("Cipher context is uninitialized: {operation}")]
    NotInitialized { operation: String, error_code: u32 },

    #[error("Invalid argument: {parameter} - {expected} - got {actual}")]
    InvalidArgument {
        parameter: String,
        expected: String,
        actual: String,
        error_code: u32,
    },

    #[error("Encryption failed: {backend} returned status={status}")]
    EncryptionFailed {
        backend: String,
        status: i32,
        error_code: u32,
    },

    #[error("{algorithm}: authentication tag verification failed")]
    AuthenticationFailed { algorithm: String, error_code: u32 },

    #[error("Cipher policy violation: {details}")]
    PolicyViolation { details: String, error_code: u32 },

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("IO error: {0}")]
    IoError(String),
}

/// Error code constants for different error categories
pub mod error_codes {
    // Catalog errors: 1000-1999
    pub const UNSUPPORTED_ALGORITHM: u32 = 1001;
    pub const UNKNOWN_ALGORITHM: u32 = 1002;

    // Key errors: 2000-2999
    pub const INSUFFICIENT_KEY_MATERIAL: u32 = 2001;

    // Backend errors: 3000-3999
    pub const BACKEND_INIT_FAILED: u32 = 3001;
    pub const ENCRYPTION_FAILED: u32 = 3002;
    pub const AUTHENTICATION_FAILED: u32 = 3003;

    // Context state errors: 4000-4999
    pub const NOT_INITIALIZED: u32 = 4001;

    // Argument errors: 5000-5999
    pub const INVALID_ARGUMENT: u32 = 5001;
    pub const INVALID_IV_LENGTH: u32 = 5002;
    pub const INVALID_TAG_CONVENTION: u32 = 5003;
    pub const OUTPUT_BUFFER_TOO_SMALL: u32 = 5004;
    pub const INPUT_TOO_SHORT: u32 = 5005;
    pub const INVALID_MODE: u32 = 5006;

    // Policy and configuration errors: 6000-6999
    pub const POLICY_VIOLATION: u32 = 6001;
    pub const CONFIGURATION_FAILED: u32 = 6002;
    pub const IO_FAILED: u32 = 6003;
}

impl CryptoError {
    /// Get the numeric error code for this error
    pub fn error_code(&self) -> u32 {
        match self {
            CryptoError::UnsupportedAlgorithm { error_code, .. } => *error_code,
            CryptoError::UnknownAlgorithm { error_code, .. } => *error_code,
            CryptoError::InsufficientKeyMaterial { error_code, .. } => *error_code,
            CryptoError::BackendInit { error_code, .. } => *error_code,
            CryptoError::NotInitialized { error_code, .. } => *error_code,
            CryptoError::InvalidArgument { error_code, .. } => *error_code,
            CryptoError::EncryptionFailed { error_code, .. } => *error_code,
            CryptoError::AuthenticationFailed { error_code, .. } => *error_code,
            CryptoError::PolicyViolation { error_code, .. } => *error_code,
            CryptoError::Configuration(_) => error_codes::CONFIGURATION_FAILED,
            CryptoError::IoError(_) => error_codes::IO_FAILED,
        }
    }

    /// Native backend status carried by this error, if any
    pub fn native_status(&self) -> Option<i32> {
        match self {
            CryptoError::BackendInit { status, .. } => Some(*status),
            CryptoError::EncryptionFailed { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether this is a routine tag mismatch rather than a contract violation.
    ///
    /// Transport layers drop the offending packet on authentication failure and
    /// carry on; every other kind points at a caller or configuration bug.
    pub fn is_authentication_failure(&self) -> bool {
        matches!(self, CryptoError::AuthenticationFailed { .. })
    }

    /// Get a user-friendly error message
    pub fn user_friendly_message(&self) -> String {
        match self {
            CryptoError::UnsupportedAlgorithm { algorithm, .. } => {
                format!(
                    "Cipher '{}' cannot be used for the data channel. Choose an AEAD cipher.",
                    algorithm
                )
            }
            CryptoError::UnknownAlgorithm { name, .. } => {
                format!("Cipher name '{}' is not recognized.", name)
            }
            CryptoError::InsufficientKeyMaterial {
                algorithm,
                required,
                ..
            } => {
                format!(
                    "Not enough key material for '{}': {} bytes are required.",
                    algorithm, required
                )
            }
            CryptoError::BackendInit { backend, .. } => {
                format!(
                    "The {} cipher could not be set up. The data channel cannot be keyed.",
                    backend
                )
            }
            CryptoError::NotInitialized { operation, .. } => {
                format!(
                    "Operation '{}' was attempted before the cipher context was keyed.",
                    operation
                )
            }
            CryptoError::InvalidArgument {
                parameter,
                expected,
                ..
            } => {
                format!(
                    "Invalid parameter '{}'. Expected '{}'.",
                    parameter, expected
                )
            }
            CryptoError::EncryptionFailed { backend, .. } => {
                format!(
                    "Encryption with {} failed. The packet was not sent.",
                    backend
                )
            }
            CryptoError::AuthenticationFailed { .. } => {
                "Packet authentication failed. The packet was dropped.".to_string()
            }
            CryptoError::PolicyViolation { details, .. } => {
                format!("Cipher policy rejected the request: {}.", details)
            }
            CryptoError::Configuration(_) => {
                "Cipher configuration could not be read. Data format may be corrupted.".to_string()
            }
            CryptoError::IoError(_) => {
                "Input/output operation failed. Check file permissions.".to_string()
            }
        }
    }

    /// Get technical details for debugging
    pub fn technical_details(&self) -> HashMap<String, String> {
        let mut details = HashMap::new();

        details.insert("error_code".to_string(), self.error_code().to_string());
        details.insert("error_type".to_string(), self.error_type().to_string());
        details.insert("timestamp".to_string(), chrono::Utc::now().to_rfc3339());

        match self {
            CryptoError::InsufficientKeyMaterial {
                algorithm,
                required,
                provided,
                ..
            } => {
                details.insert("algorithm".to_string(), algorithm.clone());
                details.insert("required".to_string(), required.to_string());
                details.insert("provided".to_string(), provided.to_string());
            }
            CryptoError::BackendInit {
                backend, status, ..
            }
            | CryptoError::EncryptionFailed {
                backend, status, ..
            } => {
                details.insert("backend".to_string(), backend.clone());
                details.insert("status".to_string(), status.to_string());
            }
            CryptoError::InvalidArgument {
                parameter,
                expected,
                actual,
                ..
            } => {
                details.insert("parameter".to_string(), parameter.clone());
                details.insert("expected".to_string(), expected.clone());
                details.insert("actual".to_string(), actual.clone());
            }
            CryptoError::UnsupportedAlgorithm { algorithm, .. }
            | CryptoError::AuthenticationFailed { algorithm, .. } => {
                details.insert("algorithm".to_string(), algorithm.clone());
            }
            _ => {
                details.insert("details".to_string(), format!("{:?}", self));
            }
        }

        details
    }

    /// Get suggested remediation steps
    pub fn suggested_remediation(&self) -> Option<String> {
        match self {
            CryptoError::UnsupportedAlgorithm { .. } | CryptoError::UnknownAlgorithm { .. } => Some(
                "Use AES-128-GCM, AES-192-GCM, AES-256-GCM or CHACHA20-POLY1305.".to_string(),
            ),
            CryptoError::InsufficientKeyMaterial { .. } => Some(
                "Check the key derivation output length for the negotiated cipher.".to_string(),
            ),
            CryptoError::NotInitialized { .. } => {
                Some("Call init() with a key before encrypting or decrypting.".to_string())
            }
            CryptoError::InvalidArgument { error_code, .. } => match *error_code {
                error_codes::INVALID_TAG_CONVENTION => Some(
                    "The tag travels at the end of the ciphertext; pass None for the tag."
                        .to_string(),
                ),
                error_codes::INVALID_IV_LENGTH => {
                    Some("Supply exactly 12 bytes of IV.".to_string())
                }
                error_codes::OUTPUT_BUFFER_TOO_SMALL => Some(
                    "Size the output buffer for the payload plus the 16-byte tag.".to_string(),
                ),
                _ => None,
            },
            CryptoError::PolicyViolation { .. } => Some(
                "Align the local and peer data-channel cipher lists.".to_string(),
            ),
            _ => None,
        }
    }

    /// Get the error category/type as a string
    pub fn error_type(&self) -> &'static str {
        match self {
            CryptoError::UnsupportedAlgorithm { .. } => "UnsupportedAlgorithm",
            CryptoError::UnknownAlgorithm { .. } => "UnknownAlgorithm",
            CryptoError::InsufficientKeyMaterial { .. } => "InsufficientKeyMaterial",
            CryptoError::BackendInit { .. } => "BackendInit",
            CryptoError::NotInitialized { .. } => "NotInitialized",
            CryptoError::InvalidArgument { .. } => "InvalidArgument",
            CryptoError::EncryptionFailed { .. } => "EncryptionFailed",
            CryptoError::AuthenticationFailed { .. } => "AuthenticationFailed",
            CryptoError::PolicyViolation { .. } => "PolicyViolation",
            CryptoError::Configuration(_) => "Configuration",
            CryptoError::IoError(_) => "IoError",
        }
    }
}

/// Convenience constructors for common error types
impl CryptoError {
    pub fn unsupported_algorithm(algorithm: &str) -> Self {
        CryptoError::UnsupportedAlgorithm {
            algorithm: algorithm.to_string(),
            error_code: error_codes::UNSUPPORTED_ALGORITHM,
        }
    }

    pub fn unknown_algorithm(name: &str) -> Self {
        CryptoError::UnknownAlgorithm {
            name: name.to_string(),
            error_code: error_codes::UNKNOWN_ALGORITHM,
        }
    }

    pub fn insufficient_key_material(algorithm: &str, required: usize, provided: usize) -> Self {
        CryptoError::InsufficientKeyMaterial {
            algorithm: algorithm.to_string(),
            required,
            provided,
            error_code: error_codes::INSUFFICIENT_KEY_MATERIAL,
        }
    }

    pub fn backend_init(backend: &str, status: i32) -> Self {
        CryptoError::BackendInit {
            backend: backend.to_string(),
            status,
            error_code: error_codes::BACKEND_INIT_FAILED,
        }
    }

    pub fn not_initialized(operation: &str) -> Self {
        CryptoError::NotInitialized {
            operation: operation.to_string(),
            error_code: error_codes::NOT_INITIALIZED,
        }
    }

    pub fn invalid_argument(parameter: &str, expected: &str, actual: &str, error_code: u32) -> Self {
        CryptoError::InvalidArgument {
            parameter: parameter.to_string(),
            expected: expected.to_string(),
            actual: actual.to_string(),
            error_code,
        }
    }

    pub fn encryption_failed(backend: &str, status: i32) -> Self {
        CryptoError::EncryptionFailed {
            backend: backend.to_string(),
            status,
            error_code: error_codes::ENCRYPTION_FAILED,
        }
    }

    pub fn authentication_failed(algorithm: &str) -> Self {
        CryptoError::AuthenticationFailed {
            algorithm: algorithm.to_string(),
            error_code: error_codes::AUTHENTICATION_FAILED,
        }
    }

    pub fn policy_violation(details: &str) -> Self {
        CryptoError::PolicyViolation {
            details: details.to_string(),
            error_code: error_codes::POLICY_VIOLATION,
        }
    }
}

// From implementations for automatic error conversion
impl From<std::io::Error> for CryptoError {
    fn from(err: std::io::Error) -> Self {
        CryptoError::IoError(format!("IO operation failed: {}", err))
    }
}

impl From<serde_json::Error> for CryptoError {
    fn from(err: serde_json::Error) -> Self {
        CryptoError::Configuration(err.to_string())
    }
}

/// Result type alias for cryptographic operations
pub type CryptoResult<T> = Result<T, CryptoError>;
