//! Unified error type definition.

use serde::Serialize;
use thiserror::Error;

// Re-export library error type
pub use querydock_driver::DriverError;

/// Core layer error type.
#[derive(Error, Debug, Clone, Serialize)]
#[serde(tag = "code", content = "details")]
pub enum CoreError {
    /// Missing or invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid caller input (duplicate profile id, unknown profile, ...).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Authentication tag mismatch on an encrypted payload. Decryption is
    /// never attempted after this.
    #[error("HMAC validation failed: the encrypted data may have been tampered with")]
    Integrity,

    /// Malformed encrypted or plaintext payload (bad JSON shape, bad hex,
    /// invalid padding).
    #[error("Malformed payload: {0}")]
    Format(String),

    /// The secret store could not produce a usable key. Fatal to any
    /// encrypt/decrypt — there is no plaintext fallback.
    #[error("Encryption key unavailable: {0}")]
    KeyUnavailable(String),

    /// Storage layer error (file read/write, keychain access).
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Driver error (converted from the driver library).
    #[error("{0}")]
    Driver(#[from] DriverError),
}

impl CoreError {
    /// Whether this is expected behavior (user input, resource does not
    /// exist, etc.), used for log classification.
    ///
    /// Level `warn` should be used when returning `true` and level `error`
    /// when returning `false`. **Update this method when adding variants.**
    #[must_use]
    pub fn is_expected(&self) -> bool {
        match self {
            Self::Config(_) | Self::Validation(_) => true,
            Self::Driver(e) => e.is_expected(),
            _ => false,
        }
    }
}

/// Core layer Result type alias.
pub type CoreResult<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integrity_and_key_errors_are_not_expected() {
        assert!(!CoreError::Integrity.is_expected());
        assert!(!CoreError::KeyUnavailable("keychain locked".into()).is_expected());
        assert!(!CoreError::Format("bad hex".into()).is_expected());
        assert!(CoreError::Validation("duplicate id".into()).is_expected());
    }

    #[test]
    fn serializes_with_code_tag() {
        let json = serde_json::to_string(&CoreError::Integrity).unwrap();
        assert!(json.contains("\"code\":\"Integrity\""));
    }

    #[test]
    fn driver_errors_convert() {
        let e: CoreError = DriverError::Config("no driver".into()).into();
        assert!(e.is_expected());
        assert_eq!(e.to_string(), "Invalid driver configuration: no driver");
    }
}
