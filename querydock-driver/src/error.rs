use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unified error type for all driver operations.
///
/// Backend failures ([`Connection`](Self::Connection), [`Query`](Self::Query))
/// carry the backend's own message unmodified so the UI can display it as-is.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "code", content = "details")]
pub enum DriverError {
    /// The connection profile is missing or has invalid driver options.
    #[error("Invalid driver configuration: {0}")]
    Config(String),

    /// The backend failed to establish or tear down a connection.
    #[error("{0}")]
    Connection(String),

    /// The backend rejected or failed a query.
    #[error("{0}")]
    Query(String),
}

impl DriverError {
    /// Whether this is expected behavior (user input, missing configuration)
    /// rather than a fault. Used for log-level selection: `warn` when `true`,
    /// `error` when `false`. **Update this method when adding variants.**
    #[must_use]
    pub fn is_expected(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}

/// Convenience type alias for `Result<T, DriverError>`.
pub type Result<T> = std::result::Result<T, DriverError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_passes_backend_message_through() {
        let e = DriverError::Connection("Access denied for user 'root'".to_string());
        assert_eq!(e.to_string(), "Access denied for user 'root'");

        let e = DriverError::Query("no such table: users".to_string());
        assert_eq!(e.to_string(), "no such table: users");
    }

    #[test]
    fn serialize_carries_code_tag() {
        let e = DriverError::Config("missing driver".to_string());
        let json = serde_json::to_string(&e).unwrap();
        assert!(json.contains("\"code\":\"Config\""));
    }

    #[test]
    fn config_is_expected() {
        assert!(DriverError::Config("x".into()).is_expected());
        assert!(!DriverError::Connection("x".into()).is_expected());
        assert!(!DriverError::Query("x".into()).is_expected());
    }
}
