//! Connection profile types and the normalized backend wire shapes.
//!
//! Profiles are written by the UI and persisted by the favorites store, so
//! the serde layer stays tolerant: all driver/SSH options are optional, field
//! names use the historical camelCase spellings, and legacy files that used
//! `label` instead of `name` are still readable.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The closed set of supported drivers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DriverKind {
    #[serde(alias = "MySQL")]
    Mysql,
    #[serde(alias = "SQLite")]
    Sqlite,
    Test,
}

impl DriverKind {
    /// The wire tag injected into normalized driver options.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Mysql => "mysql",
            Self::Sqlite => "sqlite",
            Self::Test => "test",
        }
    }
}

impl fmt::Display for DriverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A port as it appears in a stored profile.
///
/// Historical profile files hold ports as either JSON numbers or strings;
/// normalization coerces both to a number before anything reaches a backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PortField {
    Number(u16),
    Text(String),
}

impl PortField {
    /// Numeric value of the field, or `fallback` when the text form does not
    /// parse. Coercion never fails.
    #[must_use]
    pub fn as_number(&self, fallback: u16) -> u16 {
        match self {
            Self::Number(n) => *n,
            Self::Text(s) => s.trim().parse().unwrap_or(fallback),
        }
    }
}

/// Raw driver options as stored in a profile. Everything is optional;
/// [`connect_opts`](crate::connect_opts) fills in defaults.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverOpts {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<PortField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filepath: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
}

/// Raw SSH tunnel options as stored in a profile.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SshOpts {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<PortField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyfile: Option<String>,
}

/// A saved, named description of how to reach a database.
///
/// `id` is assigned once on first save and is unique within the favorites
/// list. When `use_ssh` is false the backend must receive `sshOpts: null`,
/// never a defaulted placeholder object — normalization enforces that.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConnectionProfile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(alias = "label")]
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub driver_name: Option<DriverKind>,
    pub driver_opts: DriverOpts,
    pub use_ssh: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ssh_opts: Option<SshOpts>,
}

/// Normalized driver options sent to the backend: every string present,
/// port always numeric, plus a `driver` tag identifying the variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectDriverOpts {
    pub driver: String,
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub filepath: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
}

/// Normalized SSH options. Only ever present when the profile enables SSH.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectSshOpts {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyfile: Option<String>,
}

/// The full wire shape handed to `adapter_connect` / `adapter_test`.
///
/// `ssh_opts` deliberately serializes as JSON `null` when absent — backends
/// key tunnel establishment off that null/object distinction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectOpts {
    pub use_ssh: bool,
    pub driver_opts: ConnectDriverOpts,
    pub ssh_opts: Option<ConnectSshOpts>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_round_trips_camel_case() {
        let json = r#"{"id":"a1","name":"local","driverName":"mysql","driverOpts":{"host":"db.local","port":3306},"useSsh":false}"#;
        let profile: ConnectionProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.id.as_deref(), Some("a1"));
        assert_eq!(profile.driver_name, Some(DriverKind::Mysql));
        assert_eq!(profile.driver_opts.host.as_deref(), Some("db.local"));

        let out = serde_json::to_string(&profile).unwrap();
        assert!(out.contains("\"driverName\":\"mysql\""));
        assert!(out.contains("\"useSsh\":false"));
    }

    #[test]
    fn minimal_legacy_profile_parses() {
        let profiles: Vec<ConnectionProfile> =
            serde_json::from_str(r#"[{"id":"a","name":"x"}]"#).unwrap();
        assert_eq!(profiles.len(), 1);
        assert_eq!(profiles[0].name, "x");
        assert_eq!(profiles[0].driver_name, None);
        assert!(!profiles[0].use_ssh);
    }

    #[test]
    fn legacy_label_maps_to_name() {
        let profile: ConnectionProfile =
            serde_json::from_str(r#"{"label":"old style"}"#).unwrap();
        assert_eq!(profile.name, "old style");
    }

    #[test]
    fn string_port_coerces() {
        let opts: DriverOpts = serde_json::from_str(r#"{"port":"3306"}"#).unwrap();
        assert_eq!(opts.port.as_ref().map(|p| p.as_number(0)), Some(3306));

        let opts: DriverOpts = serde_json::from_str(r#"{"port":"not a port"}"#).unwrap();
        assert_eq!(opts.port.as_ref().map(|p| p.as_number(0)), Some(0));
    }

    #[test]
    fn absent_ssh_opts_serialize_as_null() {
        let opts = ConnectOpts {
            use_ssh: false,
            driver_opts: ConnectDriverOpts {
                driver: "sqlite".to_string(),
                host: String::new(),
                port: 0,
                user: String::new(),
                password: String::new(),
                filepath: "/tmp/db.sqlite".to_string(),
                database: None,
            },
            ssh_opts: None,
        };
        let json = serde_json::to_string(&opts).unwrap();
        assert!(json.contains("\"sshOpts\":null"));
    }
}
