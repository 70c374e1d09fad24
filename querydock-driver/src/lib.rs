//! # querydock-driver
//!
//! A unified database driver abstraction for the querydock desktop client.
//!
//! Every backend (MySQL, SQLite, the mock test driver) is normalized into a
//! single [`Connector`] contract covering the connection lifecycle and the
//! query surface. The actual socket handling and SQL execution live behind
//! the [`DatabaseBackend`] RPC boundary; this crate only decides *what* to
//! ask the backend and how to shape its replies.
//!
//! ## Supported Drivers
//!
//! | Driver | Tag | Notes |
//! |--------|-----|-------|
//! | MySQL  | `mysql` | schema-scoped table listing, pooled disconnect |
//! | SQLite | `sqlite` | version-tolerant catalog-table probing |
//! | Test   | `test` | synthetic results for UI work and contract tests |
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use querydock_driver::{create_connector, ConnectionProfile, DatabaseBackend};
//!
//! # async fn example(backend: Arc<dyn DatabaseBackend>) -> querydock_driver::Result<()> {
//! let profile: ConnectionProfile = serde_json::from_str(
//!     r#"{"name":"local","driverName":"mysql","driverOpts":{"host":"127.0.0.1"}}"#,
//! ).map_err(|e| querydock_driver::DriverError::Config(e.to_string()))?;
//!
//! let connector = create_connector(profile, backend)?;
//! connector.connect().await?;
//! let result = connector.query("SELECT 1;", None).await?;
//! println!("{:?} rows", result.num_rows);
//! # Ok(())
//! # }
//! ```

mod backend;
mod drivers;
mod error;
mod factory;
mod options;
mod result;
mod traits;
mod types;

pub mod test_utils;

pub use backend::DatabaseBackend;
pub use drivers::{MysqlDriver, SqliteDriver, TestDriver, ERROR_SENTINEL};
pub use error::{DriverError, Result};
pub use factory::create_connector;
pub use options::connect_opts;
pub use result::{QueryResult, RawQueryReply, Row};
pub use traits::{Connector, DriverBase};
pub use types::{
    ConnectDriverOpts, ConnectOpts, ConnectSshOpts, ConnectionProfile, DriverKind, DriverOpts,
    PortField, SshOpts,
};
