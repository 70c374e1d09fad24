//! The Connector contract and the shared driver base.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, RwLock};

use crate::backend::DatabaseBackend;
use crate::error::Result;
use crate::options::connect_opts;
use crate::result::QueryResult;
use crate::types::{ConnectOpts, ConnectionProfile, DriverKind};

/// Uniform lifecycle and query contract over heterogeneous database
/// backends.
///
/// States: Unconnected → Connecting → Connected → Disconnected; `test` is
/// reachable from any state and never mutates it. Concurrent `connect` /
/// `disconnect` / `reconnect` calls on one instance are serialized
/// (single-flight) by the implementations via [`DriverBase`].
#[async_trait]
pub trait Connector: Send + Sync {
    /// Which driver variant this connector is.
    fn kind(&self) -> DriverKind;

    /// Opens the connection. Fails with the backend's own error message.
    async fn connect(&self) -> Result<()>;

    /// Closes the connection.
    async fn disconnect(&self) -> Result<()>;

    /// Best-effort `disconnect` (failure logged and swallowed) followed by
    /// `connect` (failure surfaced). The sole intentional local recovery in
    /// the contract.
    async fn reconnect(&self) -> Result<()> {
        if let Err(e) = self.disconnect().await {
            log::warn!("[{}] disconnect before reconnect failed: {e}", self.kind());
        }
        self.connect().await
    }

    /// Tests the connection options without touching connection state.
    async fn test(&self) -> Result<String>;

    /// Runs a query. The active database is resolved via [`get_database`]
    /// unless `database` overrides it.
    ///
    /// [`get_database`]: Connector::get_database
    async fn query(&self, sql: &str, database: Option<&str>) -> Result<QueryResult>;

    /// The currently selected database, if any.
    async fn get_database(&self) -> Option<String>;

    /// Selects the active database for subsequent queries.
    async fn set_database(&self, database: &str);

    /// Lists the databases (schemas) visible to the connection.
    async fn load_databases(&self) -> Result<Vec<String>>;

    /// Lists the tables of the active database.
    async fn load_tables(&self) -> Result<Vec<String>>;
}

impl std::fmt::Debug for dyn Connector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connector")
            .field("kind", &self.kind())
            .finish_non_exhaustive()
    }
}

/// Shared state and behavior embedded by every driver variant: the profile,
/// the backend handle, and the per-instance single-flight lifecycle guard.
pub struct DriverBase {
    profile: RwLock<ConnectionProfile>,
    backend: Arc<dyn DatabaseBackend>,
    // Serializes connect/disconnect on this instance. `test` and `query`
    // deliberately bypass it.
    lifecycle: Mutex<()>,
}

impl DriverBase {
    pub fn new(profile: ConnectionProfile, backend: Arc<dyn DatabaseBackend>) -> Self {
        Self {
            profile: RwLock::new(profile),
            backend,
            lifecycle: Mutex::new(()),
        }
    }

    /// A snapshot of the current profile.
    pub async fn profile(&self) -> ConnectionProfile {
        self.profile.read().await.clone()
    }

    /// Normalized wire options derived from the current profile.
    pub async fn connect_opts(&self) -> Result<ConnectOpts> {
        let profile = self.profile.read().await;
        connect_opts(&profile)
    }

    pub async fn connect(&self) -> Result<()> {
        let opts = self.connect_opts().await?;
        let _guard = self.lifecycle.lock().await;
        self.backend.connect(&opts).await
    }

    pub async fn disconnect(&self) -> Result<()> {
        let _guard = self.lifecycle.lock().await;
        self.backend.disconnect().await
    }

    pub async fn test(&self) -> Result<String> {
        let opts = self.connect_opts().await?;
        self.backend.test(&opts).await
    }

    /// Runs `sql` against `database` (already resolved by the caller) and
    /// normalizes the reply.
    pub async fn run_query(&self, sql: &str, database: Option<&str>) -> Result<QueryResult> {
        let raw = self.backend.query(sql, database).await?;
        Ok(QueryResult::from_raw(raw))
    }

    /// The stored `driver_opts.database`, shared by the MySQL and SQLite
    /// variants.
    pub async fn stored_database(&self) -> Option<String> {
        self.profile.read().await.driver_opts.database.clone()
    }

    /// Rewrites `driver_opts.database` in place.
    pub async fn store_database(&self, database: &str) {
        let mut profile = self.profile.write().await;
        profile.driver_opts.database = Some(database.to_string());
    }
}
