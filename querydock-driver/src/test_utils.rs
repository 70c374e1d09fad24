//! Test helpers: a scriptable in-memory [`DatabaseBackend`].
//!
//! The [`TestDriver`](crate::TestDriver) covers UI-facing mocking; this
//! backend is for exercising the real driver variants against canned
//! replies without a native backend process.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use crate::backend::DatabaseBackend;
use crate::error::{DriverError, Result};
use crate::result::RawQueryReply;
use crate::types::ConnectOpts;

/// Scriptable backend: canned replies per exact query text, call recording,
/// and instrumentation for asserting single-flight connect serialization.
#[derive(Default)]
pub struct MockBackend {
    replies: RwLock<HashMap<String, std::result::Result<Value, String>>>,
    queries: RwLock<Vec<(String, Option<String>)>>,
    connect_opts: RwLock<Vec<ConnectOpts>>,
    connect_error: RwLock<Option<String>>,
    disconnect_error: RwLock<Option<String>>,
    connect_delay: RwLock<Option<Duration>>,
    connect_count: AtomicUsize,
    disconnect_count: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl MockBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Scripts the reply for an exact query text. `Ok` takes the raw JSON
    /// reply shape; `Err` the backend's verbatim error message.
    pub async fn stub_query(&self, sql: &str, reply: std::result::Result<Value, &str>) {
        self.replies
            .write()
            .await
            .insert(sql.to_string(), reply.map_err(str::to_string));
    }

    /// Makes subsequent `connect` calls fail with the given message.
    pub async fn fail_connects(&self, message: &str) {
        *self.connect_error.write().await = Some(message.to_string());
    }

    /// Makes subsequent `disconnect` calls fail with the given message.
    pub async fn fail_disconnects(&self, message: &str) {
        *self.disconnect_error.write().await = Some(message.to_string());
    }

    /// Adds artificial latency to `connect`, for overlap instrumentation.
    pub async fn delay_connects(&self, delay: Duration) {
        *self.connect_delay.write().await = Some(delay);
    }

    /// Every `(sql, database)` pair seen by `query`, in arrival order.
    pub async fn queries(&self) -> Vec<(String, Option<String>)> {
        self.queries.read().await.clone()
    }

    /// Every normalized options value seen by `connect`.
    pub async fn seen_connect_opts(&self) -> Vec<ConnectOpts> {
        self.connect_opts.read().await.clone()
    }

    #[must_use]
    pub fn connect_count(&self) -> usize {
        self.connect_count.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn disconnect_count(&self) -> usize {
        self.disconnect_count.load(Ordering::SeqCst)
    }

    /// Highest number of `connect` calls observed in flight at once.
    #[must_use]
    pub fn max_concurrent_connects(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DatabaseBackend for MockBackend {
    async fn connect(&self, opts: &ConnectOpts) -> Result<()> {
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);

        self.connect_count.fetch_add(1, Ordering::SeqCst);
        self.connect_opts.write().await.push(opts.clone());

        let delay = *self.connect_delay.read().await;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        match &*self.connect_error.read().await {
            Some(message) => Err(DriverError::Connection(message.clone())),
            None => Ok(()),
        }
    }

    async fn disconnect(&self) -> Result<()> {
        self.disconnect_count.fetch_add(1, Ordering::SeqCst);
        match &*self.disconnect_error.read().await {
            Some(message) => Err(DriverError::Connection(message.clone())),
            None => Ok(()),
        }
    }

    async fn test(&self, _opts: &ConnectOpts) -> Result<String> {
        match &*self.connect_error.read().await {
            Some(message) => Err(DriverError::Connection(message.clone())),
            None => Ok("Connection OK".to_string()),
        }
    }

    async fn query(&self, query: &str, database: Option<&str>) -> Result<RawQueryReply> {
        self.queries
            .write()
            .await
            .push((query.to_string(), database.map(str::to_string)));

        let reply = self
            .replies
            .read()
            .await
            .get(query)
            .cloned()
            .unwrap_or_else(|| Err(format!("unexpected query: {query}")));

        match reply {
            Ok(value) => serde_json::from_value(value)
                .map_err(|e| DriverError::Query(format!("malformed stubbed reply: {e}"))),
            Err(message) => Err(DriverError::Query(message)),
        }
    }
}
