//! The native backend RPC boundary.

use async_trait::async_trait;

use crate::error::Result;
use crate::result::RawQueryReply;
use crate::types::ConnectOpts;

/// The opaque async boundary to the native backend that actually opens
/// sockets and executes SQL (`adapter_connect` / `adapter_disconnect` /
/// `adapter_test` / `adapter_query` in the wire protocol).
///
/// Transport is out of scope here; only the call/reply contract matters.
/// Error messages from the backend pass through verbatim.
#[async_trait]
pub trait DatabaseBackend: Send + Sync {
    /// Establishes a connection using normalized options. A `ssh_opts` of
    /// `null` in the serialized options means "no tunnel".
    async fn connect(&self, opts: &ConnectOpts) -> Result<()>;

    /// Tears down the current connection.
    async fn disconnect(&self) -> Result<()>;

    /// Tests the given options without mutating the current connection
    /// state. Returns the backend's human-readable verdict.
    async fn test(&self, opts: &ConnectOpts) -> Result<String>;

    /// Runs a query against the given database (or the connection default
    /// when `None`) and returns the raw reply.
    async fn query(&self, query: &str, database: Option<&str>) -> Result<RawQueryReply>;
}
