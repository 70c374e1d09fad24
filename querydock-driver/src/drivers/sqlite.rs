//! SQLite driver variant.

use std::sync::Arc;

use async_trait::async_trait;
use futures::future;

use super::column_names;
use crate::backend::DatabaseBackend;
use crate::error::{DriverError, Result};
use crate::result::QueryResult;
use crate::traits::{Connector, DriverBase};
use crate::types::{ConnectionProfile, DriverKind};

/// SQLite has renamed its internal catalog table over the years
/// (<https://sqlite.org/schematab.html>). All known names are probed and the
/// first structurally valid reply wins.
const CATALOG_TABLES: &[&str] = &["sqlite_schema", "sqlite_master"];

/// SQLite connector. Introspection never surfaces errors to the caller:
/// both listing operations degrade to an empty list and log instead.
pub struct SqliteDriver {
    base: DriverBase,
}

impl SqliteDriver {
    pub fn new(profile: ConnectionProfile, backend: Arc<dyn DatabaseBackend>) -> Self {
        Self {
            base: DriverBase::new(profile, backend),
        }
    }

    /// Looks up user tables/views through one candidate catalog table.
    ///
    /// A reply with an empty field set means "this catalog name doesn't
    /// exist in this engine version" — success is judged by schema shape,
    /// not by the absence of a transport error.
    async fn probe_catalog(&self, catalog: &str) -> Result<QueryResult> {
        let sql = format!(
            "SELECT name FROM {catalog} WHERE type IN (\"table\", \"view\") AND name NOT LIKE \"sqlite_%\""
        );
        let result = self.query(&sql, None).await?;
        if result.fields.is_empty() {
            return Err(DriverError::Query(format!("{catalog} does not exist")));
        }
        Ok(result)
    }
}

#[async_trait]
impl Connector for SqliteDriver {
    fn kind(&self) -> DriverKind {
        DriverKind::Sqlite
    }

    async fn connect(&self) -> Result<()> {
        self.base.connect().await
    }

    async fn disconnect(&self) -> Result<()> {
        self.base.disconnect().await
    }

    async fn test(&self) -> Result<String> {
        self.base.test().await
    }

    async fn query(&self, sql: &str, database: Option<&str>) -> Result<QueryResult> {
        let active = match database {
            Some(db) => Some(db.to_string()),
            None => self.get_database().await,
        };
        self.base.run_query(sql, active.as_deref()).await
    }

    async fn get_database(&self) -> Option<String> {
        self.base.stored_database().await
    }

    async fn set_database(&self, database: &str) {
        self.base.store_database(database).await;
    }

    async fn load_databases(&self) -> Result<Vec<String>> {
        // PRAGMA database_list: seq | name | file — the schema name is the
        // second column.
        match self.query("PRAGMA database_list", None).await {
            Ok(result) => {
                let names = column_names(&result, 1)
                    .into_iter()
                    .filter(|name| !name.is_empty())
                    .collect();
                Ok(names)
            }
            Err(e) => {
                log::error!("[sqlite] database listing failed: {e}");
                Ok(Vec::new())
            }
        }
    }

    async fn load_tables(&self) -> Result<Vec<String>> {
        // Probe every candidate concurrently; first shape-valid reply wins,
        // explicitly out of invocation order.
        let probes = CATALOG_TABLES
            .iter()
            .map(|catalog| Box::pin(self.probe_catalog(catalog)));

        match future::select_ok(probes).await {
            Ok((result, _)) => Ok(column_names(&result, 0)),
            Err(e) => {
                log::error!("[sqlite] no catalog table answered: {e}");
                Ok(Vec::new())
            }
        }
    }
}
