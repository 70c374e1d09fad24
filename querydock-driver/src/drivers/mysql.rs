//! MySQL driver variant.

use std::sync::Arc;

use async_trait::async_trait;

use super::column_names;
use crate::backend::DatabaseBackend;
use crate::error::Result;
use crate::result::QueryResult;
use crate::traits::{Connector, DriverBase};
use crate::types::{ConnectionProfile, DriverKind};

/// MySQL connector. Databases are schemas; table listing is scoped to the
/// selected schema. Connection pooling is backend-managed, so `disconnect`
/// is a no-op success.
pub struct MysqlDriver {
    base: DriverBase,
}

impl MysqlDriver {
    pub fn new(profile: ConnectionProfile, backend: Arc<dyn DatabaseBackend>) -> Self {
        Self {
            base: DriverBase::new(profile, backend),
        }
    }
}

#[async_trait]
impl Connector for MysqlDriver {
    fn kind(&self) -> DriverKind {
        DriverKind::Mysql
    }

    async fn connect(&self) -> Result<()> {
        self.base.connect().await
    }

    async fn disconnect(&self) -> Result<()> {
        // Pooled by the backend; nothing to tear down per connector.
        Ok(())
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
        let result = self.query("SHOW DATABASES;", None).await?;
        Ok(column_names(&result, 0))
    }

    async fn load_tables(&self) -> Result<Vec<String>> {
        // Without a selected schema there is nothing to list; not an error.
        let Some(schema) = self.get_database().await else {
            return Ok(Vec::new());
        };
        let result = self
            .query(&format!("SHOW TABLES IN {schema};"), None)
            .await?;
        Ok(column_names(&result, 0))
    }
}
