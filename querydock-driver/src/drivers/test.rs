//! Mock driver variant.
//!
//! Stands in for a live backend in UI work and Connector-contract tests:
//! calls resolve locally, latency is simulated, and results are synthesized
//! pseudo-randomly. The reserved query text [`ERROR_SENTINEL`] fails
//! deterministically so error paths stay testable.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rand::distr::Alphanumeric;
use rand::Rng;
use tokio::sync::RwLock;

use crate::backend::DatabaseBackend;
use crate::error::{DriverError, Result};
use crate::result::{QueryResult, Row};
use crate::traits::{Connector, DriverBase};
use crate::types::{ConnectionProfile, DriverKind};

/// Query text that always fails.
pub const ERROR_SENTINEL: &str = "error";

/// Upper bound of the simulated per-call latency.
const MAX_LATENCY_MS: u64 = 150;

const MAX_ROWS: usize = 1000;

const SYNTHETIC_FIELDS: &[&str] = &["id", "user_id", "username", "email", "bio"];

fn random_word(len: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect::<String>()
        .to_lowercase()
}

fn random_latency() -> Duration {
    Duration::from_millis(rand::rng().random_range(0..=MAX_LATENCY_MS))
}

fn synthesize_rows() -> Vec<Row> {
    let count = rand::rng().random_range(0..MAX_ROWS);
    (0..count)
        .map(|i| {
            let mut row = Row::new();
            row.insert("id".to_string(), (i + 1).into());
            row.insert("user_id".to_string(), random_word(32).into());
            row.insert("username".to_string(), random_word(8).into());
            row.insert(
                "email".to_string(),
                format!("{}@example.com", random_word(10)).into(),
            );
            row.insert("bio".to_string(), random_word(40).into());
            row
        })
        .collect()
}

fn synthesize_names(count: usize) -> Vec<String> {
    (0..count).map(|_| random_word(12)).collect()
}

/// Mock connector. Keeps its selected database locally instead of in the
/// profile, and never calls through to the backend.
pub struct TestDriver {
    base: DriverBase,
    database: RwLock<Option<String>>,
}

impl TestDriver {
    pub fn new(profile: ConnectionProfile, backend: Arc<dyn DatabaseBackend>) -> Self {
        Self {
            base: DriverBase::new(profile, backend),
            database: RwLock::new(None),
        }
    }
}

#[async_trait]
impl Connector for TestDriver {
    fn kind(&self) -> DriverKind {
        DriverKind::Test
    }

    async fn connect(&self) -> Result<()> {
        let _ = self.base.connect_opts().await?;
        Ok(())
    }

    async fn disconnect(&self) -> Result<()> {
        Ok(())
    }

    async fn test(&self) -> Result<String> {
        Ok("Test passed".to_string())
    }

    async fn query(&self, sql: &str, _database: Option<&str>) -> Result<QueryResult> {
        if sql == ERROR_SENTINEL {
            return Err(DriverError::Query(format!(
                "Mock error message: {}",
                random_word(16)
            )));
        }

        let latency = random_latency();
        tokio::time::sleep(latency).await;

        let rows = synthesize_rows();
        let num_rows = rows.len();
        Ok(QueryResult {
            fields: SYNTHETIC_FIELDS.iter().map(ToString::to_string).collect(),
            rows,
            num_rows: Some(num_rows as f64),
            elapsed_ms: Some(latency.as_millis() as f64),
        })
    }

    async fn get_database(&self) -> Option<String> {
        self.database.read().await.clone()
    }

    async fn set_database(&self, database: &str) {
        *self.database.write().await = Some(database.to_string());
    }

    async fn load_databases(&self) -> Result<Vec<String>> {
        Ok(synthesize_names(20))
    }

    async fn load_tables(&self) -> Result<Vec<String>> {
        Ok(synthesize_names(100))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::MockBackend;

    fn driver() -> TestDriver {
        TestDriver::new(
            ConnectionProfile {
                driver_name: Some(DriverKind::Test),
                ..ConnectionProfile::default()
            },
            Arc::new(MockBackend::new()),
        )
    }

    #[tokio::test]
    async fn sentinel_query_fails_deterministically() {
        let connector = driver();
        for _ in 0..3 {
            let err = connector.query(ERROR_SENTINEL, None).await.unwrap_err();
            assert!(matches!(err, DriverError::Query(_)));
            assert!(err.to_string().starts_with("Mock error message:"));
        }
    }

    #[tokio::test]
    async fn synthesized_result_is_consistent() {
        let result = driver().query("SELECT * FROM anything", None).await.unwrap();
        assert_eq!(result.fields, SYNTHETIC_FIELDS);
        assert_eq!(result.num_rows, Some(result.rows.len() as f64));
        for row in &result.rows {
            assert_eq!(row.keys().count(), SYNTHETIC_FIELDS.len());
        }
    }

    #[tokio::test]
    async fn lifecycle_resolves_locally() {
        let backend = Arc::new(MockBackend::new());
        let connector = TestDriver::new(
            ConnectionProfile {
                driver_name: Some(DriverKind::Test),
                ..ConnectionProfile::default()
            },
            backend.clone(),
        );

        connector.connect().await.unwrap();
        assert_eq!(connector.test().await.unwrap(), "Test passed");
        connector.disconnect().await.unwrap();
        assert_eq!(backend.connect_count(), 0);
        assert_eq!(backend.disconnect_count(), 0);
    }

    #[tokio::test]
    async fn database_selection_is_local_state() {
        let connector = driver();
        assert_eq!(connector.get_database().await, None);
        connector.set_database("mock_db").await;
        assert_eq!(connector.get_database().await.as_deref(), Some("mock_db"));

        let databases = connector.load_databases().await.unwrap();
        assert_eq!(databases.len(), 20);
        let tables = connector.load_tables().await.unwrap();
        assert_eq!(tables.len(), 100);
    }
}
