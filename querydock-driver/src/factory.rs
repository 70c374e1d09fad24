//! Connector factory.

use std::sync::Arc;

use crate::backend::DatabaseBackend;
use crate::drivers::{MysqlDriver, SqliteDriver, TestDriver};
use crate::error::{DriverError, Result};
use crate::traits::Connector;
use crate::types::{ConnectionProfile, DriverKind};

/// Creates a [`Connector`] for the given profile, selected by its
/// `driver_name` tag. The returned connector is wrapped in
/// `Arc<dyn Connector>` for sharing across async tasks.
pub fn create_connector(
    profile: ConnectionProfile,
    backend: Arc<dyn DatabaseBackend>,
) -> Result<Arc<dyn Connector>> {
    match profile.driver_name {
        Some(DriverKind::Mysql) => Ok(Arc::new(MysqlDriver::new(profile, backend))),
        Some(DriverKind::Sqlite) => Ok(Arc::new(SqliteDriver::new(profile, backend))),
        Some(DriverKind::Test) => Ok(Arc::new(TestDriver::new(profile, backend))),
        None => Err(DriverError::Config(
            "connection profile has no driver".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::MockBackend;

    fn profile(driver: Option<DriverKind>) -> ConnectionProfile {
        ConnectionProfile {
            driver_name: driver,
            ..ConnectionProfile::default()
        }
    }

    #[test]
    fn selects_variant_by_driver_tag() {
        let backend: Arc<MockBackend> = Arc::new(MockBackend::new());
        for kind in [DriverKind::Mysql, DriverKind::Sqlite, DriverKind::Test] {
            let connector = create_connector(profile(Some(kind)), backend.clone()).unwrap();
            assert_eq!(connector.kind(), kind);
        }
    }

    #[test]
    fn missing_driver_tag_is_a_config_error() {
        let backend: Arc<MockBackend> = Arc::new(MockBackend::new());
        let err = create_connector(profile(None), backend).unwrap_err();
        assert!(matches!(err, DriverError::Config(_)));
    }
}
