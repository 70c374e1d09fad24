//! Driver variants implementing the [`Connector`](crate::Connector)
//! contract.

mod mysql;
mod sqlite;
mod test;

pub use mysql::MysqlDriver;
pub use sqlite::SqliteDriver;
pub use test::{TestDriver, ERROR_SENTINEL};

use serde_json::Value;

use crate::result::QueryResult;

/// Extracts column `index` of every row as display names. Null cells are
/// dropped; non-string scalars are stringified the way a loosely typed
/// frontend would have seen them.
pub(crate) fn column_names(result: &QueryResult, index: usize) -> Vec<String> {
    result
        .column(index)
        .into_iter()
        .filter_map(|value| match value {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        })
        .collect()
}
