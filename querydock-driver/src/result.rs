//! Normalization of raw backend query replies.

use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

/// One result row: an ordered mapping of field name to value. Column order
/// is preserved (`serde_json` with `preserve_order`), which the drivers rely
/// on when extracting the first column of introspection queries.
pub type Row = serde_json::Map<String, Value>;

/// The untrusted reply shape returned by `adapter_query`.
///
/// Everything is optional and `num_rows` / `elapsed_ms` arrive as arbitrary
/// JSON values — some backends send numbers, some send numeric strings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawQueryReply {
    #[serde(default)]
    pub rows: Option<Vec<Row>>,
    #[serde(default)]
    pub fields: Option<Vec<String>>,
    #[serde(default)]
    pub num_rows: Option<Value>,
    #[serde(default)]
    pub elapsed_ms: Option<Value>,
}

/// A normalized query result with a stable value shape.
///
/// Numeric coercion never fails: non-numeric `num_rows` / `elapsed_ms` input
/// yields `None`, not an error. Serialization exposes both the canonical
/// (`numRows`, `elapsedMs`) and original (`num_rows`, `elapsed_ms`) field
/// spellings as read-only views, so callers written against either keep
/// working.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryResult {
    pub fields: Vec<String>,
    pub rows: Vec<Row>,
    pub num_rows: Option<f64>,
    pub elapsed_ms: Option<f64>,
}

fn coerce_number(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

impl QueryResult {
    /// Normalizes a raw backend reply.
    ///
    /// `fields` defaults to the key set of the first row when the backend
    /// omits it; `rows` defaults to empty.
    #[must_use]
    pub fn from_raw(raw: RawQueryReply) -> Self {
        let rows = raw.rows.unwrap_or_default();
        let fields = raw
            .fields
            .unwrap_or_else(|| rows.first().map_or_else(Vec::new, |row| row.keys().cloned().collect()));

        Self {
            fields,
            rows,
            num_rows: coerce_number(raw.num_rows.as_ref()),
            elapsed_ms: coerce_number(raw.elapsed_ms.as_ref()),
        }
    }

    /// Values of the `index`-th column of every row, in row order.
    /// Rows too short to have that column are skipped.
    #[must_use]
    pub fn column(&self, index: usize) -> Vec<&Value> {
        self.rows
            .iter()
            .filter_map(|row| row.values().nth(index))
            .collect()
    }
}

impl From<RawQueryReply> for QueryResult {
    fn from(raw: RawQueryReply) -> Self {
        Self::from_raw(raw)
    }
}

impl Serialize for QueryResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("QueryResult", 6)?;
        state.serialize_field("fields", &self.fields)?;
        state.serialize_field("rows", &self.rows)?;
        state.serialize_field("numRows", &self.num_rows)?;
        state.serialize_field("elapsedMs", &self.elapsed_ms)?;
        // compatibility views under the original spellings
        state.serialize_field("num_rows", &self.num_rows)?;
        state.serialize_field("elapsed_ms", &self.elapsed_ms)?;
        state.end()
    }
}
