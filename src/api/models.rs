//! Wire models for Graph responses
//!
//! Only the fields the sync pipeline reads are modelled. Everything else in
//! the payload is ignored by serde.

use serde::Deserialize;
use serde_json::Value;

/// Response wrapper for paginated Graph list responses.
#[derive(Debug, Clone, Deserialize)]
pub struct ODataPage<T> {
    #[serde(default = "Vec::new")]
    pub value: Vec<T>,
    #[serde(rename = "@odata.nextLink", default)]
    pub next_link: Option<String>,
}

impl<T> ODataPage<T> {
    /// Check if there are more results available
    pub fn has_more(&self) -> bool {
        self.next_link.is_some()
    }
}

/// A workbook table column descriptor.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TableColumn {
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_index")]
    pub index: i64,
}

/// A workbook table row. Graph wraps the cells in an outer array.
#[derive(Debug, Clone, Deserialize)]
pub struct TableRow {
    #[serde(default)]
    pub values: Option<Vec<Vec<Value>>>,
}

impl TableRow {
    /// The positional cell values of this row (empty when absent).
    pub fn cells(&self) -> &[Value] {
        self.values
            .as_ref()
            .and_then(|outer| outer.first())
            .map(|inner| inner.as_slice())
            .unwrap_or(&[])
    }
}

/// Sort column descriptors by index and return their names in that order.
pub fn ordered_column_names(mut columns: Vec<TableColumn>) -> Vec<String> {
    columns.sort_by_key(|c| c.index);
    columns.into_iter().map(|c| c.name).collect()
}

/// Accept the index as a number or a numeric string; anything else sorts first.
fn lenient_index<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)).unwrap_or(0),
        Value::String(s) => s.trim().parse().unwrap_or(0),
        _ => 0,
    })
}
