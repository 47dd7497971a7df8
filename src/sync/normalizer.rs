//! Maps heterogeneous table headers onto the fixed `{SKU, Model, Qty}` schema
//!
//! Header lookup is an ordered priority list per field: the first candidate
//! that matches a header (case-insensitive, surrounding whitespace ignored)
//! wins. An explicit override replaces the whole list for its field.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::config::ColumnOverrides;

/// One table row keyed by column name
pub type RawRow = Map<String, Value>;

pub const DEFAULT_SKU_ALIASES: &[&str] = &["SKU", "Артикул", "Sku"];

pub const DEFAULT_MODEL_ALIASES: &[&str] = &["Model", "Модель", "Наименование", "Название"];

pub const DEFAULT_QTY_ALIASES: &[&str] = &[
    "Бронь для сервиса",
    "Бронь_для_сервиса",
    "Service reserve",
    "Service Reserve",
    "Qty, pcs",
    "Qty",
    "Количество",
    "Кол-во",
];

/// Output record. Field order here is the serialized key order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StockRecord {
    #[serde(rename = "SKU")]
    pub sku: String,
    #[serde(rename = "Model")]
    pub model: String,
    #[serde(rename = "Qty")]
    pub qty: i64,
}

/// Candidate header names for each logical field
#[derive(Debug, Clone, PartialEq)]
pub struct FieldAliases {
    pub sku: Vec<String>,
    pub model: Vec<String>,
    pub qty: Vec<String>,
}

impl Default for FieldAliases {
    fn default() -> Self {
        Self {
            sku: to_owned(DEFAULT_SKU_ALIASES),
            model: to_owned(DEFAULT_MODEL_ALIASES),
            qty: to_owned(DEFAULT_QTY_ALIASES),
        }
    }
}

impl FieldAliases {
    /// Default lists, with any override taking over its field entirely
    pub fn with_overrides(overrides: &ColumnOverrides) -> Self {
        let defaults = Self::default();
        Self {
            sku: pick_list(&overrides.sku, defaults.sku),
            model: pick_list(&overrides.model, defaults.model),
            qty: pick_list(&overrides.qty, defaults.qty),
        }
    }
}

fn to_owned(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

fn pick_list(over: &Option<String>, defaults: Vec<String>) -> Vec<String> {
    match over {
        Some(name) => vec![name.clone()],
        None => defaults,
    }
}

fn normalize_key(key: &str) -> String {
    key.trim().to_lowercase()
}

/// Value of the first candidate header present in the row.
///
/// Headers that collide after trimming and lowercasing resolve to the rightmost
/// column. `None` when no candidate matches; a matched but empty cell is `Some(Null)`.
pub fn pick_column<'a, S: AsRef<str>>(row: &'a RawRow, candidates: &[S]) -> Option<&'a Value> {
    candidates.iter().find_map(|candidate| {
        let wanted = normalize_key(candidate.as_ref());
        row.iter()
            .filter(|(key, _)| normalize_key(key) == wanted)
            .map(|(_, value)| value)
            .last()
    })
}

/// Cell rendered as trimmed text; null and absent become empty
pub fn cell_to_string(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.trim().to_string(),
        Some(other) => other.to_string().trim().to_string(),
    }
}

/// Lenient integer coercion for quantity cells. Anything unparseable is 0.
pub fn to_int(value: Option<&Value>) -> i64 {
    match value {
        None | Some(Value::Null) => 0,
        Some(Value::Bool(b)) => i64::from(*b),
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.trunc() as i64))
            .unwrap_or(0),
        Some(Value::String(s)) => parse_quantity(s),
        Some(_) => 0,
    }
}

/// Strip spaces (including NBSP), keep digits and minus signs, parse the rest
pub fn parse_quantity(text: &str) -> i64 {
    let cleaned: String = text
        .trim()
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '-')
        .collect();

    if cleaned.is_empty() {
        return 0;
    }
    cleaned.parse().unwrap_or(0)
}

/// Normalize one row, or `None` when it has no SKU
pub fn normalize_row(row: &RawRow, aliases: &FieldAliases) -> Option<StockRecord> {
    let sku = cell_to_string(pick_column(row, aliases.sku.as_slice()));
    if sku.is_empty() {
        return None;
    }

    Some(StockRecord {
        sku,
        model: cell_to_string(pick_column(row, aliases.model.as_slice())),
        qty: to_int(pick_column(row, aliases.qty.as_slice())),
    })
}

/// Normalize every row, silently dropping those without a SKU. Order is preserved.
pub fn normalize_rows(rows: &[RawRow], aliases: &FieldAliases) -> Vec<StockRecord> {
    rows.iter()
        .filter_map(|row| normalize_row(row, aliases))
        .collect()
}
