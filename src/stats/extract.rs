// Stat value extraction and per-season normalization.
//
// Provider stat records carry either a bare scalar or a small object of
// named sub-metrics, and field sets vary by category. Extraction is the
// single point that discriminates these shapes; everything downstream only
// ever sees a `NamedFields` mapping of sub-metric name to number.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ---------------------------------------------------------------------------
// Record types
// ---------------------------------------------------------------------------

/// Named sub-metric values for one category (e.g. `{in: 3, out: 2}` for
/// substitutions, `{total: 17}` for a plain counter).
pub type NamedFields = BTreeMap<String, f64>;

/// The value carried by a single stat record, as received from a provider.
///
/// Untagged: a JSON number becomes `Scalar`, a JSON object becomes
/// `Fields`, and anything else (null, string, bool, array) is `Other` and
/// normalizes to an empty result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StatValue {
    Scalar(f64),
    Fields(BTreeMap<String, Value>),
    Other(Value),
}

impl From<Value> for StatValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Number(n) => match n.as_f64() {
                Some(f) => StatValue::Scalar(f),
                None => StatValue::Other(Value::Number(n)),
            },
            Value::Object(map) => StatValue::Fields(map.into_iter().collect()),
            other => StatValue::Other(other),
        }
    }
}

/// One provider stat record: a numeric category id plus its value.
/// Immutable once received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatRecord {
    pub category_id: u32,
    pub value: StatValue,
}

impl StatRecord {
    pub fn new(category_id: u32, value: impl Into<StatValue>) -> Self {
        Self {
            category_id,
            value: value.into(),
        }
    }
}

/// One season's worth of stat records for a player, in provider order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonStats {
    pub season_id: u64,
    pub records: Vec<StatRecord>,
}

// ---------------------------------------------------------------------------
// Extraction
// ---------------------------------------------------------------------------

/// Resolve the value of `category_id` within `records` into named fields.
///
/// The first record with a matching category wins. A scalar value becomes
/// `{total: value}`; an object keeps only its numeric entries (formatted
/// strings like `"average": "7.43"` are dropped); any other shape, or no
/// matching record at all, yields an empty mapping. Never fails.
pub fn find_stat_value(records: &[StatRecord], category_id: u32) -> NamedFields {
    let record = match records.iter().find(|r| r.category_id == category_id) {
        Some(r) => r,
        None => return NamedFields::new(),
    };

    match &record.value {
        StatValue::Scalar(v) => {
            let mut fields = NamedFields::new();
            fields.insert("total".to_string(), *v);
            fields
        }
        StatValue::Fields(map) => map
            .iter()
            .filter_map(|(key, value)| value.as_f64().map(|v| (key.clone(), v)))
            .collect(),
        StatValue::Other(_) => NamedFields::new(),
    }
}

/// Normalize one season's records into a category id -> fields table.
///
/// Every distinct category in the input appears exactly once; categories
/// absent from the input are absent from the output (never zero-filled).
/// Duplicate category ids keep the first occurrence.
pub fn map_season(records: &[StatRecord]) -> BTreeMap<u32, NamedFields> {
    let mut statistics = BTreeMap::new();
    for record in records {
        // Extracting from the single claiming record keeps the pass linear;
        // a later duplicate never reaches the occupied entry.
        statistics
            .entry(record.category_id)
            .or_insert_with(|| find_stat_value(std::slice::from_ref(record), record.category_id));
    }
    statistics
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
