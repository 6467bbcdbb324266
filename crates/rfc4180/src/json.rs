//! JSON views of records and header rows.

use serde_json::{Map, Value};

use crate::stream::Row;

pub fn record_to_json(record: &[String]) -> Value {
    Value::Array(record.iter().cloned().map(Value::String).collect())
}

/// Object keyed in header order. A repeated header keeps its last value.
pub fn row_to_json(row: &Row) -> Value {
    let mut map = Map::with_capacity(row.len());
    for (k, v) in row {
        map.insert(k.clone(), Value::String(v.clone()));
    }
    Value::Object(map)
}
