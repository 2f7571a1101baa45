//! Generic row representation.
//!
//! A few tables (`sites`, `user_order_callbacks`, `user_order_feedback`) are
//! read with `SELECT *` and their layout belongs to other systems, so rows
//! from them are returned as a column-name keyed map instead of a struct.

use rusqlite::types::ValueRef;
use serde::Serialize;
use std::collections::BTreeMap;

/// A single SQLite column value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(v) => Some(v.as_str()),
            _ => None,
        }
    }
}

impl From<ValueRef<'_>> for Value {
    fn from(value: ValueRef<'_>) -> Self {
        match value {
            ValueRef::Null => Value::Null,
            ValueRef::Integer(v) => Value::Integer(v),
            ValueRef::Real(v) => Value::Real(v),
            ValueRef::Text(v) => Value::Text(String::from_utf8_lossy(v).into_owned()),
            ValueRef::Blob(v) => Value::Blob(v.to_vec()),
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

/// Column name to value.
pub type Row = BTreeMap<String, Value>;

/// Copy every column of a result row into a [`Row`].
pub fn row_to_map(row: &rusqlite::Row<'_>) -> rusqlite::Result<Row> {
    let stmt: &rusqlite::Statement<'_> = row.as_ref();
    let mut map = Row::new();
    for (idx, name) in stmt.column_names().into_iter().enumerate() {
        map.insert(name.to_string(), Value::from(row.get_ref(idx)?));
    }
    Ok(map)
}
