use rusqlite::types::Value;

use crate::types::{SqlParam, SqlValue};

/// Convert bound parameters into owned rusqlite values, in caller order.
/// Owned values are required because execution happens on a blocking task.
pub(crate) fn to_sqlite_values(params: &[SqlParam]) -> Vec<Value> {
    params.iter().map(|p| to_sqlite_value(&p.value)).collect()
}

fn to_sqlite_value(value: &SqlValue) -> Value {
    match value {
        SqlValue::Int(i) => Value::Integer(*i),
        SqlValue::Float(f) => Value::Real(*f),
        SqlValue::Text(s) => Value::Text(s.clone()),
        SqlValue::Bool(b) => Value::Integer(i64::from(*b)),
        // SQLite stores date/time as TEXT; this format sorts chronologically.
        SqlValue::Timestamp(dt) => Value::Text(dt.format("%F %T%.f").to_string()),
        SqlValue::Null => Value::Null,
        SqlValue::Json(j) => Value::Text(j.to_string()),
        SqlValue::Blob(bytes) => Value::Blob(bytes.clone()),
    }
}
