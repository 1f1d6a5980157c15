use crate::types::{SqlParam, SqlValue};

/// Convert bound parameters into positional turso values, in caller order.
pub(crate) fn to_turso_params(params: &[SqlParam]) -> turso::params::Params {
    let values: Vec<turso::Value> = params.iter().map(|p| to_turso_value(&p.value)).collect();
    turso::params::Params::Positional(values)
}

fn to_turso_value(value: &SqlValue) -> turso::Value {
    match value {
        SqlValue::Int(i) => turso::Value::Integer(*i),
        SqlValue::Float(f) => turso::Value::Real(*f),
        SqlValue::Text(s) => turso::Value::Text(s.clone()),
        SqlValue::Bool(b) => turso::Value::Integer(i64::from(*b)),
        // Same TEXT representation the sqlite converter uses, for parity
        // across the SQLite-compatible backends.
        SqlValue::Timestamp(dt) => turso::Value::Text(dt.format("%F %T%.f").to_string()),
        SqlValue::Null => turso::Value::Null,
        SqlValue::Json(j) => turso::Value::Text(j.to_string()),
        SqlValue::Blob(bytes) => turso::Value::Blob(bytes.clone()),
    }
}
