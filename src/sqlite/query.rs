use rusqlite::types::Value;
use rusqlite::{Statement, ToSql};

use crate::error::SqlConduitError;
use crate::results::RowSet;
use crate::types::SqlValue;

/// Read one column of a rusqlite row into a [`SqlValue`].
fn extract_value(row: &rusqlite::Row, idx: usize) -> Result<SqlValue, SqlConduitError> {
    let value: Value = row.get(idx).map_err(SqlConduitError::Sqlite)?;
    Ok(match value {
        Value::Null => SqlValue::Null,
        Value::Integer(i) => SqlValue::Int(i),
        Value::Real(f) => SqlValue::Float(f),
        Value::Text(s) => SqlValue::Text(s),
        Value::Blob(b) => SqlValue::Blob(b),
    })
}

/// Run a prepared statement and collect every row into a [`RowSet`] in
/// fetch order.
pub(crate) fn collect_rows(
    stmt: &mut Statement,
    params: &[Value],
) -> Result<RowSet, SqlConduitError> {
    let param_refs: Vec<&dyn ToSql> = params.iter().map(|v| v as &dyn ToSql).collect();
    let column_names: Vec<String> = stmt
        .column_names()
        .iter()
        .map(std::string::ToString::to_string)
        .collect();
    let column_count = column_names.len();

    let mut set = RowSet::new(column_names);
    let mut rows = stmt.query(&param_refs[..])?;
    while let Some(row) = rows.next()? {
        let mut values = Vec::with_capacity(column_count);
        for idx in 0..column_count {
            values.push(extract_value(row, idx)?);
        }
        set.push_row(values);
    }
    Ok(set)
}
