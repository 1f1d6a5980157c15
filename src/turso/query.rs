use crate::error::SqlConduitError;
use crate::results::RowSet;
use crate::types::SqlValue;

/// Drain turso rows into a [`RowSet`] in fetch order.
pub(crate) async fn collect_rows(
    column_names: Vec<String>,
    mut rows: turso::Rows,
) -> Result<RowSet, SqlConduitError> {
    let mut set = RowSet::new(column_names);
    while let Some(row) = rows.next().await? {
        let mut values = Vec::with_capacity(row.column_count());
        for idx in 0..row.column_count() {
            values.push(extract_value(&row, idx)?);
        }
        set.push_row(values);
    }
    Ok(set)
}

fn extract_value(row: &turso::Row, idx: usize) -> Result<SqlValue, SqlConduitError> {
    Ok(match row.get_value(idx)? {
        turso::Value::Null => SqlValue::Null,
        turso::Value::Integer(i) => SqlValue::Int(i),
        turso::Value::Real(f) => SqlValue::Float(f),
        turso::Value::Text(s) => SqlValue::Text(s),
        turso::Value::Blob(b) => SqlValue::Blob(b),
    })
}
