use chrono::NaiveDateTime;
use futures_util::TryStreamExt;
use tiberius::QueryStream;

use crate::error::SqlConduitError;
use crate::results::RowSet;
use crate::types::SqlValue;

/// Drain a tiberius query stream into a [`RowSet`] in fetch order.
pub(crate) async fn collect_rows(mut stream: QueryStream<'_>) -> Result<RowSet, SqlConduitError> {
    let columns = stream
        .columns()
        .await?
        .map(|cols| {
            cols.iter()
                .map(|col| col.name().to_string())
                .collect::<Vec<_>>()
        })
        .unwrap_or_default();
    let column_count = columns.len();

    let mut set = RowSet::new(columns);
    let mut rows = stream.into_row_stream();
    while let Some(row) = rows.try_next().await? {
        let mut values = Vec::with_capacity(column_count);
        for idx in 0..column_count {
            values.push(extract_value(&row, idx));
        }
        set.push_row(values);
    }
    Ok(set)
}

/// Read one column of a tiberius row into a [`SqlValue`].
///
/// Tiberius exposes typed getters rather than a tagged value, so the
/// extraction probes the plausible types in order; anything unreadable is
/// reported as NULL.
fn extract_value(row: &tiberius::Row, idx: usize) -> SqlValue {
    if let Ok(Some(val)) = row.try_get::<i32, _>(idx) {
        return SqlValue::Int(i64::from(val));
    }
    if let Ok(Some(val)) = row.try_get::<i64, _>(idx) {
        return SqlValue::Int(val);
    }
    if let Ok(Some(val)) = row.try_get::<f32, _>(idx) {
        return SqlValue::Float(f64::from(val));
    }
    if let Ok(Some(val)) = row.try_get::<f64, _>(idx) {
        return SqlValue::Float(val);
    }
    if let Ok(Some(val)) = row.try_get::<bool, _>(idx) {
        return SqlValue::Bool(val);
    }
    if let Ok(Some(val)) = row.try_get::<NaiveDateTime, _>(idx) {
        return SqlValue::Timestamp(val);
    }
    if let Ok(Some(val)) = row.try_get::<&str, _>(idx) {
        return SqlValue::Text(val.to_string());
    }
    if let Ok(Some(val)) = row.try_get::<&[u8], _>(idx) {
        return SqlValue::Blob(val.to_vec());
    }
    SqlValue::Null
}
