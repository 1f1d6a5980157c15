use tiberius::Query;

use crate::types::{SqlParam, SqlValue};

/// Bind parameters onto a tiberius query builder, in caller order.
/// Timestamps travel as ISO-8601 text so DATETIME2 round-trips lossless.
pub(crate) fn bind_params<'a>(sql: &'a str, params: &[SqlParam]) -> Query<'a> {
    let mut builder = Query::new(sql);
    for param in params {
        match &param.value {
            SqlValue::Int(i) => builder.bind(*i),
            SqlValue::Float(f) => builder.bind(*f),
            SqlValue::Text(s) => builder.bind(s.clone()),
            SqlValue::Bool(b) => builder.bind(*b),
            SqlValue::Timestamp(dt) => {
                builder.bind(dt.format("%Y-%m-%dT%H:%M:%S%.f").to_string());
            }
            SqlValue::Null => builder.bind(Option::<String>::None),
            SqlValue::Json(j) => builder.bind(j.to_string()),
            SqlValue::Blob(bytes) => builder.bind(bytes.clone()),
        }
    }
    builder
}
