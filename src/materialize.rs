//! Row-to-record materialization.
//!
//! Two modes: typed (a [`FromRow`] target, columns matched to fields by
//! case-insensitive name) and dynamic ([`DynamicRow`], every column verbatim).
//! The typed binding plan is written once per target type via
//! [`impl_from_row!`](crate::impl_from_row) rather than recomputed per row.

use chrono::NaiveDateTime;
use serde_json::Value as JsonValue;

use crate::error::SqlConduitError;
use crate::results::DynamicRow;
use crate::types::SqlValue;

/// A failed [`SqlValue`] conversion: what was found and what was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoercionError {
    pub found: &'static str,
    pub target: &'static str,
}

impl CoercionError {
    fn new(value: &SqlValue, target: &'static str) -> Self {
        Self {
            found: value.kind_name(),
            target,
        }
    }
}

/// Conversion from a fetched [`SqlValue`] into a caller type.
///
/// Used by the scalar execution shape and by typed field binding. A NULL only
/// converts into `Option<T>` or `SqlValue` itself; any other mismatch is a
/// [`CoercionError`].
pub trait FromSqlValue: Sized {
    /// # Errors
    /// Returns [`CoercionError`] when the value cannot represent the target type.
    fn from_sql_value(value: SqlValue) -> Result<Self, CoercionError>;
}

impl FromSqlValue for SqlValue {
    fn from_sql_value(value: SqlValue) -> Result<Self, CoercionError> {
        Ok(value)
    }
}

impl<T: FromSqlValue> FromSqlValue for Option<T> {
    fn from_sql_value(value: SqlValue) -> Result<Self, CoercionError> {
        if value.is_null() {
            Ok(None)
        } else {
            T::from_sql_value(value).map(Some)
        }
    }
}

impl FromSqlValue for i64 {
    fn from_sql_value(value: SqlValue) -> Result<Self, CoercionError> {
        match value {
            SqlValue::Int(i) => Ok(i),
            other => Err(CoercionError::new(&other, "i64")),
        }
    }
}

impl FromSqlValue for i32 {
    fn from_sql_value(value: SqlValue) -> Result<Self, CoercionError> {
        match value {
            SqlValue::Int(i) => {
                i32::try_from(i).map_err(|_| CoercionError::new(&SqlValue::Int(i), "i32"))
            }
            other => Err(CoercionError::new(&other, "i32")),
        }
    }
}

impl FromSqlValue for f64 {
    fn from_sql_value(value: SqlValue) -> Result<Self, CoercionError> {
        match value {
            SqlValue::Float(f) => Ok(f),
            // Integer-typed columns are a legitimate source for float fields.
            #[allow(clippy::cast_precision_loss)]
            SqlValue::Int(i) => Ok(i as f64),
            other => Err(CoercionError::new(&other, "f64")),
        }
    }
}

impl FromSqlValue for String {
    fn from_sql_value(value: SqlValue) -> Result<Self, CoercionError> {
        match value {
            SqlValue::Text(s) => Ok(s),
            other => Err(CoercionError::new(&other, "String")),
        }
    }
}

impl FromSqlValue for bool {
    fn from_sql_value(value: SqlValue) -> Result<Self, CoercionError> {
        match value.as_bool() {
            Some(b) => Ok(*b),
            None => Err(CoercionError::new(&value, "bool")),
        }
    }
}

impl FromSqlValue for NaiveDateTime {
    fn from_sql_value(value: SqlValue) -> Result<Self, CoercionError> {
        value
            .as_timestamp()
            .ok_or_else(|| CoercionError::new(&value, "NaiveDateTime"))
    }
}

impl FromSqlValue for Vec<u8> {
    fn from_sql_value(value: SqlValue) -> Result<Self, CoercionError> {
        match value {
            SqlValue::Blob(bytes) => Ok(bytes),
            other => Err(CoercionError::new(&other, "Vec<u8>")),
        }
    }
}

impl FromSqlValue for JsonValue {
    fn from_sql_value(value: SqlValue) -> Result<Self, CoercionError> {
        match value {
            SqlValue::Json(j) => Ok(j),
            other => Err(CoercionError::new(&other, "serde_json::Value")),
        }
    }
}

/// A typed materialization target: one record per fetched row.
///
/// Implementations are expected to start from the type's default value and
/// assign only the fields whose names match a column case-insensitively;
/// a backend NULL leaves the field at its default. A row with zero matching
/// columns therefore yields one default-valued record, not a failure.
/// [`impl_from_row!`](crate::impl_from_row) generates exactly that impl.
pub trait FromRow: Sized {
    /// # Errors
    /// Returns [`SqlConduitError::Materialization`] when a matched column's
    /// value cannot convert into the field's type.
    fn from_row(row: &DynamicRow) -> Result<Self, SqlConduitError>;
}

/// Bind one field from a row, used by [`impl_from_row!`](crate::impl_from_row).
///
/// Missing column or NULL keeps the current (default) field value.
///
/// # Errors
/// Returns [`SqlConduitError::Materialization`] when the column value cannot
/// convert into the field type.
pub fn bind_field<T: FromSqlValue>(
    row: &DynamicRow,
    column: &str,
    field: &mut T,
) -> Result<(), SqlConduitError> {
    if let Some(value) = row.get_ci(column)
        && !value.is_null()
    {
        *field = T::from_sql_value(value.clone()).map_err(|e| {
            SqlConduitError::Materialization {
                column: column.to_string(),
                found: e.found,
                target: e.target,
            }
        })?;
    }
    Ok(())
}

/// Implement [`FromRow`] for a `Default` struct by listing the fields that
/// bind to result columns (matched case-insensitively by field name).
///
/// ```rust
/// use sql_conduit::impl_from_row;
///
/// #[derive(Debug, Default, PartialEq)]
/// struct Order {
///     id: i64,
///     amount: f64,
///     note: String,
/// }
/// impl_from_row!(Order { id, amount, note });
/// ```
#[macro_export]
macro_rules! impl_from_row {
    ($ty:ty { $($field:ident),+ $(,)? }) => {
        impl $crate::FromRow for $ty {
            fn from_row(
                row: &$crate::DynamicRow,
            ) -> Result<Self, $crate::SqlConduitError> {
                let mut record = <$ty as Default>::default();
                $(
                    $crate::materialize::bind_field(
                        row,
                        stringify!($field),
                        &mut record.$field,
                    )?;
                )+
                Ok(record)
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::RowSet;

    #[derive(Debug, Default, PartialEq)]
    struct Widget {
        id: i64,
        name: String,
        extra: String,
    }
    impl_from_row!(Widget { id, name, extra });

    fn row(columns: Vec<&str>, values: Vec<SqlValue>) -> DynamicRow {
        let mut set = RowSet::new(columns.into_iter().map(String::from).collect());
        set.push_row(values);
        set.into_dynamic().remove(0)
    }

    #[test]
    fn matched_columns_bind_and_unmatched_fields_stay_default() {
        let row = row(
            vec!["id", "name"],
            vec![SqlValue::Int(1), SqlValue::Text("a".into())],
        );
        let widget = Widget::from_row(&row).unwrap();
        assert_eq!(
            widget,
            Widget {
                id: 1,
                name: "a".into(),
                extra: String::new()
            }
        );
    }

    #[test]
    fn zero_matching_columns_yields_default_record() {
        let row = row(vec!["other"], vec![SqlValue::Text("x".into())]);
        assert_eq!(Widget::from_row(&row).unwrap(), Widget::default());
    }

    #[test]
    fn null_column_keeps_field_default() {
        let row = row(vec!["id", "name"], vec![SqlValue::Int(7), SqlValue::Null]);
        let widget = Widget::from_row(&row).unwrap();
        assert_eq!(widget.id, 7);
        assert_eq!(widget.name, String::new());
    }

    #[test]
    fn incompatible_column_is_a_materialization_error() {
        let row = row(vec!["id"], vec![SqlValue::Text("not a number".into())]);
        let err = Widget::from_row(&row).unwrap_err();
        assert!(matches!(
            err,
            SqlConduitError::Materialization { ref column, .. } if column == "id"
        ));
    }

    #[test]
    fn case_insensitive_field_match() {
        let row = row(vec!["ID", "NAME"], vec![SqlValue::Int(3), SqlValue::Null]);
        assert_eq!(Widget::from_row(&row).unwrap().id, 3);
    }

    #[test]
    fn scalar_coercions() {
        assert_eq!(i64::from_sql_value(SqlValue::Int(5)), Ok(5));
        assert_eq!(f64::from_sql_value(SqlValue::Int(2)), Ok(2.0));
        assert_eq!(bool::from_sql_value(SqlValue::Int(1)), Ok(true));
        assert_eq!(
            Option::<i64>::from_sql_value(SqlValue::Null),
            Ok(None)
        );
        assert!(i64::from_sql_value(SqlValue::Text("x".into())).is_err());
        assert!(i32::from_sql_value(SqlValue::Int(i64::MAX)).is_err());
    }
}
