use std::collections::HashMap;
use std::sync::Arc;

use crate::types::SqlValue;

/// An untyped row: every column the backend reported, in emission order,
/// with values preserved verbatim (NULL stays [`SqlValue::Null`]).
///
/// Column names and the case-insensitive lookup table are shared across all
/// rows of one result set, so per-row cost is just the value vector.
#[derive(Debug, Clone)]
pub struct DynamicRow {
    column_names: Arc<Vec<String>>,
    values: Vec<SqlValue>,
    // Lowercased column name -> ordinal. Built once per result set.
    lookup: Arc<HashMap<String, usize>>,
}

impl DynamicRow {
    /// Build a standalone row. Result-set construction goes through
    /// [`RowSet`] instead so the lookup table is shared.
    #[must_use]
    pub fn new(column_names: Arc<Vec<String>>, values: Vec<SqlValue>) -> Self {
        let lookup = Arc::new(build_lookup(&column_names));
        Self {
            column_names,
            values,
            lookup,
        }
    }

    pub(crate) fn with_lookup(
        column_names: Arc<Vec<String>>,
        values: Vec<SqlValue>,
        lookup: Arc<HashMap<String, usize>>,
    ) -> Self {
        Self {
            column_names,
            values,
            lookup,
        }
    }

    /// Column names in backend emission order.
    #[must_use]
    pub fn column_names(&self) -> &[String] {
        &self.column_names
    }

    /// Column values in backend emission order.
    #[must_use]
    pub fn values(&self) -> &[SqlValue] {
        &self.values
    }

    /// Number of columns in this row.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Ordinal of a column by case-insensitive name match.
    #[must_use]
    pub fn column_index(&self, column_name: &str) -> Option<usize> {
        if let Some(&idx) = self.lookup.get(column_name) {
            return Some(idx);
        }
        self.lookup.get(&column_name.to_lowercase()).copied()
    }

    /// Value of a column by exact name match.
    #[must_use]
    pub fn get(&self, column_name: &str) -> Option<&SqlValue> {
        self.column_names
            .iter()
            .position(|col| col == column_name)
            .and_then(|idx| self.values.get(idx))
    }

    /// Value of a column by case-insensitive name match.
    #[must_use]
    pub fn get_ci(&self, column_name: &str) -> Option<&SqlValue> {
        self.column_index(column_name)
            .and_then(|idx| self.values.get(idx))
    }

    /// Value of a column by ordinal.
    #[must_use]
    pub fn get_by_index(&self, index: usize) -> Option<&SqlValue> {
        self.values.get(index)
    }
}

/// The raw fetch product a backend hands the executor: the column list plus
/// every row's values, in backend emission order. Never reordered and never
/// deduplicated.
#[derive(Debug, Clone, Default)]
pub struct RowSet {
    columns: Arc<Vec<String>>,
    rows: Vec<Vec<SqlValue>>,
}

impl RowSet {
    /// Start an empty set for the given column list.
    #[must_use]
    pub fn new(column_names: Vec<String>) -> Self {
        Self {
            columns: Arc::new(column_names),
            rows: Vec::new(),
        }
    }

    /// Start an empty set with row capacity preallocated.
    #[must_use]
    pub fn with_capacity(column_names: Vec<String>, capacity: usize) -> Self {
        Self {
            columns: Arc::new(column_names),
            rows: Vec::with_capacity(capacity),
        }
    }

    /// Append one fetched row. Rows are kept in append order.
    pub fn push_row(&mut self, values: Vec<SqlValue>) {
        self.rows.push(values);
    }

    /// Column names in backend emission order.
    #[must_use]
    pub fn column_names(&self) -> &Arc<Vec<String>> {
        &self.columns
    }

    /// Number of fetched rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// First value of the first row, if any. This is the scalar read.
    #[must_use]
    pub fn into_scalar(self) -> Option<SqlValue> {
        self.rows
            .into_iter()
            .next()
            .and_then(|row| row.into_iter().next())
    }

    /// Convert every fetched row into a [`DynamicRow`], sharing one
    /// case-insensitive lookup table across the whole set.
    #[must_use]
    pub fn into_dynamic(self) -> Vec<DynamicRow> {
        let lookup = Arc::new(build_lookup(&self.columns));
        self.rows
            .into_iter()
            .map(|values| DynamicRow::with_lookup(self.columns.clone(), values, lookup.clone()))
            .collect()
    }
}

fn build_lookup(column_names: &[String]) -> HashMap<String, usize> {
    let mut lookup = HashMap::with_capacity(column_names.len());
    for (idx, name) in column_names.iter().enumerate() {
        // First occurrence wins when names differ by case only.
        lookup.entry(name.to_lowercase()).or_insert(idx);
        lookup.entry(name.clone()).or_insert(idx);
    }
    lookup
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_set() -> RowSet {
        let mut set = RowSet::new(vec!["Id".into(), "Name".into()]);
        set.push_row(vec![SqlValue::Int(1), SqlValue::Text("a".into())]);
        set.push_row(vec![SqlValue::Int(2), SqlValue::Null]);
        set
    }

    #[test]
    fn dynamic_rows_preserve_order_and_nulls() {
        let rows = sample_set().into_dynamic();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].column_names(), ["Id", "Name"]);
        assert_eq!(rows[0].get("Id"), Some(&SqlValue::Int(1)));
        assert_eq!(rows[1].get("Name"), Some(&SqlValue::Null));
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let rows = sample_set().into_dynamic();
        assert_eq!(rows[0].get_ci("id"), Some(&SqlValue::Int(1)));
        assert_eq!(rows[0].get_ci("NAME"), Some(&SqlValue::Text("a".into())));
        assert_eq!(rows[0].get_ci("missing"), None);
    }

    #[test]
    fn scalar_is_first_column_of_first_row() {
        assert_eq!(sample_set().into_scalar(), Some(SqlValue::Int(1)));
        assert_eq!(RowSet::new(vec!["n".into()]).into_scalar(), None);
    }
}
