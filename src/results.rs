use std::sync::Arc;

use crate::types::RowValues;

/// One decoded row, in the column order of the cursor's description.
///
/// Column names are shared by every row fetched from the same execution.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    column_names: Arc<Vec<String>>,
    values: Vec<RowValues>,
}

impl Row {
    #[must_use]
    pub fn new(column_names: Arc<Vec<String>>, values: Vec<RowValues>) -> Self {
        Self {
            column_names,
            values,
        }
    }

    #[must_use]
    pub fn column_names(&self) -> &[String] {
        &self.column_names
    }

    #[must_use]
    pub fn values(&self) -> &[RowValues] {
        &self.values
    }

    #[must_use]
    pub fn into_values(self) -> Vec<RowValues> {
        self.values
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Get the index of a column by name. The first match wins for duplicated names.
    #[must_use]
    pub fn get_column_index(&self, column_name: &str) -> Option<usize> {
        self.column_names.iter().position(|col| col == column_name)
    }

    /// Get a value from the row by column name
    #[must_use]
    pub fn get(&self, column_name: &str) -> Option<&RowValues> {
        self.get_column_index(column_name)
            .and_then(|idx| self.values.get(idx))
    }

    /// Get a value from the row by 0-based column index
    #[must_use]
    pub fn get_by_index(&self, index: usize) -> Option<&RowValues> {
        self.values.get(index)
    }
}
