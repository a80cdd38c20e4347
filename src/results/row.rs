use std::collections::HashMap;
use std::sync::Arc;

use serde_json::{Map, Value as JsonValue};

use crate::column::{ColumnValue, TypeCategory};

/// Metadata for one result column, shared by every row of a result set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    /// Column label as reported by the endpoint (the alias when one was given)
    pub name: String,
    /// Owning table, empty for computed columns
    pub table_name: String,
    /// Declared type name, upper-cased
    pub type_name: String,
    /// Semantic family derived from `type_name`
    pub category: TypeCategory,
}

impl Column {
    /// Describe a result column; the type name is upper-cased and classified here
    #[must_use]
    pub fn new(name: impl Into<String>, table_name: impl Into<String>, type_name: &str) -> Self {
        let type_name = type_name.to_ascii_uppercase();
        Self {
            name: name.into(),
            table_name: table_name.into(),
            category: TypeCategory::from_type_name(&type_name),
            type_name,
        }
    }
}

/// A row from a statement result
///
/// Values stay in column order. Lookup by name follows the endpoint's column
/// list with the later column winning when two share a name; use
/// [`get_by_index`](Row::get_by_index) or [`get_qualified`](Row::get_qualified)
/// to reach a shadowed column.
#[derive(Debug, Clone)]
pub struct Row {
    columns: Arc<Vec<Column>>,
    values: Vec<ColumnValue>,
    // name -> position, shared across all rows of a result set
    index: Arc<HashMap<String, usize>>,
}

impl Row {
    /// Create a row over a shared column list
    ///
    /// # Arguments
    ///
    /// * `columns` - Column metadata shared by every row of the result set
    /// * `index` - Name to position map built by [`Row::build_index`]
    /// * `values` - One value per column, in column order
    ///
    /// # Returns
    ///
    /// A new `Row` instance
    pub(crate) fn new(
        columns: Arc<Vec<Column>>,
        index: Arc<HashMap<String, usize>>,
        values: Vec<ColumnValue>,
    ) -> Self {
        Self {
            columns,
            values,
            index,
        }
    }

    /// Build the name index for a column list; later duplicates overwrite earlier ones.
    pub(crate) fn build_index(columns: &[Column]) -> HashMap<String, usize> {
        columns
            .iter()
            .enumerate()
            .map(|(i, column)| (column.name.clone(), i))
            .collect()
    }

    /// Get a value from the row by column name
    ///
    /// # Arguments
    ///
    /// * `column_name` - The column label as reported by the endpoint
    ///
    /// # Returns
    ///
    /// The value of the last column with that name, or None if there is none
    #[must_use]
    pub fn get(&self, column_name: &str) -> Option<&ColumnValue> {
        self.index
            .get(column_name)
            .and_then(|&idx| self.values.get(idx))
    }

    /// Get a value by owning table and column name
    ///
    /// # Arguments
    ///
    /// * `table_name` - The table the column belongs to
    /// * `column_name` - The column label
    ///
    /// # Returns
    ///
    /// The matching value, or None if no column matches both names
    #[must_use]
    pub fn get_qualified(&self, table_name: &str, column_name: &str) -> Option<&ColumnValue> {
        self.columns
            .iter()
            .rposition(|c| c.table_name == table_name && c.name == column_name)
            .and_then(|idx| self.values.get(idx))
    }

    /// Get a value by column position
    #[must_use]
    pub fn get_by_index(&self, index: usize) -> Option<&ColumnValue> {
        self.values.get(index)
    }

    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    /// `(column name, value)` pairs in column order, duplicates included.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ColumnValue)> {
        self.column_names().zip(self.values.iter())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Render as a JSON object keyed by column name.
    #[must_use]
    pub fn to_json(&self) -> JsonValue {
        let mut object = Map::with_capacity(self.values.len());
        for (name, value) in self.iter() {
            object.insert(name.to_owned(), value.to_json());
        }
        JsonValue::Object(object)
    }
}
