use std::sync::Arc;

use super::row::{Column, Row};

/// Summary of one executed statement.
#[derive(Debug, Clone, Default)]
pub struct ResultSet {
    /// Decoded rows, empty for statements that return no row set
    pub data: Vec<Row>,
    /// Affected-row count reported by the endpoint, 0 when absent
    pub number_of_records_updated: i64,
    /// First generated key, 0 when the statement generated none
    pub insert_id: i64,
    columns: Arc<Vec<Column>>,
}

impl ResultSet {
    pub(crate) fn new(
        columns: Arc<Vec<Column>>,
        data: Vec<Row>,
        number_of_records_updated: i64,
        insert_id: i64,
    ) -> Self {
        Self {
            data,
            number_of_records_updated,
            insert_id,
            columns,
        }
    }

    /// Column descriptors in declaration order
    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// First row, if any
    #[must_use]
    pub fn first(&self) -> Option<&Row> {
        self.data.first()
    }
}
