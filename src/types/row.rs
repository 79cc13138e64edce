use std::collections::VecDeque;

use crate::types::SqlValue;

/// Description of a single result column, as reported by the driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDescription {
    pub name: String,
}

impl ColumnDescription {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// A single fetched row. Values are in column order.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    values: Vec<SqlValue>,
}

impl Row {
    pub fn new(values: Vec<SqlValue>) -> Self {
        Self { values }
    }

    /// Gets a value by column index.
    pub fn get(&self, index: usize) -> Option<&SqlValue> {
        self.values.get(index)
    }

    pub fn values(&self) -> &[SqlValue] {
        &self.values
    }

    pub fn into_values(self) -> Vec<SqlValue> {
        self.values
    }

    /// Returns the number of columns in this row.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if this row has no columns.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl From<Vec<SqlValue>> for Row {
    fn from(values: Vec<SqlValue>) -> Self {
        Self::new(values)
    }
}

/// Driver-side buffered result of one statement.
/// Cursors drain rows from the front as they are fetched.
#[derive(Debug, Clone, Default)]
pub struct ResultSet {
    pub columns: Vec<ColumnDescription>,
    pub rows: VecDeque<Row>,
    /// Rows affected or produced, `-1` when unknown.
    pub row_count: i64,
}

impl ResultSet {
    pub fn new(columns: Vec<ColumnDescription>, rows: Vec<Row>) -> Self {
        let row_count = rows.len() as i64;
        Self {
            columns,
            rows: rows.into(),
            row_count,
        }
    }

    pub fn empty() -> Self {
        Self {
            columns: Vec::new(),
            rows: VecDeque::new(),
            row_count: -1,
        }
    }

    pub fn next_row(&mut self) -> Option<Row> {
        self.rows.pop_front()
    }

    pub fn take_rows(&mut self, size: usize) -> Vec<Row> {
        let n = size.min(self.rows.len());
        self.rows.drain(..n).collect()
    }

    pub fn take_all(&mut self) -> Vec<Row> {
        self.rows.drain(..).collect()
    }
}
