//! Column-major table model for loaded CSV data.
//!
//! A [`Table`] holds the raw cells exactly as they appeared in the file,
//! with recognized null markers already mapped to `None`. Type inference
//! happens later, in the profiler, so the table itself stays untyped.

use std::collections::HashSet;

use crate::error::{Error, Result};

/// A single named column of raw optional cells.
#[derive(Debug, Clone)]
pub struct Column {
    name: String,
    cells: Vec<Option<String>>,
}

impl Column {
    pub fn new(name: impl Into<String>, cells: Vec<Option<String>>) -> Self {
        Self {
            name: name.into(),
            cells,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn cells(&self) -> &[Option<String>] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn null_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_none()).count()
    }

    /// Iterates over non-null cell values in row order.
    pub fn non_null(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().filter_map(|c| c.as_deref())
    }
}

/// The loaded CSV as an ordered sequence of equal-length named columns.
///
/// Created once per run by the loader and read-only thereafter.
#[derive(Debug, Clone)]
pub struct Table {
    columns: Vec<Column>,
    n_rows: usize,
}

impl Table {
    /// Builds a table, enforcing the equal-length and unique-name invariants.
    ///
    /// Violations are programmer errors on the loader side, but they are
    /// reported as load errors so a malformed file can never panic the run.
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        let n_rows = columns.first().map_or(0, Column::len);
        for col in &columns {
            if col.len() != n_rows {
                return Err(Error::Load(format!(
                    "column '{}' has {} rows, expected {}",
                    col.name(),
                    col.len(),
                    n_rows
                )));
            }
        }
        let mut seen = HashSet::new();
        for col in &columns {
            if !seen.insert(col.name()) {
                return Err(Error::Load(format!(
                    "duplicate column name '{}'",
                    col.name()
                )));
            }
        }
        Ok(Self { columns, n_rows })
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name() == name)
    }

    /// Returns one row as a vector of optional cell references.
    pub fn row(&self, idx: usize) -> Vec<Option<&str>> {
        self.columns
            .iter()
            .map(|c| c.cells()[idx].as_deref())
            .collect()
    }
}
