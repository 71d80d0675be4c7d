//! Per-column profiling: type inference, missing-value stats, cardinality
//! and numeric summaries.
//!
//! A column is numeric when every non-null cell parses as a float and at
//! least one non-null cell exists; everything else is categorical. Missing
//! values are expected input here, never an error.

use std::collections::HashSet;

use crate::table::{Column, Table};

/// Inferred kind of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Numeric,
    Categorical,
}

impl ColumnKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnKind::Numeric => "numeric",
            ColumnKind::Categorical => "categorical",
        }
    }
}

/// Descriptive statistics over the non-null values of a numeric column.
#[derive(Debug, Clone)]
pub struct NumericSummary {
    /// Number of non-null values the statistics were computed over.
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation; NaN when fewer than two values.
    pub std_dev: f64,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

/// Profile of a single column, in the table's column order.
#[derive(Debug, Clone)]
pub struct ColumnProfile {
    pub name: String,
    pub kind: ColumnKind,
    pub row_count: usize,
    pub null_count: usize,
    /// Null count divided by row count; 0 for an empty table.
    pub null_share: f64,
    /// Distinct non-null values.
    pub distinct_count: usize,
    /// Present only for numeric columns with at least one value.
    pub numeric: Option<NumericSummary>,
}

/// Profiles every column of a table, preserving column order.
pub fn profile_table(table: &Table) -> Vec<ColumnProfile> {
    table.columns().iter().map(profile_column).collect()
}

/// Profiles one column.
pub fn profile_column(column: &Column) -> ColumnProfile {
    let row_count = column.len();
    let null_count = column.null_count();
    let null_share = if row_count > 0 {
        null_count as f64 / row_count as f64
    } else {
        0.0
    };
    let distinct_count = column.non_null().collect::<HashSet<_>>().len();

    let values = numeric_values(column);
    let kind = if values.is_some() {
        ColumnKind::Numeric
    } else {
        ColumnKind::Categorical
    };
    let numeric = values.map(|v| summarize_numeric(&v));

    ColumnProfile {
        name: column.name().to_string(),
        kind,
        row_count,
        null_count,
        null_share,
        distinct_count,
        numeric,
    }
}

/// Parses the column as numeric: `Some` cell-aligned values when every
/// non-null cell is a number and at least one exists, `None` otherwise.
pub fn numeric_cells(column: &Column) -> Option<Vec<Option<f64>>> {
    let mut any = false;
    let mut out = Vec::with_capacity(column.len());
    for cell in column.cells() {
        match cell {
            None => out.push(None),
            Some(raw) => match raw.trim().parse::<f64>() {
                Ok(v) => {
                    any = true;
                    out.push(Some(v));
                }
                Err(_) => return None,
            },
        }
    }
    any.then_some(out)
}

fn numeric_values(column: &Column) -> Option<Vec<f64>> {
    numeric_cells(column).map(|cells| cells.into_iter().flatten().collect())
}

fn summarize_numeric(values: &[f64]) -> NumericSummary {
    let count = values.len();
    let mean = values.iter().sum::<f64>() / count as f64;
    let std_dev = if count > 1 {
        let ss: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
        (ss / (count - 1) as f64).sqrt()
    } else {
        f64::NAN
    };

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    NumericSummary {
        count,
        mean,
        std_dev,
        min: sorted[0],
        q1: percentile(&sorted, 0.25),
        median: percentile(&sorted, 0.5),
        q3: percentile(&sorted, 0.75),
        max: sorted[count - 1],
    }
}

/// Linear-interpolation percentile over a sorted non-empty slice.
fn percentile(sorted: &[f64], p: f64) -> f64 {
    let h = (sorted.len() - 1) as f64 * p;
    let lo = h.floor() as usize;
    let hi = h.ceil() as usize;
    if lo == hi {
        sorted[lo]
    } else {
        sorted[lo] + (h - lo as f64) * (sorted[hi] - sorted[lo])
    }
}
