//! Pairwise Pearson correlation over the numeric columns of a table.
//!
//! Each pair is computed over the rows where both values are present
//! (pairwise deletion). A zero-variance side yields NaN rather than an
//! error, and the whole matrix is empty when fewer than two numeric
//! columns exist.

use crate::profile::{self, ColumnKind, ColumnProfile};
use crate::table::Table;

/// Square, symmetric correlation matrix keyed by numeric column names.
#[derive(Debug, Clone)]
pub struct CorrelationMatrix {
    names: Vec<String>,
    values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    pub fn empty() -> Self {
        Self {
            names: Vec::new(),
            values: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Numeric column names, in table column order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn size(&self) -> usize {
        self.names.len()
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[i][j]
    }

    pub fn row(&self, i: usize) -> &[f64] {
        &self.values[i]
    }
}

/// Computes the correlation matrix for a profiled table.
///
/// Returns [`CorrelationMatrix::empty`] when fewer than two numeric
/// columns exist.
pub fn correlation_matrix(table: &Table, profiles: &[ColumnProfile]) -> CorrelationMatrix {
    let numeric: Vec<(&str, Vec<Option<f64>>)> = profiles
        .iter()
        .filter(|p| p.kind == ColumnKind::Numeric)
        .filter_map(|p| {
            let column = table.column(&p.name)?;
            profile::numeric_cells(column).map(|cells| (p.name.as_str(), cells))
        })
        .collect();

    if numeric.len() < 2 {
        return CorrelationMatrix::empty();
    }

    let n = numeric.len();
    let mut values = vec![vec![f64::NAN; n]; n];
    for i in 0..n {
        for j in i..n {
            let r = if i == j {
                // Diagonal is 1 only when the column actually varies
                if variance_is_zero(&numeric[i].1) {
                    f64::NAN
                } else {
                    1.0
                }
            } else {
                pearson(&numeric[i].1, &numeric[j].1)
            };
            values[i][j] = r;
            values[j][i] = r;
        }
    }

    CorrelationMatrix {
        names: numeric.iter().map(|(name, _)| (*name).to_string()).collect(),
        values,
    }
}

/// Pearson coefficient over rows where both cells are present.
fn pearson(a: &[Option<f64>], b: &[Option<f64>]) -> f64 {
    let pairs: Vec<(f64, f64)> = a
        .iter()
        .zip(b)
        .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
        .collect();
    if pairs.len() < 2 {
        return f64::NAN;
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|(_, y)| y).sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in &pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }
    if var_x == 0.0 || var_y == 0.0 {
        return f64::NAN;
    }
    cov / (var_x * var_y).sqrt()
}

fn variance_is_zero(cells: &[Option<f64>]) -> bool {
    let mut present = cells.iter().flatten();
    match present.next() {
        None => true,
        Some(first) => present.all(|v| v == first),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::load::load_csv;
    use crate::profile::profile_table;
    use std::io::Write as _;

    fn table_from(csv: &str) -> Table {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(csv.as_bytes()).unwrap();
        load_csv(file.path(), &crate::config::LoadOptions::default()).unwrap()
    }

    fn matrix_for(csv: &str) -> CorrelationMatrix {
        let table = table_from(csv);
        let profiles = profile_table(&table);
        correlation_matrix(&table, &profiles)
    }

    #[test]
    fn perfectly_correlated_columns() {
        let matrix = matrix_for("x,y\n1,2\n2,4\n3,6\n4,8\n");
        assert_eq!(matrix.size(), 2);
        assert!((matrix.get(0, 1) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn anticorrelated_columns() {
        let matrix = matrix_for("x,y\n1,4\n2,3\n3,2\n4,1\n");
        assert!((matrix.get(0, 1) + 1.0).abs() < 1e-12);
    }

    #[test]
    fn matrix_is_symmetric_with_unit_diagonal() {
        let matrix = matrix_for("a,b,c\n1,5,2\n2,4,2\n3,6,4\n4,2,3\n5,7,9\n");
        assert_eq!(matrix.size(), 3);
        for i in 0..3 {
            assert!((matrix.get(i, i) - 1.0).abs() < 1e-12);
            for j in 0..3 {
                assert!((matrix.get(i, j) - matrix.get(j, i)).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn fewer_than_two_numeric_columns_yields_empty() {
        assert!(matrix_for("x,city\n1,A\n2,B\n").is_empty());
        assert!(matrix_for("city,name\nA,p\nB,q\n").is_empty());
    }

    #[test]
    fn constant_column_yields_nan() {
        let matrix = matrix_for("x,c\n1,5\n2,5\n3,5\n");
        assert_eq!(matrix.size(), 2);
        assert!(matrix.get(0, 1).is_nan());
        assert!(matrix.get(1, 1).is_nan());
        assert!((matrix.get(0, 0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn pairwise_deletion_skips_incomplete_rows() {
        // The row with a missing y must not poison the remaining pairs
        let matrix = matrix_for("x,y\n1,1\n2,\n3,3\n4,4\n");
        assert!((matrix.get(0, 1) - 1.0).abs() < 1e-12);
    }
}
