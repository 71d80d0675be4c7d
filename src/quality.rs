//! Data-quality heuristics for the `overview` command and the report.
//!
//! Each flag is a cheap structural check; together they feed an aggregate
//! quality score in [0, 1] where 1 is a dataset with no findings.

use std::collections::HashSet;

use serde::Serialize;

use crate::profile::{ColumnKind, ColumnProfile};
use crate::table::Table;

/// Thresholds for the heuristic checks.
#[derive(Debug, Clone)]
pub struct QualityThresholds {
    /// Distinct-value count above which a categorical column is flagged.
    pub high_cardinality: usize,
    /// Zero-value share above which a numeric column is flagged.
    pub zero_share: f64,
}

impl Default for QualityThresholds {
    fn default() -> Self {
        Self {
            high_cardinality: 100,
            zero_share: 0.5,
        }
    }
}

/// Quality flags with the metrics that triggered them.
#[derive(Debug, Clone, Serialize)]
pub struct QualityFlags {
    pub has_missing: bool,
    pub has_duplicate_rows: bool,
    pub has_constant_columns: bool,
    pub has_high_cardinality_categoricals: bool,
    pub has_suspicious_id_duplicates: bool,
    pub has_many_zero_values: bool,
    /// Aggregate score in [0, 1]; findings subtract weighted penalties.
    pub quality_score: f64,
    pub max_missing_share: f64,
    pub duplicate_row_count: usize,
    pub constant_columns: Vec<String>,
    /// (column, distinct count) for flagged categoricals.
    pub high_cardinality_columns: Vec<(String, usize)>,
    /// (column, duplicated value count) for id-like columns.
    pub suspicious_id_columns: Vec<(String, usize)>,
    /// (column, zero share) for flagged numeric columns.
    pub many_zero_columns: Vec<(String, f64)>,
}

/// Computes all quality flags for a profiled table.
pub fn compute_quality_flags(
    table: &Table,
    profiles: &[ColumnProfile],
    thresholds: &QualityThresholds,
) -> QualityFlags {
    let n_rows = table.n_rows();

    let max_missing_share = profiles
        .iter()
        .map(|p| p.null_share)
        .fold(0.0f64, f64::max);
    let has_missing = profiles.iter().any(|p| p.null_count > 0);

    let duplicate_row_count = duplicate_rows(table);
    let has_duplicate_rows = duplicate_row_count > 0;

    let constant_columns: Vec<String> = profiles
        .iter()
        .filter(|p| p.distinct_count == 1 && p.null_count < p.row_count)
        .map(|p| p.name.clone())
        .collect();

    let high_cardinality_columns: Vec<(String, usize)> = profiles
        .iter()
        .filter(|p| p.kind == ColumnKind::Categorical && p.distinct_count > thresholds.high_cardinality)
        .map(|p| (p.name.clone(), p.distinct_count))
        .collect();

    // Columns with "id" in the name should not repeat values
    let suspicious_id_columns: Vec<(String, usize)> = profiles
        .iter()
        .filter(|p| p.name.to_lowercase().contains("id"))
        .filter_map(|p| {
            let duplicated = p.row_count.saturating_sub(p.distinct_count + p.null_count);
            (duplicated > 0).then(|| (p.name.clone(), duplicated))
        })
        .collect();

    let many_zero_columns: Vec<(String, f64)> = profiles
        .iter()
        .filter(|p| p.kind == ColumnKind::Numeric && n_rows > 0)
        .filter_map(|p| {
            let column = table.column(&p.name)?;
            let zeros = column
                .non_null()
                .filter(|v| v.trim().parse::<f64>().map_or(false, |x| x == 0.0))
                .count();
            let share = zeros as f64 / n_rows as f64;
            (share > thresholds.zero_share).then_some((p.name.clone(), share))
        })
        .collect();

    let mut penalty = 0.0;
    if has_missing {
        penalty += max_missing_share * 0.3;
    }
    if has_duplicate_rows && n_rows > 0 {
        let duplicate_share = duplicate_row_count as f64 / n_rows as f64;
        penalty += (duplicate_share * 0.5).min(0.2);
    }
    if !constant_columns.is_empty() && !profiles.is_empty() {
        penalty += 0.1 * constant_columns.len() as f64 / profiles.len() as f64;
    }
    if !high_cardinality_columns.is_empty() {
        penalty += 0.15;
    }
    if !suspicious_id_columns.is_empty() {
        penalty += 0.2;
    }
    if !many_zero_columns.is_empty() {
        penalty += 0.1;
    }

    QualityFlags {
        has_missing,
        has_duplicate_rows,
        has_constant_columns: !constant_columns.is_empty(),
        has_high_cardinality_categoricals: !high_cardinality_columns.is_empty(),
        has_suspicious_id_duplicates: !suspicious_id_columns.is_empty(),
        has_many_zero_values: !many_zero_columns.is_empty(),
        quality_score: (1.0 - penalty).max(0.0),
        max_missing_share,
        duplicate_row_count,
        constant_columns,
        high_cardinality_columns,
        suspicious_id_columns,
        many_zero_columns,
    }
}

/// Number of rows that are exact repeats of an earlier row.
fn duplicate_rows(table: &Table) -> usize {
    let mut seen: HashSet<Vec<Option<&str>>> = HashSet::new();
    let mut duplicates = 0;
    for idx in 0..table.n_rows() {
        if !seen.insert(table.row(idx)) {
            duplicates += 1;
        }
    }
    duplicates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::load::load_csv;
    use crate::profile::profile_table;
    use std::io::Write as _;

    fn flags_for(csv: &str) -> QualityFlags {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(csv.as_bytes()).unwrap();
        let table = load_csv(file.path(), &crate::config::LoadOptions::default()).unwrap();
        let profiles = profile_table(&table);
        compute_quality_flags(&table, &profiles, &QualityThresholds::default())
    }

    #[test]
    fn clean_dataset_scores_one() {
        let flags = flags_for("a,b\n1,x\n2,y\n3,z\n");
        assert!(!flags.has_missing);
        assert!(!flags.has_duplicate_rows);
        assert!((flags.quality_score - 1.0).abs() < 1e-12);
    }

    #[test]
    fn missing_values_are_flagged_and_penalized() {
        let flags = flags_for("a,b\n1,x\n,y\n3,z\n4,w\n");
        assert!(flags.has_missing);
        assert!((flags.max_missing_share - 0.25).abs() < 1e-12);
        // Penalty is max missing share times 0.3
        assert!((flags.quality_score - (1.0 - 0.25 * 0.3)).abs() < 1e-12);
    }

    #[test]
    fn duplicate_rows_are_counted() {
        let flags = flags_for("a,b\n1,x\n1,x\n2,y\n");
        assert!(flags.has_duplicate_rows);
        assert_eq!(flags.duplicate_row_count, 1);
    }

    #[test]
    fn constant_column_is_flagged() {
        let flags = flags_for("a,b\n1,5\n2,5\n3,5\n");
        assert!(flags.has_constant_columns);
        assert_eq!(flags.constant_columns, vec!["b".to_string()]);
    }

    #[test]
    fn all_null_column_is_not_constant() {
        let flags = flags_for("a,b\n1,\n2,\n");
        assert!(!flags.has_constant_columns);
    }

    #[test]
    fn id_duplicates_are_suspicious() {
        let flags = flags_for("user_id,v\n1,a\n2,b\n2,c\n4,d\n");
        assert!(flags.has_suspicious_id_duplicates);
        assert_eq!(flags.suspicious_id_columns, vec![("user_id".to_string(), 1)]);
    }

    #[test]
    fn unique_ids_are_fine() {
        let flags = flags_for("order_id,v\n1,a\n2,b\n3,c\n");
        assert!(!flags.has_suspicious_id_duplicates);
    }

    #[test]
    fn mostly_zero_numeric_column_is_flagged() {
        let flags = flags_for("x\n0\n0\n0\n0\n0\n1\n");
        assert!(flags.has_many_zero_values);
        let (name, share) = &flags.many_zero_columns[0];
        assert_eq!(name, "x");
        assert!((share - 5.0 / 6.0).abs() < 1e-12);
    }

    #[test]
    fn score_is_clamped_to_zero() {
        // Every heuristic fires at once
        let mut csv = String::from("same_id,zeros\n");
        for _ in 0..3 {
            csv.push_str("1,0\n");
        }
        let flags = flags_for(&csv);
        assert!(flags.quality_score >= 0.0);
        assert!(flags.quality_score <= 1.0);
    }
}
