//! Top-k frequency tables for categorical columns.

use std::collections::HashMap;

use crate::profile::{ColumnKind, ColumnProfile};
use crate::table::{Column, Table};

/// Most frequent values of one categorical column.
#[derive(Debug, Clone)]
pub struct TopCategories {
    pub column: String,
    /// (value, count) pairs, descending count, at most k entries.
    pub entries: Vec<(String, usize)>,
}

/// Summarizes every categorical column of a profiled table, in column order.
pub fn top_categories(table: &Table, profiles: &[ColumnProfile], k: usize) -> Vec<TopCategories> {
    profiles
        .iter()
        .filter(|p| p.kind == ColumnKind::Categorical)
        .filter_map(|p| {
            let column = table.column(&p.name)?;
            Some(TopCategories {
                column: p.name.clone(),
                entries: top_k_values(column, k),
            })
        })
        .collect()
}

/// Counts non-null values and returns the k most frequent, ties broken by
/// first occurrence in the data.
pub fn top_k_values(column: &Column, k: usize) -> Vec<(String, usize)> {
    let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
    for (idx, value) in column.non_null().enumerate() {
        let entry = counts.entry(value).or_insert((0, idx));
        entry.0 += 1;
    }

    let mut ranked: Vec<(&str, usize, usize)> = counts
        .into_iter()
        .map(|(value, (count, first_idx))| (value, count, first_idx))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));
    ranked
        .into_iter()
        .take(k)
        .map(|(value, count, _)| (value.to_string(), count))
        .collect()
}
