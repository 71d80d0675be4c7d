//! Implementations of the `overview` and `report` commands.
//!
//! Both are single stateless passes: load, compute, emit. The first
//! unrecoverable error aborts the run.

use std::path::Path;

use tracing::info;

use crate::categories::top_categories;
use crate::charts::render_charts;
use crate::config::{LoadOptions, ReportConfig};
use crate::correlate::correlation_matrix;
use crate::error::{Error, Result};
use crate::load::load_csv;
use crate::profile::profile_table;
use crate::quality::{compute_quality_flags, QualityFlags, QualityThresholds};
use crate::report::{write_report, ReportBundle};

/// Prints dataset dimensions, a per-column summary and quality flags.
pub fn overview(csv_path: &Path, options: &LoadOptions) -> Result<()> {
    let table = load_csv(csv_path, options)?;
    let profiles = profile_table(&table);
    let flags = compute_quality_flags(&table, &profiles, &QualityThresholds::default());

    println!("Rows: {}", table.n_rows());
    println!("Columns: {}", table.n_cols());
    println!();
    println!(
        "{:<24} {:<12} {:>7} {:>11} {:>9}",
        "name", "kind", "nulls", "null share", "distinct"
    );
    for p in &profiles {
        println!(
            "{:<24} {:<12} {:>7} {:>10.1}% {:>9}",
            p.name,
            p.kind.as_str(),
            p.null_count,
            p.null_share * 100.0,
            p.distinct_count
        );
    }
    println!();
    print_quality_flags(&flags);
    Ok(())
}

fn print_quality_flags(flags: &QualityFlags) {
    println!("Quality flags:");
    println!("  has_missing: {}", flags.has_missing);
    println!("  has_duplicate_rows: {}", flags.has_duplicate_rows);
    println!("  has_constant_columns: {}", flags.has_constant_columns);
    println!(
        "  has_high_cardinality_categoricals: {}",
        flags.has_high_cardinality_categoricals
    );
    println!(
        "  has_suspicious_id_duplicates: {}",
        flags.has_suspicious_id_duplicates
    );
    println!("  has_many_zero_values: {}", flags.has_many_zero_values);
    println!("  quality_score: {:.2}", flags.quality_score);
}

/// Runs the full pipeline and writes the report bundle.
pub fn report(csv_path: &Path, config: &ReportConfig) -> Result<ReportBundle> {
    config.validate()?;

    let table = load_csv(csv_path, &config.load)?;
    let profiles = profile_table(&table);
    let matrix = correlation_matrix(&table, &profiles);
    let cats = top_categories(&table, &profiles, config.top_k_categories);
    let flags = compute_quality_flags(&table, &profiles, &QualityThresholds::default());

    std::fs::create_dir_all(&config.out_dir).map_err(|e| {
        Error::Write(format!(
            "cannot create output directory '{}': {e}",
            config.out_dir.display()
        ))
    })?;

    info!("rendering charts into {}", config.out_dir.display());
    let charts = render_charts(
        &table,
        &profiles,
        &matrix,
        config.max_hist_columns,
        &config.out_dir,
    )?;

    let source_name = csv_path
        .file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_else(|| csv_path.display().to_string());
    let bundle = write_report(
        &source_name,
        &table,
        &profiles,
        &matrix,
        &cats,
        &flags,
        charts,
        config,
    )?;

    println!("Report generated in: {}", config.out_dir.display());
    println!("- Markdown: {}", bundle.report_md.display());
    println!("- Tables: summary.csv, missing.csv, correlation.csv, top_categories/*.csv");
    println!("- Charts: hist_*.png, missing_matrix.png, correlation_heatmap.png");
    Ok(bundle)
}
