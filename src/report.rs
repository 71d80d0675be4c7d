//! Report assembly: tabular CSV artifacts plus the Markdown document.
//!
//! Everything lands under the configured output directory. Existing files
//! are overwritten without confirmation, and a failure partway through
//! leaves already-written files in place.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use crate::categories::TopCategories;
use crate::charts::{self, ChartSet};
use crate::config::ReportConfig;
use crate::correlate::CorrelationMatrix;
use crate::error::{Error, Result};
use crate::profile::ColumnProfile;
use crate::quality::QualityFlags;
use crate::table::Table;

/// One line of `summary.csv`.
#[derive(Debug, Serialize)]
struct SummaryRow<'a> {
    name: &'a str,
    kind: &'a str,
    rows: usize,
    null_count: usize,
    null_share: f64,
    distinct_count: usize,
    mean: Option<f64>,
    std_dev: Option<f64>,
    min: Option<f64>,
    q1: Option<f64>,
    median: Option<f64>,
    q3: Option<f64>,
    max: Option<f64>,
}

/// One line of `missing.csv`.
#[derive(Debug, Serialize)]
struct MissingRow<'a> {
    name: &'a str,
    null_count: usize,
    null_share: f64,
}

/// Paths of every artifact written by one `report` run.
#[derive(Debug, Clone)]
pub struct ReportBundle {
    pub report_md: PathBuf,
    pub summary_csv: PathBuf,
    pub missing_csv: PathBuf,
    /// Absent when fewer than two numeric columns exist.
    pub correlation_csv: Option<PathBuf>,
    pub top_category_files: Vec<PathBuf>,
    pub charts: ChartSet,
}

/// Writes the tabular artifacts and the Markdown report.
#[allow(clippy::too_many_arguments)]
pub fn write_report(
    source_name: &str,
    table: &Table,
    profiles: &[ColumnProfile],
    matrix: &CorrelationMatrix,
    top_cats: &[TopCategories],
    flags: &QualityFlags,
    charts: ChartSet,
    config: &ReportConfig,
) -> Result<ReportBundle> {
    let out_dir = &config.out_dir;

    let summary_csv = out_dir.join("summary.csv");
    write_summary(&summary_csv, profiles)?;

    let missing_csv = out_dir.join("missing.csv");
    write_missing(&missing_csv, profiles)?;

    let correlation_csv = if matrix.is_empty() {
        None
    } else {
        let path = out_dir.join("correlation.csv");
        write_correlation(&path, matrix)?;
        Some(path)
    };

    let top_category_files = write_top_categories(out_dir, top_cats)?;

    let report_md = out_dir.join("report.md");
    let markdown = render_markdown(
        source_name,
        table,
        profiles,
        matrix,
        top_cats,
        flags,
        &charts,
        config,
    );
    std::fs::write(&report_md, markdown)
        .map_err(|e| Error::Write(format!("cannot write '{}': {e}", report_md.display())))?;
    info!("report written to {}", report_md.display());

    Ok(ReportBundle {
        report_md,
        summary_csv,
        missing_csv,
        correlation_csv,
        top_category_files,
        charts,
    })
}

fn csv_writer(path: &Path) -> Result<csv::Writer<std::fs::File>> {
    csv::WriterBuilder::new()
        .from_path(path)
        .map_err(|e| Error::Write(format!("cannot create '{}': {e}", path.display())))
}

fn write_summary(path: &Path, profiles: &[ColumnProfile]) -> Result<()> {
    let mut writer = csv_writer(path)?;
    for p in profiles {
        let stats = p.numeric.as_ref();
        let row = SummaryRow {
            name: &p.name,
            kind: p.kind.as_str(),
            rows: p.row_count,
            null_count: p.null_count,
            null_share: p.null_share,
            distinct_count: p.distinct_count,
            mean: stats.map(|s| s.mean),
            std_dev: stats.map(|s| s.std_dev),
            min: stats.map(|s| s.min),
            q1: stats.map(|s| s.q1),
            median: stats.map(|s| s.median),
            q3: stats.map(|s| s.q3),
            max: stats.map(|s| s.max),
        };
        writer
            .serialize(row)
            .map_err(|e| Error::Write(format!("cannot write '{}': {e}", path.display())))?;
    }
    writer
        .flush()
        .map_err(|e| Error::Write(format!("cannot write '{}': {e}", path.display())))
}

fn write_missing(path: &Path, profiles: &[ColumnProfile]) -> Result<()> {
    let mut writer = csv_writer(path)?;
    for p in profiles {
        let row = MissingRow {
            name: &p.name,
            null_count: p.null_count,
            null_share: p.null_share,
        };
        writer
            .serialize(row)
            .map_err(|e| Error::Write(format!("cannot write '{}': {e}", path.display())))?;
    }
    writer
        .flush()
        .map_err(|e| Error::Write(format!("cannot write '{}': {e}", path.display())))
}

fn write_correlation(path: &Path, matrix: &CorrelationMatrix) -> Result<()> {
    let mut writer = csv_writer(path)?;
    let write_err = |e: csv::Error| Error::Write(format!("cannot write '{}': {e}", path.display()));

    let mut header = vec!["name".to_string()];
    header.extend(matrix.names().iter().cloned());
    writer.write_record(&header).map_err(write_err)?;

    for (i, name) in matrix.names().iter().enumerate() {
        let mut record = vec![name.clone()];
        record.extend(matrix.row(i).iter().map(|r| r.to_string()));
        writer.write_record(&record).map_err(write_err)?;
    }
    writer
        .flush()
        .map_err(|e| Error::Write(format!("cannot write '{}': {e}", path.display())))
}

fn write_top_categories(out_dir: &Path, top_cats: &[TopCategories]) -> Result<Vec<PathBuf>> {
    if top_cats.is_empty() {
        return Ok(Vec::new());
    }
    let dir = out_dir.join("top_categories");
    std::fs::create_dir_all(&dir)
        .map_err(|e| Error::Write(format!("cannot create '{}': {e}", dir.display())))?;

    let mut paths = Vec::new();
    for cats in top_cats {
        let path = dir.join(format!("{}.csv", charts::file_stem(&cats.column)));
        let mut writer = csv_writer(&path)?;
        let write_err =
            |e: csv::Error| Error::Write(format!("cannot write '{}': {e}", path.display()));
        writer.write_record(["value", "count"]).map_err(write_err)?;
        for (value, count) in &cats.entries {
            writer
                .write_record([value.as_str(), &count.to_string()])
                .map_err(write_err)?;
        }
        writer
            .flush()
            .map_err(|e| Error::Write(format!("cannot write '{}': {e}", path.display())))?;
        paths.push(path);
    }
    Ok(paths)
}

#[allow(clippy::too_many_arguments)]
fn render_markdown(
    source_name: &str,
    table: &Table,
    profiles: &[ColumnProfile],
    matrix: &CorrelationMatrix,
    top_cats: &[TopCategories],
    flags: &QualityFlags,
    charts: &ChartSet,
    config: &ReportConfig,
) -> String {
    let mut md = String::new();
    let _ = writeln!(md, "# {}\n", config.title);
    let _ = writeln!(md, "Source file: `{source_name}`\n");
    let _ = writeln!(
        md,
        "Rows: **{}**, columns: **{}**\n",
        table.n_rows(),
        table.n_cols()
    );

    let _ = writeln!(md, "## Data quality\n");
    let _ = writeln!(md, "- quality score: **{:.2}**", flags.quality_score);
    let _ = writeln!(
        md,
        "- max missing share per column: **{:.1}%**",
        flags.max_missing_share * 100.0
    );
    let _ = writeln!(md, "- has missing values: {}", flags.has_missing);
    let _ = writeln!(md, "- has duplicate rows: {}", flags.has_duplicate_rows);
    let _ = writeln!(md, "- has constant columns: {}", flags.has_constant_columns);
    let _ = writeln!(
        md,
        "- has high-cardinality categoricals: {}",
        flags.has_high_cardinality_categoricals
    );
    let _ = writeln!(
        md,
        "- has suspicious id duplicates: {}",
        flags.has_suspicious_id_duplicates
    );
    let _ = writeln!(md, "- has many zero values: {}\n", flags.has_many_zero_values);

    let warnings: Vec<&ColumnProfile> = profiles
        .iter()
        .filter(|p| p.null_share >= config.min_missing_share && p.null_count > 0)
        .collect();
    if !warnings.is_empty() {
        let _ = writeln!(md, "### Missing-value warnings\n");
        for p in &warnings {
            let _ = writeln!(
                md,
                "- WARNING: column `{}` is {:.1}% missing (threshold {:.1}%)",
                p.name,
                p.null_share * 100.0,
                config.min_missing_share * 100.0
            );
        }
        let _ = writeln!(md);
    }

    let _ = writeln!(md, "## Columns\n");
    let _ = writeln!(md, "| name | kind | nulls | null share | distinct |");
    let _ = writeln!(md, "|------|------|-------|------------|----------|");
    for p in profiles {
        let _ = writeln!(
            md,
            "| {} | {} | {} | {:.1}% | {} |",
            p.name,
            p.kind.as_str(),
            p.null_count,
            p.null_share * 100.0,
            p.distinct_count
        );
    }
    let _ = writeln!(md, "\nFull statistics: see `summary.csv`.\n");

    let _ = writeln!(md, "## Missing values\n");
    let _ = writeln!(md, "Per-column counts: see `missing.csv`.\n");
    let _ = writeln!(md, "![Missing-value matrix](missing_matrix.png)\n");

    let _ = writeln!(md, "## Correlation\n");
    if matrix.is_empty() {
        let _ = writeln!(md, "Fewer than two numeric columns; correlation skipped.\n");
    } else {
        let _ = writeln!(md, "Matrix: see `correlation.csv`.\n");
        let _ = writeln!(md, "![Correlation heatmap](correlation_heatmap.png)\n");
    }

    let _ = writeln!(md, "## Categorical columns\n");
    if top_cats.is_empty() {
        let _ = writeln!(md, "No categorical columns found.\n");
    } else {
        for cats in top_cats {
            let _ = writeln!(
                md,
                "- `{}`: top values in `top_categories/{}.csv`",
                cats.column,
                charts::file_stem(&cats.column)
            );
        }
        let _ = writeln!(md);
    }

    let _ = writeln!(md, "## Histograms\n");
    if charts.histograms.is_empty() {
        let _ = writeln!(md, "No numeric columns to plot.\n");
    } else {
        for (name, path) in &charts.histograms {
            let file = path
                .file_name()
                .map(|f| f.to_string_lossy().into_owned())
                .unwrap_or_default();
            let _ = writeln!(md, "![Histogram of {name}]({file})\n");
        }
    }

    md
}
