//! Chart rendering with the plotters bitmap backend.
//!
//! Produces histogram images for numeric columns, a missing-value matrix
//! and a correlation heatmap. Backend failures surface as write errors.

use std::path::{Path, PathBuf};

use plotters::prelude::*;
use tracing::debug;

use crate::correlate::CorrelationMatrix;
use crate::error::{Error, Result};
use crate::profile::{self, ColumnKind, ColumnProfile};
use crate::table::Table;

const HIST_SIZE: (u32, u32) = (800, 600);
const MATRIX_SIZE: (u32, u32) = (1000, 600);
const HEATMAP_SIZE: (u32, u32) = (800, 700);

/// Paths of the images produced by one run.
#[derive(Debug, Clone)]
pub struct ChartSet {
    /// (column name, image path) per rendered histogram.
    pub histograms: Vec<(String, PathBuf)>,
    pub missing_matrix: PathBuf,
    /// Absent when the correlation matrix is empty.
    pub correlation_heatmap: Option<PathBuf>,
}

/// Renders all chart images into `out_dir`.
///
/// Histograms cover the first `max_hist_columns` numeric columns in table
/// order. The heatmap is skipped when the matrix is empty.
pub fn render_charts(
    table: &Table,
    profiles: &[ColumnProfile],
    matrix: &CorrelationMatrix,
    max_hist_columns: usize,
    out_dir: &Path,
) -> Result<ChartSet> {
    let mut histograms = Vec::new();
    for p in profiles
        .iter()
        .filter(|p| p.kind == ColumnKind::Numeric)
        .take(max_hist_columns)
    {
        let Some(column) = table.column(&p.name) else {
            continue;
        };
        let values: Vec<f64> = profile::numeric_cells(column)
            .map(|cells| cells.into_iter().flatten().collect())
            .unwrap_or_default();
        let path = out_dir.join(format!("hist_{}.png", file_stem(&p.name)));
        draw_histogram(&values, &p.name, &path)
            .map_err(|e| Error::Write(format!("cannot render '{}': {e}", path.display())))?;
        debug!("rendered histogram for '{}'", p.name);
        histograms.push((p.name.clone(), path));
    }

    let missing_matrix = out_dir.join("missing_matrix.png");
    draw_missing_matrix(table, &missing_matrix)
        .map_err(|e| Error::Write(format!("cannot render '{}': {e}", missing_matrix.display())))?;

    let correlation_heatmap = if matrix.is_empty() {
        None
    } else {
        let path = out_dir.join("correlation_heatmap.png");
        draw_heatmap(matrix, &path)
            .map_err(|e| Error::Write(format!("cannot render '{}': {e}", path.display())))?;
        Some(path)
    };

    Ok(ChartSet {
        histograms,
        missing_matrix,
        correlation_heatmap,
    })
}

/// Turns a column name into a filesystem-safe file stem.
pub(crate) fn file_stem(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Sturges' rule: ceil(log2 n) + 1 bins.
fn sturges_bins(n: usize) -> usize {
    if n < 2 {
        return 1;
    }
    (n as f64).log2().ceil() as usize + 1
}

type DrawResult = std::result::Result<(), Box<dyn std::error::Error>>;

fn draw_histogram(values: &[f64], name: &str, path: &Path) -> DrawResult {
    let root = BitMapBackend::new(path, HIST_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let (min, max) = values.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
        (lo.min(v), hi.max(v))
    });
    // Degenerate data (empty or constant) still gets a drawable range
    let (min, max, n_bins) = if !min.is_finite() || !max.is_finite() {
        (0.0, 1.0, 1)
    } else if min == max {
        (min - 0.5, max + 0.5, 1)
    } else {
        (min, max, sturges_bins(values.len()))
    };

    let width = (max - min) / n_bins as f64;
    let mut counts = vec![0usize; n_bins];
    for &v in values {
        let bin = (((v - min) / width) as usize).min(n_bins - 1);
        counts[bin] += 1;
    }
    let y_max = counts.iter().copied().max().unwrap_or(0).max(1) as f64 * 1.05;

    let mut chart = ChartBuilder::on(&root)
        .caption(format!("Histogram of {name}"), ("sans-serif", 24))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(min..max, 0f64..y_max)?;
    chart
        .configure_mesh()
        .x_desc(name)
        .y_desc("count")
        .draw()?;

    chart.draw_series(counts.iter().enumerate().map(|(i, &c)| {
        let x0 = min + i as f64 * width;
        let x1 = x0 + width;
        Rectangle::new([(x0, 0.0), (x1, c as f64)], BLUE.mix(0.6).filled())
    }))?;

    root.present()?;
    Ok(())
}

fn draw_missing_matrix(table: &Table, path: &Path) -> DrawResult {
    let root = BitMapBackend::new(path, MATRIX_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let n_cols = table.n_cols().max(1);
    let n_rows = table.n_rows().max(1);
    let names: Vec<String> = table.columns().iter().map(|c| c.name().to_string()).collect();

    let mut chart = ChartBuilder::on(&root)
        .caption("Missing-value matrix", ("sans-serif", 24))
        .margin(10)
        .x_label_area_size(60)
        .y_label_area_size(50)
        .build_cartesian_2d(0f64..n_cols as f64, 0f64..n_rows as f64)?;
    chart
        .configure_mesh()
        .disable_x_mesh()
        .disable_y_mesh()
        .x_labels(n_cols)
        .x_label_formatter(&|x| {
            names
                .get(*x as usize)
                .cloned()
                .unwrap_or_default()
        })
        .y_desc("row")
        .draw()?;

    for (col_idx, column) in table.columns().iter().enumerate() {
        for (row_idx, cell) in column.cells().iter().enumerate() {
            // First row of the file at the top of the image
            let y = (table.n_rows() - 1 - row_idx) as f64;
            let color = if cell.is_some() {
                RGBColor(54, 79, 107).filled()
            } else {
                RGBColor(240, 84, 84).filled()
            };
            chart.draw_series(std::iter::once(Rectangle::new(
                [(col_idx as f64, y), (col_idx as f64 + 1.0, y + 1.0)],
                color,
            )))?;
        }
    }

    root.present()?;
    Ok(())
}

fn draw_heatmap(matrix: &CorrelationMatrix, path: &Path) -> DrawResult {
    let root = BitMapBackend::new(path, HEATMAP_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let n = matrix.size();
    let names = matrix.names();

    let mut chart = ChartBuilder::on(&root)
        .caption("Correlation heatmap", ("sans-serif", 24))
        .margin(10)
        .x_label_area_size(60)
        .y_label_area_size(80)
        .build_cartesian_2d(0f64..n as f64, 0f64..n as f64)?;
    chart
        .configure_mesh()
        .disable_x_mesh()
        .disable_y_mesh()
        .x_labels(n)
        .y_labels(n)
        .x_label_formatter(&|x| names.get(*x as usize).cloned().unwrap_or_default())
        .y_label_formatter(&|y| {
            let idx = n.saturating_sub(1 + *y as usize);
            names.get(idx).cloned().unwrap_or_default()
        })
        .draw()?;

    for i in 0..n {
        for j in 0..n {
            let r = matrix.get(i, j);
            // Row 0 at the top
            let y = (n - 1 - i) as f64;
            let x = j as f64;
            chart.draw_series(std::iter::once(Rectangle::new(
                [(x, y), (x + 1.0, y + 1.0)],
                heat_color(r).filled(),
            )))?;
            let label = if r.is_nan() {
                "NaN".to_string()
            } else {
                format!("{r:.2}")
            };
            chart.draw_series(std::iter::once(Text::new(
                label,
                (x + 0.35, y + 0.45),
                ("sans-serif", 16).into_font().color(&BLACK),
            )))?;
        }
    }

    root.present()?;
    Ok(())
}

/// Diverging blue-white-red ramp over [-1, 1]; NaN renders grey.
fn heat_color(r: f64) -> RGBColor {
    if r.is_nan() {
        return RGBColor(180, 180, 180);
    }
    let t = r.clamp(-1.0, 1.0);
    let fade = (255.0 * (1.0 - t.abs())) as u8;
    if t >= 0.0 {
        RGBColor(255, fade, fade)
    } else {
        RGBColor(fade, fade, 255)
    }
}
