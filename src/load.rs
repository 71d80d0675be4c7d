//! CSV loading: bytes on disk to an in-memory [`Table`].
//!
//! Decoding, delimiter handling and ragged-row detection all happen here so
//! that downstream stages only ever see a well-formed table. Failure aborts
//! the run; there are no retries.

use std::path::Path;

use tracing::debug;

use crate::config::{Encoding, LoadOptions};
use crate::error::{Error, Result};
use crate::table::{Column, Table};

/// Cell values treated as missing, matching common spreadsheet and
/// data-tool conventions.
const NULL_MARKERS: &[&str] = &[
    "", "NA", "N/A", "na", "n/a", "null", "NULL", "None", "none", "NaN", "nan",
];

/// Reads a delimited text file into a [`Table`].
pub fn load_csv(path: &Path, options: &LoadOptions) -> Result<Table> {
    options.validate()?;

    let bytes = std::fs::read(path)
        .map_err(|e| Error::Load(format!("cannot read '{}': {e}", path.display())))?;
    let text = decode(&bytes, options.encoding, path)?;
    // Strip a UTF-8 BOM so it cannot leak into the first header name
    let text = text.strip_prefix('\u{feff}').unwrap_or(&text);

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(options.separator as u8)
        .has_headers(true)
        .flexible(false)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| Error::Load(format!("cannot parse header of '{}': {e}", path.display())))?
        .iter()
        .map(str::to_string)
        .collect();
    if headers.is_empty() || headers.iter().all(String::is_empty) {
        return Err(Error::Load(format!(
            "'{}' has no columns to parse",
            path.display()
        )));
    }

    let mut cells: Vec<Vec<Option<String>>> = vec![Vec::new(); headers.len()];
    for (row_idx, record) in reader.records().enumerate() {
        let record = record.map_err(|e| {
            Error::Load(format!(
                "cannot parse '{}' at data row {}: {e}",
                path.display(),
                row_idx + 1
            ))
        })?;
        for (col_idx, field) in record.iter().enumerate() {
            cells[col_idx].push(normalize_cell(field));
        }
    }

    let columns: Vec<Column> = headers
        .into_iter()
        .zip(cells)
        .map(|(name, col_cells)| Column::new(name, col_cells))
        .collect();
    let table = Table::new(columns)?;
    debug!(
        rows = table.n_rows(),
        cols = table.n_cols(),
        "loaded {}",
        path.display()
    );
    Ok(table)
}

fn decode(bytes: &[u8], encoding: Encoding, path: &Path) -> Result<String> {
    match encoding {
        Encoding::Utf8 => String::from_utf8(bytes.to_vec())
            .map_err(|e| Error::Load(format!("'{}' is not valid UTF-8: {e}", path.display()))),
        // Latin-1 maps every byte to the code point of the same value
        Encoding::Latin1 => Ok(bytes.iter().map(|&b| b as char).collect()),
    }
}

fn normalize_cell(field: &str) -> Option<String> {
    if NULL_MARKERS.contains(&field.trim()) {
        None
    } else {
        Some(field.to_string())
    }
}
