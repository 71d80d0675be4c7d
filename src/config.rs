//! Run configuration for the overview and report commands.
//!
//! All parameters arrive via CLI flags and are validated up front; every
//! pipeline stage receives the config by reference and never mutates it.

use std::path::PathBuf;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Text encodings the loader can decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Encoding {
    #[default]
    Utf8,
    Latin1,
}

impl FromStr for Encoding {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "utf-8" | "utf8" => Ok(Encoding::Utf8),
            "latin-1" | "latin1" | "iso-8859-1" => Ok(Encoding::Latin1),
            other => Err(Error::Config(format!(
                "unsupported encoding '{other}' (supported: utf-8, latin-1)"
            ))),
        }
    }
}

/// Options controlling how a CSV file is read into a table.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Field separator, must be a single ASCII character.
    pub separator: char,
    pub encoding: Encoding,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            separator: ',',
            encoding: Encoding::Utf8,
        }
    }
}

impl LoadOptions {
    pub fn validate(&self) -> Result<()> {
        if !self.separator.is_ascii() {
            return Err(Error::Config(format!(
                "separator '{}' is not a single ASCII character",
                self.separator
            )));
        }
        Ok(())
    }
}

/// Parameters for one `report` run. Immutable for the duration of the run.
#[derive(Debug, Clone)]
pub struct ReportConfig {
    pub load: LoadOptions,
    /// Directory the bundle is written into. Created if absent.
    pub out_dir: PathBuf,
    /// Upper bound on the number of histogram images, in table column order.
    pub max_hist_columns: usize,
    /// Number of most-frequent values kept per categorical column.
    pub top_k_categories: usize,
    /// Title line of the Markdown report.
    pub title: String,
    /// Columns whose missing share reaches this threshold get a warning line.
    pub min_missing_share: f64,
}

impl ReportConfig {
    pub fn validate(&self) -> Result<()> {
        self.load.validate()?;
        if self.max_hist_columns == 0 {
            return Err(Error::Config(
                "--max-hist-columns must be positive".to_string(),
            ));
        }
        if self.top_k_categories == 0 {
            return Err(Error::Config(
                "--top-k-categories must be positive".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.min_missing_share) {
            return Err(Error::Config(format!(
                "--min-missing-share must be in [0, 1], got {}",
                self.min_missing_share
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> ReportConfig {
        ReportConfig {
            load: LoadOptions::default(),
            out_dir: PathBuf::from("out"),
            max_hist_columns: 5,
            top_k_categories: 10,
            title: "EDA Report".to_string(),
            min_missing_share: 0.1,
        }
    }

    #[test]
    fn default_config_is_valid() {
        assert!(base_config().validate().is_ok());
    }

    #[test]
    fn zero_top_k_is_rejected() {
        let mut config = base_config();
        config.top_k_categories = 0;
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn zero_hist_columns_is_rejected() {
        let mut config = base_config();
        config.max_hist_columns = 0;
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn out_of_range_missing_share_is_rejected() {
        let mut config = base_config();
        config.min_missing_share = 1.5;
        assert!(config.validate().is_err());
        config.min_missing_share = -0.1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn non_ascii_separator_is_rejected() {
        let mut config = base_config();
        config.load.separator = 'é';
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn encoding_names_parse() {
        assert_eq!("utf-8".parse::<Encoding>().unwrap(), Encoding::Utf8);
        assert_eq!("UTF8".parse::<Encoding>().unwrap(), Encoding::Utf8);
        assert_eq!("latin-1".parse::<Encoding>().unwrap(), Encoding::Latin1);
        assert_eq!("ISO-8859-1".parse::<Encoding>().unwrap(), Encoding::Latin1);
        assert!("koi8-r".parse::<Encoding>().is_err());
    }
}
