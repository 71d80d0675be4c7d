use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{debug, error};

use eda_cli::commands;
use eda_cli::config::{LoadOptions, ReportConfig};

/// Exploratory data analysis for CSV files
#[derive(Parser)]
#[command(name = "eda")]
#[command(about = "Exploratory data analysis for CSV files", long_about = None)]
struct Cli {
    /// Enable verbose output (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print dataset dimensions, column kinds and quality flags
    Overview {
        /// Path to the CSV file
        csv_path: PathBuf,

        /// Field separator
        #[arg(long, default_value_t = ',')]
        sep: char,

        /// Input text encoding (utf-8 or latin-1)
        #[arg(long, default_value = "utf-8")]
        encoding: String,
    },
    /// Write a full EDA bundle: tables, charts and a Markdown report
    Report {
        /// Path to the CSV file
        csv_path: PathBuf,

        /// Directory the report bundle is written into
        #[arg(long)]
        out_dir: PathBuf,

        /// Field separator
        #[arg(long, default_value_t = ',')]
        sep: char,

        /// Input text encoding (utf-8 or latin-1)
        #[arg(long, default_value = "utf-8")]
        encoding: String,

        /// Maximum number of numeric columns to plot histograms for
        #[arg(long, default_value_t = 5)]
        max_hist_columns: usize,

        /// Number of top categories to keep per categorical column
        #[arg(long, default_value_t = 10)]
        top_k_categories: usize,

        /// Title of the report
        #[arg(long, default_value = "EDA Report")]
        title: String,

        /// Missing-share threshold for report warnings
        #[arg(long, default_value_t = 0.1)]
        min_missing_share: f64,
    },
}

fn main() {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .with_writer(std::io::stderr)
        .with_target(cli.verbose >= 2)
        .init();

    debug!("eda started with verbosity level: {}", cli.verbose);

    let result = match cli.command {
        Commands::Overview {
            csv_path,
            sep,
            encoding,
        } => run_overview(csv_path, sep, encoding),
        Commands::Report {
            csv_path,
            out_dir,
            sep,
            encoding,
            max_hist_columns,
            top_k_categories,
            title,
            min_missing_share,
        } => run_report(
            csv_path,
            out_dir,
            sep,
            encoding,
            max_hist_columns,
            top_k_categories,
            title,
            min_missing_share,
        ),
    };

    if let Err(e) = result {
        error!("Fatal error: {}", e);
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run_overview(csv_path: PathBuf, sep: char, encoding: String) -> anyhow::Result<()> {
    let options = LoadOptions {
        separator: sep,
        encoding: encoding.parse()?,
    };
    commands::overview(&csv_path, &options)?;
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn run_report(
    csv_path: PathBuf,
    out_dir: PathBuf,
    sep: char,
    encoding: String,
    max_hist_columns: usize,
    top_k_categories: usize,
    title: String,
    min_missing_share: f64,
) -> anyhow::Result<()> {
    let config = ReportConfig {
        load: LoadOptions {
            separator: sep,
            encoding: encoding.parse()?,
        },
        out_dir,
        max_hist_columns,
        top_k_categories,
        title,
        min_missing_share,
    };
    commands::report(&csv_path, &config)?;
    Ok(())
}
