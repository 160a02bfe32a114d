//! CLI argument definitions for the sleep data integration pipeline.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "sleep-integrate",
    version,
    about = "Clean, harmonize and integrate student sleep and academic performance data",
    long_about = "Clean, harmonize and integrate student sleep and academic performance data.\n\n\
                  Maps the CMU sleep study and the Kaggle student habits survey onto one\n\
                  canonical schema and writes the integrated table with its metadata."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Harmonize the cleaned sources and write the integrated table.
    Integrate(IntegrateArgs),

    /// Clean the raw source files.
    Clean(CleanArgs),

    /// Print the canonical schema and the per-source mapping tables.
    Schema,
}

#[derive(Parser)]
pub struct IntegrateArgs {
    /// Cleaned CMU sleep study CSV.
    #[arg(
        long = "cmu",
        value_name = "CSV",
        default_value = "data/processed/cleaned_cmu-sleep.csv"
    )]
    pub cmu: PathBuf,

    /// Cleaned Kaggle student habits CSV.
    #[arg(
        long = "kaggle",
        value_name = "CSV",
        default_value = "data/processed/cleaned_student_habits.csv"
    )]
    pub kaggle: PathBuf,

    /// Output directory for the integrated table and metadata.
    #[arg(long = "output-dir", value_name = "DIR", default_value = "data/processed")]
    pub output_dir: PathBuf,

    /// Sleep category bin edges in hours (five ascending values).
    #[arg(
        long = "bin-edges",
        value_name = "EDGES",
        value_delimiter = ',',
        default_values_t = sleep_model::SleepBins::DEFAULT_EDGES
    )]
    pub bin_edges: Vec<f64>,

    /// Skip the per-source enhanced CSV files.
    #[arg(long = "no-source-files")]
    pub no_source_files: bool,

    /// Run every stage and print the summary without writing files.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

#[derive(Parser)]
pub struct CleanArgs {
    /// Raw CMU sleep study CSV.
    #[arg(long = "cmu", value_name = "CSV", default_value = "data/raw/cmu_sleep.csv")]
    pub cmu: PathBuf,

    /// Raw Kaggle student habits CSV.
    #[arg(
        long = "kaggle",
        value_name = "CSV",
        default_value = "data/raw/student_habits.csv"
    )]
    pub kaggle: PathBuf,

    /// Output directory for the cleaned files and cleaning report.
    #[arg(long = "output-dir", value_name = "DIR", default_value = "data/processed")]
    pub output_dir: PathBuf,

    /// Minimum fraction of nights with data for CMU rows.
    #[arg(long = "min-night-fraction", value_name = "F", default_value_t = 0.5)]
    pub min_night_fraction: f64,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
