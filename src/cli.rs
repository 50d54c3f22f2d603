//! CLI argument parsing for digit-probe

use crate::config::SchurNull;
use crate::report::PolicyKind;
use crate::synth::SynthKind;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for reports and comparisons
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text format (default)
    Text,
    /// JSON format for machine parsing
    Json,
}

/// Named configuration preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Preset {
    /// Default lags 1..5, orders 1-3, Schur window 5000
    Default,
    /// Orders 1-2, Schur window 1000
    Quick,
    /// Lags 1..10, orders 1-4, Schur window 20000
    Thorough,
}

#[derive(Parser, Debug)]
#[command(name = "digit-probe")]
#[command(version)]
#[command(
    about = "Statistical and structural randomness probes for digit and integer sequences",
    long_about = None
)]
pub struct Cli {
    /// Enable debug tracing output (stderr)
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Analyze one sequence file and print or save its report
    Analyze(AnalyzeArgs),
    /// Score and rank saved reports, optionally against a baseline
    Compare(CompareArgs),
    /// Print a synthetic sequence to stdout
    Generate(GenerateArgs),
}

#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Input file: digits (any other characters ignored) or one integer per line
    #[arg(long, value_name = "FILE")]
    pub file: PathBuf,

    /// Analyze only the first N symbols
    #[arg(long = "n", value_name = "N")]
    pub limit: Option<usize>,

    /// Integer mode: one value per line, reduced modulo --alphabet
    #[arg(long, requires = "alphabet")]
    pub integers: bool,

    /// Alphabet size M for integer mode
    #[arg(long, value_name = "M", value_parser = clap::value_parser!(u32).range(1..))]
    pub alphabet: Option<u32>,

    /// SchurProbe window cap R
    #[arg(long = "schur-n", value_name = "R")]
    pub schur_window: Option<usize>,

    /// Comma-separated autocorrelation lags (e.g. 1,2,3,10)
    #[arg(long, value_delimiter = ',', value_name = "LAGS")]
    pub lags: Option<Vec<usize>>,

    /// Comma-separated n-gram orders (1-4)
    #[arg(long, value_delimiter = ',', value_name = "ORDERS")]
    pub orders: Option<Vec<usize>>,

    /// Null model for the SchurProbe expectation
    #[arg(long = "schur-null", value_enum)]
    pub schur_null: Option<SchurNull>,

    /// Worker threads for the Schur scan (0 = available parallelism)
    #[arg(long, value_name = "THREADS")]
    pub workers: Option<usize>,

    /// Scan on the calling thread only
    #[arg(long = "no-parallel")]
    pub no_parallel: bool,

    /// Configuration preset (ignored when --config is given)
    #[arg(long, value_enum, default_value = "default")]
    pub preset: Preset,

    /// TOML configuration file; command-line flags override its values
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Write the JSON report to this file
    #[arg(long = "report-json", value_name = "FILE")]
    pub report_json: Option<PathBuf>,

    /// Output format on stdout
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Args, Debug)]
pub struct CompareArgs {
    /// JSON reports produced by `analyze --report-json`
    #[arg(required = true, value_name = "REPORT")]
    pub reports: Vec<PathBuf>,

    /// Report used as baseline for deltas and scores (may be one of REPORT)
    #[arg(long, value_name = "FILE")]
    pub baseline: Option<PathBuf>,

    /// Scoring policy
    #[arg(long, value_enum)]
    pub policy: Option<PolicyKind>,

    /// TOML configuration file providing the default scoring policy
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Export the ranked comparison as CSV
    #[arg(long, value_name = "FILE")]
    pub csv: Option<PathBuf>,

    /// Export the ranked comparison as a Markdown table
    #[arg(long, value_name = "FILE")]
    pub md: Option<PathBuf>,

    /// Output format on stdout
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Kind of synthetic sequence
    #[arg(value_enum)]
    pub kind: SynthKind,

    /// Number of symbols
    #[arg(long = "n", default_value = "100000")]
    pub n: usize,

    /// RNG seed for the random kinds
    #[arg(long, default_value = "1")]
    pub seed: u64,

    /// Alphabet size (uniform, lcg, stride, ramp)
    #[arg(long, default_value = "10", value_parser = clap::value_parser!(u32).range(1..))]
    pub alphabet: u32,

    /// Write to this file instead of stdout
    #[arg(long, short, value_name = "FILE")]
    pub output: Option<PathBuf>,
}
