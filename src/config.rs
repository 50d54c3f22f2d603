// Configuration for the probe engine
//
// Every knob has a documented default so that reports produced with the
// default configuration are directly comparable across runs.

use crate::report::PolicyKind;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Largest n-gram order; contexts are encoded as base-M integers in a u128
pub const MAX_NGRAM_ORDER: usize = 4;

/// Upper bound on explicit Schur scan worker threads
pub const MAX_WORKERS: usize = 1024;

/// Alphabets up to this size report gaps for every symbol under `GapSelection::Auto`
pub const AUTO_GAP_ALL_LIMIT: u32 = 16;

/// Number of symbols reported under `GapSelection::Auto` for large alphabets
pub const AUTO_GAP_TOP_K: usize = 5;

/// Null model for the expected SchurProbe match probability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SchurNull {
    /// i.i.d. uniform symbols: p = 1/M
    #[default]
    Uniform,
    /// Window's own marginals: p = Σ_d (count_d / R)³
    Empirical,
}

impl std::fmt::Display for SchurNull {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SchurNull::Uniform => write!(f, "uniform"),
            SchurNull::Empirical => write!(f, "empirical"),
        }
    }
}

/// Which symbols the gap probe reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GapSelection {
    /// All symbols for alphabets up to 16, otherwise the top 5 by frequency
    #[default]
    Auto,
    /// Every symbol of the alphabet
    All,
    /// The K most frequent symbols (ties broken by smaller symbol)
    TopK(usize),
}

impl GapSelection {
    /// Resolve to a concrete limit for an alphabet; `None` means all symbols
    pub fn limit(self, alphabet: u32) -> Option<usize> {
        match self {
            GapSelection::All => None,
            GapSelection::TopK(k) => Some(k),
            GapSelection::Auto if alphabet <= AUTO_GAP_ALL_LIMIT => None,
            GapSelection::Auto => Some(AUTO_GAP_TOP_K),
        }
    }
}

/// Configuration for a full analysis run
///
/// # Example
/// ```
/// use digit_probe::config::ProbeConfig;
///
/// let config = ProbeConfig::default();
/// assert_eq!(config.schur_window, 5000);
/// assert_eq!(config.lags, vec![1, 2, 3, 4, 5]);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Autocorrelation lags (each >= 1)
    pub lags: Vec<usize>,

    /// N-gram context orders to evaluate (each in 1..=4)
    pub ngram_orders: Vec<usize>,

    /// SchurProbe window cap Rcap
    ///
    /// The pairwise scan is O(R²) over R = min(N, Rcap); this is the
    /// dominant cost of an analysis.
    pub schur_window: usize,

    /// Expected-probability convention for the SchurProbe z-score
    ///
    /// Reports produced under different nulls cannot be compared.
    pub schur_null: SchurNull,

    /// Fan the SchurProbe scan out over worker threads
    pub parallel: bool,

    /// Worker threads for the parallel scan (at most 1024); 0 uses available parallelism
    pub workers: usize,

    /// Symbols included in the gap report
    pub gap_selection: GapSelection,

    /// Default policy when reports are compared
    pub scoring_policy: PolicyKind,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            lags: vec![1, 2, 3, 4, 5],
            ngram_orders: vec![1, 2, 3],
            schur_window: 5000,
            schur_null: SchurNull::Uniform,
            parallel: true,
            workers: 0,
            gap_selection: GapSelection::Auto,
            scoring_policy: PolicyKind::Normalized,
        }
    }
}

impl ProbeConfig {
    /// Smaller Schur window and fewer n-gram orders for fast interactive runs
    pub fn quick() -> Self {
        Self {
            ngram_orders: vec![1, 2],
            schur_window: 1000,
            ..Self::default()
        }
    }

    /// Wider lag range, order-4 contexts and a 20k Schur window
    pub fn thorough() -> Self {
        Self {
            lags: (1..=10).collect(),
            ngram_orders: vec![1, 2, 3, 4],
            schur_window: 20_000,
            ..Self::default()
        }
    }

    /// Load configuration from a TOML file; missing fields keep their defaults
    ///
    /// # Example TOML
    /// ```toml
    /// lags = [1, 2, 3, 10]
    /// ngram_orders = [1, 2, 3]
    /// schur_window = 2000
    /// schur_null = "empirical"
    /// gap_selection = { top_k = 3 }
    /// scoring_policy = "weighted"
    /// ```
    pub fn from_toml<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).with_context(|| {
            format!("Failed to read probe config: {}", path.as_ref().display())
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text and validate it
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(content).context("Failed to parse TOML probe configuration")?;
        config.validate().map_err(|e| anyhow::anyhow!(e))?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if let Some(&lag) = self.lags.iter().find(|&&l| l == 0) {
            return Err(format!("lags must be >= 1, got {}", lag));
        }

        if let Some(&order) = self
            .ngram_orders
            .iter()
            .find(|&&n| n == 0 || n > MAX_NGRAM_ORDER)
        {
            return Err(format!(
                "ngram_orders must be in 1..={}, got {}",
                MAX_NGRAM_ORDER, order
            ));
        }

        if self.workers > MAX_WORKERS {
            return Err(format!(
                "workers must be <= {}, got {}",
                MAX_WORKERS, self.workers
            ));
        }

        if let GapSelection::TopK(0) = self.gap_selection {
            return Err("gap_selection top_k must be >= 1".to_string());
        }

        Ok(())
    }
}
