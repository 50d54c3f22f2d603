// Full analysis of one symbol sequence

use crate::config::ProbeConfig;
use crate::error::{ProbeError, Result};
use crate::probes::{
    autocorr_probe, compression_probe, distribution_probe, gap_probe, runs_probe, schur_probe,
    AutocorrResult, CompressionResult, DistributionResult, GapResult, RunsResult, SchurResult,
};
use crate::report::scoring::MetricSummary;
use crate::sequence::{ngram_probe, NGramResult, SequenceMode, SymbolSequence};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Instant;

/// Every probe result for one sequence, plus metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub mode: SequenceMode,
    /// Sequence length N
    pub n: usize,
    /// Alphabet size M
    pub alphabet: u32,
    /// Largest raw integer before modulo reduction (integers mode)
    #[serde(default)]
    pub max_observed: Option<i64>,
    /// SHA-256 of the canonical encoding
    pub digest: String,
    pub distribution: DistributionResult,
    pub runs: RunsResult,
    pub gaps: GapResult,
    pub autocorr: AutocorrResult,
    pub compression: CompressionResult,
    pub ngram: NGramResult,
    pub schur: SchurResult,
}

impl AnalysisReport {
    /// Record the largest raw value seen before reduction
    pub fn with_max_observed(mut self, max_observed: Option<i64>) -> Self {
        self.max_observed = max_observed;
        self
    }

    /// Headline metrics used for scoring and comparison
    pub fn summary(&self) -> MetricSummary {
        MetricSummary::from_report(self)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a report previously written with `to_json`
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }
}

/// Worker count for the Schur scan: 1 when parallelism is off, otherwise
/// `workers` or the available parallelism when that is 0
pub fn resolve_workers(config: &ProbeConfig) -> usize {
    if !config.parallel {
        return 1;
    }
    match config.workers {
        0 => std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1),
        n => n,
    }
}

/// Run every probe over `seq`
///
/// # Errors
/// `InvalidConfig` when `config` fails validation. Short or degenerate
/// sequences never error; their metrics are undefined instead.
///
/// # Example
/// ```
/// use digit_probe::config::ProbeConfig;
/// use digit_probe::report::analyze;
/// use digit_probe::sequence::SymbolSequence;
///
/// let seq = SymbolSequence::digits((0..1000).map(|i| i % 10).collect()).unwrap();
/// let report = analyze(&seq, &ProbeConfig::quick()).unwrap();
///
/// assert_eq!(report.n, 1000);
/// assert_eq!(report.distribution.chi_square, Some(0.0));
/// ```
pub fn analyze(seq: &SymbolSequence, config: &ProbeConfig) -> Result<AnalysisReport> {
    config.validate().map_err(ProbeError::InvalidConfig)?;

    let start = Instant::now();
    let workers = resolve_workers(config);
    tracing::info!(
        n = seq.len(),
        alphabet = seq.alphabet(),
        mode = %seq.mode(),
        workers,
        "analyzing sequence"
    );

    let distribution = distribution_probe(seq);
    let runs = runs_probe(seq);
    let gaps = gap_probe(seq, config.gap_selection);
    let autocorr = autocorr_probe(seq, &config.lags);
    let compression = compression_probe(seq)?;
    let ngram = ngram_probe(seq, &config.ngram_orders);
    tracing::debug!(
        elapsed_ms = start.elapsed().as_millis() as u64,
        "linear probes complete"
    );

    let schur = schur_probe(seq, config.schur_window, config.schur_null, workers);
    tracing::debug!(
        elapsed_ms = start.elapsed().as_millis() as u64,
        "analysis complete"
    );

    Ok(AnalysisReport {
        mode: seq.mode(),
        n: seq.len(),
        alphabet: seq.alphabet(),
        max_observed: None,
        digest: seq.digest(),
        distribution,
        runs,
        gaps,
        autocorr,
        compression,
        ngram,
        schur,
    })
}
