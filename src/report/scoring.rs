// AnomalyScore computation and severity classification

use crate::report::analysis::AnalysisReport;
use serde::{Deserialize, Serialize};

/// Headline metrics that feed the AnomalyScore
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    ChiSquare,
    CompressionRatio,
    RunsZ,
    MaxAbsAutocorr,
    SchurZ,
    BestNGram,
}

impl Metric {
    pub const ALL: [Metric; 6] = [
        Metric::ChiSquare,
        Metric::CompressionRatio,
        Metric::RunsZ,
        Metric::MaxAbsAutocorr,
        Metric::SchurZ,
        Metric::BestNGram,
    ];

    /// Deviation that counts as one unit of anomaly
    pub fn scale(self) -> f64 {
        match self {
            Metric::ChiSquare => 5.0,
            Metric::CompressionRatio => 0.02,
            Metric::RunsZ => 1.0,
            Metric::MaxAbsAutocorr => 0.01,
            Metric::SchurZ => 1.0,
            Metric::BestNGram => 0.01,
        }
    }

    /// Expected value for random decimal digits, used without a baseline
    pub fn reference(self) -> f64 {
        match self {
            // mean of chi-square with 9 degrees of freedom, roughly
            Metric::ChiSquare => 10.0,
            Metric::CompressionRatio => 0.48,
            Metric::RunsZ => 0.0,
            Metric::MaxAbsAutocorr => 0.0,
            Metric::SchurZ => 0.0,
            Metric::BestNGram => 0.10,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Metric::ChiSquare => "chi_square",
            Metric::CompressionRatio => "compression_ratio",
            Metric::RunsZ => "runs_z",
            Metric::MaxAbsAutocorr => "max_abs_autocorr",
            Metric::SchurZ => "schur_z",
            Metric::BestNGram => "ngram_best",
        }
    }
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// One optional value per headline metric
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricValues {
    pub chi_square: Option<f64>,
    pub compression_ratio: Option<f64>,
    pub runs_z: Option<f64>,
    pub max_abs_autocorr: Option<f64>,
    pub schur_z: Option<f64>,
    pub ngram_best: Option<f64>,
}

impl MetricValues {
    pub fn get(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::ChiSquare => self.chi_square,
            Metric::CompressionRatio => self.compression_ratio,
            Metric::RunsZ => self.runs_z,
            Metric::MaxAbsAutocorr => self.max_abs_autocorr,
            Metric::SchurZ => self.schur_z,
            Metric::BestNGram => self.ngram_best,
        }
    }

    pub fn set(&mut self, metric: Metric, value: Option<f64>) {
        let slot = match metric {
            Metric::ChiSquare => &mut self.chi_square,
            Metric::CompressionRatio => &mut self.compression_ratio,
            Metric::RunsZ => &mut self.runs_z,
            Metric::MaxAbsAutocorr => &mut self.max_abs_autocorr,
            Metric::SchurZ => &mut self.schur_z,
            Metric::BestNGram => &mut self.ngram_best,
        };
        *slot = value;
    }

    /// Build by evaluating `f` for every metric
    pub fn from_fn(mut f: impl FnMut(Metric) -> Option<f64>) -> Self {
        let mut values = Self::default();
        for metric in Metric::ALL {
            values.set(metric, f(metric));
        }
        values
    }
}

/// Headline metrics of a report, plus the secondary figures shown beside them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSummary {
    #[serde(flatten)]
    pub values: MetricValues,
    pub runs_p: Option<f64>,
    pub schur_count: u64,
    pub schur_expected: f64,
    pub schur_fraction: Option<f64>,
}

impl MetricSummary {
    pub fn from_report(report: &AnalysisReport) -> Self {
        Self {
            values: MetricValues {
                chi_square: report.distribution.chi_square,
                compression_ratio: report.compression.ratio,
                runs_z: report.runs.z,
                max_abs_autocorr: report.autocorr.max_abs(),
                schur_z: report.schur.z,
                ngram_best: report.ngram.best(),
            },
            runs_p: report.runs.p_two_tailed,
            schur_count: report.schur.count,
            schur_expected: report.schur.expected,
            schur_fraction: report.schur.fraction,
        }
    }

    pub fn get(&self, metric: Metric) -> Option<f64> {
        self.values.get(metric)
    }
}

/// Normalized deviation `|v − b| / scale`
///
/// `b` is the baseline value when defined, otherwise the metric's fixed
/// reference. Undefined when `value` is.
pub fn deviation(metric: Metric, value: Option<f64>, baseline: Option<f64>) -> Option<f64> {
    let value = value?;
    let reference = baseline.unwrap_or_else(|| metric.reference());
    Some((value - reference).abs() / metric.scale())
}

/// Three-level classification of an AnomalyScore
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Green,
    Yellow,
    Red,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Green => write!(f, "green"),
            Severity::Yellow => write!(f, "yellow"),
            Severity::Red => write!(f, "red"),
        }
    }
}

/// A way of folding per-metric deviations into one AnomalyScore
pub trait ScoringPolicy {
    fn kind(&self) -> PolicyKind;

    /// Weight of a metric; zero excludes it
    fn weight(&self, metric: Metric) -> f64;

    /// (yellow, red) lower bounds
    fn thresholds(&self) -> (f64, f64);

    /// Weighted mean of the defined deviations, 0.0 when none is defined
    fn score(&self, deviations: &MetricValues) -> f64 {
        let (total, weights) = Metric::ALL
            .iter()
            .filter_map(|&m| {
                let w = self.weight(m);
                (w > 0.0)
                    .then(|| deviations.get(m))
                    .flatten()
                    .map(|d| (w * d, w))
            })
            .fold((0.0, 0.0), |(t, ws), (wd, w)| (t + wd, ws + w));

        if weights > 0.0 {
            total / weights
        } else {
            0.0
        }
    }

    fn classify(&self, score: f64) -> Severity {
        let (yellow, red) = self.thresholds();
        if score < yellow {
            Severity::Green
        } else if score < red {
            Severity::Yellow
        } else {
            Severity::Red
        }
    }
}

/// Unweighted mean of every defined deviation
#[derive(Debug, Clone, Copy, Default)]
pub struct NormalizedDeviation;

impl ScoringPolicy for NormalizedDeviation {
    fn kind(&self) -> PolicyKind {
        PolicyKind::Normalized
    }

    fn weight(&self, _metric: Metric) -> f64 {
        1.0
    }

    fn thresholds(&self) -> (f64, f64) {
        (0.8, 1.8)
    }
}

/// Schur z, chi-square and autocorrelation with fixed weights
#[derive(Debug, Clone, Copy, Default)]
pub struct WeightedLinear;

impl ScoringPolicy for WeightedLinear {
    fn kind(&self) -> PolicyKind {
        PolicyKind::Weighted
    }

    fn weight(&self, metric: Metric) -> f64 {
        match metric {
            Metric::SchurZ => 0.6,
            Metric::ChiSquare => 0.3,
            Metric::MaxAbsAutocorr => 0.1,
            _ => 0.0,
        }
    }

    fn thresholds(&self) -> (f64, f64) {
        (1.0, 2.0)
    }
}

/// Named scoring policy, selectable from configuration or the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PolicyKind {
    /// Mean normalized deviation over every defined metric
    #[default]
    Normalized,
    /// 0.6 Schur z, 0.3 chi-square, 0.1 autocorrelation
    Weighted,
}

impl PolicyKind {
    pub fn policy(self) -> Box<dyn ScoringPolicy> {
        match self {
            PolicyKind::Normalized => Box::new(NormalizedDeviation),
            PolicyKind::Weighted => Box::new(WeightedLinear),
        }
    }
}

impl std::fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PolicyKind::Normalized => write!(f, "normalized"),
            PolicyKind::Weighted => write!(f, "weighted"),
        }
    }
}
