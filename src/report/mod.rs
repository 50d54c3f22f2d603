// Analysis reports, anomaly scoring and multi-report comparison
//
// An AnalysisReport bundles every probe result for one sequence together with
// its metadata. Reports are the unit exchanged between the `analyze` and
// `compare` steps: they round-trip through JSON, and comparison never needs
// the original sequence.
//
// Scoring reduces six headline metrics to normalized deviations from either a
// baseline report or a fixed "random-like" reference, then folds them into a
// single AnomalyScore under a named policy:
//
// - normalized: mean deviation over every defined metric
// - weighted:   Schur z, chi-square and autocorrelation only, 0.6/0.3/0.1
//
// Each policy owns its severity thresholds.

mod analysis;
mod compare;
mod scoring;

pub use analysis::{analyze, resolve_workers, AnalysisReport};
pub use compare::{compare_reports, rank_rows, Comparison, ComparisonRow, LabeledReport};
pub use scoring::{
    deviation, Metric, MetricSummary, MetricValues, NormalizedDeviation, PolicyKind,
    ScoringPolicy, Severity, WeightedLinear,
};
