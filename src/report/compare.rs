// Multi-report comparison against an optional baseline

use crate::error::{ProbeError, Result};
use crate::report::analysis::AnalysisReport;
use crate::report::scoring::{deviation, Metric, MetricSummary, MetricValues, PolicyKind, Severity};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// A report with the name it is shown under (usually its file name)
#[derive(Debug, Clone)]
pub struct LabeledReport {
    pub label: String,
    pub report: AnalysisReport,
}

impl LabeledReport {
    pub fn new(label: impl Into<String>, report: AnalysisReport) -> Self {
        Self {
            label: label.into(),
            report,
        }
    }
}

/// Score, severity and deltas of one report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRow {
    pub label: String,
    pub n: usize,
    pub severity: Severity,
    pub score: f64,
    pub metrics: MetricSummary,
    /// Normalized deviation per metric
    pub deviations: MetricValues,
    /// Value minus baseline value, defined only when both are
    pub deltas: MetricValues,
    /// Same content as the baseline report
    pub is_baseline: bool,
}

/// Ranked comparison of several reports
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    pub policy: PolicyKind,
    pub baseline: Option<String>,
    pub rows: Vec<ComparisonRow>,
}

impl Comparison {
    pub fn worst(&self) -> Option<Severity> {
        self.rows.iter().map(|r| r.severity).max()
    }
}

/// Descending on defined values; undefined sorts last
fn desc(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.total_cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Sort by score, |Schur z|, chi-square and max |autocorrelation|, all descending
///
/// The sort is stable, so fully tied rows keep their input order.
pub fn rank_rows(rows: &mut [ComparisonRow]) {
    rows.sort_by(|a, b| {
        desc(Some(a.score), Some(b.score))
            .then_with(|| {
                desc(
                    a.metrics.values.schur_z.map(f64::abs),
                    b.metrics.values.schur_z.map(f64::abs),
                )
            })
            .then_with(|| desc(a.metrics.values.chi_square, b.metrics.values.chi_square))
            .then_with(|| {
                desc(
                    a.metrics.values.max_abs_autocorr,
                    b.metrics.values.max_abs_autocorr,
                )
            })
    });
}

/// Score every report and rank the rows
///
/// # Errors
/// `IncompatibleBaseline` when the reports (or the baseline) were produced
/// under different SchurProbe null models.
pub fn compare_reports(
    reports: &[LabeledReport],
    baseline: Option<&LabeledReport>,
    policy: PolicyKind,
) -> Result<Comparison> {
    let reference_null = baseline
        .or_else(|| reports.first())
        .map(|r| r.report.schur.null_model);

    if let Some(null) = reference_null {
        if let Some(odd) = reports
            .iter()
            .find(|r| r.report.schur.null_model != null)
        {
            return Err(ProbeError::IncompatibleBaseline(format!(
                "{} uses the {} Schur null, expected {}",
                odd.label, odd.report.schur.null_model, null
            )));
        }
    }

    if let Some(base) = baseline {
        for r in reports
            .iter()
            .filter(|r| r.report.alphabet != base.report.alphabet)
        {
            tracing::warn!(
                report = %r.label,
                alphabet = r.report.alphabet,
                baseline_alphabet = base.report.alphabet,
                "comparing reports over different alphabets"
            );
        }
    }

    let scorer = policy.policy();
    let base_summary = baseline.map(|b| b.report.summary());

    let mut rows: Vec<ComparisonRow> = reports
        .iter()
        .map(|r| {
            let metrics = r.report.summary();
            let base_value = |m: Metric| base_summary.as_ref().and_then(|b| b.get(m));

            let deviations =
                MetricValues::from_fn(|m| deviation(m, metrics.get(m), base_value(m)));
            let deltas = MetricValues::from_fn(|m| Some(metrics.get(m)? - base_value(m)?));
            let score = scorer.score(&deviations);

            ComparisonRow {
                label: r.label.clone(),
                n: r.report.n,
                severity: scorer.classify(score),
                score,
                metrics,
                deviations,
                deltas,
                is_baseline: baseline.is_some_and(|b| b.report.digest == r.report.digest),
            }
        })
        .collect();

    rank_rows(&mut rows);
    tracing::debug!(rows = rows.len(), policy = %policy, "comparison ranked");

    Ok(Comparison {
        policy,
        baseline: baseline.map(|b| b.label.clone()),
        rows,
    })
}
