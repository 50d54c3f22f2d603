//! Human-readable rendering of reports and comparisons
//!
//! Text for the terminal and Markdown for notes. Undefined values render as
//! `-` so they can never be mistaken for a measured zero.

use crate::report::{AnalysisReport, Comparison, Metric, Severity};
use std::fmt::Write;

/// Format an optional value with fixed precision, `-` when undefined
pub fn fmt_opt(value: Option<f64>, digits: usize) -> String {
    match value {
        Some(v) => format!("{:.*}", digits, v),
        None => "-".to_string(),
    }
}

fn severity_icon(severity: Severity) -> &'static str {
    match severity {
        Severity::Green => "🟢",
        Severity::Yellow => "🟡",
        Severity::Red => "🔴",
    }
}

/// Full text rendering of one analysis report
pub fn render_report(report: &AnalysisReport) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail
    let _ = write_report(&mut out, report);
    out
}

fn write_report(out: &mut String, report: &AnalysisReport) -> std::fmt::Result {
    writeln!(
        out,
        "=== digit-probe: {} mode, N={}, M={} ===",
        report.mode, report.n, report.alphabet
    )?;
    if let Some(max) = report.max_observed {
        writeln!(out, "Max observed value: {}", max)?;
    }
    writeln!(out, "SHA-256: {}", report.digest)?;
    writeln!(out)?;

    let dist = &report.distribution;
    writeln!(
        out,
        "Chi-square: {}  (expected per bin {})",
        fmt_opt(dist.chi_square, 4),
        fmt_opt(dist.expected_per_bin, 2)
    )?;
    writeln!(out, "Counts and z-scores:")?;
    let z_scores = dist.z_scores.as_deref();
    for (symbol, &count) in dist.counts.iter().enumerate() {
        if count == 0 && report.alphabet > 16 {
            continue;
        }
        let z = z_scores.and_then(|z| z.get(symbol).copied());
        writeln!(out, "  {:>4}: {:>10}  z={}", symbol, count, fmt_opt(z, 3))?;
    }
    if dist.missing_symbols() > 0 {
        writeln!(out, "  ({} symbols never occur)", dist.missing_symbols())?;
    }
    writeln!(out)?;

    let runs = &report.runs;
    writeln!(
        out,
        "Runs (even/odd): R={}  n0={}  n1={}  Z={}  p={}",
        runs.runs,
        runs.even,
        runs.odd,
        fmt_opt(runs.z, 4),
        fmt_opt(runs.p_two_tailed, 4)
    )?;
    writeln!(out)?;

    writeln!(out, "Gaps (count, mean gap):")?;
    for g in &report.gaps.symbols {
        writeln!(
            out,
            "  {:>4}: {} gaps, mean {}",
            g.symbol,
            g.gap_count,
            fmt_opt(g.mean_gap, 3)
        )?;
    }
    writeln!(out)?;

    writeln!(out, "Autocorrelation:")?;
    for lag in &report.autocorr.lags {
        writeln!(out, "  lag {:>3}: {}", lag.lag, fmt_opt(lag.value, 6))?;
    }
    writeln!(out)?;

    let comp = &report.compression;
    writeln!(
        out,
        "Compression (zlib): {} → {} bytes, ratio {}",
        comp.raw_bytes,
        comp.compressed_bytes,
        fmt_opt(comp.ratio, 4)
    )?;
    writeln!(out)?;

    writeln!(out, "N-gram predictor (chance {:.4}):", report.ngram.chance)?;
    for acc in &report.ngram.orders {
        writeln!(
            out,
            "  n={}: accuracy {}  ({}/{})",
            acc.order,
            fmt_opt(acc.accuracy, 4),
            acc.correct,
            acc.predictions
        )?;
    }
    writeln!(out)?;

    let schur = &report.schur;
    writeln!(
        out,
        "SchurProbe (R={}, {} null): count={} expected≈{:.1} fraction={} z={}",
        schur.window,
        schur.null_model,
        schur.count,
        schur.expected,
        fmt_opt(schur.fraction, 6),
        fmt_opt(schur.z, 3)
    )?;
    match schur.first_match {
        Some((i, j)) => writeln!(out, "  first match at (i={}, j={})", i, j)?,
        None => writeln!(out, "  no matching pair")?,
    }

    Ok(())
}

/// Per-report summary lines followed by the ranked comparison table
pub fn render_comparison(comparison: &Comparison) -> String {
    let mut out = String::new();
    let _ = write_comparison(&mut out, comparison);
    out
}

fn write_comparison(out: &mut String, comparison: &Comparison) -> std::fmt::Result {
    for row in &comparison.rows {
        let m = &row.metrics;
        writeln!(
            out,
            "▶ {}  (N={})  {} severity={}  score={:.4}{}",
            row.label,
            row.n,
            severity_icon(row.severity),
            row.severity,
            row.score,
            if row.is_baseline { "  [baseline]" } else { "" }
        )?;
        writeln!(
            out,
            "  chi²={} | comp={} | runs(Z,p)=({},{})",
            fmt_opt(m.values.chi_square, 4),
            fmt_opt(m.values.compression_ratio, 4),
            fmt_opt(m.values.runs_z, 4),
            fmt_opt(m.runs_p, 4)
        )?;
        writeln!(
            out,
            "  max|autocorr|={} | ngram_best={}",
            fmt_opt(m.values.max_abs_autocorr, 4),
            fmt_opt(m.values.ngram_best, 4)
        )?;
        writeln!(
            out,
            "  Schur: z={}  count={}  expected≈{:.1}  frac={}",
            fmt_opt(m.values.schur_z, 4),
            m.schur_count,
            m.schur_expected,
            fmt_opt(m.schur_fraction, 4)
        )?;
        writeln!(out)?;
    }

    writeln!(
        out,
        "=== COMPARISON ({} policy, sorted by score, |Schur z|, chi², max|ac|) ===",
        comparison.policy
    )?;
    write!(out, "file | N | severity | score")?;
    for metric in Metric::ALL {
        write!(out, " | {} | Δ", metric)?;
    }
    writeln!(out)?;

    for row in &comparison.rows {
        write!(
            out,
            "{} | {} | {} | {:.4}",
            row.label, row.n, row.severity, row.score
        )?;
        for metric in Metric::ALL {
            write!(
                out,
                " | {} | {}",
                fmt_opt(row.metrics.get(metric), 4),
                fmt_opt(row.deltas.get(metric), 4)
            )?;
        }
        writeln!(out)?;
    }

    Ok(())
}

/// Markdown table of a ranked comparison
pub fn render_markdown(comparison: &Comparison) -> String {
    let mut out = String::new();
    let _ = write_markdown(&mut out, comparison);
    out
}

fn write_markdown(out: &mut String, comparison: &Comparison) -> std::fmt::Result {
    writeln!(out, "# Digit-Probe Compare")?;
    writeln!(out)?;
    if let Some(baseline) = &comparison.baseline {
        writeln!(out, "**Baseline:** `{}`", baseline)?;
        writeln!(out)?;
    }
    writeln!(out, "**Policy:** {}", comparison.policy)?;
    writeln!(out)?;
    writeln!(
        out,
        "| file | N | severity | score | chi² | comp | runsZ | max\\|ac\\| | ngram_best | Schur z |"
    )?;
    writeln!(out, "|---|---:|:--:|--:|--:|--:|--:|--:|--:|--:|")?;
    for row in &comparison.rows {
        let v = &row.metrics.values;
        writeln!(
            out,
            "| {} | {} | {} | {:.4} | {} | {} | {} | {} | {} | {} |",
            row.label.replace('|', "\\|"),
            row.n,
            row.severity,
            row.score,
            fmt_opt(v.chi_square, 4),
            fmt_opt(v.compression_ratio, 4),
            fmt_opt(v.runs_z, 4),
            fmt_opt(v.max_abs_autocorr, 4),
            fmt_opt(v.ngram_best, 4),
            fmt_opt(v.schur_z, 4)
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProbeConfig;
    use crate::report::{analyze, compare_reports, LabeledReport, PolicyKind};
    use crate::sequence::SymbolSequence;

    fn report(symbols: Vec<u32>) -> AnalysisReport {
        let seq = SymbolSequence::digits(symbols).unwrap();
        analyze(&seq, &ProbeConfig::quick()).unwrap()
    }

    #[test]
    fn test_fmt_opt() {
        assert_eq!(fmt_opt(Some(0.5), 3), "0.500");
        assert_eq!(fmt_opt(Some(0.0), 2), "0.00");
        assert_eq!(fmt_opt(None, 4), "-");
    }

    #[test]
    fn test_render_report_sections() {
        let text = render_report(&report((0..200).map(|i| i % 10).collect()));

        assert!(text.contains("digits mode, N=200, M=10"));
        assert!(text.contains("Chi-square: 0.0000"));
        assert!(text.contains("Runs (even/odd)"));
        assert!(text.contains("lag   1:"));
        assert!(text.contains("SchurProbe (R=200, uniform null)"));
    }

    #[test]
    fn test_render_report_undefined_as_dash() {
        let text = render_report(&report(vec![3]));
        // one 3 over ten bins: 0.9²/0.1 + 9 · 0.1²/0.1
        assert!(text.contains("Chi-square: 9.0000"));
        assert!(text.contains("Z=-  p=-"));
        assert!(text.contains("fraction=- z=-"));
        assert!(text.contains("no matching pair"));
    }

    #[test]
    fn test_render_comparison_and_markdown() {
        let a = LabeledReport::new("ramp.json", report((0..500).map(|i| i % 10).collect()));
        let b = LabeledReport::new("short.json", report(vec![1, 2]));
        let comparison = compare_reports(&[a.clone(), b], Some(&a), PolicyKind::Normalized).unwrap();

        let text = render_comparison(&comparison);
        assert!(text.contains("▶ ramp.json  (N=500)"));
        assert!(text.contains("[baseline]"));
        assert!(text.contains("=== COMPARISON (normalized policy"));

        let md = render_markdown(&comparison);
        assert!(md.starts_with("# Digit-Probe Compare"));
        assert!(md.contains("**Baseline:** `ramp.json`"));
        assert!(md.contains("| short.json | 2 |"));
    }
}
