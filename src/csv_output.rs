//! CSV export of report comparisons
//!
//! One row per compared report, in ranked order, for spreadsheet analysis.
//! Undefined metrics are written as `nan`.

use crate::report::{Comparison, ComparisonRow, Metric};

/// CSV comparison formatter
#[derive(Debug)]
pub struct CsvComparisonOutput {
    rows: Vec<ComparisonRow>,
    include_deltas: bool,
}

impl CsvComparisonOutput {
    /// Create a new formatter; deltas add one `delta_<metric>` column per metric
    pub fn new(include_deltas: bool) -> Self {
        Self {
            rows: Vec::new(),
            include_deltas,
        }
    }

    /// Formatter pre-filled with the rows of a comparison
    pub fn from_comparison(comparison: &Comparison) -> Self {
        let mut output = Self::new(comparison.baseline.is_some());
        for row in &comparison.rows {
            output.add_row(row.clone());
        }
        output
    }

    pub fn add_row(&mut self, row: ComparisonRow) {
        self.rows.push(row);
    }

    /// Generate CSV header row
    fn header(&self) -> String {
        let mut headers: Vec<String> = [
            "file",
            "N",
            "severity",
            "score",
            "chi_square",
            "compress_ratio",
            "runs_Z",
            "runs_p",
            "max_abs_autocorr",
            "ngram_best",
            "sch_z",
            "sch_count",
            "sch_expected",
            "sch_fraction",
        ]
        .iter()
        .map(|h| h.to_string())
        .collect();

        if self.include_deltas {
            headers.extend(Metric::ALL.iter().map(|m| format!("delta_{}", m)));
        }

        headers.join(",")
    }

    /// Escape CSV field (handle commas, quotes, newlines)
    fn escape_field(field: &str) -> String {
        if field.contains(',') || field.contains('"') || field.contains('\n') {
            format!("\"{}\"", field.replace('"', "\"\""))
        } else {
            field.to_string()
        }
    }

    fn format_value(value: Option<f64>) -> String {
        match value {
            Some(v) => v.to_string(),
            None => "nan".to_string(),
        }
    }

    /// Format a comparison row as CSV
    fn format_row(&self, row: &ComparisonRow) -> String {
        let m = &row.metrics;
        let mut fields = vec![
            Self::escape_field(&row.label),
            row.n.to_string(),
            row.severity.to_string(),
            row.score.to_string(),
            Self::format_value(m.values.chi_square),
            Self::format_value(m.values.compression_ratio),
            Self::format_value(m.values.runs_z),
            Self::format_value(m.runs_p),
            Self::format_value(m.values.max_abs_autocorr),
            Self::format_value(m.values.ngram_best),
            Self::format_value(m.values.schur_z),
            m.schur_count.to_string(),
            m.schur_expected.to_string(),
            Self::format_value(m.schur_fraction),
        ];

        if self.include_deltas {
            fields.extend(
                Metric::ALL
                    .iter()
                    .map(|&metric| Self::format_value(row.deltas.get(metric))),
            );
        }

        fields.join(",")
    }

    /// Generate CSV output as string
    pub fn to_csv(&self) -> String {
        let mut output = String::new();

        output.push_str(&self.header());
        output.push('\n');

        for row in &self.rows {
            output.push_str(&self.format_row(row));
            output.push('\n');
        }

        output
    }
}
