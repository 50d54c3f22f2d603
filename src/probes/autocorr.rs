use crate::sequence::SymbolSequence;
use serde::{Deserialize, Serialize};

/// Autocorrelation at one lag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LagCorrelation {
    pub lag: usize,
    pub value: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutocorrResult {
    pub lags: Vec<LagCorrelation>,
}

impl AutocorrResult {
    /// Largest absolute autocorrelation over defined lags
    pub fn max_abs(&self) -> Option<f64> {
        self.lags
            .iter()
            .filter_map(|l| l.value)
            .map(f64::abs)
            .max_by(|a, b| a.total_cmp(b))
    }

    pub fn at(&self, lag: usize) -> Option<f64> {
        self.lags
            .iter()
            .find(|l| l.lag == lag)
            .and_then(|l| l.value)
    }
}

/// Pearson autocorrelation of the sequence with itself shifted by each lag
///
/// Mean and denominator are taken over the whole sequence; the numerator
/// sums the N − L overlapping products. A constant sequence yields 0.0.
pub fn autocorr_probe(seq: &SymbolSequence, lags: &[usize]) -> AutocorrResult {
    let symbols = seq.symbols();
    let n = symbols.len();

    let centered: Vec<f64> = if n >= 2 {
        let mean = symbols.iter().map(|&s| s as f64).sum::<f64>() / n as f64;
        symbols.iter().map(|&s| s as f64 - mean).collect()
    } else {
        Vec::new()
    };
    let denominator: f64 = centered.iter().map(|d| d * d).sum();

    let lags = lags
        .iter()
        .map(|&lag| {
            let value = if lag == 0 || n < 2 || n <= lag {
                None
            } else if denominator == 0.0 {
                Some(0.0)
            } else {
                let numerator: f64 = centered
                    .iter()
                    .zip(&centered[lag..])
                    .map(|(a, b)| a * b)
                    .sum();
                Some(numerator / denominator)
            };
            LagCorrelation { lag, value }
        })
        .collect();

    AutocorrResult { lags }
}
