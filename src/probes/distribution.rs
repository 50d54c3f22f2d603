use crate::sequence::{Symbol, SymbolSequence};
use serde::{Deserialize, Serialize};

/// Symbol counts and goodness-of-fit against the uniform distribution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionResult {
    /// Occurrences of each symbol, indexed by symbol
    pub counts: Vec<u64>,

    /// Expected count per bin, N/M; undefined for an empty sequence
    pub expected_per_bin: Option<f64>,

    /// Σ (observed − expected)² / expected over all M bins
    pub chi_square: Option<f64>,

    /// (observed − expected) / sqrt(expected) per symbol, when expected > 0
    pub z_scores: Option<Vec<f64>>,
}

impl DistributionResult {
    /// Most frequent symbols, count descending then symbol ascending
    pub fn top_k(&self, k: usize) -> Vec<(Symbol, u64)> {
        let mut ranked: Vec<(Symbol, u64)> = self
            .counts
            .iter()
            .enumerate()
            .map(|(s, &c)| (s as Symbol, c))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        ranked.truncate(k);
        ranked
    }

    /// Per-symbol z-scores with undefined rendered as zero
    ///
    /// Presentation helper only; analysis code should read `z_scores`.
    pub fn z_scores_or_zero(&self) -> Vec<f64> {
        self.z_scores
            .clone()
            .unwrap_or_else(|| vec![0.0; self.counts.len()])
    }

    /// Number of symbols that never occur
    pub fn missing_symbols(&self) -> usize {
        self.counts.iter().filter(|&&c| c == 0).count()
    }
}

/// Count symbols and compute chi-square and per-symbol z-scores
///
/// The chi-square divisor falls back to 1.0 when the expected count is zero,
/// so each bin then contributes its squared raw count. With N = 0 every
/// count is zero and chi-square, expected and z-scores are all undefined.
///
/// # Example
/// ```
/// use digit_probe::probes::distribution_probe;
/// use digit_probe::sequence::SymbolSequence;
///
/// let seq = SymbolSequence::digits((0..100).map(|i| i % 10).collect()).unwrap();
/// let dist = distribution_probe(&seq);
///
/// assert_eq!(dist.counts, vec![10; 10]);
/// assert_eq!(dist.chi_square, Some(0.0));
/// ```
pub fn distribution_probe(seq: &SymbolSequence) -> DistributionResult {
    let alphabet = seq.alphabet() as usize;
    let mut counts = vec![0u64; alphabet];
    for &s in seq.symbols() {
        counts[s as usize] += 1;
    }

    if seq.is_empty() {
        return DistributionResult {
            counts,
            expected_per_bin: None,
            chi_square: None,
            z_scores: None,
        };
    }

    let expected = seq.len() as f64 / alphabet as f64;
    let divisor = if expected > 0.0 { expected } else { 1.0 };
    let chi_square: f64 = counts
        .iter()
        .map(|&c| {
            let dev = c as f64 - expected;
            dev * dev / divisor
        })
        .sum();

    let z_scores = (expected > 0.0).then(|| {
        let sigma = expected.sqrt();
        counts
            .iter()
            .map(|&c| (c as f64 - expected) / sigma)
            .collect()
    });

    DistributionResult {
        counts,
        expected_per_bin: Some(expected),
        chi_square: Some(chi_square),
        z_scores,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_counts_zero_chi_square() {
        let seq = SymbolSequence::digits((0..1000).map(|i| i % 10).collect()).unwrap();
        let dist = distribution_probe(&seq);

        assert_eq!(dist.counts, vec![100; 10]);
        assert_eq!(dist.expected_per_bin, Some(100.0));
        assert_eq!(dist.chi_square, Some(0.0));
        assert!(dist.z_scores.unwrap().iter().all(|&z| z == 0.0));
    }

    #[test]
    fn test_chi_square_single_symbol() {
        // 20 sevens over alphabet 10: expected 2, bin 7 dev 18, others dev -2
        let seq = SymbolSequence::digits(vec![7; 20]).unwrap();
        let dist = distribution_probe(&seq);

        let expected_chi = (18.0 * 18.0 + 9.0 * 4.0) / 2.0;
        assert!((dist.chi_square.unwrap() - expected_chi).abs() < 1e-9);

        let z = dist.z_scores.as_ref().unwrap();
        assert!((z[7] - 18.0 / 2f64.sqrt()).abs() < 1e-9);
        assert!((z[0] + 2.0 / 2f64.sqrt()).abs() < 1e-9);
        assert_eq!(dist.missing_symbols(), 9);
    }

    #[test]
    fn test_empty_sequence_undefined() {
        let seq = SymbolSequence::digits(vec![]).unwrap();
        let dist = distribution_probe(&seq);

        assert_eq!(dist.counts, vec![0; 10]);
        assert_eq!(dist.chi_square, None);
        assert_eq!(dist.expected_per_bin, None);
        assert_eq!(dist.z_scores, None);
        assert_eq!(dist.z_scores_or_zero(), vec![0.0; 10]);
    }

    #[test]
    fn test_idempotent() {
        let symbols: Vec<Symbol> = (0..5000u32).map(|i| (i * i + 3 * i) % 10).collect();
        let seq = SymbolSequence::digits(symbols).unwrap();

        let a = distribution_probe(&seq);
        let b = distribution_probe(&seq);
        assert_eq!(a.counts, b.counts);
        assert_eq!(
            a.chi_square.unwrap().to_bits(),
            b.chi_square.unwrap().to_bits()
        );
    }

    #[test]
    fn test_top_k_orders_by_count_then_symbol() {
        let seq = SymbolSequence::digits(vec![4, 4, 4, 2, 2, 9, 9, 1]).unwrap();
        let dist = distribution_probe(&seq);

        assert_eq!(dist.top_k(3), vec![(4, 3), (2, 2), (9, 2)]);
    }
}
