use crate::sequence::SymbolSequence;
use serde::{Deserialize, Serialize};
use statrs::function::erf::erfc;

/// Wald–Wolfowitz runs test on the even/odd parity of each symbol
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunsResult {
    /// Maximal blocks of equal parity
    pub runs: u64,
    /// Even symbols (class 0)
    pub even: u64,
    /// Odd symbols (class 1)
    pub odd: u64,
    /// μ = 1 + 2·n0·n1/N
    pub expected_runs: Option<f64>,
    /// (R − μ) / σ, undefined when σ = 0 or the test does not apply
    pub z: Option<f64>,
    /// erfc(|Z| / √2)
    pub p_two_tailed: Option<f64>,
}

/// Parity runs test
///
/// Undefined (z and p `None`) when N < 2 or every symbol has the same parity.
pub fn runs_probe(seq: &SymbolSequence) -> RunsResult {
    let symbols = seq.symbols();
    let odd = symbols.iter().filter(|&&s| s & 1 == 1).count() as u64;
    let even = symbols.len() as u64 - odd;
    let runs = match symbols.first() {
        None => 0,
        Some(_) => {
            1 + symbols
                .windows(2)
                .filter(|w| (w[0] & 1) != (w[1] & 1))
                .count() as u64
        }
    };

    let undefined = RunsResult {
        runs,
        even,
        odd,
        expected_runs: None,
        z: None,
        p_two_tailed: None,
    };

    if symbols.len() < 2 || even == 0 || odd == 0 {
        tracing::debug!(
            n = symbols.len(),
            even,
            odd,
            "runs test undefined for this input"
        );
        return undefined;
    }

    let n = symbols.len() as f64;
    let (n0, n1) = (even as f64, odd as f64);
    let product = 2.0 * n0 * n1;
    let mu = 1.0 + product / n;
    let variance = product * (product - n) / (n * n * (n - 1.0));

    if variance <= 0.0 {
        return RunsResult {
            expected_runs: Some(mu),
            ..undefined
        };
    }

    let z = (runs as f64 - mu) / variance.sqrt();
    RunsResult {
        expected_runs: Some(mu),
        z: Some(z),
        p_two_tailed: Some(erfc(z.abs() / std::f64::consts::SQRT_2)),
        ..undefined
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequence::Symbol;

    fn digits(symbols: Vec<Symbol>) -> SymbolSequence {
        SymbolSequence::digits(symbols).unwrap()
    }

    #[test]
    fn test_alternating_parity_has_max_runs() {
        let seq = digits((0..100).map(|i| i % 10).collect());
        let runs = runs_probe(&seq);

        assert_eq!(runs.runs, 100);
        assert_eq!(runs.even, 50);
        assert_eq!(runs.odd, 50);
        assert!((runs.expected_runs.unwrap() - 51.0).abs() < 1e-9);
        // Far too many runs → strongly positive Z, tiny p
        assert!(runs.z.unwrap() > 9.0);
        assert!(runs.p_two_tailed.unwrap() < 1e-10);
    }

    #[test]
    fn test_two_blocks_negative_z() {
        let mut symbols = vec![2; 50];
        symbols.extend(vec![3; 50]);
        let runs = runs_probe(&digits(symbols));

        assert_eq!(runs.runs, 2);
        assert!(runs.z.unwrap() < -9.0);
    }

    #[test]
    fn test_known_small_case() {
        // classes 0 0 0 1 1 1: R = 2, n0 = 3, n1 = 3, N = 6
        let runs = runs_probe(&digits(vec![2, 4, 6, 1, 3, 5]));
        let mu = 1.0 + 18.0 / 6.0;
        let var = 18.0 * (18.0 - 6.0) / (36.0 * 5.0);
        let z = (2.0 - mu) / f64::sqrt(var);

        assert_eq!(runs.runs, 2);
        assert!((runs.z.unwrap() - z).abs() < 1e-12);
        // erfc(1.826 / √2) ≈ 0.0679
        let p = runs.p_two_tailed.unwrap();
        assert!((p - 0.0679).abs() < 1e-3, "p = {}", p);
    }

    #[test]
    fn test_single_class_undefined() {
        let runs = runs_probe(&digits(vec![2, 4, 6, 8, 0]));
        assert_eq!(runs.runs, 1);
        assert_eq!(runs.odd, 0);
        assert_eq!(runs.z, None);
        assert_eq!(runs.p_two_tailed, None);
    }

    #[test]
    fn test_too_short_undefined() {
        let runs = runs_probe(&digits(vec![1]));
        assert_eq!(runs.z, None);

        let empty = runs_probe(&digits(vec![]));
        assert_eq!(empty.runs, 0);
        assert_eq!(empty.z, None);
    }

    #[test]
    fn test_zero_z_has_unit_p() {
        // classes 0 1 1 0: R = 3, μ = 1 + 8/4 = 3 → Z = 0
        let runs = runs_probe(&digits(vec![0, 1, 1, 0]));
        assert_eq!(runs.z, Some(0.0));
        assert!((runs.p_two_tailed.unwrap() - 1.0).abs() < 1e-12);
    }
}
