//! Deterministic synthetic sequences
//!
//! Each generator produces a sequence with a known statistical signature:
//! seeded uniform noise as the "random-like" reference, and a family of
//! structured or biased streams that individual probes are expected to flag.

use crate::sequence::Symbol;
use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Weight of the favored symbol in `biased_digits`; every other digit weighs 1
pub const DEFAULT_BIAS_WEIGHT: u32 = 6;

/// Kind of synthetic sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum SynthKind {
    /// Seeded i.i.d. uniform symbols
    Uniform,
    /// Digits with 7 weighted 6:1 over the others
    Biased7,
    /// x ← (3x + 7) mod M starting from 1, period 4 for M = 10
    Lcg,
    /// x_i = 7i mod M
    Stride,
    /// 0, 1, …, M−1 repeated
    Ramp,
    /// Uniform digits with a weak additive rule after even pair sums
    SchurTrap,
    /// Only the symbols 0 and 1
    TwoSymbol,
}

/// Generate `n` symbols of `kind` over `alphabet` (digit kinds ignore it)
pub fn generate(kind: SynthKind, n: usize, alphabet: u32, seed: u64) -> Vec<Symbol> {
    match kind {
        SynthKind::Uniform => uniform(n, alphabet, seed),
        SynthKind::Biased7 => biased_digits(n, 7, DEFAULT_BIAS_WEIGHT, seed),
        SynthKind::Lcg => lcg(n, 3, 7, 1, alphabet),
        SynthKind::Stride => stride(n, 7, alphabet),
        SynthKind::Ramp => ramp(n, alphabet),
        SynthKind::SchurTrap => schur_trap(n, 2, seed),
        SynthKind::TwoSymbol => uniform(n, 2, seed),
    }
}

/// Alphabet of the sequence `generate` produces for `kind`
pub fn alphabet_for(kind: SynthKind, requested: u32) -> u32 {
    match kind {
        SynthKind::Biased7 | SynthKind::SchurTrap => 10,
        SynthKind::TwoSymbol => 2,
        _ => requested.max(1),
    }
}

/// Uniform symbols in `[0, alphabet)`
pub fn uniform(n: usize, alphabet: u32, seed: u64) -> Vec<Symbol> {
    let mut rng = StdRng::seed_from_u64(seed);
    let upper = alphabet.max(1);
    (0..n).map(|_| rng.gen_range(0..upper)).collect()
}

/// Decimal digits where `favored` has weight `weight` and the rest weight 1
pub fn biased_digits(n: usize, favored: Symbol, weight: u32, seed: u64) -> Vec<Symbol> {
    let weights: Vec<u32> = (0..10)
        .map(|d| if d == favored { weight.max(1) } else { 1 })
        .collect();
    let mut rng = StdRng::seed_from_u64(seed);
    match WeightedIndex::new(&weights) {
        Ok(dist) => (0..n).map(|_| dist.sample(&mut rng) as Symbol).collect(),
        Err(_) => uniform(n, 10, seed),
    }
}

/// Linear congruential sequence; the seed `x0` itself is not emitted
pub fn lcg(n: usize, a: u64, c: u64, x0: u64, modulus: u32) -> Vec<Symbol> {
    let m = modulus.max(1) as u64;
    let mut x = x0 % m;
    (0..n)
        .map(|_| {
            x = (a * x + c) % m;
            x as Symbol
        })
        .collect()
}

/// x_i = step·i mod alphabet
pub fn stride(n: usize, step: u64, alphabet: u32) -> Vec<Symbol> {
    let m = alphabet.max(1) as u64;
    (0..n as u64).map(|i| ((step % m) * (i % m) % m) as Symbol).collect()
}

/// 0, 1, …, alphabet−1 repeated
pub fn ramp(n: usize, alphabet: u32) -> Vec<Symbol> {
    let m = alphabet.max(1) as usize;
    (0..n).map(|i| (i % m) as Symbol).collect()
}

/// Uniform digits, except that after two symbols with an even sum the next
/// one is the previous symbol plus `bias` (mod 10)
pub fn schur_trap(n: usize, bias: u32, seed: u64) -> Vec<Symbol> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut seq: Vec<Symbol> = Vec::with_capacity(n);
    for _ in 0..n {
        let mut x = rng.gen_range(0..10);
        if let [.., a, b] = seq.as_slice() {
            if seq.len() > 2 && (*a + *b) % 2 == 0 {
                x = (*b + bias) % 10;
            }
        }
        seq.push(x);
    }
    seq
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_is_seeded() {
        assert_eq!(uniform(100, 10, 3), uniform(100, 10, 3));
        assert_ne!(uniform(100, 10, 3), uniform(100, 10, 4));
        assert!(uniform(1000, 10, 3).iter().all(|&s| s < 10));
    }

    #[test]
    fn test_lcg_period_four() {
        assert_eq!(lcg(8, 3, 7, 1, 10), vec![0, 7, 8, 1, 0, 7, 8, 1]);
    }

    #[test]
    fn test_stride_and_ramp() {
        assert_eq!(stride(5, 7, 10), vec![0, 7, 4, 1, 8]);
        assert_eq!(ramp(12, 10), vec![0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 0, 1]);
    }

    #[test]
    fn test_biased_digits_favor_seven() {
        let seq = biased_digits(30_000, 7, 6, 1);
        let sevens = seq.iter().filter(|&&s| s == 7).count() as f64 / seq.len() as f64;
        // 6 / 15 = 0.4
        assert!((sevens - 0.4).abs() < 0.02, "share of 7 = {}", sevens);
    }

    #[test]
    fn test_schur_trap_applies_rule() {
        let seq = schur_trap(5000, 2, 9);
        for i in 3..seq.len() {
            if (seq[i - 2] + seq[i - 1]) % 2 == 0 {
                assert_eq!(seq[i], (seq[i - 1] + 2) % 10, "index {}", i);
            }
        }
    }

    #[test]
    fn test_generate_dispatch() {
        assert_eq!(generate(SynthKind::Ramp, 3, 10, 0), vec![0, 1, 2]);
        assert!(generate(SynthKind::TwoSymbol, 200, 10, 0)
            .iter()
            .all(|&s| s < 2));
        assert_eq!(alphabet_for(SynthKind::SchurTrap, 90), 10);
        assert_eq!(alphabet_for(SynthKind::Uniform, 90), 90);
    }
}
