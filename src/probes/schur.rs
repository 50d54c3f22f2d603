// SchurProbe: pairwise additive-consistency test
//
// For every pair i < j inside a window of R symbols, k = (i + j) mod R and
// the pair matches when (x_i + x_j) mod M == x_k. An i.i.d. sequence matches
// with probability close to the null p; additive or periodic structure drives
// the match count far away from triples·p.
//
// The scan is O(R²). Large windows fan the outer index out over scoped
// worker threads (crossbeam) with an interleaved row assignment, so each
// worker sees a similar mix of long and short rows. Counts are summed and the
// first match is reduced to the row-major minimum, which makes the parallel
// result identical to the sequential one.

use crate::config::{SchurNull, MAX_WORKERS};
use crate::sequence::{Symbol, SymbolSequence};
use fnv::FnvHashMap;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Windows smaller than this are always scanned on the calling thread
pub const PARALLEL_MIN_WINDOW: usize = 512;

/// SchurProbe block of an analysis report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchurResult {
    /// Window size R = min(N, Rcap)
    pub window: usize,
    /// Null model used for the expected match probability
    pub null_model: SchurNull,
    /// R(R−1)/2, or 0 when R < 3
    pub triples: u64,
    /// Matching pairs
    pub count: u64,
    /// Per-pair match probability under the null
    pub match_probability: Option<f64>,
    /// triples · p
    pub expected: f64,
    /// count / triples
    pub fraction: Option<f64>,
    /// (count − expected) / sqrt(triples · p · (1 − p)); 0.0 when the variance vanishes
    pub z: Option<f64>,
    /// Smallest matching (i, j) in row-major order
    pub first_match: Option<(usize, usize)>,
    /// `j` of `first_match`
    pub first_violation_index: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct ScanOutcome {
    count: u64,
    first: Option<(usize, usize)>,
}

impl ScanOutcome {
    fn merge(self, other: ScanOutcome) -> ScanOutcome {
        let first = match (self.first, other.first) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
        ScanOutcome {
            count: self.count + other.count,
            first,
        }
    }
}

/// Scan one row i against every j > i
#[inline]
fn scan_row(window: &[Symbol], modulus: u64, i: usize) -> ScanOutcome {
    let r = window.len();
    let ai = window[i] as u64;
    let mut count = 0u64;
    let mut first = None;

    // k = i + j wraps at most once since i, j < R
    let mut k = 2 * i + 1;
    if k >= r {
        k -= r;
    }
    for j in (i + 1)..r {
        let mut s = ai + window[j] as u64;
        if s >= modulus {
            s -= modulus;
        }
        if s == window[k] as u64 {
            count += 1;
            if first.is_none() {
                first = Some((i, j));
            }
        }
        k += 1;
        if k == r {
            k = 0;
        }
    }

    ScanOutcome { count, first }
}

fn scan_sequential(window: &[Symbol], modulus: u64) -> ScanOutcome {
    (0..window.len().saturating_sub(1))
        .map(|i| scan_row(window, modulus, i))
        .fold(ScanOutcome::default(), ScanOutcome::merge)
}

/// Interleaved-row scan over at most `workers` scoped threads (capped by rows and
/// `MAX_WORKERS`); `None` if a worker panicked
fn scan_parallel(window: &[Symbol], modulus: u64, workers: usize) -> Option<ScanOutcome> {
    let rows = window.len().saturating_sub(1);
    let workers = workers.min(rows).min(MAX_WORKERS).max(1);
    crossbeam::scope(|scope| {
        let handles: Vec<_> = (0..workers)
            .map(|t| {
                scope.spawn(move |_| {
                    (t..rows)
                        .step_by(workers)
                        .map(|i| scan_row(window, modulus, i))
                        .fold(ScanOutcome::default(), ScanOutcome::merge)
                })
            })
            .collect();

        handles
            .into_iter()
            .map(|h| h.join().ok())
            .try_fold(ScanOutcome::default(), |acc, part| Some(acc.merge(part?)))
    })
    .ok()
    .flatten()
}

/// Per-pair match probability under the chosen null
fn null_probability(window: &[Symbol], alphabet: u32, null: SchurNull) -> f64 {
    match null {
        SchurNull::Uniform => 1.0 / alphabet as f64,
        SchurNull::Empirical => {
            let mut counts = FnvHashMap::<Symbol, u64>::default();
            for &s in window {
                *counts.entry(s).or_insert(0) += 1;
            }
            let r = window.len() as f64;
            counts
                .values()
                .map(|&c| {
                    let q = c as f64 / r;
                    q * q * q
                })
                .sum()
        }
    }
}

/// Run the SchurProbe over the first `min(N, window_cap)` symbols
///
/// `workers <= 1` or a window below `PARALLEL_MIN_WINDOW` scans on the
/// calling thread. The result does not depend on `workers`.
///
/// # Example
/// ```
/// use digit_probe::config::SchurNull;
/// use digit_probe::probes::schur_probe;
/// use digit_probe::sequence::SymbolSequence;
///
/// // x_i = 3i mod 10 is perfectly additive when R is a multiple of 10
/// let seq = SymbolSequence::digits((0..200).map(|i| (3 * i) % 10).collect()).unwrap();
/// let schur = schur_probe(&seq, 200, SchurNull::Uniform, 1);
///
/// assert_eq!(schur.fraction, Some(1.0));
/// assert!(schur.z.unwrap() > 10.0);
/// ```
pub fn schur_probe(
    seq: &SymbolSequence,
    window_cap: usize,
    null: SchurNull,
    workers: usize,
) -> SchurResult {
    let r = seq.len().min(window_cap);
    let window = &seq.symbols()[..r];

    if r < 3 {
        tracing::debug!(window = r, "schur window too small, block undefined");
        return SchurResult {
            window: r,
            null_model: null,
            triples: 0,
            count: 0,
            match_probability: None,
            expected: 0.0,
            fraction: None,
            z: None,
            first_match: None,
            first_violation_index: None,
        };
    }

    let modulus = seq.alphabet() as u64;
    let start = Instant::now();
    let outcome = if workers > 1 && r >= PARALLEL_MIN_WINDOW {
        scan_parallel(window, modulus, workers).unwrap_or_else(|| {
            tracing::warn!(workers, "parallel schur scan failed, rescanning sequentially");
            scan_sequential(window, modulus)
        })
    } else {
        scan_sequential(window, modulus)
    };

    let triples = (r as u64) * (r as u64 - 1) / 2;
    let p = null_probability(window, seq.alphabet(), null);
    let expected = triples as f64 * p;
    let variance = expected * (1.0 - p);
    let z = if variance > 0.0 {
        (outcome.count as f64 - expected) / variance.sqrt()
    } else {
        0.0
    };

    tracing::debug!(
        window = r,
        workers,
        count = outcome.count,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "schur scan complete"
    );

    SchurResult {
        window: r,
        null_model: null,
        triples,
        count: outcome.count,
        match_probability: Some(p),
        expected,
        fraction: Some(outcome.count as f64 / triples as f64),
        z: Some(z),
        first_match: outcome.first,
        first_violation_index: outcome.first.map(|(_, j)| j),
    }
}
