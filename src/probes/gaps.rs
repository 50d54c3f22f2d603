use crate::config::GapSelection;
use crate::sequence::{Symbol, SymbolSequence};
use serde::{Deserialize, Serialize};

/// Gap statistics for a single symbol
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolGaps {
    pub symbol: Symbol,
    /// Number of times the symbol occurs
    pub occurrences: u64,
    /// Distances between consecutive occurrences (occurrences − 1)
    pub gap_count: u64,
    /// Mean distance, undefined with fewer than 2 occurrences
    pub mean_gap: Option<f64>,
}

/// Per-symbol gap report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GapResult {
    /// Selection that produced this report
    pub selection: GapSelection,
    /// Reported symbols; ascending by symbol when all are listed, otherwise
    /// count descending then symbol ascending
    pub symbols: Vec<SymbolGaps>,
}

impl GapResult {
    /// Gap statistics for one symbol, if it was reported
    pub fn get(&self, symbol: Symbol) -> Option<&SymbolGaps> {
        self.symbols.iter().find(|g| g.symbol == symbol)
    }
}

#[derive(Clone, Copy, Default)]
struct Tracker {
    occurrences: u64,
    first: usize,
    last: usize,
}

/// Occurrence-gap statistics
///
/// The sum of consecutive gaps telescopes to `last − first`, so only the
/// first and last index of every symbol are tracked.
pub fn gap_probe(seq: &SymbolSequence, selection: GapSelection) -> GapResult {
    let mut trackers = vec![Tracker::default(); seq.alphabet() as usize];
    for (idx, &s) in seq.symbols().iter().enumerate() {
        let t = &mut trackers[s as usize];
        if t.occurrences == 0 {
            t.first = idx;
        }
        t.last = idx;
        t.occurrences += 1;
    }

    let mut symbols: Vec<SymbolGaps> = trackers
        .iter()
        .enumerate()
        .map(|(s, t)| {
            let gap_count = t.occurrences.saturating_sub(1);
            SymbolGaps {
                symbol: s as Symbol,
                occurrences: t.occurrences,
                gap_count,
                mean_gap: (gap_count > 0).then(|| (t.last - t.first) as f64 / gap_count as f64),
            }
        })
        .collect();

    if let Some(k) = selection.limit(seq.alphabet()) {
        symbols.sort_by(|a, b| {
            b.occurrences
                .cmp(&a.occurrences)
                .then(a.symbol.cmp(&b.symbol))
        });
        symbols.truncate(k);
    }

    GapResult { selection, symbols }
}
