use crate::sequence::Symbol;
use fnv::FnvHashMap;

/// Upper bound on `contexts * alphabet` cells for the array-backed table
pub(crate) const DENSE_CELL_LIMIT: u128 = 1 << 22;

/// Context → next-symbol frequency table for an order-n predictor
///
/// Contexts are the preceding n symbols encoded as a base-M integer
/// (see [`encode_context`]).
pub(crate) trait TransitionTable: Send + Sync {
    /// Record that `next` followed `context` once
    fn observe(&mut self, context: u128, next: Symbol);

    /// Most frequent successor of `context`, smallest symbol on ties
    ///
    /// `None` when the context was never observed.
    fn predict(&self, context: u128) -> Option<Symbol>;

    /// Number of distinct contexts observed
    fn contexts_seen(&self) -> usize;
}

/// Encode a context window as a base-`alphabet` integer
///
/// The first symbol is the most significant digit, so `[1, 2]` over
/// alphabet 10 encodes as `12`.
pub(crate) fn encode_context(window: &[Symbol], alphabet: u32) -> u128 {
    window
        .iter()
        .fold(0u128, |acc, &s| acc * alphabet as u128 + s as u128)
}

/// `alphabet^order` if it fits in u128
pub(crate) fn context_space(alphabet: u32, order: usize) -> Option<u128> {
    let mut space: u128 = 1;
    for _ in 0..order {
        space = space.checked_mul(alphabet as u128)?;
    }
    Some(space)
}

/// Pick the table backing for a given alphabet and order
pub(crate) fn table_for(alphabet: u32, order: usize) -> Box<dyn TransitionTable> {
    match context_space(alphabet, order) {
        Some(space)
            if space
                .checked_mul(alphabet as u128)
                .is_some_and(|cells| cells <= DENSE_CELL_LIMIT) =>
        {
            Box::new(DenseTable::new(space as usize, alphabet as usize))
        }
        _ => Box::new(SparseTable::default()),
    }
}

/// Array-backed table: one row of `alphabet` counters per possible context
pub(crate) struct DenseTable {
    alphabet: usize,
    counts: Vec<u32>,
    seen: Vec<bool>,
}

impl DenseTable {
    pub(crate) fn new(contexts: usize, alphabet: usize) -> Self {
        Self {
            alphabet,
            counts: vec![0; contexts * alphabet],
            seen: vec![false; contexts],
        }
    }
}

impl TransitionTable for DenseTable {
    fn observe(&mut self, context: u128, next: Symbol) {
        let row = context as usize;
        self.counts[row * self.alphabet + next as usize] += 1;
        self.seen[row] = true;
    }

    fn predict(&self, context: u128) -> Option<Symbol> {
        let row = usize::try_from(context).ok()?;
        if !*self.seen.get(row)? {
            return None;
        }
        let cells = &self.counts[row * self.alphabet..(row + 1) * self.alphabet];
        argmax(cells.iter().enumerate().map(|(s, &c)| (s as Symbol, c)))
    }

    fn contexts_seen(&self) -> usize {
        self.seen.iter().filter(|&&s| s).count()
    }
}

/// Hash-map table for alphabets whose context space is too large for an array
#[derive(Default)]
pub(crate) struct SparseTable {
    counts: FnvHashMap<u128, FnvHashMap<Symbol, u32>>,
}

impl TransitionTable for SparseTable {
    fn observe(&mut self, context: u128, next: Symbol) {
        *self
            .counts
            .entry(context)
            .or_default()
            .entry(next)
            .or_insert(0) += 1;
    }

    fn predict(&self, context: u128) -> Option<Symbol> {
        let successors = self.counts.get(&context)?;
        argmax(successors.iter().map(|(&s, &c)| (s, c)))
    }

    fn contexts_seen(&self) -> usize {
        self.counts.len()
    }
}

/// Highest count wins; ties go to the smallest symbol. Zero counts never win.
pub(crate) fn argmax(entries: impl Iterator<Item = (Symbol, u32)>) -> Option<Symbol> {
    let mut best: Option<(Symbol, u32)> = None;
    for (symbol, count) in entries {
        if count == 0 {
            continue;
        }
        best = match best {
            Some((b, bc)) if bc > count || (bc == count && b < symbol) => Some((b, bc)),
            _ => Some((symbol, count)),
        };
    }
    best.map(|(s, _)| s)
}
