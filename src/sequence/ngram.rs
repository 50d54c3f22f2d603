use crate::sequence::table::{encode_context, table_for, TransitionTable};
use crate::sequence::{Symbol, SymbolSequence};
use serde::{Deserialize, Serialize};

/// Fraction of the sequence used for training
const TRAIN_FRACTION: f64 = 0.8;

/// Training fraction used when the 80% split leaves too little context
const FALLBACK_TRAIN_FRACTION: f64 = 0.7;

/// Minimum sequence length for any n-gram evaluation
const MIN_LEN: usize = 4;

/// Held-out accuracy of one order-n predictor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NGramAccuracy {
    /// Context length n
    pub order: usize,
    /// Symbols used for training
    pub train_len: usize,
    /// Symbols in the held-out segment
    pub test_len: usize,
    /// Predictions made on the held-out segment
    pub predictions: usize,
    /// Correct predictions
    pub correct: usize,
    /// `correct / predictions`, undefined when no prediction was made
    pub accuracy: Option<f64>,
}

/// N-gram predictor accuracies for every configured order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NGramResult {
    /// Accuracy of a uniform guess, `1 / alphabet`
    pub chance: f64,
    pub orders: Vec<NGramAccuracy>,
}

impl NGramResult {
    /// Best defined accuracy across orders
    pub fn best(&self) -> Option<f64> {
        self.orders
            .iter()
            .filter_map(|o| o.accuracy)
            .max_by(|a, b| a.total_cmp(b))
    }

    /// Accuracy for a specific order
    pub fn accuracy(&self, order: usize) -> Option<f64> {
        self.orders
            .iter()
            .find(|o| o.order == order)
            .and_then(|o| o.accuracy)
    }
}

/// Maximum-likelihood order-n Markov predictor
///
/// Keeps the most frequent successor of every context seen in training, and
/// the most frequent training symbol as the fallback for unseen contexts.
pub struct NGramModel {
    order: usize,
    alphabet: u32,
    fallback: Symbol,
    table: Box<dyn TransitionTable>,
}

impl NGramModel {
    /// Train on `train`; `None` if the training segment is empty
    pub fn train(train: &[Symbol], alphabet: u32, order: usize) -> Option<Self> {
        let fallback = mode_of(train)?;
        let mut table = table_for(alphabet, order);

        if order >= 1 && train.len() > order {
            for window in train.windows(order + 1) {
                let context = encode_context(&window[..order], alphabet);
                table.observe(context, window[order]);
            }
        }

        Some(Self {
            order,
            alphabet,
            fallback,
            table,
        })
    }

    pub fn order(&self) -> usize {
        self.order
    }

    /// Most frequent training symbol
    pub fn fallback(&self) -> Symbol {
        self.fallback
    }

    /// Number of distinct contexts observed during training
    pub fn contexts_seen(&self) -> usize {
        self.table.contexts_seen()
    }

    /// Predict the symbol following `context` (last `order` symbols)
    pub fn predict(&self, context: &[Symbol]) -> Symbol {
        self.table
            .predict(encode_context(context, self.alphabet))
            .unwrap_or(self.fallback)
    }
}

/// Number of training symbols for a sequence of length `len` and a given order
///
/// 80% of the sequence, or `max(order + 1, 70%)` capped at `len - 1` when the
/// 80% split is too short to hold one full context plus successor.
pub fn split_point(len: usize, order: usize) -> usize {
    let train = (len as f64 * TRAIN_FRACTION) as usize;
    if train >= order + 1 {
        return train;
    }
    let fallback = (order + 1).max((len as f64 * FALLBACK_TRAIN_FRACTION) as usize);
    fallback.min(len.saturating_sub(1))
}

/// Held-out accuracy of an order-n predictor over `seq`
///
/// Order 1 always predicts the most frequent training symbol. Higher orders
/// slide an n-symbol window over the held-out segment only, falling back to
/// the most frequent training symbol for contexts unseen in training.
///
/// # Example
/// ```
/// use digit_probe::sequence::{ngram_accuracy, SymbolSequence};
///
/// let ramp: Vec<u32> = (0..1000).map(|i| i % 10).collect();
/// let seq = SymbolSequence::digits(ramp).unwrap();
///
/// assert_eq!(ngram_accuracy(&seq, 2).accuracy, Some(1.0));
/// ```
pub fn ngram_accuracy(seq: &SymbolSequence, order: usize) -> NGramAccuracy {
    let symbols = seq.symbols();
    let len = symbols.len();
    let undefined = |train_len: usize| NGramAccuracy {
        order,
        train_len,
        test_len: len - train_len,
        predictions: 0,
        correct: 0,
        accuracy: None,
    };

    if len < MIN_LEN || order == 0 {
        return undefined(0);
    }

    let train_len = split_point(len, order);
    let (train, test) = symbols.split_at(train_len);

    let (predictions, correct, contexts) = if order == 1 {
        // order 1 only ever predicts the training mode
        let Some(top) = mode_of(train) else {
            return undefined(train_len);
        };
        (test.len(), test.iter().filter(|&&s| s == top).count(), 0)
    } else {
        let Some(model) = NGramModel::train(train, seq.alphabet(), order) else {
            return undefined(train_len);
        };
        let (predictions, correct) = if test.len() > order {
            let correct = test
                .windows(order + 1)
                .filter(|w| model.predict(&w[..order]) == w[order])
                .count();
            (test.len() - order, correct)
        } else {
            (0, 0)
        };
        (predictions, correct, model.contexts_seen())
    };

    tracing::debug!(
        order,
        train_len,
        test_len = test.len(),
        contexts,
        predictions,
        correct,
        "n-gram evaluation"
    );

    NGramAccuracy {
        order,
        train_len,
        test_len: test.len(),
        predictions,
        correct,
        accuracy: (predictions > 0).then(|| correct as f64 / predictions as f64),
    }
}

/// Run the n-gram predictor for every order in `orders`
pub fn ngram_probe(seq: &SymbolSequence, orders: &[usize]) -> NGramResult {
    NGramResult {
        chance: 1.0 / seq.alphabet() as f64,
        orders: orders.iter().map(|&n| ngram_accuracy(seq, n)).collect(),
    }
}

/// Most frequent symbol, smallest on ties
fn mode_of(symbols: &[Symbol]) -> Option<Symbol> {
    if symbols.is_empty() {
        return None;
    }
    let mut counts = fnv::FnvHashMap::<Symbol, u32>::default();
    for &s in symbols {
        *counts.entry(s).or_insert(0) += 1;
    }
    super::table::argmax(counts.into_iter())
}
