// Symbol sequences and n-gram sequence prediction
//
// A SymbolSequence is the single input contract of the probe engine: an
// ordered run of integers in [0, M) together with the alphabet size M.
// Out-of-range values are rejected here; folding raw integers into the
// alphabet is the job of the input adapters (see `crate::input`).
//
// The n-gram submodule answers a different question from the distribution
// probes: not "how often does each symbol occur" but "can the next symbol be
// predicted from the few that precede it".

mod ngram;
mod table;

pub use ngram::{ngram_accuracy, ngram_probe, split_point, NGramAccuracy, NGramModel, NGramResult};

use crate::error::{ProbeError, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// One element of an analyzed sequence
pub type Symbol = u32;

/// How the sequence was ingested; fixes the canonical byte encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SequenceMode {
    /// Decimal digits, encoded as ASCII with no separators
    #[default]
    Digits,
    /// Bounded integers, encoded as decimal text with one value per line
    Integers,
}

impl std::fmt::Display for SequenceMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SequenceMode::Digits => write!(f, "digits"),
            SequenceMode::Integers => write!(f, "integers"),
        }
    }
}

/// Immutable ordered sequence of symbols in `[0, alphabet)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolSequence {
    symbols: Vec<Symbol>,
    alphabet: u32,
    mode: SequenceMode,
}

impl SymbolSequence {
    /// Build a sequence, validating the alphabet and every symbol
    ///
    /// # Errors
    /// - `InvalidAlphabet` when `alphabet == 0`
    /// - `DigitAlphabetTooLarge` for digits mode with more than 10 symbols
    /// - `SymbolOutOfRange` for the first symbol `>= alphabet`
    pub fn new(symbols: Vec<Symbol>, alphabet: u32, mode: SequenceMode) -> Result<Self> {
        if alphabet == 0 {
            return Err(ProbeError::InvalidAlphabet(alphabet));
        }
        if mode == SequenceMode::Digits && alphabet > 10 {
            return Err(ProbeError::DigitAlphabetTooLarge(alphabet));
        }
        if let Some(index) = symbols.iter().position(|&s| s >= alphabet) {
            return Err(ProbeError::SymbolOutOfRange {
                index,
                value: symbols[index],
                alphabet,
            });
        }

        Ok(Self {
            symbols,
            alphabet,
            mode,
        })
    }

    /// Decimal digit sequence (alphabet 10)
    ///
    /// # Example
    /// ```
    /// use digit_probe::sequence::SymbolSequence;
    ///
    /// let seq = SymbolSequence::digits(vec![3, 1, 4, 1, 5]).unwrap();
    /// assert_eq!(seq.len(), 5);
    /// assert_eq!(seq.alphabet(), 10);
    /// ```
    pub fn digits(symbols: Vec<Symbol>) -> Result<Self> {
        Self::new(symbols, 10, SequenceMode::Digits)
    }

    /// Integer sequence over an explicit alphabet
    pub fn integers(symbols: Vec<Symbol>, alphabet: u32) -> Result<Self> {
        Self::new(symbols, alphabet, SequenceMode::Integers)
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn alphabet(&self) -> u32 {
        self.alphabet
    }

    pub fn mode(&self) -> SequenceMode {
        self.mode
    }

    /// Keep only the first `n` symbols
    pub fn truncated(mut self, n: usize) -> Self {
        self.symbols.truncate(n);
        self
    }

    /// Canonical byte encoding used by the compression probe and the digest
    ///
    /// Digits: ASCII digits, no separators. Integers: each value followed by `\n`.
    pub fn encode(&self) -> Vec<u8> {
        match self.mode {
            SequenceMode::Digits => self.symbols.iter().map(|&s| b'0' + s as u8).collect(),
            SequenceMode::Integers => {
                let mut out = Vec::with_capacity(self.symbols.len() * 4);
                for s in &self.symbols {
                    out.extend_from_slice(s.to_string().as_bytes());
                    out.push(b'\n');
                }
                out
            }
        }
    }

    /// SHA-256 (hex) of the canonical encoding, used to match a baseline by content
    pub fn digest(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.mode.to_string().as_bytes());
        hasher.update(self.alphabet.to_le_bytes());
        hasher.update(self.encode());
        hex::encode(hasher.finalize())
    }
}
