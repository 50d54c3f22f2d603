//! Error types for the probe engine
//!
//! Only structurally invalid input is an error. Sequences that are too short
//! for a probe produce undefined (`None`) metrics instead.

use crate::sequence::Symbol;
use thiserror::Error;

/// Errors raised by the probe engine and its input adapters
#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("Invalid alphabet: size must be >= 1, got {0}")]
    InvalidAlphabet(u32),

    #[error("Symbol {value} at index {index} is outside alphabet [0, {alphabet})")]
    SymbolOutOfRange {
        index: usize,
        value: Symbol,
        alphabet: u32,
    },

    #[error("Digits mode supports at most 10 symbols, got alphabet {0}")]
    DigitAlphabetTooLarge(u32),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Incompatible baseline: {0}")]
    IncompatibleBaseline(String),

    #[error("Malformed report: {0}")]
    MalformedReport(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ProbeError>;
