//! Input adapters: text to symbol sequences
//!
//! Digit files may contain anything (HTML, line breaks, a leading "3.");
//! only ASCII digits are kept, and bytes that are not valid UTF-8 are
//! ignored like any other noise. Integer files carry one value per line and
//! are folded into the alphabet with a Euclidean remainder.

use crate::error::{ProbeError, Result};
use crate::sequence::{Symbol, SymbolSequence};
use std::path::Path;

/// Every ASCII digit in `text`, in order
pub fn parse_digits(text: &str) -> Vec<Symbol> {
    parse_digit_bytes(text.as_bytes())
}

/// Every ASCII digit in raw bytes, in order; other bytes need not be UTF-8
pub fn parse_digit_bytes(bytes: &[u8]) -> Vec<Symbol> {
    bytes
        .iter()
        .filter(|b| b.is_ascii_digit())
        .map(|&b| (b - b'0') as Symbol)
        .collect()
}

/// One integer per line; blank and unparseable lines are skipped
pub fn parse_integers(text: &str) -> Vec<i64> {
    let mut skipped = 0usize;
    let values: Vec<i64> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(|line| match line.parse::<i64>() {
            Ok(v) => Some(v),
            Err(_) => {
                skipped += 1;
                None
            }
        })
        .collect();

    if skipped > 0 {
        tracing::debug!(skipped, "ignored unparseable integer lines");
    }
    values
}

/// Map raw integers into `[0, alphabet)`; also returns the largest raw value
///
/// # Errors
/// `InvalidAlphabet` when `alphabet == 0`
pub fn reduce_modulo(values: &[i64], alphabet: u32) -> Result<(Vec<Symbol>, Option<i64>)> {
    if alphabet == 0 {
        return Err(ProbeError::InvalidAlphabet(alphabet));
    }
    let m = alphabet as i64;
    let symbols = values.iter().map(|v| v.rem_euclid(m) as Symbol).collect();
    Ok((symbols, values.iter().copied().max()))
}

fn apply_limit<T>(mut values: Vec<T>, limit: Option<usize>) -> Vec<T> {
    if let Some(n) = limit {
        values.truncate(n);
    }
    values
}

/// Read a digit file, keeping at most `limit` digits
pub fn read_digits_file<P: AsRef<Path>>(path: P, limit: Option<usize>) -> Result<SymbolSequence> {
    let bytes = std::fs::read(path)?;
    SymbolSequence::digits(apply_limit(parse_digit_bytes(&bytes), limit))
}

/// Read an integer file, keeping at most `limit` values, reduced modulo `alphabet`
///
/// Returns the sequence and the largest raw value before reduction.
pub fn read_integers_file<P: AsRef<Path>>(
    path: P,
    alphabet: u32,
    limit: Option<usize>,
) -> Result<(SymbolSequence, Option<i64>)> {
    let bytes = std::fs::read(path)?;
    let values = apply_limit(parse_integers(&String::from_utf8_lossy(&bytes)), limit);
    let (symbols, max_observed) = reduce_modulo(&values, alphabet)?;
    Ok((SymbolSequence::integers(symbols, alphabet)?, max_observed))
}
