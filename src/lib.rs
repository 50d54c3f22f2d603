//! digit-probe - statistical and structural randomness probes
//!
//! This library analyzes finite sequences of decimal digits, or of
//! non-negative integers folded into a bounded alphabet, and flags departures
//! from "random-like" behaviour. Each probe (chi-square, parity runs, gaps,
//! autocorrelation, compression ratio, n-gram prediction, SchurProbe) runs
//! independently over an immutable [`sequence::SymbolSequence`]; the
//! [`report`] module aggregates them and scores reports against a baseline.
//!
//! ```
//! use digit_probe::config::ProbeConfig;
//! use digit_probe::report::{analyze, compare_reports, LabeledReport, PolicyKind, Severity};
//! use digit_probe::sequence::SymbolSequence;
//! use digit_probe::synth;
//!
//! let ramp = SymbolSequence::digits(synth::ramp(5_000, 10)).unwrap();
//! let report = analyze(&ramp, &ProbeConfig::quick()).unwrap();
//!
//! let comparison = compare_reports(
//!     &[LabeledReport::new("ramp", report)],
//!     None,
//!     PolicyKind::Normalized,
//! )
//! .unwrap();
//! assert_eq!(comparison.rows[0].severity, Severity::Red);
//! ```

pub mod cli;
pub mod config;
pub mod csv_output;
pub mod error;
pub mod input;
pub mod output;
pub mod probes;
pub mod report;
pub mod sequence;
pub mod synth;
