//! Statistical probes over a symbol sequence
//!
//! Each probe is a pure function of a [`SymbolSequence`](crate::sequence::SymbolSequence)
//! and returns its own result record. Metrics that cannot be computed for the
//! given input (too short, single parity class, constant window) are `None`;
//! they are never replaced by zero.
//!
//! The n-gram predictor lives in [`crate::sequence`] next to its transition tables.

mod autocorr;
mod compression;
mod distribution;
mod gaps;
mod runs;
mod schur;

pub use autocorr::{autocorr_probe, AutocorrResult, LagCorrelation};
pub use compression::{compression_probe, CompressionResult, COMPRESSION_LEVEL};
pub use distribution::{distribution_probe, DistributionResult};
pub use gaps::{gap_probe, GapResult, SymbolGaps};
pub use runs::{runs_probe, RunsResult};
pub use schur::{schur_probe, SchurResult, PARALLEL_MIN_WINDOW};
