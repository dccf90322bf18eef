//! # Accessibility Module
//!
//! Read interface over precomputed accessibility data of a single sequence.
//!
//! An accessibility provider reports the energy penalty (ED) for keeping a
//! region unpaired, the ensemble energy (ES) of intramolecular structures
//! within a region, and the positional constraints that exclude positions from
//! interacting. Profiles are computed elsewhere; the providers here only hold
//! or derive them.
//!
//! - [`constraint`] - blocked and forced-accessible positions
//! - [`disabled`] - a provider without accessibility penalties
//! - [`tabulated`] - a provider backed by precomputed ED/ES tables
//! - [`reverse`] - a 3'->5' view of another provider used for the second sequence

pub mod constraint;
pub mod disabled;
pub mod reverse;
pub mod tabulated;

use crate::core::energy::{E_INF, Energy};
use crate::core::models::sequence::RnaSequence;
use crate::core::range::{IndexRange, RangeError};
use constraint::AccessibilityConstraint;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AccessibilityError {
    #[error("Constraint range {range} exceeds the sequence length {length}")]
    ConstraintOutOfBounds { range: IndexRange, length: usize },

    #[error("Constraint for length {constraint} does not match sequence length {sequence}")]
    LengthMismatch { constraint: usize, sequence: usize },

    #[error("Energy table of shape {rows}x{cols} does not match sequence length {length}")]
    Shape {
        rows: usize,
        cols: usize,
        length: usize,
    },

    #[error("Region {from}-{to} is not a valid region of a sequence of length {length}")]
    InvalidRegion {
        from: usize,
        to: usize,
        length: usize,
    },

    #[error("Invalid constraint encoding: {0}")]
    Range(#[from] RangeError),

    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV parsing error for '{path}': {source}")]
    Csv { path: String, source: csv::Error },
}

/// Accessibility data of one sequence.
///
/// Regions `[from, to]` are inclusive and must satisfy `from <= to < len`.
pub trait Accessibility: Send + Sync {
    fn sequence(&self) -> &RnaSequence;

    fn constraint(&self) -> &AccessibilityConstraint;

    /// Energy penalty for making the region `[from, to]` accessible, or
    /// [`E_INF`] if the region cannot be made accessible.
    fn ed(&self, from: usize, to: usize) -> Energy;

    /// Ensemble energy of the intramolecular structures within `[from, to]`,
    /// assuming the region is embedded in a multiloop. [`E_INF`] if no
    /// structure can form or no such data is available.
    fn es(&self, from: usize, to: usize) -> Energy {
        let _ = (from, to);
        E_INF
    }
}
