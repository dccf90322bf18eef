use crate::core::energy::{E_INF, Energy};
use crate::core::range::IndexRange;
use std::cmp::Ordering;

/// An intermolecular base pair given by the index within the first sequence
/// and the index within the second sequence (in its original 5'->3' reading).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BasePair {
    pub first: usize,
    pub second: usize,
}

impl BasePair {
    pub const fn new(first: usize, second: usize) -> Self {
        Self { first, second }
    }
}

impl From<(usize, usize)> for BasePair {
    fn from((first, second): (usize, usize)) -> Self {
        Self::new(first, second)
    }
}

/// A hybridization result: the intermolecular base pairs sorted along the
/// first sequence and the overall interaction energy.
#[derive(Debug, Clone, PartialEq)]
pub struct Interaction {
    pub base_pairs: Vec<BasePair>,
    pub energy: Energy,
}

impl Default for Interaction {
    fn default() -> Self {
        Self {
            base_pairs: Vec::new(),
            energy: E_INF,
        }
    }
}

impl Interaction {
    pub fn new(base_pairs: Vec<BasePair>, energy: Energy) -> Self {
        Self { base_pairs, energy }
    }

    pub fn is_empty(&self) -> bool {
        self.base_pairs.is_empty()
    }

    /// Checks that the interaction is non-empty and its base pairs are
    /// strictly increasing in the first and strictly decreasing in the second
    /// sequence.
    pub fn is_valid(&self) -> bool {
        !self.is_empty()
            && self
                .base_pairs
                .windows(2)
                .all(|bp| bp[0].first < bp[1].first && bp[0].second > bp[1].second)
    }

    pub fn add_base_pair(&mut self, bp: BasePair) {
        self.base_pairs.push(bp);
    }

    /// Default ranking: lower energy first, ties broken by the base pairs.
    pub fn less_than(a: &Interaction, b: &Interaction) -> bool {
        match a.energy.total_cmp(&b.energy) {
            Ordering::Less => true,
            Ordering::Greater => false,
            Ordering::Equal => a.base_pairs < b.base_pairs,
        }
    }
}

/// A pair of index ranges within both sequences with an associated energy,
/// e.g. the span of a seed or an interaction region.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InteractionRange {
    pub r1: IndexRange,
    pub r2: IndexRange,
    pub energy: Energy,
}

impl InteractionRange {
    pub fn new(r1: IndexRange, r2: IndexRange, energy: Energy) -> Self {
        Self { r1, r2, energy }
    }
}
