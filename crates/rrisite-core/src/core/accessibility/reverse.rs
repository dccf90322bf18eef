use super::Accessibility;
use super::constraint::AccessibilityConstraint;
use crate::core::energy::Energy;
use crate::core::models::sequence::RnaSequence;

/// Reads another accessibility provider from the 3' to the 5' end.
///
/// The second sequence of an interaction is handled in this orientation so
/// that both sequences can be traversed with increasing indices.
#[derive(Debug)]
pub struct ReverseAccessibility<'a> {
    inner: &'a dyn Accessibility,
    sequence: RnaSequence,
    constraint: AccessibilityConstraint,
}

impl std::fmt::Debug for dyn Accessibility + '_ {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Accessibility")
            .field("sequence", &self.sequence().id())
            .finish_non_exhaustive()
    }
}

impl<'a> ReverseAccessibility<'a> {
    pub fn new(inner: &'a dyn Accessibility) -> Self {
        Self {
            inner,
            sequence: inner.sequence().reversed(),
            constraint: inner.constraint().reversed(),
        }
    }

    /// The provider in its original orientation.
    pub fn inner(&self) -> &'a dyn Accessibility {
        self.inner
    }

    /// Maps an index between the original and the reversed orientation. The
    /// mapping is its own inverse.
    #[inline]
    pub fn reversed_index(&self, i: usize) -> usize {
        self.sequence.len() - 1 - i
    }
}

impl Accessibility for ReverseAccessibility<'_> {
    fn sequence(&self) -> &RnaSequence {
        &self.sequence
    }

    fn constraint(&self) -> &AccessibilityConstraint {
        &self.constraint
    }

    #[inline]
    fn ed(&self, from: usize, to: usize) -> Energy {
        self.inner
            .ed(self.reversed_index(to), self.reversed_index(from))
    }

    fn es(&self, from: usize, to: usize) -> Energy {
        self.inner
            .es(self.reversed_index(to), self.reversed_index(from))
    }
}
