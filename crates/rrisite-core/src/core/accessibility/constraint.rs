use super::AccessibilityError;
use crate::core::range::{IndexRange, IndexRangeList};

/// Positional constraints of a sequence: blocked positions must not take
/// part in any interaction, positions marked accessible are forced unpaired
/// in intramolecular structures.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccessibilityConstraint {
    length: usize,
    blocked: IndexRangeList,
    accessible: IndexRangeList,
}

impl AccessibilityConstraint {
    /// An empty constraint for a sequence of the given length.
    pub fn new(length: usize) -> Self {
        Self {
            length,
            ..Default::default()
        }
    }

    pub fn with_ranges(
        length: usize,
        blocked: IndexRangeList,
        accessible: IndexRangeList,
    ) -> Result<Self, AccessibilityError> {
        for range in blocked.iter().chain(accessible.iter()) {
            if range.to >= length {
                return Err(AccessibilityError::ConstraintOutOfBounds {
                    range: *range,
                    length,
                });
            }
        }
        Ok(Self {
            length,
            blocked,
            accessible,
        })
    }

    /// Parses blocked and accessible ranges from their list encodings
    /// (e.g. `"0-4,10-12"`).
    pub fn from_encoding(
        length: usize,
        blocked: &str,
        accessible: &str,
    ) -> Result<Self, AccessibilityError> {
        Self::with_ranges(length, blocked.parse()?, accessible.parse()?)
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn blocked(&self) -> &IndexRangeList {
        &self.blocked
    }

    pub fn accessible(&self) -> &IndexRangeList {
        &self.accessible
    }

    pub fn is_empty(&self) -> bool {
        self.blocked.is_empty() && self.accessible.is_empty()
    }

    /// Whether position `i` may take part in an interaction.
    #[inline]
    pub fn is_accessible(&self, i: usize) -> bool {
        !self.blocked.covers(i)
    }

    #[inline]
    pub fn is_blocked(&self, i: usize) -> bool {
        self.blocked.covers(i)
    }

    #[inline]
    pub fn is_marked_accessible(&self, i: usize) -> bool {
        self.accessible.covers(i)
    }

    #[inline]
    pub fn is_unconstrained(&self, i: usize) -> bool {
        !self.blocked.covers(i) && !self.accessible.covers(i)
    }

    /// Whether the region `[from, to]` contains a blocked position.
    pub fn has_blocked_in(&self, from: usize, to: usize) -> bool {
        self.blocked.overlaps(&IndexRange::new(from, to))
    }

    /// The same constraint for the sequence read from 3' to 5'.
    pub fn reversed(&self) -> Self {
        Self {
            length: self.length,
            blocked: self.mirror(&self.blocked),
            accessible: self.mirror(&self.accessible),
        }
    }

    fn mirror(&self, list: &IndexRangeList) -> IndexRangeList {
        let last = self.length.saturating_sub(1);
        let ranges = list
            .iter()
            .rev()
            .map(|r| IndexRange::new(last - r.to, last - r.from))
            .collect();
        IndexRangeList::from_sorted_unchecked(ranges)
    }
}
