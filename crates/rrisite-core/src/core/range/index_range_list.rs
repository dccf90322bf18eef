use super::index_range::{IndexRange, RangeError};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A sorted list of non-overlapping [`IndexRange`]s.
///
/// Used to mark blocked (or forced accessible) positions of a sequence and to
/// answer membership queries while pruning the search space. Every mutating
/// operation validates that the ranges stay ascending and disjoint; ranges are
/// never merged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct IndexRangeList {
    ranges: Vec<IndexRange>,
}

impl IndexRangeList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            ranges: Vec::with_capacity(capacity),
        }
    }

    /// Checks whether any stored range contains `index`.
    pub fn covers(&self, index: usize) -> bool {
        // first range starting behind index
        let next = self.ranges.partition_point(|r| r.from <= index);
        match next.checked_sub(1) {
            Some(preceding) => index <= self.ranges[preceding].to,
            None => false,
        }
    }

    /// Checks whether any stored range shares at least one index with `range`.
    pub fn overlaps(&self, range: &IndexRange) -> bool {
        let next = self.ranges.partition_point(|r| r.from <= range.to);
        match next.checked_sub(1) {
            Some(preceding) => self.ranges[preceding].to >= range.from,
            None => false,
        }
    }

    pub(crate) fn from_sorted_unchecked(ranges: Vec<IndexRange>) -> Self {
        debug_assert!(
            ranges
                .windows(2)
                .all(|pair| pair[0].is_ascending() && pair[0].to < pair[1].from)
        );
        Self { ranges }
    }

    /// Appends a range that starts behind the last stored range.
    ///
    /// # Errors
    ///
    /// Returns [`RangeError::Descending`] for a range with `from > to` and
    /// [`RangeError::OrderViolation`] if the range does not start strictly
    /// after the end of the last stored range.
    pub fn push_back(&mut self, range: IndexRange) -> Result<(), RangeError> {
        if !range.is_ascending() {
            return Err(RangeError::Descending(range));
        }
        if let Some(last) = self.ranges.last() {
            if last.to >= range.from {
                return Err(RangeError::OrderViolation { range, last: *last });
            }
        }
        self.ranges.push(range);
        Ok(())
    }

    /// Inserts a range at its sorted position and returns that position.
    ///
    /// # Errors
    ///
    /// Returns [`RangeError::Descending`] for a range with `from > to` and
    /// [`RangeError::Overlap`] if the range overlaps a stored neighbor.
    pub fn insert(&mut self, range: IndexRange) -> Result<usize, RangeError> {
        if !range.is_ascending() {
            return Err(RangeError::Descending(range));
        }
        let position = self.ranges.partition_point(|r| *r <= range);

        if let Some(stored) = position.checked_sub(1).map(|p| self.ranges[p]) {
            if stored.to >= range.from {
                return Err(RangeError::Overlap { range, stored });
            }
        }
        if let Some(stored) = self.ranges.get(position).copied() {
            if range.to >= stored.from {
                return Err(RangeError::Overlap { range, stored });
            }
        }

        self.ranges.insert(position, range);
        Ok(position)
    }

    /// Removes the range at `position` and returns it.
    ///
    /// # Panics
    ///
    /// Panics if `position` is out of bounds.
    pub fn erase(&mut self, position: usize) -> IndexRange {
        self.ranges.remove(position)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, IndexRange> {
        self.ranges.iter()
    }

    pub fn as_slice(&self) -> &[IndexRange] {
        &self.ranges
    }

    pub fn first(&self) -> Option<&IndexRange> {
        self.ranges.first()
    }

    pub fn last(&self) -> Option<&IndexRange> {
        self.ranges.last()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn clear(&mut self) {
        self.ranges.clear();
    }

    /// Shifts all ranges by `shift`; ranges falling completely below 0 are
    /// dropped.
    pub fn shifted(&self, shift: isize) -> Self {
        let ranges = self
            .ranges
            .iter()
            .map(|r| r.shifted(shift))
            .filter(|r| *r != IndexRange::na())
            .collect();
        Self { ranges }
    }
}

impl<'a> IntoIterator for &'a IndexRangeList {
    type Item = &'a IndexRange;
    type IntoIter = std::slice::Iter<'a, IndexRange>;

    fn into_iter(self) -> Self::IntoIter {
        self.ranges.iter()
    }
}

impl TryFrom<Vec<IndexRange>> for IndexRangeList {
    type Error = RangeError;

    fn try_from(ranges: Vec<IndexRange>) -> Result<Self, Self::Error> {
        let mut list = Self::with_capacity(ranges.len());
        for range in ranges {
            list.insert(range)?;
        }
        Ok(list)
    }
}

impl fmt::Display for IndexRangeList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, range) in self.ranges.iter().enumerate() {
            if idx > 0 {
                f.write_str(",")?;
            }
            write!(f, "{range}")?;
        }
        Ok(())
    }
}

impl FromStr for IndexRangeList {
    type Err = RangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut list = Self::new();
        if s.is_empty() {
            return Ok(list);
        }
        for encoded in s.split(',') {
            list.insert(encoded.parse()?)?;
        }
        Ok(list)
    }
}

impl Serialize for IndexRangeList {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for IndexRangeList {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        encoded.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list_of(ranges: &[(usize, usize)]) -> IndexRangeList {
        let mut list = IndexRangeList::new();
        for &(from, to) in ranges {
            list.push_back(IndexRange::new(from, to)).unwrap();
        }
        list
    }

    #[test]
    fn covers_returns_false_for_empty_list() {
        let list = IndexRangeList::new();
        assert!(!list.covers(0));
        assert!(!list.covers(42));
    }

    #[test]
    fn covers_matches_inclusive_bounds_of_stored_ranges() {
        let list = list_of(&[(2, 4), (7, 7), (10, 15)]);
        let expected: Vec<usize> = vec![2, 3, 4, 7, 10, 11, 12, 13, 14, 15];
        for index in 0..20 {
            assert_eq!(
                list.covers(index),
                expected.contains(&index),
                "wrong coverage for {index}"
            );
        }
    }

    #[test]
    fn overlaps_detects_any_shared_index() {
        let list = list_of(&[(2, 4), (10, 15)]);
        assert!(list.overlaps(&IndexRange::new(0, 2)));
        assert!(list.overlaps(&IndexRange::new(4, 9)));
        assert!(list.overlaps(&IndexRange::new(11, 12)));
        assert!(list.overlaps(&IndexRange::new(0, 100)));
        assert!(!list.overlaps(&IndexRange::new(5, 9)));
        assert!(!list.overlaps(&IndexRange::new(16, 20)));
        assert!(!IndexRangeList::new().overlaps(&IndexRange::new(0, 100)));
    }

    #[test]
    fn push_back_rejects_descending_range() {
        let mut list = IndexRangeList::new();
        assert_eq!(
            list.push_back(IndexRange::new(5, 2)),
            Err(RangeError::Descending(IndexRange::new(5, 2)))
        );
        assert!(list.is_empty());
    }

    #[test]
    fn push_back_rejects_range_that_does_not_follow_last_range() {
        let mut list = list_of(&[(2, 4)]);
        for range in [IndexRange::new(0, 1), IndexRange::new(4, 6), IndexRange::new(3, 9)] {
            assert_eq!(
                list.push_back(range),
                Err(RangeError::OrderViolation {
                    range,
                    last: IndexRange::new(2, 4)
                })
            );
        }
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn insert_keeps_ranges_sorted_and_returns_position() {
        let mut list = IndexRangeList::new();
        assert_eq!(list.insert(IndexRange::new(10, 12)), Ok(0));
        assert_eq!(list.insert(IndexRange::new(1, 3)), Ok(0));
        assert_eq!(list.insert(IndexRange::new(20, 20)), Ok(2));
        assert_eq!(list.insert(IndexRange::new(5, 8)), Ok(1));
        assert_eq!(
            list.as_slice(),
            &[
                IndexRange::new(1, 3),
                IndexRange::new(5, 8),
                IndexRange::new(10, 12),
                IndexRange::new(20, 20),
            ]
        );
    }

    #[test]
    fn insert_rejects_overlap_with_either_neighbor() {
        let mut list = list_of(&[(5, 8), (12, 14)]);
        assert_eq!(
            list.insert(IndexRange::new(8, 10)),
            Err(RangeError::Overlap {
                range: IndexRange::new(8, 10),
                stored: IndexRange::new(5, 8)
            })
        );
        assert_eq!(
            list.insert(IndexRange::new(10, 12)),
            Err(RangeError::Overlap {
                range: IndexRange::new(10, 12),
                stored: IndexRange::new(12, 14)
            })
        );
        assert_eq!(
            list.insert(IndexRange::new(5, 8)),
            Err(RangeError::Overlap {
                range: IndexRange::new(5, 8),
                stored: IndexRange::new(5, 8)
            })
        );
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn erase_removes_range_and_updates_coverage() {
        let mut list = list_of(&[(1, 2), (5, 6)]);
        assert_eq!(list.erase(0), IndexRange::new(1, 2));
        assert!(!list.covers(1));
        assert!(list.covers(6));
        list.clear();
        assert!(list.is_empty());
    }

    #[test]
    fn iteration_is_ascending() {
        let list: IndexRangeList = "30-31,0-4,10-12".parse().unwrap();
        let starts: Vec<usize> = list.iter().map(|r| r.from).collect();
        assert_eq!(starts, vec![0, 10, 30]);
        assert_eq!((&list).into_iter().count(), 3);
        assert_eq!(list.first(), Some(&IndexRange::new(0, 4)));
        assert_eq!(list.last(), Some(&IndexRange::new(30, 31)));
    }

    #[test]
    fn text_encoding_round_trips() {
        let list: IndexRangeList = "0-4,10-12,30-31".parse().unwrap();
        assert_eq!(list.to_string(), "0-4,10-12,30-31");
        assert_eq!("".parse::<IndexRangeList>().unwrap(), IndexRangeList::new());
        assert!("0-4,".parse::<IndexRangeList>().is_err());
        assert!("0-4,3-5".parse::<IndexRangeList>().is_err());
    }

    #[test]
    fn try_from_vector_sorts_input() {
        let list =
            IndexRangeList::try_from(vec![IndexRange::new(9, 9), IndexRange::new(1, 2)]).unwrap();
        assert_eq!(list.to_string(), "1-2,9-9");
    }

    #[test]
    fn shifted_drops_ranges_below_zero() {
        let list = list_of(&[(1, 2), (5, 9)]);
        assert_eq!(list.shifted(-4).to_string(), "1-5");
        assert_eq!(list.shifted(3).to_string(), "4-5,8-12");
    }
}
