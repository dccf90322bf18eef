use itertools::Itertools;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::{Add, Sub};
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum RangeError {
    #[error("'{0}' is not a valid index range encoding. Expected '<from>-<to>' (e.g., '3-17').")]
    Format(String),

    #[error("Range {0} is descending")]
    Descending(IndexRange),

    #[error("Range {range} violates the list order given the last range {last}")]
    OrderViolation { range: IndexRange, last: IndexRange },

    #[error("Range {range} overlaps the stored range {stored}")]
    Overlap { range: IndexRange, stored: IndexRange },

    #[error("Cannot split range into windows: {0}")]
    Window(&'static str),
}

/// An inclusive index interval `[from, to]` within a sequence.
///
/// Ranges are ordered by their start and then by their end, which is the
/// order [`IndexRangeList`](super::IndexRangeList) keeps its entries in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IndexRange {
    pub from: usize,
    pub to: usize,
}

impl IndexRange {
    /// Placeholder for not-defined boundaries.
    pub const NA_INDEX: usize = usize::MAX;

    pub const fn new(from: usize, to: usize) -> Self {
        Self { from, to }
    }

    pub const fn na() -> Self {
        Self::new(Self::NA_INDEX, Self::NA_INDEX)
    }

    #[inline]
    pub fn is_ascending(&self) -> bool {
        self.from <= self.to
    }

    #[inline]
    pub fn is_descending(&self) -> bool {
        self.from >= self.to
    }

    #[inline]
    pub fn contains(&self, index: usize) -> bool {
        self.from <= index && index <= self.to
    }

    /// Number of covered indices of an ascending range.
    #[inline]
    pub fn width(&self) -> usize {
        self.to - self.from + 1
    }

    /// Cuts the range into windows of `width` positions that overlap by
    /// `overlap` positions. The last window is clipped to the end of the range.
    ///
    /// # Errors
    ///
    /// Returns [`RangeError::Window`] if the range is descending, if `width`
    /// does not exceed `overlap`, or if the range itself is not wider than
    /// `overlap`.
    pub fn overlapping_windows(
        &self,
        width: usize,
        overlap: usize,
    ) -> Result<Vec<IndexRange>, RangeError> {
        if width <= overlap {
            return Err(RangeError::Window(
                "the window width must be larger than the overlap width",
            ));
        }
        if !self.is_ascending() || self.to == Self::NA_INDEX {
            return Err(RangeError::Window("the range has to be ascending and defined"));
        }
        if self.width() <= overlap {
            return Err(RangeError::Window(
                "the range width must be larger than the overlap width",
            ));
        }

        let step = width - overlap;
        let expected = (self.to - self.from - overlap + 1).div_ceil(step);
        let mut windows = Vec::with_capacity(expected);

        let mut start = self.from;
        while start + overlap <= self.to {
            let window = IndexRange::new(start, start.saturating_add(width - 1).min(self.to));
            windows.push(window);
            start += step;
        }

        Ok(windows)
    }

    /// All combinations of the windows of `query` with the windows of
    /// `target`, query-major.
    pub fn range_pairs(
        query: &IndexRange,
        target: &IndexRange,
        width: usize,
        overlap: usize,
    ) -> Result<Vec<(IndexRange, IndexRange)>, RangeError> {
        let query_windows = query.overlapping_windows(width, overlap)?;
        let target_windows = target.overlapping_windows(width, overlap)?;
        Ok(query_windows
            .into_iter()
            .cartesian_product(target_windows)
            .collect())
    }

    /// Shifts the range by a signed amount, clamping the start at 0. A range
    /// that ends up completely below 0 becomes `NA_INDEX-NA_INDEX`.
    pub fn shifted(&self, shift: isize) -> Self {
        if shift >= 0 {
            let shift = shift.unsigned_abs();
            return Self::new(
                self.from.saturating_add(shift),
                self.to.saturating_add(shift),
            );
        }
        let shift = shift.unsigned_abs();
        if self.to < shift {
            return Self::na();
        }
        Self::new(self.from - self.from.min(shift), self.to - shift)
    }
}

impl Default for IndexRange {
    fn default() -> Self {
        Self::new(0, Self::NA_INDEX)
    }
}

impl Add<isize> for IndexRange {
    type Output = Self;

    fn add(self, shift: isize) -> Self::Output {
        self.shifted(shift)
    }
}

impl Sub<isize> for IndexRange {
    type Output = Self;

    fn sub(self, shift: isize) -> Self::Output {
        self.shifted(shift.checked_neg().unwrap_or(isize::MAX))
    }
}

impl fmt::Display for IndexRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.from, self.to)
    }
}

impl FromStr for IndexRange {
    type Err = RangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let format_error = || RangeError::Format(s.to_string());
        let (from, to) = s.split_once('-').ok_or_else(format_error)?;
        let is_number = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
        if !is_number(from) || !is_number(to) {
            return Err(format_error());
        }
        Ok(Self::new(
            from.parse().map_err(|_| format_error())?,
            to.parse().map_err(|_| format_error())?,
        ))
    }
}

impl Serialize for IndexRange {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for IndexRange {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        encoded.parse().map_err(serde::de::Error::custom)
    }
}
