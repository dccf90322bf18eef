//! Index intervals over sequence positions.
//!
//! [`IndexRange`] is an inclusive `[from, to]` interval with a `"<from>-<to>"`
//! text encoding; [`IndexRangeList`] keeps a sorted set of disjoint ranges and
//! answers coverage queries by binary search.

mod index_range;
mod index_range_list;

pub use index_range::{IndexRange, RangeError};
pub use index_range_list::IndexRangeList;
