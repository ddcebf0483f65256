//! # Tandemsort
//!
//! `tandemsort` is an in-place sorting and searching library built around a
//! per-type comparison-strategy dispatch: each key type resolves, on first
//! use, to either its **natural order** (a specialized path with no
//! comparison indirection) or an **externally supplied ordering function**,
//! and the resolved strategy is cached for the lifetime of the process.
//!
//! On top of that dispatch it provides three operations:
//!
//! - **Sort**: an unstable introspective sort: quicksort with a
//!   median-of-three pivot, heapsort once a recursion-depth budget is
//!   exhausted, insertion sort for small partitions. *O*(*n* log *n*)
//!   worst case, allocation-free.
//! - **Paired sort**: the same algorithm over a key sequence and an
//!   equal-length value sequence of unrelated type, permuted in lockstep so
//!   `keys[i]` keeps its `values[i]`.
//! - **Binary search**: bisection over a sorted sub-range, with misses
//!   encoded as `-(insertion_point + 1)`.
//!
//! ## Usage
//!
//! ### Natural order
//!
//! ```
//! let mut v = [5, 3, 1, 4, 2];
//! tandemsort::sort(&mut v).unwrap();
//! assert_eq!(v, [1, 2, 3, 4, 5]);
//! ```
//!
//! ### Paired key/value sort
//!
//! ```
//! let mut keys = [3, 1, 2];
//! let mut values = ["c", "a", "b"];
//! tandemsort::sort_pairs(&mut keys, &mut values).unwrap();
//! assert_eq!(keys, [1, 2, 3]);
//! assert_eq!(values, ["a", "b", "c"]);
//! ```
//!
//! ### Custom key types
//!
//! Types implement [`SortKey`] to become sortable. [`Ord`] types opt in to a
//! natural order with one macro line; types without one still sort through
//! an ordering function, and fail lazily (at the first comparison) without
//! one:
//!
//! ```
//! use tandemsort::{natural_order_via_ord, SortKey, SortError};
//!
//! #[derive(PartialEq, Eq, PartialOrd, Ord)]
//! struct Id(u64);
//! natural_order_via_ord!(Id);
//!
//! struct Blob(Vec<u8>);
//! impl SortKey for Blob {} // no natural order
//!
//! let mut ids = [Id(2), Id(1)];
//! tandemsort::sort(&mut ids).unwrap();
//!
//! let mut blobs = [Blob(vec![2]), Blob(vec![1])];
//! assert!(matches!(
//!     tandemsort::sort(&mut blobs),
//!     Err(SortError::OrderingUnavailable { .. })
//! ));
//! tandemsort::sort_by(&mut blobs, |a, b| a.0.cmp(&b.0)).unwrap();
//! ```
//!
//! ## Failure behavior
//!
//! All entry points return a `Result` with a typed [`SortError`]. Errors raised
//! before any mutation ([`SortError::LengthMismatch`],
//! [`SortError::IndexRangeInvalid`], [`SortError::BadOrderingFunction`])
//! leave the input untouched; a comparison failure mid-sort leaves the
//! sequence a permutation of the input, with nothing lost or duplicated.

pub mod algo;
pub mod core;
pub mod dispatch;
pub mod search;

pub use crate::algo::{
    sort, sort_by, sort_by_erased, sort_pairs, sort_pairs_by, sort_pairs_with,
    sort_pairs_with_comparator, sort_with, sort_with_comparator,
};
pub use crate::core::{Comparator, ExternalOrder, NaturalOrder, SortError, SortKey, Strategy};
pub use crate::dispatch::{CompareFn, comparer_for};
pub use crate::search::{
    binary_search, binary_search_by, binary_search_with, binary_search_with_comparator,
};

/// Convenience re-exports of the whole public API.
pub mod prelude {
    pub use crate::algo::{
        sort, sort_by, sort_by_erased, sort_pairs, sort_pairs_by, sort_pairs_with,
        sort_pairs_with_comparator, sort_with, sort_with_comparator,
    };
    pub use crate::core::{
        Comparator, ExternalOrder, NaturalOrder, SortError, SortKey, Strategy,
    };
    pub use crate::dispatch::{CompareFn, comparer_for};
    pub use crate::search::{
        binary_search, binary_search_by, binary_search_with, binary_search_with_comparator,
    };
}
