//! The search engine: binary search over a sorted sub-range.
//!
//! The return convention is shared with the paired sort's surrounding
//! library heritage: a non-negative result is the index of a matching
//! element, and a negative result encodes the insertion point as
//! `-(insertion_point + 1)`, so "not found" decodes by sign alone.

use crate::core::{Comparator, SortError, SortKey, Strategy};
use crate::dispatch;
use std::cmp::Ordering;

/// Binary-searches `keys[index..index + length]` for `target` through the
/// keys' natural order.
///
/// The range must already be sorted ascending under the same order; that
/// precondition is the caller's and is not checked (violating it yields an
/// unspecified, non-crashing result). The range bounds themselves *are*
/// checked, failing with [`SortError::IndexRangeInvalid`] before any element
/// is inspected.
///
/// Returns the index of a matching element (any one of them, if several
/// compare equal), or `-(insertion_point + 1)` where `insertion_point` is the
/// index at which inserting `target` keeps the range sorted.
///
/// # Examples
///
/// ```
/// let v = [1, 3, 5, 7, 9];
///
/// assert_eq!(tandemsort::binary_search(&v, 0, v.len(), &5).unwrap(), 2);
///
/// let miss = tandemsort::binary_search(&v, 0, v.len(), &4).unwrap();
/// assert!(miss < 0);
/// assert_eq!(-(miss + 1), 2); // 4 would be inserted at index 2
/// ```
pub fn binary_search<K: SortKey>(
    keys: &[K],
    index: usize,
    length: usize,
    target: &K,
) -> Result<isize, SortError> {
    check_range(keys, index, length)?;
    let mut cmp = dispatch::natural_strategy::<K>();
    bisect(keys, index, length, target, &mut cmp)
}

/// Binary search through a caller-supplied total order.
///
/// The range must be sorted ascending under the *same* function.
pub fn binary_search_by<K, F>(
    keys: &[K],
    index: usize,
    length: usize,
    target: &K,
    compare: F,
) -> Result<isize, SortError>
where
    F: FnMut(&K, &K) -> Ordering,
{
    check_range(keys, index, length)?;
    let mut cmp = dispatch::external_strategy::<K, F>(compare);
    bisect(keys, index, length, target, &mut cmp)
}

/// Binary search under a [`Strategy`] chosen at run time.
pub fn binary_search_with<K: SortKey>(
    keys: &[K],
    index: usize,
    length: usize,
    target: &K,
    strategy: Strategy<'_, K>,
) -> Result<isize, SortError> {
    match strategy {
        Strategy::Natural => binary_search(keys, index, length, target),
        Strategy::External(compare) => binary_search_by(keys, index, length, target, compare),
    }
}

/// Binary search through an explicitly injected [`Comparator`].
///
/// The range must be sorted ascending under the same comparator.
pub fn binary_search_with_comparator<K, C>(
    keys: &[K],
    index: usize,
    length: usize,
    target: &K,
    cmp: &mut C,
) -> Result<isize, SortError>
where
    C: Comparator<K>,
{
    check_range(keys, index, length)?;
    bisect(keys, index, length, target, cmp)
}

fn check_range<K>(keys: &[K], index: usize, length: usize) -> Result<(), SortError> {
    match index.checked_add(length) {
        Some(end) if end <= keys.len() => Ok(()),
        _ => Err(SortError::IndexRangeInvalid {
            index,
            length,
            available: keys.len(),
        }),
    }
}

/// Classic bisection over the half-open range `[lo, hi)`.
fn bisect<K, C>(
    keys: &[K],
    index: usize,
    length: usize,
    target: &K,
    cmp: &mut C,
) -> Result<isize, SortError>
where
    C: Comparator<K>,
{
    let mut lo = index;
    let mut hi = index + length;

    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        match cmp.compare(&keys[mid], target)? {
            Ordering::Less => lo = mid + 1,
            Ordering::Greater => hi = mid,
            Ordering::Equal => return Ok(mid as isize),
        }
    }

    Ok(-((lo as isize) + 1))
}
