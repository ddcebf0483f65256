//! The sort engine: introspective sort over one sequence or a key/value pair
//! of sequences.
//!
//! The algorithm is the classic hybrid: quicksort with a median-of-three
//! pivot, a recursion-depth budget that falls back to heapsort when
//! exhausted, and insertion sort for small partitions. It recurses into the
//! smaller partition first and iterates on the larger, bounding the stack at
//! O(log n) frames.
//!
//! Every comparison goes through a [`Comparator`], so the same bodies serve
//! the natural-order, external-order, and fallback strategies. All element
//! movement is swap-based: a comparison failure mid-sort leaves the sequence
//! a permutation of the input, with nothing lost or duplicated.
//!
//! The main entry points are [`sort`], [`sort_by`] and the paired
//! [`sort_pairs`]/[`sort_pairs_by`].

use crate::core::{Comparator, SortError, SortKey, Strategy};
use crate::dispatch;
use std::any::Any;
use std::cmp::Ordering;

/// Partitions at or below this length are insertion sorted.
///
/// A tuning parameter, not an invariant; correctness holds for any value >= 1.
pub(crate) const INSERTION_SORT_THRESHOLD: usize = 16;

/// Added to `floor(log2(n))` before doubling when computing the recursion
/// depth budget.
const DEPTH_BUDGET_SLACK: u32 = 1;

/// Recursion depth after which a partition switches to heapsort.
///
/// The binary OR by one eliminates the zero check in the logarithm.
fn depth_budget(len: usize) -> u32 {
    2 * ((len | 1).ilog2() + DEPTH_BUDGET_SLACK)
}

/// Sorts the slice in place through the keys' natural order.
///
/// The sort is not stable (equal keys may be reordered), allocation-free, and
/// *O*(*n* log *n*) worst case.
///
/// Key types without a natural order fail with
/// [`SortError::OrderingUnavailable`] at the first comparison attempt, so
/// slices of length 0 or 1 always succeed.
///
/// # Examples
///
/// ```
/// let mut v = [5, 3, 1, 4, 2];
/// tandemsort::sort(&mut v).unwrap();
/// assert_eq!(v, [1, 2, 3, 4, 5]);
/// ```
pub fn sort<K: SortKey>(keys: &mut [K]) -> Result<(), SortError> {
    let mut cmp = dispatch::natural_strategy::<K>();
    introsort(keys, &mut cmp)
}

/// Sorts the slice in place through a caller-supplied total order.
///
/// The supplied function overrides any natural order the key type has. It
/// must define a total order; an inconsistent function yields an unspecified
/// (but valid) permutation, never a crash.
///
/// # Examples
///
/// ```
/// let mut v = [1, 4, 2, 3];
/// tandemsort::sort_by(&mut v, |a, b| b.cmp(a)).unwrap();
/// assert_eq!(v, [4, 3, 2, 1]);
/// ```
pub fn sort_by<K, F>(keys: &mut [K], compare: F) -> Result<(), SortError>
where
    F: FnMut(&K, &K) -> Ordering,
{
    let mut cmp = dispatch::external_strategy::<K, F>(compare);
    introsort(keys, &mut cmp)
}

/// Sorts the slice under a [`Strategy`] chosen at run time.
///
/// `Strategy::Natural` behaves like [`sort`]; `Strategy::External` behaves
/// like [`sort_by`].
pub fn sort_with<K: SortKey>(keys: &mut [K], strategy: Strategy<'_, K>) -> Result<(), SortError> {
    match strategy {
        Strategy::Natural => sort(keys),
        Strategy::External(compare) => sort_by(keys, compare),
    }
}

/// Sorts the slice through a type-erased comparer.
///
/// The comparer must be a [`CompareFn<K>`](crate::CompareFn) stored behind
/// `dyn Any`; anything else is rejected with
/// [`SortError::BadOrderingFunction`] before the slice is touched.
pub fn sort_by_erased<K: 'static>(keys: &mut [K], comparer: &dyn Any) -> Result<(), SortError> {
    let compare = dispatch::comparer_for::<K>(comparer)?;
    sort_by(keys, compare)
}

/// Sorts `keys` in place through their natural order while permuting
/// `values` identically, preserving the index-wise pairing.
///
/// Both slices must have the same length; otherwise the call fails with
/// [`SortError::LengthMismatch`] before any element moves. Comparisons only
/// ever inspect keys.
///
/// # Examples
///
/// ```
/// let mut keys = [3, 1, 2];
/// let mut values = ["c", "a", "b"];
/// tandemsort::sort_pairs(&mut keys, &mut values).unwrap();
/// assert_eq!(keys, [1, 2, 3]);
/// assert_eq!(values, ["a", "b", "c"]);
/// ```
pub fn sort_pairs<K: SortKey, V>(keys: &mut [K], values: &mut [V]) -> Result<(), SortError> {
    check_pair_lengths(keys, values)?;
    let mut cmp = dispatch::natural_strategy::<K>();
    introsort_pairs(keys, values, &mut cmp)
}

/// Sorts `keys` through a caller-supplied total order while permuting
/// `values` identically.
pub fn sort_pairs_by<K, V, F>(
    keys: &mut [K],
    values: &mut [V],
    compare: F,
) -> Result<(), SortError>
where
    F: FnMut(&K, &K) -> Ordering,
{
    check_pair_lengths(keys, values)?;
    let mut cmp = dispatch::external_strategy::<K, F>(compare);
    introsort_pairs(keys, values, &mut cmp)
}

/// Paired sort under a [`Strategy`] chosen at run time.
pub fn sort_pairs_with<K: SortKey, V>(
    keys: &mut [K],
    values: &mut [V],
    strategy: Strategy<'_, K>,
) -> Result<(), SortError> {
    match strategy {
        Strategy::Natural => sort_pairs(keys, values),
        Strategy::External(compare) => sort_pairs_by(keys, values, compare),
    }
}

/// Sorts through an explicitly injected [`Comparator`].
///
/// For callers that resolve a strategy once at their composition root and
/// inject it into every sort. [`NaturalOrder`](crate::NaturalOrder) and
/// [`ExternalOrder`](crate::ExternalOrder) are the stock implementations;
/// custom comparators plug in the same way.
pub fn sort_with_comparator<K, C>(keys: &mut [K], cmp: &mut C) -> Result<(), SortError>
where
    C: Comparator<K>,
{
    introsort(keys, cmp)
}

/// Paired sort through an explicitly injected [`Comparator`].
pub fn sort_pairs_with_comparator<K, V, C>(
    keys: &mut [K],
    values: &mut [V],
    cmp: &mut C,
) -> Result<(), SortError>
where
    C: Comparator<K>,
{
    check_pair_lengths(keys, values)?;
    introsort_pairs(keys, values, cmp)
}

fn check_pair_lengths<K, V>(keys: &[K], values: &[V]) -> Result<(), SortError> {
    if keys.len() != values.len() {
        return Err(SortError::LengthMismatch {
            keys: keys.len(),
            values: values.len(),
        });
    }
    Ok(())
}

// --- Single-sequence engine ---

pub(crate) fn introsort<K, C>(keys: &mut [K], cmp: &mut C) -> Result<(), SortError>
where
    C: Comparator<K>,
{
    if keys.len() < 2 {
        return Ok(());
    }
    introsort_recurse(keys, depth_budget(keys.len()), cmp)
}

fn introsort_recurse<K, C>(
    mut keys: &mut [K],
    mut depth: u32,
    cmp: &mut C,
) -> Result<(), SortError>
where
    C: Comparator<K>,
{
    while keys.len() > INSERTION_SORT_THRESHOLD {
        if depth == 0 {
            return heapsort(keys, cmp);
        }
        depth -= 1;

        let mid = partition(keys, cmp)?;
        let (left, rest) = keys.split_at_mut(mid);
        let right = &mut rest[1..];

        // Recurse into the smaller partition, iterate on the larger.
        if left.len() <= right.len() {
            introsort_recurse(left, depth, cmp)?;
            keys = right;
        } else {
            introsort_recurse(right, depth, cmp)?;
            keys = left;
        }
    }

    insertion_sort(keys, cmp)
}

/// Median-of-three quicksort partition.
///
/// Orders the first, middle and last elements so the median becomes the
/// pivot and the ends bracket it, tucks the pivot just ahead of the end, then
/// runs a single left/right scanning-and-swapping pass. Returns the pivot's
/// final index: everything left of it compares <= pivot, everything right
/// compares >= pivot.
fn partition<K, C>(keys: &mut [K], cmp: &mut C) -> Result<usize, SortError>
where
    C: Comparator<K>,
{
    let hi = keys.len() - 1;
    let mid = hi / 2;

    swap_if_greater(keys, 0, mid, cmp)?;
    swap_if_greater(keys, 0, hi, cmp)?;
    swap_if_greater(keys, mid, hi, cmp)?;

    // keys[hi] >= pivot already, so it sentinels the left scan.
    keys.swap(mid, hi - 1);
    let pivot = hi - 1;

    let mut left = 0;
    let mut right = pivot;

    while left < right {
        // The index guards only fire for inconsistent comparators; under a
        // total order each scan stops at the pivot or the bracketing ends.
        loop {
            left += 1;
            if left >= pivot || compare_at(keys, left, pivot, cmp)? != Ordering::Less {
                break;
            }
        }
        loop {
            if right == 0 {
                break;
            }
            right -= 1;
            if compare_at(keys, pivot, right, cmp)? != Ordering::Less {
                break;
            }
        }

        if left >= right {
            break;
        }
        keys.swap(left, right);
    }

    if left != pivot {
        keys.swap(left, pivot);
    }
    Ok(left)
}

/// Insertion sort: each element shifts left past all strictly greater
/// predecessors, so runs of equal keys keep their relative order.
fn insertion_sort<K, C>(keys: &mut [K], cmp: &mut C) -> Result<(), SortError>
where
    C: Comparator<K>,
{
    for i in 1..keys.len() {
        let mut j = i;
        while j > 0 && compare_at(keys, j - 1, j, cmp)? == Ordering::Greater {
            keys.swap(j - 1, j);
            j -= 1;
        }
    }
    Ok(())
}

/// Heapsort fallback: builds a max-heap with sift-down, then repeatedly swaps
/// the root behind the shrinking unsorted range and re-sifts.
fn heapsort<K, C>(keys: &mut [K], cmp: &mut C) -> Result<(), SortError>
where
    C: Comparator<K>,
{
    let len = keys.len();
    for node in (0..len / 2).rev() {
        sift_down(keys, node, cmp)?;
    }
    for end in (1..len).rev() {
        keys.swap(0, end);
        sift_down(&mut keys[..end], 0, cmp)?;
    }
    Ok(())
}

// The heap respects the invariant `parent >= child`.
fn sift_down<K, C>(keys: &mut [K], mut node: usize, cmp: &mut C) -> Result<(), SortError>
where
    C: Comparator<K>,
{
    let len = keys.len();
    loop {
        let mut child = 2 * node + 1;
        if child >= len {
            break;
        }

        // Pick the greater child.
        if child + 1 < len && compare_at(keys, child, child + 1, cmp)? == Ordering::Less {
            child += 1;
        }

        if compare_at(keys, node, child, cmp)? != Ordering::Less {
            break;
        }

        keys.swap(node, child);
        node = child;
    }
    Ok(())
}

#[inline(always)]
fn compare_at<K, C>(keys: &[K], a: usize, b: usize, cmp: &mut C) -> Result<Ordering, SortError>
where
    C: Comparator<K>,
{
    cmp.compare(&keys[a], &keys[b])
}

fn swap_if_greater<K, C>(
    keys: &mut [K],
    a: usize,
    b: usize,
    cmp: &mut C,
) -> Result<(), SortError>
where
    C: Comparator<K>,
{
    if compare_at(keys, a, b, cmp)? == Ordering::Greater {
        keys.swap(a, b);
    }
    Ok(())
}

// --- Paired engine ---
//
// Identical algorithm, with every swap applied to the key and value slices
// at the same two indices. Comparisons only ever inspect keys. The bodies
// are kept separate from the single-sequence engine rather than abstracted
// over a swap target: the pairing invariant lives entirely in these few
// functions, where every `swap` line mirrors its twin above.

pub(crate) fn introsort_pairs<K, V, C>(
    keys: &mut [K],
    values: &mut [V],
    cmp: &mut C,
) -> Result<(), SortError>
where
    C: Comparator<K>,
{
    debug_assert_eq!(keys.len(), values.len());
    if keys.len() < 2 {
        return Ok(());
    }
    introsort_pairs_recurse(keys, values, depth_budget(keys.len()), cmp)
}

fn introsort_pairs_recurse<K, V, C>(
    mut keys: &mut [K],
    mut values: &mut [V],
    mut depth: u32,
    cmp: &mut C,
) -> Result<(), SortError>
where
    C: Comparator<K>,
{
    while keys.len() > INSERTION_SORT_THRESHOLD {
        if depth == 0 {
            return heapsort_pairs(keys, values, cmp);
        }
        depth -= 1;

        let mid = partition_pairs(keys, values, cmp)?;
        let (left_keys, rest_keys) = keys.split_at_mut(mid);
        let right_keys = &mut rest_keys[1..];
        let (left_values, rest_values) = values.split_at_mut(mid);
        let right_values = &mut rest_values[1..];

        if left_keys.len() <= right_keys.len() {
            introsort_pairs_recurse(left_keys, left_values, depth, cmp)?;
            keys = right_keys;
            values = right_values;
        } else {
            introsort_pairs_recurse(right_keys, right_values, depth, cmp)?;
            keys = left_keys;
            values = left_values;
        }
    }

    insertion_sort_pairs(keys, values, cmp)
}

fn partition_pairs<K, V, C>(
    keys: &mut [K],
    values: &mut [V],
    cmp: &mut C,
) -> Result<usize, SortError>
where
    C: Comparator<K>,
{
    let hi = keys.len() - 1;
    let mid = hi / 2;

    swap_pair_if_greater(keys, values, 0, mid, cmp)?;
    swap_pair_if_greater(keys, values, 0, hi, cmp)?;
    swap_pair_if_greater(keys, values, mid, hi, cmp)?;

    keys.swap(mid, hi - 1);
    values.swap(mid, hi - 1);
    let pivot = hi - 1;

    let mut left = 0;
    let mut right = pivot;

    while left < right {
        loop {
            left += 1;
            if left >= pivot || compare_at(keys, left, pivot, cmp)? != Ordering::Less {
                break;
            }
        }
        loop {
            if right == 0 {
                break;
            }
            right -= 1;
            if compare_at(keys, pivot, right, cmp)? != Ordering::Less {
                break;
            }
        }

        if left >= right {
            break;
        }
        keys.swap(left, right);
        values.swap(left, right);
    }

    if left != pivot {
        keys.swap(left, pivot);
        values.swap(left, pivot);
    }
    Ok(left)
}

fn insertion_sort_pairs<K, V, C>(
    keys: &mut [K],
    values: &mut [V],
    cmp: &mut C,
) -> Result<(), SortError>
where
    C: Comparator<K>,
{
    for i in 1..keys.len() {
        let mut j = i;
        while j > 0 && compare_at(keys, j - 1, j, cmp)? == Ordering::Greater {
            keys.swap(j - 1, j);
            values.swap(j - 1, j);
            j -= 1;
        }
    }
    Ok(())
}

fn heapsort_pairs<K, V, C>(
    keys: &mut [K],
    values: &mut [V],
    cmp: &mut C,
) -> Result<(), SortError>
where
    C: Comparator<K>,
{
    let len = keys.len();
    for node in (0..len / 2).rev() {
        sift_down_pairs(keys, values, node, cmp)?;
    }
    for end in (1..len).rev() {
        keys.swap(0, end);
        values.swap(0, end);
        sift_down_pairs(&mut keys[..end], &mut values[..end], 0, cmp)?;
    }
    Ok(())
}

fn sift_down_pairs<K, V, C>(
    keys: &mut [K],
    values: &mut [V],
    mut node: usize,
    cmp: &mut C,
) -> Result<(), SortError>
where
    C: Comparator<K>,
{
    let len = keys.len();
    loop {
        let mut child = 2 * node + 1;
        if child >= len {
            break;
        }

        if child + 1 < len && compare_at(keys, child, child + 1, cmp)? == Ordering::Less {
            child += 1;
        }

        if compare_at(keys, node, child, cmp)? != Ordering::Less {
            break;
        }

        keys.swap(node, child);
        values.swap(node, child);
        node = child;
    }
    Ok(())
}

fn swap_pair_if_greater<K, V, C>(
    keys: &mut [K],
    values: &mut [V],
    a: usize,
    b: usize,
    cmp: &mut C,
) -> Result<(), SortError>
where
    C: Comparator<K>,
{
    if compare_at(keys, a, b, cmp)? == Ordering::Greater {
        keys.swap(a, b);
        values.swap(a, b);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::NaturalOrder;

    fn scrambled(len: usize) -> Vec<u64> {
        // Fixed multiplicative scramble, deterministic across runs.
        (0..len as u64)
            .map(|i| i.wrapping_mul(0x9E37_79B9_7F4A_7C15) % 1_000)
            .collect()
    }

    #[test]
    fn heapsort_sorts_without_quicksort() {
        let mut v = scrambled(500);
        let mut expected = v.clone();
        expected.sort_unstable();

        heapsort(&mut v, &mut NaturalOrder).unwrap();
        assert_eq!(v, expected);
    }

    #[test]
    fn exhausted_depth_budget_still_sorts() {
        // Depth zero: the whole slice goes straight to the heapsort fallback.
        let mut v = scrambled(300);
        let mut expected = v.clone();
        expected.sort_unstable();

        introsort_recurse(&mut v, 0, &mut NaturalOrder).unwrap();
        assert_eq!(v, expected);
    }

    #[test]
    fn partition_establishes_the_invariant() {
        let mut v = scrambled(97);
        let mid = partition(&mut v, &mut NaturalOrder).unwrap();

        let pivot = v[mid];
        assert!(v[..mid].iter().all(|k| *k <= pivot));
        assert!(v[mid + 1..].iter().all(|k| *k >= pivot));
    }

    #[test]
    fn insertion_sort_handles_small_slices() {
        for len in 0..INSERTION_SORT_THRESHOLD {
            let mut v = scrambled(len);
            let mut expected = v.clone();
            expected.sort_unstable();

            insertion_sort(&mut v, &mut NaturalOrder).unwrap();
            assert_eq!(v, expected, "len {len}");
        }
    }

    #[test]
    fn paired_heapsort_keeps_the_pairing() {
        let mut keys = scrambled(200);
        let mut values: Vec<usize> = (0..keys.len()).collect();
        let before = keys.clone();

        heapsort_pairs(&mut keys, &mut values, &mut NaturalOrder).unwrap();

        for pair in keys.windows(2) {
            assert!(pair[0] <= pair[1]);
        }
        for (key, value) in keys.iter().zip(values.iter()) {
            assert_eq!(*key, before[*value]);
        }
    }

    #[test]
    fn depth_budget_grows_logarithmically() {
        assert!(depth_budget(17) < depth_budget(1 << 20));
        assert!(depth_budget(1 << 20) <= 2 * (20 + DEPTH_BUDGET_SLACK));
    }
}
