//! Core traits and types for Tandemsort.
//!
//! This module defines:
//! - [`SortKey`]: The capability trait answering whether a key type carries a
//!   natural total order, and performing that comparison.
//! - [`Strategy`]: The caller-facing choice between the natural order and an
//!   externally supplied ordering function.
//! - [`Comparator`] and its two implementations, which drive every comparison
//!   made by the sort and search engines.
//! - [`SortError`]: The full error taxonomy of the crate.

use std::any;
use std::cmp::Ordering;
use std::error::Error;
use std::fmt;

/// A key type that can be handed to [`sort`](crate::sort) and
/// [`binary_search`](crate::binary_search).
///
/// The trait plays the role of an ordering oracle, resolved at compile time:
/// a type either defines a natural total order ([`HAS_NATURAL_ORDER`] is
/// `true` and [`natural_cmp`] always answers) or it does not, in which case
/// sorting it without an ordering function fails with
/// [`SortError::OrderingUnavailable`] at the first comparison attempt.
///
/// Both items have defaults declaring *no* natural order, so opting a type
/// out is a one-line impl:
///
/// ```
/// use tandemsort::SortKey;
///
/// struct Opaque(u32);
///
/// impl SortKey for Opaque {}
/// ```
///
/// Types that are [`Ord`] opt in with the [`natural_order_via_ord!`] macro:
///
/// ```
/// use tandemsort::{natural_order_via_ord, SortKey};
///
/// #[derive(PartialEq, Eq, PartialOrd, Ord)]
/// struct Version(u16, u16);
///
/// natural_order_via_ord!(Version);
///
/// assert!(Version::HAS_NATURAL_ORDER);
/// ```
///
/// [`HAS_NATURAL_ORDER`]: SortKey::HAS_NATURAL_ORDER
/// [`natural_cmp`]: SortKey::natural_cmp
/// [`natural_order_via_ord!`]: crate::natural_order_via_ord
pub trait SortKey {
    /// Whether the type defines a natural total order.
    ///
    /// Must agree with [`natural_cmp`](SortKey::natural_cmp): when `true`,
    /// `natural_cmp` must return `Some` for every pair of values.
    const HAS_NATURAL_ORDER: bool = false;

    /// Three-way comparison through the type's own order, or `None` when the
    /// type has no natural order.
    #[inline(always)]
    fn natural_cmp(&self, _other: &Self) -> Option<Ordering> {
        None
    }
}

/// Implements [`SortKey`] for one or more [`Ord`] types, declaring their
/// `Ord` impl as the natural order.
///
/// ```
/// use tandemsort::natural_order_via_ord;
///
/// #[derive(PartialEq, Eq, PartialOrd, Ord)]
/// struct Rank(u8);
///
/// natural_order_via_ord!(Rank);
/// ```
#[macro_export]
macro_rules! natural_order_via_ord {
    ($($t:ty),+ $(,)?) => {
        $(
            impl $crate::SortKey for $t {
                const HAS_NATURAL_ORDER: bool = true;

                #[inline(always)]
                fn natural_cmp(&self, other: &Self) -> Option<::core::cmp::Ordering> {
                    Some(::core::cmp::Ord::cmp(self, other))
                }
            }
        )+
    };
}

natural_order_via_ord!(
    u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, bool, char, String, Vec<u8>,
);

impl<'a> SortKey for &'a str {
    const HAS_NATURAL_ORDER: bool = true;

    #[inline(always)]
    fn natural_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(Ord::cmp(self, other))
    }
}

// Floats order through `total_cmp`, which places every NaN deterministically
// instead of failing or producing an inconsistent partial order.
impl SortKey for f32 {
    const HAS_NATURAL_ORDER: bool = true;

    #[inline(always)]
    fn natural_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.total_cmp(other))
    }
}

impl SortKey for f64 {
    const HAS_NATURAL_ORDER: bool = true;

    #[inline(always)]
    fn natural_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.total_cmp(other))
    }
}

/// The ordering to sort or search under: the key type's natural order, or an
/// externally supplied total order that overrides it.
///
/// Accepted by the `*_with` entry points ([`sort_with`](crate::sort_with),
/// [`sort_pairs_with`](crate::sort_pairs_with),
/// [`binary_search_with`](crate::binary_search_with)) when the choice is only
/// known at run time. Callers that know the ordering statically should prefer
/// the plain and `_by` variants, which monomorphize the comparison.
pub enum Strategy<'a, K> {
    /// Compare keys through their own [`SortKey`] order.
    Natural,
    /// Compare keys through the supplied ordering function.
    External(&'a mut dyn FnMut(&K, &K) -> Ordering),
}

/// Three-way comparison as used by the sort and search engines.
///
/// The engines are comparator-agnostic: every comparison they make goes
/// through this trait, and the concrete implementation decides its cost and
/// failure behavior.
pub trait Comparator<K> {
    /// Compares two keys, or fails with the error to surface to the caller.
    fn compare(&mut self, a: &K, b: &K) -> Result<Ordering, SortError>;
}

/// Comparator backed by the key type's natural order.
///
/// Doubles as the default fallback adapter for keys without a natural order:
/// construction always succeeds, and the missing order is reported as
/// [`SortError::OrderingUnavailable`] at the first comparison attempt. A
/// zero-length sort or search on such keys therefore still succeeds.
pub struct NaturalOrder;

impl<K: SortKey> Comparator<K> for NaturalOrder {
    #[inline(always)]
    fn compare(&mut self, a: &K, b: &K) -> Result<Ordering, SortError> {
        a.natural_cmp(b).ok_or(SortError::OrderingUnavailable {
            key_type: any::type_name::<K>(),
        })
    }
}

/// Comparator backed by a caller-supplied ordering function.
pub struct ExternalOrder<F>(F);

impl<F> ExternalOrder<F> {
    /// Wraps an ordering function for injection into the
    /// `*_with_comparator` entry points.
    pub fn new(compare: F) -> Self {
        ExternalOrder(compare)
    }
}

impl<K, F> Comparator<K> for ExternalOrder<F>
where
    F: FnMut(&K, &K) -> Ordering,
{
    #[inline(always)]
    fn compare(&mut self, a: &K, b: &K) -> Result<Ordering, SortError> {
        Ok((self.0)(a, b))
    }
}

/// Errors surfaced by the sort and search entry points.
///
/// A sort that fails mid-algorithm leaves the sequence (and, for the paired
/// variant, both sequences in lockstep) a permutation of the input: elements
/// are never lost or duplicated on an error path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortError {
    /// The key type has no natural order and no ordering function was
    /// supplied. Raised lazily at the first comparison attempt, never at
    /// strategy construction.
    OrderingUnavailable {
        /// Name of the offending key type.
        key_type: &'static str,
    },
    /// A type-erased comparer does not have the comparison-function shape
    /// expected for the key type. Raised at the call boundary, before any
    /// mutation.
    BadOrderingFunction {
        /// Name of the comparison-function type that was expected.
        expected: &'static str,
    },
    /// The key and value sequences of a paired sort differ in length.
    /// Raised before any mutation.
    LengthMismatch {
        /// Length of the key sequence.
        keys: usize,
        /// Length of the value sequence.
        values: usize,
    },
    /// The requested sub-range exceeds the sequence bounds. Raised before
    /// any element is inspected.
    IndexRangeInvalid {
        /// Start of the requested range.
        index: usize,
        /// Length of the requested range.
        length: usize,
        /// Length of the sequence.
        available: usize,
    },
}

impl fmt::Display for SortError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortError::OrderingUnavailable { key_type } => write!(
                f,
                "type `{key_type}` has no natural order and no ordering function was supplied"
            ),
            SortError::BadOrderingFunction { expected } => {
                write!(f, "supplied comparer is not a `{expected}`")
            }
            SortError::LengthMismatch { keys, values } => write!(
                f,
                "key sequence has {keys} elements but value sequence has {values}"
            ),
            SortError::IndexRangeInvalid {
                index,
                length,
                available,
            } => write!(
                f,
                "range [{index}, {index} + {length}) exceeds the {available} available elements"
            ),
        }
    }
}

impl Error for SortError {}
