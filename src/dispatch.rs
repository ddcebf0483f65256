//! Strategy resolution and the process-wide specialization cache.
//!
//! Every entry point resolves its comparison strategy here before touching a
//! sequence. Resolution is memoized per key type for the natural-order path
//! and per (key type, ordering-function type) for the external path, so the
//! decision is made once per instantiation for the lifetime of the process.
//!
//! The cache is keyed by [`std::any::type_name`] rather than
//! [`TypeId`](std::any::TypeId), which would force a `'static` bound onto
//! every sortable key type. Type names are stable within a process run,
//! which is all the cache contract requires.

use crate::core::{ExternalOrder, NaturalOrder, SortError, SortKey};
use once_cell::sync::Lazy;
use std::any::{self, Any};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::RwLock;

/// The comparison-function shape recoverable from a type-erased comparer.
///
/// Callers holding comparers behind `dyn Any` (a comparer registry, a
/// heterogeneous configuration table) store them as this plain function type
/// and recover them through [`comparer_for`].
pub type CompareFn<K> = fn(&K, &K) -> Ordering;

/// The execution path resolved for one (key type, ordering kind) pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum StrategyKind {
    /// Keys compare through their own natural order.
    Natural,
    /// Keys have no natural order; the default adapter reports
    /// `OrderingUnavailable` at the first comparison.
    DefaultFallback,
    /// Keys compare through a caller-supplied ordering function.
    External,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct CacheKey {
    key_type: &'static str,
    ordering_fn: Option<&'static str>,
}

static STRATEGY_CACHE: Lazy<RwLock<HashMap<CacheKey, StrategyKind>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

/// Memoizes `kind` for `key` and returns the published strategy.
///
/// Reads are the common case after warm-up. A first use racing on the write
/// lock may compute redundantly; every racer computes the same value for a
/// given key, so accepting the last write is harmless, and re-resolving an
/// already published key returns the published value unchanged.
fn resolve_entry(key: CacheKey, kind: StrategyKind) -> StrategyKind {
    {
        let table = STRATEGY_CACHE.read().unwrap_or_else(|e| e.into_inner());
        if let Some(published) = table.get(&key) {
            return *published;
        }
    }

    let mut table = STRATEGY_CACHE.write().unwrap_or_else(|e| e.into_inner());
    *table.entry(key).or_insert(kind)
}

/// Resolves the natural-order strategy for `K` and hands back the comparator
/// the engines run with.
///
/// For key types without a natural order this resolves to the default
/// fallback adapter rather than failing: the missing order surfaces at the
/// first comparison attempt, keeping resolution side-effect-free.
pub(crate) fn natural_strategy<K: SortKey>() -> NaturalOrder {
    let kind = if K::HAS_NATURAL_ORDER {
        StrategyKind::Natural
    } else {
        StrategyKind::DefaultFallback
    };
    resolve_entry(
        CacheKey {
            key_type: any::type_name::<K>(),
            ordering_fn: None,
        },
        kind,
    );
    NaturalOrder
}

/// Resolves the external-order strategy for `K` under the ordering function
/// type `F`. Caller intent overrides any natural order `K` may have.
pub(crate) fn external_strategy<K, F>(compare: F) -> ExternalOrder<F>
where
    F: FnMut(&K, &K) -> Ordering,
{
    resolve_entry(
        CacheKey {
            key_type: any::type_name::<K>(),
            ordering_fn: Some(any::type_name::<F>()),
        },
        StrategyKind::External,
    );
    ExternalOrder::new(compare)
}

/// Recovers a typed comparison function from a type-erased comparer.
///
/// Fails with [`SortError::BadOrderingFunction`] when the erased value is not
/// a [`CompareFn<K>`], so a structurally invalid comparer is rejected at the
/// call boundary before any sequence is mutated.
///
/// ```
/// use std::any::Any;
/// use tandemsort::{comparer_for, CompareFn};
///
/// let reverse: CompareFn<i32> = |a, b| b.cmp(a);
/// let erased: Box<dyn Any> = Box::new(reverse);
/// let compare = comparer_for::<i32>(&*erased).unwrap();
/// assert_eq!(compare(&1, &2), std::cmp::Ordering::Greater);
///
/// assert!(comparer_for::<String>(&*erased).is_err());
/// ```
pub fn comparer_for<K: 'static>(comparer: &dyn Any) -> Result<CompareFn<K>, SortError> {
    comparer
        .downcast_ref::<CompareFn<K>>()
        .copied()
        .ok_or(SortError::BadOrderingFunction {
            expected: any::type_name::<CompareFn<K>>(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    struct Unordered(#[allow(dead_code)] u32);

    impl SortKey for Unordered {}

    #[test]
    fn natural_resolution_is_memoized() {
        let key = CacheKey {
            key_type: any::type_name::<u64>(),
            ordering_fn: None,
        };

        natural_strategy::<u64>();
        let first = resolve_entry(key, StrategyKind::Natural);

        natural_strategy::<u64>();
        let second = resolve_entry(key, StrategyKind::Natural);

        assert_eq!(first, StrategyKind::Natural);
        assert_eq!(first, second);
    }

    #[test]
    fn unordered_keys_resolve_to_fallback() {
        natural_strategy::<Unordered>();

        let key = CacheKey {
            key_type: any::type_name::<Unordered>(),
            ordering_fn: None,
        };
        let published = resolve_entry(key, StrategyKind::DefaultFallback);
        assert_eq!(published, StrategyKind::DefaultFallback);
    }

    #[test]
    fn external_resolution_is_keyed_by_function_type() {
        let reverse: CompareFn<u32> = |a, b| b.cmp(a);
        external_strategy::<u32, CompareFn<u32>>(reverse);

        let external_key = CacheKey {
            key_type: any::type_name::<u32>(),
            ordering_fn: Some(any::type_name::<CompareFn<u32>>()),
        };
        assert_eq!(
            resolve_entry(external_key, StrategyKind::External),
            StrategyKind::External
        );

        // The external entry does not disturb the natural-order entry.
        natural_strategy::<u32>();
        let natural_key = CacheKey {
            key_type: any::type_name::<u32>(),
            ordering_fn: None,
        };
        assert_eq!(
            resolve_entry(natural_key, StrategyKind::Natural),
            StrategyKind::Natural
        );
    }

    #[test]
    fn concurrent_first_use_publishes_one_answer() {
        // A type no other test resolves, so every thread races on first use.
        struct FreshKey;
        impl SortKey for FreshKey {}

        let key = CacheKey {
            key_type: any::type_name::<FreshKey>(),
            ordering_fn: None,
        };

        let observed: Vec<StrategyKind> = thread::scope(|scope| {
            (0..8)
                .map(|_| {
                    scope.spawn(|| {
                        natural_strategy::<FreshKey>();
                        resolve_entry(key, StrategyKind::DefaultFallback)
                    })
                })
                .collect::<Vec<_>>()
                .into_iter()
                .map(|handle| handle.join().unwrap())
                .collect()
        });

        assert!(
            observed
                .iter()
                .all(|kind| *kind == StrategyKind::DefaultFallback)
        );
    }

    #[test]
    fn erased_comparer_with_wrong_shape_is_rejected() {
        let forward: CompareFn<i32> = |a, b| a.cmp(b);
        let erased: Box<dyn Any> = Box::new(forward);

        assert!(comparer_for::<i32>(&*erased).is_ok());
        assert!(matches!(
            comparer_for::<String>(&*erased),
            Err(SortError::BadOrderingFunction { .. })
        ));

        // A value that is not a compare fn at all.
        let not_a_fn: Box<dyn Any> = Box::new(42_u64);
        assert!(comparer_for::<i32>(&*not_a_fn).is_err());
    }
}
