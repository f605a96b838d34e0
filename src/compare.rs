//! Orderings an [`OrderedSet`](crate::OrderedSet) can be built with.
//!
//! The comparator is chosen once, when the set is constructed, and is called
//! through static dispatch for every descent.

use core::cmp::Ordering;

/// A total order over `K`.
///
/// Implementations must be a strict weak ordering that never changes while a
/// set holds keys ordered by it. Two keys are treated as the same element when
/// `compare` returns [`Ordering::Equal`]. Violating this is a logic error: the
/// set may return wrong answers or panic, but it stays memory safe.
///
/// Any `Fn(&K, &K) -> Ordering` closure is a comparator.
///
/// # Examples
///
/// ```
/// use rbos_tree::OrderedSet;
///
/// let mut by_len = OrderedSet::with_comparator(|a: &&str, b: &&str| a.len().cmp(&b.len()));
/// by_len.insert("pear");
/// by_len.insert("fig");
/// assert!(!by_len.insert("plum").1); // same length as "pear"
/// assert_eq!(by_len.iter().copied().collect::<Vec<_>>(), ["fig", "pear"]);
/// ```
pub trait Compare<K: ?Sized> {
    /// Orders `a` relative to `b`.
    fn compare(&self, a: &K, b: &K) -> Ordering;
}

/// The key type's own [`Ord`] implementation. This is the default comparator.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct Natural;

impl<K: Ord + ?Sized> Compare<K> for Natural {
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        a.cmp(b)
    }
}

/// The reverse of the key type's [`Ord`] implementation.
///
/// # Examples
///
/// ```
/// use rbos_tree::{OrderedSet, compare::Reversed};
///
/// let mut set = OrderedSet::with_comparator(Reversed);
/// set.extend([1, 3, 2]);
/// assert_eq!(set.get_by_rank(0), Some(&3));
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct Reversed;

impl<K: Ord + ?Sized> Compare<K> for Reversed {
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        b.cmp(a)
    }
}

impl<K: ?Sized, F> Compare<K> for F
where
    F: Fn(&K, &K) -> Ordering,
{
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        self(a, b)
    }
}
