use core::ops::Index;

use super::{Cursor, OrderedSet};
use crate::Rank;
use crate::compare::Compare;

impl<K, C> OrderedSet<K, C> {
    /// Returns a cursor at the key with zero-based `rank` in sorted order, or
    /// the end cursor if `rank >= len`.
    ///
    /// # Complexity
    ///
    /// O(log n), one descent steered by subtree sizes. Nothing is allocated.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbos_tree::OrderedSet;
    ///
    /// let set = OrderedSet::from([10, 20, 30]);
    /// assert_eq!(set.find_by_order(0).key(), Some(&10));
    /// assert!(set.find_by_order(3).is_end());
    /// ```
    pub fn find_by_order(&self, rank: usize) -> Cursor<'_, K, C> {
        Cursor::new(self, self.tree.select(rank))
    }

    /// Returns the key at position `rank` in sorted order.
    ///
    /// The rank is zero-based. Returns `None` if `rank` is out of bounds.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use rbos_tree::OrderedSet;
    ///
    /// let set = OrderedSet::from([10, 20, 30]);
    /// assert_eq!(set.get_by_rank(1), Some(&20));
    /// assert!(set.get_by_rank(3).is_none());
    /// ```
    #[must_use]
    pub fn get_by_rank(&self, rank: usize) -> Option<&K> {
        self.tree.select(rank).map(|handle| self.tree.key(handle))
    }
}

impl<K, C: Compare<K>> OrderedSet<K, C> {
    /// Returns the number of keys strictly less than `key`.
    ///
    /// `key` does not have to be in the set; for a present key this is its rank.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use rbos_tree::OrderedSet;
    ///
    /// let set = OrderedSet::from([10, 20, 30]);
    /// assert_eq!(set.order_of_key(&20), 1);
    /// assert_eq!(set.order_of_key(&25), 2);
    /// assert_eq!(set.order_of_key(&5), 0);
    /// assert_eq!(set.order_of_key(&99), 3);
    /// ```
    #[must_use]
    pub fn order_of_key(&self, key: &K) -> usize {
        self.tree.order_of_key(key)
    }

    /// Returns the zero-based rank of `key` in sorted order, or `None` if
    /// the key is not present.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use rbos_tree::OrderedSet;
    ///
    /// let set = OrderedSet::from([10, 20]);
    ///
    /// assert_eq!(set.rank_of(&20), Some(1));
    /// assert_eq!(set.rank_of(&15), None);
    /// ```
    #[must_use]
    pub fn rank_of(&self, key: &K) -> Option<usize> {
        self.tree.search(key).map(|handle| self.tree.rank_of_handle(handle))
    }
}

/// Indexes into the set by rank.
///
/// # Panics
///
/// Panics if `rank` is out of bounds.
///
/// # Examples
///
/// ```
/// use rbos_tree::{OrderedSet, Rank};
///
/// let set = OrderedSet::from([10, 20, 30]);
/// assert_eq!(set[Rank(1)], 20);
/// ```
impl<K, C> Index<Rank> for OrderedSet<K, C> {
    type Output = K;

    fn index(&self, rank: Rank) -> &Self::Output {
        self.get_by_rank(rank.0).expect("index out of bounds")
    }
}
