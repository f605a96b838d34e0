use super::OrderedSet;
use crate::compare::Natural;
use crate::raw::RawTree;

impl<K> OrderedSet<K> {
    /// Creates an empty set with room for at least `capacity` keys.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbos_tree::OrderedSet;
    ///
    /// let set: OrderedSet<i32> = OrderedSet::with_capacity(16);
    /// assert!(set.is_empty());
    /// assert!(set.capacity() >= 16);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(capacity) for memory allocation.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_comparator(capacity, Natural)
    }
}

impl<K, C> OrderedSet<K, C> {
    /// Creates an empty set ordered by `cmp`, with room for at least `capacity` keys.
    #[must_use]
    pub fn with_capacity_and_comparator(capacity: usize, cmp: C) -> Self {
        OrderedSet {
            tree: RawTree::with_capacity(capacity, cmp),
        }
    }

    /// Returns how many keys the set can hold without reallocating.
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.tree.capacity()
    }

    /// Reserves room for at least `additional` more keys.
    ///
    /// Slots freed by earlier removals count towards the reservation.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbos_tree::OrderedSet;
    ///
    /// let mut set = OrderedSet::from([1, 2, 3]);
    /// set.reserve(10);
    /// assert!(set.capacity() >= 13);
    /// ```
    pub fn reserve(&mut self, additional: usize) {
        self.tree.reserve(additional);
    }
}
