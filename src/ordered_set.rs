use alloc::vec::Vec;
use core::cmp::Ordering;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::iter::FusedIterator;

use crate::compare::{Compare, Natural};
use crate::error::InvariantViolation;
use crate::raw::{Handle, RawTree};

mod capacity;
mod cursor;
mod order_statistic;

pub use cursor::{Cursor, Position};

/// An ordered set of unique keys, backed by a red-black tree whose nodes know
/// the size of their subtree.
///
/// Besides the usual set operations it answers two order-statistic queries in
/// O(log n): [`find_by_order`] (the key at a given rank) and
/// [`order_of_key`] (how many keys sort before a given one).
///
/// Keys are ordered by a comparator `C`, which defaults to the key's own
/// [`Ord`]. See [`Compare`] for the rules a comparator has to follow.
///
/// It is a logic error for a key to be modified in such a way that its
/// ordering relative to any other key changes while it is in the set. The
/// behavior resulting from such a logic error is not specified, but will be
/// encapsulated to the `OrderedSet` that observed it and not result in
/// undefined behavior.
///
/// # Examples
///
/// ```
/// use rbos_tree::OrderedSet;
///
/// let mut set = OrderedSet::new();
/// for key in [12, 505, 30, 1000, 10000, 100] {
///     set.insert(key);
/// }
///
/// assert_eq!(set.find_by_order(1).key(), Some(&30));
/// assert_eq!(set.order_of_key(&1000), 4);
/// assert_eq!(set.order_of_key(&400), 3); // absent keys have a rank too
///
/// set.erase(&30);
/// assert_eq!(set.find_by_order(1).key(), Some(&100));
/// assert_eq!(set.iter().copied().collect::<Vec<_>>(), [12, 100, 505, 1000, 10000]);
/// ```
///
/// [`find_by_order`]: OrderedSet::find_by_order
/// [`order_of_key`]: OrderedSet::order_of_key
pub struct OrderedSet<K, C = Natural> {
    tree: RawTree<K, C>,
}

/// An iterator over the keys of an `OrderedSet`, in sorted order.
///
/// This `struct` is created by the [`iter`] method on [`OrderedSet`].
///
/// # Examples
///
/// ```
/// use rbos_tree::OrderedSet;
///
/// let set = OrderedSet::from([3, 1, 2]);
/// let mut iter = set.iter();
/// assert_eq!(iter.next(), Some(&1));
/// assert_eq!(iter.next_back(), Some(&3));
/// assert_eq!(iter.next(), Some(&2));
/// assert_eq!(iter.next(), None);
/// ```
///
/// [`iter`]: OrderedSet::iter
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a, K, C = Natural> {
    tree: &'a RawTree<K, C>,
    front: Option<Handle>,
    back: Option<Handle>,
    remaining: usize,
}

/// An owning iterator over the keys of an `OrderedSet`, in sorted order.
///
/// This `struct` is created by the [`into_iter`] method on [`OrderedSet`]
/// (provided by the [`IntoIterator`] trait).
///
/// [`into_iter`]: OrderedSet#method.into_iter
pub struct IntoIter<K> {
    inner: alloc::vec::IntoIter<K>,
}

impl<K> OrderedSet<K> {
    /// Makes a new, empty `OrderedSet` ordered by the keys' [`Ord`].
    ///
    /// Does not allocate anything on its own.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbos_tree::OrderedSet;
    ///
    /// let mut set = OrderedSet::new();
    ///
    /// // keys can now be inserted into the empty set
    /// set.insert(1);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub const fn new() -> Self {
        Self::with_comparator(Natural)
    }
}

impl<K, C> OrderedSet<K, C> {
    /// Makes a new, empty `OrderedSet` ordered by `cmp`.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbos_tree::OrderedSet;
    ///
    /// let mut set = OrderedSet::with_comparator(|a: &i32, b: &i32| b.cmp(a));
    /// set.extend([1, 3, 2]);
    /// assert_eq!(set.first(), Some(&3));
    /// ```
    #[must_use]
    pub const fn with_comparator(cmp: C) -> Self {
        OrderedSet {
            tree: RawTree::new(cmp),
        }
    }

    /// Returns the comparator the set was built with.
    pub const fn comparator(&self) -> &C {
        self.tree.comparator()
    }

    pub(crate) const fn raw(&self) -> &RawTree<K, C> {
        &self.tree
    }

    /// Returns the number of keys in the set.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbos_tree::OrderedSet;
    ///
    /// let mut a = OrderedSet::new();
    /// assert_eq!(a.len(), 0);
    /// a.insert(1);
    /// assert_eq!(a.len(), 1);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(1), read from the root's subtree size.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    /// Returns `true` if the set contains no keys.
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Removes every key, keeping the allocated node storage for reuse.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbos_tree::OrderedSet;
    ///
    /// let mut v = OrderedSet::new();
    /// v.insert(1);
    /// v.clear();
    /// assert!(v.is_empty());
    /// ```
    ///
    /// # Complexity
    ///
    /// O(n), without recursion.
    pub fn clear(&mut self) {
        self.tree.clear();
    }

    /// Gets an iterator that visits the keys in ascending order.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbos_tree::OrderedSet;
    ///
    /// let set = OrderedSet::from([3, 1, 2]);
    /// let mut iter = set.iter();
    /// assert_eq!(iter.next(), Some(&1));
    /// assert_eq!(iter.len(), 2);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n) to create the iterator; O(1) amortized per step.
    pub fn iter(&self) -> Iter<'_, K, C> {
        Iter {
            tree: &self.tree,
            front: self.tree.first(),
            back: self.tree.last(),
            remaining: self.tree.len(),
        }
    }

    /// Returns the smallest key, if any.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbos_tree::OrderedSet;
    ///
    /// let mut set = OrderedSet::new();
    /// assert_eq!(set.first(), None);
    /// set.insert(2);
    /// set.insert(1);
    /// assert_eq!(set.first(), Some(&1));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    #[must_use]
    pub fn first(&self) -> Option<&K> {
        self.tree.first().map(|handle| self.tree.key(handle))
    }

    /// Returns the largest key, if any.
    ///
    /// # Complexity
    ///
    /// O(log n)
    #[must_use]
    pub fn last(&self) -> Option<&K> {
        self.tree.last().map(|handle| self.tree.key(handle))
    }

    /// Returns a cursor at the smallest key, or at the end if the set is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbos_tree::OrderedSet;
    ///
    /// let set = OrderedSet::from([5, 7]);
    /// assert_eq!(set.min().key(), Some(&5));
    /// assert!(OrderedSet::<i32>::new().min().is_end());
    /// ```
    pub fn min(&self) -> Cursor<'_, K, C> {
        Cursor::new(self, self.tree.first())
    }

    /// Returns a cursor at the largest key, or at the end if the set is empty.
    pub fn max(&self) -> Cursor<'_, K, C> {
        Cursor::new(self, self.tree.last())
    }

    /// Returns a cursor at the first key in sorted order. Same as [`min`](Self::min).
    pub fn begin(&self) -> Cursor<'_, K, C> {
        self.min()
    }

    /// Returns the past-the-end cursor.
    ///
    /// Moving it backwards lands on the largest key.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbos_tree::OrderedSet;
    ///
    /// let set = OrderedSet::from([1, 2, 3]);
    /// let mut cursor = set.end();
    /// assert_eq!(cursor.key(), None);
    /// cursor.move_prev();
    /// assert_eq!(cursor.key(), Some(&3));
    /// ```
    pub const fn end(&self) -> Cursor<'_, K, C> {
        Cursor::new(self, None)
    }

    /// Turns a [`Position`] taken earlier back into a cursor.
    ///
    /// Returns `None` if the key the position pointed at has been erased since,
    /// or the set was cleared. A position outlives unrelated insertions and
    /// erasures. Once its key is erased it must not be relied on: the slot may
    /// be reused by a later insertion, and the position then names that key.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbos_tree::OrderedSet;
    ///
    /// let mut set = OrderedSet::from([10, 20, 30]);
    /// let twenty = set.find(&20).position();
    ///
    /// set.insert(25);
    /// set.erase(&10);
    /// assert_eq!(set.cursor_at(twenty).and_then(|c| c.key()), Some(&20));
    ///
    /// set.erase(&20);
    /// assert!(set.cursor_at(twenty).is_none());
    /// ```
    #[must_use]
    pub fn cursor_at(&self, position: Position) -> Option<Cursor<'_, K, C>> {
        match position.handle() {
            None => Some(self.end()),
            Some(handle) if self.tree.contains_handle(handle) => Some(Cursor::new(self, Some(handle))),
            Some(_) => None,
        }
    }
}

impl<K, C: Compare<K>> OrderedSet<K, C> {
    /// Adds a key to the set.
    ///
    /// Returns a cursor at the key now stored and whether it was newly
    /// inserted. If an equivalent key was already present, the set is left
    /// unchanged, `key` is dropped, and the cursor points at the existing key.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbos_tree::OrderedSet;
    ///
    /// let mut set = OrderedSet::new();
    ///
    /// let (cursor, inserted) = set.insert(2);
    /// assert!(inserted);
    /// assert_eq!(cursor.key(), Some(&2));
    ///
    /// assert!(!set.insert(2).1);
    /// assert_eq!(set.len(), 1);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn insert(&mut self, key: K) -> (Cursor<'_, K, C>, bool) {
        let (handle, inserted) = self.tree.insert(key);
        (Cursor::new(self, Some(handle)), inserted)
    }

    /// Removes the key equivalent to `key`.
    ///
    /// Returns a cursor at the key that followed it, or the end cursor when it
    /// was the largest key or was not present at all.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbos_tree::OrderedSet;
    ///
    /// let mut set = OrderedSet::from([1, 2, 3]);
    /// assert_eq!(set.erase(&2).key(), Some(&3));
    /// assert!(set.erase(&3).is_end());
    /// assert!(set.erase(&42).is_end());
    /// assert_eq!(set.len(), 1);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn erase(&mut self, key: &K) -> Cursor<'_, K, C> {
        let Some(handle) = self.tree.search(key) else {
            return self.end();
        };
        let next = self.tree.successor(handle);
        self.tree.remove(handle);
        Cursor::new(self, next)
    }

    /// Returns a cursor at the key equivalent to `key`, or the end cursor.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbos_tree::OrderedSet;
    ///
    /// let set = OrderedSet::from([1, 2, 3]);
    /// assert_eq!(set.find(&2).key(), Some(&2));
    /// assert_eq!(set.find(&4), set.end());
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn find(&self, key: &K) -> Cursor<'_, K, C> {
        Cursor::new(self, self.tree.search(key))
    }

    /// Returns `true` if the set contains a key equivalent to `key`.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbos_tree::OrderedSet;
    ///
    /// let set = OrderedSet::from([1, 2, 3]);
    /// assert!(set.contains(&1));
    /// assert!(!set.contains(&4));
    /// ```
    #[must_use]
    pub fn contains(&self, key: &K) -> bool {
        self.tree.search(key).is_some()
    }

    /// Returns a reference to the stored key equivalent to `key`, if any.
    #[must_use]
    pub fn get(&self, key: &K) -> Option<&K> {
        self.tree.search(key).map(|handle| self.tree.key(handle))
    }

    /// Removes the key equivalent to `key`. Returns whether one was present.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbos_tree::OrderedSet;
    ///
    /// let mut set = OrderedSet::new();
    /// set.insert(2);
    /// assert!(set.remove(&2));
    /// assert!(!set.remove(&2));
    /// ```
    pub fn remove(&mut self, key: &K) -> bool {
        self.take(key).is_some()
    }

    /// Removes and returns the stored key equivalent to `key`, if any.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbos_tree::OrderedSet;
    ///
    /// let mut set = OrderedSet::new();
    /// set.insert(2);
    /// assert_eq!(set.take(&2), Some(2));
    /// assert_eq!(set.take(&2), None);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn take(&mut self, key: &K) -> Option<K> {
        let handle = self.tree.search(key)?;
        Some(self.tree.remove(handle))
    }

    /// Removes and returns the smallest key.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbos_tree::OrderedSet;
    ///
    /// let mut set = OrderedSet::from([1, 2]);
    /// while let Some(n) = set.pop_first() {
    ///     assert!(set.iter().all(|&k| k > n));
    /// }
    /// assert!(set.is_empty());
    /// ```
    pub fn pop_first(&mut self) -> Option<K> {
        let handle = self.tree.first()?;
        Some(self.tree.remove(handle))
    }

    /// Removes and returns the largest key.
    pub fn pop_last(&mut self) -> Option<K> {
        let handle = self.tree.last()?;
        Some(self.tree.remove(handle))
    }

    /// Retains only the keys specified by the predicate.
    ///
    /// In other words, removes every key `k` for which `f(&k)` returns `false`.
    /// The keys are visited in ascending order.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbos_tree::OrderedSet;
    ///
    /// let mut set: OrderedSet<i32> = (0..8).collect();
    /// set.retain(|&k| k % 2 == 0);
    /// assert!(set.into_iter().eq([0, 2, 4, 6]));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(n + m log n), where m is the number of keys removed.
    pub fn retain<F>(&mut self, f: F)
    where
        F: FnMut(&K) -> bool,
    {
        self.tree.retain(f);
    }

    /// Checks every structural invariant of the underlying tree.
    ///
    /// Nothing in the public API can break these; the check exists for tests
    /// and for hunting down comparators that are not a strict weak ordering.
    ///
    /// # Errors
    ///
    /// Returns the first [`InvariantViolation`] found.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbos_tree::OrderedSet;
    ///
    /// let set: OrderedSet<u32> = (0..100).collect();
    /// assert_eq!(set.check_invariants(), Ok(()));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(n log n)
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        self.tree.validate()
    }
}

impl<K: Hash, C> Hash for OrderedSet<K, C> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_usize(self.len());
        for key in self {
            key.hash(state);
        }
    }
}

impl<K: PartialEq, C> PartialEq for OrderedSet<K, C> {
    fn eq(&self, other: &OrderedSet<K, C>) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<K: Eq, C> Eq for OrderedSet<K, C> {}

impl<K: PartialOrd, C> PartialOrd for OrderedSet<K, C> {
    fn partial_cmp(&self, other: &OrderedSet<K, C>) -> Option<Ordering> {
        self.iter().partial_cmp(other.iter())
    }
}

impl<K: Clone, C: Compare<K> + Clone> Clone for OrderedSet<K, C> {
    /// Builds an independent set holding clones of the same keys.
    ///
    /// The keys are re-inserted breadth-first, so the copy is a valid
    /// red-black tree but not necessarily shaped like the source.
    fn clone(&self) -> Self {
        OrderedSet {
            tree: self.tree.clone(),
        }
    }

    fn clone_from(&mut self, source: &Self) {
        self.tree.clone_from(&source.tree);
    }
}

impl<K: fmt::Debug, C> fmt::Debug for OrderedSet<K, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<K, C: Default> Default for OrderedSet<K, C> {
    /// Creates an empty set with a default comparator.
    fn default() -> Self {
        OrderedSet::with_comparator(C::default())
    }
}

impl<K, C: Compare<K> + Default> FromIterator<K> for OrderedSet<K, C> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut set = OrderedSet::default();
        set.extend(iter);
        set
    }
}

impl<K, C: Compare<K>> Extend<K> for OrderedSet<K, C> {
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}

impl<'a, K: 'a + Copy, C: Compare<K>> Extend<&'a K> for OrderedSet<K, C> {
    fn extend<I: IntoIterator<Item = &'a K>>(&mut self, iter: I) {
        for &key in iter {
            self.insert(key);
        }
    }
}

impl<K: Ord, const N: usize> From<[K; N]> for OrderedSet<K> {
    /// Converts a `[K; N]` into an `OrderedSet<K>`, dropping duplicates.
    ///
    /// ```
    /// use rbos_tree::OrderedSet;
    ///
    /// let set1 = OrderedSet::from([1, 2, 3, 4]);
    /// let set2: OrderedSet<_> = [1, 2, 3, 4].into();
    /// assert_eq!(set1, set2);
    /// ```
    fn from(arr: [K; N]) -> Self {
        arr.into_iter().collect()
    }
}

impl<K, C> IntoIterator for OrderedSet<K, C> {
    type Item = K;
    type IntoIter = IntoIter<K>;

    /// Gets an iterator for moving out the set's contents in ascending order.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbos_tree::OrderedSet;
    ///
    /// let set = OrderedSet::from([1, 2, 3, 4]);
    ///
    /// let v: Vec<_> = set.into_iter().collect();
    /// assert_eq!(v, [1, 2, 3, 4]);
    /// ```
    fn into_iter(self) -> IntoIter<K> {
        IntoIter {
            inner: self.tree.into_sorted_vec().into_iter(),
        }
    }
}

impl<'a, K, C> IntoIterator for &'a OrderedSet<K, C> {
    type Item = &'a K;
    type IntoIter = Iter<'a, K, C>;

    fn into_iter(self) -> Iter<'a, K, C> {
        self.iter()
    }
}

impl<'a, K, C> Iterator for Iter<'a, K, C> {
    type Item = &'a K;

    fn next(&mut self) -> Option<&'a K> {
        if self.remaining == 0 {
            return None;
        }
        let handle = self.front?;
        self.front = self.tree.successor(handle);
        self.remaining -= 1;
        Some(self.tree.key(handle))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }

    fn last(mut self) -> Option<&'a K> {
        self.next_back()
    }
}

impl<'a, K, C> DoubleEndedIterator for Iter<'a, K, C> {
    fn next_back(&mut self) -> Option<&'a K> {
        if self.remaining == 0 {
            return None;
        }
        let handle = self.back?;
        self.back = self.tree.predecessor(handle);
        self.remaining -= 1;
        Some(self.tree.key(handle))
    }
}

impl<K, C> ExactSizeIterator for Iter<'_, K, C> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<K, C> FusedIterator for Iter<'_, K, C> {}

impl<K, C> Clone for Iter<'_, K, C> {
    fn clone(&self) -> Self {
        Iter {
            tree: self.tree,
            front: self.front,
            back: self.back,
            remaining: self.remaining,
        }
    }
}

impl<K: fmt::Debug, C> fmt::Debug for Iter<'_, K, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<K> Iterator for IntoIter<K> {
    type Item = K;

    fn next(&mut self) -> Option<K> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K> DoubleEndedIterator for IntoIter<K> {
    fn next_back(&mut self) -> Option<K> {
        self.inner.next_back()
    }
}

impl<K> ExactSizeIterator for IntoIter<K> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K> FusedIterator for IntoIter<K> {}

impl<K: fmt::Debug> fmt::Debug for IntoIter<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntoIter").field("inner", &self.inner).finish()
    }
}

impl<K> Default for IntoIter<K> {
    /// Creates an empty `ordered_set::IntoIter`.
    ///
    /// ```
    /// # use rbos_tree::ordered_set;
    /// let iter: ordered_set::IntoIter<u8> = Default::default();
    /// assert_eq!(iter.len(), 0);
    /// ```
    fn default() -> Self {
        IntoIter {
            inner: Vec::new().into_iter(),
        }
    }
}
