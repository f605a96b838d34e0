use core::fmt;
use core::ptr;

use super::OrderedSet;
use crate::compare::Natural;
use crate::raw::Handle;

/// A bidirectional cursor over the keys of an [`OrderedSet`].
///
/// A cursor sits either at a key or at the past-the-end position. Moving
/// forward from the largest key reaches the end; moving backward from the end
/// reaches the largest key. Moving backward from the smallest key also
/// reaches the end, so a cursor never points before the first key.
///
/// Cursors only read the tree. Two cursors are equal when they belong to the
/// same set and sit at the same position.
///
/// # Examples
///
/// ```
/// use rbos_tree::OrderedSet;
///
/// let set = OrderedSet::from([10, 20, 30]);
/// let mut cursor = set.find(&20);
/// assert_eq!(cursor.rank(), 1);
///
/// cursor.move_next();
/// assert_eq!(cursor.key(), Some(&30));
/// cursor.move_next();
/// assert!(cursor.is_end());
/// assert_eq!(cursor.rank(), set.len());
///
/// cursor.move_prev();
/// assert_eq!(cursor.key(), Some(&30));
/// assert_eq!(cursor.peek_prev(), Some(&20));
/// ```
pub struct Cursor<'a, K, C = Natural> {
    set: &'a OrderedSet<K, C>,
    node: Option<Handle>,
}

/// A detached, copyable record of where a [`Cursor`] stood.
///
/// Unlike a cursor it does not borrow the set, so it can be held across
/// mutations and turned back into a cursor with [`OrderedSet::cursor_at`].
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct Position(Option<Handle>);

impl Position {
    pub(super) const fn handle(self) -> Option<Handle> {
        self.0
    }
}

impl<'a, K, C> Cursor<'a, K, C> {
    pub(super) const fn new(set: &'a OrderedSet<K, C>, node: Option<Handle>) -> Self {
        Cursor { set, node }
    }

    /// Returns the key under the cursor, or `None` at the end.
    #[must_use]
    pub fn key(&self) -> Option<&'a K> {
        let set = self.set;
        self.node.map(|handle| set.tree.key(handle))
    }

    /// Returns `true` if the cursor is past the last key.
    #[must_use]
    pub const fn is_end(&self) -> bool {
        self.node.is_none()
    }

    /// Moves to the next key in sorted order. Stays put at the end.
    ///
    /// # Complexity
    ///
    /// O(log n) worst case, O(1) amortized over a full traversal.
    pub fn move_next(&mut self) {
        if let Some(handle) = self.node {
            self.node = self.set.tree.successor(handle);
        }
    }

    /// Moves to the previous key in sorted order.
    ///
    /// From the end this lands on the largest key; from the smallest key it
    /// lands on the end.
    pub fn move_prev(&mut self) {
        self.node = match self.node {
            Some(handle) => self.set.tree.predecessor(handle),
            None => self.set.tree.last(),
        };
    }

    /// Returns the key [`move_next`](Self::move_next) would land on, without moving.
    #[must_use]
    pub fn peek_next(&self) -> Option<&'a K> {
        let mut next = *self;
        next.move_next();
        next.key()
    }

    /// Returns the key [`move_prev`](Self::move_prev) would land on, without moving.
    #[must_use]
    pub fn peek_prev(&self) -> Option<&'a K> {
        let mut prev = *self;
        prev.move_prev();
        prev.key()
    }

    /// Returns the zero-based rank of the key under the cursor, or the set's
    /// length at the end.
    ///
    /// # Complexity
    ///
    /// O(log n)
    #[must_use]
    pub fn rank(&self) -> usize {
        match self.node {
            Some(handle) => self.set.tree.rank_of_handle(handle),
            None => self.set.len(),
        }
    }

    /// Records where the cursor stands, detached from the borrow of the set.
    #[must_use]
    pub const fn position(&self) -> Position {
        Position(self.node)
    }
}

impl<K, C> Clone for Cursor<'_, K, C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K, C> Copy for Cursor<'_, K, C> {}

impl<K, C> PartialEq for Cursor<'_, K, C> {
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self.set, other.set) && self.node == other.node
    }
}

impl<K, C> Eq for Cursor<'_, K, C> {}

impl<K: fmt::Debug, C> fmt::Debug for Cursor<'_, K, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Cursor").field(&self.key()).finish()
    }
}
