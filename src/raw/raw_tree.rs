use alloc::collections::VecDeque;
use alloc::vec::Vec;
use core::cmp::Ordering;

use super::arena::Arena;
use super::handle::Handle;
use super::node::{Color, Node, Side};
use crate::compare::Compare;

/// The red-black tree backing `OrderedSet`.
///
/// Every node carries the size of its subtree, which makes rank and select a
/// single descent. An absent link stands for the nil leaf: black, size zero.
pub(crate) struct RawTree<K, C> {
    /// Arena storing all tree nodes.
    nodes: Arena<Node<K>>,
    /// Handle to the root node, if the tree is non-empty.
    root: Option<Handle>,
    /// The order every descent follows.
    cmp: C,
}

impl<K, C> RawTree<K, C> {
    /// Creates a new, empty tree ordered by `cmp`.
    pub(crate) const fn new(cmp: C) -> Self {
        Self {
            nodes: Arena::new(),
            root: None,
            cmp,
        }
    }

    /// Creates a new tree with room for `capacity` keys.
    pub(crate) fn with_capacity(capacity: usize, cmp: C) -> Self {
        Self {
            nodes: Arena::with_capacity(capacity),
            root: None,
            cmp,
        }
    }

    pub(crate) const fn comparator(&self) -> &C {
        &self.cmp
    }

    /// Returns the number of keys, read from the root's subtree size.
    pub(crate) fn len(&self) -> usize {
        self.size_of(self.root)
    }

    pub(crate) const fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Number of occupied arena slots. Equal to `len` whenever the tree is sound.
    pub(crate) const fn allocated(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn capacity(&self) -> usize {
        self.nodes.capacity()
    }

    pub(crate) fn reserve(&mut self, additional: usize) {
        self.nodes.reserve(additional);
    }

    /// Releases every node in one pass, without walking the tree.
    pub(crate) fn clear(&mut self) {
        log::debug!("clearing {} nodes", self.nodes.len());
        self.nodes.clear();
        self.root = None;
    }

    pub(crate) const fn root(&self) -> Option<Handle> {
        self.root
    }

    #[inline]
    pub(crate) fn node(&self, handle: Handle) -> &Node<K> {
        self.nodes.get(handle)
    }

    #[inline]
    pub(super) fn node_mut(&mut self, handle: Handle) -> &mut Node<K> {
        self.nodes.get_mut(handle)
    }

    #[inline]
    pub(crate) fn key(&self, handle: Handle) -> &K {
        &self.node(handle).key
    }

    /// Returns `true` if `handle` still names a live node.
    pub(crate) fn contains_handle(&self, handle: Handle) -> bool {
        self.nodes.contains(handle)
    }

    #[inline]
    pub(crate) fn size_of(&self, link: Option<Handle>) -> usize {
        link.map_or(0, |handle| self.node(handle).size)
    }

    #[inline]
    pub(crate) fn is_red(&self, link: Option<Handle>) -> bool {
        link.is_some_and(|handle| self.node(handle).color == Color::Red)
    }

    #[inline]
    fn parent(&self, handle: Handle) -> Option<Handle> {
        self.node(handle).parent
    }

    #[inline]
    fn set_color(&mut self, handle: Handle, color: Color) {
        self.node_mut(handle).color = color;
    }

    fn side_of(&self, parent: Handle, child: Handle) -> Side {
        if self.node(parent).left == Some(child) {
            Side::Left
        } else {
            Side::Right
        }
    }

    /// Points whichever link referenced `old` at `new`; a `None` parent means the root.
    fn replace_child(&mut self, parent: Option<Handle>, old: Handle, new: Option<Handle>) {
        match parent {
            None => self.root = new,
            Some(parent) => {
                let side = self.side_of(parent, old);
                *self.node_mut(parent).child_mut(side) = new;
            }
        }
    }

    /// Puts the subtree `v` where `u` hangs. `u`'s own links are left alone.
    fn transplant(&mut self, u: Handle, v: Option<Handle>) {
        let parent = self.parent(u);
        self.replace_child(parent, u, v);
        if let Some(v) = v {
            self.node_mut(v).parent = parent;
        }
    }

    fn refresh_size(&mut self, handle: Handle) {
        let node = self.node(handle);
        let size = 1 + self.size_of(node.left) + self.size_of(node.right);
        self.node_mut(handle).size = size;
    }

    /// Rotates `x` down towards `dir`, promoting its child on the other side.
    ///
    /// `rotate(x, Side::Left)` is the textbook left rotation. Subtree sizes
    /// are fixed in place: the promoted node takes over `x`'s old size.
    fn rotate(&mut self, x: Handle, dir: Side) {
        let opposite = dir.opposite();
        let Some(y) = self.node(x).child(opposite) else {
            unreachable!("`RawTree::rotate()` - `x` has no child to promote!");
        };

        let inner = self.node(y).child(dir);
        *self.node_mut(x).child_mut(opposite) = inner;
        if let Some(inner) = inner {
            self.node_mut(inner).parent = Some(x);
        }

        let parent = self.parent(x);
        self.replace_child(parent, x, Some(y));
        self.node_mut(y).parent = parent;
        *self.node_mut(y).child_mut(dir) = Some(x);
        self.node_mut(x).parent = Some(y);

        let size = self.node(x).size;
        self.node_mut(y).size = size;
        self.refresh_size(x);
    }

    /// Adds one to the size of `start` and every ancestor above it.
    fn increment_path(&mut self, start: Option<Handle>) {
        let mut current = start;
        while let Some(handle) = current {
            let node = self.node_mut(handle);
            node.size += 1;
            current = node.parent;
        }
    }

    /// Subtracts one from the size of every node from `start` up to, but not including, `stop`.
    fn decrement_path(&mut self, start: Option<Handle>, stop: Option<Handle>) {
        let mut current = start;
        while current != stop {
            let Some(handle) = current else { break };
            let node = self.node_mut(handle);
            node.size -= 1;
            current = node.parent;
        }
    }

    /// Follows `side` links from `start` until there are none left.
    fn extreme(&self, start: Handle, side: Side) -> Handle {
        let mut current = start;
        while let Some(next) = self.node(current).child(side) {
            current = next;
        }
        current
    }

    pub(crate) fn first(&self) -> Option<Handle> {
        self.root.map(|root| self.extreme(root, Side::Left))
    }

    pub(crate) fn last(&self) -> Option<Handle> {
        self.root.map(|root| self.extreme(root, Side::Right))
    }

    /// In-order neighbour of `handle` towards `side`.
    fn step(&self, handle: Handle, side: Side) -> Option<Handle> {
        if let Some(child) = self.node(handle).child(side) {
            return Some(self.extreme(child, side.opposite()));
        }

        let mut current = handle;
        let mut parent = self.parent(handle);
        while let Some(p) = parent {
            if self.node(p).child(side) != Some(current) {
                return Some(p);
            }
            current = p;
            parent = self.parent(p);
        }
        None
    }

    pub(crate) fn successor(&self, handle: Handle) -> Option<Handle> {
        self.step(handle, Side::Right)
    }

    pub(crate) fn predecessor(&self, handle: Handle) -> Option<Handle> {
        self.step(handle, Side::Left)
    }

    /// Returns the node holding the key at zero-based `rank`, if `rank < len`.
    ///
    /// One descent steered by left-subtree sizes.
    pub(crate) fn select(&self, rank: usize) -> Option<Handle> {
        let mut rank = rank;
        let mut current = self.root;
        while let Some(handle) = current {
            let node = self.node(handle);
            let left = self.size_of(node.left);
            match rank.cmp(&left) {
                Ordering::Less => current = node.left,
                Ordering::Equal => return Some(handle),
                Ordering::Greater => {
                    rank -= left + 1;
                    current = node.right;
                }
            }
        }
        None
    }

    /// Returns the rank of the key stored at `handle` by walking up to the root.
    pub(crate) fn rank_of_handle(&self, handle: Handle) -> usize {
        let mut rank = self.size_of(self.node(handle).left);
        let mut current = handle;
        while let Some(parent) = self.parent(current) {
            let node = self.node(parent);
            if node.right == Some(current) {
                rank += 1 + self.size_of(node.left);
            }
            current = parent;
        }
        rank
    }

    /// Handles of every node, in sorted order.
    pub(crate) fn handles_in_order(&self) -> Vec<Handle> {
        let mut handles = Vec::with_capacity(self.len());
        let mut current = self.first();
        while let Some(handle) = current {
            handles.push(handle);
            current = self.successor(handle);
        }
        handles
    }

    /// Moves every key out in sorted order, leaving nothing behind.
    pub(crate) fn into_sorted_vec(mut self) -> Vec<K> {
        let handles = self.handles_in_order();
        let mut keys = Vec::with_capacity(handles.len());
        for handle in handles {
            keys.push(self.nodes.take(handle).key);
        }
        keys
    }

    /// Detaches the node at `z` from the tree, rebalances, and returns its key.
    ///
    /// Every other handle stays valid: a two-child node is replaced by
    /// relinking its successor node, never by moving keys between slots.
    pub(crate) fn remove(&mut self, z: Handle) -> K {
        let z_parent = self.parent(z);
        self.decrement_path(z_parent, None);

        let (left, right) = {
            let node = self.node(z);
            (node.left, node.right)
        };
        let mut removed_color = self.node(z).color;
        let x;
        let x_parent;

        match (left, right) {
            (None, _) => {
                x = right;
                x_parent = z_parent;
                self.transplant(z, right);
            }
            (_, None) => {
                x = left;
                x_parent = z_parent;
                self.transplant(z, left);
            }
            (Some(l), Some(r)) => {
                let y = self.extreme(r, Side::Left);
                removed_color = self.node(y).color;
                x = self.node(y).right;

                if y == r {
                    x_parent = Some(y);
                } else {
                    let y_parent = self.parent(y);
                    x_parent = y_parent;
                    self.decrement_path(y_parent, Some(z));
                    self.transplant(y, x);
                    self.node_mut(y).right = Some(r);
                    self.node_mut(r).parent = Some(y);
                }

                self.transplant(z, Some(y));
                self.node_mut(y).left = Some(l);
                self.node_mut(l).parent = Some(y);
                let color = self.node(z).color;
                self.set_color(y, color);
                self.refresh_size(y);
            }
        }

        if removed_color == Color::Black {
            self.erase_fixup(x, x_parent);
        }
        debug_assert!(!self.is_red(self.root), "`RawTree::remove()` - root left red!");

        self.nodes.take(z).key
    }

    fn insert_fixup(&mut self, mut z: Handle) {
        while let Some(p) = self.parent(z) {
            if self.node(p).color == Color::Black {
                break;
            }
            let Some(g) = self.parent(p) else {
                unreachable!("`RawTree::insert_fixup()` - red node without a parent!");
            };
            let side = self.side_of(g, p);
            let uncle = self.node(g).child(side.opposite());

            if self.is_red(uncle) {
                self.set_color(p, Color::Black);
                if let Some(uncle) = uncle {
                    self.set_color(uncle, Color::Black);
                }
                self.set_color(g, Color::Red);
                z = g;
            } else {
                if self.side_of(p, z) != side {
                    z = p;
                    self.rotate(z, side);
                }
                let Some(p) = self.parent(z) else {
                    unreachable!("`RawTree::insert_fixup()` - rotated node lost its parent!");
                };
                self.set_color(p, Color::Black);
                self.set_color(g, Color::Red);
                self.rotate(g, side.opposite());
            }
        }

        if let Some(root) = self.root {
            self.set_color(root, Color::Black);
        }
    }

    /// Restores the black height after a black node left the position `x`.
    ///
    /// `x` may be the nil leaf, so its parent travels alongside it.
    fn erase_fixup(&mut self, mut x: Option<Handle>, mut parent: Option<Handle>) {
        while x != self.root && !self.is_red(x) {
            let Some(p) = parent else {
                unreachable!("`RawTree::erase_fixup()` - non-root position without a parent!");
            };
            let side = if self.node(p).left == x { Side::Left } else { Side::Right };
            let far = side.opposite();
            let Some(mut w) = self.node(p).child(far) else {
                unreachable!("`RawTree::erase_fixup()` - doubly black node without a sibling!");
            };

            if self.is_red(Some(w)) {
                self.set_color(w, Color::Black);
                self.set_color(p, Color::Red);
                self.rotate(p, side);
                let Some(sibling) = self.node(p).child(far) else {
                    unreachable!("`RawTree::erase_fixup()` - rotation left no sibling!");
                };
                w = sibling;
            }

            let near_child = self.node(w).child(side);
            let far_child = self.node(w).child(far);
            if !self.is_red(near_child) && !self.is_red(far_child) {
                self.set_color(w, Color::Red);
                x = Some(p);
                parent = self.parent(p);
            } else {
                if !self.is_red(far_child) {
                    if let Some(near_child) = near_child {
                        self.set_color(near_child, Color::Black);
                    }
                    self.set_color(w, Color::Red);
                    self.rotate(w, far);
                    let Some(sibling) = self.node(p).child(far) else {
                        unreachable!("`RawTree::erase_fixup()` - rotation left no sibling!");
                    };
                    w = sibling;
                }

                let color = self.node(p).color;
                self.set_color(w, color);
                self.set_color(p, Color::Black);
                if let Some(far_child) = self.node(w).child(far) {
                    self.set_color(far_child, Color::Black);
                }
                self.rotate(p, side);
                x = self.root;
                parent = None;
            }
        }

        if let Some(x) = x {
            self.set_color(x, Color::Black);
        }
    }
}

impl<K, C: Compare<K>> RawTree<K, C> {
    /// Returns the node holding a key equivalent to `key`.
    pub(crate) fn search(&self, key: &K) -> Option<Handle> {
        let mut current = self.root;
        while let Some(handle) = current {
            let node = self.node(handle);
            match self.cmp.compare(key, &node.key) {
                Ordering::Less => current = node.left,
                Ordering::Greater => current = node.right,
                Ordering::Equal => return Some(handle),
            }
        }
        None
    }

    /// Inserts `key` unless an equivalent key is present.
    ///
    /// Returns the handle of the node now holding the key and whether it was
    /// newly allocated.
    pub(crate) fn insert(&mut self, key: K) -> (Handle, bool) {
        let mut parent = None;
        let mut side = Side::Left;
        let mut current = self.root;
        while let Some(handle) = current {
            let node = self.node(handle);
            side = match self.cmp.compare(&key, &node.key) {
                Ordering::Less => Side::Left,
                Ordering::Greater => Side::Right,
                Ordering::Equal => return (handle, false),
            };
            parent = Some(handle);
            current = node.child(side);
        }

        let z = self.nodes.alloc(Node::new(key, parent));
        match parent {
            None => self.root = Some(z),
            Some(parent) => *self.node_mut(parent).child_mut(side) = Some(z),
        }
        self.increment_path(parent);
        self.insert_fixup(z);
        (z, true)
    }

    /// Counts the stored keys strictly less than `key`, which need not be present.
    pub(crate) fn order_of_key(&self, key: &K) -> usize {
        let mut rank = 0;
        let mut current = self.root;
        while let Some(handle) = current {
            let node = self.node(handle);
            match self.cmp.compare(key, &node.key) {
                Ordering::Less => current = node.left,
                Ordering::Greater => {
                    rank += 1 + self.size_of(node.left);
                    current = node.right;
                }
                Ordering::Equal => return rank + self.size_of(node.left),
            }
        }
        rank
    }

    /// Removes every key for which `keep` returns `false`.
    pub(crate) fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&K) -> bool,
    {
        let doomed: Vec<Handle> = self.handles_in_order().into_iter().filter(|&handle| !keep(self.key(handle))).collect();
        for handle in doomed {
            self.remove(handle);
        }
    }
}

impl<K: Clone, C: Compare<K>> RawTree<K, C> {
    /// Inserts clones of `source`'s keys, visiting it breadth-first.
    fn extend_level_order(&mut self, source: &Self) {
        log::trace!("rebuilding {} keys in level order", source.len());
        let mut queue: VecDeque<Handle> = source.root.into_iter().collect();
        while let Some(handle) = queue.pop_front() {
            let node = source.node(handle);
            self.insert(node.key.clone());
            queue.extend(node.left);
            queue.extend(node.right);
        }
    }
}

impl<K: Clone, C: Compare<K> + Clone> Clone for RawTree<K, C> {
    fn clone(&self) -> Self {
        let mut tree = Self::with_capacity(self.len(), self.cmp.clone());
        tree.extend_level_order(self);
        tree
    }

    fn clone_from(&mut self, source: &Self) {
        self.clear();
        self.cmp = source.cmp.clone();
        self.reserve(source.len());
        self.extend_level_order(source);
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
#[allow(clippy::uninlined_format_args)]
mod tests {
    use super::*;
    use crate::compare::Natural;
    use alloc::vec;
    use proptest::prelude::*;

    fn tree_of(keys: &[i32]) -> RawTree<i32, Natural> {
        let mut tree = RawTree::new(Natural);
        for &key in keys {
            tree.insert(key);
        }
        tree
    }

    fn sorted_keys(tree: &RawTree<i32, Natural>) -> Vec<i32> {
        tree.handles_in_order().into_iter().map(|h| *tree.key(h)).collect()
    }

    #[test]
    fn ascending_inserts_stay_balanced() {
        let keys: Vec<i32> = (0..1024).collect();
        let tree = tree_of(&keys);
        tree.validate().unwrap();

        // A red-black tree of n nodes is at most 2 * log2(n + 1) deep.
        let depth = tree.handles_in_order().into_iter().map(|h| {
            let mut depth = 1;
            let mut current = h;
            while let Some(p) = tree.parent(current) {
                depth += 1;
                current = p;
            }
            depth
        });
        assert!(depth.max().unwrap() <= 20);
    }

    #[test]
    #[should_panic(expected = "`RawTree::insert_fixup()` - red node without a parent!")]
    fn insert_under_red_root_panics() {
        let mut tree = tree_of(&[5]);
        let root = tree.root().unwrap();
        tree.set_color(root, Color::Red);
        tree.insert(7);
    }

    #[test]
    #[should_panic(expected = "`RawTree::erase_fixup()` - doubly black node without a sibling!")]
    fn erase_of_black_leaf_without_sibling_panics() {
        let mut tree = tree_of(&[2, 1]);
        let (leaf, _) = tree.insert(1);
        tree.set_color(leaf, Color::Black);
        tree.remove(leaf);
    }

    #[test]
    fn duplicate_insert_returns_existing_node() {
        let mut tree = tree_of(&[5, 3, 8]);
        let (first, _) = tree.insert(4);
        let (again, inserted) = tree.insert(4);
        assert!(!inserted);
        assert_eq!(first, again);
        assert_eq!(tree.len(), 4);
        assert_eq!(tree.allocated(), 4);
    }

    #[test]
    fn remove_two_child_node_keeps_other_handles() {
        let mut tree = RawTree::new(Natural);
        let handles: Vec<(i32, Handle)> = (0..32).map(|k| (k, tree.insert(k).0)).collect();
        let root = tree.root().unwrap();
        let root_key = *tree.key(root);

        assert_eq!(tree.remove(root), root_key);
        tree.validate().unwrap();
        for &(key, handle) in &handles {
            if key != root_key {
                assert_eq!(*tree.key(handle), key);
            }
        }
    }

    #[test]
    fn neighbours_follow_sorted_order() {
        let tree = tree_of(&[40, 10, 30, 20, 50]);
        let first = tree.first().unwrap();
        let last = tree.last().unwrap();

        assert_eq!(*tree.key(first), 10);
        assert_eq!(*tree.key(last), 50);
        assert_eq!(tree.predecessor(first), None);
        assert_eq!(tree.successor(last), None);
        assert_eq!(tree.successor(first).map(|h| *tree.key(h)), Some(20));
        assert_eq!(tree.predecessor(last).map(|h| *tree.key(h)), Some(40));
    }

    #[test]
    fn empty_tree_rank_operations() {
        let tree = tree_of(&[]);
        assert!(tree.is_empty());
        assert_eq!(tree.select(0), None);
        assert_eq!(tree.order_of_key(&7), 0);
        assert_eq!(tree.first(), None);
        tree.validate().unwrap();
    }

    #[test]
    fn clone_rebuilds_an_independent_tree() {
        let source = tree_of(&[8, 4, 12, 2, 6, 10, 14]);
        let mut copy = source.clone();
        copy.validate().unwrap();
        assert_eq!(sorted_keys(&copy), sorted_keys(&source));

        let eight = copy.search(&8).unwrap();
        copy.remove(eight);
        assert_eq!(sorted_keys(&source), vec![2, 4, 6, 8, 10, 12, 14]);
        assert_eq!(sorted_keys(&copy), vec![2, 4, 6, 10, 12, 14]);

        let mut target = tree_of(&[100, 200]);
        target.clone_from(&source);
        target.validate().unwrap();
        assert_eq!(sorted_keys(&target), sorted_keys(&source));
    }

    #[test]
    fn into_sorted_vec_drains_in_order() {
        let tree = tree_of(&[3, 1, 2]);
        assert_eq!(tree.into_sorted_vec(), vec![1, 2, 3]);
    }

    #[derive(Clone, Debug)]
    enum Op {
        Insert(i32),
        Remove(i32),
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            3 => (0i32..1000).prop_map(Op::Insert),
            2 => (0i32..1000).prop_map(Op::Remove),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(50))]

        #[test]
        fn tree_invariants_maintained_after_operations(ops in prop::collection::vec(op_strategy(), 0..500)) {
            let mut tree: RawTree<i32, Natural> = RawTree::new(Natural);
            let mut expected = alloc::collections::BTreeSet::new();

            for op in ops {
                match op {
                    Op::Insert(key) => {
                        let (handle, inserted) = tree.insert(key);
                        prop_assert_eq!(inserted, expected.insert(key));
                        prop_assert_eq!(*tree.key(handle), key);
                    }
                    Op::Remove(key) => {
                        let removed = tree.search(&key).map(|h| tree.remove(h));
                        prop_assert_eq!(removed, expected.take(&key));
                    }
                }
                prop_assert_eq!(tree.validate(), Ok(()));
            }
            prop_assert_eq!(sorted_keys(&tree), expected.into_iter().collect::<Vec<_>>());
        }

        #[test]
        fn select_and_rank_agree(keys in prop::collection::vec(0i32..500, 1..200)) {
            let tree = tree_of(&keys);
            let mut expected = keys.clone();
            expected.sort_unstable();
            expected.dedup();

            for (rank, &key) in expected.iter().enumerate() {
                let handle = tree.select(rank);
                prop_assert_eq!(handle.map(|h| *tree.key(h)), Some(key), "select({}) returned wrong key", rank);
                prop_assert_eq!(tree.order_of_key(&key), rank);
                prop_assert_eq!(tree.rank_of_handle(handle.unwrap()), rank);
            }
            prop_assert!(tree.select(expected.len()).is_none());
        }

        #[test]
        fn order_of_key_counts_smaller_keys(keys in prop::collection::vec(0i32..500, 0..200), probe in -10i32..510) {
            let tree = tree_of(&keys);
            let mut expected = keys.clone();
            expected.sort_unstable();
            expected.dedup();
            prop_assert_eq!(tree.order_of_key(&probe), expected.iter().filter(|&&k| k < probe).count());
        }

        #[test]
        fn retain_keeps_matching_keys(keys in prop::collection::vec(0i32..500, 0..200)) {
            let mut tree = tree_of(&keys);
            tree.retain(|key| key % 3 != 0);
            tree.validate().unwrap();
            prop_assert!(sorted_keys(&tree).iter().all(|key| key % 3 != 0));
            prop_assert_eq!(tree.len(), tree.allocated());
        }
    }
}
