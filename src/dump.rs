//! Human-readable outline of a set's tree, for debugging.

use alloc::vec;
use alloc::vec::Vec;
use core::fmt::{self, Write};

use crate::OrderedSet;
use crate::compare::Natural;
use crate::raw::{Handle, RawTree};

const LEGEND: &str = "(key,size,color)";

/// Displays the shape of an [`OrderedSet`]'s tree.
///
/// The tree is laid out sideways: right subtrees above their parent, left
/// subtrees below, each level indented by the width of its parent's label.
/// Every node reads `(key,size,color)`, where color is `r` or `b`, and `|`
/// marks the link from a node down to its children. A legend line closes the
/// output; an empty set prints `(empty_tree)` alone.
///
/// The exact layout is meant for people, not parsers.
///
/// This `struct` is created by the [`dump`](OrderedSet::dump) method on [`OrderedSet`].
///
/// # Examples
///
/// ```
/// use rbos_tree::OrderedSet;
///
/// let set = OrderedSet::from([2, 1, 3]);
/// let expected = ["      (3,1,r)", "(2,3,b)", "      (1,1,r)", "(key,size,color)"].join("\n");
/// assert_eq!(set.dump().to_string(), expected);
/// ```
pub struct Dump<'a, K, C = Natural> {
    tree: &'a RawTree<K, C>,
}

impl<K, C> OrderedSet<K, C> {
    /// Returns a [`Dump`] of the underlying tree, for printing.
    #[must_use]
    pub fn dump(&self) -> Dump<'_, K, C> {
        Dump { tree: self.raw() }
    }
}

impl<K: fmt::Display, C> Dump<'_, K, C> {
    // `prefix` holds the indentation for the current depth; its last byte is
    // the connector inherited from the parent.
    fn write_subtree(&self, f: &mut fmt::Formatter<'_>, handle: Handle, is_right: bool, prefix: &mut Vec<u8>) -> fmt::Result {
        let node = self.tree.node(handle);
        let label = alloc::format!("({},{},{})", node.key, node.size, node.color.symbol());
        let width = label.chars().count();
        let depth = prefix.len();
        let inherited = prefix[depth - 1];

        prefix[depth - 1] = if is_right { b' ' } else { inherited };
        prefix.resize(depth + width - 1, b' ');
        if let Some(connector) = prefix.last_mut() {
            *connector = b'|';
        }
        if let Some(right) = node.right {
            self.write_subtree(f, right, true, prefix)?;
        }

        for &byte in &prefix[..depth - 1] {
            f.write_char(char::from(byte))?;
        }
        f.write_str(&label)?;
        f.write_char('\n')?;

        prefix[depth - 1] = if is_right { inherited } else { b' ' };
        if let Some(left) = node.left {
            self.write_subtree(f, left, false, prefix)?;
        }
        prefix.truncate(depth);
        Ok(())
    }
}

impl<K: fmt::Display, C> fmt::Display for Dump<'_, K, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(root) = self.tree.root() else {
            return f.write_str("(empty_tree)");
        };
        let mut prefix = vec![b' '];
        self.write_subtree(f, root, false, &mut prefix)?;
        f.write_str(LEGEND)
    }
}

impl<K, C> fmt::Debug for Dump<'_, K, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dump").field("len", &self.tree.len()).finish_non_exhaustive()
    }
}
