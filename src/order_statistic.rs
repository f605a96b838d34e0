/// A zero-based rank into the sorted order of a set.
///
/// Indexing an [`OrderedSet`](crate::OrderedSet) with a `Rank` selects the key
/// at that position, and panics when the rank is out of bounds.
///
/// # Examples
///
/// ```
/// use rbos_tree::{OrderedSet, Rank};
///
/// let set = OrderedSet::from(["b", "a"]);
///
/// assert_eq!(set[Rank(0)], "a");
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Rank(pub usize);
