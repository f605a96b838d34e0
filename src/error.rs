use thiserror::Error;

/// A broken structural invariant, reported by
/// [`OrderedSet::check_invariants`](crate::OrderedSet::check_invariants).
///
/// Nodes are identified by their zero-based rank in the set's sorted order,
/// so a report can be matched against [`OrderedSet::get_by_rank`](crate::OrderedSet::get_by_rank).
/// Any of these indicates a defect in the tree itself, never a misuse of the
/// public API (short of a comparator that is not a strict weak ordering).
#[derive(Clone, Copy, Debug, Eq, PartialEq, Error)]
pub enum InvariantViolation {
    #[error("the root node is red")]
    RedRoot,
    #[error("the root node has a parent link")]
    RootHasParent,
    #[error("a child of the node at rank {rank} does not link back to it")]
    BrokenParentLink { rank: usize },
    #[error("red node at rank {rank} has a red child")]
    RedChildOfRed { rank: usize },
    #[error("node at rank {rank} stores size {stored}, but one plus its children's sizes is {expected}")]
    SizeMismatch { rank: usize, stored: usize, expected: usize },
    #[error("leaf below rank {rank} has black height {found}, expected {expected}")]
    BlackHeightMismatch { rank: usize, expected: usize, found: usize },
    #[error("key at rank {rank} does not sort strictly before its successor")]
    OutOfOrder { rank: usize },
    #[error("the arena holds {allocated} nodes, but {counted} are reachable from the root")]
    LengthMismatch { allocated: usize, counted: usize },
}
