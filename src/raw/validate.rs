use core::cmp::Ordering;

use smallvec::SmallVec;

use super::handle::Handle;
use super::node::Color;
use super::raw_tree::RawTree;
use crate::compare::Compare;
use crate::error::InvariantViolation;

impl<K, C: Compare<K>> RawTree<K, C> {
    /// Checks every structural invariant in one in-order walk.
    ///
    /// Nodes are reported by their position in the walk, which never depends
    /// on the stored sizes being right.
    pub(crate) fn validate(&self) -> Result<(), InvariantViolation> {
        let result = self.walk();
        if let Err(violation) = &result {
            log::debug!("red-black invariant broken: {violation}");
        }
        result
    }

    fn walk(&self) -> Result<(), InvariantViolation> {
        let allocated = self.allocated();
        let Some(root) = self.root() else {
            return if allocated == 0 {
                Ok(())
            } else {
                Err(InvariantViolation::LengthMismatch { allocated, counted: 0 })
            };
        };

        let root_node = self.node(root);
        if root_node.parent.is_some() {
            return Err(InvariantViolation::RootHasParent);
        }
        if root_node.color == Color::Red {
            return Err(InvariantViolation::RedRoot);
        }

        let mut stack: SmallVec<[Handle; 64]> = SmallVec::new();
        let mut current = Some(root);
        let mut rank = 0;
        let mut previous: Option<&K> = None;
        let mut leaf_black_height: Option<usize> = None;

        loop {
            while let Some(handle) = current {
                // More pending nodes than allocated ones means the links loop.
                if rank + stack.len() >= allocated {
                    return Err(InvariantViolation::LengthMismatch {
                        allocated,
                        counted: rank + stack.len() + 1,
                    });
                }
                stack.push(handle);
                current = self.node(handle).left;
            }
            let Some(handle) = stack.pop() else { break };
            let node = self.node(handle);

            for child in [node.left, node.right].into_iter().flatten() {
                let child_node = self.node(child);
                if child_node.parent != Some(handle) {
                    return Err(InvariantViolation::BrokenParentLink { rank });
                }
                if node.color == Color::Red && child_node.color == Color::Red {
                    return Err(InvariantViolation::RedChildOfRed { rank });
                }
            }

            let expected = 1 + self.size_of(node.left) + self.size_of(node.right);
            if node.size != expected {
                return Err(InvariantViolation::SizeMismatch {
                    rank,
                    stored: node.size,
                    expected,
                });
            }

            if node.left.is_none() || node.right.is_none() {
                let found = self.black_height(handle, allocated);
                match leaf_black_height {
                    None => leaf_black_height = Some(found),
                    Some(expected) if expected != found => {
                        return Err(InvariantViolation::BlackHeightMismatch { rank, expected, found });
                    }
                    Some(_) => {}
                }
            }

            if let Some(previous) = previous
                && self.comparator().compare(previous, &node.key) != Ordering::Less
            {
                return Err(InvariantViolation::OutOfOrder { rank: rank - 1 });
            }
            previous = Some(&node.key);

            rank += 1;
            current = node.right;
        }

        if rank == allocated {
            Ok(())
        } else {
            Err(InvariantViolation::LengthMismatch {
                allocated,
                counted: rank,
            })
        }
    }

    /// Black nodes from `handle` up to the root, both included.
    fn black_height(&self, handle: Handle, limit: usize) -> usize {
        let mut count = 0;
        let mut current = Some(handle);
        for _ in 0..=limit {
            let Some(handle) = current else { break };
            let node = self.node(handle);
            if node.color == Color::Black {
                count += 1;
            }
            current = node.parent;
        }
        count
    }
}
