//! A red-black order-statistic set for Rust.
//!
//! This crate provides [`OrderedSet`], an ordered set of unique keys backed by
//! a red-black tree in which every node records the size of its subtree. On top
//! of the usual set operations it answers two order-statistic queries in
//! O(log n):
//!
//! - [`find_by_order`](OrderedSet::find_by_order) - the key at a given sorted position
//! - [`order_of_key`](OrderedSet::order_of_key) - how many keys sort strictly before a given key
//! - Indexing by [`Rank`] - e.g., `set[Rank(0)]` for the smallest key
//!
//! # Example
//!
//! ```
//! use rbos_tree::{OrderedSet, Rank};
//!
//! let mut set = OrderedSet::new();
//! for key in [12, 505, 30, 1000, 10000, 100] {
//!     set.insert(key);
//! }
//!
//! // Select: the key at rank 3.
//! assert_eq!(set.find_by_order(3).key(), Some(&505));
//! assert_eq!(set[Rank(0)], 12);
//!
//! // Rank: how many keys are smaller, present or not.
//! assert_eq!(set.order_of_key(&505), 3);
//! assert_eq!(set.order_of_key(&13), 1);
//!
//! // Cursors walk the set in both directions.
//! let mut cursor = set.erase(&100);
//! assert_eq!(cursor.key(), Some(&505));
//! cursor.move_prev();
//! assert_eq!(cursor.key(), Some(&30));
//! ```
//!
//! # Features
//!
//! - **`no_std` compatible** - Only requires `alloc`, no standard library dependency
//! - **Custom orderings** - Any [`Compare`] implementation, closures included
//! - **Stable cursors** - A [`Position`] survives unrelated insertions and removals
//! - **Self-checking** - [`OrderedSet::check_invariants`] verifies the whole structure
//!
//! # Implementation
//!
//! Nodes live in an arena and link to each other by index, so the tree needs no
//! unsafe code. An absent link plays the part of the black nil leaf. Insertion
//! and removal keep subtree sizes exact along the way, and rotations repair the
//! two sizes they disturb.

#![no_std]
// These forbid rules and lint groups are meant to be very restrictive.
#![forbid(unsafe_code)]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]
// Enable coverage attributes for nightly builds.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

extern crate alloc;

mod dump;
mod error;
mod order_statistic;
mod raw;

pub mod compare;
pub mod ordered_set;

pub use compare::{Compare, Natural};
pub use dump::Dump;
pub use error::InvariantViolation;
pub use order_statistic::Rank;
pub use ordered_set::{Cursor, IntoIter, Iter, OrderedSet, Position};
