//! # `redblack`
//!
//! A generic red-black tree with an injectable comparator and node
//! allocator.
//!
//! Search, insertion and removal all run in O(log n). Insertion repairs
//! red-red violations with recoloring and at most two rotations; removal
//! runs the full double-black fixup.
//!
//! ## Contract
//!
//! | Operation | Behavior |
//! |-----------|----------|
//! | `insert` of a present element | no-op, size unchanged |
//! | `remove` of an absent element | no-op, size unchanged |
//! | allocator refuses a node | `insert` aborts, `try_insert` returns `Err` |
//!
//! Iteration order is not part of the public contract, and the tree
//! performs no internal synchronization.
//!
//! ## Example
//!
//! ```rust
//! use redblack::RbTree;
//!
//! let mut tree = RbTree::new();
//! for v in [10, 5, 15] {
//!     tree.insert(v);
//! }
//! assert!(tree.contains(&5));
//! assert_eq!(tree.size(), 3);
//!
//! tree.remove(&10);
//! assert!(!tree.contains(&10));
//! assert!(tree.check_invariants().is_ok());
//! ```
//!
//! ## Memory
//!
//! Every node is obtained from and returned to a [`NodeAllocator`]. The
//! default [`HeapAllocator`] boxes each node; [`PoolAllocator`] recycles
//! released slots and can cap the number of live nodes.
//!
//! ## Logging
//!
//! Build with the `tracing` feature to emit `tracing` events for rotations,
//! fixup cases, inserts, removals and teardown.

#![deny(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

mod tracing_helpers;

pub mod alloc;
pub mod node;
pub mod tree;

pub use alloc::{AllocError, HeapAllocator, NodeAllocator, PoolAllocator};
pub use node::{Color, Node};
pub use tree::{InvariantViolation, NaturalOrder, RbTree};
