//! Filepath: src/tree.rs
//! [`RbTree`] - a generic red-black tree.
//!
//! The handle owns the root link, the element count, the comparator and the
//! node allocator. The algorithms live in submodules:
//!
//! - `search`: ordered lookup and insertion-point search
//! - `structure`: splice, rotation and successor grafting
//! - `insert`: red leaf placement and the red-red fixup
//! - `remove`: structural removal and the double-black fixup
//! - `validate`: invariant checker and diagnostics

use std::cmp::Ordering;
use std::fmt as StdFmt;
use std::marker::PhantomData;

use crate::alloc::{HeapAllocator, NodeAllocator};
use crate::node::{Link, Node};
use crate::tracing_helpers::debug_log;

mod insert;
mod remove;
mod search;
mod structure;
mod validate;

pub use validate::InvariantViolation;

/// Comparator type used when none is supplied: the element's [`Ord`] impl.
pub type NaturalOrder<T> = fn(&T, &T) -> Ordering;

// ============================================================================
//  RbTree
// ============================================================================

/// A red-black tree of unique elements.
///
/// # Type Parameters
///
/// - `T` - element type
/// - `C` - comparator, any `Fn(&T, &T) -> Ordering`; defaults to [`Ord::cmp`]
/// - `A` - node allocator (must implement [`NodeAllocator`]); defaults to
///   [`HeapAllocator`]
///
/// # Invariants
///
/// On entry to and exit from every public method:
///
/// 1. In-order sequence is strictly increasing under `C`.
/// 2. No red node has a red child.
/// 3. Every root-to-leaf path crosses the same number of black nodes.
/// 4. The root, if any, is black.
/// 5. [`len`](Self::len) equals the number of reachable nodes.
///
/// [`check_invariants`](Self::check_invariants) verifies all of them.
///
/// # Thread Safety
///
/// The tree has no internal synchronization. It is `Send` when its parts
/// are, and never `Sync`; wrap it in a lock to share it.
///
/// # Example
///
/// ```rust
/// use redblack::RbTree;
///
/// let mut tree = RbTree::new();
/// for v in [50, 30, 70, 20] {
///     tree.insert(v);
/// }
/// tree.insert(30); // duplicate: no-op
/// assert_eq!(tree.size(), 4);
///
/// tree.remove(&30);
/// tree.remove(&99); // absent: no-op
/// assert!(!tree.contains(&30));
/// assert_eq!(tree.size(), 3);
/// assert!(tree.check_invariants().is_ok());
/// ```
pub struct RbTree<T, C = NaturalOrder<T>, A = HeapAllocator>
where
    C: Fn(&T, &T) -> Ordering,
    A: NodeAllocator<T>,
{
    /// Root node, `None` when empty. Owns the whole node graph.
    root: Link<T>,

    /// Number of reachable nodes.
    len: usize,

    /// Strict weak ordering over elements.
    cmp: C,

    /// Source and sink of every node.
    alloc: A,

    /// The tree owns `Node<T>` values through raw links.
    _marker: PhantomData<Box<Node<T>>>,
}

impl<T: Ord> RbTree<T> {
    /// Create an empty tree ordered by `T`'s [`Ord`] impl.
    #[must_use]
    pub fn new() -> Self {
        Self::with_comparator_and_allocator(<T as Ord>::cmp, HeapAllocator)
    }

    /// Create an empty tree with an optional comparator.
    ///
    /// `None` selects natural ordering.
    #[must_use]
    pub fn create(comparator: Option<NaturalOrder<T>>) -> Self {
        Self::with_comparator_and_allocator(comparator.unwrap_or(<T as Ord>::cmp), HeapAllocator)
    }
}

impl<T: Ord, A: NodeAllocator<T>> RbTree<T, NaturalOrder<T>, A> {
    /// Create an empty naturally-ordered tree drawing nodes from `alloc`.
    #[must_use]
    pub fn with_allocator(alloc: A) -> Self {
        Self::with_comparator_and_allocator(<T as Ord>::cmp, alloc)
    }
}

impl<T, C> RbTree<T, C, HeapAllocator>
where
    C: Fn(&T, &T) -> Ordering,
{
    /// Create an empty tree ordered by `cmp`.
    ///
    /// ```rust
    /// use redblack::RbTree;
    ///
    /// let mut tree = RbTree::with_comparator(|a: &i32, b: &i32| b.cmp(a));
    /// for v in [5, 3, 7] {
    ///     tree.insert(v);
    /// }
    /// assert_eq!(tree.first(), Some(&7));
    /// ```
    #[must_use]
    pub const fn with_comparator(cmp: C) -> Self {
        Self::with_comparator_and_allocator(cmp, HeapAllocator)
    }
}

impl<T, C, A> RbTree<T, C, A>
where
    C: Fn(&T, &T) -> Ordering,
    A: NodeAllocator<T>,
{
    /// Create an empty tree with both collaborators injected.
    #[must_use]
    pub const fn with_comparator_and_allocator(cmp: C, alloc: A) -> Self {
        Self {
            root: None,
            len: 0,
            cmp,
            alloc,
            _marker: PhantomData,
        }
    }

    /// Number of elements.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Number of elements. Same as [`len`](Self::len).
    #[inline]
    #[must_use]
    pub const fn size(&self) -> usize {
        self.len
    }

    /// `true` when the tree holds no elements.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Shared access to the node allocator.
    #[inline]
    #[must_use]
    pub const fn allocator(&self) -> &A {
        &self.alloc
    }

    /// The root node, for structural inspection.
    #[inline]
    #[must_use]
    pub fn root_node(&self) -> Option<&Node<T>> {
        // SAFETY: the root is live while `self` is borrowed.
        self.root.map(|r| unsafe { &*r.as_ptr() })
    }

    /// `true` if an element equal to `value` is present.
    #[inline]
    #[must_use]
    pub fn contains(&self, value: &T) -> bool {
        self.find(value).is_some()
    }

    /// The stored element equal to `value`.
    #[must_use]
    pub fn get(&self, value: &T) -> Option<&T> {
        // SAFETY: found nodes are live while `self` is borrowed.
        self.find(value).map(|n| unsafe { &(*n.as_ptr()).value })
    }

    /// The least element under the tree's comparator.
    #[must_use]
    pub fn first(&self) -> Option<&T> {
        // SAFETY: nodes reachable from the root are live while `self` is borrowed.
        self.root
            .map(|r| unsafe { &(*crate::node::minimum(r).as_ptr()).value })
    }

    /// The greatest element under the tree's comparator.
    #[must_use]
    pub fn last(&self) -> Option<&T> {
        // SAFETY: nodes reachable from the root are live while `self` is borrowed.
        self.root
            .map(|r| unsafe { &(*crate::node::maximum(r).as_ptr()).value })
    }

    /// Remove every element, releasing each node through the allocator.
    pub fn clear(&mut self) {
        self.teardown();
    }

    /// Release every node.
    ///
    /// Flattens the tree by right rotations while walking it, so it needs no
    /// stack and no valid parent links. Each node is fully detached before
    /// it reaches the allocator.
    fn teardown(&mut self) {
        debug_log!(len = self.len, "tearing down tree");

        let mut cur = self.root.take();
        while let Some(node) = cur {
            // SAFETY: `node` is reachable from the old root and no longer
            // from `self.root`; each node is visited and released once.
            unsafe {
                let n = node.as_ptr();
                if let Some(left) = (*n).left {
                    (*n).left = (*left.as_ptr()).right;
                    (*left.as_ptr()).right = Some(node);
                    cur = Some(left);
                } else {
                    cur = (*n).right;
                    (*n).parent = None;
                    (*n).right = None;
                    drop(self.alloc.free_node(node));
                }
            }
        }
        self.len = 0;
    }
}

impl<T: Ord> Default for RbTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, C, A> Drop for RbTree<T, C, A>
where
    C: Fn(&T, &T) -> Ordering,
    A: NodeAllocator<T>,
{
    fn drop(&mut self) {
        self.teardown();
    }
}

impl<T, C, A> StdFmt::Debug for RbTree<T, C, A>
where
    C: Fn(&T, &T) -> Ordering,
    A: NodeAllocator<T>,
{
    fn fmt(&self, f: &mut StdFmt::Formatter<'_>) -> StdFmt::Result {
        f.debug_struct("RbTree")
            .field("len", &self.len)
            .field("height", &self.height())
            .field("black_height", &self.black_height())
            .finish_non_exhaustive()
    }
}

// SAFETY: the tree exclusively owns its nodes; moving it to another thread
// moves every `T`, the comparator and the allocator with it.
unsafe impl<T, C, A> Send for RbTree<T, C, A>
where
    T: Send,
    C: Fn(&T, &T) -> Ordering + Send,
    A: NodeAllocator<T> + Send,
{
}

// ============================================================================
//  Tests
// ============================================================================
