//! Node allocation abstraction for [`RbTree`](crate::RbTree).
//!
//! This module provides the [`NodeAllocator`] trait that abstracts how nodes
//! are placed in memory and released again. The tree never touches raw
//! memory itself: every node it creates goes through
//! [`NodeAllocator::alloc_node`] and every node it destroys goes through
//! [`NodeAllocator::free_node`].
//!
//! Two implementations ship with the crate:
//!
//! - [`HeapAllocator`]: one `Box` per node, the default.
//! - [`PoolAllocator`]: recycles released node slots through a free list and
//!   can be capped at a maximum number of live nodes.

use std::fmt as StdFmt;
use std::mem::MaybeUninit;
use std::ptr::NonNull;

use crate::node::Node;

// ============================================================================
//  AllocError
// ============================================================================

/// Errors an allocator can report from [`NodeAllocator::alloc_node`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllocError {
    /// The allocator's configured live-node limit is reached.
    LimitReached {
        /// The configured limit.
        limit: usize,
    },

    /// The backing memory source refused the request.
    OutOfMemory,
}

impl StdFmt::Display for AllocError {
    fn fmt(&self, f: &mut StdFmt::Formatter<'_>) -> StdFmt::Result {
        match self {
            Self::LimitReached { limit } => {
                write!(f, "node limit reached ({limit} live nodes)")
            }

            Self::OutOfMemory => write!(f, "out of memory"),
        }
    }
}

impl std::error::Error for AllocError {}

// ============================================================================
//  NodeAllocator
// ============================================================================

/// Trait for allocating and releasing tree nodes.
///
/// Implementations must guarantee:
///
/// 1. **Pointer stability**: a pointer returned by `alloc_node` stays valid,
///    and the node behind it does not move, until it is passed to
///    `free_node` (or the allocator is dropped).
///
/// 2. **Provenance**: returned pointers are valid for reads and writes of a
///    whole `Node<T>`.
///
/// # Failure
///
/// `alloc_node` may refuse with an [`AllocError`]. The tree treats this as
/// fatal on [`RbTree::insert`](crate::RbTree::insert) and reports it on
/// [`RbTree::try_insert`](crate::RbTree::try_insert); it never retries.
pub trait NodeAllocator<T> {
    /// Place `node` in memory and return a stable pointer to it.
    ///
    /// # Errors
    ///
    /// Returns an [`AllocError`] when no memory can be provided. `node` is
    /// dropped in that case.
    fn alloc_node(&mut self, node: Node<T>) -> Result<NonNull<Node<T>>, AllocError>;

    /// Release a node and hand its contents back.
    ///
    /// # Safety
    ///
    /// - `ptr` must have been returned by `alloc_node` on this allocator and
    ///   must not have been released already.
    /// - No reference to the node may outlive this call; the pointer is
    ///   dangling afterwards.
    unsafe fn free_node(&mut self, ptr: NonNull<Node<T>>) -> Node<T>;
}

/// Borrowed allocators work too, so several trees (or a test) can share one.
impl<T, A: NodeAllocator<T> + ?Sized> NodeAllocator<T> for &mut A {
    #[inline]
    fn alloc_node(&mut self, node: Node<T>) -> Result<NonNull<Node<T>>, AllocError> {
        (**self).alloc_node(node)
    }

    #[inline]
    unsafe fn free_node(&mut self, ptr: NonNull<Node<T>>) -> Node<T> {
        // SAFETY: forwarded caller contract.
        unsafe { (**self).free_node(ptr) }
    }
}

// ============================================================================
//  HeapAllocator
// ============================================================================

/// General-heap allocator: one `Box` per node.
///
/// Allocation failure in the global allocator aborts inside `Box::new`, so
/// this allocator never returns an error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeapAllocator;

impl<T> NodeAllocator<T> for HeapAllocator {
    #[inline]
    fn alloc_node(&mut self, node: Node<T>) -> Result<NonNull<Node<T>>, AllocError> {
        Ok(NonNull::from(Box::leak(Box::new(node))))
    }

    #[inline]
    unsafe fn free_node(&mut self, ptr: NonNull<Node<T>>) -> Node<T> {
        // SAFETY: `ptr` came from `Box::leak` in `alloc_node` and is released once.
        *unsafe { Box::from_raw(ptr.as_ptr()) }
    }
}

// ============================================================================
//  PoolAllocator
// ============================================================================

/// Slot-recycling allocator.
///
/// Released nodes leave their heap slot on a free list; the next allocation
/// reuses it instead of going back to the global allocator. Slots are
/// `Box<MaybeUninit<Node<T>>>`, so each one keeps a fixed heap address for
/// its whole lifetime.
///
/// An optional limit caps the number of live nodes; allocations beyond it
/// fail with [`AllocError::LimitReached`].
///
/// # Example
///
/// ```rust
/// use redblack::{PoolAllocator, RbTree};
///
/// let mut tree = RbTree::with_allocator(PoolAllocator::with_limit(2));
/// assert_eq!(tree.try_insert(1), Ok(true));
/// assert_eq!(tree.try_insert(2), Ok(true));
/// assert!(tree.try_insert(3).is_err());
///
/// tree.remove(&1);
/// assert_eq!(tree.allocator().pooled(), 1);
/// assert_eq!(tree.try_insert(3), Ok(true));
/// assert_eq!(tree.allocator().pooled(), 0);
/// ```
pub struct PoolAllocator<T> {
    /// Released slots, contents already moved out.
    free: Vec<Box<MaybeUninit<Node<T>>>>,

    /// Nodes currently handed out.
    live: usize,

    /// Slots ever obtained from the global allocator.
    total: usize,

    /// Maximum number of live nodes, if any.
    limit: Option<usize>,
}

impl<T> PoolAllocator<T> {
    /// Create an unbounded pool.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            free: Vec::new(),
            live: 0,
            total: 0,
            limit: None,
        }
    }

    /// Create a pool that refuses to hand out more than `limit` live nodes.
    #[must_use]
    pub const fn with_limit(limit: usize) -> Self {
        Self {
            free: Vec::new(),
            live: 0,
            total: 0,
            limit: Some(limit),
        }
    }

    /// Create an unbounded pool with `capacity` slots allocated up front.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let free: Vec<_> = (0..capacity).map(|_| Box::new(MaybeUninit::uninit())).collect();
        Self {
            free,
            live: 0,
            total: capacity,
            limit: None,
        }
    }

    /// Number of nodes currently handed out.
    #[inline]
    #[must_use]
    pub const fn live(&self) -> usize {
        self.live
    }

    /// Number of released slots waiting for reuse.
    #[inline]
    #[must_use]
    pub fn pooled(&self) -> usize {
        self.free.len()
    }

    /// Number of slots ever obtained from the global allocator.
    #[inline]
    #[must_use]
    pub const fn total_allocated(&self) -> usize {
        self.total
    }

    /// The configured live-node limit.
    #[inline]
    #[must_use]
    pub const fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// Drop every pooled slot, returning its memory to the global allocator.
    pub fn shrink(&mut self) {
        self.total -= self.free.len();
        self.free = Vec::new();
    }
}

impl<T> Default for PoolAllocator<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> StdFmt::Debug for PoolAllocator<T> {
    fn fmt(&self, f: &mut StdFmt::Formatter<'_>) -> StdFmt::Result {
        f.debug_struct("PoolAllocator")
            .field("live", &self.live)
            .field("pooled", &self.free.len())
            .field("total", &self.total)
            .field("limit", &self.limit)
            .finish()
    }
}

// SAFETY: pooled slots hold no live node, so their stale links are never
// followed; the pool only owns heap memory and moving it moves that memory.
unsafe impl<T: Send> Send for PoolAllocator<T> {}

impl<T> NodeAllocator<T> for PoolAllocator<T> {
    fn alloc_node(&mut self, node: Node<T>) -> Result<NonNull<Node<T>>, AllocError> {
        if let Some(limit) = self.limit {
            if self.live >= limit {
                return Err(AllocError::LimitReached { limit });
            }
        }

        let mut slot = self.free.pop().unwrap_or_else(|| {
            self.total += 1;
            Box::new(MaybeUninit::uninit())
        });
        slot.write(node);
        self.live += 1;

        // `MaybeUninit<Node<T>>` has the layout of `Node<T>`, and the slot
        // was just initialised.
        Ok(NonNull::from(Box::leak(slot)).cast::<Node<T>>())
    }

    unsafe fn free_node(&mut self, ptr: NonNull<Node<T>>) -> Node<T> {
        // SAFETY: `ptr` came from `Box::leak` of a `Box<MaybeUninit<Node<T>>>`
        // in `alloc_node` and holds an initialised node.
        let slot: Box<MaybeUninit<Node<T>>> =
            unsafe { Box::from_raw(ptr.as_ptr().cast::<MaybeUninit<Node<T>>>()) };
        // SAFETY: initialised by `alloc_node`; the slot is treated as
        // uninitialised again from here on.
        let node = unsafe { slot.assume_init_read() };

        debug_assert!(self.live > 0, "pool live count underflow");
        self.live -= 1;
        self.free.push(slot);
        node
    }
}

// ============================================================================
//  Tests
// ============================================================================
