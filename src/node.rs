//! Tree node representation.
//!
//! A [`Node`] carries one element, its persisted [`Color`] and three links.
//! The `left` and `right` links own their subtrees (the memory behind them
//! was produced by the tree's [`NodeAllocator`](crate::alloc::NodeAllocator)
//! and is released only through it). The `parent` link is a plain
//! navigation pointer and never decides when memory is reclaimed.

use std::ptr::NonNull;

/// Link to another node, `None` for an absent child or the root's parent.
pub(crate) type Link<T> = Option<NonNull<Node<T>>>;

// ============================================================================
//  Color
// ============================================================================

/// Persisted node color.
///
/// There are only two values. The "double-black" deficiency used while
/// rebalancing after a removal never lives in a node; see `tree::remove`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    /// Red node. Never the root, never the parent of another red node.
    Red,
    /// Black node. Absent children also count as black.
    Black,
}

impl Color {
    /// `true` for [`Color::Red`].
    #[inline]
    #[must_use]
    pub const fn is_red(self) -> bool {
        matches!(self, Self::Red)
    }

    /// `true` for [`Color::Black`].
    #[inline]
    #[must_use]
    pub const fn is_black(self) -> bool {
        matches!(self, Self::Black)
    }
}

// ============================================================================
//  Side
// ============================================================================

/// Which child slot of a parent a node occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Side {
    Left,
    Right,
}

impl Side {
    /// The mirror side.
    #[inline]
    pub(crate) const fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

// ============================================================================
//  Node
// ============================================================================

/// A single tree node.
///
/// Nodes are built by the tree and handed to a
/// [`NodeAllocator`](crate::alloc::NodeAllocator) for placement; allocators
/// only move them around and never look inside.
#[derive(Debug)]
pub struct Node<T> {
    pub(crate) value: T,
    pub(crate) color: Color,
    pub(crate) parent: Link<T>,
    pub(crate) left: Link<T>,
    pub(crate) right: Link<T>,
}

impl<T> Node<T> {
    /// A detached red node, the shape every insertion starts from.
    #[inline]
    pub(crate) const fn new_red(value: T) -> Self {
        Self {
            value,
            color: Color::Red,
            parent: None,
            left: None,
            right: None,
        }
    }

    /// The stored element.
    #[inline]
    #[must_use]
    pub const fn value(&self) -> &T {
        &self.value
    }

    /// The node's color.
    #[inline]
    #[must_use]
    pub const fn color(&self) -> Color {
        self.color
    }

    /// Left child, for structural inspection.
    #[inline]
    #[must_use]
    pub fn left(&self) -> Option<&Self> {
        // SAFETY: children are live as long as their parent is borrowed.
        self.left.map(|n| unsafe { &*n.as_ptr() })
    }

    /// Right child, for structural inspection.
    #[inline]
    #[must_use]
    pub fn right(&self) -> Option<&Self> {
        // SAFETY: children are live as long as their parent is borrowed.
        self.right.map(|n| unsafe { &*n.as_ptr() })
    }

    /// Consume the node, returning the stored element.
    #[inline]
    pub fn into_value(self) -> T {
        self.value
    }

    #[inline]
    pub(crate) const fn child(&self, side: Side) -> Link<T> {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    #[inline]
    pub(crate) const fn child_mut(&mut self, side: Side) -> &mut Link<T> {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }

    /// `true` when both links are occupied.
    #[inline]
    pub(crate) const fn has_two_children(&self) -> bool {
        self.left.is_some() && self.right.is_some()
    }
}

// ============================================================================
//  Raw link helpers
// ============================================================================
//
// All helpers below take raw node pointers. Callers guarantee that every
// pointer passed in is a live node owned by the same tree and that no Rust
// reference to any of those nodes is alive across the call.

/// Color of a possibly-absent node; absent nodes are black.
#[inline]
pub(crate) unsafe fn color_of<T>(link: Link<T>) -> Color {
    // SAFETY: caller guarantees `link`, if present, is live.
    link.map_or(Color::Black, |n| unsafe { (*n.as_ptr()).color })
}

/// `true` if `link` is present and red.
#[inline]
pub(crate) unsafe fn is_red<T>(link: Link<T>) -> bool {
    // SAFETY: forwarded caller contract.
    unsafe { color_of(link) }.is_red()
}

/// Set the color of a live node.
#[inline]
pub(crate) unsafe fn set_color<T>(node: NonNull<Node<T>>, color: Color) {
    // SAFETY: caller guarantees `node` is live and unaliased.
    unsafe { (*node.as_ptr()).color = color };
}

/// Parent link of a live node.
#[inline]
pub(crate) unsafe fn parent_of<T>(node: NonNull<Node<T>>) -> Link<T> {
    // SAFETY: caller guarantees `node` is live.
    unsafe { (*node.as_ptr()).parent }
}

/// Child link of a live node.
#[inline]
pub(crate) unsafe fn child_of<T>(node: NonNull<Node<T>>, side: Side) -> Link<T> {
    // SAFETY: caller guarantees `node` is live.
    unsafe { (*node.as_ptr()).child(side) }
}

/// Which side of `parent` holds `child`.
///
/// `child` must be one of `parent`'s children.
#[inline]
pub(crate) unsafe fn side_of<T>(parent: NonNull<Node<T>>, child: NonNull<Node<T>>) -> Side {
    // SAFETY: caller guarantees `parent` is live.
    let left = unsafe { (*parent.as_ptr()).left };
    if left == Some(child) {
        Side::Left
    } else {
        debug_assert_eq!(unsafe { (*parent.as_ptr()).right }, Some(child));
        Side::Right
    }
}

/// Store `child` in `parent`'s `side` slot and point `child` back at `parent`.
#[inline]
pub(crate) unsafe fn link_child<T>(parent: NonNull<Node<T>>, side: Side, child: Link<T>) {
    // SAFETY: caller guarantees both nodes are live and unaliased.
    unsafe {
        *(*parent.as_ptr()).child_mut(side) = child;
        if let Some(c) = child {
            (*c.as_ptr()).parent = Some(parent);
        }
    }
}

/// Leftmost node of the subtree rooted at `node`.
#[inline]
pub(crate) unsafe fn minimum<T>(mut node: NonNull<Node<T>>) -> NonNull<Node<T>> {
    // SAFETY: caller guarantees the subtree is live.
    while let Some(left) = unsafe { (*node.as_ptr()).left } {
        node = left;
    }
    node
}

/// Rightmost node of the subtree rooted at `node`.
#[inline]
pub(crate) unsafe fn maximum<T>(mut node: NonNull<Node<T>>) -> NonNull<Node<T>> {
    // SAFETY: caller guarantees the subtree is live.
    while let Some(right) = unsafe { (*node.as_ptr()).right } {
        node = right;
    }
    node
}

// ============================================================================
//  Tests
// ============================================================================
