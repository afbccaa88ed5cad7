//! Invariant checking and shape diagnostics.

use std::cmp::Ordering;
use std::fmt as StdFmt;
use std::ptr::NonNull;

use super::RbTree;
use crate::alloc::NodeAllocator;
use crate::node::{Link, Node};

// ============================================================================
//  InvariantViolation
// ============================================================================

/// A broken red-black invariant, as reported by
/// [`RbTree::check_invariants`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    /// An element is not strictly between its ancestors' bounds.
    OrderViolated,

    /// A red node has a red child.
    RedRed,

    /// Two subtrees of one node have different black heights.
    BlackHeightMismatch {
        /// Black height of the left subtree.
        left: usize,
        /// Black height of the right subtree.
        right: usize,
    },

    /// The root is red.
    RedRoot,

    /// The recorded length differs from the number of reachable nodes.
    LenMismatch {
        /// Value of [`RbTree::len`].
        recorded: usize,
        /// Nodes actually reachable from the root.
        counted: usize,
    },

    /// A child's parent link does not point at its parent, or the root has
    /// a parent.
    BrokenParentLink,
}

impl StdFmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut StdFmt::Formatter<'_>) -> StdFmt::Result {
        match self {
            Self::OrderViolated => write!(f, "elements out of order"),

            Self::RedRed => write!(f, "red node with a red child"),

            Self::BlackHeightMismatch { left, right } => {
                write!(f, "black height mismatch (left {left}, right {right})")
            }

            Self::RedRoot => write!(f, "root is red"),

            Self::LenMismatch { recorded, counted } => {
                write!(f, "len is {recorded} but {counted} nodes are reachable")
            }

            Self::BrokenParentLink => write!(f, "parent link inconsistent"),
        }
    }
}

impl std::error::Error for InvariantViolation {}

// ============================================================================
//  Checks
// ============================================================================

impl<T, C, A> RbTree<T, C, A>
where
    C: Fn(&T, &T) -> Ordering,
    A: NodeAllocator<T>,
{
    /// Verify every red-black invariant plus parent-link consistency.
    ///
    /// Runs in O(n). Meant for tests and debugging.
    ///
    /// # Errors
    ///
    /// Returns the first [`InvariantViolation`] found.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        let Some(root) = self.root else {
            return if self.len == 0 {
                Ok(())
            } else {
                Err(InvariantViolation::LenMismatch { recorded: self.len, counted: 0 })
            };
        };

        // SAFETY: the root is live while `self` is borrowed.
        let root_ref = unsafe { &*root.as_ptr() };
        if root_ref.parent.is_some() {
            return Err(InvariantViolation::BrokenParentLink);
        }
        if root_ref.color.is_red() {
            return Err(InvariantViolation::RedRoot);
        }

        let mut counted = 0;
        self.check_subtree(root, None, None, &mut counted)?;

        if counted != self.len {
            return Err(InvariantViolation::LenMismatch { recorded: self.len, counted });
        }
        Ok(())
    }

    /// Check the subtree at `node`, whose elements must lie strictly between
    /// `lower` and `upper`. Returns its black height, counting the absent
    /// leaves below it as one.
    fn check_subtree(
        &self,
        node: NonNull<Node<T>>,
        lower: Option<&T>,
        upper: Option<&T>,
        counted: &mut usize,
    ) -> Result<usize, InvariantViolation> {
        // SAFETY: reachable nodes are live while `self` is borrowed.
        let n = unsafe { &*node.as_ptr() };
        *counted += 1;

        if lower.is_some_and(|lo| (self.cmp)(lo, &n.value) != Ordering::Less)
            || upper.is_some_and(|hi| (self.cmp)(&n.value, hi) != Ordering::Less)
        {
            return Err(InvariantViolation::OrderViolated);
        }

        let left = self.check_child(node, n.left, lower, Some(&n.value), counted)?;
        let right = self.check_child(node, n.right, Some(&n.value), upper, counted)?;

        if left != right {
            return Err(InvariantViolation::BlackHeightMismatch { left, right });
        }

        Ok(left + usize::from(n.color.is_black()))
    }

    fn check_child(
        &self,
        parent: NonNull<Node<T>>,
        child: Link<T>,
        lower: Option<&T>,
        upper: Option<&T>,
        counted: &mut usize,
    ) -> Result<usize, InvariantViolation> {
        let Some(c) = child else {
            return Ok(1);
        };

        // SAFETY: reachable nodes are live while `self` is borrowed.
        let (c_ref, p_ref) = unsafe { (&*c.as_ptr(), &*parent.as_ptr()) };
        if c_ref.parent != Some(parent) {
            return Err(InvariantViolation::BrokenParentLink);
        }
        if p_ref.color.is_red() && c_ref.color.is_red() {
            return Err(InvariantViolation::RedRed);
        }

        self.check_subtree(c, lower, upper, counted)
    }

    // ========================================================================
    //  Diagnostics
    // ========================================================================

    /// Number of nodes on the longest root-to-leaf path; 0 when empty.
    #[must_use]
    pub fn height(&self) -> usize {
        fn depth<T>(link: Link<T>) -> usize {
            // SAFETY: reachable nodes are live while the tree is borrowed.
            link.map_or(0, |n| unsafe {
                let n = &*n.as_ptr();
                1 + depth(n.left).max(depth(n.right))
            })
        }
        depth(self.root)
    }

    /// Black nodes on the leftmost root-to-leaf path; 0 when empty.
    ///
    /// Equals the black height of every path while the invariants hold.
    #[must_use]
    pub fn black_height(&self) -> usize {
        let mut count = 0;
        let mut cur = self.root;
        while let Some(node) = cur {
            // SAFETY: reachable nodes are live while `self` is borrowed.
            let n = unsafe { &*node.as_ptr() };
            count += usize::from(n.color.is_black());
            cur = n.left;
        }
        count
    }
}
