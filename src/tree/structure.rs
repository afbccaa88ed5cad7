//! Structural primitives: splice, rotation and successor grafting.
//!
//! These only rewrite links. None of them compares elements, changes `len`,
//! or releases memory, and all of them preserve the in-order sequence.
//!
//! # Safety
//!
//! Every function here takes raw node pointers. Callers guarantee that each
//! pointer is a live node of this tree and that no reference into the node
//! graph is held across the call.

use std::cmp::Ordering;
use std::ptr::NonNull;

use super::RbTree;
use crate::alloc::NodeAllocator;
use crate::node::{Link, Node, Side, child_of, link_child, parent_of, set_color, side_of};
use crate::tracing_helpers::trace_log;

impl<T, C, A> RbTree<T, C, A>
where
    C: Fn(&T, &T) -> Ordering,
    A: NodeAllocator<T>,
{
    /// Put `child` (possibly nothing) where `node` is.
    ///
    /// `child` is reparented to `node`'s parent and the parent's slot (or the
    /// root) is rewritten. `node` keeps its own links and is not released.
    pub(super) unsafe fn splice(&mut self, node: NonNull<Node<T>>, child: Link<T>) {
        // SAFETY: caller contract.
        unsafe {
            match parent_of(node) {
                Some(parent) => {
                    let side = side_of(parent, node);
                    link_child(parent, side, child);
                }
                None => {
                    self.root = child;
                    if let Some(c) = child {
                        (*c.as_ptr()).parent = None;
                    }
                }
            }
        }
    }

    /// Rotate about `node` toward `dir`, returning the node that rose.
    ///
    /// `Side::Left` is a left rotation (the right child rises), `Side::Right`
    /// a right rotation (the left child rises). The rising child's inner
    /// subtree crosses over to `node`.
    pub(super) unsafe fn rotate(&mut self, node: NonNull<Node<T>>, dir: Side) -> NonNull<Node<T>> {
        // SAFETY: caller contract.
        unsafe {
            let Some(pivot) = child_of(node, dir.opposite()) else {
                debug_assert!(false, "rotation needs a child on the rising side");
                return node;
            };
            trace_log!(?dir, "rotate");

            let inner = child_of(pivot, dir);
            link_child(node, dir.opposite(), inner);
            self.splice(node, Some(pivot));
            link_child(pivot, dir, Some(node));
            pivot
        }
    }

    /// Move `successor` into the position of `node`, which has two children.
    ///
    /// `successor` must be the leftmost node of `node`'s right subtree. When
    /// it is deeper than the direct right child, its right child first takes
    /// its old slot. `successor` then adopts both of `node`'s subtrees and
    /// its color, and replaces `node` under `node`'s parent. `node` ends up
    /// unreachable with stale links.
    pub(super) unsafe fn graft_successor(&mut self, node: NonNull<Node<T>>, successor: NonNull<Node<T>>) {
        // SAFETY: caller contract.
        unsafe {
            debug_assert!((*node.as_ptr()).has_two_children());
            debug_assert!((*successor.as_ptr()).left.is_none());

            if parent_of(successor) != Some(node) {
                self.splice(successor, child_of(successor, Side::Right));
                link_child(successor, Side::Right, child_of(node, Side::Right));
            }
            link_child(successor, Side::Left, child_of(node, Side::Left));
            set_color(successor, (*node.as_ptr()).color);
            self.splice(node, Some(successor));
        }
    }
}
