//! Comparator-driven descent.

use std::cmp::Ordering;

use super::RbTree;
use crate::alloc::NodeAllocator;
use crate::node::{Link, Side};

/// Outcome of [`RbTree::locate_insertion_point`].
#[derive(Debug)]
pub(super) enum InsertionPoint<T> {
    /// An equal element is already stored in this node.
    Found,

    /// The element belongs in `parent`'s `side` slot, which is empty.
    /// `parent` is `None` only for an empty tree.
    Vacant { parent: Link<T>, side: Side },
}

impl<T, C, A> RbTree<T, C, A>
where
    C: Fn(&T, &T) -> Ordering,
    A: NodeAllocator<T>,
{
    /// The node holding an element equal to `value`.
    pub(super) fn find(&self, value: &T) -> Link<T> {
        let mut cur = self.root;
        while let Some(node) = cur {
            // SAFETY: every node reachable from the root is live.
            let n = unsafe { &*node.as_ptr() };
            cur = match (self.cmp)(value, &n.value) {
                Ordering::Less => n.left,
                Ordering::Greater => n.right,
                Ordering::Equal => return Some(node),
            };
        }
        None
    }

    /// Same descent as [`find`](Self::find), remembering the last node
    /// visited and the direction of the final comparison so insertion does
    /// not search twice.
    pub(super) fn locate_insertion_point(&self, value: &T) -> InsertionPoint<T> {
        let mut parent = None;
        let mut side = Side::Left;
        let mut cur = self.root;

        while let Some(node) = cur {
            // SAFETY: every node reachable from the root is live.
            let n = unsafe { &*node.as_ptr() };
            side = match (self.cmp)(value, &n.value) {
                Ordering::Less => Side::Left,
                Ordering::Greater => Side::Right,
                Ordering::Equal => return InsertionPoint::Found,
            };
            parent = Some(node);
            cur = n.child(side);
        }

        InsertionPoint::Vacant { parent, side }
    }
}
