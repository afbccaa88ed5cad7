//! Removal and the double-black fixup.
//!
//! Removing a black node leaves every path through its old position one
//! black node short. That deficiency ("double black") is tracked here as a
//! position, the pair `(parent, side)` plus whatever node `x` now sits in
//! that slot, and never as a color stored in a node. It exists only for the
//! duration of one [`RbTree::take`] call, and goes through
//! `Black -> DoubleBlack -> {Black, Red}` exactly once.

use std::cmp::Ordering;

use super::RbTree;
use crate::alloc::NodeAllocator;
use crate::node::{
    Color, Link, Side, child_of, color_of, is_red, minimum, parent_of, set_color, side_of,
};
use crate::tracing_helpers::{debug_log, trace_log};

/// Where a removal left its black deficiency.
struct Deficit<T> {
    /// The node now occupying the deficient slot, if any.
    x: Link<T>,

    /// Parent of the deficient slot, `None` when the slot is the root.
    parent: Link<T>,

    /// Which of `parent`'s slots is deficient.
    side: Side,
}

impl<T, C, A> RbTree<T, C, A>
where
    C: Fn(&T, &T) -> Ordering,
    A: NodeAllocator<T>,
{
    /// Remove the element equal to `value`, if any.
    ///
    /// Missing elements are a silent no-op.
    #[inline]
    pub fn remove(&mut self, value: &T) {
        drop(self.take(value));
    }

    /// Remove the element equal to `value` and hand it back.
    pub fn take(&mut self, value: &T) -> Option<T> {
        let node = self.find(value)?;

        // SAFETY: `node` and every node reached through links are live nodes
        // of this tree; no references into the graph are held.
        unsafe {
            let (removed, deficit) = if (*node.as_ptr()).has_two_children() {
                let right = child_of(node, Side::Right)?;
                let successor = minimum(right);
                let removed = color_of(Some(successor));
                let x = child_of(successor, Side::Right);

                // The successor moves, so the deficiency is anchored at its
                // old position: under its old parent, or under the successor
                // itself when it was `node`'s direct right child.
                let deficit = if successor == right {
                    Deficit { x, parent: Some(successor), side: Side::Right }
                } else {
                    Deficit { x, parent: parent_of(successor), side: Side::Left }
                };

                self.graft_successor(node, successor);
                (removed, deficit)
            } else {
                let removed = color_of(Some(node));
                let x = (*node.as_ptr()).left.or((*node.as_ptr()).right);
                let parent = parent_of(node);
                let side = parent.map_or(Side::Left, |p| side_of(p, node));

                self.splice(node, x);
                (removed, Deficit { x, parent, side })
            };

            if removed.is_black() {
                self.remove_fixup(deficit);
            }

            let n = node.as_ptr();
            (*n).parent = None;
            (*n).left = None;
            (*n).right = None;
            let released = self.alloc.free_node(node);

            self.len -= 1;
            debug_log!(len = self.len, "removed");
            Some(released.into_value())
        }
    }

    /// Pay back the black node a removal took from `d`'s position.
    ///
    /// Each pass looks at the sibling `s` of the deficient slot:
    ///
    /// 1. `s` red: rotate it above the parent so the deficient slot gets a
    ///    black sibling, then continue with cases 2-4.
    /// 2. `s` black with two black children: make `s` red. A red parent
    ///    absorbs the deficiency, otherwise it moves up to the parent.
    /// 3. `s` black, near nephew red, far nephew black: rotate the near
    ///    nephew above `s`, turning this into case 4.
    /// 4. `s` black, far nephew red: rotate `s` above the parent and recolor;
    ///    the deficiency is gone.
    ///
    /// Both mirrors run through the same code with `side` flipped.
    unsafe fn remove_fixup(&mut self, d: Deficit<T>) {
        let Deficit { mut x, mut parent, mut side } = d;

        // SAFETY: caller guarantees all links reachable from `parent` and `x`
        // are live nodes of this tree.
        unsafe {
            while let Some(p) = parent {
                if is_red(x) {
                    break;
                }

                let Some(mut sibling) = child_of(p, side.opposite()) else {
                    debug_assert!(false, "black deficiency without a sibling");
                    break;
                };

                if is_red(Some(sibling)) {
                    trace_log!(?side, "remove fixup case 1: red sibling");
                    set_color(sibling, color_of(Some(p)));
                    set_color(p, Color::Red);
                    self.rotate(p, side);
                    let Some(s) = child_of(p, side.opposite()) else {
                        debug_assert!(false, "red sibling had no black child");
                        break;
                    };
                    sibling = s;
                }

                let near = child_of(sibling, side);
                let far = child_of(sibling, side.opposite());

                if !is_red(near) && !is_red(far) {
                    set_color(sibling, Color::Red);
                    if is_red(Some(p)) {
                        trace_log!(?side, "remove fixup case 2: red parent absorbs");
                        set_color(p, Color::Black);
                        return;
                    }
                    trace_log!(?side, "remove fixup case 2: deficiency moves up");
                    x = Some(p);
                    parent = parent_of(p);
                    if let Some(gp) = parent {
                        side = side_of(gp, p);
                    }
                    continue;
                }

                if !is_red(far) {
                    trace_log!(?side, "remove fixup case 3: near nephew red");
                    if let Some(n) = near {
                        set_color(n, Color::Black);
                    }
                    set_color(sibling, Color::Red);
                    sibling = self.rotate(sibling, side.opposite());
                }

                trace_log!(?side, "remove fixup case 4: far nephew red");
                set_color(sibling, color_of(Some(p)));
                set_color(p, Color::Black);
                if let Some(f) = child_of(sibling, side.opposite()) {
                    set_color(f, Color::Black);
                }
                self.rotate(p, side);
                return;
            }

            // Reached the root, hit a red node, or ran out of siblings: one
            // black here settles it.
            if let Some(x) = x {
                set_color(x, Color::Black);
            }
        }
    }
}
