//! Insertion and the red-red fixup.

use std::alloc::{Layout, handle_alloc_error};
use std::cmp::Ordering;
use std::ptr::NonNull;

use super::RbTree;
use super::search::InsertionPoint;
use crate::alloc::{AllocError, NodeAllocator};
use crate::node::{Color, Node, child_of, is_red, link_child, parent_of, set_color, side_of};
use crate::tracing_helpers::{debug_log, trace_log, warn_log};

impl<T, C, A> RbTree<T, C, A>
where
    C: Fn(&T, &T) -> Ordering,
    A: NodeAllocator<T>,
{
    /// Insert `value` unless an equal element is already present.
    ///
    /// Duplicates are a silent no-op: the stored element is kept, `value`
    /// is dropped and the size does not change.
    ///
    /// # Aborts
    ///
    /// If the allocator refuses to provide a node the process is aborted via
    /// [`handle_alloc_error`]. Use [`try_insert`](Self::try_insert) to
    /// observe the failure instead.
    pub fn insert(&mut self, value: T) {
        if let Err(_err) = self.try_insert(value) {
            warn_log!(error = %_err, "node allocation failed");
            handle_alloc_error(Layout::new::<Node<T>>());
        }
    }

    /// Insert `value`, reporting what happened.
    ///
    /// Returns `Ok(true)` for a fresh insertion and `Ok(false)` when an equal
    /// element was already present.
    ///
    /// # Errors
    ///
    /// Returns the allocator's [`AllocError`] if no node could be obtained.
    /// The tree is unchanged in that case.
    pub fn try_insert(&mut self, value: T) -> Result<bool, AllocError> {
        let (parent, side) = match self.locate_insertion_point(&value) {
            InsertionPoint::Found => return Ok(false),
            InsertionPoint::Vacant { parent, side } => (parent, side),
        };

        let node = self.alloc.alloc_node(Node::new_red(value))?;

        // SAFETY: `node` is freshly allocated and `parent` is a live node of
        // this tree; nothing else references either.
        unsafe {
            match parent {
                None => {
                    set_color(node, Color::Black);
                    self.root = Some(node);
                }
                Some(parent) => {
                    link_child(parent, side, Some(node));
                    self.insert_fixup(node);
                }
            }
        }

        self.len += 1;
        debug_log!(len = self.len, "inserted");
        Ok(true)
    }

    /// Restore the red-black invariants after attaching the red node `cur`.
    ///
    /// Walks toward the root while `cur` and its parent are both red. A red
    /// uncle pushes the violation two levels up by recoloring; a black (or
    /// missing) uncle is resolved in place by one or two rotations.
    unsafe fn insert_fixup(&mut self, mut cur: NonNull<Node<T>>) {
        // SAFETY: caller guarantees `cur` is live; all nodes reached from it
        // through links are live nodes of this tree.
        unsafe {
            while let Some(parent) = parent_of(cur) {
                if !is_red(Some(parent)) {
                    break;
                }
                // A red parent is never the root.
                let Some(gparent) = parent_of(parent) else {
                    break;
                };

                let parent_side = side_of(gparent, parent);
                match child_of(gparent, parent_side.opposite()) {
                    Some(uncle) if is_red(Some(uncle)) => {
                        trace_log!("insert fixup: red uncle, recolor");
                        set_color(parent, Color::Black);
                        set_color(uncle, Color::Black);
                        set_color(gparent, Color::Red);
                        cur = gparent;
                    }
                    _ => {
                        let top = if side_of(parent, cur) == parent_side {
                            trace_log!(?parent_side, "insert fixup: straight shape");
                            self.rotate(gparent, parent_side.opposite())
                        } else {
                            trace_log!(?parent_side, "insert fixup: bent shape");
                            self.rotate(parent, parent_side);
                            self.rotate(gparent, parent_side.opposite())
                        };
                        set_color(top, Color::Black);
                        set_color(gparent, Color::Red);
                        break;
                    }
                }
            }

            if let Some(root) = self.root {
                set_color(root, Color::Black);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::RbTree;
    use crate::node::Color;

    fn colors(tree: &RbTree<i32>) -> (Color, Option<Color>, Option<Color>) {
        let root = tree.root_node().unwrap();
        (
            root.color(),
            root.left().map(|n| n.color()),
            root.right().map(|n| n.color()),
        )
    }

    #[test]
    fn test_insert_three_balanced() {
        let mut tree = RbTree::new();
        for v in [10, 5, 15] {
            tree.insert(v);
        }
        assert_eq!(*tree.root_node().unwrap().value(), 10);
        assert_eq!(colors(&tree), (Color::Black, Some(Color::Red), Some(Color::Red)));
    }

    #[test]
    fn test_insert_left_left_rotation() {
        let mut tree = RbTree::new();
        for v in [30, 20, 10] {
            tree.insert(v);
        }
        assert_eq!(*tree.root_node().unwrap().value(), 20);
        assert_eq!(colors(&tree), (Color::Black, Some(Color::Red), Some(Color::Red)));
        tree.check_invariants().unwrap();
    }

    #[test]
    fn test_insert_right_right_rotation() {
        let mut tree = RbTree::new();
        for v in [10, 20, 30] {
            tree.insert(v);
        }
        assert_eq!(*tree.root_node().unwrap().value(), 20);
        tree.check_invariants().unwrap();
    }

    #[test]
    fn test_insert_left_right_rotation() {
        let mut tree = RbTree::new();
        for v in [30, 10, 20] {
            tree.insert(v);
        }
        let root = tree.root_node().unwrap();
        assert_eq!(*root.value(), 20);
        assert_eq!(*root.left().unwrap().value(), 10);
        assert_eq!(*root.right().unwrap().value(), 30);
        tree.check_invariants().unwrap();
    }

    #[test]
    fn test_insert_right_left_rotation() {
        let mut tree = RbTree::new();
        for v in [10, 30, 20] {
            tree.insert(v);
        }
        let root = tree.root_node().unwrap();
        assert_eq!(*root.value(), 20);
        assert_eq!(*root.left().unwrap().value(), 10);
        assert_eq!(*root.right().unwrap().value(), 30);
        tree.check_invariants().unwrap();
    }

    #[test]
    fn test_insert_uncle_red_recolors() {
        let mut tree = RbTree::new();
        for v in [50, 30, 70, 20] {
            tree.insert(v);
        }
        assert_eq!(colors(&tree), (Color::Black, Some(Color::Black), Some(Color::Black)));
        let twenty = tree.root_node().unwrap().left().unwrap().left().unwrap();
        assert_eq!(*twenty.value(), 20);
        assert_eq!(twenty.color(), Color::Red);
        tree.check_invariants().unwrap();
    }

    #[test]
    fn test_try_insert_reports_duplicates() {
        let mut tree = RbTree::new();
        assert_eq!(tree.try_insert(1), Ok(true));
        assert_eq!(tree.try_insert(1), Ok(false));
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn test_ascending_run_stays_logarithmic() {
        let mut tree = RbTree::new();
        for v in 0..1024 {
            tree.insert(v);
        }
        tree.check_invariants().unwrap();
        // 2 * log2(n + 1) bound.
        assert!(tree.height() <= 20, "height {} too large", tree.height());
    }
}
