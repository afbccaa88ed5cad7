//! Property-based tests for [`RbTree`].
//!
//! Every operation sequence is replayed against `BTreeSet` as an oracle, and
//! the red-black invariants are re-checked after each step.

#![expect(clippy::unwrap_used, reason = "fail fast in tests")]

mod common;

use std::cmp::Ordering;
use std::collections::BTreeSet;

use proptest::prelude::*;
use redblack::{PoolAllocator, RbTree};

/// Values drawn from a narrow range so inserts and removes collide often.
const VALUE_RANGE: i32 = 64;

// ============================================================================
//  Strategies
// ============================================================================

fn value() -> impl Strategy<Value = i32> {
    0..VALUE_RANGE
}

/// Operations for random testing.
#[derive(Debug, Clone)]
enum Op {
    Insert(i32),
    Remove(i32),
    Contains(i32),
}

fn operations(max_ops: usize) -> impl Strategy<Value = Vec<Op>> {
    prop::collection::vec(
        prop_oneof![
            3 => value().prop_map(Op::Insert),
            2 => value().prop_map(Op::Remove),
            1 => value().prop_map(Op::Contains),
        ],
        0..=max_ops,
    )
}

/// Upper bound on height for `len` nodes: 2 * log2(len + 1).
fn height_bound(len: usize) -> usize {
    2 * (usize::BITS - len.saturating_add(1).leading_zeros()) as usize
}

// ============================================================================
//  Differential Testing Against BTreeSet
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    /// Random operation sequences match `BTreeSet` step by step.
    #[test]
    fn operations_match_btreeset(ops in operations(200)) {
        common::init_tracing();
        let mut tree = RbTree::new();
        let mut oracle = BTreeSet::new();

        for op in ops {
            match op {
                Op::Insert(v) => {
                    tree.insert(v);
                    oracle.insert(v);
                }
                Op::Remove(v) => {
                    prop_assert_eq!(tree.take(&v), oracle.take(&v));
                }
                Op::Contains(v) => {
                    prop_assert_eq!(tree.contains(&v), oracle.contains(&v));
                }
            }
            prop_assert_eq!(tree.check_invariants(), Ok(()));
            prop_assert_eq!(tree.size(), oracle.len());
        }

        let expected: Vec<i32> = oracle.iter().copied().collect();
        prop_assert_eq!(common::in_order(&tree), expected);
        prop_assert_eq!(tree.first(), oracle.first());
        prop_assert_eq!(tree.last(), oracle.last());
    }

    /// `try_insert` reports exactly when the oracle gained an element.
    #[test]
    fn try_insert_reports_novelty(values in prop::collection::vec(value(), 0..200)) {
        let mut tree = RbTree::new();
        let mut oracle = BTreeSet::new();

        for v in values {
            prop_assert_eq!(tree.try_insert(v), Ok(oracle.insert(v)));
        }
        prop_assert_eq!(tree.size(), oracle.len());
    }

    /// Height never exceeds the red-black bound.
    #[test]
    fn height_is_logarithmic(values in prop::collection::vec(any::<u32>(), 0..1000)) {
        let mut tree = RbTree::new();
        for v in values {
            tree.insert(v);
        }

        prop_assert!(
            tree.height() <= height_bound(tree.len()),
            "height {} exceeds bound for {} nodes",
            tree.height(),
            tree.len()
        );
    }

    /// Inserting everything then removing in a shuffled order empties the tree.
    #[test]
    fn round_trip_in_any_order(
        values in prop::collection::hash_set(any::<i32>(), 0..300)
            .prop_map(|set| set.into_iter().collect::<Vec<_>>())
            .prop_shuffle()
    ) {
        let mut tree = RbTree::new();
        for &v in &values {
            tree.insert(v);
        }
        prop_assert_eq!(tree.size(), values.len());

        for v in values.iter().rev() {
            tree.remove(v);
            prop_assert!(!tree.contains(v));
            prop_assert_eq!(tree.check_invariants(), Ok(()));
        }
        prop_assert!(tree.is_empty());
    }

    /// A reversed comparator is honored everywhere the ordering matters.
    #[test]
    fn reverse_comparator_matches_reversed_oracle(ops in operations(150)) {
        let mut tree = RbTree::with_comparator(|a: &i32, b: &i32| -> Ordering { b.cmp(a) });
        let mut oracle = BTreeSet::new();

        for op in ops {
            match op {
                Op::Insert(v) => {
                    tree.insert(v);
                    oracle.insert(v);
                }
                Op::Remove(v) => {
                    tree.remove(&v);
                    oracle.remove(&v);
                }
                Op::Contains(v) => {
                    prop_assert_eq!(tree.contains(&v), oracle.contains(&v));
                }
            }
            prop_assert_eq!(tree.check_invariants(), Ok(()));
        }

        let expected: Vec<i32> = oracle.iter().rev().copied().collect();
        prop_assert_eq!(common::in_order(&tree), expected);
    }

    /// The pool never leaks or double-counts nodes.
    #[test]
    fn pool_live_count_tracks_len(ops in operations(200)) {
        let mut tree = RbTree::with_allocator(PoolAllocator::new());

        for op in ops {
            match op {
                Op::Insert(v) => tree.insert(v),
                Op::Remove(v) => tree.remove(&v),
                Op::Contains(_) => {}
            }
            prop_assert_eq!(tree.allocator().live(), tree.len());
            prop_assert_eq!(
                tree.allocator().total_allocated(),
                tree.allocator().live() + tree.allocator().pooled()
            );
        }

        tree.clear();
        prop_assert_eq!(tree.allocator().live(), 0);
        tree.check_invariants().unwrap();
    }
}
