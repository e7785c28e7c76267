//! Property-based tests for split search and tree induction.
//!
//! Tables are generated from small value ranges so that ties, duplicate
//! values and pure subsets are common.

use proptest::collection::vec as prop_vec;
use proptest::prelude::*;

use geocart::data::{DataSource, DataTable, RowId};
use geocart::training::{
    best_split, candidate_criteria, evaluate_criterion, gini_impurity, impurity, partition,
    BuilderParams, TreeBuilder,
};
use geocart::utils::Parallelism;

const CONTINUOUS: usize = 0;
const CODE: usize = 1;
const CLASS: usize = 2;
const FEATURES: [usize; 2] = [CONTINUOUS, CODE];

// =============================================================================
// Arbitrary Tables
// =============================================================================

/// Strategy for a mixed table: a continuous feature, a coded categorical
/// feature, and a labelled class column.
fn arb_table() -> impl Strategy<Value = DataTable> {
    prop_vec((0u8..6, 0i64..3, 0usize..3), 0..40).prop_map(|rows| {
        let labels = ["sand", "silt", "shale"];
        let continuous: Vec<f64> = rows.iter().map(|r| f64::from(r.0) * 0.5).collect();
        let codes: Vec<i64> = rows.iter().map(|r| r.1).collect();
        let class: Vec<&str> = rows.iter().map(|r| labels[r.2]).collect();
        DataTable::builder()
            .continuous(continuous)
            .categorical(codes)
            .categorical(class)
            .build()
            .unwrap()
    })
}

/// A table plus a row subset (possibly empty, in arbitrary order).
fn arb_table_and_rows() -> impl Strategy<Value = (DataTable, Vec<RowId>)> {
    arb_table().prop_flat_map(|table| {
        let n = table.n_rows();
        let all: Vec<RowId> = (0..n).collect();
        (Just(table), proptest::sample::subsequence(all, 0..=n).prop_shuffle())
    })
}

fn build(table: &DataTable, parallelism: Parallelism) -> geocart::CartTree {
    TreeBuilder::new(table, &FEATURES, BuilderParams::new(CLASS))
        .with_parallelism(parallelism)
        .build_tree()
        .unwrap()
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #[test]
    fn gini_in_range_and_zero_iff_pure((table, rows) in arb_table_and_rows()) {
        let g = gini_impurity(&table, &rows, CLASS).unwrap();
        prop_assert!((0.0..1.0).contains(&g));

        let mut classes: Vec<_> = rows
            .iter()
            .map(|&r| table.value_at(r, CLASS).unwrap())
            .collect();
        classes.dedup();
        let pure = rows.is_empty() || classes.iter().all(|c| *c == classes[0]);
        prop_assert_eq!(g == 0.0, pure);
    }

    #[test]
    fn partition_is_a_set_partition((table, rows) in arb_table_and_rows()) {
        for criterion in candidate_criteria(&table, &rows, &FEATURES).unwrap() {
            let sides = partition(&table, &rows, &criterion).unwrap();
            prop_assert_eq!(sides.len(), rows.len());

            // Both sides are subsequences of the input, and every row lands
            // on exactly one of them.
            let mut t = sides.true_rows.iter().peekable();
            let mut f = sides.false_rows.iter().peekable();
            for row in &rows {
                if t.peek() == Some(&row) {
                    t.next();
                } else {
                    prop_assert_eq!(f.next(), Some(row));
                }
            }
            prop_assert!(t.next().is_none() && f.next().is_none());
        }
    }

    #[test]
    fn best_split_is_maximal((table, rows) in arb_table_and_rows()) {
        let before = impurity(&table, &rows, CLASS).unwrap();
        let candidates = candidate_criteria(&table, &rows, &FEATURES).unwrap();
        let best = best_split(&table, &rows, &FEATURES, CLASS).unwrap();

        let mut any_real = false;
        for criterion in &candidates {
            let (gain, sides) =
                evaluate_criterion(&table, &rows, criterion, CLASS, before).unwrap();
            if sides.is_degenerate() {
                continue;
            }
            any_real = true;
            let best = best.as_ref().unwrap();
            prop_assert!(gain <= best.gain);
        }
        prop_assert_eq!(any_real, best.is_some());
    }

    #[test]
    fn leaves_are_terminal(table in arb_table()) {
        let tree = build(&table, Parallelism::Sequential);
        let leaves: Vec<_> = tree.leaves().collect();

        let mut total = 0;
        for &leaf in &leaves {
            let rows: Vec<RowId> = (0..table.n_rows())
                .filter(|&r| std::ptr::eq(tree.leaf_for(&table.row(r)).unwrap(), leaf))
                .collect();
            prop_assert_eq!(rows.len(), leaf.n_rows());
            total += rows.len();

            if leaf.is_pure() {
                continue;
            }
            // An impure leaf means no split of its rows gains anything.
            let best = best_split(&table, &rows, &FEATURES, CLASS).unwrap();
            prop_assert!(best.map_or(true, |b| b.gain <= 0.0));
        }
        prop_assert_eq!(total, table.n_rows());
    }

    #[test]
    fn splits_have_positive_gain_and_nonempty_sides(table in arb_table()) {
        let tree = build(&table, Parallelism::Sequential);
        prop_assert!(tree.validate().is_ok());
        for visit in tree.nodes() {
            if let Some(split) = visit.node.as_split() {
                prop_assert!(split.gain() > 0.0);
                prop_assert!(split.true_branch().n_rows() > 0);
                prop_assert!(split.false_branch().n_rows() > 0);
            }
        }
    }

    #[test]
    fn builds_are_deterministic(table in arb_table()) {
        let a = build(&table, Parallelism::Sequential);
        let b = build(&table, Parallelism::Sequential);
        let c = build(&table, Parallelism::Parallel);
        prop_assert_eq!(&a, &b);
        prop_assert_eq!(&a, &c);
    }
}
