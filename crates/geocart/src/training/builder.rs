//! Recursive CART construction.
//!
//! Each call receives an owned row-set and either returns a leaf or splits
//! the rows in two and recurses on both halves:
//!
//! 1. no rows, or every row has the same class → leaf
//! 2. depth or row-count limit reached → leaf
//! 3. no real split, or best gain not above `min_gain` → leaf
//! 4. otherwise partition and recurse with the same feature columns
//!
//! A split with positive gain always leaves at least one row on each side
//! (a one-sided split has gain exactly 0), so every recursive call works on
//! strictly fewer rows and recursion terminates.
//!
//! The two recursive calls share nothing mutable, so with
//! [`Parallelism::Parallel`] they run under `rayon::join`. The resulting
//! tree is identical to a sequential build.

use std::cmp::Ordering;

use crate::data::{ColumnId, ColumnType, DataSource, RowId};
use crate::error::Result;
use crate::repr::{CartTree, LeafNode, LeafValue, Node, SplitNode};
use crate::utils::Parallelism;

use super::impurity::{mean, variance};
use super::logger::{TrainingLogger, Verbosity};
use super::partition::{partition, RowPartition};
use super::rowset::{category_counts, continuous_values, is_constant};
use super::split::best_split;

// =============================================================================
// BuilderParams
// =============================================================================

/// Stopping rules and target for a build.
#[derive(Clone, Debug, PartialEq)]
pub struct BuilderParams {
    /// Column to predict.
    pub class_column: ColumnId,
    /// Maximum depth of split nodes. `None` grows until leaves are pure or
    /// unsplittable.
    pub max_depth: Option<u32>,
    /// Nodes with fewer rows become leaves.
    pub min_samples_split: usize,
    /// A split must gain strictly more than this.
    pub min_gain: f64,
}

impl BuilderParams {
    /// Unrestricted growth for `class_column`.
    pub fn new(class_column: ColumnId) -> Self {
        Self {
            class_column,
            max_depth: None,
            min_samples_split: 2,
            min_gain: 0.0,
        }
    }
}

// =============================================================================
// TreeBuilder
// =============================================================================

/// Grows a [`CartTree`] from a data source.
pub struct TreeBuilder<'a, S: ?Sized> {
    source: &'a S,
    feature_columns: &'a [ColumnId],
    params: BuilderParams,
    parallelism: Parallelism,
    logger: TrainingLogger,
}

impl<'a, S: DataSource + Sync + ?Sized> TreeBuilder<'a, S> {
    pub fn new(source: &'a S, feature_columns: &'a [ColumnId], params: BuilderParams) -> Self {
        Self {
            source,
            feature_columns,
            params,
            parallelism: Parallelism::Sequential,
            logger: TrainingLogger::default(),
        }
    }

    pub fn with_parallelism(mut self, parallelism: Parallelism) -> Self {
        self.parallelism = parallelism;
        self
    }

    pub fn with_logger(mut self, logger: TrainingLogger) -> Self {
        self.logger = logger;
        self
    }

    #[inline]
    pub fn params(&self) -> &BuilderParams {
        &self.params
    }

    /// Build a tree over every row of the source.
    ///
    /// An empty source yields a single empty leaf.
    ///
    /// # Errors
    ///
    /// Unknown class/feature columns, type mismatches, and data lookup
    /// failures. There is no partial result.
    pub fn build_tree(&self) -> Result<CartTree> {
        let class_type = self.check_columns()?;
        let rows = self.source.all_rows();
        if rows.is_empty() {
            self.logger
                .warn(format_args!("empty dataset; tree is a single empty leaf"));
        }
        self.logger.info(format_args!(
            "building CART: {} rows, {} features, {} target column {}",
            rows.len(),
            self.feature_columns.len(),
            class_type,
            self.params.class_column
        ));

        let root = self.grow(rows, 0)?;
        let tree = CartTree::new(
            root,
            self.params.class_column,
            class_type,
            self.feature_columns.to_vec(),
        );

        if self.logger.enabled(Verbosity::Info) {
            self.logger.info(format_args!(
                "built CART: {} nodes, {} leaves, depth {}",
                tree.n_nodes(),
                tree.n_leaves(),
                tree.depth()
            ));
        }
        Ok(tree)
    }

    /// Build the subtree for an explicit row-set.
    pub fn build(&self, rows: Vec<RowId>) -> Result<Node> {
        self.check_columns()?;
        self.grow(rows, 0)
    }

    /// Resolve every referenced column; returns the class column type.
    fn check_columns(&self) -> Result<ColumnType> {
        let class_type = self.source.column_type(self.params.class_column)?;
        for &column in self.feature_columns {
            self.source.column_type(column)?;
        }
        Ok(class_type)
    }

    fn grow(&self, rows: Vec<RowId>, depth: u32) -> Result<Node> {
        let class_column = self.params.class_column;

        if rows.is_empty() || is_constant(self.source, &rows, class_column)? {
            return self.leaf(&rows, depth, "pure");
        }
        if self.params.max_depth.is_some_and(|max| depth >= max) {
            return self.leaf(&rows, depth, "max depth");
        }
        if rows.len() < self.params.min_samples_split {
            return self.leaf(&rows, depth, "too few rows");
        }

        let best = best_split(self.source, &rows, self.feature_columns, class_column)?;
        let Some(best) = best else {
            return self.leaf(&rows, depth, "no split");
        };
        // NaN gain (overflowing variance) never splits.
        if best.gain.partial_cmp(&self.params.min_gain) != Some(Ordering::Greater) {
            return self.leaf(&rows, depth, "no gain");
        }

        let RowPartition {
            true_rows,
            false_rows,
        } = partition(self.source, &rows, &best.criterion)?;
        debug_assert!(!true_rows.is_empty() && !false_rows.is_empty());

        let n_rows = rows.len();
        drop(rows);
        self.logger.debug(format_args!(
            "depth {depth}: split {n_rows} rows on {} (gain {:.6}) into {} / {}",
            best.criterion,
            best.gain,
            true_rows.len(),
            false_rows.len()
        ));

        let (true_branch, false_branch) = self.parallelism.join(
            || self.grow(true_rows, depth + 1),
            || self.grow(false_rows, depth + 1),
        );
        Ok(Node::Split(SplitNode::new(
            best.criterion,
            best.gain,
            n_rows,
            true_branch?,
            false_branch?,
        )))
    }

    fn leaf(&self, rows: &[RowId], depth: u32, reason: &str) -> Result<Node> {
        let leaf = summarize_leaf(self.source, rows, self.params.class_column)?;
        self.logger.debug(format_args!(
            "depth {depth}: leaf with {} rows ({reason}, impurity {:.6})",
            rows.len(),
            leaf.impurity()
        ));
        Ok(Node::Leaf(leaf))
    }
}

/// Summarize the target over `rows` as a leaf.
///
/// Categorical targets keep the full class counts; continuous targets keep
/// the mean. The leaf also records the impurity of `rows`.
pub fn summarize_leaf<S: DataSource + ?Sized>(
    source: &S,
    rows: &[RowId],
    class_column: ColumnId,
) -> Result<LeafNode> {
    match source.column_type(class_column)? {
        ColumnType::Categorical => {
            let counts = category_counts(source, rows, class_column)?;
            let impurity = counts.gini();
            Ok(LeafNode::new(
                LeafValue::Distribution(counts),
                rows.len(),
                impurity,
            ))
        }
        ColumnType::Continuous => {
            let values = continuous_values(source, rows, class_column)?;
            Ok(LeafNode::new(
                LeafValue::Mean(mean(&values)),
                rows.len(),
                variance(&values),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Category, DataTable, Value};
    use crate::error::CartError;
    use crate::repr::SplitCriterion;
    use crate::testing;

    fn build(table: &DataTable, features: &[ColumnId], params: BuilderParams) -> CartTree {
        TreeBuilder::new(table, features, params).build_tree().unwrap()
    }

    #[test]
    fn categorical_scenario_gives_one_split() {
        let t = testing::categorical_pair();
        let tree = build(&t, &[0], BuilderParams::new(1));

        let root = tree.root().as_split().expect("root should split");
        assert_eq!(root.criterion(), &SplitCriterion::equals(0, "A"));
        assert_eq!(root.n_rows(), 4);
        for side in [root.true_branch(), root.false_branch()] {
            let leaf = side.as_leaf().expect("children should be leaves");
            assert!(leaf.is_pure());
            assert_eq!(leaf.n_rows(), 2);
        }
        assert_eq!(
            root.true_branch().as_leaf().unwrap().value().majority(),
            Some(&Category::from("yes"))
        );
    }

    #[test]
    fn continuous_scenario_splits_at_three() {
        let t = testing::continuous_ramp();
        let tree = build(&t, &[0], BuilderParams::new(1));
        let root = tree.root().as_split().unwrap();
        assert_eq!(root.criterion(), &SplitCriterion::threshold(0, 3.0));
        assert_eq!(tree.n_leaves(), 2);
    }

    #[test]
    fn constant_class_gives_single_leaf() {
        let t = testing::constant_class();
        let tree = build(&t, &[0, 1], BuilderParams::new(2));
        let leaf = tree.root().as_leaf().expect("single leaf");
        assert_eq!(leaf.n_rows(), t.n_rows());
        assert_eq!(leaf.impurity(), 0.0);
        assert_eq!(tree.n_nodes(), 1);
    }

    #[test]
    fn empty_dataset_gives_empty_leaf() {
        let t = DataTable::builder()
            .continuous(Vec::<f64>::new())
            .categorical(Vec::<&str>::new())
            .build()
            .unwrap();
        let tree = build(&t, &[0], BuilderParams::new(1));
        let leaf = tree.root().as_leaf().unwrap();
        assert_eq!(leaf.n_rows(), 0);
        assert!(leaf.value().distribution().unwrap().is_empty());
    }

    #[test]
    fn max_depth_caps_the_tree() {
        let t = testing::facies_table(64);
        let params = BuilderParams {
            max_depth: Some(1),
            ..BuilderParams::new(testing::FACIES)
        };
        let tree = build(&t, &testing::FACIES_FEATURES, params);
        assert!(tree.depth() <= 1);

        let params = BuilderParams {
            max_depth: Some(0),
            ..BuilderParams::new(testing::FACIES)
        };
        let tree = build(&t, &testing::FACIES_FEATURES, params);
        assert!(tree.root().is_leaf());
    }

    #[test]
    fn min_samples_split_stops_small_nodes() {
        let t = testing::facies_table(64);
        let params = BuilderParams {
            min_samples_split: 20,
            ..BuilderParams::new(testing::FACIES)
        };
        let tree = build(&t, &testing::FACIES_FEATURES, params);
        for visit in tree.nodes() {
            if let Some(split) = visit.node.as_split() {
                assert!(split.n_rows() >= 20);
            }
        }
    }

    #[test]
    fn min_gain_prunes_weak_splits() {
        let t = testing::facies_table(64);
        let params = BuilderParams {
            min_gain: 0.05,
            ..BuilderParams::new(testing::FACIES)
        };
        let tree = build(&t, &testing::FACIES_FEATURES, params);
        for visit in tree.nodes() {
            if let Some(split) = visit.node.as_split() {
                assert!(split.gain() > 0.05);
            }
        }
    }

    #[test]
    fn parallel_build_matches_sequential() {
        let t = testing::facies_table(200);
        let params = BuilderParams::new(testing::FACIES);
        let sequential = build(&t, &testing::FACIES_FEATURES, params);
        let parallel = TreeBuilder::new(
            &t,
            &testing::FACIES_FEATURES,
            BuilderParams::new(testing::FACIES),
        )
        .with_parallelism(Parallelism::Parallel)
        .build_tree()
        .unwrap();
        assert_eq!(sequential, parallel);
    }

    #[test]
    fn regression_tree_uses_means() {
        let t = DataTable::builder()
            .continuous(vec![1.0, 2.0, 3.0, 4.0])
            .continuous(vec![10.0, 10.0, 30.0, 30.0])
            .build()
            .unwrap();
        let tree = build(&t, &[0], BuilderParams::new(1));
        assert_eq!(tree.class_type(), ColumnType::Continuous);

        let root = tree.root().as_split().unwrap();
        assert_eq!(root.criterion(), &SplitCriterion::threshold(0, 3.0));
        let high = vec![Value::Continuous(3.5), Value::Continuous(0.0)];
        let low = vec![Value::Continuous(0.0), Value::Continuous(0.0)];
        assert_eq!(tree.predict_value(&high).unwrap(), Some(30.0));
        assert_eq!(tree.predict_value(&low).unwrap(), Some(10.0));
    }

    #[test]
    fn verbosity_does_not_change_the_tree() {
        let t = testing::continuous_ramp();
        let silent = build(&t, &[0], BuilderParams::new(1));
        let verbose = TreeBuilder::new(&t, &[0], BuilderParams::new(1))
            .with_logger(TrainingLogger::new(Verbosity::Debug))
            .build_tree()
            .unwrap();
        assert_eq!(silent, verbose);
    }

    #[test]
    fn nan_gain_does_not_split() {
        // Variance of the target overflows, so every candidate gain is NaN.
        let t = DataTable::builder()
            .continuous(vec![1.0, 2.0, 3.0])
            .continuous(vec![0.0, 1e308, 1.0])
            .build()
            .unwrap();
        let best = best_split(&t, &[0, 1, 2], &[0], 1).unwrap().unwrap();
        assert!(best.gain.is_nan());

        let tree = build(&t, &[0], BuilderParams::new(1));
        assert!(tree.root().is_leaf());
        assert_eq!(tree.n_nodes(), 1);
    }

    #[test]
    fn feature_columns_are_reused_deeper() {
        // Class alternates in bands along one feature: x < 2 → a, 2 <= x < 4 → b, x >= 4 → a.
        let t = DataTable::builder()
            .continuous(vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0])
            .categorical(["a", "a", "b", "b", "a", "a"])
            .build()
            .unwrap();
        let tree = build(&t, &[0], BuilderParams::new(1));
        let splits_on_zero = tree
            .nodes()
            .filter_map(|v| v.node.as_split())
            .filter(|s| s.criterion().column == 0)
            .count();
        assert!(splits_on_zero >= 2);
        assert!(tree.leaves().all(|l| l.is_pure()));
    }

    #[test]
    fn bad_columns_fail_the_build() {
        let t = testing::categorical_pair();
        let err = TreeBuilder::new(&t, &[0], BuilderParams::new(9))
            .build_tree()
            .unwrap_err();
        assert!(matches!(err, CartError::OutOfRange { index: 9, .. }));

        let err = TreeBuilder::new(&t, &[5], BuilderParams::new(1))
            .build_tree()
            .unwrap_err();
        assert!(matches!(err, CartError::OutOfRange { index: 5, .. }));
    }

    #[test]
    fn explicit_row_subset() {
        let t = testing::continuous_ramp();
        let node = TreeBuilder::new(&t, &[0], BuilderParams::new(1))
            .build(vec![0, 1])
            .unwrap();
        assert!(node.is_leaf());
        assert_eq!(node.n_rows(), 2);
    }
}
