//! CART model implementation.
//!
//! High-level wrapper around [`CartTree`] with training and batch prediction.

use crate::data::{Category, ColumnId, DataSource, RowValues};
use crate::error::Result;
use crate::repr::{CartTree, LeafValue};
use crate::training::{TrainingLogger, TreeBuilder};
use crate::utils::{run_with_threads, Parallelism};

use super::CartConfig;

/// A trained decision tree together with the configuration that grew it.
#[derive(Debug, Clone)]
pub struct CartModel {
    tree: CartTree,
    config: CartConfig,
}

impl CartModel {
    /// Wrap an existing tree, e.g. one loaded with [`CartTree::from_json`].
    pub fn from_parts(tree: CartTree, config: CartConfig) -> Self {
        Self { tree, config }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn tree(&self) -> &CartTree {
        &self.tree
    }

    pub fn config(&self) -> &CartConfig {
        &self.config
    }

    pub fn into_tree(self) -> CartTree {
        self.tree
    }

    // =========================================================================
    // Training
    // =========================================================================

    /// Grow a tree over every row of `source`.
    ///
    /// The class column comes from `config`; `feature_columns` lists the
    /// candidate split columns in the order used for tie-breaking. With
    /// `n_threads > 1` sibling subtrees are built on a dedicated rayon pool;
    /// the tree is the same as a sequential build.
    ///
    /// # Errors
    ///
    /// Bad column ids or types, lookup failures from `source`, and thread
    /// pool startup failures.
    pub fn train<S>(source: &S, feature_columns: &[ColumnId], config: CartConfig) -> Result<Self>
    where
        S: DataSource + Sync + ?Sized,
    {
        let params = config.to_builder_params();
        let logger = TrainingLogger::new(config.verbosity);
        let tree = run_with_threads(config.thread_count(), |parallelism| {
            TreeBuilder::new(source, feature_columns, params)
                .with_parallelism(parallelism)
                .with_logger(logger)
                .build_tree()
        })??;
        Ok(Self { tree, config })
    }

    // =========================================================================
    // Prediction
    // =========================================================================

    /// Leaf value for a single row.
    pub fn classify<R: RowValues + ?Sized>(&self, row: &R) -> Result<&LeafValue> {
        self.tree.classify(row)
    }

    /// Majority class for every row of `source`, in row order.
    ///
    /// Uses the configured thread count.
    pub fn predict_categories<S>(&self, source: &S) -> Result<Vec<Option<Category>>>
    where
        S: DataSource + Sync,
    {
        self.predict_rows(source, |tree, row| {
            Ok(tree.predict_category(row)?.cloned())
        })
    }

    /// Mean target for every row of `source`, in row order.
    pub fn predict_values<S>(&self, source: &S) -> Result<Vec<Option<f64>>>
    where
        S: DataSource + Sync,
    {
        self.predict_rows(source, |tree, row| tree.predict_value(row))
    }

    fn predict_rows<S, T, F>(&self, source: &S, f: F) -> Result<Vec<T>>
    where
        S: DataSource + Sync,
        T: Send,
        F: Fn(&CartTree, &dyn RowValues) -> Result<T> + Sync + Send,
    {
        let tree = &self.tree;
        let predictions = run_with_threads(self.config.thread_count(), |parallelism: Parallelism| {
            parallelism.maybe_par_map(0..source.n_rows(), |r| f(tree, &source.row(r)))
        })?;
        predictions.into_iter().collect()
    }
}
