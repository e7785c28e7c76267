//! CART induction.
//!
//! Bottom-up, the pieces are:
//!
//! - [`rowset`]: distinct values and category counts over a row subset
//! - [`impurity`]: Gini / variance impurity and information gain
//! - [`partition`]: pure split of a row-set by a criterion
//! - [`split`]: exhaustive search for the best criterion
//! - [`builder`]: the recursive [`TreeBuilder`]
//! - [`TrainingLogger`], [`Verbosity`]: gated logging through `log`
//!
//! Row-sets are passed by value down the recursion and never mutated in
//! place, so sibling subtrees can be built concurrently.

pub mod builder;
pub mod impurity;
mod logger;
pub mod partition;
pub mod rowset;
pub mod split;

pub use builder::{summarize_leaf, BuilderParams, TreeBuilder};
pub use impurity::{gini_impurity, impurity, information_gain, variance_impurity};
pub use logger::{TrainingLogger, Verbosity};
pub use partition::{partition, RowPartition};
pub use rowset::{category_counts, continuous_values, is_constant, unique_values};
pub use split::{best_split, candidate_criteria, evaluate_criterion, BestSplit};
