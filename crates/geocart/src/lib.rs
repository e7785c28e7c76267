//! geocart: CART decision trees over mixed continuous/categorical data.
//!
//! Builds binary classification (Gini) and regression (variance) trees by
//! exhaustive split search over every distinct value of each feature.
//!
//! # Key Types
//!
//! - [`CartModel`] / [`CartConfig`] - High-level training and prediction
//! - [`CartTree`] - The built tree: prediction, traversal, JSON
//! - [`DataSource`] / [`DataTable`] - Tabular input with typed columns
//! - [`Value`] / [`Category`] - Cell values
//!
//! # Training
//!
//! Use `CartConfig::builder()` to configure, then `CartModel::train()`.
//! The lower-level [`training::TreeBuilder`] works on explicit row-sets.
//! See the [`model`] module for an example.

pub mod data;
pub mod error;
pub mod model;
pub mod repr;
pub mod testing;
pub mod training;
pub mod utils;

// =============================================================================
// Convenience Re-exports
// =============================================================================

pub use error::{CartError, Result};

pub use model::{CartConfig, CartModel};

pub use repr::{CartTree, LeafValue, Node};

pub use data::{Category, ColumnType, DataSource, DataTable, RowValues, Value};

pub use training::Verbosity;

pub use utils::{run_with_threads, Parallelism};
