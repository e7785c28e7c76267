//! Leaf summaries.

use serde::{Deserialize, Serialize};

use crate::data::{Category, CategoryCounts, ColumnType};

/// Prediction stored at a leaf.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeafValue {
    /// Classification: class counts of the rows that reached the leaf.
    Distribution(CategoryCounts),
    /// Regression: mean target of the rows that reached the leaf.
    Mean(f64),
}

impl LeafValue {
    /// Target column type this leaf summarizes.
    pub fn column_type(&self) -> ColumnType {
        match self {
            LeafValue::Distribution(_) => ColumnType::Categorical,
            LeafValue::Mean(_) => ColumnType::Continuous,
        }
    }

    pub fn distribution(&self) -> Option<&CategoryCounts> {
        match self {
            LeafValue::Distribution(counts) => Some(counts),
            LeafValue::Mean(_) => None,
        }
    }

    pub fn mean(&self) -> Option<f64> {
        match self {
            LeafValue::Distribution(_) => None,
            LeafValue::Mean(m) => Some(*m),
        }
    }

    /// Majority class; `None` for regression leaves and empty leaves.
    pub fn majority(&self) -> Option<&Category> {
        self.distribution().and_then(CategoryCounts::majority)
    }
}

/// Terminal node.
#[derive(Debug, Clone, PartialEq)]
pub struct LeafNode {
    value: LeafValue,
    n_rows: usize,
    impurity: f64,
}

impl LeafNode {
    pub fn new(value: LeafValue, n_rows: usize, impurity: f64) -> Self {
        Self {
            value,
            n_rows,
            impurity,
        }
    }

    #[inline]
    pub fn value(&self) -> &LeafValue {
        &self.value
    }

    #[inline]
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    /// Impurity of the leaf's rows when it was created.
    #[inline]
    pub fn impurity(&self) -> f64 {
        self.impurity
    }

    #[inline]
    pub fn is_pure(&self) -> bool {
        self.impurity == 0.0
    }
}
