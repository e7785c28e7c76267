//! Tree node types.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::data::{Category, ColumnId, ColumnType, Value};
use crate::error::{CartError, Result};

use super::leaf::LeafNode;

// =============================================================================
// Split criterion
// =============================================================================

/// Decision rule of a split.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitRule {
    /// Continuous split: true side iff `value >= threshold`.
    Threshold(f64),
    /// Categorical split: true side iff `value == category`.
    Equals(Category),
}

/// A column together with the rule that splits rows on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitCriterion {
    pub column: ColumnId,
    pub rule: SplitRule,
}

impl SplitCriterion {
    pub fn threshold(column: ColumnId, threshold: f64) -> Self {
        Self {
            column,
            rule: SplitRule::Threshold(threshold),
        }
    }

    pub fn equals(column: ColumnId, category: impl Into<Category>) -> Self {
        Self {
            column,
            rule: SplitRule::Equals(category.into()),
        }
    }

    /// The criterion a candidate value induces: a threshold for continuous
    /// values, an equality test for categories.
    pub fn from_value(column: ColumnId, value: Value) -> Self {
        match value {
            Value::Continuous(t) => Self::threshold(column, t),
            Value::Categorical(c) => Self::equals(column, c),
        }
    }

    /// Column type this criterion can be evaluated against.
    pub fn column_type(&self) -> ColumnType {
        match self.rule {
            SplitRule::Threshold(_) => ColumnType::Continuous,
            SplitRule::Equals(_) => ColumnType::Categorical,
        }
    }

    /// Whether `value` falls on the true side.
    ///
    /// # Errors
    ///
    /// [`CartError::InvalidColumnType`] if `value` is of the other variant.
    #[inline]
    pub fn matches(&self, value: &Value) -> Result<bool> {
        match (&self.rule, value) {
            (SplitRule::Threshold(t), Value::Continuous(v)) => Ok(*v >= *t),
            (SplitRule::Equals(c), Value::Categorical(v)) => Ok(v == c),
            _ => Err(CartError::InvalidColumnType {
                column: self.column,
                expected: self.column_type(),
                found: value.column_type(),
            }),
        }
    }
}

impl fmt::Display for SplitCriterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.rule {
            SplitRule::Threshold(t) => write!(f, "[{}] >= {}", self.column, t),
            SplitRule::Equals(c) => write!(f, "[{}] == {}", self.column, c),
        }
    }
}

// =============================================================================
// Nodes
// =============================================================================

/// A tree node: either an internal split or a leaf.
///
/// Children are owned exclusively by their parent.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Split(SplitNode),
    Leaf(LeafNode),
}

impl Node {
    #[inline]
    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf(_))
    }

    /// Number of training rows that reached this node.
    pub fn n_rows(&self) -> usize {
        match self {
            Node::Split(split) => split.n_rows,
            Node::Leaf(leaf) => leaf.n_rows(),
        }
    }

    pub fn as_leaf(&self) -> Option<&LeafNode> {
        match self {
            Node::Leaf(leaf) => Some(leaf),
            Node::Split(_) => None,
        }
    }

    pub fn as_split(&self) -> Option<&SplitNode> {
        match self {
            Node::Split(split) => Some(split),
            Node::Leaf(_) => None,
        }
    }
}

impl From<LeafNode> for Node {
    fn from(leaf: LeafNode) -> Self {
        Node::Leaf(leaf)
    }
}

impl From<SplitNode> for Node {
    fn from(split: SplitNode) -> Self {
        Node::Split(split)
    }
}

/// Internal node holding a criterion and both branches.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitNode {
    criterion: SplitCriterion,
    gain: f64,
    n_rows: usize,
    true_branch: Box<Node>,
    false_branch: Box<Node>,
}

impl SplitNode {
    pub fn new(
        criterion: SplitCriterion,
        gain: f64,
        n_rows: usize,
        true_branch: Node,
        false_branch: Node,
    ) -> Self {
        Self {
            criterion,
            gain,
            n_rows,
            true_branch: Box::new(true_branch),
            false_branch: Box::new(false_branch),
        }
    }

    #[inline]
    pub fn criterion(&self) -> &SplitCriterion {
        &self.criterion
    }

    /// Information gain the split achieved at build time.
    #[inline]
    pub fn gain(&self) -> f64 {
        self.gain
    }

    #[inline]
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    /// Branch taken by rows matching the criterion.
    #[inline]
    pub fn true_branch(&self) -> &Node {
        &self.true_branch
    }

    #[inline]
    pub fn false_branch(&self) -> &Node {
        &self.false_branch
    }

    /// Child to descend into for a row whose criterion value is `value`.
    #[inline]
    pub fn branch_for(&self, value: &Value) -> Result<&Node> {
        if self.criterion.matches(value)? {
            Ok(&self.true_branch)
        } else {
            Ok(&self.false_branch)
        }
    }
}
