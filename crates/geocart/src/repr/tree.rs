//! Built CART tree and its read-only interface.
//!
//! This module provides:
//! - [`CartTree`]: the immutable node hierarchy plus the columns it was built on
//! - [`Nodes`]: pre-order traversal for serialization and visualization
//! - [`TreeValidationError`]: structural validation errors
//!
//! Serde support lives in `schema`, which flattens the hierarchy.

use std::collections::HashSet;
use std::fmt::Write as _;

use crate::data::{Category, ColumnId, ColumnType, RowValues};
use crate::error::{CartError, Result};

use super::leaf::{LeafNode, LeafValue};
use super::node::{Node, SplitRule};
use super::schema::TreeSchema;

// ============================================================================
// TreeValidationError
// ============================================================================

/// Structural validation errors for [`CartTree`].
///
/// Nodes are identified by their position in pre-order traversal.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TreeValidationError {
    /// Children row counts do not add up to the parent's.
    #[error("node {node}: children hold {children} rows, parent holds {parent}")]
    RowCountMismatch {
        node: usize,
        parent: usize,
        children: usize,
    },
    /// A classification leaf whose counts disagree with its row count.
    #[error("node {node}: distribution counts {counted} rows, leaf holds {n_rows}")]
    LeafCountMismatch {
        node: usize,
        n_rows: usize,
        counted: u64,
    },
    /// A leaf summarizing the wrong kind of target.
    #[error("node {node}: {found} leaf in a tree with a {expected} target")]
    LeafKindMismatch {
        node: usize,
        expected: ColumnType,
        found: ColumnType,
    },
    /// A split threshold, gain or leaf impurity that is NaN or infinite.
    #[error("node {node}: non-finite {what}")]
    NonFinite { node: usize, what: &'static str },
    /// A split on a column the tree was not given as a feature.
    #[error("node {node}: split on column {column}, which is not a feature")]
    UnknownFeature { node: usize, column: ColumnId },
    /// A class listed twice in a leaf distribution.
    #[error("node {node}: class {category} appears twice in the distribution")]
    DuplicateCategory { node: usize, category: Category },
    /// A serialized tree without nodes.
    #[error("tree has no nodes")]
    EmptyTree,
    /// A serialized child index that is out of range, not after its parent,
    /// or already claimed by another split.
    #[error("stored node {node}: invalid child index {child}")]
    InvalidChild { node: usize, child: usize },
    /// A serialized node no split refers to.
    #[error("stored node {node} is not reachable from the root")]
    OrphanNode { node: usize },
}

// ============================================================================
// CartTree
// ============================================================================

/// A built classification or regression tree.
///
/// Immutable after construction; safe to share across threads for
/// prediction.
#[derive(Debug, Clone, PartialEq)]
pub struct CartTree {
    root: Node,
    class_column: ColumnId,
    class_type: ColumnType,
    feature_columns: Vec<ColumnId>,
}

impl CartTree {
    pub fn new(
        root: Node,
        class_column: ColumnId,
        class_type: ColumnType,
        feature_columns: Vec<ColumnId>,
    ) -> Self {
        Self {
            root,
            class_column,
            class_type,
            feature_columns,
        }
    }

    #[inline]
    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Column the tree predicts.
    #[inline]
    pub fn class_column(&self) -> ColumnId {
        self.class_column
    }

    /// `Categorical` for classification trees, `Continuous` for regression.
    #[inline]
    pub fn class_type(&self) -> ColumnType {
        self.class_type
    }

    #[inline]
    pub fn feature_columns(&self) -> &[ColumnId] {
        &self.feature_columns
    }

    // ------------------------------------------------------------------------
    // Prediction
    // ------------------------------------------------------------------------

    /// Walk from the root to the leaf that `row` falls into.
    ///
    /// # Errors
    ///
    /// - [`CartError::MissingColumnValue`] if `row` lacks a column on the path
    /// - [`CartError::InvalidColumnType`] if a value has the wrong type
    pub fn leaf_for<R: RowValues + ?Sized>(&self, row: &R) -> Result<&LeafNode> {
        let mut node = &self.root;
        loop {
            match node {
                Node::Leaf(leaf) => return Ok(leaf),
                Node::Split(split) => {
                    let column = split.criterion().column;
                    let value = row
                        .value(column)
                        .ok_or(CartError::MissingColumnValue { column })?;
                    node = split.branch_for(&value)?;
                }
            }
        }
    }

    /// The stored prediction (class distribution or mean) for `row`.
    pub fn classify<R: RowValues + ?Sized>(&self, row: &R) -> Result<&LeafValue> {
        self.leaf_for(row).map(LeafNode::value)
    }

    /// Majority class for `row`. `None` for regression trees and empty leaves.
    pub fn predict_category<R: RowValues + ?Sized>(&self, row: &R) -> Result<Option<&Category>> {
        Ok(self.classify(row)?.majority())
    }

    /// Mean target for `row`. `None` for classification trees.
    pub fn predict_value<R: RowValues + ?Sized>(&self, row: &R) -> Result<Option<f64>> {
        Ok(self.classify(row)?.mean())
    }

    /// Class frequencies at the leaf `row` falls into.
    pub fn class_probabilities<R: RowValues + ?Sized>(
        &self,
        row: &R,
    ) -> Result<Vec<(&Category, f64)>> {
        Ok(self
            .classify(row)?
            .distribution()
            .map(|d| d.probabilities())
            .unwrap_or_default())
    }

    // ------------------------------------------------------------------------
    // Traversal
    // ------------------------------------------------------------------------

    /// Pre-order traversal: each split is followed by its true branch, then
    /// its false branch.
    pub fn nodes(&self) -> Nodes<'_> {
        Nodes {
            stack: vec![(0, &self.root)],
        }
    }

    /// Leaves in pre-order.
    pub fn leaves(&self) -> impl Iterator<Item = &LeafNode> + '_ {
        self.nodes().filter_map(|visit| visit.node.as_leaf())
    }

    pub fn n_nodes(&self) -> usize {
        self.nodes().count()
    }

    pub fn n_leaves(&self) -> usize {
        self.leaves().count()
    }

    /// Length of the longest root-to-leaf path (0 for a lone leaf).
    pub fn depth(&self) -> usize {
        self.nodes().map(|visit| visit.depth).max().unwrap_or(0)
    }

    // ------------------------------------------------------------------------
    // Validation
    // ------------------------------------------------------------------------

    /// Check structural consistency.
    ///
    /// Trees produced by the builder pass unless the target variance
    /// overflows `f64`; this guards trees assembled by hand or read back
    /// from JSON.
    pub fn validate(&self) -> std::result::Result<(), TreeValidationError> {
        for (index, visit) in self.nodes().enumerate() {
            match visit.node {
                Node::Split(split) => {
                    if !split.gain().is_finite() {
                        return Err(TreeValidationError::NonFinite {
                            node: index,
                            what: "gain",
                        });
                    }
                    if let SplitRule::Threshold(t) = split.criterion().rule {
                        if !t.is_finite() {
                            return Err(TreeValidationError::NonFinite {
                                node: index,
                                what: "threshold",
                            });
                        }
                    }
                    let column = split.criterion().column;
                    if !self.feature_columns.contains(&column) {
                        return Err(TreeValidationError::UnknownFeature {
                            node: index,
                            column,
                        });
                    }
                    let children = split.true_branch().n_rows() + split.false_branch().n_rows();
                    if children != split.n_rows() {
                        return Err(TreeValidationError::RowCountMismatch {
                            node: index,
                            parent: split.n_rows(),
                            children,
                        });
                    }
                }
                Node::Leaf(leaf) => {
                    let found = leaf.value().column_type();
                    if found != self.class_type {
                        return Err(TreeValidationError::LeafKindMismatch {
                            node: index,
                            expected: self.class_type,
                            found,
                        });
                    }
                    if !leaf.impurity().is_finite() {
                        return Err(TreeValidationError::NonFinite {
                            node: index,
                            what: "impurity",
                        });
                    }
                    match leaf.value() {
                        LeafValue::Distribution(counts) => {
                            let mut seen = HashSet::with_capacity(counts.len());
                            if let Some((category, _)) =
                                counts.iter().find(|(category, _)| !seen.insert(*category))
                            {
                                return Err(TreeValidationError::DuplicateCategory {
                                    node: index,
                                    category: category.clone(),
                                });
                            }
                            let counted = counts.total();
                            if counted != leaf.n_rows() as u64 {
                                return Err(TreeValidationError::LeafCountMismatch {
                                    node: index,
                                    n_rows: leaf.n_rows(),
                                    counted,
                                });
                            }
                        }
                        LeafValue::Mean(m) => {
                            if !m.is_finite() {
                                return Err(TreeValidationError::NonFinite {
                                    node: index,
                                    what: "leaf mean",
                                });
                            }
                        }
                    }
                }
            }
        }
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Export
    // ------------------------------------------------------------------------

    /// Serialize the tree to JSON.
    ///
    /// Nodes are written as a flat array in pre-order, so deep trees stay
    /// within the parser's nesting limit.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&TreeSchema::from(self))?)
    }

    /// Read a tree back from [`CartTree::to_json`] output and validate it.
    ///
    /// # Errors
    ///
    /// - [`CartError::Serialization`] for malformed JSON
    /// - [`CartError::InvalidTree`] for broken child links or a tree that
    ///   fails [`CartTree::validate`]
    pub fn from_json(json: &str) -> Result<Self> {
        let schema: TreeSchema = serde_json::from_str(json)?;
        let tree = CartTree::try_from(schema)?;
        tree.validate()?;
        Ok(tree)
    }

    /// Indented text dump using column indices.
    pub fn render(&self) -> String {
        self.render_with(|column| format!("[{column}]"))
    }

    /// Indented text dump with caller-supplied column labels.
    ///
    /// ```text
    /// porosity >= 0.2 (gain 0.5, 4 rows)
    ///   true: leaf {sand: 2} (impurity 0)
    ///   false: leaf {shale: 2} (impurity 0)
    /// ```
    pub fn render_with<F: Fn(ColumnId) -> String>(&self, column_label: F) -> String {
        let mut out = String::new();
        let mut stack: Vec<(usize, Option<&'static str>, &Node)> = vec![(0, None, &self.root)];
        while let Some((depth, side, node)) = stack.pop() {
            let indent = "  ".repeat(depth);
            let prefix = side.map(|s| format!("{s}: ")).unwrap_or_default();
            match node {
                Node::Split(split) => {
                    let criterion = split.criterion();
                    let label = column_label(criterion.column);
                    let rule = match &criterion.rule {
                        SplitRule::Threshold(t) => format!("{label} >= {t}"),
                        SplitRule::Equals(c) => format!("{label} == {c}"),
                    };
                    let _ = writeln!(
                        out,
                        "{indent}{prefix}{rule} (gain {:.4}, {} rows)",
                        split.gain(),
                        split.n_rows()
                    );
                    stack.push((depth + 1, Some("false"), split.false_branch()));
                    stack.push((depth + 1, Some("true"), split.true_branch()));
                }
                Node::Leaf(leaf) => {
                    let summary = match leaf.value() {
                        LeafValue::Distribution(counts) => {
                            let parts: Vec<String> =
                                counts.iter().map(|(c, n)| format!("{c}: {n}")).collect();
                            format!("{{{}}}", parts.join(", "))
                        }
                        LeafValue::Mean(m) => format!("mean {m}"),
                    };
                    let _ = writeln!(
                        out,
                        "{indent}{prefix}leaf {summary} (impurity {:.4})",
                        leaf.impurity()
                    );
                }
            }
        }
        out
    }
}

// ============================================================================
// Traversal
// ============================================================================

/// A node reached during traversal, with its distance from the root.
#[derive(Debug, Clone, Copy)]
pub struct NodeVisit<'a> {
    pub depth: usize,
    pub node: &'a Node,
}

/// Pre-order iterator over the nodes of a [`CartTree`].
#[derive(Debug, Clone)]
pub struct Nodes<'a> {
    stack: Vec<(usize, &'a Node)>,
}

impl<'a> Iterator for Nodes<'a> {
    type Item = NodeVisit<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let (depth, node) = self.stack.pop()?;
        if let Node::Split(split) = node {
            self.stack.push((depth + 1, split.false_branch()));
            self.stack.push((depth + 1, split.true_branch()));
        }
        Some(NodeVisit { depth, node })
    }
}
