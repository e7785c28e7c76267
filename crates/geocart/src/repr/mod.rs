//! Tree representation.
//!
//! A built tree is a strict hierarchy of [`Node`]s: each [`SplitNode`] owns
//! its two children, and [`LeafNode`]s carry the prediction. Traversal is
//! always root-to-leaf, so there are no parent links.

mod leaf;
mod node;
mod schema;
mod tree;

pub use leaf::{LeafNode, LeafValue};
pub use node::{Node, SplitCriterion, SplitNode, SplitRule};
pub use tree::{CartTree, NodeVisit, Nodes, TreeValidationError};
