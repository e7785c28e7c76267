//! Serialized layout of [`CartTree`].
//!
//! The node hierarchy is flattened into a single array in pre-order, with
//! splits referring to their children by index. JSON nesting therefore stays
//! constant however deep the tree grows.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::data::{ColumnId, ColumnType};

use super::leaf::{LeafNode, LeafValue};
use super::node::{Node, SplitCriterion, SplitNode};
use super::tree::{CartTree, TreeValidationError};

/// Tree schema (flat node array, root at index 0).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct TreeSchema {
    pub class_column: ColumnId,
    pub class_type: ColumnType,
    pub feature_columns: Vec<ColumnId>,
    /// Children always come after their parent.
    pub nodes: Vec<NodeSchema>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum NodeSchema {
    Split {
        criterion: SplitCriterion,
        gain: f64,
        n_rows: usize,
        true_child: usize,
        false_child: usize,
    },
    Leaf {
        value: LeafValue,
        n_rows: usize,
        impurity: f64,
    },
}

impl From<&CartTree> for TreeSchema {
    fn from(tree: &CartTree) -> Self {
        let mut nodes = Vec::with_capacity(tree.n_nodes());
        // (node, parent index, reached through the parent's true branch)
        let mut stack: Vec<(&Node, Option<(usize, bool)>)> = vec![(tree.root(), None)];

        while let Some((node, parent)) = stack.pop() {
            let index = nodes.len();
            if let Some((parent, on_true)) = parent {
                if let NodeSchema::Split {
                    true_child,
                    false_child,
                    ..
                } = &mut nodes[parent]
                {
                    if on_true {
                        *true_child = index;
                    } else {
                        *false_child = index;
                    }
                }
            }

            match node {
                Node::Split(split) => {
                    nodes.push(NodeSchema::Split {
                        criterion: split.criterion().clone(),
                        gain: split.gain(),
                        n_rows: split.n_rows(),
                        true_child: 0,
                        false_child: 0,
                    });
                    stack.push((split.false_branch(), Some((index, false))));
                    stack.push((split.true_branch(), Some((index, true))));
                }
                Node::Leaf(leaf) => nodes.push(NodeSchema::Leaf {
                    value: leaf.value().clone(),
                    n_rows: leaf.n_rows(),
                    impurity: leaf.impurity(),
                }),
            }
        }

        Self {
            class_column: tree.class_column(),
            class_type: tree.class_type(),
            feature_columns: tree.feature_columns().to_vec(),
            nodes,
        }
    }
}

impl TryFrom<TreeSchema> for CartTree {
    type Error = TreeValidationError;

    /// Rebuild the hierarchy bottom-up.
    ///
    /// Every node except the root must be the child of exactly one split
    /// stored before it.
    fn try_from(schema: TreeSchema) -> Result<Self, Self::Error> {
        let mut built: Vec<Option<Node>> = vec![None; schema.nodes.len()];

        for (index, node) in schema.nodes.into_iter().enumerate().rev() {
            let node = match node {
                NodeSchema::Leaf {
                    value,
                    n_rows,
                    impurity,
                } => Node::Leaf(LeafNode::new(value, n_rows, impurity)),
                NodeSchema::Split {
                    criterion,
                    gain,
                    n_rows,
                    true_child,
                    false_child,
                } => {
                    let true_branch = take_child(&mut built, index, true_child)?;
                    let false_branch = take_child(&mut built, index, false_child)?;
                    Node::Split(SplitNode::new(
                        criterion,
                        gain,
                        n_rows,
                        true_branch,
                        false_branch,
                    ))
                }
            };
            built[index] = Some(node);
        }

        let mut built = built.into_iter();
        let root = built
            .next()
            .flatten()
            .ok_or(TreeValidationError::EmptyTree)?;
        if let Some(offset) = built.position(|node| node.is_some()) {
            return Err(TreeValidationError::OrphanNode { node: offset + 1 });
        }

        Ok(CartTree::new(
            root,
            schema.class_column,
            schema.class_type,
            schema.feature_columns,
        ))
    }
}

fn take_child(
    built: &mut [Option<Node>],
    parent: usize,
    child: usize,
) -> Result<Node, TreeValidationError> {
    let invalid = TreeValidationError::InvalidChild {
        node: parent,
        child,
    };
    if child <= parent {
        return Err(invalid);
    }
    built.get_mut(child).and_then(Option::take).ok_or(invalid)
}

impl Serialize for CartTree {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        TreeSchema::from(self).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for CartTree {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let schema = TreeSchema::deserialize(deserializer)?;
        CartTree::try_from(schema).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Category, CategoryCounts};

    fn leaf(label: &str, n: usize) -> NodeSchema {
        let counts: CategoryCounts = std::iter::repeat(Category::from(label)).take(n).collect();
        NodeSchema::Leaf {
            value: LeafValue::Distribution(counts),
            n_rows: n,
            impurity: 0.0,
        }
    }

    fn split(n_rows: usize, true_child: usize, false_child: usize) -> NodeSchema {
        NodeSchema::Split {
            criterion: SplitCriterion::threshold(0, 1.0),
            gain: 0.5,
            n_rows,
            true_child,
            false_child,
        }
    }

    fn schema(nodes: Vec<NodeSchema>) -> TreeSchema {
        TreeSchema {
            class_column: 1,
            class_type: ColumnType::Categorical,
            feature_columns: vec![0],
            nodes,
        }
    }

    #[test]
    fn nodes_are_stored_in_pre_order() {
        let inner = SplitNode::new(
            SplitCriterion::threshold(0, 2.0),
            0.25,
            2,
            Node::Leaf(LeafNode::new(LeafValue::Mean(1.0), 1, 0.0)),
            Node::Leaf(LeafNode::new(LeafValue::Mean(2.0), 1, 0.0)),
        );
        let root = SplitNode::new(
            SplitCriterion::threshold(0, 1.0),
            0.5,
            3,
            Node::Split(inner),
            Node::Leaf(LeafNode::new(LeafValue::Mean(0.0), 1, 0.0)),
        );
        let tree = CartTree::new(Node::Split(root), 1, ColumnType::Continuous, vec![0]);

        let flat = TreeSchema::from(&tree);
        assert_eq!(flat.nodes.len(), 5);
        assert!(matches!(
            flat.nodes[0],
            NodeSchema::Split {
                true_child: 1,
                false_child: 4,
                ..
            }
        ));
        assert!(matches!(
            flat.nodes[1],
            NodeSchema::Split {
                true_child: 2,
                false_child: 3,
                ..
            }
        ));
        assert_eq!(CartTree::try_from(flat).unwrap(), tree);
    }

    #[test]
    fn children_must_follow_their_parent() {
        let nodes = vec![split(2, 1, 2), split(2, 0, 2), leaf("a", 1)];
        assert_eq!(
            CartTree::try_from(schema(nodes)),
            Err(TreeValidationError::InvalidChild { node: 1, child: 0 })
        );

        let nodes = vec![split(2, 1, 5), leaf("a", 1), leaf("b", 1)];
        assert_eq!(
            CartTree::try_from(schema(nodes)),
            Err(TreeValidationError::InvalidChild { node: 0, child: 5 })
        );
    }

    #[test]
    fn shared_and_orphan_nodes_are_rejected() {
        let nodes = vec![split(2, 1, 1), leaf("a", 1)];
        assert_eq!(
            CartTree::try_from(schema(nodes)),
            Err(TreeValidationError::InvalidChild { node: 0, child: 1 })
        );

        let nodes = vec![split(2, 1, 2), leaf("a", 1), leaf("b", 1), leaf("c", 1)];
        assert_eq!(
            CartTree::try_from(schema(nodes)),
            Err(TreeValidationError::OrphanNode { node: 3 })
        );

        assert_eq!(
            CartTree::try_from(schema(Vec::new())),
            Err(TreeValidationError::EmptyTree)
        );
    }

    #[test]
    fn serde_goes_through_the_flat_layout() {
        let nodes = vec![split(2, 1, 2), leaf("a", 1), leaf("b", 1)];
        let tree = CartTree::try_from(schema(nodes)).unwrap();
        let value = serde_json::to_value(&tree).unwrap();
        assert_eq!(value["nodes"][0]["split"]["false_child"], 2);
        assert_eq!(value["nodes"][2]["leaf"]["n_rows"], 1);

        let back: CartTree = serde_json::from_value(value.clone()).unwrap();
        assert_eq!(back, tree);

        let mut broken = value;
        broken["nodes"][0]["split"]["true_child"] = serde_json::json!(0);
        assert!(serde_json::from_value::<CartTree>(broken).is_err());
    }
}
