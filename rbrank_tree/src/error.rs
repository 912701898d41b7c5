use crate::node::NodeId;

/// Which red-black or bookkeeping property a validator found broken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvariantError {
    /// The root of a non-empty tree is red.
    RedRoot,
    /// A red node has a red child.
    RedRed { node: NodeId, child: NodeId },
    /// Two paths below `node` see different numbers of black nodes.
    BlackHeight {
        node: NodeId,
        left: usize,
        right: usize,
    },
    /// An in-order neighbour of `node` has a smaller value.
    Order { node: NodeId },
    /// A child does not point back at its parent.
    ParentLink { node: NodeId },
    /// The index and the node set disagree.
    Index { indexed: usize, live: usize },
    /// An index entry points at a node that does not hold that key.
    StaleIndex { node: NodeId },
}

impl std::fmt::Display for InvariantError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InvariantError::RedRoot => write!(f, "Root is red"),
            InvariantError::RedRed { node, child } => {
                write!(f, "Red node {} has red child {}", node, child)
            }
            InvariantError::BlackHeight { node, left, right } => write!(
                f,
                "Black height mismatch below {} (left {}, right {})",
                node, left, right
            ),
            InvariantError::Order { node } => write!(f, "Value order broken at {}", node),
            InvariantError::ParentLink { node } => {
                write!(f, "Node {} has a wrong parent link", node)
            }
            InvariantError::Index { indexed, live } => write!(
                f,
                "Index holds {} keys but tree holds {} nodes",
                indexed, live
            ),
            InvariantError::StaleIndex { node } => {
                write!(f, "Index entry points at wrong node {}", node)
            }
        }
    }
}

impl std::error::Error for InvariantError {}
