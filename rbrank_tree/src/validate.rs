//! Structural checks used by tests and the driver. None of this is needed
//! for `insert`/`remove` to be correct.

use crate::error::InvariantError;
use crate::node::{Color, NIL, NodeId};
use crate::rbt::RankTree;
use std::hash::Hash;

impl<K: Hash + Eq, V: Ord> RankTree<K, V> {
    /// Runs every check: root color, parent links, value order, red rule,
    /// black height and index agreement.
    pub fn validate(&self) -> Result<(), InvariantError> {
        self.check_index()?;
        if self.root == NIL {
            return Ok(());
        }

        if self.color(self.root) == Color::Red {
            return Err(InvariantError::RedRoot);
        }
        if self.parent(self.root) != NIL {
            return Err(InvariantError::ParentLink { node: self.root });
        }

        self.check_links()?;
        self.first_order_violation()
            .map_or(Ok(()), |node| Err(InvariantError::Order { node }))?;
        self.first_red_violation()
            .map_or(Ok(()), |(node, child)| Err(InvariantError::RedRed { node, child }))?;
        self.subtree_black_height(self.root).map(|_| ())
    }

    /// True when in-order values never decrease. Equal values are allowed.
    pub fn check_order(&self) -> bool {
        self.first_order_violation().is_none()
    }

    /// True when no red node anywhere in the tree has a red child.
    pub fn check_red_invariant(&self) -> bool {
        self.first_red_violation().is_none()
    }

    /// True when every path from the root to a leaf slot sees the same
    /// number of black nodes.
    pub fn check_black_height(&self) -> bool {
        self.black_height().is_some()
    }

    /// Black nodes between the root and any leaf slot, root excluded.
    /// `None` if paths disagree; `Some(0)` for an empty tree.
    pub fn black_height(&self) -> Option<usize> {
        if self.root == NIL {
            return Some(0);
        }
        self.subtree_black_height(self.root)
            .ok()
            .map(|height| height - usize::from(self.color(self.root) == Color::Black))
    }

    fn first_order_violation(&self) -> Option<NodeId> {
        let mut previous: Option<NodeId> = None;
        for id in self.in_order_ids() {
            let descends = previous
                .is_some_and(|prev| self.node(prev).element.value > self.node(id).element.value);
            if descends {
                return Some(id);
            }
            previous = Some(id);
        }
        None
    }

    fn first_red_violation(&self) -> Option<(NodeId, NodeId)> {
        self.in_order_ids()
            .filter(|&id| self.is_red(id))
            .find_map(|id| {
                [self.left(id), self.right(id)]
                    .into_iter()
                    .find(|&child| self.is_red(child))
                    .map(|child| (id, child))
            })
    }

    /// Black count from `id` (inclusive) down to any leaf slot. Computed
    /// bottom-up and compared where the two sides meet.
    fn subtree_black_height(&self, id: NodeId) -> Result<usize, InvariantError> {
        if id == NIL {
            return Ok(1);
        }

        let left = self.subtree_black_height(self.left(id))?;
        let right = self.subtree_black_height(self.right(id))?;
        if left != right {
            return Err(InvariantError::BlackHeight {
                node: id,
                left,
                right,
            });
        }

        Ok(left + usize::from(self.color(id) == Color::Black))
    }

    fn check_links(&self) -> Result<(), InvariantError> {
        for id in self.in_order_ids() {
            for child in [self.left(id), self.right(id)] {
                if child != NIL && self.parent(child) != id {
                    return Err(InvariantError::ParentLink { node: child });
                }
            }
        }
        Ok(())
    }

    fn check_index(&self) -> Result<(), InvariantError> {
        let indexed = self.index.len();
        let live = self.live_nodes();
        let reachable = self.in_order_ids().count();
        if indexed != live || live != reachable {
            return Err(InvariantError::Index {
                indexed,
                live: reachable,
            });
        }

        for (key, id) in self.index.iter() {
            if !self.is_live(id) || &self.node(id).element.key != key {
                return Err(InvariantError::StaleIndex { node: id });
            }
        }
        Ok(())
    }
}
