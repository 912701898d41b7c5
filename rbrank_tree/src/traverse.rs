use crate::element::Element;
use crate::node::{NIL, NodeId};
use crate::rbt::RankTree;
use std::iter::FusedIterator;

/// In-order walk over a [`RankTree`], ascending by value.
///
/// Walks successor links, so it holds no stack. Call
/// [`RankTree::traverse`] again to start over.
pub struct Traverse<'a, K, V> {
    tree: &'a RankTree<K, V>,
    next: NodeId,
    remaining: usize,
}

impl<K, V> RankTree<K, V> {
    pub fn traverse(&self) -> Traverse<'_, K, V> {
        let next = if self.root == NIL {
            NIL
        } else {
            self.minimum(self.root)
        };
        Traverse {
            tree: self,
            next,
            remaining: self.index.len(),
        }
    }

    /// Node ids in in-order sequence.
    pub(crate) fn in_order_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        let start = if self.root == NIL {
            NIL
        } else {
            self.minimum(self.root)
        };
        std::iter::successors((start != NIL).then_some(start), move |&id| {
            let next = self.successor(id);
            (next != NIL).then_some(next)
        })
    }
}

impl<'a, K, V> Iterator for Traverse<'a, K, V> {
    type Item = &'a Element<K, V>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next == NIL {
            return None;
        }

        let tree = self.tree;
        let id = self.next;
        self.next = tree.successor(id);
        self.remaining = self.remaining.saturating_sub(1);
        Some(&tree.node(id).element)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Traverse<'_, K, V> {}

impl<K, V> FusedIterator for Traverse<'_, K, V> {}

impl<'a, K, V> IntoIterator for &'a RankTree<K, V> {
    type Item = &'a Element<K, V>;
    type IntoIter = Traverse<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.traverse()
    }
}
