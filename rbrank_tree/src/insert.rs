use crate::element::Element;
use crate::node::{Color, NIL, NodeId};
use crate::rbt::RankTree;
use log::trace;
use std::hash::Hash;

impl<K: Hash + Eq + Clone, V: Ord> RankTree<K, V> {
    /// Inserts `element`, returning false (and leaving the tree untouched)
    /// when its key is already present.
    ///
    /// ```rust
    /// # use rbrank_tree::{Element, RankTree};
    /// let mut tree = RankTree::new();
    /// assert!(tree.insert(Element::new("a", 3)));
    /// assert!(!tree.insert(Element::new("a", 9)));
    /// assert_eq!(tree.get(&"a").map(|e| *e.value()), Some(3));
    /// ```
    pub fn insert(&mut self, element: Element<K, V>) -> bool {
        if self.index.contains(&element.key) {
            return false;
        }

        let key = element.key.clone();
        let id = self.alloc(element);

        if self.root == NIL {
            self.root = id;
        } else {
            // Ties descend right, so equal values keep insertion order.
            let mut current = self.root;
            let mut parent = NIL;
            let mut go_left = false;

            while current != NIL {
                parent = current;
                go_left = self.node(current).element.value > self.node(id).element.value;
                current = if go_left {
                    self.left(current)
                } else {
                    self.right(current)
                };
            }

            self.node_mut(id).parent = parent;
            if go_left {
                self.node_mut(parent).left = id;
            } else {
                self.node_mut(parent).right = id;
            }
        }

        self.index.put(key, id);
        self.insert_fixup(id);
        true
    }

    /// Restores the red-black properties above the freshly linked red node.
    fn insert_fixup(&mut self, mut node: NodeId) {
        loop {
            let parent = self.parent(node);

            // Case 1: node is the root.
            if parent == NIL {
                trace!("insert case 1 at {}", node);
                self.set_color(node, Color::Black);
                return;
            }

            // Case 2: black parent, nothing violated.
            if !self.is_red(parent) {
                trace!("insert case 2 at {}", node);
                return;
            }

            // A red parent is never the root, so the grandparent is real.
            let grandparent = self.parent(parent);
            let uncle = self.uncle(node);

            // Case 3: red uncle. Push the blackness down one level and retry
            // from the grandparent.
            if self.is_red(uncle) {
                trace!("insert case 3 at {}", node);
                self.set_color(parent, Color::Black);
                self.set_color(uncle, Color::Black);
                self.set_color(grandparent, Color::Red);
                node = grandparent;
                continue;
            }

            let node = self.straighten(node, parent, grandparent);
            self.rotate_outer(node);
            return;
        }
    }

    /// Case 4: turns an inner grandchild into an outer one. Returns the node
    /// that now sits at the bottom of the straightened chain.
    fn straighten(&mut self, node: NodeId, parent: NodeId, grandparent: NodeId) -> NodeId {
        if node == self.right(parent) && parent == self.left(grandparent) {
            trace!("insert case 4 (left) at {}", node);
            self.rotate_left(parent);
            self.left(node)
        } else if node == self.left(parent) && parent == self.right(grandparent) {
            trace!("insert case 4 (right) at {}", node);
            self.rotate_right(parent);
            self.right(node)
        } else {
            node
        }
    }

    /// Case 5: outer grandchild. Rotates the grandparent away from `node`.
    fn rotate_outer(&mut self, node: NodeId) {
        let parent = self.parent(node);
        let grandparent = self.parent(parent);
        trace!("insert case 5 at {}", node);

        self.set_color(parent, Color::Black);
        self.set_color(grandparent, Color::Red);
        if node == self.left(parent) {
            self.rotate_right(grandparent);
        } else {
            self.rotate_left(grandparent);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn insert_all(tree: &mut RankTree<usize, i32>, values: &[i32]) {
        for &value in values {
            let key = tree.len();
            assert!(tree.insert(Element::new(key, value)));
            assert!(tree.validate().is_ok(), "broken after inserting {}", value);
        }
    }

    #[test]
    fn test_first_insert_becomes_black_root() {
        let mut tree = RankTree::new();
        assert!(tree.insert(Element::new(1u8, 42)));
        assert_eq!(tree.root_color(), Some(Color::Black));
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn test_duplicate_key_rejected_without_mutation() {
        let mut tree = RankTree::new();
        insert_all(&mut tree, &[5, 1, 9]);
        let before: Vec<_> = tree.traverse().cloned().collect();

        assert!(!tree.insert(Element::new(1, 100)));

        let after: Vec<_> = tree.traverse().cloned().collect();
        assert_eq!(before, after);
        assert_eq!(tree.len(), 3);
    }

    #[test]
    fn test_ascending_run_stays_balanced() {
        let mut tree = RankTree::new();
        let values: Vec<i32> = (0..256).collect();
        insert_all(&mut tree, &values);

        // 256 nodes fit in a tree of black-height <= 8.
        let height = tree.black_height().unwrap_or(usize::MAX);
        assert!(height <= 8, "black height {}", height);
    }

    #[test]
    fn test_descending_run_stays_balanced() {
        let mut tree = RankTree::new();
        let values: Vec<i32> = (0..256).rev().collect();
        insert_all(&mut tree, &values);
        let sorted: Vec<i32> = tree.traverse().map(|e| *e.value()).collect();
        assert_eq!(sorted, (0..256).collect::<Vec<_>>());
    }

    #[test]
    fn test_inner_grandchild_cases() {
        // 10, 5, 7 forces the left-right shape; 20, 30, 25 the right-left one.
        let mut tree = RankTree::new();
        insert_all(&mut tree, &[10, 5, 7]);
        assert_eq!(tree.node(tree.root).element.value, 7);

        let mut tree = RankTree::new();
        insert_all(&mut tree, &[20, 30, 25]);
        assert_eq!(tree.node(tree.root).element.value, 25);
    }

    #[test]
    fn test_equal_values_go_right() {
        let mut tree = RankTree::new();
        insert_all(&mut tree, &[4, 4, 4, 4, 4]);
        let keys: Vec<usize> = tree.traverse().map(|e| *e.key()).collect();
        assert_eq!(keys, vec![0, 1, 2, 3, 4]);
        assert!(tree.check_order());
    }
}
