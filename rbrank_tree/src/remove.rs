use crate::element::Element;
use crate::node::{Color, NIL, NodeId};
use crate::rbt::RankTree;
use log::{debug, trace};
use std::hash::Hash;

impl<K: Hash + Eq + Clone, V: Ord> RankTree<K, V> {
    /// Removes the element whose key matches `element`'s. Only the key is
    /// looked at. Returns false when the key is absent.
    pub fn remove(&mut self, element: &Element<K, V>) -> bool {
        self.remove_key(&element.key).is_some()
    }

    /// Removes the element stored under `key` and hands it back.
    ///
    /// ```rust
    /// # use rbrank_tree::{Element, RankTree};
    /// let mut tree = RankTree::new();
    /// tree.insert(Element::new(1u32, "b"));
    /// tree.insert(Element::new(2u32, "a"));
    ///
    /// let removed = tree.remove_key(&1).map(Element::into_parts);
    /// assert_eq!(removed, Some((1, "b")));
    /// assert!(tree.remove_key(&1).is_none());
    /// ```
    pub fn remove_key(&mut self, key: &K) -> Option<Element<K, V>> {
        let target = self.index.get(key)?;

        // Move the doomed element down into a node with at most one real
        // child, then cut that node out instead.
        let replacement = if self.right(target) != NIL {
            self.minimum(self.right(target))
        } else if self.left(target) != NIL {
            self.maximum(self.left(target))
        } else {
            NIL
        };

        let doomed = if replacement == NIL {
            target
        } else {
            debug!("swapping elements of {} and {} before removal", target, replacement);
            self.swap_elements(target, replacement);
            replacement
        };

        Some(self.splice(doomed))
    }

    /// Gives the element under `key` a new value, moving it to its new
    /// position. Returns the previous value, or `None` if the key is absent.
    pub fn update_value(&mut self, key: &K, value: V) -> Option<V> {
        let (key, previous) = self.remove_key(key)?.into_parts();
        let reinserted = self.insert(Element::new(key, value));
        debug_assert!(reinserted);
        Some(previous)
    }

    fn splice(&mut self, doomed: NodeId) -> Element<K, V> {
        let color = self.color(doomed);
        let (child, parent) = self.unlink(doomed);

        let element = self.release(doomed);
        self.index.erase(&element.key);

        if color == Color::Black {
            if self.is_red(child) {
                self.set_color(child, Color::Black);
            } else {
                self.remove_fixup(child, parent);
            }
        }

        element
    }

    /// Repairs a one-black deficit at the child slot `node` of `parent`.
    /// `node` may be NIL, which is why the parent travels alongside it.
    fn remove_fixup(&mut self, mut node: NodeId, mut parent: NodeId) {
        loop {
            // Case 1: the deficit reached the root and is absorbed there.
            if parent == NIL {
                trace!("remove case 1 at {}", node);
                return;
            }

            let mut sibling = self.sibling(node, parent);
            debug_assert!(sibling != NIL, "deficient slot without a sibling");

            // Case 2: red sibling. Rotate it above the parent so the new
            // sibling is black.
            if self.is_red(sibling) {
                trace!("remove case 2 at {}", node);
                self.set_color(parent, Color::Red);
                self.set_color(sibling, Color::Black);
                if node == self.left(parent) {
                    self.rotate_left(parent);
                } else {
                    self.rotate_right(parent);
                }
                sibling = self.sibling(node, parent);
            }

            if !self.is_red(self.left(sibling)) && !self.is_red(self.right(sibling)) {
                self.set_color(sibling, Color::Red);

                // Case 3: everything black, push the deficit up one level.
                if !self.is_red(parent) {
                    trace!("remove case 3 at {}", node);
                    node = parent;
                    parent = self.parent(parent);
                    continue;
                }

                // Case 4: a red parent pays for the missing black.
                trace!("remove case 4 at {}", node);
                self.set_color(parent, Color::Black);
                return;
            }

            self.rotate_far_red(node, parent, sibling);
            return;
        }
    }

    /// Cases 5 and 6: the sibling is black with at least one red child.
    fn rotate_far_red(&mut self, node: NodeId, parent: NodeId, mut sibling: NodeId) {
        debug_assert!(!self.is_red(sibling));
        let node_is_left = node == self.left(parent);
        let (near, far) = if node_is_left {
            (self.left(sibling), self.right(sibling))
        } else {
            (self.right(sibling), self.left(sibling))
        };

        // Case 5: only the near nephew is red. Rotate it into the sibling
        // position so the red ends up on the far side.
        if !self.is_red(far) {
            trace!("remove case 5 at {}", node);
            self.set_color(sibling, Color::Red);
            self.set_color(near, Color::Black);
            if node_is_left {
                self.rotate_right(sibling);
            } else {
                self.rotate_left(sibling);
            }
            sibling = near;
        }

        // Case 6: red far nephew.
        trace!("remove case 6 at {}", node);
        let far = if node_is_left {
            self.right(sibling)
        } else {
            self.left(sibling)
        };
        self.set_color(sibling, self.color(parent));
        self.set_color(parent, Color::Black);
        self.set_color(far, Color::Black);
        if node_is_left {
            self.rotate_left(parent);
        } else {
            self.rotate_right(parent);
        }
    }
}
