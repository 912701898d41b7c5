use crate::element::Element;
use crate::index::LookupIndex;
use crate::node::{Color, NIL, Node, NodeId, Slot};
use log::trace;
use std::hash::Hash;
use std::mem;

/// Red-black tree over element values, with a key index for identity lookups.
///
/// Nodes live in an arena and link to each other by [`NodeId`]; the [`NIL`]
/// id stands in for every absent child. Values decide tree position (equal
/// values are allowed and go right of their equals), keys are unique and only
/// used to find the node that owns an element.
#[derive(Debug, Clone)]
pub struct RankTree<K, V> {
    pub(crate) root: NodeId,
    slots: Vec<Slot<K, V>>,
    free_head: NodeId,
    pub(crate) index: LookupIndex<K>,
}

impl<K: Hash + Eq, V> RankTree<K, V> {
    pub fn new() -> Self {
        Self {
            root: NIL,
            slots: Vec::new(),
            free_head: NIL,
            index: LookupIndex::new(),
        }
    }

    /// Same as [`RankTree::new`].
    pub fn create() -> Self {
        Self::new()
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.root == NIL
    }

    pub fn clear(&mut self) {
        self.root = NIL;
        self.slots.clear();
        self.free_head = NIL;
        self.index.clear();
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.index.contains(key)
    }

    pub fn get(&self, key: &K) -> Option<&Element<K, V>> {
        self.index.get(key).map(|id| &self.node(id).element)
    }

    /// Element with the smallest value.
    pub fn first(&self) -> Option<&Element<K, V>> {
        (self.root != NIL).then(|| &self.node(self.minimum(self.root)).element)
    }

    /// Element with the largest value.
    pub fn last(&self) -> Option<&Element<K, V>> {
        (self.root != NIL).then(|| &self.node(self.maximum(self.root)).element)
    }

    pub fn root_color(&self) -> Option<Color> {
        (self.root != NIL).then(|| self.color(self.root))
    }

    pub fn index(&self) -> &LookupIndex<K> {
        &self.index
    }
}

impl<K: Hash + Eq, V> Default for RankTree<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

// Arena and relationship accessors. Asking for a field of NIL is a bug in the
// engine, not a caller error.
impl<K, V> RankTree<K, V> {
    #[inline]
    pub(crate) fn node(&self, id: NodeId) -> &Node<K, V> {
        match self.slots.get(id as usize) {
            Some(Slot::Occupied(node)) => node,
            _ => unreachable!("node {} is not live", id),
        }
    }

    #[inline]
    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node<K, V> {
        match self.slots.get_mut(id as usize) {
            Some(Slot::Occupied(node)) => node,
            _ => unreachable!("node {} is not live", id),
        }
    }

    pub(crate) fn live_nodes(&self) -> usize {
        self.slots
            .iter()
            .filter(|slot| matches!(slot, Slot::Occupied(_)))
            .count()
    }

    pub(crate) fn is_live(&self, id: NodeId) -> bool {
        matches!(self.slots.get(id as usize), Some(Slot::Occupied(_)))
    }

    pub(crate) fn alloc(&mut self, element: Element<K, V>) -> NodeId {
        let node = Node::new(element);

        if self.free_head != NIL {
            let id = self.free_head;
            let slot = mem::replace(&mut self.slots[id as usize], Slot::Occupied(node));
            self.free_head = match slot {
                Slot::Vacant { next_free } => next_free,
                Slot::Occupied(_) => unreachable!("free list points at live node {}", id),
            };
            return id;
        }

        let id = match NodeId::try_from(self.slots.len()) {
            Ok(id) if id != NIL => id,
            _ => panic!("rank tree arena exhausted"),
        };
        self.slots.push(Slot::Occupied(node));
        id
    }

    pub(crate) fn release(&mut self, id: NodeId) -> Element<K, V> {
        let vacant = Slot::Vacant {
            next_free: self.free_head,
        };
        match mem::replace(&mut self.slots[id as usize], vacant) {
            Slot::Occupied(node) => {
                self.free_head = id;
                node.element
            }
            Slot::Vacant { .. } => unreachable!("double release of node {}", id),
        }
    }

    #[inline]
    pub(crate) fn color(&self, id: NodeId) -> Color {
        if id == NIL {
            Color::Black
        } else {
            self.node(id).color
        }
    }

    #[inline]
    pub(crate) fn set_color(&mut self, id: NodeId, color: Color) {
        self.node_mut(id).color = color;
    }

    #[inline]
    pub(crate) fn is_red(&self, id: NodeId) -> bool {
        self.color(id) == Color::Red
    }

    #[inline]
    pub(crate) fn left(&self, id: NodeId) -> NodeId {
        self.node(id).left
    }

    #[inline]
    pub(crate) fn right(&self, id: NodeId) -> NodeId {
        self.node(id).right
    }

    #[inline]
    pub(crate) fn parent(&self, id: NodeId) -> NodeId {
        self.node(id).parent
    }

    pub(crate) fn grandparent(&self, id: NodeId) -> NodeId {
        match self.parent(id) {
            NIL => NIL,
            parent => self.parent(parent),
        }
    }

    pub(crate) fn uncle(&self, id: NodeId) -> NodeId {
        let grandparent = self.grandparent(id);
        if grandparent == NIL {
            return NIL;
        }
        self.sibling(self.parent(id), grandparent)
    }

    /// Sibling of the child slot `id` occupies under `parent`. Takes the
    /// parent explicitly because `id` may be NIL during deletion fix-up.
    pub(crate) fn sibling(&self, id: NodeId, parent: NodeId) -> NodeId {
        if id == self.left(parent) {
            self.right(parent)
        } else {
            self.left(parent)
        }
    }

    pub(crate) fn minimum(&self, mut id: NodeId) -> NodeId {
        while self.left(id) != NIL {
            id = self.left(id);
        }
        id
    }

    pub(crate) fn maximum(&self, mut id: NodeId) -> NodeId {
        while self.right(id) != NIL {
            id = self.right(id);
        }
        id
    }

    /// In-order successor of `id`, or NIL past the last node.
    pub(crate) fn successor(&self, id: NodeId) -> NodeId {
        if self.right(id) != NIL {
            return self.minimum(self.right(id));
        }

        let mut child = id;
        let mut parent = self.parent(id);
        while parent != NIL && child == self.right(parent) {
            child = parent;
            parent = self.parent(parent);
        }
        parent
    }

    /// Points whichever slot held `old` (a child slot of `parent`, or the
    /// root) at `new`.
    fn replace_child(&mut self, parent: NodeId, old: NodeId, new: NodeId) {
        if parent == NIL {
            self.root = new;
        } else if self.left(parent) == old {
            self.node_mut(parent).left = new;
        } else {
            self.node_mut(parent).right = new;
        }
    }

    /// Lifts `x`'s right child into `x`'s place. O(1), never touches the index.
    pub(crate) fn rotate_left(&mut self, x: NodeId) {
        let y = self.right(x);
        debug_assert!(y != NIL, "rotate_left without a right child");
        let y_left = self.left(y);
        let x_parent = self.parent(x);
        trace!("rotate left at {}", x);

        self.node_mut(x).right = y_left;
        if y_left != NIL {
            self.node_mut(y_left).parent = x;
        }

        self.node_mut(y).parent = x_parent;
        self.replace_child(x_parent, x, y);

        self.node_mut(y).left = x;
        self.node_mut(x).parent = y;
    }

    /// Lifts `y`'s left child into `y`'s place. O(1), never touches the index.
    pub(crate) fn rotate_right(&mut self, y: NodeId) {
        let x = self.left(y);
        debug_assert!(x != NIL, "rotate_right without a left child");
        let x_right = self.right(x);
        let y_parent = self.parent(y);
        trace!("rotate right at {}", y);

        self.node_mut(y).left = x_right;
        if x_right != NIL {
            self.node_mut(x_right).parent = y;
        }

        self.node_mut(x).parent = y_parent;
        self.replace_child(y_parent, y, x);

        self.node_mut(x).right = y;
        self.node_mut(y).parent = x;
    }

    /// Removes `id` (which has at most one real child) from the linkage,
    /// handing its place to that child. Returns the child (possibly NIL) and
    /// the parent it now hangs from.
    pub(crate) fn unlink(&mut self, id: NodeId) -> (NodeId, NodeId) {
        let node = self.node(id);
        debug_assert!(node.left == NIL || node.right == NIL);
        let child = if node.left != NIL { node.left } else { node.right };
        let parent = node.parent;

        if child != NIL {
            self.node_mut(child).parent = parent;
        }
        self.replace_child(parent, id, child);
        (child, parent)
    }
}

impl<K: Eq + Hash, V> RankTree<K, V> {
    /// Exchanges the elements held by `a` and `b` and repoints both keys in
    /// the index. Node colors and links stay where they are.
    pub(crate) fn swap_elements(&mut self, a: NodeId, b: NodeId) {
        debug_assert_ne!(a, b);
        let (lo, hi) = if a < b { (a, b) } else { (b, a) };
        let (head, tail) = self.slots.split_at_mut(hi as usize);

        match (&mut head[lo as usize], &mut tail[0]) {
            (Slot::Occupied(low), Slot::Occupied(high)) => {
                mem::swap(&mut low.element, &mut high.element);
                self.index.repoint(&low.element.key, lo);
                self.index.repoint(&high.element.key, hi);
            }
            _ => unreachable!("swap between {} and {} touches a vacant slot", a, b),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree_of(values: &[i32]) -> RankTree<usize, i32> {
        let mut tree = RankTree::new();
        for (key, &value) in values.iter().enumerate() {
            assert!(tree.insert(Element::new(key, value)));
        }
        tree
    }

    fn values_of(tree: &RankTree<usize, i32>) -> Vec<i32> {
        tree.traverse().map(|e| *e.value()).collect()
    }

    #[test]
    fn test_empty_tree() {
        let tree: RankTree<u64, i32> = RankTree::create();
        assert!(tree.is_empty());
        assert_eq!(tree.len(), 0);
        assert_eq!(tree.first(), None);
        assert_eq!(tree.last(), None);
        assert_eq!(tree.root_color(), None);
        assert!(tree.get(&0).is_none());
        assert!(tree.validate().is_ok());
    }

    #[test]
    fn test_rotate_left_preserves_order() {
        let mut tree = tree_of(&[10, 5, 20, 15, 25]);
        let before = values_of(&tree);
        let root = tree.root;
        let right = tree.right(root);

        tree.rotate_left(root);

        assert_eq!(tree.root, right);
        assert_eq!(tree.parent(right), NIL);
        assert_eq!(tree.left(right), root);
        assert_eq!(tree.parent(root), right);
        assert_eq!(values_of(&tree), before);
    }

    #[test]
    fn test_rotate_right_preserves_order() {
        let mut tree = tree_of(&[10, 5, 20, 3, 7]);
        let before = values_of(&tree);
        let root = tree.root;
        let left = tree.left(root);
        let moved = tree.right(left);

        tree.rotate_right(root);

        assert_eq!(tree.root, left);
        assert_eq!(tree.right(left), root);
        assert_eq!(tree.parent(root), left);
        assert_eq!(tree.left(root), moved);
        assert_eq!(tree.parent(moved), root);
        assert_eq!(values_of(&tree), before);
    }

    #[test]
    fn test_rotation_below_root_repoints_parent() {
        let mut tree = tree_of(&[50, 25, 75, 60, 90, 80]);
        let root = tree.root;
        let pivot = tree.right(root);
        let lifted = tree.left(pivot);
        let before = values_of(&tree);

        tree.rotate_right(pivot);

        assert_eq!(tree.right(root), lifted);
        assert_eq!(tree.parent(lifted), root);
        assert_eq!(values_of(&tree), before);
    }

    #[test]
    fn test_relationships() {
        let tree = tree_of(&[10, 5, 20, 3]);
        let root = tree.root;
        let five = tree.left(root);
        let twenty = tree.right(root);
        let three = tree.left(five);

        assert_eq!(tree.grandparent(three), root);
        assert_eq!(tree.uncle(three), twenty);
        assert_eq!(tree.sibling(five, root), twenty);
        assert_eq!(tree.uncle(five), NIL);
        assert_eq!(tree.grandparent(root), NIL);
    }

    #[test]
    fn test_released_slots_are_reused() {
        let mut tree = tree_of(&[1, 2, 3]);
        assert!(tree.remove_key(&1).is_some());
        let slots = tree.slots.len();

        assert!(tree.insert(Element::new(9, 4)));
        assert_eq!(tree.slots.len(), slots);
        assert_eq!(tree.live_nodes(), 3);
        assert!(tree.validate().is_ok());
    }

    #[test]
    fn test_fixed_sample_insert_then_remove() {
        let values = [816, 444, 366, 975, 497, 696];
        let mut tree = tree_of(&values);

        assert_eq!(values_of(&tree), vec![366, 444, 497, 696, 816, 975]);
        assert_eq!(tree.root_color(), Some(Color::Black));
        assert!(tree.check_red_invariant());
        assert!(tree.check_black_height());

        for key in 0..values.len() {
            assert!(tree.remove_key(&key).is_some());
            assert_eq!(tree.validate(), Ok(()));
            assert!(!tree.contains_key(&key));
        }
        assert!(tree.is_empty());
        assert!(tree.index().is_empty());
    }

    #[test]
    fn test_first_last_and_clear() {
        let mut tree = tree_of(&[816, 444, 366, 975, 497, 696]);
        assert_eq!(tree.first().map(|e| *e.value()), Some(366));
        assert_eq!(tree.last().map(|e| *e.value()), Some(975));

        tree.clear();
        assert!(tree.is_empty());
        assert!(tree.index().is_empty());
        assert!(tree.insert(Element::new(0, 1)));
        assert_eq!(tree.root_color(), Some(Color::Black));
    }

    mod properties {
        use super::*;
        use quickcheck::TestResult;
        use quickcheck_macros::quickcheck;
        use std::collections::HashMap;

        #[quickcheck]
        fn insert_then_remove_keeps_invariants(values: Vec<i16>, removals: Vec<usize>) -> TestResult {
            if values.is_empty() {
                return TestResult::discard();
            }

            let mut tree = RankTree::new();
            let mut model = HashMap::new();

            for (key, &value) in values.iter().enumerate() {
                if !tree.insert(Element::new(key, value)) {
                    return TestResult::failed();
                }
                model.insert(key, value);
                if tree.validate().is_err() || tree.len() != model.len() {
                    return TestResult::failed();
                }
            }

            for i in removals {
                let key = i % values.len();
                let expected = model.remove(&key);
                let removed = tree.remove_key(&key).map(|e| e.value);
                if removed != expected || tree.contains_key(&key) {
                    return TestResult::failed();
                }
                if tree.validate().is_err() || tree.len() != model.len() {
                    return TestResult::failed();
                }
            }

            for (key, value) in &model {
                if tree.get(key).map(|e| &e.value) != Some(value) {
                    return TestResult::failed();
                }
            }

            TestResult::passed()
        }

        #[quickcheck]
        fn traversal_is_sorted(values: Vec<i32>) -> bool {
            let mut tree = RankTree::new();
            for (key, &value) in values.iter().enumerate() {
                tree.insert(Element::new(key, value));
            }

            let mut expected = values.clone();
            expected.sort();
            let walked: Vec<i32> = tree.traverse().map(|e| e.value).collect();
            walked == expected
        }

        #[quickcheck]
        fn duplicate_keys_change_nothing(values: Vec<u8>, candidate: u8, value: u8) -> bool {
            let mut tree = RankTree::new();
            for &v in &values {
                tree.insert(Element::new(v, v));
            }
            let before: Vec<_> = tree.traverse().cloned().collect();

            let inserted = tree.insert(Element::new(candidate, value));
            if inserted == values.contains(&candidate) {
                return false;
            }
            if inserted {
                return tree.remove_key(&candidate).is_some()
                    && tree.traverse().cloned().collect::<Vec<_>>() == before;
            }
            tree.traverse().cloned().collect::<Vec<_>>() == before
        }

        #[quickcheck]
        fn removing_everything_empties_the_tree(values: Vec<i32>, seed: u64) -> bool {
            use rand::SeedableRng;
            use rand::rngs::StdRng;
            use rand::seq::SliceRandom;

            let mut tree = RankTree::new();
            let mut keys: Vec<usize> = Vec::new();
            for (key, &value) in values.iter().enumerate() {
                tree.insert(Element::new(key, value));
                keys.push(key);
            }

            keys.shuffle(&mut StdRng::seed_from_u64(seed));
            for key in keys {
                if tree.remove_key(&key).is_none() || tree.validate().is_err() {
                    return false;
                }
            }
            tree.is_empty() && tree.index().is_empty() && tree.live_nodes() == 0
        }
    }
}
