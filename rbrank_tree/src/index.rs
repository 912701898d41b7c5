use crate::node::NodeId;
use std::collections::HashMap;
use std::collections::hash_map;
use std::hash::Hash;

/// Key to owning-node map, consulted before every mutation.
#[derive(Debug, Clone)]
pub struct LookupIndex<K> {
    map: HashMap<K, NodeId>,
}

impl<K> LookupIndex<K> {
    pub fn new() -> Self {
        Self {
            map: HashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn clear(&mut self) {
        self.map.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, NodeId)> {
        self.map.iter().map(|(key, &node)| (key, node))
    }
}

impl<K: Hash + Eq> LookupIndex<K> {
    pub fn contains(&self, key: &K) -> bool {
        self.map.contains_key(key)
    }

    pub fn get(&self, key: &K) -> Option<NodeId> {
        self.map.get(key).copied()
    }

    /// Registers `key` as held by `node`, replacing any previous entry.
    pub fn put(&mut self, key: K, node: NodeId) {
        self.map.insert(key, node);
    }

    /// Moves an existing entry to a new holder without cloning the key.
    /// Returns false when the key is not indexed.
    pub(crate) fn repoint(&mut self, key: &K, node: NodeId) -> bool {
        match self.map.get_mut(key) {
            Some(slot) => {
                *slot = node;
                true
            }
            None => false,
        }
    }

    pub fn erase(&mut self, key: &K) -> Option<NodeId> {
        self.map.remove(key)
    }
}

impl<K> Default for LookupIndex<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, K> IntoIterator for &'a LookupIndex<K> {
    type Item = (&'a K, &'a NodeId);
    type IntoIter = hash_map::Iter<'a, K, NodeId>;

    fn into_iter(self) -> Self::IntoIter {
        self.map.iter()
    }
}
