/// A caller-supplied entry: `key` identifies it, `value` positions it in the tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Element<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
}

impl<K, V> Element<K, V> {
    pub fn new(key: K, value: V) -> Self {
        Self { key, value }
    }

    pub fn key(&self) -> &K {
        &self.key
    }

    pub fn value(&self) -> &V {
        &self.value
    }

    pub fn into_parts(self) -> (K, V) {
        (self.key, self.value)
    }
}

impl<K, V> From<(K, V)> for Element<K, V> {
    fn from((key, value): (K, V)) -> Self {
        Self::new(key, value)
    }
}
