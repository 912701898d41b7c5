use crate::element::Element;

pub type NodeId = u32;

/// Sentinel id. Every absent child or parent link points here; it is never
/// allocated in the arena and always reads as black.
pub const NIL: NodeId = u32::MAX;

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Red,
    Black,
}

#[derive(Debug, Clone)]
pub(crate) struct Node<K, V> {
    pub(crate) left: NodeId,
    pub(crate) right: NodeId,
    pub(crate) parent: NodeId,
    pub(crate) color: Color,
    pub(crate) element: Element<K, V>,
}

impl<K, V> Node<K, V> {
    pub(crate) fn new(element: Element<K, V>) -> Self {
        Self {
            left: NIL,
            right: NIL,
            parent: NIL,
            color: Color::Red,
            element,
        }
    }
}

/// Arena slot. Vacant slots form an intrusive free list so ids of destroyed
/// nodes get reused by later insertions.
#[derive(Debug, Clone)]
pub(crate) enum Slot<K, V> {
    Occupied(Node<K, V>),
    Vacant { next_free: NodeId },
}
