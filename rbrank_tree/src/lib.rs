//! Red-black tree that orders elements by value and finds them by key.

mod element;
mod error;
mod index;
mod insert;
mod node;
mod rbt;
mod remove;
mod traverse;
mod validate;

pub use element::Element;
pub use error::InvariantError;
pub use index::LookupIndex;
pub use node::{Color, NIL, NodeId};
pub use rbt::RankTree;
pub use traverse::Traverse;
