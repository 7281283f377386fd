//! Element tree: slotmap arena of elements, their hotkey scopes and properties.

pub mod node;
pub mod tree;

pub use node::{ElementId, ElementNode};
pub use tree::Dom;
