//! Red-black tree with parent back-links, stored in an index arena.
//!
//! Insertion walks down to a leaf, attaches a red node and repairs the
//! coloring bottom-up with recoloring and at most two rotations. There is no
//! deletion.

mod check;
mod error;
mod node;
mod rotate;
mod traversal;
mod tree;

pub use error::{DuplicateKey, StructuralInconsistency, Violation};
pub use node::{Color, NodeId, Side};
pub use traversal::{Iter, Keys, NodeRef, PreOrder};
pub use tree::RbTree;
