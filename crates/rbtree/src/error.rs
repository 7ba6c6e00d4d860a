use thiserror::Error;

use crate::node::{NodeId, Side};

/// Returned by insertion when the key is already present. The tree is left
/// unchanged and the rejected key is handed back.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("tree already contains key {key:?}")]
pub struct DuplicateKey<K> {
    key: K,
}

impl<K> DuplicateKey<K> {
    pub(crate) fn new(key: K) -> Self {
        Self { key }
    }

    pub fn key(&self) -> &K {
        &self.key
    }

    pub fn into_key(self) -> K {
        self.key
    }
}

/// Broken link structure met while restructuring. Only a bug in the tree
/// itself can produce one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum StructuralInconsistency {
    #[error("node {child} is not a child of its recorded parent {parent}")]
    NotAChild { parent: NodeId, child: NodeId },
    #[error("node {node} has no {side} child to rotate up")]
    MissingChild { node: NodeId, side: Side },
    #[error("red node {node} has no parent")]
    RedRoot { node: NodeId },
}

/// First invariant violation found by [`crate::RbTree::validate`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum Violation {
    #[error("root {root} is red")]
    RedRoot { root: NodeId },
    #[error("red node {parent} has red child {child}")]
    RedRed { parent: NodeId, child: NodeId },
    #[error("black height differs below {node}: left {left}, right {right}")]
    BlackHeight {
        node: NodeId,
        left: usize,
        right: usize,
    },
    #[error("key of {node} is out of order")]
    Order { node: NodeId },
    #[error("parent link of {node} does not point at its owner")]
    ParentLink { node: NodeId },
    #[error("{reachable} nodes reachable from the root, {len} stored")]
    Count { reachable: usize, len: usize },
}
