use std::iter::FusedIterator;

use crate::RbTree;
use crate::node::{Color, Link, NodeId, Side};

/// Read-only handle to one node of a tree.
pub struct NodeRef<'a, K> {
    tree: &'a RbTree<K>,
    id: NodeId,
}

impl<K> Clone for NodeRef<'_, K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K> Copy for NodeRef<'_, K> {}

impl<'a, K> NodeRef<'a, K> {
    fn link(&self, link: Link) -> Option<NodeRef<'a, K>> {
        link.map(|id| NodeRef {
            tree: self.tree,
            id,
        })
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn key(&self) -> &'a K {
        &self.tree.node_at(self.id).key
    }

    pub fn color(&self) -> Color {
        self.tree.node_at(self.id).color
    }

    pub fn is_red(&self) -> bool {
        self.color() == Color::Red
    }

    pub fn is_black(&self) -> bool {
        self.color() == Color::Black
    }

    /// `None` marks an absent (NIL) child.
    pub fn child(&self, side: Side) -> Option<NodeRef<'a, K>> {
        self.link(self.tree.node_at(self.id).child(side))
    }

    pub fn left(&self) -> Option<NodeRef<'a, K>> {
        self.child(Side::Left)
    }

    pub fn right(&self) -> Option<NodeRef<'a, K>> {
        self.child(Side::Right)
    }

    pub fn parent(&self) -> Option<NodeRef<'a, K>> {
        self.link(self.tree.node_at(self.id).parent)
    }

    pub fn is_root(&self) -> bool {
        self.tree.root == Some(self.id)
    }
}

impl<K> RbTree<K> {
    pub fn root(&self) -> Option<NodeRef<'_, K>> {
        self.root.map(|id| NodeRef { tree: self, id })
    }

    pub fn node(&self, id: NodeId) -> Option<NodeRef<'_, K>> {
        (id.index() < self.nodes.len()).then_some(NodeRef { tree: self, id })
    }

    /// Nodes in ascending key order.
    pub fn iter(&self) -> Iter<'_, K> {
        let mut iter = Iter {
            tree: self,
            stack: Vec::new(),
            remaining: self.len(),
        };
        iter.push_left_spine(self.root);
        iter
    }

    /// Nodes parent-first, left subtree before right.
    pub fn pre_order(&self) -> PreOrder<'_, K> {
        PreOrder {
            tree: self,
            stack: self.root.into_iter().collect(),
            remaining: self.len(),
        }
    }

    pub fn keys(&self) -> Keys<'_, K> {
        Keys { inner: self.iter() }
    }
}

/// In-order traversal, see [`RbTree::iter`].
pub struct Iter<'a, K> {
    tree: &'a RbTree<K>,
    stack: Vec<NodeId>,
    remaining: usize,
}

impl<K> Iter<'_, K> {
    fn push_left_spine(&mut self, mut link: Link) {
        while let Some(id) = link {
            self.stack.push(id);
            link = self.tree.node_at(id).child(Side::Left);
        }
    }
}

impl<K> Clone for Iter<'_, K> {
    fn clone(&self) -> Self {
        Self {
            tree: self.tree,
            stack: self.stack.clone(),
            remaining: self.remaining,
        }
    }
}

impl<'a, K> Iterator for Iter<'a, K> {
    type Item = NodeRef<'a, K>;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        self.push_left_spine(self.tree.node_at(id).child(Side::Right));
        self.remaining -= 1;
        Some(NodeRef {
            tree: self.tree,
            id,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K> ExactSizeIterator for Iter<'_, K> {}

impl<K> FusedIterator for Iter<'_, K> {}

/// Pre-order traversal, see [`RbTree::pre_order`].
pub struct PreOrder<'a, K> {
    tree: &'a RbTree<K>,
    stack: Vec<NodeId>,
    remaining: usize,
}

impl<K> Clone for PreOrder<'_, K> {
    fn clone(&self) -> Self {
        Self {
            tree: self.tree,
            stack: self.stack.clone(),
            remaining: self.remaining,
        }
    }
}

impl<'a, K> Iterator for PreOrder<'a, K> {
    type Item = NodeRef<'a, K>;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        let node = self.tree.node_at(id);
        self.stack.extend(node.child(Side::Right));
        self.stack.extend(node.child(Side::Left));
        self.remaining -= 1;
        Some(NodeRef {
            tree: self.tree,
            id,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K> ExactSizeIterator for PreOrder<'_, K> {}

impl<K> FusedIterator for PreOrder<'_, K> {}

/// Keys in ascending order.
pub struct Keys<'a, K> {
    inner: Iter<'a, K>,
}

impl<K> Clone for Keys<'_, K> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<'a, K> Iterator for Keys<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|node| node.key())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K> ExactSizeIterator for Keys<'_, K> {}

impl<K> FusedIterator for Keys<'_, K> {}

impl<'a, K> IntoIterator for &'a RbTree<K> {
    type Item = NodeRef<'a, K>;
    type IntoIter = Iter<'a, K>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
