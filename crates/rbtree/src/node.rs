use std::fmt;

/// Node color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Color {
    Red,
    Black,
}

/// Child slot of a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn opposite(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }

    fn slot(self) -> usize {
        match self {
            Side::Left => 0,
            Side::Right => 1,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Left => f.write_str("left"),
            Side::Right => f.write_str("right"),
        }
    }
}

/// Stable handle of a node inside its tree.
///
/// Nodes are never freed, so an id stays valid for the lifetime of the tree
/// that produced it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl NodeId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

pub(crate) type Link = Option<NodeId>;

#[derive(Clone, Debug)]
pub(crate) struct Node<K> {
    pub(crate) key: K,
    pub(crate) color: Color,
    /// Back-link only; the owning edge is the parent's child slot.
    pub(crate) parent: Link,
    children: [Link; 2],
}

impl<K> Node<K> {
    pub(crate) fn new(key: K, parent: Link) -> Self {
        Self {
            key,
            color: Color::Red,
            parent,
            children: [None, None],
        }
    }

    pub(crate) fn child(&self, side: Side) -> Link {
        self.children[side.slot()]
    }

    pub(crate) fn set_child(&mut self, side: Side, child: Link) {
        self.children[side.slot()] = child;
    }

    pub(crate) fn is_red(&self) -> bool {
        self.color == Color::Red
    }
}
