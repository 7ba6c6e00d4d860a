use std::borrow::Borrow;
use std::cmp::Ordering;
use std::convert::Infallible;
use std::fmt;

use tracing::{debug, error, trace};

use crate::error::{DuplicateKey, StructuralInconsistency};
use crate::node::{Color, Link, Node, NodeId, Side};

/// Red-black tree set.
///
/// Nodes live in an arena owned by the tree; child slots are the owning
/// edges and `parent` is an index back-link. Only insertion is supported, so
/// arena slots are never reused.
#[derive(Clone)]
pub struct RbTree<K> {
    pub(crate) nodes: Vec<Node<K>>,
    pub(crate) root: Link,
}

impl<K> RbTree<K> {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            root: None,
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub(crate) fn node_at(&self, id: NodeId) -> &Node<K> {
        &self.nodes[id.index()]
    }

    pub(crate) fn node_at_mut(&mut self, id: NodeId) -> &mut Node<K> {
        &mut self.nodes[id.index()]
    }

    pub(crate) fn is_red(&self, link: Link) -> bool {
        link.is_some_and(|id| self.node_at(id).is_red())
    }

    fn set_color(&mut self, id: NodeId, color: Color) {
        self.node_at_mut(id).color = color;
    }

    /// Which slot of `parent` holds `child`.
    pub(crate) fn side_of(
        &self,
        child: NodeId,
        parent: NodeId,
    ) -> Result<Side, StructuralInconsistency> {
        let node = self.node_at(parent);
        if node.child(Side::Left) == Some(child) {
            Ok(Side::Left)
        } else if node.child(Side::Right) == Some(child) {
            Ok(Side::Right)
        } else {
            Err(StructuralInconsistency::NotAChild { parent, child })
        }
    }

    /// Inserts `key` ordered by a fallible three-way `compare`.
    ///
    /// A comparator error is returned as-is in the outer `Err`; the inner
    /// result reports a duplicate. In both failure cases nothing is mutated.
    pub fn try_insert_by<E, F>(
        &mut self,
        key: K,
        mut compare: F,
    ) -> Result<Result<(), DuplicateKey<K>>, E>
    where
        F: FnMut(&K, &K) -> Result<Ordering, E>,
    {
        let mut parent = None;
        let mut side = Side::Left;
        let mut cur = self.root;
        while let Some(id) = cur {
            let node = self.node_at(id);
            side = match compare(&key, &node.key)? {
                Ordering::Less => Side::Left,
                Ordering::Greater => Side::Right,
                Ordering::Equal => return Ok(Err(DuplicateKey::new(key))),
            };
            parent = Some(id);
            cur = node.child(side);
        }

        let id = NodeId::new(self.nodes.len());
        self.nodes.push(Node::new(key, parent));
        match parent {
            None => self.root = Some(id),
            Some(parent) => self.node_at_mut(parent).set_child(side, Some(id)),
        }

        if let Err(err) = self.fix_after_insert(id) {
            error!(node = %id, %err, "red-black tree links are corrupted");
            panic!("red-black tree links are corrupted: {err}");
        }
        Ok(Ok(()))
    }

    /// Restores the red-black invariants walking up from the freshly
    /// inserted red node `node`.
    fn fix_after_insert(&mut self, mut node: NodeId) -> Result<(), StructuralInconsistency> {
        while let Some(parent) = self.node_at(node).parent {
            if !self.node_at(parent).is_red() {
                break;
            }
            let grandparent = self
                .node_at(parent)
                .parent
                .ok_or(StructuralInconsistency::RedRoot { node: parent })?;
            let side = self.side_of(parent, grandparent)?;
            let uncle = self.node_at(grandparent).child(side.opposite());

            if let Some(uncle) = uncle.filter(|&uncle| self.node_at(uncle).is_red()) {
                trace!(%node, %grandparent, "red uncle, recolor");
                self.set_color(parent, Color::Black);
                self.set_color(uncle, Color::Black);
                self.set_color(grandparent, Color::Red);
                node = grandparent;
                continue;
            }

            let mut parent = parent;
            if self.side_of(node, parent)? != side {
                trace!(%node, %parent, "inner grandchild, rotate parent");
                self.rotate(parent, side)?;
                node = parent;
                parent = self
                    .node_at(node)
                    .parent
                    .ok_or(StructuralInconsistency::RedRoot { node })?;
            }

            trace!(%node, %grandparent, "outer grandchild, rotate grandparent");
            self.set_color(parent, Color::Black);
            self.set_color(grandparent, Color::Red);
            self.rotate(grandparent, side.opposite())?;
            break;
        }

        if let Some(root) = self.root {
            self.set_color(root, Color::Black);
        }
        Ok(())
    }
}

impl<K: Ord> RbTree<K> {
    /// Inserts `key`. Fails without touching the tree if an equal key is
    /// already present.
    pub fn insert(&mut self, key: K) -> Result<(), DuplicateKey<K>> {
        let inserted = match self.try_insert_by(key, |a, b| Ok::<_, Infallible>(a.cmp(b))) {
            Ok(inserted) => inserted,
            Err(never) => match never {},
        };
        if inserted.is_err() {
            debug!(len = self.len(), "rejected duplicate key");
        }
        inserted
    }

    fn find<Q>(&self, key: &Q) -> Link
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut cur = self.root;
        while let Some(id) = cur {
            let node = self.node_at(id);
            cur = match key.cmp(node.key.borrow()) {
                Ordering::Less => node.child(Side::Left),
                Ordering::Greater => node.child(Side::Right),
                Ordering::Equal => return Some(id),
            };
        }
        None
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&K>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find(key).map(|id| &self.node_at(id).key)
    }

    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find(key).is_some()
    }
}

impl<K> RbTree<K> {
    fn extreme(&self, side: Side) -> Option<&K> {
        let mut cur = self.root?;
        while let Some(next) = self.node_at(cur).child(side) {
            cur = next;
        }
        Some(&self.node_at(cur).key)
    }

    /// Smallest key.
    pub fn first(&self) -> Option<&K> {
        self.extreme(Side::Left)
    }

    /// Largest key.
    pub fn last(&self) -> Option<&K> {
        self.extreme(Side::Right)
    }
}

impl<K> Default for RbTree<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: fmt::Debug> fmt::Debug for RbTree<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.keys()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::RbTree;
    use crate::node::{Color, Side};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::cmp::Ordering;
    use std::collections::BTreeSet;

    fn colored_keys(tree: &RbTree<i32>) -> Vec<(i32, Color)> {
        tree.pre_order()
            .map(|node| (*node.key(), node.color()))
            .collect()
    }

    #[test]
    fn single_key_becomes_black_root() {
        let mut tree = RbTree::new();
        tree.insert(10).unwrap();
        let root = tree.root().unwrap();
        assert_eq!(*root.key(), 10);
        assert_eq!(root.color(), Color::Black);
        assert!(root.left().is_none());
        assert!(root.right().is_none());
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn ascending_three_rotates_left() {
        let mut tree = RbTree::new();
        for key in [10, 20, 30] {
            tree.insert(key).unwrap();
        }
        let root = tree.root().unwrap();
        assert_eq!(*root.key(), 20);
        assert_eq!(
            colored_keys(&tree),
            [(20, Color::Black), (10, Color::Red), (30, Color::Red)]
        );
        assert_eq!(tree.validate(), Ok(1));
    }

    #[test]
    fn fourth_key_recolors() {
        let mut tree = RbTree::new();
        for key in [10, 20, 30, 40] {
            tree.insert(key).unwrap();
        }
        // Uncle 10 is red, so 40 only triggers a recolor.
        assert_eq!(
            colored_keys(&tree),
            [
                (20, Color::Black),
                (10, Color::Black),
                (30, Color::Black),
                (40, Color::Red),
            ]
        );
        let parent = tree.root().unwrap().right().unwrap().right().unwrap().parent();
        assert_eq!(parent.map(|p| *p.key()), Some(30));
        assert_eq!(tree.keys().copied().collect::<Vec<_>>(), [10, 20, 30, 40]);
        assert_eq!(tree.validate(), Ok(2));
    }

    #[test]
    fn ascending_seven() {
        let mut tree = RbTree::new();
        for key in 1..=7 {
            tree.insert(key).unwrap();
        }
        assert_eq!(
            colored_keys(&tree),
            [
                (2, Color::Black),
                (1, Color::Black),
                (4, Color::Red),
                (3, Color::Black),
                (6, Color::Black),
                (5, Color::Red),
                (7, Color::Red),
            ]
        );
        assert_eq!(tree.keys().copied().collect::<Vec<_>>(), [1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(tree.validate(), Ok(2));
    }

    #[test]
    fn level_order_seven_is_complete() {
        let mut tree = RbTree::new();
        for key in [4, 2, 6, 1, 3, 5, 7] {
            tree.insert(key).unwrap();
        }
        let root = tree.root().unwrap();
        assert_eq!(*root.key(), 4);
        assert_eq!(
            tree.pre_order().map(|n| *n.key()).collect::<Vec<_>>(),
            [4, 2, 1, 3, 6, 5, 7]
        );
        assert!(tree.validate().is_ok());
    }

    #[test]
    fn duplicate_leaves_tree_unchanged() {
        let mut tree = RbTree::new();
        tree.insert(5).unwrap();
        let before = colored_keys(&tree);
        let err = tree.insert(5).unwrap_err();
        assert_eq!(*err.key(), 5);
        assert_eq!(tree.len(), 1);
        assert_eq!(colored_keys(&tree), before);
    }

    #[test]
    fn duplicate_in_larger_tree() {
        let mut tree = RbTree::new();
        for key in [8, 3, 12, 1, 5, 10, 14] {
            tree.insert(key).unwrap();
        }
        let before = colored_keys(&tree);
        for key in [8, 1, 14, 5] {
            assert!(tree.insert(key).is_err());
        }
        assert_eq!(tree.len(), 7);
        assert_eq!(colored_keys(&tree), before);
    }

    #[test]
    fn inner_grandchild_double_rotation() {
        for keys in [[30, 10, 20], [10, 30, 20]] {
            let mut tree = RbTree::new();
            for key in keys {
                tree.insert(key).unwrap();
            }
            assert_eq!(
                colored_keys(&tree),
                [(20, Color::Black), (10, Color::Red), (30, Color::Red)]
            );
            let root = tree.root().unwrap();
            for side in [Side::Left, Side::Right] {
                let child = root.child(side).unwrap();
                assert_eq!(child.parent().map(|p| p.id()), Some(root.id()));
            }
            assert!(root.parent().is_none());
        }
    }

    #[test]
    fn comparator_error_is_returned_unchanged() {
        #[derive(Debug, PartialEq)]
        struct Incomparable(i32);

        let mut tree = RbTree::new();
        for key in [1, 2, 3] {
            tree.insert(key).unwrap();
        }
        let before = colored_keys(&tree);
        let got = tree.try_insert_by(4, |a, b| {
            if *b == 3 {
                Err(Incomparable(*b))
            } else {
                Ok(a.cmp(b))
            }
        });
        assert_eq!(got, Err(Incomparable(3)));
        assert_eq!(tree.len(), 3);
        assert_eq!(colored_keys(&tree), before);
    }

    #[test]
    fn try_insert_by_reverse_order() {
        let mut tree = RbTree::new();
        for key in 0..50 {
            let inserted = tree.try_insert_by(key, |a: &i32, b: &i32| Ok::<_, ()>(b.cmp(a)));
            assert_eq!(inserted, Ok(Ok(())));
        }
        let keys: Vec<_> = tree.keys().copied().collect();
        assert_eq!(keys, (0..50).rev().collect::<Vec<_>>());
        assert_eq!(tree.first(), Some(&49));
        assert_eq!(tree.last(), Some(&0));
        assert_eq!(
            tree.try_insert_by(7, |a, b| Ok::<_, ()>(b.cmp(a)))
                .map(|r| r.map_err(|e| e.into_key())),
            Ok(Err(7))
        );
    }

    #[test]
    fn lookups() {
        let mut tree: RbTree<String> = RbTree::new();
        assert_eq!(tree.first(), None);
        assert!(!tree.contains("b"));
        for key in ["m", "c", "x", "a"] {
            tree.insert(key.to_string()).unwrap();
        }
        assert!(tree.contains("c"));
        assert!(!tree.contains("d"));
        assert_eq!(tree.get("x").map(String::as_str), Some("x"));
        assert_eq!(tree.first().map(String::as_str), Some("a"));
        assert_eq!(tree.last().map(String::as_str), Some("x"));
        assert_eq!(format!("{tree:?}"), r#"{"a", "c", "m", "x"}"#);
    }

    #[test]
    fn random_inserts_match_btreeset() {
        let mut rng = StdRng::seed_from_u64(0x5EED_2026);
        let mut tree = RbTree::new();
        let mut oracle = BTreeSet::new();

        for round in 0..5000 {
            let key: u32 = rng.random_range(0..2000);
            let got = tree.insert(key).map_err(|e| e.into_key());
            let expect = if oracle.insert(key) { Ok(()) } else { Err(key) };
            assert_eq!(got, expect);
            assert_eq!(tree.len(), oracle.len());
            if round % 500 == 0 {
                assert!(tree.validate().is_ok());
            }
        }

        assert!(tree.validate().is_ok());
        assert!(tree.keys().eq(oracle.iter()));
        for key in 0..2000 {
            assert_eq!(tree.contains(&key), oracle.contains(&key));
        }
    }

    #[test]
    fn height_stays_logarithmic() {
        let mut tree = RbTree::new();
        let n = 1 << 12;
        for key in 0..n {
            tree.insert(key).unwrap();
        }
        let black_height = tree.validate().unwrap();
        // A subtree of black height b holds at least 2^b - 1 nodes.
        assert!(black_height <= 12);
        assert_eq!(tree.len(), n as usize);
    }

    #[test]
    fn clone_is_independent() {
        let mut tree = RbTree::new();
        for key in [3, 1, 2] {
            tree.insert(key).unwrap();
        }
        let snapshot = tree.clone();
        tree.insert(4).unwrap();
        assert_eq!(snapshot.len(), 3);
        assert_eq!(tree.len(), 4);
        assert_eq!(snapshot.keys().cmp(tree.keys().take(3)), Ordering::Equal);
    }
}
