use crate::RbTree;
use crate::error::Violation;
use crate::node::{Color, NodeId, Side};

impl<K: Ord> RbTree<K> {
    /// Checks every red-black and search-tree invariant, the parent links
    /// and the node count.
    ///
    /// Returns the black height: the number of black nodes on any path from
    /// the root down to an absent child, root included (0 when empty).
    pub fn validate(&self) -> Result<usize, Violation> {
        let Some(root) = self.root else {
            return match self.len() {
                0 => Ok(0),
                len => Err(Violation::Count { reachable: 0, len }),
            };
        };
        if self.node_at(root).color == Color::Red {
            return Err(Violation::RedRoot { root });
        }
        if self.node_at(root).parent.is_some() {
            return Err(Violation::ParentLink { node: root });
        }

        let mut reachable = 0;
        let black_height = self.check_subtree(root, None, None, &mut reachable)?;
        if reachable != self.len() {
            return Err(Violation::Count {
                reachable,
                len: self.len(),
            });
        }
        Ok(black_height)
    }

    /// Recursion depth is bounded by the height, which is logarithmic as
    /// long as the coloring holds; coloring is checked on the way down.
    fn check_subtree(
        &self,
        id: NodeId,
        lower: Option<&K>,
        upper: Option<&K>,
        reachable: &mut usize,
    ) -> Result<usize, Violation> {
        *reachable += 1;
        if *reachable > self.len() {
            return Err(Violation::Count {
                reachable: *reachable,
                len: self.len(),
            });
        }

        let node = self.node_at(id);
        if lower.is_some_and(|lower| node.key <= *lower)
            || upper.is_some_and(|upper| node.key >= *upper)
        {
            return Err(Violation::Order { node: id });
        }

        let mut heights = [0; 2];
        for (slot, side) in [Side::Left, Side::Right].into_iter().enumerate() {
            heights[slot] = match node.child(side) {
                None => 0,
                Some(child) => {
                    if self.node_at(child).parent != Some(id) {
                        return Err(Violation::ParentLink { node: child });
                    }
                    if node.is_red() && self.is_red(Some(child)) {
                        return Err(Violation::RedRed { parent: id, child });
                    }
                    let (lower, upper) = match side {
                        Side::Left => (lower, Some(&node.key)),
                        Side::Right => (Some(&node.key), upper),
                    };
                    self.check_subtree(child, lower, upper, reachable)?
                }
            };
        }

        let [left, right] = heights;
        if left != right {
            return Err(Violation::BlackHeight {
                node: id,
                left,
                right,
            });
        }
        Ok(left + usize::from(!node.is_red()))
    }
}
