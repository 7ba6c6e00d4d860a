use tracing::trace;

use crate::RbTree;
use crate::error::StructuralInconsistency;
use crate::node::{Link, NodeId, Side};

impl<K> RbTree<K> {
    /// Rotates `pivot` down towards `dir` (`Side::Left` is a left rotation);
    /// its child on the opposite side takes its place. In-order key sequence
    /// is unchanged.
    ///
    /// The grandparent-side link is swapped first, so on error no link has
    /// been rewritten.
    pub(crate) fn rotate(
        &mut self,
        pivot: NodeId,
        dir: Side,
    ) -> Result<(), StructuralInconsistency> {
        let rise = dir.opposite();
        let riser = self
            .node_at(pivot)
            .child(rise)
            .ok_or(StructuralInconsistency::MissingChild {
                node: pivot,
                side: rise,
            })?;
        let parent = self.node_at(pivot).parent;
        self.replace_parents_child(parent, pivot, riser)?;

        let inner = self.node_at(riser).child(dir);
        self.node_at_mut(pivot).set_child(rise, inner);
        if let Some(inner) = inner {
            self.node_at_mut(inner).parent = Some(pivot);
        }
        self.node_at_mut(riser).set_child(dir, Some(pivot));
        self.node_at_mut(pivot).parent = Some(riser);

        trace!(%pivot, %riser, %dir, "rotated");
        Ok(())
    }

    /// Points whatever owned `old` (a child slot of `parent`, or the root)
    /// at `new`, and sets `new`'s parent link.
    fn replace_parents_child(
        &mut self,
        parent: Link,
        old: NodeId,
        new: NodeId,
    ) -> Result<(), StructuralInconsistency> {
        match parent {
            None => self.root = Some(new),
            Some(parent) => {
                let side = self.side_of(old, parent)?;
                self.node_at_mut(parent).set_child(side, Some(new));
            }
        }
        self.node_at_mut(new).parent = parent;
        Ok(())
    }
}
