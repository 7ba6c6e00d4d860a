use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use rand::Rng;
use rbtree::RbTree;
use tracing::{debug, info};

/// Inserts `count` distinct random keys from `0..max_key`, calling `step`
/// with the step number (from 1) and the tree after every successful insert.
/// A draw that is already in the tree is rejected by the tree and redrawn.
pub fn grow<R, F>(rng: &mut R, count: u32, max_key: u32, mut step: F) -> Result<RbTree<u32>>
where
    R: Rng + ?Sized,
    F: FnMut(u32, &RbTree<u32>) -> Result<()>,
{
    if count > max_key {
        bail!("cannot draw {count} distinct keys from 0..{max_key}");
    }

    let mut tree = RbTree::new();
    let mut rejected = 0u64;
    while tree.len() < count as usize {
        let key = rng.random_range(0..max_key);
        match tree.insert(key) {
            Ok(()) => {
                debug!(key, len = tree.len(), "inserted");
                step(tree.len() as u32, &tree)?;
            }
            Err(dup) => {
                rejected += 1;
                debug!(key = *dup.key(), "redrawing duplicate");
            }
        }
    }
    info!(count, rejected, "tree complete");
    Ok(tree)
}

/// Path of the snapshot for `step`.
pub fn snapshot_path(dir: &Path, prefix: &str, step: u32) -> PathBuf {
    dir.join(format!("{prefix}{step}.dot"))
}

pub fn write_snapshot(path: &Path, tree: &RbTree<u32>) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    let mut out = BufWriter::new(file);
    rbtree_dot::write_dot(tree, &mut out)
        .and_then(|()| out.flush())
        .with_context(|| format!("failed to write {}", path.display()))?;
    info!(path = %path.display(), nodes = tree.len(), "wrote snapshot");
    Ok(())
}
