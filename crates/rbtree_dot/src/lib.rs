//! Graphviz DOT rendering of [`RbTree`] snapshots.
//!
//! Red nodes are filled red, black nodes keep the default black fill. Every
//! node gets exactly two labelled edges, `L` and `R`; an absent child is drawn
//! as its own `NIL` box.

use std::fmt::{self, Display, Write as _};
use std::io;

use rbtree::{NodeRef, RbTree, Side};
use tracing::debug;

const HEADER: &str = "digraph G {
\tgraph [ratio=.48];
\tnode [style=filled, color=black, shape=circle, width=.6,
\t\tfontname=Helvetica, fontweight=bold, fontcolor=white,
\t\tfontsize=24, fixedsize=true];
";

const NIL_STYLE: &str = "label=\"NIL\", shape=record, width=.4, height=.25, fontsize=16";

/// Writes `tree` as a DOT digraph.
pub fn write_dot<K, W>(tree: &RbTree<K>, out: &mut W) -> io::Result<()>
where
    K: Display,
    W: io::Write,
{
    out.write_all(to_dot(tree).as_bytes())
}

/// Renders `tree` as a DOT digraph.
pub fn to_dot<K: Display>(tree: &RbTree<K>) -> String {
    let mut dot = String::from(HEADER);
    // Writing into a `String` cannot fail.
    let _ = render(tree, &mut dot);
    debug!(nodes = tree.len(), bytes = dot.len(), "rendered dot");
    dot
}

fn render<K: Display>(tree: &RbTree<K>, dot: &mut String) -> fmt::Result {
    let mut nils = 0usize;
    for node in tree.pre_order() {
        write!(dot, "\n\t{} [label=\"{}\"", node_name(&node), Escaped(node.key()))?;
        if node.is_red() {
            dot.push_str(", fillcolor=red");
        }
        dot.push_str("];\n");

        for (side, label) in [(Side::Left, "L"), (Side::Right, "R")] {
            match node.child(side) {
                Some(child) => writeln!(
                    dot,
                    "\t{} -> {} [label=\"{label}\"];",
                    node_name(&node),
                    node_name(&child)
                )?,
                None => {
                    nils += 1;
                    writeln!(dot, "\tnil{nils} [{NIL_STYLE}];")?;
                    writeln!(dot, "\t{} -> nil{nils} [label=\"{label}\"];", node_name(&node))?;
                }
            }
        }
    }
    dot.push_str("}\n");
    Ok(())
}

fn node_name<K>(node: &NodeRef<'_, K>) -> String {
    format!("k{}", node.id().index())
}

/// Key text inside a quoted DOT string.
struct Escaped<'a, K>(&'a K);

impl<K: Display> Display for Escaped<'_, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in self.0.to_string().chars() {
            match c {
                '"' | '\\' => write!(f, "\\{c}")?,
                '\n' => f.write_str("\\n")?,
                c => f.write_char(c)?,
            }
        }
        Ok(())
    }
}
