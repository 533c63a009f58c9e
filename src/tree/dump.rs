//! Diagnostic views of a tree.

use std::fmt::{self, Write as _};

use super::StringTree;
use super::types::{Child, NodeId};

impl StringTree {
    /// An indented outline of the tree, one line per node and text run.
    ///
    /// ```text
    /// Plain [aXb]
    ///   Plain [a]
    ///     [a]
    ///   Tag [X]
    ///     [X]
    /// ```
    pub fn dump(&self) -> String {
        let mut out = String::new();
        self.dump_node(self.root, 0, &mut out);
        out
    }

    fn dump_node(&self, id: NodeId, depth: usize, out: &mut String) {
        let node = self.data(id);
        let indent = "  ".repeat(depth);
        let _ = writeln!(out, "{indent}{} [{}]", node.kind.name(), self.render(id));
        for child in &node.children {
            match child {
                Child::Text(text) => {
                    let _ = writeln!(out, "{indent}  [{text}]");
                }
                Child::Node(child) => self.dump_node(*child, depth + 1, out),
            }
        }
    }

    fn fmt_node(&self, id: NodeId, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let node = self.data(id);
        write!(f, "<{}(", node.kind.name())?;
        for (label, value) in [
            ("id", &node.identity.id),
            ("rid", &node.identity.rid),
            ("xid", &node.identity.xid),
        ] {
            if let Some(value) = value {
                write!(f, "{label}={value:?} ")?;
            }
        }
        f.write_str("[")?;
        for (i, child) in node.children.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            match child {
                Child::Text(text) => write!(f, "{text:?}")?,
                Child::Node(child) => self.fmt_node(*child, f)?,
            }
        }
        f.write_str("])>")
    }
}

/// Compact one-line form: `<Kind(id="..." [children])>`.
impl fmt::Debug for StringTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_node(self.root, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{Flags, Node};

    #[test]
    fn test_debug_lists_identity_and_children() {
        let tree = StringTree::build(
            Node::plain()
                .with_id("root")
                .with_text("ab")
                .with_child(Node::text("X").with_id("x1").with_flags(Flags::locked())),
        )
        .unwrap();
        assert_eq!(
            format!("{tree:?}"),
            r#"<Plain(id="root" [<Plain(["ab"])>, <Plain(id="x1" ["X"])>])>"#
        );
    }

    #[test]
    fn test_debug_of_empty_tree() {
        assert_eq!(format!("{:?}", StringTree::new()), "<Plain([])>");
    }

    #[test]
    fn test_dump_outline() {
        let tree = StringTree::build(
            Node::plain()
                .with_text("a")
                .with_child(Node::text("X").with_flags(Flags::locked())),
        )
        .unwrap();
        assert_eq!(
            tree.dump(),
            "Plain [aX]\n  Plain [a]\n    [a]\n  Plain [X]\n    [X]\n"
        );
    }

    #[test]
    fn test_dump_shows_rendered_text_of_invisible_nodes_as_empty() {
        let tree = StringTree::build(
            Node::plain()
                .with_child(Node::text("a"))
                .with_child(Node::text("hidden").visible(false)),
        )
        .unwrap();
        let dump = tree.dump();
        assert!(dump.starts_with("Plain [a]\n"));
        assert!(dump.contains("  Plain []\n    [hidden]\n"));
    }
}
