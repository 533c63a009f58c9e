//! Structural simplification and whole-tree transforms.

use super::kind::Kind;
use super::types::{Child, Flags, NodeId};
use super::StringTree;
use crate::perf;

impl StringTree {
    /// Reduce the tree to its canonical minimal shape.
    ///
    /// Repeats until nothing changes:
    /// - a node with a single plain leaf child takes over the leaf's runs
    /// - a plain node with a single plain child takes over the grandchildren
    /// - a plain non-root node with a single non-plain child is replaced by
    ///   that child
    /// - empty text runs and empty plain children are dropped
    pub fn prune(&mut self) {
        let _scope = perf::scope("tree.prune");
        let mut passes = 0_usize;
        while self.prune_pass() {
            passes += 1;
        }
        tracing::trace!(target: "stringtree", passes, "pruned");
    }

    fn prune_pass(&mut self) -> bool {
        let order: Vec<NodeId> = self.depth_first().collect();
        let mut changed = false;
        for id in order {
            if !self.is_live(id) {
                continue;
            }
            changed |= self.collapse_single_child(id);
            if self.is_live(id) {
                changed |= self.drop_empty_children(id);
            }
        }
        changed
    }

    fn collapse_single_child(&mut self, id: NodeId) -> bool {
        let [Child::Node(child)] = self.data(id).children.as_slice() else {
            return false;
        };
        let child = *child;
        let elem_plain = self.is_plain(id);
        let child_plain = self.is_plain(child);

        if child_plain && (elem_plain || self.is_leaf(child)) {
            let grandchildren = std::mem::take(&mut self.data_mut(child).children);
            for grandchild in grandchildren.iter().filter_map(Child::as_node) {
                self.data_mut(grandchild).parent = Some(id);
            }
            self.data_mut(id).children = grandchildren;
            self.release(child);
            return true;
        }

        if elem_plain
            && !child_plain
            && let Some(parent) = self.parent(id)
            && let Some(index) = self.child_index(parent, id)
        {
            self.data_mut(parent).children[index] = Child::Node(child);
            self.data_mut(child).parent = Some(parent);
            self.data_mut(id).children.clear();
            self.release(id);
            return true;
        }
        false
    }

    fn drop_empty_children(&mut self, id: NodeId) -> bool {
        let mut changed = false;
        for index in (0..self.data(id).children.len()).rev() {
            let empty = match &self.data(id).children[index] {
                Child::Text(text) => text.is_empty(),
                Child::Node(child) => self.is_plain(*child) && self.len_of(*child) == 0,
            };
            if !empty {
                continue;
            }
            if let Child::Node(child) = self.data_mut(id).children.remove(index) {
                self.release_subtree(child);
            }
            changed = true;
        }
        changed
    }

    /// Turn every node below the root whose kind is named `kind` into a plain
    /// node with default flags, keeping its children, identity and id.
    ///
    /// Returns the number of nodes changed.
    pub fn remove_type(&mut self, kind: &str) -> usize {
        let matches: Vec<NodeId> = self
            .depth_first()
            .skip(1)
            .filter(|id| {
                let node = self.data(*id);
                !node.kind.is_plain() && node.kind.name() == kind
            })
            .collect();
        for id in &matches {
            let node = self.data_mut(*id);
            node.kind = Kind::Plain;
            node.flags = Flags::default();
            node.renderer = None;
        }
        tracing::debug!(target: "stringtree", kind, count = matches.len(), "removed kind");
        matches.len()
    }

    /// Replace every text run in every leaf with `f(run)`.
    pub fn apply_to_strings<F>(&mut self, mut f: F)
    where
        F: FnMut(&str) -> String,
    {
        for leaf in self.flatten() {
            for child in &mut self.data_mut(leaf).children {
                if let Child::Text(text) = child {
                    *text = f(text);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{Node, NodeRef, Placeable};

    #[derive(Debug, Clone)]
    struct Bold;

    impl Placeable for Bold {
        fn name(&self) -> &str {
            "Bold"
        }

        fn clone_box(&self) -> Box<dyn Placeable> {
            Box::new(self.clone())
        }

        fn translate(&self, node: NodeRef<'_>) -> String {
            format!("<b>{}</b>", node.translate_children())
        }
    }

    fn bold(text: &str) -> Node {
        Node::new(Kind::from(Bold)).with_text(text)
    }

    #[test]
    fn test_prune_collapses_nested_plain_wrappers() {
        let mut tree = StringTree::build(
            Node::plain().with_child(Node::plain().with_child(Node::text("x"))),
        )
        .unwrap();
        tree.prune();
        assert_eq!(tree.depth_first().count(), 1);
        assert_eq!(tree.root_ref().children(), &[Child::Text("x".to_string())]);
    }

    #[test]
    fn test_prune_absorbs_plain_leaf_into_placeable() {
        let mut tree = StringTree::build(
            Node::plain()
                .with_text("a")
                .with_child(Node::new(Kind::from(Bold)).with_child(Node::text("b"))),
        )
        .unwrap();
        tree.prune();
        let b = tree.flatten()[1];
        assert_eq!(tree.get(b).unwrap().kind().name(), "Bold");
        assert_eq!(tree.get(b).unwrap().children(), &[Child::Text("b".to_string())]);
    }

    #[test]
    fn test_prune_hoists_placeable_out_of_plain_wrapper() {
        let mut tree = StringTree::build(
            Node::plain()
                .with_text("a")
                .with_child(Node::plain().with_child(bold("b"))),
        )
        .unwrap();
        tree.prune();
        let root_children = tree.root_ref().children();
        assert_eq!(root_children.len(), 2);
        let b = root_children[1].as_node().unwrap();
        assert_eq!(tree.get(b).unwrap().kind().name(), "Bold");
        assert_eq!(tree.parent(b), Some(tree.root()));
    }

    #[test]
    fn test_prune_keeps_placeable_root() {
        let mut tree =
            StringTree::build(Node::new(Kind::from(Bold)).with_child(bold("b"))).unwrap();
        tree.prune();
        assert_eq!(tree.root_ref().kind().name(), "Bold");
        assert_eq!(tree.text(), "b");
    }

    #[test]
    fn test_prune_drops_empty_runs_and_plain_nodes() {
        let mut tree = StringTree::build(
            Node::plain()
                .with_child(Node::text("a"))
                .with_child(Node::text(""))
                .with_child(bold(""))
                .with_child(Node::text("b")),
        )
        .unwrap();
        tree.prune();
        assert_eq!(tree.root_ref().children().len(), 3);
        assert_eq!(tree.text(), "ab");
    }

    #[test]
    fn test_prune_keeps_locked_plain_nodes() {
        let mut tree = StringTree::build(
            Node::plain().with_child(Node::text("x").with_flags(Flags::locked())),
        )
        .unwrap();
        tree.prune();
        assert_eq!(tree.depth_first().count(), 2);
    }

    #[test]
    fn test_prune_is_idempotent() {
        let mut tree = StringTree::build(
            Node::plain()
                .with_child(Node::plain().with_child(Node::plain().with_text("a")))
                .with_child(Node::plain().with_child(bold("b")))
                .with_text(""),
        )
        .unwrap();
        tree.prune();
        let once = tree.clone();
        tree.prune();
        assert_eq!(tree, once);
        assert_eq!(tree.text(), "ab");
    }

    #[test]
    fn test_remove_type_below_root_only() {
        let mut tree = StringTree::build(
            Node::new(Kind::from(Bold))
                .with_child(bold("x").with_id("b1"))
                .with_text("y"),
        )
        .unwrap();
        let inner = tree.flatten()[0];
        assert_eq!(tree.translate(tree.root()), "<b><b>x</b>y</b>");

        assert_eq!(tree.remove_type("Bold"), 1);
        assert_eq!(tree.root_ref().kind().name(), "Bold");
        let node = tree.get(inner).unwrap();
        assert!(node.kind().is_plain());
        assert_eq!(node.identity().id.as_deref(), Some("b1"));
        assert_eq!(tree.translate(tree.root()), "<b>xy</b>");
    }

    #[test]
    fn test_apply_to_strings_maps_every_run() {
        let mut tree = StringTree::build(
            Node::plain()
                .with_text("ab")
                .with_child(bold("cd"))
                .with_text("ef"),
        )
        .unwrap();
        tree.apply_to_strings(str::to_uppercase);
        assert_eq!(tree.text(), "ABCDEF");
    }
}
