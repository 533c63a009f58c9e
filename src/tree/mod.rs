//! Rich string trees.
//!
//! A [`StringTree`] holds a formatted string as a tree: leaves carry plain
//! text runs, internal nodes are placeables (tags, variables, markup) with
//! identity and editability metadata. The tree is edited through offsets into
//! its rendered string:
//! - Construction from text, [`Node`] descriptions, or [`parse`]
//! - Traversal and offset mapping
//! - Insertion and range deletion that respect non-editable nodes
//! - Pruning to a canonical minimal shape

mod delete;
mod dump;
mod insert;
mod kind;
mod parser;
mod prune;
mod text;
mod traverse;
mod types;


use std::fmt;

use crate::config::TreeConfig;
use crate::error::{Result, TreeError};
use crate::perf;

pub use kind::{Kind, Placeable};
pub use parser::{Parsed, Parser, PlainParser, parse};
pub use traverse::DepthFirst;
pub use types::{Child, Flags, Identity, IndexData, Node, NodeId, Part, Removal, Renderer};

struct NodeData {
    children: Vec<Child>,
    parent: Option<NodeId>,
    kind: Kind,
    identity: Identity,
    flags: Flags,
    renderer: Option<Renderer>,
}

impl NodeData {
    fn plain(parent: Option<NodeId>) -> Self {
        Self {
            children: Vec::new(),
            parent,
            kind: Kind::Plain,
            identity: Identity::default(),
            flags: Flags::default(),
            renderer: None,
        }
    }
}

struct Slot {
    generation: u32,
    data: Option<NodeData>,
}

/// An editable rich string.
///
/// Nodes live in an arena owned by the tree and are addressed by [`NodeId`].
/// Removing a node from the tree frees it; its id becomes stale.
pub struct StringTree {
    slots: Vec<Slot>,
    free: Vec<u32>,
    root: NodeId,
    config: TreeConfig,
}

impl StringTree {
    /// Create an empty tree with a plain root.
    pub fn new() -> Self {
        let mut tree = Self {
            slots: Vec::new(),
            free: Vec::new(),
            root: NodeId {
                index: 0,
                generation: 0,
            },
            config: TreeConfig::default(),
        };
        tree.root = tree.alloc(NodeData::plain(None));
        tree
    }

    /// Create a tree whose root is a plain leaf holding `text`.
    pub fn from_text(text: &str) -> Self {
        let mut tree = Self::new();
        if !text.is_empty() {
            let root = tree.root;
            tree.data_mut(root).children.push(Child::Text(text.to_string()));
        }
        tree
    }

    /// Build a tree from a detached node description.
    ///
    /// Text runs that sit next to node children are wrapped in plain leaf
    /// nodes, so every run ends up inside a leaf.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::InvalidChild`] if a node whose flags forbid
    /// content is given children.
    pub fn build(node: Node) -> Result<Self> {
        let mut tree = Self::new();
        let root = tree.root;
        tree.graft(node, root)?;
        Ok(tree)
    }

    #[must_use]
    pub const fn with_config(mut self, config: TreeConfig) -> Self {
        self.config = config;
        self
    }

    pub const fn config(&self) -> TreeConfig {
        self.config
    }

    pub const fn root(&self) -> NodeId {
        self.root
    }

    /// A read-only view of a node, or `None` if `id` is stale.
    pub fn get(&self, id: NodeId) -> Option<NodeRef<'_>> {
        self.slot(id).map(|_| NodeRef { tree: self, id })
    }

    pub fn root_ref(&self) -> NodeRef<'_> {
        NodeRef {
            tree: self,
            id: self.root,
        }
    }

    // --- Rendering ---
    //
    // Node-level queries below take ids the tree itself produced. Callers
    // outside the crate go through `get`, which checks the id first.

    /// The rendered string of the node.
    ///
    /// A renderer override wins; otherwise invisible nodes render empty and
    /// visible nodes concatenate their children.
    pub(crate) fn render(&self, id: NodeId) -> String {
        let node = self.data(id);
        if let Some(renderer) = &node.renderer {
            return renderer(NodeRef { tree: self, id });
        }
        if !node.flags.visible {
            return String::new();
        }
        self.render_children(id)
    }

    /// Concatenated rendering of the node's children, ignoring the node's own
    /// renderer and visibility.
    pub(crate) fn render_children(&self, id: NodeId) -> String {
        let mut out = String::new();
        for child in &self.data(id).children {
            match child {
                Child::Text(text) => out.push_str(text),
                Child::Node(child) => out.push_str(&self.render(*child)),
            }
        }
        out
    }

    /// The rendered string of the whole tree.
    pub fn text(&self) -> String {
        self.render(self.root)
    }

    /// Length of the node's rendered string, in characters.
    pub(crate) fn len_of(&self, id: NodeId) -> usize {
        text::char_len(&self.render(id))
    }

    pub fn len(&self) -> usize {
        self.len_of(self.root)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Apply kind-specific transforms across the node's subtree.
    pub(crate) fn translate(&self, id: NodeId) -> String {
        match self.data(id).kind.as_placeable() {
            Some(placeable) => placeable.translate(NodeRef { tree: self, id }),
            None => self.translate_children(id),
        }
    }

    pub(crate) fn translate_children(&self, id: NodeId) -> String {
        let mut out = String::new();
        for child in &self.data(id).children {
            match child {
                Child::Text(text) => out.push_str(text),
                Child::Node(child) => out.push_str(&self.translate(*child)),
            }
        }
        out
    }

    // --- Node attributes ---

    /// A node is a leaf when every child is a text run.
    pub(crate) fn is_leaf(&self, id: NodeId) -> bool {
        self.data(id)
            .children
            .iter()
            .all(|child| matches!(child, Child::Text(_)))
    }

    pub(crate) fn is_editable(&self, id: NodeId) -> bool {
        self.data(id).flags.editable
    }

    /// Plain nodes carry no behavior of their own and may be collapsed by
    /// [`prune`](Self::prune).
    pub(crate) fn is_plain(&self, id: NodeId) -> bool {
        let node = self.data(id);
        node.kind.is_plain() && node.flags == Flags::default() && node.renderer.is_none()
    }

    /// Set or clear the renderer override of a node.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::ElementNotFound`] if `id` is stale.
    pub fn set_renderer(&mut self, id: NodeId, renderer: Option<Renderer>) -> Result<()> {
        self.slot_mut(id).ok_or(TreeError::ElementNotFound)?.renderer = renderer;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`TreeError::ElementNotFound`] if `id` is stale.
    pub fn set_flags(&mut self, id: NodeId, flags: Flags) -> Result<()> {
        self.slot_mut(id).ok_or(TreeError::ElementNotFound)?.flags = flags;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`TreeError::ElementNotFound`] if `id` is stale.
    pub fn set_identity(&mut self, id: NodeId, identity: Identity) -> Result<()> {
        self.slot_mut(id).ok_or(TreeError::ElementNotFound)?.identity = identity;
        Ok(())
    }

    // --- Copy and equality ---

    /// Deep copy of the subtree rooted at `id` as a standalone tree, or
    /// `None` if `id` is stale.
    ///
    /// Identity, flags and kind data are preserved; renderers are not.
    pub fn copy_subtree(&self, id: NodeId) -> Option<Self> {
        self.is_live(id).then(|| self.copy_live(id))
    }

    fn copy_live(&self, id: NodeId) -> Self {
        let mut copy = Self::new().with_config(self.config);
        let root = copy.root;
        self.copy_node_into(id, &mut copy, root);
        copy
    }

    fn copy_node_into(&self, src: NodeId, dst: &mut Self, dst_id: NodeId) {
        let node = self.data(src);
        let mut children = Vec::with_capacity(node.children.len());
        for child in &node.children {
            match child {
                Child::Text(text) => children.push(Child::Text(text.clone())),
                Child::Node(child) => {
                    let copied = dst.alloc(NodeData::plain(Some(dst_id)));
                    self.copy_node_into(*child, dst, copied);
                    children.push(Child::Node(copied));
                }
            }
        }
        let target = dst.data_mut(dst_id);
        target.kind = node.kind.clone();
        target.identity = node.identity.clone();
        target.flags = node.flags;
        target.children = children;
    }

    /// Structural equality of two subtrees, possibly from different trees.
    ///
    /// Kinds and renderers are not compared. A stale id equals nothing.
    pub fn subtree_eq(&self, a: NodeId, other: &Self, b: NodeId) -> bool {
        let (Some(lhs), Some(rhs)) = (self.slot(a), other.slot(b)) else {
            return false;
        };
        lhs.identity == rhs.identity
            && lhs.flags.editable == rhs.flags.editable
            && lhs.flags.translatable == rhs.flags.translatable
            && lhs.flags.visible == rhs.flags.visible
            && lhs.children.len() == rhs.children.len()
            && lhs
                .children
                .iter()
                .zip(&rhs.children)
                .all(|pair| match pair {
                    (Child::Text(l), Child::Text(r)) => l == r,
                    (Child::Node(l), Child::Node(r)) => self.subtree_eq(*l, other, *r),
                    _ => false,
                })
    }

    // --- Arena ---

    fn alloc(&mut self, data: NodeData) -> NodeId {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.data = Some(data);
            return NodeId {
                index,
                generation: slot.generation,
            };
        }
        let index = u32::try_from(self.slots.len()).expect("node arena exceeds u32 indices");
        self.slots.push(Slot {
            generation: 0,
            data: Some(data),
        });
        NodeId {
            index,
            generation: 0,
        }
    }

    /// Free a single node; its children are left untouched.
    fn release(&mut self, id: NodeId) {
        if let Some(slot) = self.slots.get_mut(id.index as usize)
            && slot.generation == id.generation
            && slot.data.is_some()
        {
            slot.data = None;
            slot.generation = slot.generation.wrapping_add(1);
            self.free.push(id.index);
        }
    }

    fn release_subtree(&mut self, id: NodeId) {
        let doomed: Vec<NodeId> = self.depth_first_from(id).collect();
        for node in doomed {
            self.release(node);
        }
    }

    pub(crate) fn is_live(&self, id: NodeId) -> bool {
        self.slot(id).is_some()
    }

    fn slot(&self, id: NodeId) -> Option<&NodeData> {
        self.slots
            .get(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.data.as_ref())
    }

    fn slot_mut(&mut self, id: NodeId) -> Option<&mut NodeData> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.data.as_mut())
    }

    /// Node data for an id known to be live.
    ///
    /// # Panics
    ///
    /// Panics on a stale id; internal callers only pass ids taken from the
    /// current tree.
    fn data(&self, id: NodeId) -> &NodeData {
        self.slot(id).expect("stale node id")
    }

    fn data_mut(&mut self, id: NodeId) -> &mut NodeData {
        self.slot_mut(id).expect("stale node id")
    }

    // --- Structural helpers shared by the editing operations ---

    /// Populate the already allocated `target` from a node description.
    fn graft(&mut self, node: Node, target: NodeId) -> Result<()> {
        if !node.flags.has_content && !node.children.is_empty() {
            return Err(TreeError::invalid_child(node.kind.name()));
        }
        let mixed = node.children.iter().any(|part| matches!(part, Part::Node(_)));
        let mut children = Vec::with_capacity(node.children.len());
        for part in node.children {
            match part {
                Part::Text(text) if mixed => {
                    children.push(Child::Node(self.run_leaf(target, node.flags, text)));
                }
                Part::Text(text) => children.push(Child::Text(text)),
                Part::Node(child) => {
                    let id = self.alloc(NodeData::plain(Some(target)));
                    self.graft(child, id)?;
                    children.push(Child::Node(id));
                }
            }
        }
        let data = self.data_mut(target);
        data.kind = node.kind;
        data.identity = node.identity;
        data.flags = node.flags;
        data.children = children;
        Ok(())
    }

    /// Move the node's text runs into plain leaf children so node children
    /// can be added next to them.
    fn wrap_runs(&mut self, id: NodeId) {
        if !self
            .data(id)
            .children
            .iter()
            .any(|child| matches!(child, Child::Text(_)))
        {
            return;
        }
        let flags = self.data(id).flags;
        let children = std::mem::take(&mut self.data_mut(id).children);
        let mut wrapped = Vec::with_capacity(children.len());
        for child in children {
            match child {
                Child::Text(text) => wrapped.push(Child::Node(self.run_leaf(id, flags, text))),
                node @ Child::Node(_) => wrapped.push(node),
            }
        }
        self.data_mut(id).children = wrapped;
    }

    /// A leaf holding one run that used to sit directly in `parent`.
    ///
    /// The leaf takes over the parent's flags so wrapping never changes
    /// whether the text is editable or visible.
    fn run_leaf(&mut self, parent: NodeId, flags: Flags, text: String) -> NodeId {
        let mut data = NodeData::plain(Some(parent));
        data.flags = Flags {
            has_content: true,
            ..flags
        };
        data.children.push(Child::Text(text));
        self.alloc(data)
    }

    /// Insert a new plain leaf holding `text` as child `index` of `parent`.
    fn insert_text_node(&mut self, parent: NodeId, index: usize, text: &str) -> NodeId {
        self.wrap_runs(parent);
        let leaf = self.alloc(NodeData::plain(Some(parent)));
        self.data_mut(leaf).children.push(Child::Text(text.to_string()));
        let children = &mut self.data_mut(parent).children;
        let index = index.min(children.len());
        children.insert(index, Child::Node(leaf));
        leaf
    }

    /// Position of `id` among its parent's children.
    fn child_index(&self, parent: NodeId, id: NodeId) -> Option<usize> {
        self.data(parent)
            .children
            .iter()
            .position(|child| *child == Child::Node(id))
    }

    /// Unlink a non-root node from its parent, copy it out and free it.
    fn extract(&mut self, id: NodeId) -> Result<Self> {
        if self.parent(id).is_none() {
            return Err(TreeError::ElementNotFound);
        }
        let removed = self.copy_live(id);
        self.discard(id)?;
        Ok(removed)
    }

    /// Unlink a non-root node from its parent and free its subtree.
    fn discard(&mut self, id: NodeId) -> Result<()> {
        let parent = self.parent(id).ok_or(TreeError::ElementNotFound)?;
        let index = self
            .child_index(parent, id)
            .ok_or(TreeError::ElementNotFound)?;
        self.data_mut(parent).children.remove(index);
        self.release_subtree(id);
        Ok(())
    }

    /// The node's text runs joined into one string.
    fn joined_runs(&self, id: NodeId) -> String {
        self.data(id)
            .children
            .iter()
            .filter_map(Child::as_text)
            .collect()
    }

    fn set_runs(&mut self, id: NodeId, text: String) {
        self.data_mut(id).children = vec![Child::Text(text)];
    }

    fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut chain = Vec::new();
        let mut current = self.slot(id).and_then(|node| node.parent);
        while let Some(parent) = current {
            chain.push(parent);
            current = self.data(parent).parent;
        }
        chain
    }
}

/// Record which editing case fired.
fn note_case(event: &str, detail: fmt::Arguments<'_>) {
    tracing::debug!(target: "stringtree", "{event}: {detail}");
    perf::log_event(event, detail);
}

impl Default for StringTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Copies drop renderer overrides, like [`StringTree::copy_subtree`].
impl Clone for StringTree {
    fn clone(&self) -> Self {
        self.copy_live(self.root)
    }
}

impl PartialEq for StringTree {
    fn eq(&self, other: &Self) -> bool {
        self.subtree_eq(self.root, other, other.root)
    }
}

impl fmt::Display for StringTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text())
    }
}

impl From<&str> for StringTree {
    fn from(text: &str) -> Self {
        Self::from_text(text)
    }
}

/// A borrowed view of one live node.
///
/// The view borrows the tree, so its id cannot go stale while it exists.
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    tree: &'a StringTree,
    id: NodeId,
}

impl<'a> NodeRef<'a> {
    pub const fn id(&self) -> NodeId {
        self.id
    }

    pub fn kind(&self) -> &'a Kind {
        &self.tree.data(self.id).kind
    }

    pub fn identity(&self) -> &'a Identity {
        &self.tree.data(self.id).identity
    }

    pub fn flags(&self) -> Flags {
        self.tree.data(self.id).flags
    }

    pub fn children(&self) -> &'a [Child] {
        &self.tree.data(self.id).children
    }

    pub fn parent(&self) -> Option<Self> {
        self.tree.parent(self.id).map(|id| Self {
            tree: self.tree,
            id,
        })
    }

    pub fn has_renderer(&self) -> bool {
        self.tree.data(self.id).renderer.is_some()
    }

    pub fn is_leaf(&self) -> bool {
        self.tree.is_leaf(self.id)
    }

    /// Rendered string of the node, including its renderer override.
    ///
    /// A renderer must not call this on the node it renders; see
    /// [`render_children`](Self::render_children).
    pub fn render(&self) -> String {
        self.tree.render(self.id)
    }

    /// Concatenated rendering of the children, ignoring the node's own
    /// renderer and visibility.
    pub fn render_children(&self) -> String {
        self.tree.render_children(self.id)
    }

    pub fn len(&self) -> usize {
        self.tree.len_of(self.id)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn translate(&self) -> String {
        self.tree.translate(self.id)
    }

    pub fn translate_children(&self) -> String {
        self.tree.translate_children(self.id)
    }

    /// Standalone copy of the subtree rooted at this node.
    pub fn to_tree(&self) -> StringTree {
        self.tree.copy_live(self.id)
    }
}

impl fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("id", &self.id)
            .field("kind", &self.kind().name())
            .field("text", &self.render())
            .finish()
    }
}
