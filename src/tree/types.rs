//! Core node types.

use super::{NodeRef, StringTree};
use super::kind::Kind;

/// Handle to a node inside a [`StringTree`].
///
/// Handles carry a generation so that ids of removed nodes never alias nodes
/// allocated later in the same tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

/// One entry in a node's ordered children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Child {
    Text(String),
    Node(NodeId),
}

impl Child {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text.as_str()),
            Self::Node(_) => None,
        }
    }

    pub const fn as_node(&self) -> Option<NodeId> {
        match self {
            Self::Text(_) => None,
            Self::Node(id) => Some(*id),
        }
    }
}

/// Behavioral flags of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Flags {
    /// Whether the node may hold children at all.
    pub has_content: bool,
    /// Whether the node's text may be split or merged at arbitrary offsets.
    pub editable: bool,
    pub translatable: bool,
    /// Invisible nodes render as the empty string.
    pub visible: bool,
}

impl Default for Flags {
    fn default() -> Self {
        Self {
            has_content: true,
            editable: true,
            translatable: true,
            visible: true,
        }
    }
}

impl Flags {
    /// Flags for a structural placeable whose text must stay intact.
    pub const fn locked() -> Self {
        Self {
            has_content: true,
            editable: false,
            translatable: true,
            visible: true,
        }
    }
}

/// Opaque identity strings used by callers to correlate nodes across
/// versions of a tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Identity {
    pub id: Option<String>,
    pub rid: Option<String>,
    pub xid: Option<String>,
}

impl Identity {
    pub fn is_empty(&self) -> bool {
        self.id.is_none() && self.rid.is_none() && self.xid.is_none()
    }
}

/// Custom rendering for a single node.
///
/// The node is handed in as a view of the tree, so the closure never needs
/// to capture the tree. A renderer must not call [`NodeRef::render`] on its
/// own node; use [`NodeRef::render_children`] instead.
pub type Renderer = Box<dyn Fn(NodeRef<'_>) -> String>;

/// An owned, detached description of a node, used to build trees.
#[derive(Debug, Clone, Default)]
pub struct Node {
    pub kind: Kind,
    pub identity: Identity,
    pub flags: Flags,
    pub children: Vec<Part>,
}

/// A child of a detached [`Node`].
#[derive(Debug, Clone)]
pub enum Part {
    Text(String),
    Node(Node),
}

impl From<&str> for Part {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for Part {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<Node> for Part {
    fn from(node: Node) -> Self {
        Self::Node(node)
    }
}

impl Node {
    /// A plain node with default flags and no children.
    pub fn plain() -> Self {
        Self::default()
    }

    /// A node of `kind`, starting from the kind's default flags.
    pub fn new(kind: Kind) -> Self {
        let flags = kind.default_flags();
        Self {
            kind,
            identity: Identity::default(),
            flags,
            children: Vec::new(),
        }
    }

    /// A plain node holding a single text run.
    pub fn text(text: impl Into<String>) -> Self {
        Self::plain().with_text(text)
    }

    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Part::Text(text.into()));
        self
    }

    #[must_use]
    pub fn with_child(mut self, child: impl Into<Part>) -> Self {
        self.children.push(child.into());
        self
    }

    #[must_use]
    pub fn with_children<I, P>(mut self, children: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<Part>,
    {
        self.children.extend(children.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.identity.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn with_rid(mut self, rid: impl Into<String>) -> Self {
        self.identity.rid = Some(rid.into());
        self
    }

    #[must_use]
    pub fn with_xid(mut self, xid: impl Into<String>) -> Self {
        self.identity.xid = Some(xid.into());
        self
    }

    #[must_use]
    pub const fn with_flags(mut self, flags: Flags) -> Self {
        self.flags = flags;
        self
    }

    #[must_use]
    pub const fn editable(mut self, editable: bool) -> Self {
        self.flags.editable = editable;
        self
    }

    #[must_use]
    pub const fn translatable(mut self, translatable: bool) -> Self {
        self.flags.translatable = translatable;
        self
    }

    #[must_use]
    pub const fn visible(mut self, visible: bool) -> Self {
        self.flags.visible = visible;
        self
    }
}

/// Where a rendered-string offset falls relative to the tree's leaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexData {
    /// Strictly inside `elem`, `offset` characters from its start.
    Inside { elem: NodeId, offset: usize },
    /// Exactly between two leaves. The edge offsets are
    /// `(left_offset, 0)`, with `left_offset` the length of `left`.
    Boundary {
        left: NodeId,
        right: NodeId,
        left_offset: usize,
    },
}

impl IndexData {
    /// Resolve to a single leaf, preferring the right side of a boundary.
    pub const fn right_biased(&self) -> (NodeId, usize) {
        match *self {
            Self::Inside { elem, offset } => (elem, offset),
            Self::Boundary { right, .. } => (right, 0),
        }
    }

    /// Resolve to a single leaf, preferring the left side of a boundary.
    pub const fn left_biased(&self) -> (NodeId, usize) {
        match *self {
            Self::Inside { elem, offset } => (elem, offset),
            Self::Boundary {
                left, left_offset, ..
            } => (left, left_offset),
        }
    }

    pub const fn is_boundary(&self) -> bool {
        matches!(self, Self::Boundary { .. })
    }
}

/// Result of [`StringTree::delete_range`].
#[derive(Debug)]
pub struct Removal {
    /// The excised content as a standalone tree.
    pub removed: StringTree,
    /// The node content was removed from, if a single one applies.
    pub parent: Option<NodeId>,
}
