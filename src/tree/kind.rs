//! Node kinds and the placeable extension contract.

use std::fmt;

use super::NodeRef;
use super::types::Flags;

/// Behavior of an extended node kind.
///
/// The base behavior of every operation lives on
/// [`StringTree`](crate::tree::StringTree); a placeable overrides only what
/// differs for its kind.
pub trait Placeable: fmt::Debug {
    /// Kind name, used by
    /// [`StringTree::remove_type`](crate::tree::StringTree::remove_type) and
    /// diagnostics.
    fn name(&self) -> &str;

    /// Deep copy of the kind-specific data.
    fn clone_box(&self) -> Box<dyn Placeable>;

    /// Flags given to freshly built nodes of this kind.
    fn flags(&self) -> Flags {
        Flags::default()
    }

    fn translate(&self, node: NodeRef<'_>) -> String {
        node.translate_children()
    }
}

/// The polymorphic tag of a node.
#[derive(Debug, Default)]
pub enum Kind {
    #[default]
    Plain,
    Placeable(Box<dyn Placeable>),
}

impl Clone for Kind {
    fn clone(&self) -> Self {
        match self {
            Self::Plain => Self::Plain,
            Self::Placeable(p) => Self::Placeable(p.clone_box()),
        }
    }
}

impl<P: Placeable + 'static> From<P> for Kind {
    fn from(placeable: P) -> Self {
        Self::Placeable(Box::new(placeable))
    }
}

impl Kind {
    pub const PLAIN_NAME: &'static str = "Plain";

    pub fn name(&self) -> &str {
        match self {
            Self::Plain => Self::PLAIN_NAME,
            Self::Placeable(p) => p.name(),
        }
    }

    pub const fn is_plain(&self) -> bool {
        matches!(self, Self::Plain)
    }

    pub fn default_flags(&self) -> Flags {
        match self {
            Self::Plain => Flags::default(),
            Self::Placeable(p) => p.flags(),
        }
    }

    pub fn as_placeable(&self) -> Option<&dyn Placeable> {
        match self {
            Self::Plain => None,
            Self::Placeable(p) => Some(&**p),
        }
    }
}
