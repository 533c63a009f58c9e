// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. tree::TreeError)
    clippy::module_name_repetitions
)]

//! # Stringtree
//!
//! Editable rich strings for translation tools.
//!
//! A translatable string is rarely just text: it carries variables, markup
//! tags and other placeables that a translator must keep intact. Stringtree
//! stores such a string as a tree and lets callers edit it through offsets
//! into the rendered text:
//! - Text lives in leaves; placeables are internal nodes with identity
//! - Insertion merges into editable text and never splits locked placeables
//! - Range deletion removes locked placeables only when fully covered
//! - Pruning keeps the tree in a canonical minimal shape
//!
//! ## Modules
//!
//! - [`tree`]: The tree, its node kinds, parsing and editing operations
//! - [`error`]: Error types for tree operations
//! - [`config`]: Editing policy and rc-file loading
//! - [`perf`]: Timing scopes and the mutation event log

pub mod config;
pub mod error;
pub mod perf;
pub mod tree;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::TreeConfig;
    pub use crate::error::{Result, TreeError};
    pub use crate::tree::{
        Child, Flags, Kind, Node, NodeId, NodeRef, Parser, Placeable, StringTree, parse,
    };
}
