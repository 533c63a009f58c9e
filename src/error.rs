//! Error types for tree construction and editing.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, TreeError>;

/// Errors surfaced by [`StringTree`](crate::tree::StringTree) operations.
///
/// Lookups that callers routinely probe (parents, offsets of nodes) return
/// `Option` instead of an error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    #[error("offset {offset} is out of range (maximum {max})")]
    OffsetOutOfRange { offset: usize, max: usize },

    #[error("range start {start} is after range end {end}")]
    InvertedRange { start: usize, end: usize },

    #[error("{kind} node does not accept content")]
    InvalidChild { kind: String },

    #[error("element not found in tree")]
    ElementNotFound,

    #[error("cannot insert inside non-editable {kind} node at offset {offset}")]
    NotEditable { offset: usize, kind: String },
}

impl TreeError {
    pub const fn out_of_range(offset: usize, max: usize) -> Self {
        Self::OffsetOutOfRange { offset, max }
    }

    pub fn invalid_child(kind: impl Into<String>) -> Self {
        Self::InvalidChild { kind: kind.into() }
    }

    pub fn not_editable(offset: usize, kind: impl Into<String>) -> Self {
        Self::NotEditable {
            offset,
            kind: kind.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_range_message_names_bounds() {
        let err = TreeError::out_of_range(12, 5);
        assert_eq!(err.to_string(), "offset 12 is out of range (maximum 5)");
    }

    #[test]
    fn test_not_editable_message_names_kind() {
        let err = TreeError::not_editable(3, "Variable");
        assert!(err.to_string().contains("non-editable Variable node"));
    }
}
