//! Depth-first traversal and the mapping between rendered-string offsets and
//! tree nodes.

use super::text;
use super::types::{Child, IndexData, NodeId};
use super::{NodeRef, StringTree};
use crate::error::{Result, TreeError};

/// Lazy preorder walk over node ids.
///
/// Each walk reflects the tree as it is when the iterator is created.
pub struct DepthFirst<'a> {
    tree: &'a StringTree,
    stack: Vec<NodeId>,
}

impl Iterator for DepthFirst<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        self.stack.extend(
            self.tree
                .data(id)
                .children
                .iter()
                .rev()
                .filter_map(Child::as_node),
        );
        Some(id)
    }
}

impl StringTree {
    /// All nodes in canonical order: the root first, then each child
    /// subtree left to right.
    pub fn depth_first(&self) -> DepthFirst<'_> {
        self.depth_first_from(self.root)
    }

    /// Preorder walk of the subtree rooted at `id`; empty if `id` is stale.
    pub fn depth_first_from(&self, id: NodeId) -> DepthFirst<'_> {
        let stack = if self.is_live(id) { vec![id] } else { Vec::new() };
        DepthFirst { tree: self, stack }
    }

    /// The leaves in left-to-right order.
    pub fn flatten(&self) -> Vec<NodeId> {
        self.depth_first().filter(|id| self.is_leaf(*id)).collect()
    }

    pub(super) fn last_leaf(&self) -> NodeId {
        self.depth_first()
            .filter(|id| self.is_leaf(*id))
            .last()
            .unwrap_or(self.root)
    }

    /// The leaf whose rendered span contains `offset`.
    ///
    /// An offset equal to the tree length resolves to the last leaf.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::OffsetOutOfRange`] if `offset` exceeds the length.
    pub fn elem_at_offset(&self, offset: usize) -> Result<NodeId> {
        let len = self.len();
        if offset > len {
            return Err(TreeError::out_of_range(offset, len));
        }
        let mut start = 0;
        let mut last = self.root;
        for leaf in self.flatten() {
            let leaf_len = self.len_of(leaf);
            if start <= offset && offset < start + leaf_len {
                return Ok(leaf);
            }
            start += leaf_len;
            last = leaf;
        }
        Ok(last)
    }

    /// Rendered-string offset at which `id` starts, or `None` if the node is
    /// not in this tree.
    ///
    /// For a leaf with a non-empty rendering, [`elem_at_offset`] maps the
    /// result back to the same leaf. A leaf that renders empty (invisible, or
    /// holding no text) shares its offset with the next leaf that has text,
    /// and `elem_at_offset` resolves to that leaf instead.
    ///
    /// [`elem_at_offset`]: Self::elem_at_offset
    pub fn elem_offset(&self, id: NodeId) -> Option<usize> {
        if !self.is_live(id) {
            return None;
        }
        let mut offset = 0;
        for node in self.depth_first() {
            if node == id {
                return Some(offset);
            }
            if self.is_leaf(node) {
                offset += self.len_of(node);
            }
        }
        None
    }

    /// Offset of the first leaf text run equal to `text`.
    pub fn run_offset(&self, text: &str) -> Option<usize> {
        let mut offset = 0;
        for leaf in self.flatten() {
            let mut run_offset = 0;
            for run in self.data(leaf).children.iter().filter_map(Child::as_text) {
                if run == text {
                    return Some(offset + run_offset);
                }
                run_offset += text::char_len(run);
            }
            offset += self.len_of(leaf);
        }
        None
    }

    /// Offset of a node taken from `source`, which may be a rebuilt copy of
    /// this tree.
    ///
    /// Falls back to matching the node's rendered text against this tree's
    /// text runs when the node itself is not part of this tree.
    pub fn elem_offset_from(&self, source: &Self, id: NodeId) -> Option<usize> {
        let exact = if std::ptr::eq(self, source) {
            self.elem_offset(id)
        } else {
            None
        };
        exact.or_else(|| {
            source
                .get(id)
                .and_then(|node| self.run_offset(&node.render()))
        })
    }

    /// Classify `index` as inside one leaf or on the boundary between two.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::OffsetOutOfRange`] if `index` exceeds the length.
    pub fn get_index_data(&self, index: usize) -> Result<IndexData> {
        let elem = self.elem_at_offset(index)?;
        let offset = index.saturating_sub(self.elem_offset(elem).unwrap_or_default());
        if index > 0 {
            let left = self.elem_at_offset(index - 1)?;
            if left != elem {
                return Ok(IndexData::Boundary {
                    left,
                    right: elem,
                    left_offset: self.len_of(left),
                });
            }
        }
        Ok(IndexData::Inside { elem, offset })
    }

    /// The node whose children include `id`; `None` for the root or a node
    /// that is not in this tree.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.slot(id).and_then(|node| node.parent)
    }

    /// The nearest proper ancestor of `id` satisfying `criteria`.
    pub fn get_ancestor_where<F>(&self, id: NodeId, criteria: F) -> Option<NodeId>
    where
        F: Fn(NodeRef<'_>) -> bool,
    {
        let mut current = self.parent(id);
        while let Some(parent) = current {
            if criteria(NodeRef { tree: self, id: parent }) {
                return Some(parent);
            }
            current = self.parent(parent);
        }
        None
    }

    /// Character offset of the first occurrence of `needle` in the rendered
    /// string.
    pub fn find(&self, needle: &str) -> Option<usize> {
        let rendered = self.text();
        rendered
            .find(needle)
            .map(|byte| text::char_len(&rendered[..byte]))
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.text().contains(needle)
    }

    /// Leaves whose rendered text contains `needle`.
    pub fn find_elems_with(&self, needle: &str) -> Vec<NodeId> {
        self.flatten()
            .into_iter()
            .filter(|leaf| self.render(*leaf).contains(needle))
            .collect()
    }
}
