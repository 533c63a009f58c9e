//! Range and node deletion.

use std::collections::HashSet;

use super::types::{NodeId, Removal};
use super::{StringTree, note_case, text};
use crate::error::{Result, TreeError};
use crate::perf;

impl StringTree {
    /// Delete the rendered-string range `[start, end)`.
    ///
    /// Non-editable leaves are only removed whole; a range that cuts into one
    /// leaves it intact. `end` may be `len + 1`, which is clamped to `len`.
    ///
    /// The returned [`Removal`] holds the removed content and the node it
    /// was removed from. For a range spanning several nodes the removed tree
    /// is a copy of the tree before deletion and no parent is reported.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::InvertedRange`] if `start > end`, and
    /// [`TreeError::OffsetOutOfRange`] if `start > len` or `end > len + 1`.
    ///
    /// # Panics
    ///
    /// Panics if an offset does not resolve to a leaf of this tree, which
    /// would mean the tree's structure is corrupt.
    pub fn delete_range(&mut self, start: usize, end: usize) -> Result<Removal> {
        let _scope = perf::scope("tree.delete_range");
        let len = self.len();
        if start > end {
            return Err(TreeError::InvertedRange { start, end });
        }
        if start > len {
            return Err(TreeError::out_of_range(start, len));
        }
        if end > len + 1 {
            return Err(TreeError::out_of_range(end, len + 1));
        }
        let end = end.min(len);
        if start == end {
            return Ok(Removal {
                removed: Self::new().with_config(self.config),
                parent: Some(self.root),
            });
        }

        // A start on a boundary belongs to the leaf on its right, an end to
        // the leaf on its left, so both land inside real leaves.
        let (start_elem, start_offset) = self.get_index_data(start)?.right_biased();
        let (end_elem, end_offset) = self.get_index_data(end)?.left_biased();
        assert!(
            self.is_leaf(start_elem) && self.is_leaf(end_elem),
            "range bounds must resolve to leaves"
        );

        if start == 0 && end == len {
            note_case("delete_range.all", format_args!("0..{len}"));
            return Ok(self.remove_everything());
        }

        if start_elem == end_elem && start_offset == 0 && end_offset == self.len_of(start_elem) {
            if start_elem == self.root {
                note_case("delete_range.all", format_args!("root leaf"));
                return Ok(self.remove_everything());
            }
            note_case("delete_range.node", format_args!("{start}..{end}"));
            let ancestors = self.ancestors(start_elem);
            let removed = self.extract(start_elem)?;
            self.prune();
            return Ok(Removal {
                removed,
                parent: self.first_live(&ancestors),
            });
        }

        if start_elem == end_elem && self.is_editable(start_elem) {
            note_case(
                "delete_range.interior",
                format_args!("{start}..{end} local {start_offset}..{end_offset}"),
            );
            let joined = self.joined_runs(start_elem);
            let removed = text::char_slice(&joined, start_offset, end_offset).to_string();
            let mut kept = text::char_slice(&joined, 0, start_offset).to_string();
            kept.push_str(text::char_slice(&joined, end_offset, text::char_len(&joined)));
            let ancestors = self.ancestors(start_elem);
            self.set_runs(start_elem, kept);
            self.prune();
            return Ok(Removal {
                removed: Self::from_text(&removed).with_config(self.config),
                parent: self.first_live(&ancestors),
            });
        }

        note_case("delete_range.span", format_args!("{start}..{end}"));
        let doomed = self.nodes_covered(start_elem, end_elem);
        let removed = self.clone();
        for node in doomed {
            self.discard(node)?;
        }
        if self.is_editable(start_elem) {
            let joined = self.joined_runs(start_elem);
            self.set_runs(start_elem, text::char_slice(&joined, 0, start_offset).to_string());
        }
        if self.is_editable(end_elem) {
            let joined = self.joined_runs(end_elem);
            let tail = text::char_slice(&joined, end_offset, text::char_len(&joined)).to_string();
            self.set_runs(end_elem, tail);
        }
        self.prune();
        Ok(Removal {
            removed,
            parent: None,
        })
    }

    /// Detach a non-root node and return it as a standalone tree.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::ElementNotFound`] if the node has no parent in
    /// this tree.
    pub fn delete_elem(&mut self, id: NodeId) -> Result<Self> {
        self.extract(id)
    }

    fn remove_everything(&mut self) -> Removal {
        let removed = self.clone();
        let root = self.root;
        let children = std::mem::take(&mut self.data_mut(root).children);
        for child in children.iter().filter_map(super::Child::as_node) {
            self.release_subtree(child);
        }
        Removal {
            removed,
            parent: None,
        }
    }

    /// Nodes strictly between `first` and `last` in depth-first order whose
    /// whole subtree lies inside the range, outermost first.
    fn nodes_covered(&self, first: NodeId, last: NodeId) -> Vec<NodeId> {
        let order: Vec<NodeId> = self.depth_first().collect();
        let from = order
            .iter()
            .position(|id| *id == first)
            .expect("range start is part of the tree");
        let to = order
            .iter()
            .position(|id| *id == last)
            .expect("range end is part of the tree");
        if to <= from + 1 {
            return Vec::new();
        }

        let mut doomed = Vec::new();
        let mut marked = HashSet::new();
        for &node in &order[from + 1..to] {
            if marked.contains(&node) {
                continue;
            }
            let subtree: Vec<NodeId> = self.depth_first_from(node).collect();
            if !subtree.contains(&last) {
                doomed.push(node);
                marked.extend(subtree);
            }
        }
        doomed
    }

    /// The first of `candidates` that survived the last mutation.
    fn first_live(&self, candidates: &[NodeId]) -> Option<NodeId> {
        candidates.iter().copied().find(|id| self.is_live(*id))
    }
}
