//! Offset-addressed text insertion.

use super::types::{Child, NodeId};
use super::{StringTree, note_case, text};
use crate::error::{Result, TreeError};
use crate::perf;

impl StringTree {
    /// Insert `text` at `offset` in the rendered string.
    ///
    /// Text is merged into an editable leaf wherever one touches the offset.
    /// Next to non-editable nodes it is added as a new plain node instead, so
    /// structural placeables are never split.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::OffsetOutOfRange`] if `offset > len + 1`, and
    /// [`TreeError::NotEditable`] if the offset falls strictly inside a
    /// non-editable leaf (unless the tree's config is lenient).
    pub fn insert(&mut self, offset: usize, text: &str) -> Result<()> {
        let _scope = perf::scope("tree.insert");
        let len = self.len();
        if offset > len + 1 {
            return Err(TreeError::out_of_range(offset, len + 1));
        }
        if text.is_empty() {
            return Ok(());
        }

        if offset == 0 {
            self.insert_at_start(text)?;
        } else if offset >= len {
            self.insert_at_end(text);
        } else {
            self.insert_within(offset, text)?;
        }

        if self.config.prune_after_insert {
            self.prune();
        }
        Ok(())
    }

    fn insert_at_start(&mut self, text: &str) -> Result<()> {
        let first = self.elem_at_offset(0)?;
        if self.is_editable(first) {
            note_case("insert.start", format_args!("prepend to leaf"));
            self.prepend_run(first, text);
        } else {
            let target = self
                .get_ancestor_where(first, |node| node.flags().editable)
                .unwrap_or(self.root);
            note_case("insert.start.ancestor", format_args!("new first child"));
            self.insert_text_node(target, 0, text);
        }
        Ok(())
    }

    fn insert_at_end(&mut self, text: &str) {
        let last = self.last_leaf();
        if self.is_editable(last) {
            note_case("insert.end", format_args!("append to leaf"));
            self.append_run(last, text);
        } else {
            let target = self
                .get_ancestor_where(last, |node| node.flags().editable)
                .unwrap_or(self.root);
            note_case("insert.end.ancestor", format_args!("new last child"));
            let index = self.data(target).children.len();
            self.insert_text_node(target, index, text);
        }
    }

    fn insert_within(&mut self, offset: usize, text: &str) -> Result<()> {
        let after = self.elem_at_offset(offset)?;
        let before = self.elem_at_offset(offset - 1)?;

        if after == before {
            if !self.is_editable(after) {
                if self.config.lenient_insert {
                    note_case("insert.within.locked", format_args!("offset={offset} ignored"));
                    return Ok(());
                }
                return Err(TreeError::not_editable(offset, self.data(after).kind.name()));
            }
            let local = offset.saturating_sub(self.elem_offset(after).unwrap_or_default());
            note_case("insert.within", format_args!("offset={offset} local={local}"));
            let joined = self.joined_runs(after);
            self.set_runs(after, text::splice(&joined, local, text));
            return Ok(());
        }

        match (self.is_editable(before), self.is_editable(after)) {
            (false, false) => {
                let parent = self.parent(before).ok_or(TreeError::ElementNotFound)?;
                let index = self
                    .child_index(parent, before)
                    .ok_or(TreeError::ElementNotFound)?;
                note_case("insert.boundary.sibling", format_args!("offset={offset}"));
                self.insert_text_node(parent, index + 1, text);
            }
            (true, _) => {
                note_case("insert.boundary.append", format_args!("offset={offset}"));
                self.append_run(before, text);
            }
            (false, true) => {
                note_case("insert.boundary.prepend", format_args!("offset={offset}"));
                self.prepend_run(after, text);
            }
        }
        Ok(())
    }

    fn prepend_run(&mut self, leaf: NodeId, text: &str) {
        let children = &mut self.data_mut(leaf).children;
        match children.first_mut() {
            Some(Child::Text(run)) => run.insert_str(0, text),
            _ => children.insert(0, Child::Text(text.to_string())),
        }
    }

    fn append_run(&mut self, leaf: NodeId, text: &str) {
        let children = &mut self.data_mut(leaf).children;
        match children.last_mut() {
            Some(Child::Text(run)) => run.push_str(text),
            _ => children.push(Child::Text(text.to_string())),
        }
    }
}
