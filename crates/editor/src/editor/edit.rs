//! Edits the built-in commands perform. Each returns whether it changed
//! the document; edits that would have to merge or split structure across
//! inline boundaries report `false` and leave the tree alone.

use super::TextEditor;
use crate::error::EditorError;
use crate::locate::{find_paragraph_from_node, find_reverse, has_level};
use crate::selection::{Position, SelectionRange, compare_positions};
use crate::text::{clamp_to_char_boundary, next_char_boundary, normalize_newlines, prev_char_boundary, splice};
use content::{Level, MARKER};
use dom::{Document, NodeKey};
use log::debug;
use std::cmp::Ordering;

/// Resolves a boundary point to a point inside a text node: text points as
/// they are, points between an inline's children to the neighbouring text.
fn text_position(doc: &Document, position: Position) -> Option<Position> {
    if let Some(text) = doc.text(position.node) {
        return Some(Position::new(position.node, clamp_to_char_boundary(text, position.offset)));
    }
    if !has_level(doc, position.node, Level::Inline) {
        return None;
    }
    let children = doc.children(position.node);
    if let Some(&child) = children.get(position.offset) {
        if doc.is_text(child) {
            return Some(Position::new(child, 0));
        }
    }
    let before = position.offset.checked_sub(1).and_then(|i| children.get(i)).copied()?;
    doc.text(before).map(|text| Position::new(before, text.len()))
}

impl TextEditor {
    fn first_range(&self) -> Option<SelectionRange> {
        self.selection.ranges(&self.document).into_iter().next()
    }

    fn caret_in_text(&self) -> Option<Position> {
        if !self.selection.is_collapsed() {
            return None;
        }
        text_position(&self.document, self.selection.anchor()?)
    }

    fn caret_on_root(&self, caret: Position) -> bool {
        let doc = &self.document;
        has_level(doc, caret.node, Level::Root)
            || (doc.is_text(caret.node) && doc.parent(caret.node).is_some_and(|p| has_level(doc, p, Level::Root)))
    }

    fn first_text(&self, element: NodeKey) -> Option<NodeKey> {
        self.document.text_nodes(element).first().copied()
    }

    /// The inline and paragraph around a text node.
    fn enclosing_blocks(&self, text_node: NodeKey) -> Option<(NodeKey, NodeKey)> {
        let doc = &self.document;
        let inline = doc.parent(text_node).filter(|&k| has_level(doc, k, Level::Inline))?;
        let paragraph = doc.parent(inline).filter(|&k| has_level(doc, k, Level::Paragraph))?;
        Some((inline, paragraph))
    }

    fn splice_text(&mut self, node: NodeKey, start: usize, end: usize, insert: &str) -> Result<bool, EditorError> {
        let Some(text) = self.document.text(node) else {
            return Ok(false);
        };
        let (value, caret) = splice(text, start, end, insert);
        self.document.set_text(node, &value)?;
        self.selection.collapse(node, caret);
        Ok(true)
    }

    /// Whether `range` reaches from before the first text to after the last.
    fn covers_all(&self, range: &SelectionRange) -> bool {
        let doc = &self.document;
        let texts = doc.text_nodes(self.root);
        let (Some(&first), Some(&last)) = (texts.first(), texts.last()) else {
            return true;
        };
        let end_of_last = doc.text(last).map(str::len).unwrap_or(0);
        compare_positions(doc, &range.start, &Position::new(first, 0)) != Ordering::Greater
            && compare_positions(doc, &range.end, &Position::new(last, end_of_last)) != Ordering::Less
    }

    fn clear_content(&mut self) -> Result<(), EditorError> {
        let paragraph = self.create_paragraph("", None)?;
        self.document.replace_children(self.root, &[paragraph])?;
        if let Some(text) = self.first_text(paragraph) {
            self.selection.collapse(text, 0);
        }
        Ok(())
    }

    /// Inserts `data` at the caret, replacing the selection first. A caret
    /// sitting directly on the root gets a new paragraph for the text.
    pub fn insert_text(&mut self, data: &str) -> Result<bool, EditorError> {
        let data = normalize_newlines(data);
        let Some(anchor) = self.selection.anchor() else {
            return Ok(false);
        };
        if !self.selection.is_collapsed() {
            if !self.delete_selection()? {
                return Ok(false);
            }
            return self.insert_text(&data);
        }

        if self.caret_on_root(anchor) {
            let paragraph = self.create_paragraph(&data, None)?;
            let before = if anchor.node == self.root {
                self.document.children(self.root).get(anchor.offset).copied()
            } else {
                self.document.next_sibling(anchor.node)
            };
            self.document.insert_before(self.root, paragraph, before)?;
            if let Some(text) = self.first_text(paragraph) {
                self.selection.collapse(text, data.len());
            }
            debug!(target: "editor.input", "new paragraph {paragraph} for text on the root");
            return Ok(true);
        }

        let Some(caret) = text_position(&self.document, anchor) else {
            debug!(target: "editor.input", "caret {} is not in text", anchor.node);
            return Ok(false);
        };
        self.splice_text(caret.node, caret.offset, caret.offset, &data)
    }

    /// Removes the selected text when it lies in one text node, or the whole
    /// content when everything is selected.
    pub fn delete_selection(&mut self) -> Result<bool, EditorError> {
        let Some(range) = self.first_range() else {
            return Ok(false);
        };
        if range.is_collapsed() {
            return Ok(false);
        }
        let start = text_position(&self.document, range.start);
        let end = text_position(&self.document, range.end);
        if let (Some(start), Some(end)) = (start, end) {
            if start.node == end.node {
                return self.splice_text(start.node, start.offset, end.offset, "");
            }
        }
        if self.covers_all(&range) {
            self.clear_content()?;
            return Ok(true);
        }
        debug!(target: "editor.input", "selection crosses inlines: not deleted");
        Ok(false)
    }

    pub fn delete_backward(&mut self) -> Result<bool, EditorError> {
        if !self.selection.is_collapsed() {
            return self.delete_selection();
        }
        let Some(caret) = self.caret_in_text() else {
            return Ok(false);
        };
        if caret.offset == 0 {
            debug!(target: "editor.input", "caret at inline start: nothing to delete");
            return Ok(false);
        }
        let text = self.document.text(caret.node).unwrap_or("");
        let prev = prev_char_boundary(text, caret.offset);
        self.splice_text(caret.node, prev, caret.offset, "")
    }

    pub fn delete_forward(&mut self) -> Result<bool, EditorError> {
        if !self.selection.is_collapsed() {
            return self.delete_selection();
        }
        let Some(caret) = self.caret_in_text() else {
            return Ok(false);
        };
        let text = self.document.text(caret.node).unwrap_or("");
        if caret.offset >= text.len() {
            debug!(target: "editor.input", "caret at inline end: nothing to delete");
            return Ok(false);
        }
        let next = next_char_boundary(text, caret.offset);
        self.splice_text(caret.node, caret.offset, next, "")
    }

    /// Cuts `inline` at `caret`: the original keeps the text before it, a
    /// detached clone with the same style gets the rest.
    fn split_inline(&mut self, inline: NodeKey, caret: Position) -> Result<(NodeKey, NodeKey), EditorError> {
        let text = self.document.text(caret.node).unwrap_or("").to_string();
        let (head, tail) = text.split_at(clamp_to_char_boundary(&text, caret.offset));
        let tail_inline = self.document.clone_subtree(inline)?;
        let tail_text = self.document.create_text(tail);
        self.document.replace_children(tail_inline, &[tail_text])?;
        self.document.set_text(caret.node, head)?;
        Ok((tail_inline, tail_text))
    }

    /// Splits the caret's paragraph in two; the caret moves to the start of
    /// the second.
    pub fn insert_paragraph(&mut self) -> Result<bool, EditorError> {
        if !self.selection.is_collapsed() && !self.delete_selection()? {
            return Ok(false);
        }
        let Some(caret) = self.caret_in_text() else {
            return Ok(false);
        };
        let Some((inline, paragraph)) = self.enclosing_blocks(caret.node) else {
            return Ok(false);
        };
        let (tail_inline, tail_text) = self.split_inline(inline, caret)?;

        let siblings = self.document.children(paragraph);
        let index = siblings.iter().position(|&k| k == inline).unwrap_or(siblings.len());
        let mut moved = vec![tail_inline];
        moved.extend(siblings.iter().skip(index + 1).copied());

        let new_paragraph = self.document.clone_subtree(paragraph)?;
        self.document.replace_children(new_paragraph, &moved)?;
        let next = self.document.next_sibling(paragraph);
        self.document.insert_before(self.root, new_paragraph, next)?;
        self.selection.collapse(tail_text, 0);
        debug!(target: "editor.input", "split {paragraph} into {new_paragraph}");
        Ok(true)
    }

    /// Inserts a `<br>` inline at the caret, splitting the inline around it.
    pub fn insert_line_break(&mut self) -> Result<bool, EditorError> {
        if !self.selection.is_collapsed() && !self.delete_selection()? {
            return Ok(false);
        }
        let Some(caret) = self.caret_in_text() else {
            return Ok(false);
        };
        let Some((inline, paragraph)) = self.enclosing_blocks(caret.node) else {
            return Ok(false);
        };
        let (tail_inline, tail_text) = self.split_inline(inline, caret)?;
        let break_inline = self.document.clone_subtree(inline)?;
        let br = self.document.create_element("br");
        self.document.replace_children(break_inline, &[br])?;

        let next = self.document.next_sibling(inline);
        self.document.insert_before(paragraph, break_inline, next)?;
        self.document.insert_before(paragraph, tail_inline, next)?;
        self.selection.collapse(tail_text, 0);
        Ok(true)
    }

    /// Elements of `level` the selection touches, in document order. A caret
    /// touches the one it sits in.
    pub fn selected_elements(&self, level: Level) -> Vec<NodeKey> {
        let doc = &self.document;
        if self.selection.is_collapsed() {
            return find_reverse(doc, self.selection.anchor_node(), |doc, k| has_level(doc, k, level))
                .into_iter()
                .collect();
        }
        let Some(range) = self.first_range() else {
            return Vec::new();
        };
        doc.query_data_value(self.root, MARKER, level.marker())
            .into_iter()
            .filter(|&element| {
                let (Some(parent), Some(index)) = (doc.parent(element), doc.child_index(element)) else {
                    return false;
                };
                let start = Position::new(parent, index);
                let end = Position::new(parent, index + 1);
                compare_positions(doc, &end, &range.start) == Ordering::Greater
                    && compare_positions(doc, &start, &range.end) == Ordering::Less
            })
            .collect()
    }

    /// Sets one declaration on every selected paragraph.
    pub fn set_paragraph_style(&mut self, property: &str, value: &str) -> Result<bool, EditorError> {
        let paragraphs = self.selected_elements(Level::Paragraph);
        for &paragraph in &paragraphs {
            self.document.set_style_property(paragraph, property, value)?;
        }
        Ok(!paragraphs.is_empty())
    }

    /// Switches `property` between `on` and `off` on every selected inline,
    /// going by the first inline's current value.
    pub fn toggle_inline_style(&mut self, property: &str, on: &str, off: &str) -> Result<bool, EditorError> {
        let inlines = self.selected_elements(Level::Inline);
        let Some(&first) = inlines.first() else {
            return Ok(false);
        };
        let current = css::compute_style(&self.document, first);
        let value = if current.get(property) == Some(on) { off } else { on };
        for &inline in &inlines {
            self.document.set_style_property(inline, property, value)?;
        }
        Ok(true)
    }

    /// Selected text; paragraphs are joined with `"\n"`.
    pub fn selected_text(&self) -> String {
        let doc = &self.document;
        let Some(range) = self.first_range() else {
            return String::new();
        };
        let mut out = String::new();
        let mut last_paragraph = None;
        for node in doc.text_nodes(self.root) {
            let text = doc.text(node).unwrap_or("");
            let node_start = Position::new(node, 0);
            let node_end = Position::new(node, text.len());
            if compare_positions(doc, &node_end, &range.start) != Ordering::Greater
                || compare_positions(doc, &node_start, &range.end) != Ordering::Less
            {
                continue;
            }
            let from = if range.start.node == node {
                clamp_to_char_boundary(text, range.start.offset)
            } else {
                0
            };
            let to = if range.end.node == node {
                clamp_to_char_boundary(text, range.end.offset)
            } else {
                text.len()
            };
            if from >= to {
                continue;
            }
            let paragraph = find_paragraph_from_node(doc, Some(node));
            if last_paragraph.is_some() && paragraph != last_paragraph {
                out.push('\n');
            }
            last_paragraph = paragraph;
            out.push_str(&text[from..to]);
        }
        out
    }
}
