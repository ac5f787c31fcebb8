//! Document selection: an anchor and a focus boundary point.

use dom::{Document, NodeKey};
use std::cmp::Ordering;

/// A boundary point. In a text node `offset` is a byte offset into its
/// text; in an element it counts children.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Position {
    pub node: NodeKey,
    pub offset: usize,
}

impl Position {
    pub fn new(node: NodeKey, offset: usize) -> Self {
        Self { node, offset }
    }
}

/// Selection endpoint selector for the locator helpers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Endpoint {
    #[default]
    Anchor,
    Focus,
}

/// A range with `start` at or before `end` in document order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SelectionRange {
    pub start: Position,
    pub end: Position,
}

impl SelectionRange {
    pub fn is_collapsed(&self) -> bool {
        self.start == self.end
    }

    /// Collapses onto one end: the start when `to_start`, else the end.
    pub fn collapse(&mut self, to_start: bool) {
        if to_start {
            self.end = self.start;
        } else {
            self.start = self.end;
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Selection {
    anchor: Option<Position>,
    focus: Option<Position>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn caret(node: NodeKey, offset: usize) -> Self {
        let position = Position::new(node, offset);
        Self {
            anchor: Some(position),
            focus: Some(position),
        }
    }

    pub fn with_extent(anchor: Position, focus: Position) -> Self {
        Self {
            anchor: Some(anchor),
            focus: Some(focus),
        }
    }

    pub fn anchor(&self) -> Option<Position> {
        self.anchor
    }

    pub fn focus(&self) -> Option<Position> {
        self.focus
    }

    pub fn anchor_node(&self) -> Option<NodeKey> {
        self.anchor.map(|p| p.node)
    }

    pub fn focus_node(&self) -> Option<NodeKey> {
        self.focus.map(|p| p.node)
    }

    pub fn endpoint(&self, endpoint: Endpoint) -> Option<Position> {
        match endpoint {
            Endpoint::Anchor => self.anchor,
            Endpoint::Focus => self.focus,
        }
    }

    /// An empty selection counts as collapsed.
    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.focus
    }

    pub fn range_count(&self) -> usize {
        usize::from(self.anchor.is_some())
    }

    /// The selected range, ordered by document position.
    pub fn ranges(&self, doc: &Document) -> Vec<SelectionRange> {
        let (Some(anchor), Some(focus)) = (self.anchor, self.focus) else {
            return Vec::new();
        };
        let (start, end) = match compare_positions(doc, &anchor, &focus) {
            Ordering::Greater => (focus, anchor),
            _ => (anchor, focus),
        };
        vec![SelectionRange { start, end }]
    }

    pub fn collapse(&mut self, node: NodeKey, offset: usize) {
        *self = Self::caret(node, offset);
    }

    pub fn set_base_and_extent(&mut self, anchor: Position, focus: Position) {
        *self = Self::with_extent(anchor, focus);
    }

    pub fn extend(&mut self, focus: Position) {
        if self.anchor.is_some() {
            self.focus = Some(focus);
        }
    }

    /// Spans every child of `element`.
    pub fn select_all_children(&mut self, doc: &Document, element: NodeKey) {
        let count = doc.children(element).len();
        *self = Self::with_extent(Position::new(element, 0), Position::new(element, count));
    }

    pub fn remove_all_ranges(&mut self) {
        *self = Self::default();
    }

    /// Drops endpoints that no longer resolve inside `scope`.
    pub fn retain_within(&mut self, doc: &Document, scope: NodeKey) {
        let inside = |p: Option<Position>| p.is_some_and(|p| doc.is_live(p.node) && doc.contains(scope, p.node));
        if !inside(self.anchor) || !inside(self.focus) {
            self.remove_all_ranges();
        }
    }
}

/// Child-index path from the top of the tree down to `node`.
fn tree_path(doc: &Document, node: NodeKey) -> Vec<usize> {
    let mut path = Vec::new();
    let mut current = node;
    while let Some(index) = doc.child_index(current) {
        path.push(index);
        match doc.parent(current) {
            Some(parent) => current = parent,
            None => break,
        }
    }
    path.reverse();
    path
}

/// Orders two boundary points in document order. A point between children
/// sorts before anything inside the child that follows it.
pub fn compare_positions(doc: &Document, a: &Position, b: &Position) -> Ordering {
    let mut a_path = tree_path(doc, a.node);
    a_path.push(a.offset);
    let mut b_path = tree_path(doc, b.node);
    b_path.push(b.offset);
    a_path.cmp(&b_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree() -> (Document, NodeKey, NodeKey, NodeKey) {
        let mut doc = Document::new();
        let root = doc.create_element("div");
        let first = doc.create_text("hello");
        let second = doc.create_text("world");
        doc.append_children(root, &[first, second]).unwrap();
        (doc, root, first, second)
    }

    #[test]
    fn backwards_selection_orders_its_range() {
        let (doc, _, first, second) = tree();
        let selection = Selection::with_extent(Position::new(second, 2), Position::new(first, 1));
        assert!(!selection.is_collapsed());
        let ranges = selection.ranges(&doc);
        assert_eq!(ranges.len(), 1);
        assert_eq!(ranges[0].start, Position::new(first, 1));
        assert_eq!(ranges[0].end, Position::new(second, 2));
    }

    #[test]
    fn element_points_sort_between_children() {
        let (doc, root, first, second) = tree();
        let between = Position::new(root, 1);
        assert_eq!(compare_positions(&doc, &Position::new(first, 5), &between), Ordering::Less);
        assert_eq!(compare_positions(&doc, &between, &Position::new(second, 0)), Ordering::Less);
    }

    #[test]
    fn select_all_children_spans_the_element() {
        let (doc, root, _, _) = tree();
        let mut selection = Selection::new();
        assert!(selection.is_collapsed());
        assert_eq!(selection.range_count(), 0);
        selection.select_all_children(&doc, root);
        assert_eq!(selection.anchor(), Some(Position::new(root, 0)));
        assert_eq!(selection.focus(), Some(Position::new(root, 2)));
        assert_eq!(selection.range_count(), 1);
    }

    #[test]
    fn range_collapse_defaults_to_either_end() {
        let (doc, _, first, second) = tree();
        let mut range = Selection::with_extent(Position::new(first, 0), Position::new(second, 3)).ranges(&doc)[0];
        range.collapse(false);
        assert!(range.is_collapsed());
        assert_eq!(range.start, Position::new(second, 3));
    }

    #[test]
    fn retain_within_forgets_removed_nodes() {
        let (mut doc, root, first, _) = tree();
        let mut selection = Selection::caret(first, 2);
        selection.retain_within(&doc, root);
        assert_eq!(selection.anchor_node(), Some(first));
        doc.remove(first).unwrap();
        selection.retain_within(&doc, root);
        assert_eq!(selection.anchor(), None);
    }
}
