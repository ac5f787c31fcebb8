//! Finds the structural element (root, paragraph, inline) around a selection
//! endpoint by walking parent links.
//!
//! Walks are bounded: the editable tree is root -> paragraph -> inline ->
//! text, so a marker more than [`MAX_ITERATIONS`] hops up is a structural
//! fault, not something to search for.

use crate::selection::{Endpoint, Position, Selection};
use content::{Level, MARKER};
use core_types::Rect;
use dom::{Document, NodeKey};

pub const MAX_ITERATIONS: usize = 5;

/// First node from `start` upward (inclusive) that satisfies `predicate`.
pub fn find_reverse<P>(doc: &Document, start: Option<NodeKey>, predicate: P) -> Option<NodeKey>
where
    P: FnMut(&Document, NodeKey) -> bool,
{
    find_reverse_within(doc, start, MAX_ITERATIONS, predicate)
}

pub fn find_reverse_within<P>(
    doc: &Document,
    start: Option<NodeKey>,
    max_iterations: usize,
    mut predicate: P,
) -> Option<NodeKey>
where
    P: FnMut(&Document, NodeKey) -> bool,
{
    let mut current = start.filter(|&k| doc.is_live(k));
    let mut iterations = 0;
    while let Some(node) = current {
        if iterations >= max_iterations {
            break;
        }
        if predicate(doc, node) {
            return Some(node);
        }
        iterations += 1;
        current = doc.parent(node);
    }
    None
}

/// Nodes visited from `start` up to and including the first match.
pub fn path_reverse<P>(doc: &Document, start: Option<NodeKey>, mut predicate: P) -> Option<Vec<NodeKey>>
where
    P: FnMut(&Document, NodeKey) -> bool,
{
    let mut path = Vec::new();
    find_reverse(doc, start, |doc, node| {
        path.push(node);
        predicate(doc, node)
    })?;
    Some(path)
}

pub fn has_level(doc: &Document, node: NodeKey, level: Level) -> bool {
    doc.data(node, MARKER) == Some(level.marker())
}

pub fn find_root_from_node(doc: &Document, node: Option<NodeKey>) -> Option<NodeKey> {
    find_reverse(doc, node, |doc, k| has_level(doc, k, Level::Root))
}

pub fn find_paragraph_from_node(doc: &Document, node: Option<NodeKey>) -> Option<NodeKey> {
    find_reverse(doc, node, |doc, k| has_level(doc, k, Level::Paragraph))
}

pub fn find_inline_from_node(doc: &Document, node: Option<NodeKey>) -> Option<NodeKey> {
    find_reverse(doc, node, |doc, k| has_level(doc, k, Level::Inline))
}

fn endpoint_node(selection: &Selection, endpoint: Endpoint) -> Option<NodeKey> {
    selection.endpoint(endpoint).map(|p| p.node)
}

pub fn find_root_from_selection(doc: &Document, selection: &Selection, endpoint: Endpoint) -> Option<NodeKey> {
    find_root_from_node(doc, endpoint_node(selection, endpoint))
}

pub fn find_paragraph_from_selection(doc: &Document, selection: &Selection, endpoint: Endpoint) -> Option<NodeKey> {
    find_paragraph_from_node(doc, endpoint_node(selection, endpoint))
}

pub fn find_inline_from_selection(doc: &Document, selection: &Selection, endpoint: Endpoint) -> Option<NodeKey> {
    find_inline_from_node(doc, endpoint_node(selection, endpoint))
}

/// Anchor node up to its root, nearest first.
pub fn path_from_selection(doc: &Document, selection: &Selection) -> Option<Vec<NodeKey>> {
    path_reverse(doc, selection.anchor_node(), |doc, k| has_level(doc, k, Level::Root))
}

pub fn is_same_paragraph(doc: &Document, selection: &Selection) -> bool {
    find_paragraph_from_node(doc, selection.anchor_node()) == find_paragraph_from_node(doc, selection.focus_node())
}

pub fn is_same_inline(doc: &Document, selection: &Selection) -> bool {
    find_inline_from_node(doc, selection.anchor_node()) == find_inline_from_node(doc, selection.focus_node())
}

pub fn is_inside(doc: &Document, selection: &Selection, element: NodeKey) -> bool {
    selection
        .anchor_node()
        .is_some_and(|anchor| doc.is_live(anchor) && doc.contains(element, anchor))
}

pub fn is_outside(doc: &Document, selection: &Selection, element: NodeKey) -> bool {
    !is_inside(doc, selection, element)
}

/// No anchor, or an anchor that is not a text node.
pub fn is_unanchored(doc: &Document, selection: &Selection) -> bool {
    selection.anchor_node().is_none_or(|anchor| !doc.is_text(anchor))
}

/// Caret resolved from a point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CaretPosition {
    pub offset_node: NodeKey,
    pub offset: usize,
    pub rect: Option<Rect>,
}

/// Point-to-caret services of the host environment. Each lookup returns
/// `None` when the host does not provide it.
pub trait CaretHost {
    /// Standards-track caret position lookup.
    fn caret_position_from_point(&self, _x: f32, _y: f32) -> Option<CaretPosition> {
        None
    }

    /// Legacy collapsed-range lookup.
    fn caret_range_from_point(&self, _x: f32, _y: f32) -> Option<Position> {
        None
    }

    /// Bounding rect of a collapsed range at `position`.
    fn caret_rect(&self, _position: Position) -> Option<Rect> {
        None
    }
}

/// Tries the caret position API, then the range API, then falls back to
/// the current selection's first range collapsed to its end.
pub fn caret_from_point(
    host: &dyn CaretHost,
    doc: &Document,
    selection: &Selection,
    x: f32,
    y: f32,
) -> Option<CaretPosition> {
    if let Some(caret) = host.caret_position_from_point(x, y) {
        return Some(caret);
    }
    let position = match host.caret_range_from_point(x, y) {
        Some(position) => position,
        None => {
            let mut range = selection.ranges(doc).into_iter().next()?;
            if !range.is_collapsed() {
                range.collapse(false);
            }
            range.start
        }
    };
    Some(CaretPosition {
        offset_node: position.node,
        offset: position.offset,
        rect: host.caret_rect(position),
    })
}
