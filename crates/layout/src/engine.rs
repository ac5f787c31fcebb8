use crate::measurer::{RangeMeasurer, TextRange};
use crate::position::PositionData;
use crate::scan::split_runs;
use content::{ContentError, Level, MARKER, Root};
use core_types::{Rect, Size};
use dom::{Document, DomError, NodeKey};
use log::debug;

/// One measured run, tagged with the inline element it belongs to.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutNode {
    pub node: NodeKey,
    pub rect: Option<Rect>,
    pub text: String,
}

/// Measures rendered text into positioned runs.
///
/// Each engine owns its own measurement surface: a detached document holding
/// an inert `data-layout` container that is resized and refilled on every
/// pass, plus the single range used for all rect queries. Independent
/// engines never share state.
pub struct TextLayout<M: RangeMeasurer> {
    measurer: M,
    surface: Document,
    container: NodeKey,
    range: TextRange,
}

impl<M: RangeMeasurer> TextLayout<M> {
    pub fn new(measurer: M) -> Result<Self, DomError> {
        let mut surface = Document::new();
        let body = surface.create_element("body");
        let container = surface.create_element("div");
        surface.set_data(container, "layout", "true")?;
        surface.set_style_property(container, "pointer-events", "none")?;
        surface.set_style_property(container, "left", "0px")?;
        surface.set_style_property(container, "top", "0px")?;
        surface.set_style_property(container, "position", "absolute")?;
        surface.append_child(body, container)?;
        Ok(Self {
            measurer,
            surface,
            container,
            range: TextRange::default(),
        })
    }

    pub fn measurer(&self) -> &M {
        &self.measurer
    }

    pub fn surface(&self) -> &Document {
        &self.surface
    }

    pub fn container(&self) -> NodeKey {
        self.container
    }

    fn set_layout_size(&mut self, size: Size) -> Result<(), DomError> {
        self.surface
            .set_style_property(self.container, "width", &format!("{}px", size.width))?;
        self.surface
            .set_style_property(self.container, "height", &format!("{}px", size.height))
    }

    /// Client rects of `[start, end)` in `node`, zero-width rects dropped.
    fn range_rects(&mut self, node: NodeKey, start: usize, end: usize) -> Vec<Rect> {
        self.range.set_start(node, start);
        self.range.set_end(node, end);
        self.measurer
            .client_rects(&self.surface, &self.range)
            .into_iter()
            .filter(|rect| rect.width > 0.0)
            .collect()
    }

    /// Runs the run-splitting scan over one text node of the surface.
    pub fn layout_text_node(&mut self, parent: NodeKey, text_node: NodeKey, text_align: &str) -> Vec<LayoutNode> {
        let Some(text) = self.surface.text(text_node).map(str::to_owned) else {
            return Vec::new();
        };
        let justify = text_align == "justify";
        split_runs(&text, justify, |start, end| self.range_rects(text_node, start, end))
            .into_iter()
            .map(|run| LayoutNode {
                node: parent,
                rect: run.rect,
                text: run.text,
            })
            .collect()
    }

    /// Lays out a rendered element without disturbing it: the subtree is
    /// cloned into the measurement surface, sized like the element's parent,
    /// and every inline's text is scanned in document order.
    pub fn layout_from_element(&mut self, doc: &Document, element: NodeKey) -> Result<Vec<PositionData>, DomError> {
        if !doc.is_live(element) {
            return Err(DomError::UnknownKey(element));
        }
        let sizing = doc.parent(element).unwrap_or(element);
        let size = self.measurer.client_size(doc, sizing);
        self.set_layout_size(size)?;

        let clone = self.surface.import_subtree(doc, element)?;
        self.surface.replace_children(self.container, &[clone])?;
        self.measurer.prepare(&self.surface, self.container);

        let inlines = self
            .surface
            .query_data_value(self.container, MARKER, Level::Inline.marker());
        let mut nodes = Vec::new();
        for inline in inlines {
            let text_align = self
                .surface
                .parent(inline)
                .map(|p| css::compute_style(&self.surface, p).get_or("text-align", "left").to_string())
                .unwrap_or_else(|| "left".to_string());
            let children = self.surface.children(inline).to_vec();
            for child in children {
                if self.surface.is_text(child) {
                    nodes.extend(self.layout_text_node(inline, child, &text_align));
                }
            }
        }

        let positions: Vec<PositionData> = nodes
            .iter()
            .filter_map(|node| PositionData::from_layout_node(&self.surface, node))
            .collect();
        debug!(
            target: "layout.scan",
            "layout {element}: {} runs ({} unmeasured)",
            positions.len(),
            nodes.len() - positions.len()
        );
        Ok(positions)
    }

    /// Lays out a model directly: it is materialized into a scratch document
    /// inside a host of the given width, then measured like any element.
    pub fn layout_from_content(&mut self, root: &Root, width: f32) -> Result<Vec<PositionData>, ContentError> {
        let mut doc = Document::new();
        let host = doc.create_element("div");
        doc.set_style_property(host, "width", &format!("{width}px"))?;
        let element = content::to_dom(&mut doc, root)?;
        doc.append_child(host, element)?;
        Ok(self.layout_from_element(&doc, element)?)
    }
}
