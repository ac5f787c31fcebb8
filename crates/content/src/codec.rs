//! Conversion between the document model and the editable DOM.
//!
//! Every model level becomes one element tagged with a `data-itype` marker.
//! Native style attributes are written as inline declarations; attributes with
//! no CSS form go to the element's encoded side channel as JSON.

use crate::attrs::{Level, MARKER};
use crate::defaults::StyleMap;
use crate::error::ContentError;
use crate::model::{Attributes, Content, ContentNode, Inline, LINE_BREAK, Paragraph, ParagraphSet, Root};
use dom::{Document, NodeKey};
use log::{debug, trace, warn};
use serde_json::Value;

/// Styles ready to be applied to one element.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ElementStyle {
    /// `(css property, value)` in table order.
    pub declarations: Vec<(String, String)>,
    /// `(model key, serialized JSON)` in table order.
    pub encoded: Vec<(String, String)>,
}

impl ElementStyle {
    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty() && self.encoded.is_empty()
    }

    pub fn declaration(&self, property: &str) -> Option<&str> {
        self.declarations
            .iter()
            .find(|(k, _)| k == property)
            .map(|(_, v)| v.as_str())
    }

    /// Inline `style` attribute text for the native declarations.
    pub fn css_text(&self) -> String {
        css::serialize_declarations(&self.declarations)
    }
}

/// Where an element's styles come from.
#[derive(Clone, Copy, Debug)]
pub enum StyleSource<'a> {
    /// The attributes of a model node.
    Node(&'a Attributes),
    /// Editor defaults, with per-property overrides taking precedence.
    Defaults {
        defaults: &'a StyleMap,
        overrides: Option<&'a StyleMap>,
    },
}

impl StyleSource<'_> {
    pub fn resolve(&self, level: Level) -> ElementStyle {
        match *self {
            StyleSource::Node(attrs) => style_from_model_node(level, attrs),
            StyleSource::Defaults {
                defaults,
                overrides,
            } => style_from_defaults(level, defaults, overrides),
        }
    }
}

fn css_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

pub fn style_from_model_node(level: Level, attrs: &Attributes) -> ElementStyle {
    let mut style = ElementStyle::default();
    for attr in level.attributes() {
        let Some(value) = attrs.get(attr.key) else {
            continue;
        };
        if value.is_null() {
            continue;
        }
        match attr.property {
            Some(property) => match css_value(value) {
                Some(v) => style
                    .declarations
                    .push((property.to_string(), attr.with_unit(&v))),
                None => warn!(
                    target: "content.codec",
                    "{level} attribute {} has no css form: {value}", attr.key
                ),
            },
            None => style.encoded.push((attr.key.to_string(), value.to_string())),
        }
    }
    style
}

/// Styles for a fresh element: override first, then default. Native entries
/// are looked up by css property, encoded ones by model key.
pub fn style_from_defaults(
    level: Level,
    defaults: &StyleMap,
    overrides: Option<&StyleMap>,
) -> ElementStyle {
    let mut style = ElementStyle::default();
    for attr in level.attributes() {
        let name = attr.property.unwrap_or(attr.key);
        let value = overrides
            .and_then(|o| o.get(name))
            .or_else(|| defaults.get(name));
        let Some(value) = value else {
            continue;
        };
        match attr.property {
            Some(property) => style
                .declarations
                .push((property.to_string(), attr.with_unit(value))),
            None => style
                .encoded
                .push((attr.key.to_string(), Value::String(value.clone()).to_string())),
        }
    }
    style
}

/// Reads the model attributes back from an element.
///
/// Only declarations the element makes itself are reported, so values
/// inherited from the paragraph do not leak into its inlines. Unit suffixes
/// are stripped. An encoded value that is not valid JSON counts as absent.
pub fn style_from_computed_style(doc: &Document, element: NodeKey, level: Level) -> Attributes {
    let computed = css::compute_style(doc, element);
    let mut attrs = Attributes::new();
    for attr in level.attributes() {
        match attr.property {
            Some(property) => {
                let Some(value) = computed.specified(property) else {
                    continue;
                };
                let value = match attr.unit {
                    Some(unit) => css::strip_unit(value, unit),
                    None => value.to_string(),
                };
                attrs.insert(attr.key.to_string(), Value::String(value));
            }
            None => {
                let Some(raw) = doc.encoded_property(element, attr.key) else {
                    continue;
                };
                match serde_json::from_str::<Value>(raw) {
                    Ok(value) => {
                        attrs.insert(attr.key.to_string(), value);
                    }
                    Err(err) => warn!(
                        target: "content.codec",
                        "ignoring malformed {} on {element}: {err}", attr.key
                    ),
                }
            }
        }
    }
    attrs
}

pub fn extract_root_styles(doc: &Document, element: NodeKey) -> Attributes {
    style_from_computed_style(doc, element, Level::Root)
}

pub fn extract_paragraph_styles(doc: &Document, element: NodeKey) -> Attributes {
    style_from_computed_style(doc, element, Level::Paragraph)
}

pub fn extract_inline_styles(doc: &Document, element: NodeKey) -> Attributes {
    style_from_computed_style(doc, element, Level::Inline)
}

pub fn apply_style(doc: &mut Document, element: NodeKey, style: &ElementStyle) -> Result<(), ContentError> {
    for (property, value) in &style.declarations {
        doc.set_style_property(element, property, value)?;
    }
    for (key, value) in &style.encoded {
        doc.set_encoded_property(element, key, value)?;
    }
    Ok(())
}

fn invalid_children(level: Level, reason: &str) -> ContentError {
    ContentError::InvalidChildren {
        level,
        reason: reason.to_string(),
    }
}

fn has_marker(doc: &Document, key: NodeKey, level: Level) -> bool {
    doc.data(key, MARKER) == Some(level.marker())
}

fn check_children(doc: &Document, level: Level, children: &[NodeKey]) -> Result<(), ContentError> {
    match level {
        Level::Inline => {
            if children.is_empty() {
                return Err(invalid_children(level, "needs text or a line break"));
            }
            let breaks = children.iter().filter(|&&c| doc.is_line_break(c)).count();
            if breaks > 0 && children.len() > 1 {
                return Err(invalid_children(level, "mixes a line break with other content"));
            }
            if breaks == 0 && !children.iter().all(|&c| doc.is_text(c)) {
                return Err(invalid_children(level, "some child is not text"));
            }
        }
        Level::Paragraph => {
            if !children.iter().all(|&c| has_marker(doc, c, Level::Inline)) {
                return Err(invalid_children(level, "some child is not an inline"));
            }
        }
        Level::Root => {
            if !children.iter().all(|&c| has_marker(doc, c, Level::Paragraph)) {
                return Err(invalid_children(level, "some child is not a paragraph"));
            }
        }
    }
    Ok(())
}

/// Builds one element for `level`, marks it, styles it and adopts
/// `children`. Children are checked before anything is created.
pub fn create_element_from_node(
    doc: &mut Document,
    level: Level,
    source: StyleSource<'_>,
    children: &[NodeKey],
) -> Result<NodeKey, ContentError> {
    check_children(doc, level, children)?;
    let element = doc.create_element(level.tag());
    doc.set_data(element, MARKER, level.marker())?;
    let style = source.resolve(level);
    trace!(target: "content.codec", "{level} {element}: {}", style.css_text());
    apply_style(doc, element, &style)?;
    doc.append_children(element, children)?;
    Ok(element)
}

pub fn create_root_element(
    doc: &mut Document,
    paragraphs: &[NodeKey],
    source: StyleSource<'_>,
) -> Result<NodeKey, ContentError> {
    create_element_from_node(doc, Level::Root, source, paragraphs)
}

pub fn create_paragraph_element(
    doc: &mut Document,
    inlines: &[NodeKey],
    source: StyleSource<'_>,
) -> Result<NodeKey, ContentError> {
    create_element_from_node(doc, Level::Paragraph, source, inlines)
}

/// `"\n"` becomes a `<br>`; any other text a single text node.
pub fn create_inline_element(
    doc: &mut Document,
    text: &str,
    source: StyleSource<'_>,
) -> Result<NodeKey, ContentError> {
    let child = if text == LINE_BREAK {
        doc.create_element("br")
    } else {
        doc.create_text(text)
    };
    create_element_from_node(doc, Level::Inline, source, &[child])
}

/// Materializes `root` as a detached subtree of `doc` and returns the root
/// element. The model is validated first; on failure `doc` is untouched.
pub fn to_dom(doc: &mut Document, root: &Root) -> Result<NodeKey, ContentError> {
    root.validate()?;

    let mut paragraphs = Vec::with_capacity(root.paragraphs().len());
    for paragraph in root.paragraphs() {
        let mut inlines = Vec::with_capacity(paragraph.inlines.len());
        for inline in &paragraph.inlines {
            inlines.push(create_inline_element(
                doc,
                &inline.text,
                StyleSource::Node(&inline.attrs),
            )?);
        }
        paragraphs.push(create_paragraph_element(
            doc,
            &inlines,
            StyleSource::Node(&paragraph.attrs),
        )?);
    }
    let element = create_root_element(doc, &paragraphs, StyleSource::Node(&root.attrs))?;
    debug!(
        target: "content.codec",
        "to_dom: {} paragraphs -> {element}", paragraphs.len()
    );
    Ok(element)
}

/// Like [`to_dom`] for the untyped wire form, running the full validator
/// (including inline text checks) first.
pub fn node_to_dom(doc: &mut Document, node: &ContentNode) -> Result<NodeKey, ContentError> {
    let root = Root::try_from(node.clone())?;
    to_dom(doc, &root)
}

fn inline_text(doc: &Document, inline: NodeKey) -> String {
    match doc.children(inline) {
        [only] if doc.is_line_break(*only) => LINE_BREAK.to_string(),
        _ => doc.text_content(inline),
    }
}

/// Reads the model back from a root element. `None` in, `None` out.
pub fn from_dom(doc: &Document, root: Option<NodeKey>) -> Content {
    let root = root.filter(|&k| doc.is_live(k))?;
    let paragraphs: Vec<Paragraph> = doc
        .query_data_value(root, MARKER, Level::Paragraph.marker())
        .into_iter()
        .map(|paragraph| {
            let inlines = doc
                .query_data_value(paragraph, MARKER, Level::Inline.marker())
                .into_iter()
                .map(|inline| Inline {
                    text: inline_text(doc, inline),
                    attrs: extract_inline_styles(doc, inline),
                })
                .collect();
            Paragraph {
                attrs: extract_paragraph_styles(doc, paragraph),
                inlines,
            }
        })
        .collect();
    debug!(
        target: "content.codec",
        "from_dom: {root} -> {} paragraphs", paragraphs.len()
    );
    Some(Root {
        attrs: extract_root_styles(doc, root),
        paragraph_set: ParagraphSet { paragraphs },
    })
}
