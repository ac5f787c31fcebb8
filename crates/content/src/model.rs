use crate::attrs::{self, Level};
use crate::error::ContentError;
use crate::validate;
use serde::{Deserialize, Serialize};
use log::debug;
use serde_json::Value;
use std::collections::BTreeMap;

/// Style attributes of one model node, keyed by model attribute name.
///
/// Native CSS attributes hold strings; numbers and booleans given for them
/// are stored in their string form. Encoded ones such as `fills` hold
/// arbitrary JSON.
pub type Attributes = BTreeMap<String, Value>;

pub const ROOT_TYPE: &str = "root";
pub const PARAGRAPH_SET_TYPE: &str = "paragraph-set";
pub const PARAGRAPH_TYPE: &str = "paragraph";

/// Text value of an inline that stands for a forced line break.
pub const LINE_BREAK: &str = "\n";

/// Untyped wire form of the document model, as exchanged with the host
/// document store. It may be structurally invalid; see [`crate::validate`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentNode {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<ContentNode>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(flatten)]
    pub attrs: Attributes,
}

impl ContentNode {
    pub fn has_type(&self, expected: &str) -> bool {
        self.kind.as_deref() == Some(expected)
    }

    pub fn children(&self) -> &[ContentNode] {
        self.children.as_deref().unwrap_or(&[])
    }

    pub fn first_child(&self) -> Option<&ContentNode> {
        self.children().first()
    }

    /// Reads a node from an arbitrary JSON value; anything but an object is
    /// rejected as an invalid root.
    pub fn from_value(value: Value) -> Result<ContentNode, ContentError> {
        if !value.is_object() {
            return Err(ContentError::InvalidRoot("Root is not a map".into()));
        }
        Ok(serde_json::from_value(value)?)
    }
}

/// Parses serialized content; `null` is the empty document.
pub fn parse_content(json: &str) -> Result<Content, ContentError> {
    let value: Value = serde_json::from_str(json)?;
    if value.is_null() {
        return Ok(None);
    }
    let node = ContentNode::from_value(value)?;
    Root::try_from(node).map(Some)
}

/// The document; `None` means "no content yet".
pub type Content = Option<Root>;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Root {
    pub attrs: Attributes,
    pub paragraph_set: ParagraphSet,
}

/// Paragraph container. It has no element of its own in the DOM, so it
/// carries no attributes.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParagraphSet {
    pub paragraphs: Vec<Paragraph>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Paragraph {
    pub attrs: Attributes,
    pub inlines: Vec<Inline>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Inline {
    pub text: String,
    pub attrs: Attributes,
}

impl Root {
    pub fn new(paragraphs: Vec<Paragraph>) -> Self {
        Self {
            attrs: Attributes::new(),
            paragraph_set: ParagraphSet { paragraphs },
        }
    }

    pub fn with_attr(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.attrs
            .insert(key.to_string(), native_form(Level::Root, key, value.into()));
        self
    }

    pub fn paragraphs(&self) -> &[Paragraph] {
        &self.paragraph_set.paragraphs
    }

    /// Concatenated text of every inline, paragraphs separated by newlines.
    pub fn text(&self) -> String {
        self.paragraphs()
            .iter()
            .map(Paragraph::text)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Structural checks for records built by hand, with the same causes the
    /// wire validator reports.
    pub fn validate(&self) -> Result<(), ContentError> {
        if self.paragraph_set.paragraphs.is_empty() {
            return Err(ContentError::InvalidParagraphSet(
                validate::PARAGRAPH_SET_EMPTY.into(),
            ));
        }
        for (index, paragraph) in self.paragraphs().iter().enumerate() {
            if paragraph.inlines.is_empty() {
                return Err(ContentError::InvalidParagraph {
                    index,
                    reason: validate::PARAGRAPH_EMPTY.into(),
                });
            }
        }
        Ok(())
    }
}

impl Paragraph {
    pub fn new(inlines: Vec<Inline>) -> Self {
        Self {
            attrs: Attributes::new(),
            inlines,
        }
    }

    pub fn with_attr(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.attrs
            .insert(key.to_string(), native_form(Level::Paragraph, key, value.into()));
        self
    }

    pub fn text(&self) -> String {
        self.inlines.iter().map(|i| i.text.as_str()).collect()
    }
}

impl Inline {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            attrs: Attributes::new(),
        }
    }

    pub fn line_break() -> Self {
        Self::new(LINE_BREAK)
    }

    pub fn with_attr(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.attrs
            .insert(key.to_string(), native_form(Level::Inline, key, value.into()));
        self
    }

    pub fn is_line_break(&self) -> bool {
        self.text == LINE_BREAK
    }
}

/// Scalar values of native attributes become strings, the form they read
/// back from the DOM in.
fn native_form(level: Level, key: &str, value: Value) -> Value {
    let native = attrs::lookup(level, key).is_some_and(|attr| !attr.is_encoded());
    match value {
        Value::Number(n) if native => Value::String(n.to_string()),
        Value::Bool(b) if native => Value::String(b.to_string()),
        other => other,
    }
}

fn normalize_attrs(level: Level, attrs: Attributes) -> Attributes {
    attrs
        .into_iter()
        .map(|(key, value)| {
            let value = native_form(level, &key, value);
            (key, value)
        })
        .collect()
}

impl TryFrom<ContentNode> for Root {
    type Error = ContentError;

    fn try_from(node: ContentNode) -> Result<Self, Self::Error> {
        validate::validate_content(Some(&node))?;

        let ContentNode {
            children, attrs, ..
        } = node;
        let Some(set) = children.and_then(|c| c.into_iter().next()) else {
            return Err(ContentError::InvalidRoot(validate::ROOT_ARITY.into()));
        };
        let ContentNode {
            children: paragraphs,
            attrs: set_attrs,
            ..
        } = set;
        if !set_attrs.is_empty() {
            debug!(
                target: "content.codec",
                "ignoring {} paragraph-set attributes", set_attrs.len()
            );
        }

        let mut out = Vec::new();
        for (p_index, paragraph) in paragraphs.unwrap_or_default().into_iter().enumerate() {
            let mut inlines = Vec::new();
            for (i_index, inline) in paragraph.children.unwrap_or_default().into_iter().enumerate() {
                if validate::validate_text(&inline).is_err() {
                    return Err(ContentError::InvalidText {
                        paragraph: p_index,
                        index: i_index,
                    });
                }
                inlines.push(Inline {
                    text: inline.text.unwrap_or_default(),
                    attrs: normalize_attrs(Level::Inline, inline.attrs),
                });
            }
            out.push(Paragraph {
                attrs: normalize_attrs(Level::Paragraph, paragraph.attrs),
                inlines,
            });
        }

        Ok(Root {
            attrs: normalize_attrs(Level::Root, attrs),
            paragraph_set: ParagraphSet { paragraphs: out },
        })
    }
}

impl From<Root> for ContentNode {
    fn from(root: Root) -> Self {
        let paragraphs = root
            .paragraph_set
            .paragraphs
            .into_iter()
            .map(|p| ContentNode {
                kind: Some(PARAGRAPH_TYPE.into()),
                children: Some(
                    p.inlines
                        .into_iter()
                        .map(|i| ContentNode {
                            kind: None,
                            children: None,
                            text: Some(i.text),
                            attrs: i.attrs,
                        })
                        .collect(),
                ),
                text: None,
                attrs: p.attrs,
            })
            .collect();
        ContentNode {
            kind: Some(ROOT_TYPE.into()),
            children: Some(vec![ContentNode {
                kind: Some(PARAGRAPH_SET_TYPE.into()),
                children: Some(paragraphs),
                text: None,
                attrs: Attributes::new(),
            }]),
            text: None,
            attrs: root.attrs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn wire_form_round_trips_through_records() {
        let json = json!({
            "type": "root",
            "vertical-align": "top",
            "children": [{
                "type": "paragraph-set",
                "children": [{
                    "type": "paragraph",
                    "text-align": "center",
                    "children": [
                        { "text": "Hello", "font-weight": "700" },
                        { "text": "\n" }
                    ]
                }]
            }]
        });
        let node = ContentNode::from_value(json.clone()).unwrap();
        let root = Root::try_from(node.clone()).unwrap();
        assert_eq!(root.paragraphs().len(), 1);
        assert_eq!(root.paragraphs()[0].inlines[0].text, "Hello");
        assert!(root.paragraphs()[0].inlines[1].is_line_break());
        assert_eq!(root.attrs.get("vertical-align"), Some(&json!("top")));

        let back = ContentNode::from(root);
        assert_eq!(back, node);
        assert_eq!(serde_json::to_value(&back).unwrap(), json);
    }

    #[test]
    fn wire_numbers_for_native_attributes_become_strings() {
        let node = ContentNode::from_value(json!({
            "type": "root",
            "children": [{
                "type": "paragraph-set",
                "vertical-align": "top",
                "children": [{
                    "type": "paragraph",
                    "font-size": 16,
                    "children": [{ "text": "a", "font-weight": 700, "font-id": 3 }]
                }]
            }]
        }))
        .unwrap();
        let root = Root::try_from(node).unwrap();
        let paragraph = &root.paragraphs()[0];
        assert_eq!(paragraph.attrs["font-size"], json!("16"));
        assert_eq!(paragraph.inlines[0].attrs["font-weight"], json!("700"));
        assert_eq!(paragraph.inlines[0].attrs["font-id"], json!(3));

        // The paragraph set has no element of its own; its attributes drop.
        let back = ContentNode::from(root);
        assert!(back.children()[0].attrs.is_empty());
    }

    #[test]
    fn inline_without_text_is_rejected() {
        let node = ContentNode::from_value(json!({
            "type": "root",
            "children": [{
                "type": "paragraph-set",
                "children": [{ "type": "paragraph", "children": [{ "font-size": "12" }] }]
            }]
        }))
        .unwrap();
        assert_eq!(
            Root::try_from(node),
            Err(ContentError::InvalidText {
                paragraph: 0,
                index: 0
            })
        );
    }

    #[test]
    fn parse_content_accepts_null() {
        assert_eq!(parse_content("null").unwrap(), None);
        assert!(matches!(parse_content("[1, 2]"), Err(ContentError::InvalidRoot(_))));
        assert!(matches!(parse_content("{"), Err(ContentError::Malformed(_))));
    }

    #[test]
    fn builders_validate() {
        let root = Root::new(vec![Paragraph::new(vec![Inline::new("a")])]);
        assert!(root.validate().is_ok());
        assert!(Root::new(vec![]).validate().is_err());
        assert!(Root::new(vec![Paragraph::new(vec![])]).validate().is_err());
        assert_eq!(
            Root::new(vec![
                Paragraph::new(vec![Inline::new("ab"), Inline::new("c")]),
                Paragraph::new(vec![Inline::new("d")]),
            ])
            .text(),
            "abc\nd"
        );
    }
}
