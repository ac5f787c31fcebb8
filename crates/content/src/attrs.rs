//! Static tables mapping document-model attribute keys to DOM style properties.

use std::fmt;

/// Structural level of an element in the editable DOM.
///
/// The paragraph-set has no DOM counterpart: paragraphs hang directly off the
/// root element.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Level {
    Root,
    Paragraph,
    Inline,
}

impl Level {
    /// Value of the `data-itype` marker attribute.
    pub fn marker(self) -> &'static str {
        match self {
            Level::Root => "root",
            Level::Paragraph => "paragraph",
            Level::Inline => "inline",
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            Level::Root | Level::Paragraph => "div",
            Level::Inline => "span",
        }
    }

    pub fn attributes(self) -> &'static [StyleAttribute] {
        match self {
            Level::Root => ROOT_ATTRS,
            Level::Paragraph => PARAGRAPH_ATTRS,
            Level::Inline => INLINE_ATTRS,
        }
    }

    pub fn from_marker(marker: &str) -> Option<Level> {
        match marker {
            "root" => Some(Level::Root),
            "paragraph" => Some(Level::Paragraph),
            "inline" => Some(Level::Inline),
            _ => None,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.marker())
    }
}

/// Dataset key carrying the structural marker (`data-itype`).
pub const MARKER: &str = "itype";

/// One `(model key, css property, unit)` triple.
///
/// `property == None` means the value has no native CSS form and travels in
/// the encoded side channel as JSON, keyed by the model key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StyleAttribute {
    pub key: &'static str,
    pub property: Option<&'static str>,
    pub unit: Option<&'static str>,
}

impl StyleAttribute {
    const fn css(key: &'static str, property: &'static str) -> Self {
        Self {
            key,
            property: Some(property),
            unit: None,
        }
    }

    const fn css_with_unit(key: &'static str, property: &'static str, unit: &'static str) -> Self {
        Self {
            key,
            property: Some(property),
            unit: Some(unit),
        }
    }

    const fn encoded(key: &'static str) -> Self {
        Self {
            key,
            property: None,
            unit: None,
        }
    }

    pub fn is_encoded(&self) -> bool {
        self.property.is_none()
    }

    /// Appends the unit unless the value already carries it.
    pub fn with_unit(&self, value: &str) -> String {
        match self.unit {
            Some(unit) if !value.ends_with(unit) => format!("{value}{unit}"),
            _ => value.to_string(),
        }
    }
}

pub const ROOT_ATTRS: &[StyleAttribute] = &[StyleAttribute::css("vertical-align", "vertical-align")];

pub const PARAGRAPH_ATTRS: &[StyleAttribute] = &[
    StyleAttribute::css("text-align", "text-align"),
    StyleAttribute::css("text-direction", "text-direction"),
    StyleAttribute::css("line-height", "line-height"),
    StyleAttribute::css_with_unit("font-size", "font-size", "px"),
];

pub const INLINE_ATTRS: &[StyleAttribute] = &[
    StyleAttribute::encoded("typography-ref-id"),
    StyleAttribute::encoded("typography-ref-file"),
    StyleAttribute::encoded("font-id"),
    StyleAttribute::css("font-variant-id", "font-variant"),
    StyleAttribute::css("font-family", "font-family"),
    StyleAttribute::css_with_unit("font-size", "font-size", "px"),
    StyleAttribute::css("font-weight", "font-weight"),
    StyleAttribute::css("font-style", "font-style"),
    StyleAttribute::css("line-height", "line-height"),
    StyleAttribute::css("letter-spacing", "letter-spacing"),
    StyleAttribute::css("text-decoration", "text-decoration"),
    StyleAttribute::css("text-transform", "text-transform"),
    StyleAttribute::encoded("fills"),
];

pub fn lookup(level: Level, key: &str) -> Option<&'static StyleAttribute> {
    level.attributes().iter().find(|attr| attr.key == key)
}
