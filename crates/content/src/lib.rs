//! Structured text content and its DOM projection.
//!
//! The model is root -> paragraph-set -> paragraph -> inline. [`codec`]
//! materializes it as marked `div`/`span` elements in a [`dom::Document`]
//! and reads it back; [`validate`] guards the untyped wire form.

pub mod attrs;
pub mod codec;
pub mod defaults;
pub mod model;
pub mod validate;

mod error;

pub use attrs::{INLINE_ATTRS, Level, MARKER, PARAGRAPH_ATTRS, ROOT_ATTRS, StyleAttribute};
pub use codec::{
    ElementStyle, StyleSource, apply_style, create_element_from_node, create_inline_element,
    create_paragraph_element, create_root_element, from_dom, node_to_dom, style_from_computed_style,
    style_from_defaults, style_from_model_node, to_dom,
};
pub use defaults::{EditorDefaults, StyleMap};
pub use error::ContentError;
pub use model::{
    Attributes, Content, ContentNode, Inline, LINE_BREAK, Paragraph, ParagraphSet, Root,
    parse_content,
};
pub use validate::{is_valid_content, validate_content, validate_text};
