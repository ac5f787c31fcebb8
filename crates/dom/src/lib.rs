//! # dom
//!
//! The live document tree shared by the editing surface and the layout
//! engine. It models exactly what those two need from a browser DOM:
//! elements with attributes, dataset markers and inline style, text nodes,
//! `<br>` line breaks, parent links for upward walks, and deep cloning
//! across documents for off-screen measurement.

mod document;
mod serialize;
mod traverse;
mod types;

#[cfg(test)]
mod tests;

pub use document::Document;
pub use types::{DomError, ElementData, NodeKey, NodeKind};
