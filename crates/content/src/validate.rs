//! Structural checks on the wire form of the document model.
//!
//! Rules are evaluated top-down and stop at the first failure. Callers that
//! only need a yes/no use [`is_valid_content`]; materialization turns the
//! error into a hard failure before touching the DOM.

use crate::error::ContentError;
use crate::model::{ContentNode, PARAGRAPH_SET_TYPE, PARAGRAPH_TYPE, ROOT_TYPE};

pub(crate) const ROOT_TYPE_MISMATCH: &str = "Root doesn't have type \"root\"";
pub(crate) const ROOT_ARITY: &str = "Root doesn't have exactly one child";
pub(crate) const PARAGRAPH_SET_TYPE_MISMATCH: &str =
    "ParagraphSet doesn't have type \"paragraph-set\"";
pub(crate) const PARAGRAPH_SET_EMPTY: &str = "ParagraphSet doesn't have at least one child";
pub(crate) const PARAGRAPH_TYPE_MISMATCH: &str = "Paragraph doesn't have type \"paragraph\"";
pub(crate) const PARAGRAPH_EMPTY: &str = "Paragraph doesn't have at least one child";

pub fn validate_root(root: &ContentNode) -> Result<(), ContentError> {
    if !root.has_type(ROOT_TYPE) {
        return Err(ContentError::InvalidRoot(ROOT_TYPE_MISMATCH.into()));
    }
    if root.children().len() != 1 {
        return Err(ContentError::InvalidRoot(ROOT_ARITY.into()));
    }
    Ok(())
}

pub fn validate_paragraph_set(set: &ContentNode) -> Result<(), ContentError> {
    if !set.has_type(PARAGRAPH_SET_TYPE) {
        return Err(ContentError::InvalidParagraphSet(
            PARAGRAPH_SET_TYPE_MISMATCH.into(),
        ));
    }
    if set.children().is_empty() {
        return Err(ContentError::InvalidParagraphSet(PARAGRAPH_SET_EMPTY.into()));
    }
    Ok(())
}

/// `index` is the paragraph's position in its set and is reported back in
/// the error.
pub fn validate_paragraph(paragraph: &ContentNode, index: usize) -> Result<(), ContentError> {
    if !paragraph.has_type(PARAGRAPH_TYPE) {
        return Err(ContentError::InvalidParagraph {
            index,
            reason: PARAGRAPH_TYPE_MISMATCH.into(),
        });
    }
    if paragraph.children().is_empty() {
        return Err(ContentError::InvalidParagraph {
            index,
            reason: PARAGRAPH_EMPTY.into(),
        });
    }
    Ok(())
}

/// An inline must carry a `text` key. Not part of the
/// [`validate_content`] chain.
pub fn validate_text(inline: &ContentNode) -> Result<(), ContentError> {
    if inline.text.is_none() {
        return Err(ContentError::InvalidText {
            paragraph: 0,
            index: 0,
        });
    }
    Ok(())
}

/// `None` is the empty document and is always valid.
pub fn validate_content(content: Option<&ContentNode>) -> Result<(), ContentError> {
    let Some(root) = content else {
        return Ok(());
    };
    validate_root(root)?;
    let set = root
        .first_child()
        .ok_or_else(|| ContentError::InvalidRoot(ROOT_ARITY.into()))?;
    validate_paragraph_set(set)?;
    for (index, paragraph) in set.children().iter().enumerate() {
        validate_paragraph(paragraph, index)?;
    }
    Ok(())
}

pub fn is_valid_content(content: Option<&ContentNode>) -> bool {
    validate_content(content).is_ok()
}
