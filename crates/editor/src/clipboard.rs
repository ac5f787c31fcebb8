//! Clipboard payloads for paste, copy and cut.

use crate::editor::TextEditor;
use crate::error::EditorError;
use log::debug;

/// MIME types the editor reads from a paste, in preference order.
pub const ALLOWED_TYPES: &[&str] = &["text/html", "text/plain"];

pub const TEXT_PLAIN: &str = "text/plain";

/// `(mime, data)` entries carried by a clipboard event.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClipboardData {
    entries: Vec<(String, String)>,
}

impl ClipboardData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_data(mut self, mime: &str, data: impl Into<String>) -> Self {
        self.set_data(mime, data);
        self
    }

    pub fn set_data(&mut self, mime: &str, data: impl Into<String>) {
        let mime = mime.trim().to_ascii_lowercase();
        let data = data.into();
        match self.entries.iter_mut().find(|(m, _)| *m == mime) {
            Some((_, existing)) => *existing = data,
            None => self.entries.push((mime, data)),
        }
    }

    pub fn get_data(&self, mime: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(m, _)| m.eq_ignore_ascii_case(mime))
            .map(|(_, d)| d.as_str())
    }

    pub fn types(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(m, _)| m.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries whose type the editor accepts, in [`ALLOWED_TYPES`] order.
    pub fn accepted(&self) -> Vec<(&'static str, &str)> {
        ALLOWED_TYPES
            .iter()
            .filter_map(|&mime| self.get_data(mime).map(|data| (mime, data)))
            .collect()
    }
}

/// Inserts the plain-text payload at the selection. Other accepted types
/// are read but not interpreted.
pub fn paste(editor: &mut TextEditor, clipboard: &ClipboardData) -> Result<bool, EditorError> {
    let mut plain = None;
    for (mime, data) in clipboard.accepted() {
        debug!(target: "editor.input", "paste {mime}: {} bytes", data.len());
        if mime == TEXT_PLAIN {
            plain = Some(data);
        }
    }
    match plain {
        Some(text) => editor.insert_text(text),
        None => Ok(false),
    }
}

/// Selected text as `text/plain`; `None` when nothing is selected.
pub fn copy(editor: &TextEditor) -> Option<ClipboardData> {
    if editor.selection().is_collapsed() {
        return None;
    }
    let text = editor.selected_text();
    debug!(target: "editor.input", "copy {} bytes", text.len());
    Some(ClipboardData::new().with_data(TEXT_PLAIN, text))
}

/// Like [`copy`], then deletes the selection where it can be spliced.
pub fn cut(editor: &mut TextEditor) -> Result<Option<ClipboardData>, EditorError> {
    let Some(data) = copy(editor) else {
        return Ok(None);
    };
    editor.delete_selection()?;
    Ok(Some(data))
}
