//! # editor
//!
//! A content-editable text surface over [`dom::Document`].
//!
//! The host forwards native events ([`EditorEvent`]) to a [`TextEditor`],
//! which turns input types into [`InputCommand`]s, edits its content root in
//! place and reports edits through a debounced `change` notification. The
//! content can be read back as a model at any time, or laid out directly
//! with [`layout_from_editor`].

pub mod clipboard;
pub mod commands;
pub mod locate;

mod editor;
mod error;
mod events;
mod notifier;
mod selection;
mod text;

pub use clipboard::ClipboardData;
pub use commands::{CommandHandler, DefaultCommands, InputCommand, InputEvent, InputPhase};
pub use editor::{
    EditorEvent, EditorOptions, EventResponse, SetContentOptions, TextEditor, layout_from_editor,
};
pub use error::EditorError;
pub use events::{EventTarget, Listener, ListenerId, Notification};
pub use locate::{CaretHost, CaretPosition, caret_from_point};
pub use notifier::ChangeNotifier;
pub use selection::{Endpoint, Position, Selection, SelectionRange, compare_positions};
pub use text::{clamp_to_char_boundary, next_char_boundary, normalize_newlines, prev_char_boundary, splice};
