//! Input command dispatch.
//!
//! Every `inputType` a content-editable host can report maps to one
//! [`InputCommand`]. The editor hands recognised commands to its
//! [`CommandHandler`] on both the `beforeinput` and the `input` phase; names
//! it does not know become [`InputCommand::Unrecognized`] and are ignored.

use crate::editor::TextEditor;
use crate::error::EditorError;
use log::debug;
use std::fmt;

macro_rules! input_commands {
    ($($variant:ident => $name:literal,)*) => {
        #[derive(Clone, Debug, PartialEq, Eq, Hash)]
        pub enum InputCommand {
            $($variant,)*
            Unrecognized(String),
        }

        impl InputCommand {
            /// Every recognised command, in dispatch table order.
            pub const ALL: &'static [InputCommand] = &[$(InputCommand::$variant,)*];

            pub fn from_input_type(input_type: &str) -> InputCommand {
                match input_type {
                    $($name => InputCommand::$variant,)*
                    other => InputCommand::Unrecognized(other.to_string()),
                }
            }

            pub fn input_type(&self) -> &str {
                match self {
                    $(InputCommand::$variant => $name,)*
                    InputCommand::Unrecognized(name) => name,
                }
            }
        }
    };
}

input_commands! {
    InsertText => "insertText",
    InsertReplacementText => "insertReplacementText",
    InsertLineBreak => "insertLineBreak",
    InsertParagraph => "insertParagraph",
    InsertOrderedList => "insertOrderedList",
    InsertUnorderedList => "insertUnorderedList",
    InsertHorizontalRule => "insertHorizontalRule",
    InsertFromYank => "insertFromYank",
    InsertFromDrop => "insertFromDrop",
    InsertFromPaste => "insertFromPaste",
    InsertFromPasteAsQuotation => "insertFromPasteAsQuotation",
    InsertTranspose => "insertTranspose",
    InsertCompositionText => "insertCompositionText",
    InsertLink => "insertLink",
    DeleteWordBackward => "deleteWordBackward",
    DeleteWordForward => "deleteWordForward",
    DeleteSoftLineBackward => "deleteSoftLineBackward",
    DeleteSoftLineForward => "deleteSoftLineForward",
    DeleteEntireSoftLine => "deleteEntireSoftLine",
    DeleteHardLineBackward => "deleteHardLineBackward",
    DeleteHardLineForward => "deleteHardLineForward",
    DeleteByDrag => "deleteByDrag",
    DeleteByCut => "deleteByCut",
    DeleteContent => "deleteContent",
    DeleteContentBackward => "deleteContentBackward",
    DeleteContentForward => "deleteContentForward",
    HistoryUndo => "historyUndo",
    HistoryRedo => "historyRedo",
    FormatBold => "formatBold",
    FormatItalic => "formatItalic",
    FormatUnderline => "formatUnderline",
    FormatStrikeThrough => "formatStrikeThrough",
    FormatSuperscript => "formatSuperscript",
    FormatSubscript => "formatSubscript",
    FormatJustifyFull => "formatJustifyFull",
    FormatJustifyCenter => "formatJustifyCenter",
    FormatJustifyRight => "formatJustifyRight",
    FormatJustifyLeft => "formatJustifyLeft",
    FormatIndent => "formatIndent",
    FormatOutdent => "formatOutdent",
    FormatRemove => "formatRemove",
    FormatSetBlockTextDirection => "formatSetBlockTextDirection",
    FormatSetInlineTextDirection => "formatSetInlineTextDirection",
    FormatBackColor => "formatBackColor",
    FormatFontColor => "formatFontColor",
    FormatFontName => "formatFontName",
}

impl InputCommand {
    pub fn is_recognized(&self) -> bool {
        !matches!(self, InputCommand::Unrecognized(_))
    }
}

impl From<&str> for InputCommand {
    fn from(input_type: &str) -> Self {
        InputCommand::from_input_type(input_type)
    }
}

impl fmt::Display for InputCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.input_type())
    }
}

/// Which of the two input events is being dispatched.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputPhase {
    /// `beforeinput`: the edit has not happened yet.
    Before,
    /// `input`: the edit is done.
    After,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InputEvent {
    pub command: InputCommand,
    pub data: Option<String>,
}

impl InputEvent {
    pub fn new(input_type: &str) -> Self {
        Self {
            command: InputCommand::from_input_type(input_type),
            data: None,
        }
    }

    pub fn with_data(input_type: &str, data: impl Into<String>) -> Self {
        Self {
            command: InputCommand::from_input_type(input_type),
            data: Some(data.into()),
        }
    }
}

/// Runs input commands against an editor.
pub trait CommandHandler {
    /// Returns `true` when the command consumed the event.
    fn handle(&self, editor: &mut TextEditor, phase: InputPhase, event: &InputEvent) -> Result<bool, EditorError>;
}

/// Built-in command set. Edits that would merge or split across inline
/// boundaries are left alone.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultCommands;

impl CommandHandler for DefaultCommands {
    fn handle(&self, editor: &mut TextEditor, phase: InputPhase, event: &InputEvent) -> Result<bool, EditorError> {
        use InputCommand::*;

        // Paragraph splits run once the input is committed; everything else
        // acts up front.
        match (&event.command, phase) {
            (InsertParagraph, InputPhase::After) => editor.insert_paragraph(),
            (_, InputPhase::After) => Ok(false),
            (InsertText | InsertReplacementText | InsertFromPaste, InputPhase::Before) => {
                editor.insert_text(event.data.as_deref().unwrap_or(""))
            }
            (InsertLineBreak, InputPhase::Before) => editor.insert_line_break(),
            (DeleteContentBackward, InputPhase::Before) => editor.delete_backward(),
            (DeleteContentForward, InputPhase::Before) => editor.delete_forward(),
            (DeleteContent | DeleteByCut, InputPhase::Before) => editor.delete_selection(),
            (FormatJustifyLeft, InputPhase::Before) => editor.set_paragraph_style("text-align", "left"),
            (FormatJustifyRight, InputPhase::Before) => editor.set_paragraph_style("text-align", "right"),
            (FormatJustifyCenter, InputPhase::Before) => editor.set_paragraph_style("text-align", "center"),
            (FormatJustifyFull, InputPhase::Before) => editor.set_paragraph_style("text-align", "justify"),
            (FormatBold, InputPhase::Before) => editor.toggle_inline_style("font-weight", "700", "400"),
            (FormatItalic, InputPhase::Before) => editor.toggle_inline_style("font-style", "italic", "normal"),
            (FormatUnderline, InputPhase::Before) => {
                editor.toggle_inline_style("text-decoration", "underline", "none")
            }
            (FormatStrikeThrough, InputPhase::Before) => {
                editor.toggle_inline_style("text-decoration", "line-through", "none")
            }
            (command, InputPhase::Before) => {
                debug!(target: "editor.input", "{command}: no built-in behaviour");
                Ok(false)
            }
        }
    }
}
