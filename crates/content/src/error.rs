use crate::attrs::Level;
use dom::DomError;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentError {
    InvalidRoot(String),
    InvalidParagraphSet(String),
    InvalidParagraph { index: usize, reason: String },
    InvalidText { paragraph: usize, index: usize },
    InvalidChildren { level: Level, reason: String },
    InvalidArgument(String),
    /// The wire form could not be deserialized.
    Malformed(String),
    Dom(DomError),
}

impl fmt::Display for ContentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentError::InvalidRoot(reason) => write!(f, "invalid root: {reason}"),
            ContentError::InvalidParagraphSet(reason) => {
                write!(f, "invalid paragraph set: {reason}")
            }
            ContentError::InvalidParagraph { index, reason } => {
                write!(f, "invalid paragraph {index}: {reason}")
            }
            ContentError::InvalidText { paragraph, index } => {
                write!(f, "inline {index} of paragraph {paragraph} has no text")
            }
            ContentError::InvalidChildren { level, reason } => {
                write!(f, "invalid {level} children: {reason}")
            }
            ContentError::InvalidArgument(reason) => write!(f, "invalid argument: {reason}"),
            ContentError::Malformed(reason) => write!(f, "malformed content: {reason}"),
            ContentError::Dom(err) => write!(f, "dom: {err}"),
        }
    }
}

impl std::error::Error for ContentError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ContentError::Dom(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DomError> for ContentError {
    fn from(err: DomError) -> Self {
        ContentError::Dom(err)
    }
}

impl From<serde_json::Error> for ContentError {
    fn from(err: serde_json::Error) -> Self {
        ContentError::Malformed(err.to_string())
    }
}
