use content::ContentError;
use dom::DomError;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorError {
    /// A constructor or call received an argument it cannot work with.
    InvalidArgument(String),
    Content(ContentError),
    Dom(DomError),
}

impl fmt::Display for EditorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditorError::InvalidArgument(reason) => write!(f, "invalid argument: {reason}"),
            EditorError::Content(err) => write!(f, "content: {err}"),
            EditorError::Dom(err) => write!(f, "dom: {err}"),
        }
    }
}

impl std::error::Error for EditorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EditorError::Content(err) => Some(err),
            EditorError::Dom(err) => Some(err),
            EditorError::InvalidArgument(_) => None,
        }
    }
}

impl From<ContentError> for EditorError {
    fn from(err: ContentError) -> Self {
        EditorError::Content(err)
    }
}

impl From<DomError> for EditorError {
    fn from(err: DomError) -> Self {
        EditorError::Dom(err)
    }
}
