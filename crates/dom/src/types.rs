use std::fmt;
use std::sync::Arc;

/// Stable identity of a node within one [`Document`](crate::Document).
///
/// Keys are never reused by the document that allocated them, so a stale key
/// simply stops resolving once its node is removed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeKey(pub u32);

impl NodeKey {
    /// Reserved sentinel for "unassigned/invalid" identity.
    pub const INVALID: NodeKey = NodeKey(0);
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ElementData {
    pub name: Arc<str>,
    pub attributes: Vec<(Arc<str>, Option<String>)>,
    /// Inline style declarations in insertion order, property names lowercase.
    pub style: Vec<(String, String)>,
    /// Side channel for values that have no native CSS representation.
    /// Values are serialized JSON.
    pub encoded: Vec<(String, String)>,
}

impl ElementData {
    pub fn new(name: &str) -> Self {
        Self {
            name: Arc::from(name.to_ascii_lowercase()),
            attributes: Vec::new(),
            style: Vec::new(),
            encoded: Vec::new(),
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_deref().unwrap_or(""))
    }

    pub fn style_property(&self, name: &str) -> Option<&str> {
        self.style
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn encoded_property(&self, name: &str) -> Option<&str> {
        self.encoded
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NodeKind {
    Element(ElementData),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomError {
    UnknownKey(NodeKey),
    WrongNodeKind(NodeKey),
    InvalidParent(NodeKey),
    InvalidSibling { parent: NodeKey, before: NodeKey },
    CycleDetected { parent: NodeKey, child: NodeKey },
}

impl fmt::Display for DomError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomError::UnknownKey(key) => write!(f, "unknown node {key}"),
            DomError::WrongNodeKind(key) => write!(f, "node {key} has the wrong kind"),
            DomError::InvalidParent(key) => write!(f, "node {key} cannot have children"),
            DomError::InvalidSibling { parent, before } => {
                write!(f, "node {before} is not a child of {parent}")
            }
            DomError::CycleDetected { parent, child } => {
                write!(f, "appending {child} to {parent} would create a cycle")
            }
        }
    }
}

impl std::error::Error for DomError {}
