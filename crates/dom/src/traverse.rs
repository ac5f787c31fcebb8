use crate::document::Document;
use crate::types::{NodeKey, NodeKind};

impl Document {
    /// Descendants of `key` in document (pre-)order, excluding `key` itself.
    pub fn descendants(&self, key: NodeKey) -> Vec<NodeKey> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeKey> = self.children(key).iter().rev().copied().collect();
        while let Some(current) = stack.pop() {
            out.push(current);
            stack.extend(self.children(current).iter().rev().copied());
        }
        out
    }

    /// `querySelectorAll` over an arbitrary predicate.
    pub fn query_all<F>(&self, key: NodeKey, mut predicate: F) -> Vec<NodeKey>
    where
        F: FnMut(&Document, NodeKey) -> bool,
    {
        self.descendants(key)
            .into_iter()
            .filter(|&k| predicate(self, k))
            .collect()
    }

    /// Descendant elements whose `data-{name}` attribute is present.
    pub fn query_data(&self, key: NodeKey, name: &str) -> Vec<NodeKey> {
        self.query_all(key, |doc, k| doc.data(k, name).is_some())
    }

    /// Descendant elements whose `data-{name}` attribute equals `value`.
    pub fn query_data_value(&self, key: NodeKey, name: &str, value: &str) -> Vec<NodeKey> {
        self.query_all(key, |doc, k| doc.data(k, name) == Some(value))
    }

    /// Concatenated text of every descendant text node (`textContent`).
    pub fn text_content(&self, key: NodeKey) -> String {
        if let Some(text) = self.text(key) {
            return text.to_string();
        }
        let mut out = String::new();
        for k in self.descendants(key) {
            if let Some(NodeKind::Text(text)) = self.kind(k) {
                out.push_str(text);
            }
        }
        out
    }

    /// Ancestors of `key`, nearest first, excluding `key`.
    pub fn ancestors(&self, key: NodeKey) -> Vec<NodeKey> {
        let mut out = Vec::new();
        let mut current = self.parent(key);
        while let Some(k) = current {
            out.push(k);
            current = self.parent(k);
        }
        out
    }

    /// Text nodes below `key` in document order.
    pub fn text_nodes(&self, key: NodeKey) -> Vec<NodeKey> {
        if self.is_text(key) {
            return vec![key];
        }
        self.query_all(key, |doc, k| doc.is_text(k))
    }
}
