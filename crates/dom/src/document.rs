use crate::types::{DomError, ElementData, NodeKey, NodeKind};
use std::collections::HashMap;

struct NodeRecord {
    kind: NodeKind,
    parent: Option<NodeKey>,
    children: Vec<NodeKey>,
}

impl NodeRecord {
    fn allows_children(&self) -> bool {
        match &self.kind {
            NodeKind::Element(el) => !is_void(&el.name),
            NodeKind::Text(_) => false,
        }
    }
}

fn is_void(name: &str) -> bool {
    name == "br"
}

/// A live DOM tree.
///
/// Nodes live in an arena and refer to each other by [`NodeKey`]. Every node
/// knows its parent, so upward walks (selection ancestry) are as cheap as
/// downward ones. Nodes created with `create_*` start detached; a removed
/// subtree is dropped, its keys stop resolving and its slots are reused.
pub struct Document {
    nodes: Vec<NodeRecord>,
    live: HashMap<NodeKey, usize>,
    free: Vec<usize>,
    next_key: u32,
}

impl Document {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            live: HashMap::new(),
            free: Vec::new(),
            next_key: 1,
        }
    }

    fn insert_node(&mut self, kind: NodeKind) -> NodeKey {
        let key = NodeKey(self.next_key);
        self.next_key = self.next_key.wrapping_add(1).max(1);
        let record = NodeRecord {
            kind,
            parent: None,
            children: Vec::new(),
        };
        let index = match self.free.pop() {
            Some(index) => {
                self.nodes[index] = record;
                index
            }
            None => {
                self.nodes.push(record);
                self.nodes.len() - 1
            }
        };
        self.live.insert(key, index);
        key
    }

    /// Number of arena slots, live or free.
    pub fn slot_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn create_element(&mut self, name: &str) -> NodeKey {
        self.insert_node(NodeKind::Element(ElementData::new(name)))
    }

    pub fn create_text(&mut self, text: &str) -> NodeKey {
        self.insert_node(NodeKind::Text(text.to_string()))
    }

    fn index(&self, key: NodeKey) -> Result<usize, DomError> {
        self.live.get(&key).copied().ok_or(DomError::UnknownKey(key))
    }

    fn record(&self, key: NodeKey) -> Option<&NodeRecord> {
        self.live.get(&key).map(|&i| &self.nodes[i])
    }

    pub fn is_live(&self, key: NodeKey) -> bool {
        self.live.contains_key(&key)
    }

    pub fn kind(&self, key: NodeKey) -> Option<&NodeKind> {
        self.record(key).map(|r| &r.kind)
    }

    pub fn element(&self, key: NodeKey) -> Option<&ElementData> {
        match self.kind(key) {
            Some(NodeKind::Element(el)) => Some(el),
            _ => None,
        }
    }

    pub fn element_mut(&mut self, key: NodeKey) -> Result<&mut ElementData, DomError> {
        let index = self.index(key)?;
        match &mut self.nodes[index].kind {
            NodeKind::Element(el) => Ok(el),
            NodeKind::Text(_) => Err(DomError::WrongNodeKind(key)),
        }
    }

    pub fn is_element(&self, key: NodeKey) -> bool {
        self.element(key).is_some()
    }

    pub fn is_text(&self, key: NodeKey) -> bool {
        matches!(self.kind(key), Some(NodeKind::Text(_)))
    }

    pub fn tag_name(&self, key: NodeKey) -> Option<&str> {
        self.element(key).map(|el| &*el.name)
    }

    pub fn is_line_break(&self, key: NodeKey) -> bool {
        self.tag_name(key) == Some("br")
    }

    pub fn parent(&self, key: NodeKey) -> Option<NodeKey> {
        self.record(key).and_then(|r| r.parent)
    }

    pub fn children(&self, key: NodeKey) -> &[NodeKey] {
        self.record(key).map(|r| r.children.as_slice()).unwrap_or(&[])
    }

    pub fn first_child(&self, key: NodeKey) -> Option<NodeKey> {
        self.children(key).first().copied()
    }

    pub fn last_child(&self, key: NodeKey) -> Option<NodeKey> {
        self.children(key).last().copied()
    }

    pub fn child_index(&self, key: NodeKey) -> Option<usize> {
        let parent = self.parent(key)?;
        self.children(parent).iter().position(|k| *k == key)
    }

    pub fn next_sibling(&self, key: NodeKey) -> Option<NodeKey> {
        let parent = self.parent(key)?;
        let index = self.child_index(key)?;
        self.children(parent).get(index + 1).copied()
    }

    pub fn previous_sibling(&self, key: NodeKey) -> Option<NodeKey> {
        let parent = self.parent(key)?;
        let index = self.child_index(key)?;
        index
            .checked_sub(1)
            .and_then(|i| self.children(parent).get(i).copied())
    }

    /// Appends `child` as the last child of `parent`, moving it out of its
    /// current parent first.
    pub fn append_child(&mut self, parent: NodeKey, child: NodeKey) -> Result<(), DomError> {
        self.check_insertion(parent, child)?;
        self.detach(child)?;
        let parent_index = self.index(parent)?;
        let child_index = self.index(child)?;
        self.nodes[parent_index].children.push(child);
        self.nodes[child_index].parent = Some(parent);
        Ok(())
    }

    pub fn append_children(&mut self, parent: NodeKey, children: &[NodeKey]) -> Result<(), DomError> {
        for &child in children {
            self.append_child(parent, child)?;
        }
        Ok(())
    }

    /// Inserts `child` before `before`; `None` appends.
    pub fn insert_before(
        &mut self,
        parent: NodeKey,
        child: NodeKey,
        before: Option<NodeKey>,
    ) -> Result<(), DomError> {
        let Some(before) = before else {
            return self.append_child(parent, child);
        };
        if before == child {
            return Ok(());
        }
        self.check_insertion(parent, child)?;
        if self.parent(before) != Some(parent) {
            return Err(DomError::InvalidSibling { parent, before });
        }
        self.detach(child)?;
        let parent_index = self.index(parent)?;
        let child_index = self.index(child)?;
        let siblings = &mut self.nodes[parent_index].children;
        let pos = siblings
            .iter()
            .position(|k| *k == before)
            .ok_or(DomError::InvalidSibling { parent, before })?;
        siblings.insert(pos, child);
        self.nodes[child_index].parent = Some(parent);
        Ok(())
    }

    fn check_insertion(&self, parent: NodeKey, child: NodeKey) -> Result<(), DomError> {
        let parent_index = self.index(parent)?;
        self.index(child)?;
        if parent == child || self.contains(child, parent) {
            return Err(DomError::CycleDetected { parent, child });
        }
        if !self.nodes[parent_index].allows_children() {
            return Err(DomError::InvalidParent(parent));
        }
        Ok(())
    }

    /// Unlinks `key` from its parent; the node stays live.
    pub fn detach(&mut self, key: NodeKey) -> Result<(), DomError> {
        let index = self.index(key)?;
        if let Some(parent) = self.nodes[index].parent.take() {
            if let Some(parent_index) = self.live.get(&parent).copied() {
                self.nodes[parent_index].children.retain(|k| *k != key);
            }
        }
        Ok(())
    }

    /// Unlinks `key` and drops its whole subtree.
    pub fn remove(&mut self, key: NodeKey) -> Result<(), DomError> {
        self.detach(key)?;
        self.drop_subtree(key);
        Ok(())
    }

    fn drop_subtree(&mut self, key: NodeKey) {
        let Some(index) = self.live.remove(&key) else {
            return;
        };
        let record = &mut self.nodes[index];
        let children = std::mem::take(&mut record.children);
        record.kind = NodeKind::Text(String::new());
        record.parent = None;
        self.free.push(index);
        for child in children {
            self.drop_subtree(child);
        }
    }

    /// Drops every current child of `parent` and appends `children` in order.
    pub fn replace_children(&mut self, parent: NodeKey, children: &[NodeKey]) -> Result<(), DomError> {
        let parent_index = self.index(parent)?;
        if !self.nodes[parent_index].allows_children() {
            return Err(DomError::InvalidParent(parent));
        }
        let old = self.nodes[parent_index].children.clone();
        for child in old {
            if children.contains(&child) {
                self.detach(child)?;
            } else {
                self.remove(child)?;
            }
        }
        self.append_children(parent, children)
    }

    /// Inclusive ancestry test: a node contains itself.
    pub fn contains(&self, ancestor: NodeKey, node: NodeKey) -> bool {
        let mut current = Some(node);
        while let Some(key) = current {
            if key == ancestor {
                return true;
            }
            current = self.parent(key);
        }
        false
    }

    pub fn text(&self, key: NodeKey) -> Option<&str> {
        match self.kind(key) {
            Some(NodeKind::Text(text)) => Some(text),
            _ => None,
        }
    }

    pub fn set_text(&mut self, key: NodeKey, text: &str) -> Result<(), DomError> {
        let index = self.index(key)?;
        match &mut self.nodes[index].kind {
            NodeKind::Text(existing) => {
                existing.clear();
                existing.push_str(text);
                Ok(())
            }
            NodeKind::Element(_) => Err(DomError::WrongNodeKind(key)),
        }
    }

    pub fn attribute(&self, key: NodeKey, name: &str) -> Option<&str> {
        self.element(key).and_then(|el| el.attribute(name))
    }

    pub fn has_attribute(&self, key: NodeKey, name: &str) -> bool {
        self.attribute(key, name).is_some()
    }

    pub fn set_attribute(&mut self, key: NodeKey, name: &str, value: &str) -> Result<(), DomError> {
        let el = self.element_mut(key)?;
        let name = name.to_ascii_lowercase();
        match el.attributes.iter_mut().find(|(k, _)| **k == *name) {
            Some((_, v)) => *v = Some(value.to_string()),
            None => el.attributes.push((name.into(), Some(value.to_string()))),
        }
        Ok(())
    }

    pub fn remove_attribute(&mut self, key: NodeKey, name: &str) -> Result<(), DomError> {
        let el = self.element_mut(key)?;
        el.attributes.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
        Ok(())
    }

    /// Reads `data-{name}`.
    pub fn data(&self, key: NodeKey, name: &str) -> Option<&str> {
        self.attribute(key, &format!("data-{name}"))
    }

    /// Writes `data-{name}`.
    pub fn set_data(&mut self, key: NodeKey, name: &str, value: &str) -> Result<(), DomError> {
        self.set_attribute(key, &format!("data-{name}"), value)
    }

    pub fn style_property(&self, key: NodeKey, name: &str) -> Option<&str> {
        self.element(key).and_then(|el| el.style_property(name))
    }

    pub fn style_declarations(&self, key: NodeKey) -> &[(String, String)] {
        self.element(key).map(|el| el.style.as_slice()).unwrap_or(&[])
    }

    /// Sets one inline style declaration; an empty value removes it.
    pub fn set_style_property(&mut self, key: NodeKey, name: &str, value: &str) -> Result<(), DomError> {
        let el = self.element_mut(key)?;
        let name = name.trim().to_ascii_lowercase();
        let value = value.trim();
        if value.is_empty() {
            el.style.retain(|(k, _)| *k != name);
            return Ok(());
        }
        match el.style.iter_mut().find(|(k, _)| *k == name) {
            Some((_, v)) => *v = value.to_string(),
            None => el.style.push((name, value.to_string())),
        }
        Ok(())
    }

    pub fn remove_style_property(&mut self, key: NodeKey, name: &str) -> Result<(), DomError> {
        self.set_style_property(key, name, "")
    }

    pub fn encoded_property(&self, key: NodeKey, name: &str) -> Option<&str> {
        self.element(key).and_then(|el| el.encoded_property(name))
    }

    pub fn encoded_properties(&self, key: NodeKey) -> &[(String, String)] {
        self.element(key).map(|el| el.encoded.as_slice()).unwrap_or(&[])
    }

    pub fn set_encoded_property(&mut self, key: NodeKey, name: &str, value: &str) -> Result<(), DomError> {
        let el = self.element_mut(key)?;
        match el.encoded.iter_mut().find(|(k, _)| k == name) {
            Some((_, v)) => *v = value.to_string(),
            None => el.encoded.push((name.to_string(), value.to_string())),
        }
        Ok(())
    }

    /// Deep clone of `key` into this document; the clone starts detached.
    pub fn clone_subtree(&mut self, key: NodeKey) -> Result<NodeKey, DomError> {
        let index = self.index(key)?;
        let kind = self.nodes[index].kind.clone();
        let children = self.nodes[index].children.clone();
        let copy = self.insert_node(kind);
        for child in children {
            let child_copy = self.clone_subtree(child)?;
            self.append_child(copy, child_copy)?;
        }
        Ok(copy)
    }

    /// Deep clone of a node owned by another document; the copy starts detached.
    pub fn import_subtree(&mut self, source: &Document, key: NodeKey) -> Result<NodeKey, DomError> {
        let kind = source.kind(key).ok_or(DomError::UnknownKey(key))?.clone();
        let copy = self.insert_node(kind);
        for &child in source.children(key) {
            let child_copy = self.import_subtree(source, child)?;
            self.append_child(copy, child_copy)?;
        }
        Ok(copy)
    }

    /// Merges adjacent text nodes below `key` and drops empty ones.
    pub fn normalize(&mut self, key: NodeKey) -> Result<(), DomError> {
        let children = self.children(key).to_vec();
        let mut previous_text: Option<NodeKey> = None;
        for child in children {
            if let Some(text) = self.text(child).map(str::to_string) {
                if text.is_empty() {
                    self.remove(child)?;
                    continue;
                }
                if let Some(prev) = previous_text {
                    let merged = format!("{}{}", self.text(prev).unwrap_or(""), text);
                    self.set_text(prev, &merged)?;
                    self.remove(child)?;
                    continue;
                }
                previous_text = Some(child);
            } else {
                previous_text = None;
                self.normalize(child)?;
            }
        }
        Ok(())
    }

    pub fn node_count(&self) -> usize {
        self.live.len()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}
