//! ArenaDocument: in-memory document tree
//!
//! A small index-based tree with just enough DOM behaviour for the engine:
//! element and text nodes, namespaces, attributes, a focused form field and
//! a single-text-node selection. Nodes are never freed; detached nodes simply
//! lose their parent.

use std::collections::{BTreeMap, HashMap};

use super::{DocumentHost, ElementInfo, FocusedField};
use crate::error::LinkifyError;

pub const HTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

/// Handle to a node in an `ArenaDocument`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
enum NodeKind {
    Element {
        tag: String,
        namespace: Option<String>,
        attrs: BTreeMap<String, String>,
    },
    Text(String),
}

#[derive(Debug, Clone)]
struct NodeData {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Current selection state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArenaSelection {
    /// Byte range inside one text node
    Text { node: NodeId, start: usize, end: usize },
    /// Caret placed right after a node
    CollapsedAfter(NodeId),
}

/// Live range handed out by `selection_range`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArenaRange {
    node: NodeId,
    start: usize,
    end: usize,
}

#[derive(Debug, Clone, Default)]
struct FieldState {
    value: String,
    selection_start: Option<u32>,
    selection_end: Option<u32>,
}

/// In-memory document
#[derive(Debug, Clone)]
pub struct ArenaDocument {
    nodes: Vec<NodeData>,
    document_element: Option<NodeId>,
    body: Option<NodeId>,
    focused: Option<NodeId>,
    fields: HashMap<NodeId, FieldState>,
    selection: Option<ArenaSelection>,
    input_events: usize,
}

impl Default for ArenaDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl ArenaDocument {
    /// Document with `<html><body></body></html>`
    pub fn new() -> Self {
        let mut doc = Self::empty();
        let html = doc.alloc_element("html", Some(HTML_NAMESPACE));
        let body = doc.alloc_element("body", Some(HTML_NAMESPACE));
        doc.attach(html, body);
        doc.document_element = Some(html);
        doc.body = Some(body);
        doc
    }

    /// Document with no root element at all
    pub fn empty() -> Self {
        Self {
            nodes: Vec::new(),
            document_element: None,
            body: None,
            focused: None,
            fields: HashMap::new(),
            selection: None,
            input_events: 0,
        }
    }

    pub fn body(&self) -> Option<NodeId> {
        self.body
    }

    pub fn document_element(&self) -> Option<NodeId> {
        self.document_element
    }

    // ==================== BUILDING ====================

    pub fn append_element(&mut self, parent: NodeId, tag: &str) -> NodeId {
        self.append_element_ns(parent, tag, Some(HTML_NAMESPACE))
    }

    pub fn append_element_ns(&mut self, parent: NodeId, tag: &str, namespace: Option<&str>) -> NodeId {
        let id = self.alloc_element(tag, namespace);
        self.attach(parent, id);
        id
    }

    pub fn append_text(&mut self, parent: NodeId, text: &str) -> NodeId {
        let id = self.alloc(NodeKind::Text(text.to_string()));
        self.attach(parent, id);
        id
    }

    /// Append an `<input>` or `<textarea>` holding `value`
    pub fn append_field(&mut self, parent: NodeId, tag: &str, input_type: Option<&str>, value: &str) -> NodeId {
        let id = self.append_element(parent, tag);
        if let Some(t) = input_type {
            self.set_attribute(id, "type", t);
        }
        self.fields.insert(
            id,
            FieldState {
                value: value.to_string(),
                ..FieldState::default()
            },
        );
        id
    }

    pub fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        if let NodeKind::Element { attrs, .. } = &mut self.nodes[node.0].kind {
            attrs.insert(name.to_string(), value.to_string());
        }
    }

    /// Focus a node; pass a field to make it the replacement target
    pub fn focus(&mut self, node: NodeId) {
        self.focused = Some(node);
    }

    /// Set the UTF-16 selection offsets of a field
    pub fn set_field_selection(&mut self, field: NodeId, start: u32, end: u32) {
        if let Some(state) = self.fields.get_mut(&field) {
            state.selection_start = Some(start);
            state.selection_end = Some(end);
        }
    }

    /// Select `start..end` (byte offsets) of a text node
    pub fn select_text(&mut self, node: NodeId, start: usize, end: usize) -> Result<(), LinkifyError> {
        let text = match &self.nodes[node.0].kind {
            NodeKind::Text(t) => t,
            NodeKind::Element { .. } => return Err(LinkifyError::Dom("selection must start in a text node".into())),
        };
        if start > end || end > text.len() || !text.is_char_boundary(start) || !text.is_char_boundary(end) {
            return Err(LinkifyError::Dom(format!("invalid selection {}..{}", start, end)));
        }
        self.selection = Some(ArenaSelection::Text { node, start, end });
        Ok(())
    }

    /// Select the first occurrence of `needle` in a text node
    pub fn select_matching(&mut self, node: NodeId, needle: &str) -> Result<(), LinkifyError> {
        let start = self
            .node_text(&node)
            .and_then(|t| t.find(needle))
            .ok_or_else(|| LinkifyError::Dom(format!("'{}' not found", needle)))?;
        self.select_text(node, start, start + needle.len())
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    // ==================== INSPECTION ====================

    pub fn selection(&self) -> Option<ArenaSelection> {
        self.selection
    }

    /// Number of `input` events fired by field commits
    pub fn input_events(&self) -> usize {
        self.input_events
    }

    pub fn field_value(&self, field: NodeId) -> Option<&str> {
        self.fields.get(&field).map(|s| s.value.as_str())
    }

    pub fn field_selection(&self, field: NodeId) -> Option<(u32, u32)> {
        self.fields
            .get(&field)
            .and_then(|s| Some((s.selection_start?, s.selection_end?)))
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        &self.nodes[node.0].children
    }

    pub fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        match &self.nodes[node.0].kind {
            NodeKind::Element { attrs, .. } => attrs.get(name).map(String::as_str),
            NodeKind::Text(_) => None,
        }
    }

    pub fn is_attached(&self, node: NodeId) -> bool {
        let mut current = node;
        loop {
            if Some(current) == self.document_element {
                return true;
            }
            match self.nodes[current.0].parent {
                Some(p) => current = p,
                None => return false,
            }
        }
    }

    /// Concatenated text of a subtree
    pub fn text_content(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(node, &mut out);
        out
    }

    /// Serialize a subtree. Text and attribute values are escaped.
    pub fn to_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.write_html(node, &mut out);
        out
    }

    // ==================== INTERNALS ====================

    fn alloc(&mut self, kind: NodeKind) -> NodeId {
        self.nodes.push(NodeData {
            kind,
            parent: None,
            children: Vec::new(),
        });
        NodeId(self.nodes.len() - 1)
    }

    fn alloc_element(&mut self, tag: &str, namespace: Option<&str>) -> NodeId {
        self.alloc(NodeKind::Element {
            tag: tag.to_string(),
            namespace: namespace.map(str::to_string),
            attrs: BTreeMap::new(),
        })
    }

    fn attach(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    fn detach(&mut self, node: NodeId) {
        if let Some(parent) = self.nodes[node.0].parent.take() {
            self.nodes[parent.0].children.retain(|c| *c != node);
        }
    }

    fn collect_text(&self, node: NodeId, out: &mut String) {
        match &self.nodes[node.0].kind {
            NodeKind::Text(t) => out.push_str(t),
            NodeKind::Element { .. } => {
                for child in &self.nodes[node.0].children {
                    self.collect_text(*child, out);
                }
            }
        }
    }

    fn write_html(&self, node: NodeId, out: &mut String) {
        match &self.nodes[node.0].kind {
            NodeKind::Text(t) => escape_into(t, false, out),
            NodeKind::Element { tag, attrs, .. } => {
                let tag = tag.to_ascii_lowercase();
                out.push('<');
                out.push_str(&tag);
                for (name, value) in attrs {
                    out.push(' ');
                    out.push_str(name);
                    out.push_str("=\"");
                    escape_into(value, true, out);
                    out.push('"');
                }
                out.push('>');
                for child in &self.nodes[node.0].children {
                    self.write_html(*child, out);
                }
                out.push_str("</");
                out.push_str(&tag);
                out.push('>');
            }
        }
    }

    fn text_mut(&mut self, node: NodeId) -> Result<&mut String, LinkifyError> {
        match &mut self.nodes[node.0].kind {
            NodeKind::Text(t) => Ok(t),
            NodeKind::Element { .. } => Err(LinkifyError::Dom("expected a text node".into())),
        }
    }

    fn preorder_text(&self, node: NodeId, out: &mut Vec<NodeId>) {
        match &self.nodes[node.0].kind {
            NodeKind::Text(_) => out.push(node),
            NodeKind::Element { .. } => {
                for child in &self.nodes[node.0].children {
                    self.preorder_text(*child, out);
                }
            }
        }
    }
}

fn escape_into(s: &str, attribute: bool, out: &mut String) {
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
}

impl DocumentHost for ArenaDocument {
    type Node = NodeId;
    type Range = ArenaRange;

    fn scan_root(&self) -> Option<NodeId> {
        self.body.or(self.document_element)
    }

    fn text_nodes(&self, root: &NodeId) -> Result<Vec<NodeId>, LinkifyError> {
        let mut out = Vec::new();
        self.preorder_text(*root, &mut out);
        Ok(out)
    }

    fn node_text(&self, node: &NodeId) -> Option<String> {
        match &self.nodes[node.0].kind {
            NodeKind::Text(t) => Some(t.clone()),
            NodeKind::Element { .. } => None,
        }
    }

    fn parent(&self, node: &NodeId) -> Option<NodeId> {
        self.nodes[node.0].parent
    }

    fn element_info(&self, node: &NodeId) -> Option<ElementInfo> {
        match &self.nodes[node.0].kind {
            NodeKind::Element { tag, namespace, .. } => Some(ElementInfo {
                tag: tag.to_ascii_uppercase(),
                namespace: namespace.clone(),
            }),
            NodeKind::Text(_) => None,
        }
    }

    fn create_text(&mut self, text: &str) -> Result<NodeId, LinkifyError> {
        Ok(self.alloc(NodeKind::Text(text.to_string())))
    }

    fn create_link(&mut self, href: &str, display: &str) -> Result<NodeId, LinkifyError> {
        let anchor = self.alloc_element("a", Some(HTML_NAMESPACE));
        self.set_attribute(anchor, "href", href);
        self.set_attribute(anchor, "target", "_blank");
        self.set_attribute(anchor, "rel", "noopener noreferrer");
        let text = self.alloc(NodeKind::Text(display.to_string()));
        self.attach(anchor, text);
        Ok(anchor)
    }

    fn replace_with(&mut self, old: &NodeId, replacement: Vec<NodeId>) -> Result<(), LinkifyError> {
        let parent = self.nodes[old.0]
            .parent
            .ok_or_else(|| LinkifyError::Dom("node has no parent".into()))?;
        for node in &replacement {
            self.detach(*node);
        }
        let idx = self.nodes[parent.0]
            .children
            .iter()
            .position(|c| c == old)
            .ok_or_else(|| LinkifyError::Dom("node missing from parent".into()))?;
        for node in &replacement {
            self.nodes[node.0].parent = Some(parent);
        }
        self.nodes[parent.0].children.splice(idx..=idx, replacement);
        self.nodes[old.0].parent = None;
        Ok(())
    }

    fn update_link(&mut self, anchor: &NodeId, href: &str, display: &str) -> Result<(), LinkifyError> {
        self.set_attribute(*anchor, "href", href);
        self.set_attribute(*anchor, "target", "_blank");
        self.set_attribute(*anchor, "rel", "noopener noreferrer");
        for child in std::mem::take(&mut self.nodes[anchor.0].children) {
            self.nodes[child.0].parent = None;
        }
        let text = self.alloc(NodeKind::Text(display.to_string()));
        self.attach(*anchor, text);
        Ok(())
    }

    fn focused_field(&self) -> Option<FocusedField> {
        let id = self.focused?;
        let info = self.element_info(&id)?;
        if !(info.is("INPUT") || info.is("TEXTAREA")) {
            return None;
        }
        let state = self.fields.get(&id).cloned().unwrap_or_default();
        Some(FocusedField {
            tag: info.tag,
            input_type: self.attribute(id, "type").map(str::to_string),
            value: state.value,
            selection_start: state.selection_start,
            selection_end: state.selection_end,
        })
    }

    fn commit_field(&mut self, value: &str, caret: u32) -> Result<(), LinkifyError> {
        let id = self
            .focused
            .ok_or_else(|| LinkifyError::Dom("no focused field".into()))?;
        let state = self
            .fields
            .get_mut(&id)
            .ok_or_else(|| LinkifyError::Dom("focused element is not a field".into()))?;
        state.value = value.to_string();
        state.selection_start = Some(caret);
        state.selection_end = Some(caret);
        self.input_events += 1;
        Ok(())
    }

    fn selection_range(&self) -> Option<ArenaRange> {
        match self.selection? {
            ArenaSelection::Text { node, start, end } if start != end => Some(ArenaRange { node, start, end }),
            _ => None,
        }
    }

    fn range_container(&self, range: &ArenaRange) -> Option<NodeId> {
        Some(range.node)
    }

    fn replace_range(&mut self, range: &ArenaRange, node: NodeId) -> Result<(), LinkifyError> {
        let parent = self.nodes[range.node.0]
            .parent
            .ok_or_else(|| LinkifyError::Dom("range is detached".into()))?;
        let text = self.text_mut(range.node)?;
        if range.end > text.len() || !text.is_char_boundary(range.start) || !text.is_char_boundary(range.end) {
            return Err(LinkifyError::Dom("range no longer fits its node".into()));
        }
        let after = text[range.end..].to_string();
        text.truncate(range.start);

        // Same shape the DOM produces: the original node keeps the text
        // before the range, the new node follows, then the remainder.
        let idx = self.nodes[parent.0]
            .children
            .iter()
            .position(|c| *c == range.node)
            .ok_or_else(|| LinkifyError::Dom("node missing from parent".into()))?;
        self.detach(node);
        let mut inserted = vec![node];
        if !after.is_empty() {
            inserted.push(self.alloc(NodeKind::Text(after)));
        }
        for n in &inserted {
            self.nodes[n.0].parent = Some(parent);
        }
        self.nodes[parent.0].children.splice(idx + 1..idx + 1, inserted);

        self.selection = Some(ArenaSelection::CollapsedAfter(node));
        Ok(())
    }
}
