//! WebDocument: `DocumentHost` over the live browser DOM

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    Document, Element, Event, EventInit, HtmlInputElement, HtmlTextAreaElement, Node, Range, Selection, Window,
};

use super::{DocumentHost, ElementInfo, FocusedField};
use crate::error::LinkifyError;

/// NodeFilter.SHOW_TEXT
const SHOW_TEXT: u32 = 0x4;

fn dom_err(e: JsValue) -> LinkifyError {
    LinkifyError::Dom(e.as_string().unwrap_or_else(|| format!("{:?}", e)))
}

pub struct WebDocument {
    window: Window,
    document: Document,
}

impl WebDocument {
    /// Bind to the page this script runs in
    pub fn current() -> Result<Self, LinkifyError> {
        let window = web_sys::window().ok_or_else(|| LinkifyError::Dom("no window".into()))?;
        let document = window
            .document()
            .ok_or_else(|| LinkifyError::Dom("no document".into()))?;
        Ok(Self { window, document })
    }

    fn selection(&self) -> Option<Selection> {
        self.window.get_selection().ok().flatten()
    }

    fn focused_element(&self) -> Option<Element> {
        self.document.active_element()
    }
}

impl DocumentHost for WebDocument {
    type Node = Node;
    type Range = Range;

    fn scan_root(&self) -> Option<Node> {
        self.document
            .body()
            .map(Node::from)
            .or_else(|| self.document.document_element().map(Node::from))
    }

    fn text_nodes(&self, root: &Node) -> Result<Vec<Node>, LinkifyError> {
        let walker = self
            .document
            .create_tree_walker_with_what_to_show(root, SHOW_TEXT)
            .map_err(dom_err)?;
        let mut out = Vec::new();
        while let Some(node) = walker.next_node().map_err(dom_err)? {
            out.push(node);
        }
        Ok(out)
    }

    fn node_text(&self, node: &Node) -> Option<String> {
        node.node_value()
    }

    fn parent(&self, node: &Node) -> Option<Node> {
        node.parent_node()
    }

    fn element_info(&self, node: &Node) -> Option<ElementInfo> {
        if node.node_type() != Node::ELEMENT_NODE {
            return None;
        }
        let el = node.dyn_ref::<Element>()?;
        Some(ElementInfo {
            tag: el.tag_name().to_ascii_uppercase(),
            namespace: el.namespace_uri(),
        })
    }

    fn create_text(&mut self, text: &str) -> Result<Node, LinkifyError> {
        Ok(self.document.create_text_node(text).into())
    }

    fn create_link(&mut self, href: &str, display: &str) -> Result<Node, LinkifyError> {
        let anchor = self.document.create_element("a").map_err(dom_err)?;
        anchor.set_attribute("href", href).map_err(dom_err)?;
        anchor.set_attribute("target", "_blank").map_err(dom_err)?;
        anchor.set_attribute("rel", "noopener noreferrer").map_err(dom_err)?;
        anchor.set_text_content(Some(display));
        Ok(anchor.into())
    }

    fn replace_with(&mut self, old: &Node, replacement: Vec<Node>) -> Result<(), LinkifyError> {
        let parent = old
            .parent_node()
            .ok_or_else(|| LinkifyError::Dom("node has no parent".into()))?;
        let fragment = self.document.create_document_fragment();
        for node in &replacement {
            fragment.append_child(node).map_err(dom_err)?;
        }
        parent.replace_child(&fragment, old).map_err(dom_err)?;
        Ok(())
    }

    fn update_link(&mut self, anchor: &Node, href: &str, display: &str) -> Result<(), LinkifyError> {
        let el = anchor
            .dyn_ref::<Element>()
            .ok_or_else(|| LinkifyError::Dom("anchor is not an element".into()))?;
        el.set_attribute("href", href).map_err(dom_err)?;
        el.set_attribute("target", "_blank").map_err(dom_err)?;
        el.set_attribute("rel", "noopener noreferrer").map_err(dom_err)?;
        el.set_text_content(Some(display));
        Ok(())
    }

    fn focused_field(&self) -> Option<FocusedField> {
        let el = self.focused_element()?;
        let tag = el.tag_name().to_ascii_uppercase();
        let input_type = el.get_attribute("type");

        if let Some(input) = el.dyn_ref::<HtmlInputElement>() {
            // Non-text inputs throw on selectionStart; treat as no selection
            return Some(FocusedField {
                tag,
                input_type,
                value: input.value(),
                selection_start: input.selection_start().ok().flatten(),
                selection_end: input.selection_end().ok().flatten(),
            });
        }
        if let Some(area) = el.dyn_ref::<HtmlTextAreaElement>() {
            return Some(FocusedField {
                tag,
                input_type,
                value: area.value(),
                selection_start: area.selection_start().ok().flatten(),
                selection_end: area.selection_end().ok().flatten(),
            });
        }
        None
    }

    fn commit_field(&mut self, value: &str, caret: u32) -> Result<(), LinkifyError> {
        let el = self
            .focused_element()
            .ok_or_else(|| LinkifyError::Dom("no focused field".into()))?;

        if let Some(input) = el.dyn_ref::<HtmlInputElement>() {
            input.set_value(value);
            input.set_selection_range(caret, caret).map_err(dom_err)?;
        } else if let Some(area) = el.dyn_ref::<HtmlTextAreaElement>() {
            area.set_value(value);
            area.set_selection_range(caret, caret).map_err(dom_err)?;
        } else {
            return Err(LinkifyError::Dom("focused element is not a field".into()));
        }

        // Frameworks listening on the field only see programmatic edits via `input`
        let init = EventInit::new();
        init.set_bubbles(true);
        let event = Event::new_with_event_init_dict("input", &init).map_err(dom_err)?;
        el.dispatch_event(&event).map_err(dom_err)?;
        Ok(())
    }

    fn selection_range(&self) -> Option<Range> {
        let sel = self.selection()?;
        if sel.range_count() == 0 || String::from(sel.to_string()).is_empty() {
            return None;
        }
        sel.get_range_at(0).ok()
    }

    fn range_container(&self, range: &Range) -> Option<Node> {
        range.common_ancestor_container().ok()
    }

    fn replace_range(&mut self, range: &Range, node: Node) -> Result<(), LinkifyError> {
        range.delete_contents().map_err(dom_err)?;
        range.insert_node(&node).map_err(dom_err)?;
        range.set_start_after(&node).map_err(dom_err)?;
        range.set_end_after(&node).map_err(dom_err)?;
        if let Some(sel) = self.selection() {
            sel.remove_all_ranges().map_err(dom_err)?;
            sel.add_range(range).map_err(dom_err)?;
        }
        Ok(())
    }
}
