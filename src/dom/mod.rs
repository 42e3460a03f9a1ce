//! Document tree seam
//!
//! The linkify engine never talks to a DOM directly. It reads and mutates
//! through `DocumentHost`, implemented by:
//! - `arena.rs` - in-memory document (tests, native callers)
//! - `web.rs` - the live browser DOM via `web-sys` (wasm32 only)

pub mod arena;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use arena::{ArenaDocument, NodeId};

use crate::error::LinkifyError;

/// Namespace URI of SVG elements
pub const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";

/// Tag and namespace of an element node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementInfo {
    /// Upper-cased tag name
    pub tag: String,
    pub namespace: Option<String>,
}

impl ElementInfo {
    pub fn is(&self, tag: &str) -> bool {
        self.tag.eq_ignore_ascii_case(tag)
    }
}

/// Snapshot of the focused `<input>` or `<textarea>`.
///
/// Selection offsets are UTF-16 code units, as the DOM reports them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FocusedField {
    pub tag: String,
    /// Raw `type` attribute, `None` when absent
    pub input_type: Option<String>,
    pub value: String,
    pub selection_start: Option<u32>,
    pub selection_end: Option<u32>,
}

/// A mutable document the engine can scan and edit
pub trait DocumentHost {
    type Node: Clone;
    type Range;

    // ---- traversal ----

    /// Body, falling back to the document element
    fn scan_root(&self) -> Option<Self::Node>;
    /// Every text node under `root`, in document order
    fn text_nodes(&self, root: &Self::Node) -> Result<Vec<Self::Node>, LinkifyError>;
    fn node_text(&self, node: &Self::Node) -> Option<String>;
    fn parent(&self, node: &Self::Node) -> Option<Self::Node>;
    /// `None` for anything that is not an element
    fn element_info(&self, node: &Self::Node) -> Option<ElementInfo>;

    // ---- construction and mutation ----

    fn create_text(&mut self, text: &str) -> Result<Self::Node, LinkifyError>;
    /// Anchor opening in a new tab, `display` set as text content
    fn create_link(&mut self, href: &str, display: &str) -> Result<Self::Node, LinkifyError>;
    /// Swap `old` for `replacement` in a single operation
    fn replace_with(&mut self, old: &Self::Node, replacement: Vec<Self::Node>) -> Result<(), LinkifyError>;
    /// Retarget an existing anchor and replace its text
    fn update_link(&mut self, anchor: &Self::Node, href: &str, display: &str) -> Result<(), LinkifyError>;

    // ---- focus and selection ----

    /// The focused element when it is an `<input>` or `<textarea>`
    fn focused_field(&self) -> Option<FocusedField>;
    /// Write a new value to the focused field, place the caret and fire `input`
    fn commit_field(&mut self, value: &str, caret: u32) -> Result<(), LinkifyError>;
    /// First range of a non-empty selection
    fn selection_range(&self) -> Option<Self::Range>;
    fn range_container(&self, range: &Self::Range) -> Option<Self::Node>;
    /// Delete the range contents, insert `node` and collapse the selection after it
    fn replace_range(&mut self, range: &Self::Range, node: Self::Node) -> Result<(), LinkifyError>;
}

/// Byte index of a UTF-16 offset, clamped to the string length
pub fn utf16_to_byte(s: &str, offset: u32) -> usize {
    let mut units = 0u32;
    for (idx, c) in s.char_indices() {
        if units >= offset {
            return idx;
        }
        units += c.len_utf16() as u32;
    }
    s.len()
}
