//! Single-target replacement at the user's selection
//!
//! Triggered by the context menu. Decodes the selected text once and
//! replaces that one selection with text or a link.

use serde::{Deserialize, Serialize};

use super::filters::{find_ancestor, is_editable_field};
use crate::decode::{classify, decode, UrlClassification};
use crate::dom::{utf16_to_byte, DocumentHost};
use crate::error::LinkifyError;

/// What kind of value the selection decoded to
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    Url,
    Text,
}

/// Which replacement actually happened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Replacement {
    /// Decoded text spliced into a focused input or textarea
    FieldSplice,
    /// Selection replaced by a text node
    RangeText,
    /// Selection replaced by a new anchor
    LinkInserted,
    /// Selection sat in an anchor, which was retargeted
    LinkUpdated,
}

/// Successful decode of a selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionOutcome {
    pub kind: ValueKind,
    pub value: String,
    /// `None` when there was nowhere to put the value
    pub replacement: Option<Replacement>,
}

/// Splice `text` into the focused field, if it is an editable one with a
/// non-empty selection.
pub fn splice_field<H: DocumentHost>(host: &mut H, text: &str) -> Result<Option<Replacement>, LinkifyError> {
    let field = match host.focused_field() {
        Some(f) if is_editable_field(&f) => f,
        _ => return Ok(None),
    };
    let (a, b) = match (field.selection_start, field.selection_end) {
        (Some(a), Some(b)) if a != b => (a, b),
        _ => return Ok(None),
    };
    let (start, end) = (a.min(b), a.max(b));

    let value = &field.value;
    let mut spliced = String::with_capacity(value.len() + text.len());
    spliced.push_str(&value[..utf16_to_byte(value, start)]);
    spliced.push_str(text);
    spliced.push_str(&value[utf16_to_byte(value, end)..]);

    let caret = start + text.encode_utf16().count() as u32;
    host.commit_field(&spliced, caret)?;
    Ok(Some(Replacement::FieldSplice))
}

/// Replace the selection with plain text: the focused field first, the
/// document selection otherwise.
pub fn replace_with_text<H: DocumentHost>(host: &mut H, text: &str) -> Result<Option<Replacement>, LinkifyError> {
    // An editable field owns the selection even when it has nothing selected
    if host.focused_field().is_some_and(|f| is_editable_field(&f)) {
        return splice_field(host, text);
    }

    let Some(range) = host.selection_range() else {
        return Ok(None);
    };
    let node = host.create_text(text)?;
    host.replace_range(&range, node)?;
    Ok(Some(Replacement::RangeText))
}

/// Replace the document selection with a link, or retarget the anchor that
/// already wraps it. Fields cannot host markup, so they always yield `None`.
pub fn replace_with_link<H: DocumentHost>(
    host: &mut H,
    link: &UrlClassification,
) -> Result<Option<Replacement>, LinkifyError> {
    if host.focused_field().is_some_and(|f| is_editable_field(&f)) {
        return Ok(None);
    }

    let Some(range) = host.selection_range() else {
        return Ok(None);
    };

    let container = host.range_container(&range);
    if let Some(anchor) = find_ancestor(host, container, |info| info.is("A")) {
        host.update_link(&anchor, &link.href, &link.display)?;
        return Ok(Some(Replacement::LinkUpdated));
    }

    let anchor = host.create_link(&link.href, &link.display)?;
    host.replace_range(&range, anchor)?;
    Ok(Some(Replacement::LinkInserted))
}

/// Perform exactly one replacement for a decoded value.
///
/// URLs go into a focused field as text, become a link in the document, and
/// fall back to text when no link could be placed.
pub fn replace_selection<H: DocumentHost>(
    host: &mut H,
    decoded: &str,
    link: Option<&UrlClassification>,
) -> Result<Option<Replacement>, LinkifyError> {
    let Some(link) = link else {
        return replace_with_text(host, decoded);
    };

    if let Some(done) = splice_field(host, decoded)? {
        return Ok(Some(done));
    }
    if let Some(done) = replace_with_link(host, link)? {
        return Ok(Some(done));
    }
    replace_with_text(host, decoded)
}

/// Decode selected text and put the result in place of the selection
pub fn decode_selection<H: DocumentHost>(host: &mut H, text: &str) -> Result<SelectionOutcome, LinkifyError> {
    if text.trim().is_empty() {
        return Err(LinkifyError::NoSelection);
    }

    let decoded = decode(text)?;
    let link = classify(&decoded);
    let replacement = replace_selection(host, &decoded, link.as_ref())?;

    Ok(SelectionOutcome {
        kind: if link.is_some() { ValueKind::Url } else { ValueKind::Text },
        value: decoded,
        replacement,
    })
}
