//! Token boundary and containment filters
//!
//! Shared by the selection replacer and the bulk scanner: which characters
//! extend a token, which containers must never be mutated, and which
//! focused fields accept a plain-text splice.

use crate::dom::{DocumentHost, ElementInfo, FocusedField};

/// Elements whose text is never rewritten
pub const FORBIDDEN_TAGS: [&str; 5] = ["SCRIPT", "STYLE", "TEXTAREA", "NOSCRIPT", "INPUT"];

/// `<input type=...>` values that do not hold free text
pub const NON_TEXT_INPUT_TYPES: [&str; 17] = [
    "button",
    "checkbox",
    "color",
    "date",
    "datetime-local",
    "file",
    "hidden",
    "image",
    "month",
    "number",
    "password",
    "radio",
    "range",
    "reset",
    "submit",
    "time",
    "week",
];

/// Characters that continue a Base64 run (both alphabets, no padding)
pub fn is_base64_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '+' | '/' | '_' | '-')
}

/// True when neither neighbour of `text[start..end]` extends the token
pub fn has_clean_boundaries(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start].chars().next_back();
    let after = text[end..].chars().next();
    !before.is_some_and(is_base64_char) && !after.is_some_and(is_base64_char)
}

pub fn is_forbidden_element(info: &ElementInfo) -> bool {
    FORBIDDEN_TAGS.iter().any(|t| info.is(t))
        || info.namespace.as_deref().is_some_and(|ns| ns.contains("svg"))
}

/// Walks the ancestor chain of `node` looking for a forbidden container
pub fn in_forbidden_container<H: DocumentHost>(host: &H, node: &H::Node) -> bool {
    find_ancestor(host, host.parent(node), is_forbidden_element).is_some()
}

/// Closest element at or above `start` matching `pred`
pub fn find_ancestor<H, F>(host: &H, start: Option<H::Node>, pred: F) -> Option<H::Node>
where
    H: DocumentHost,
    F: Fn(&ElementInfo) -> bool,
{
    let mut current = start;
    while let Some(node) = current {
        if host.element_info(&node).is_some_and(|info| pred(&info)) {
            return Some(node);
        }
        current = host.parent(&node);
    }
    None
}

/// Type attribute missing means `text`
pub fn is_textual_input(input_type: Option<&str>) -> bool {
    let t = input_type.unwrap_or("text").to_ascii_lowercase();
    !NON_TEXT_INPUT_TYPES.contains(&t.as_str())
}

/// A `<textarea>`, or an `<input>` that holds free text
pub fn is_editable_field(field: &FocusedField) -> bool {
    if field.tag.eq_ignore_ascii_case("TEXTAREA") {
        return true;
    }
    field.tag.eq_ignore_ascii_case("INPUT") && is_textual_input(field.input_type.as_deref())
}
