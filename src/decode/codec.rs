//! Base64 decoder for loosely selected page text
//!
//! Accepts standard and URL-safe alphabets, repairs missing padding and
//! tolerates punctuation picked up around a selection. The structural check
//! always runs before any bytes are decoded.

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine as _;
use regex::Regex;
use std::sync::OnceLock;

use crate::error::DecodeError;

/// Standard alphabet, canonical padding, but non-zero trailing bits are
/// accepted the way `atob` accepts them.
const LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_allow_trailing_bits(true)
        .with_decode_padding_mode(DecodePaddingMode::RequireCanonical),
);

fn grammar() -> &'static Regex {
    static GRAMMAR: OnceLock<Regex> = OnceLock::new();
    GRAMMAR.get_or_init(|| Regex::new(r"^[A-Za-z0-9+/]+={0,2}$").unwrap())
}

/// Characters kept at the edges of a selection: both alphabets, padding and whitespace
fn is_permitted_edge(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '+' | '/' | '_' | '-' | '=') || c.is_whitespace()
}

/// Trim, strip stray edge punctuation, normalize and pad a candidate token.
///
/// Returns a string that satisfies the strict Base64 grammar.
pub fn normalize(input: &str) -> Result<String, DecodeError> {
    let stripped = input
        .trim()
        .trim_matches(|c: char| !is_permitted_edge(c))
        .trim();

    if stripped.is_empty() {
        return Err(DecodeError::EmptyInput);
    }

    let mut s: String = stripped
        .chars()
        .map(|c| match c {
            '-' => '+',
            '_' => '/',
            other => other,
        })
        .collect();

    // Residue over UTF-16 units, the way page text reports its length.
    // A stray astral char counts twice and can trip the length check first.
    match s.encode_utf16().count() % 4 {
        2 => s.push_str("=="),
        3 => s.push('='),
        1 => return Err(DecodeError::InvalidLength),
        _ => {}
    }

    if !grammar().is_match(&s) {
        return Err(DecodeError::NotBase64);
    }

    Ok(s)
}

/// Decode a candidate token to raw bytes
pub fn decode_bytes(input: &str) -> Result<Vec<u8>, DecodeError> {
    let s = normalize(input)?;
    LENIENT.decode(s.as_bytes()).map_err(|_| DecodeError::NotBase64)
}

/// Decode a candidate token to text.
///
/// Invalid UTF-8 never fails: bad sequences become U+FFFD. A leading
/// byte-order mark is dropped, matching the browser's `TextDecoder`.
pub fn decode(input: &str) -> Result<String, DecodeError> {
    let bytes = decode_bytes(input)?;
    let text = String::from_utf8_lossy(&bytes);
    Ok(match text.strip_prefix('\u{FEFF}') {
        Some(rest) => rest.to_string(),
        None => text.into_owned(),
    })
}
