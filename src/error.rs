//! Error types shared by the decoder, the replacers and the WASM facade.
//!
//! Every failure here is scoped to a single invocation: the caller reports it
//! (single-selection flow) or counts it (bulk flow) and moves on.

/// Structural decode failures, raised before any binary decoding happens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// Nothing left after trimming whitespace and stray punctuation
    EmptyInput,
    /// Length is 1 mod 4 after normalization, which no Base64 string can be
    InvalidLength,
    /// Characters or padding outside the Base64 grammar
    NotBase64,
}

impl std::fmt::Display for DecodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DecodeError::EmptyInput => write!(f, "Empty selection."),
            DecodeError::InvalidLength => write!(f, "Invalid Base64 length."),
            DecodeError::NotBase64 => write!(f, "Selection is not valid Base64."),
        }
    }
}

impl std::error::Error for DecodeError {}

/// Errors raised while operating on a document
#[derive(Debug, Clone, PartialEq)]
pub enum LinkifyError {
    Decode(DecodeError),
    /// Empty or whitespace-only selection text
    NoSelection,
    /// Neither a body nor a document element to scan
    NoDocumentRoot,
    /// The underlying tree refused a mutation
    Dom(String),
    /// A request that was recognised but could not be carried out as sent
    InvalidRequest(String),
}

impl std::fmt::Display for LinkifyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LinkifyError::Decode(e) => write!(f, "{}", e),
            LinkifyError::NoSelection => write!(f, "No text selected."),
            LinkifyError::NoDocumentRoot => write!(f, "No document root."),
            LinkifyError::Dom(msg) => write!(f, "DOM error: {}", msg),
            LinkifyError::InvalidRequest(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for LinkifyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LinkifyError::Decode(e) => Some(e),
            _ => None,
        }
    }
}

impl From<DecodeError> for LinkifyError {
    fn from(e: DecodeError) -> Self {
        LinkifyError::Decode(e)
    }
}
