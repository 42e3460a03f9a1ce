//! Boundary message contracts
//!
//! Requests arrive from the extension's background worker (context menu) or
//! popup (scan button). A request can end three ways: a response, no
//! response at all, or the page being unreachable. `Delivery` keeps those
//! apart so callers never mistake a missing reply for an empty one.

use serde::{Deserialize, Serialize};

use super::bulk::ScanStats;
use super::selection::{SelectionOutcome, ValueKind};
use crate::error::LinkifyError;

/// Incoming request.
///
/// The legacy `b64-decode` / `b64-decode-all` type names are still accepted.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum Request {
    #[serde(rename = "decode-request", alias = "b64-decode")]
    Decode {
        #[serde(default)]
        text: Option<String>,
    },
    #[serde(rename = "scan-all-request", alias = "b64-decode-all")]
    ScanAll {
        #[serde(default)]
        prefix: Option<String>,
    },
}

const DECODE_TYPES: [&str; 2] = ["decode-request", "b64-decode"];
const SCAN_TYPES: [&str; 2] = ["scan-all-request", "b64-decode-all"];

pub const DECODE_FAILED: &str = "Failed to decode base64.";
pub const SCAN_FAILED: &str = "Bulk conversion error.";

impl Request {
    /// Parse a raw message.
    ///
    /// `Ok(None)` for anything that is not one of ours; it must be left
    /// unanswered. A known `type` with a malformed payload is an error the
    /// sender gets back.
    pub fn parse(value: &serde_json::Value) -> Result<Option<Self>, LinkifyError> {
        let Some(kind) = value.get("type").and_then(serde_json::Value::as_str) else {
            return Ok(None);
        };
        let fallback = if DECODE_TYPES.contains(&kind) {
            DECODE_FAILED
        } else if SCAN_TYPES.contains(&kind) {
            SCAN_FAILED
        } else {
            return Ok(None);
        };

        serde_json::from_value(value.clone())
            .map(Some)
            .map_err(|_| LinkifyError::InvalidRequest(fallback.to_string()))
    }

    /// Selection text, missing treated as empty
    pub fn text(&self) -> &str {
        match self {
            Request::Decode { text } => text.as_deref().unwrap_or(""),
            Request::ScanAll { .. } => "",
        }
    }

    /// Requested prefix; empty counts as absent
    pub fn prefix(&self) -> Option<&str> {
        match self {
            Request::ScanAll { prefix } => prefix.as_deref().filter(|p| !p.is_empty()),
            Request::Decode { .. } => None,
        }
    }
}

/// Reply sent back across the boundary
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(untagged)]
pub enum Response {
    Decoded {
        ok: bool,
        kind: ValueKind,
        value: String,
    },
    Scanned {
        ok: bool,
        #[serde(flatten)]
        stats: ScanStats,
    },
    Failed {
        error: String,
    },
}

impl Response {
    pub fn decoded(outcome: SelectionOutcome) -> Self {
        Response::Decoded {
            ok: true,
            kind: outcome.kind,
            value: outcome.value,
        }
    }

    pub fn scanned(stats: ScanStats) -> Self {
        Response::Scanned { ok: true, stats }
    }

    pub fn failed(err: &LinkifyError) -> Self {
        Response::Failed { error: err.to_string() }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Response::Failed { error } => Some(error),
            _ => None,
        }
    }
}

/// How a request ended, seen from the sender
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Delivery {
    Responded(Response),
    /// Delivered, but the page answered with nothing
    NoResponse,
    /// No content script on the other side
    Unreachable,
}

impl Delivery {
    /// Map a raw callback value: `None` when the page was unreachable,
    /// `Some(null)` when it answered with nothing.
    pub fn from_callback(reply: Option<&serde_json::Value>) -> Self {
        match reply {
            None => Delivery::Unreachable,
            Some(v) if v.is_null() => Delivery::NoResponse,
            Some(v) => match serde_json::from_value::<Response>(v.clone()) {
                Ok(resp) => Delivery::Responded(resp),
                Err(_) => Delivery::NoResponse,
            },
        }
    }
}

pub const UNREACHABLE_DECODE: &str = "Couldn't reach the page's content script.";
pub const UNREACHABLE_SCAN: &str = "Couldn't reach the page (no content script here).";
pub const NO_RESPONSE: &str = "No response from page.";

/// Message to show after a selection decode. Success stays silent.
pub fn decode_notice(delivery: &Delivery) -> Option<String> {
    match delivery {
        Delivery::Unreachable => Some(UNREACHABLE_DECODE.to_string()),
        Delivery::NoResponse => Some(NO_RESPONSE.to_string()),
        Delivery::Responded(resp) => resp.error().map(str::to_string),
    }
}

/// Status line for the popup after a bulk scan
pub fn scan_notice(delivery: &Delivery) -> String {
    match delivery {
        Delivery::Unreachable => UNREACHABLE_SCAN.to_string(),
        Delivery::NoResponse => NO_RESPONSE.to_string(),
        Delivery::Responded(Response::Failed { error }) => format!("Error: {}", error),
        Delivery::Responded(Response::Scanned { stats, .. }) => stats.summary(),
        Delivery::Responded(Response::Decoded { .. }) => NO_RESPONSE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: serde_json::Value) -> Request {
        Request::parse(&value).unwrap().unwrap()
    }

    #[test]
    fn test_parse_decode_request() {
        let req = parse(json!({"type": "decode-request", "text": "aGk="}));
        assert_eq!(req.text(), "aGk=");

        let legacy = parse(json!({"type": "b64-decode"}));
        assert_eq!(legacy.text(), "");
    }

    #[test]
    fn test_parse_scan_request_prefix() {
        let req = parse(json!({"type": "scan-all-request"}));
        assert_eq!(req.prefix(), None);

        let req = parse(json!({"type": "b64-decode-all", "prefix": ""}));
        assert_eq!(req.prefix(), None);

        let req = parse(json!({"type": "scan-all-request", "prefix": "ZXh"}));
        assert_eq!(req.prefix(), Some("ZXh"));
    }

    #[test]
    fn test_unknown_request_ignored() {
        assert_eq!(Request::parse(&json!({"type": "ping"})), Ok(None));
        assert_eq!(Request::parse(&json!("decode-request")), Ok(None));
        assert_eq!(Request::parse(&json!({"type": 7, "text": "aGk="})), Ok(None));
    }

    #[test]
    fn test_malformed_known_request_is_an_error() {
        let err = Request::parse(&json!({"type": "decode-request", "text": 42})).unwrap_err();
        assert_eq!(err.to_string(), DECODE_FAILED);

        let err = Request::parse(&json!({"type": "b64-decode-all", "prefix": ["aHR"]})).unwrap_err();
        assert_eq!(err.to_string(), SCAN_FAILED);
    }

    #[test]
    fn test_response_shapes() {
        let ok = Response::Decoded { ok: true, kind: ValueKind::Url, value: "https://x.io".into() };
        assert_eq!(
            serde_json::to_value(&ok).unwrap(),
            json!({"ok": true, "kind": "url", "value": "https://x.io"})
        );

        let scanned = serde_json::to_value(Response::scanned(ScanStats { nodes_scanned: 2, ..ScanStats::default() })).unwrap();
        assert_eq!(scanned["ok"], json!(true));
        assert_eq!(scanned["nodesScanned"], json!(2));

        let failed = Response::failed(&LinkifyError::NoSelection);
        assert_eq!(serde_json::to_value(&failed).unwrap(), json!({"error": "No text selected."}));
    }

    #[test]
    fn test_delivery_from_callback() {
        assert_eq!(Delivery::from_callback(None), Delivery::Unreachable);
        assert_eq!(Delivery::from_callback(Some(&json!(null))), Delivery::NoResponse);

        let d = Delivery::from_callback(Some(&json!({"error": "boom"})));
        assert_eq!(d, Delivery::Responded(Response::Failed { error: "boom".into() }));

        let d = Delivery::from_callback(Some(&json!({"ok": true, "kind": "text", "value": "hi"})));
        assert!(matches!(d, Delivery::Responded(Response::Decoded { .. })));
    }

    #[test]
    fn test_decode_notices() {
        assert_eq!(decode_notice(&Delivery::Unreachable).as_deref(), Some(UNREACHABLE_DECODE));
        assert_eq!(decode_notice(&Delivery::NoResponse).as_deref(), Some(NO_RESPONSE));
        let failed = Delivery::Responded(Response::Failed { error: "Invalid Base64 length.".into() });
        assert_eq!(decode_notice(&failed).as_deref(), Some("Invalid Base64 length."));
        let ok = Delivery::Responded(Response::Decoded { ok: true, kind: ValueKind::Text, value: "hi".into() });
        assert_eq!(decode_notice(&ok), None);
    }

    #[test]
    fn test_scan_notices() {
        assert_eq!(scan_notice(&Delivery::Unreachable), UNREACHABLE_SCAN);
        let failed = Delivery::Responded(Response::Failed { error: "No document root.".into() });
        assert_eq!(scan_notice(&failed), "Error: No document root.");
        let stats = ScanStats { nodes_scanned: 4, matches_found: 1, decoded_ok: 1, links_created: 1, ..ScanStats::default() };
        assert!(scan_notice(&Delivery::Responded(Response::scanned(stats))).starts_with("Scanned 4 nodes."));
    }
}
