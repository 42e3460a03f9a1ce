//! URL classification for decoded text
//!
//! A heuristic, not a validator. It answers one question: is the whole
//! decoded string something a user would expect to click?

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Link target and visible text for a decoded value
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct UrlClassification {
    pub href: String,
    pub display: String,
}

struct UrlPatterns {
    scheme_re: Regex,
    bare_domain_re: Regex,
    web_re: Regex,
}

fn patterns() -> &'static UrlPatterns {
    static PATTERNS: OnceLock<UrlPatterns> = OnceLock::new();
    PATTERNS.get_or_init(|| UrlPatterns {
        // http://, https:// or mailto:
        scheme_re: Regex::new(r"(?i)^(https?://|mailto:)").unwrap(),
        // www.example.com, example.co.uk/path?q=1#frag, localhost.test:8080
        // At least one dot keeps ordinary words out.
        bare_domain_re: Regex::new(r"(?i)^(www\.)?[a-z0-9-]+(\.[a-z0-9-]+)+([:/?#].*)?$").unwrap(),
        web_re: Regex::new(r"(?i)^https?://").unwrap(),
    })
}

/// Classify decoded text as a URL.
///
/// Explicit `http(s)://` and `mailto:` values are linked as-is. Bare domains
/// are assumed to be `https`. Anything else is plain text.
pub fn classify(text: &str) -> Option<UrlClassification> {
    let s = text.trim();
    let p = patterns();

    if p.scheme_re.is_match(s) {
        return Some(UrlClassification {
            href: s.to_string(),
            display: s.to_string(),
        });
    }

    // `.*` does not cross newlines, so multi-line text never classifies
    if p.bare_domain_re.is_match(s) {
        return Some(UrlClassification {
            href: format!("https://{}", s),
            display: s.to_string(),
        });
    }

    None
}

/// Stricter check used by the bulk scanner: only absolute web URLs
pub fn is_web_url(text: &str) -> bool {
    patterns().web_re.is_match(text.trim())
}
