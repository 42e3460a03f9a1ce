//! BulkScanner - whole-document Base64 conversion
//!
//! Finds every token starting with the configured prefix, decodes it and
//! rewrites the text node it lives in.
//!
//! # Mutation discipline
//! 1. Snapshot the eligible text nodes before touching anything.
//! 2. Plan each node against its original string.
//! 3. Replace the node once, with the whole plan, after it has been scanned.
//!
//! Offsets computed in step 2 can never be invalidated by step 3.

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::filters::{has_clean_boundaries, in_forbidden_container};
use crate::config::ScanConfig;
use crate::console;
use crate::decode::{decode, is_web_url};
use crate::dom::DocumentHost;
use crate::error::LinkifyError;

// ==================== TYPE DEFINITIONS ====================

/// A substring that looks like a prefixed Base64 token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateToken {
    /// Byte offset, inclusive
    pub start: usize,
    /// Byte offset, exclusive
    pub end: usize,
    pub raw: String,
}

/// Aggregate counters for one scan.
///
/// `matches_found == decoded_ok + skipped + rejected` and
/// `decoded_ok == links_created + text_replaced`.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ScanStats {
    pub nodes_scanned: usize,
    pub matches_found: usize,
    pub decoded_ok: usize,
    pub links_created: usize,
    pub text_replaced: usize,
    /// Too long, or failed to decode
    pub skipped: usize,
    /// Touched another Base64 character on either side
    #[serde(default)]
    pub rejected: usize,
}

impl ScanStats {
    /// One-line report for the popup
    pub fn summary(&self) -> String {
        let mut out = format!(
            "Scanned {} nodes. Found {} candidate(s). Converted {}: {} link(s), {} text replacement(s).",
            self.nodes_scanned, self.matches_found, self.decoded_ok, self.links_created, self.text_replaced
        );
        if self.skipped > 0 {
            out.push_str(&format!(" Skipped {} (invalid/too long).", self.skipped));
        }
        if self.rejected > 0 {
            out.push_str(&format!(" Ignored {} partial match(es).", self.rejected));
        }
        out
    }
}

/// One piece of a rewritten text node
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Untouched text, or a decoded value inserted as text
    Text(String),
    /// Decoded web URL: href and visible text
    Link(String),
}

// ==================== MAIN IMPLEMENTATION ====================

/// Whole-document scanner for one prefix
pub struct BulkScanner {
    prefix: String,
    token_re: Regex,
    max_token_length: usize,
}

impl BulkScanner {
    pub fn new(config: &ScanConfig) -> Result<Self, LinkifyError> {
        // prefix, at least `min_tail_length` alphabet chars, up to two pads
        let pattern = format!(
            "{}[A-Za-z0-9+/_-]{{{},}}={{0,2}}",
            regex::escape(&config.prefix),
            config.min_tail_length
        );
        let token_re = Regex::new(&pattern)
            .map_err(|e| LinkifyError::InvalidRequest(format!("Invalid prefix pattern: {}", e)))?;

        Ok(Self {
            prefix: config.prefix.clone(),
            token_re,
            max_token_length: config.max_token_length,
        })
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Non-overlapping, leftmost matches in `text`, boundary-violating ones included.
    ///
    /// The boolean is true when the token has clean boundaries.
    pub fn find_candidates(&self, text: &str) -> Vec<(CandidateToken, bool)> {
        self.token_re
            .find_iter(text)
            .map(|m| {
                let token = CandidateToken {
                    start: m.start(),
                    end: m.end(),
                    raw: m.as_str().to_string(),
                };
                let clean = has_clean_boundaries(text, m.start(), m.end());
                (token, clean)
            })
            .collect()
    }

    /// Plan the rewrite of one text node.
    ///
    /// Returns an empty plan when nothing decoded, meaning the node stays as it is.
    pub fn plan(&self, text: &str, stats: &mut ScanStats) -> Vec<Segment> {
        let mut segments = Vec::new();
        let mut last = 0;
        let mut changed = false;

        for (token, clean) in self.find_candidates(text) {
            stats.matches_found += 1;

            if !clean {
                stats.rejected += 1;
                continue;
            }

            if token.raw.chars().count() > self.max_token_length {
                stats.skipped += 1;
                continue;
            }

            let decoded = match decode(&token.raw) {
                Ok(d) => d,
                Err(_) => {
                    stats.skipped += 1;
                    continue;
                }
            };

            if token.start > last {
                segments.push(Segment::Text(text[last..token.start].to_string()));
            }

            if is_web_url(&decoded) {
                segments.push(Segment::Link(decoded.trim().to_string()));
                stats.links_created += 1;
            } else {
                segments.push(Segment::Text(decoded));
                stats.text_replaced += 1;
            }
            stats.decoded_ok += 1;
            changed = true;
            last = token.end;
        }

        if !changed {
            return Vec::new();
        }
        if last < text.len() {
            segments.push(Segment::Text(text[last..].to_string()));
        }
        segments
    }

    /// Scan every eligible text node under the document root
    pub fn scan<H: DocumentHost>(&self, host: &mut H) -> Result<ScanStats, LinkifyError> {
        let root = host.scan_root().ok_or(LinkifyError::NoDocumentRoot)?;
        let mut stats = ScanStats::default();

        // Snapshot first: nothing below may change which nodes get visited
        let targets: Vec<(H::Node, String)> = host
            .text_nodes(&root)?
            .into_iter()
            .filter_map(|node| {
                let text = host.node_text(&node)?;
                if !text.contains(self.prefix.as_str()) || in_forbidden_container(host, &node) {
                    return None;
                }
                Some((node, text))
            })
            .collect();
        stats.nodes_scanned = targets.len();

        for (node, text) in targets {
            let segments = self.plan(&text, &mut stats);
            if segments.is_empty() {
                continue;
            }

            let mut replacement = Vec::with_capacity(segments.len());
            for segment in segments {
                // Decoded values go in as text nodes or attribute values, never markup
                let built = match segment {
                    Segment::Text(t) => host.create_text(&t)?,
                    Segment::Link(url) => host.create_link(&url, &url)?,
                };
                replacement.push(built);
            }
            host.replace_with(&node, replacement)?;
        }

        console::log(&format!(
            "[BulkScanner] prefix={} nodes={} matches={} decoded={} links={} skipped={} rejected={}",
            self.prefix,
            stats.nodes_scanned,
            stats.matches_found,
            stats.decoded_ok,
            stats.links_created,
            stats.skipped,
            stats.rejected
        ));

        Ok(stats)
    }
}

/// Scan with a fresh scanner built from `config`
pub fn scan<H: DocumentHost>(host: &mut H, config: &ScanConfig) -> Result<ScanStats, LinkifyError> {
    BulkScanner::new(config)?.scan(host)
}
