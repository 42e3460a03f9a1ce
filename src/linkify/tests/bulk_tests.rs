//! Tests for the BulkScanner
//!
//! Whole-document scans over an ArenaDocument: boundaries, length limits,
//! forbidden containers and the counters reported back to the popup.

use crate::config::ScanConfig;
use crate::dom::{ArenaDocument, DocumentHost, NodeId, SVG_NAMESPACE};
use crate::error::LinkifyError;
use crate::linkify::bulk::{scan, BulkScanner, ScanStats};

// https://example.org
const ORG: &str = "aHR0cHM6Ly9leGFtcGxlLm9yZw==";
// http://a.io
const A_IO: &str = "aHR0cDovL2EuaW8=";
// httpbin (prefixed, but not a URL)
const HTTPBIN: &str = "aHR0cGJpbg==";

const ORG_LINK: &str =
    "<a href=\"https://example.org\" rel=\"noopener noreferrer\" target=\"_blank\">https://example.org</a>";

fn paragraph(text: &str) -> (ArenaDocument, NodeId, NodeId) {
    let mut doc = ArenaDocument::new();
    let body = doc.body().unwrap();
    let p = doc.append_element(body, "p");
    let t = doc.append_text(p, text);
    (doc, p, t)
}

fn run(doc: &mut ArenaDocument) -> ScanStats {
    scan(doc, &ScanConfig::default()).unwrap()
}

fn assert_invariants(stats: &ScanStats) {
    assert_eq!(stats.matches_found, stats.decoded_ok + stats.skipped + stats.rejected);
    assert_eq!(stats.decoded_ok, stats.links_created + stats.text_replaced);
}

// ============================================================================
// Replacement Tests
// ============================================================================

#[test]
fn test_single_url_token_becomes_link() {
    let (mut doc, p, t) = paragraph(&format!("see {} now", ORG));
    let stats = run(&mut doc);

    assert_eq!(doc.to_html(p), format!("<p>see {} now</p>", ORG_LINK));
    assert!(!doc.is_attached(t));
    assert_eq!(stats.nodes_scanned, 1);
    assert_eq!(stats.matches_found, 1);
    assert_eq!(stats.decoded_ok, 1);
    assert_eq!(stats.links_created, 1);
    assert_eq!(stats.text_replaced, 0);
    assert_invariants(&stats);
}

#[test]
fn test_non_url_token_becomes_text() {
    let (mut doc, p, _) = paragraph(&format!("tool {} here", HTTPBIN));
    let stats = run(&mut doc);

    assert_eq!(doc.to_html(p), "<p>tool httpbin here</p>");
    assert_eq!(stats.text_replaced, 1);
    assert_eq!(stats.links_created, 0);
    // Plain decodes are inserted as separate text nodes
    assert_eq!(doc.children(p).len(), 3);
    assert_invariants(&stats);
}

#[test]
fn test_multiple_tokens_in_one_node() {
    let (mut doc, p, _) = paragraph(&format!("a {} b {} c", A_IO, HTTPBIN));
    let stats = run(&mut doc);

    assert_eq!(
        doc.to_html(p),
        "<p>a <a href=\"http://a.io\" rel=\"noopener noreferrer\" target=\"_blank\">http://a.io</a> b httpbin c</p>"
    );
    assert_eq!(stats.nodes_scanned, 1);
    assert_eq!(stats.matches_found, 2);
    assert_eq!(stats.links_created, 1);
    assert_eq!(stats.text_replaced, 1);
    assert_invariants(&stats);
}

#[test]
fn test_token_filling_whole_node() {
    let (mut doc, p, _) = paragraph(ORG);
    run(&mut doc);
    assert_eq!(doc.to_html(p), format!("<p>{}</p>", ORG_LINK));
}

#[test]
fn test_tokens_across_nodes() {
    let mut doc = ArenaDocument::new();
    let body = doc.body().unwrap();
    let ul = doc.append_element(body, "ul");
    for token in [ORG, A_IO, HTTPBIN] {
        let li = doc.append_element(ul, "li");
        doc.append_text(li, token);
    }
    doc.append_text(body, "nothing to see");

    let stats = run(&mut doc);
    assert_eq!(stats.nodes_scanned, 3);
    assert_eq!(stats.matches_found, 3);
    assert_eq!(stats.links_created, 2);
    assert_eq!(stats.text_replaced, 1);
    assert_eq!(doc.text_content(ul), "https://example.orghttp://a.iohttpbin");
}

// ============================================================================
// Boundary Tests
// ============================================================================

#[test]
fn test_token_glued_to_word_is_rejected() {
    let text = format!("x{}", ORG);
    let (mut doc, p, t) = paragraph(&text);
    let stats = run(&mut doc);

    assert!(doc.is_attached(t));
    assert_eq!(doc.text_content(p), text);
    assert_eq!(stats.matches_found, 1);
    assert_eq!(stats.rejected, 1);
    assert_eq!(stats.decoded_ok, 0);
    assert_eq!(stats.skipped, 0);
    assert_invariants(&stats);
}

#[test]
fn test_token_followed_by_base64_char_is_rejected() {
    let text = format!("{}x", ORG);
    let (mut doc, p, _) = paragraph(&text);
    let stats = run(&mut doc);

    assert_eq!(doc.text_content(p), text);
    assert_eq!(stats.rejected, 1);
}

#[test]
fn test_punctuation_is_a_clean_boundary() {
    let (mut doc, p, _) = paragraph(&format!("({}).", ORG));
    let stats = run(&mut doc);

    assert_eq!(stats.links_created, 1);
    assert_eq!(doc.to_html(p), format!("<p>({}).</p>", ORG_LINK));
}

#[test]
fn test_rejected_and_accepted_in_same_node() {
    let (mut doc, p, _) = paragraph(&format!("z{} {}", ORG, HTTPBIN));
    let stats = run(&mut doc);

    assert_eq!(stats.matches_found, 2);
    assert_eq!(stats.rejected, 1);
    assert_eq!(stats.text_replaced, 1);
    assert_eq!(doc.text_content(p), format!("z{} httpbin", ORG));
    assert_invariants(&stats);
}

// ============================================================================
// Length and Decode Failure Tests
// ============================================================================

#[test]
fn test_tokens_over_max_length_are_skipped() {
    // ORG is 28 characters
    let config = ScanConfig {
        max_token_length: 27,
        ..ScanConfig::default()
    };
    let mut doc = ArenaDocument::new();
    let body = doc.body().unwrap();
    let p = doc.append_element(body, "p");
    doc.append_text(p, &format!("{} and {}", ORG, ORG));
    let div = doc.append_element(body, "div");
    doc.append_text(div, ORG);

    let stats = scan(&mut doc, &config).unwrap();
    assert_eq!(stats.matches_found, 3);
    assert_eq!(stats.skipped, 3);
    assert_eq!(stats.decoded_ok, 0);
    assert_eq!(doc.text_content(body), format!("{} and {}{}", ORG, ORG, ORG));
    assert_invariants(&stats);
}

#[test]
fn test_token_at_max_length_is_decoded() {
    let config = ScanConfig {
        max_token_length: 28,
        ..ScanConfig::default()
    };
    let (mut doc, _, _) = paragraph(ORG);
    let stats = scan(&mut doc, &config).unwrap();
    assert_eq!(stats.links_created, 1);
    assert_eq!(stats.skipped, 0);
}

#[test]
fn test_undecodable_token_is_skipped() {
    // Tail leaves a length of 1 mod 4
    let (mut doc, p, t) = paragraph("bad aHRaaaaaa token");
    let stats = run(&mut doc);

    assert!(doc.is_attached(t));
    assert_eq!(doc.text_content(p), "bad aHRaaaaaa token");
    assert_eq!(stats.skipped, 1);
    assert_invariants(&stats);
}

// ============================================================================
// Container Tests
// ============================================================================

#[test]
fn test_forbidden_containers_untouched() {
    let mut doc = ArenaDocument::new();
    let body = doc.body().unwrap();
    let mut guarded = Vec::new();
    for tag in ["script", "style", "textarea", "noscript", "input"] {
        let el = doc.append_element(body, tag);
        guarded.push((el, doc.append_text(el, ORG)));
    }
    let svg = doc.append_element_ns(body, "svg", Some(SVG_NAMESPACE));
    let label = doc.append_element_ns(svg, "text", Some(SVG_NAMESPACE));
    guarded.push((label, doc.append_text(label, ORG)));

    let stats = run(&mut doc);

    assert_eq!(stats.nodes_scanned, 0);
    assert_eq!(stats.matches_found, 0);
    for (el, text) in guarded {
        assert!(doc.is_attached(text));
        assert_eq!(doc.text_content(el), ORG);
    }
}

#[test]
fn test_nested_inside_forbidden_ancestor() {
    let mut doc = ArenaDocument::new();
    let body = doc.body().unwrap();
    let noscript = doc.append_element(body, "noscript");
    let p = doc.append_element(noscript, "p");
    let t = doc.append_text(p, ORG);
    let ok = doc.append_element(body, "p");
    doc.append_text(ok, ORG);

    let stats = run(&mut doc);
    assert!(doc.is_attached(t));
    assert_eq!(stats.nodes_scanned, 1);
    assert_eq!(stats.links_created, 1);
}

#[test]
fn test_nodes_without_prefix_not_counted() {
    let mut doc = ArenaDocument::new();
    let body = doc.body().unwrap();
    doc.append_text(body, "plain text");
    doc.append_text(body, "aHR too short");

    let stats = run(&mut doc);
    assert_eq!(stats.nodes_scanned, 1);
    assert_eq!(stats.matches_found, 0);
}

// ============================================================================
// Safety Tests
// ============================================================================

#[test]
fn test_decoded_markup_stays_text() {
    // https://example.org/<b>&x
    let (mut doc, p, _) = paragraph("aHR0cHM6Ly9leGFtcGxlLm9yZy88Yj4meA==");
    let stats = run(&mut doc);

    assert_eq!(stats.links_created, 1);
    let anchor = doc.children(p)[0];
    assert_eq!(doc.attribute(anchor, "href"), Some("https://example.org/<b>&x"));
    // Only the display text node lives under the anchor, no <b> element
    assert_eq!(doc.children(anchor).len(), 1);
    assert!(doc.element_info(&doc.children(anchor)[0]).is_none());
    assert!(doc.to_html(p).contains("https://example.org/&lt;b&gt;&amp;x</a>"));
}

#[test]
fn test_decoded_tokens_not_rescanned() {
    // Decodes to "http aHR0cHM6Ly9leGFtcGxlLm9yZw==", which holds a fresh token
    let (mut doc, p, _) = paragraph("aHR0cCBhSFIwY0hNNkx5OWxlR0Z0Y0d4bExtOXladz09");
    let stats = run(&mut doc);

    assert_eq!(stats.nodes_scanned, 1);
    assert_eq!(stats.matches_found, 1);
    assert_eq!(stats.text_replaced, 1);
    assert_eq!(stats.links_created, 0);
    assert_eq!(doc.text_content(p), format!("http {}", ORG));
}

#[test]
fn test_second_scan_only_sees_new_text() {
    let (mut doc, _, _) = paragraph(&format!("{} {}", ORG, A_IO));
    let first = run(&mut doc);
    assert_eq!(first.links_created, 2);

    let second = run(&mut doc);
    assert_eq!(second, ScanStats::default());
}

// ============================================================================
// Root and Prefix Tests
// ============================================================================

#[test]
fn test_no_document_root() {
    let mut doc = ArenaDocument::empty();
    assert_eq!(run_err(&mut doc), LinkifyError::NoDocumentRoot);
}

fn run_err(doc: &mut ArenaDocument) -> LinkifyError {
    scan(doc, &ScanConfig::default()).unwrap_err()
}

#[test]
fn test_custom_prefix() {
    // example.com/path
    let (mut doc, p, _) = paragraph(&format!("{} ZXhhbXBsZS5jb20vcGF0aA==", ORG));
    let scanner = BulkScanner::new(&ScanConfig::with_prefix("ZXh")).unwrap();
    let stats = scanner.scan(&mut doc).unwrap();

    // Bare domains are not web URLs for the bulk scanner
    assert_eq!(stats.nodes_scanned, 1);
    assert_eq!(stats.matches_found, 1);
    assert_eq!(stats.text_replaced, 1);
    assert_eq!(doc.text_content(p), format!("{} example.com/path", ORG));
}
