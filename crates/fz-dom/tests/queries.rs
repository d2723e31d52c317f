//! Query tests for fz-dom
//!
//! Selector lookups over a page shaped like the marketing site.

use fz_dom::{Document, NodeId, SelectorError};

fn page() -> (Document, Vec<NodeId>) {
    let mut doc = Document::new("test://page");
    let body = doc.body();
    let header = doc.append_element(body, "header", &[("class", "main-header")]);
    let home = doc.append_element(header, "a", &[("href", "#")]);
    let services = doc.append_element(header, "a", &[("href", "#services")]);
    let external = doc.append_element(header, "a", &[("href", "https://example.com")]);
    let section = doc.append_element(body, "section", &[("id", "services"), ("class", "reveal")]);
    let stat = doc.append_element(section, "div", &[("class", "stat")]);
    let h3 = doc.append_element(stat, "h3", &[]);
    doc.set_text(h3, "1,234+");
    (doc, vec![header, home, services, external, section, stat, h3])
}

#[test]
fn test_query_selector_all_document_order() {
    let (doc, nodes) = page();
    let anchors = doc.query_selector_all(r##"a[href^="#"]"##).unwrap();
    assert_eq!(anchors, vec![nodes[1], nodes[2]]);
}

#[test]
fn test_query_selector_first_match() {
    let (doc, nodes) = page();
    assert_eq!(doc.query_selector(".main-header").unwrap(), Some(nodes[0]));
    assert_eq!(doc.query_selector(".navbar").unwrap(), None);
    assert_eq!(doc.query_selector("#services").unwrap(), Some(nodes[4]));
}

#[test]
fn test_query_within_scope() {
    let (doc, nodes) = page();
    let h3 = doc.query_within(nodes[5], "h3").unwrap();
    assert_eq!(h3, Some(nodes[6]));
    assert_eq!(doc.text_content(nodes[5]), "1,234+");
}

#[test]
fn test_malformed_selector_is_an_error() {
    let (doc, _) = page();
    assert_eq!(doc.query_selector("#"), Err(SelectorError::ExpectedIdent(1)));
}

#[test]
fn test_event_path_reaches_root() {
    let (doc, nodes) = page();
    let path = doc.event_path(nodes[6]);
    assert_eq!(path.first(), Some(&nodes[6]));
    assert_eq!(path.last(), Some(&NodeId::ROOT));
    assert!(path.contains(&doc.body()));
}
