//! Inline XML markup: output parses as XML and recovers the document text.

use proptest::prelude::*;
use spanlab::prelude::*;
use spanlab_core::{Span, TextBase};
use std::sync::Arc;

/// Parse markup output as XML and return its character data, entities decoded.
fn parse_text(xml: &str) -> std::result::Result<String, String> {
    let doc = roxmltree::Document::parse(xml).map_err(|e| format!("{}: {}", e, xml))?;
    let root = doc.root_element();
    if root.tag_name().name() != "root" {
        return Err(format!("root element is <{}>", root.tag_name().name()));
    }
    Ok(root
        .descendants()
        .filter(|n| n.is_text())
        .filter_map(|n| n.text())
        .collect())
}

fn labels_for(text: &str) -> TextLabels {
    let mut base = TextBase::new();
    base.add_document("d", text).unwrap();
    TextLabels::new(Arc::new(base))
}

#[test]
fn overlap_element_parses() {
    let xml = "<root><PER><overlap value=\"LOC,PER\">Paris</overlap> &amp; co</PER></root>";
    assert_eq!(parse_text(xml).unwrap(), "Paris & co");
    assert!(parse_text("<root><X></root></X>").is_err());
}

#[test]
fn straddling_label_dropped_deterministically() {
    let mut labels = labels_for("abcdef");
    labels.add_to_type(Span::new("d", 1, 4), "X", None).unwrap();
    labels.add_to_type(Span::new("d", 2, 5), "Y", None).unwrap();
    assert_eq!(
        markup_document_span("d", &labels).unwrap(),
        "<root>a<X>bcd</X>ef</root>"
    );
}

#[test]
fn shared_extent_uses_overlap_element() {
    let mut labels = labels_for("Paris Hilton");
    labels.add_to_type(Span::new("d", 0, 5), "LOC", None).unwrap();
    labels.add_to_type(Span::new("d", 0, 5), "PER", None).unwrap();
    labels.add_to_type(Span::new("d", 0, 12), "PER", None).unwrap();
    assert_eq!(
        markup_document_span("d", &labels).unwrap(),
        "<root><PER><overlap value=\"LOC,PER\">Paris</overlap> Hilton</PER></root>"
    );
}

#[test]
fn labels_in_other_documents_ignored() {
    let mut base = TextBase::new();
    base.add_document("a", "one two").unwrap();
    base.add_document("b", "three").unwrap();
    let mut labels = TextLabels::new(Arc::new(base));
    labels.add_to_type(Span::new("b", 0, 5), "N", None).unwrap();
    assert_eq!(
        markup_document_span("a", &labels).unwrap(),
        "<root>one two</root>"
    );
}

proptest! {
    #[test]
    fn markup_is_well_formed_and_lossless(
        text in "[a-c <>&é\n]{0,24}",
        spans in prop::collection::vec((0usize..30, 0usize..30, 0usize..3), 0..10),
    ) {
        let mut labels = labels_for(&text);
        let len = text.chars().count();
        for (a, b, t) in spans {
            let (lo, hi) = (a.min(b).min(len), a.max(b).min(len));
            labels
                .add_to_type(Span::new("d", lo, hi), ["A", "B", "C"][t], None)
                .unwrap();
        }
        let xml = markup_document_span("d", &labels).unwrap();
        let recovered = parse_text(&xml).map_err(|e| TestCaseError::fail(e))?;
        prop_assert!(xml.starts_with("<root>"));
        prop_assert!(xml.ends_with("</root>"));
        prop_assert_eq!(recovered, text);
    }
}
