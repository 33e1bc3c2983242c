//! Inline XML markup of one document.
//!
//! ```text
//! <root>Call <PERSON>Ada</PERSON> at <overlap value="ORG,PLACE">Kings</overlap>.</root>
//! ```
//!
//! Labels are sorted by start, longer first, then by type name. A label that
//! straddles one already accepted is dropped; nested labels are kept. Labels
//! with identical extent share one element: `<TYPE>` for one type,
//! `<overlap value="A,B">` for several. Document text is escaped, so stripping
//! the tags and un-escaping gives the document back.

use crate::{Error, Result, TextLabels};

/// Escape `&`, `<` and `>` for XML character data.
pub(crate) fn escape_text(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// True if `name` can be used as an element name.
pub(crate) fn is_xml_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.'))
}

pub(crate) fn check_type_name(type_name: &str) -> Result<()> {
    if is_xml_name(type_name) {
        Ok(())
    } else {
        Err(Error::invalid_input(format!(
            "type '{}' is not a valid XML element name",
            type_name
        )))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Label<'a> {
    lo: usize,
    hi: usize,
    type_name: &'a str,
}

impl Label<'_> {
    fn straddles(&self, other: &Label<'_>) -> bool {
        (self.lo < other.lo && other.lo < self.hi && self.hi < other.hi)
            || (other.lo < self.lo && self.lo < other.hi && other.hi < self.hi)
    }
}

/// Labels sharing one extent.
struct Element<'a> {
    lo: usize,
    hi: usize,
    types: Vec<&'a str>,
}

impl Element<'_> {
    fn open_tag(&self) -> String {
        match self.types.as_slice() {
            [single] => format!("<{}>", single),
            many => format!("<overlap value=\"{}\">", many.join(",")),
        }
    }

    fn close_tag(&self) -> String {
        match self.types.as_slice() {
            [single] => format!("</{}>", single),
            _ => "</overlap>".to_string(),
        }
    }
}

/// Render document `document_id` with its labels as inline XML.
///
/// # Errors
///
/// [`Error::InvalidInput`] for an unknown document or a type name that is
/// not a valid XML name.
///
/// # Example
///
/// ```
/// use spanlab::{markup_document_span, TextLabels};
/// use spanlab_core::{Span, TextBase};
/// use std::sync::Arc;
///
/// let mut base = TextBase::new();
/// base.add_document("d", "abcdef").unwrap();
/// let mut labels = TextLabels::new(Arc::new(base));
/// labels.add_to_type(Span::new("d", 1, 4), "X", None).unwrap();
/// labels.add_to_type(Span::new("d", 2, 5), "Y", None).unwrap();
///
/// assert_eq!(
///     markup_document_span("d", &labels).unwrap(),
///     "<root>a<X>bcd</X>ef</root>"
/// );
/// ```
pub fn markup_document_span(document_id: &str, labels: &TextLabels) -> Result<String> {
    let document = labels
        .text_base()
        .document(document_id)
        .ok_or_else(|| Error::invalid_input(format!("unknown document '{}'", document_id)))?;

    let mut candidates = Vec::new();
    for type_name in labels.types() {
        for span in labels.instances_in_document(type_name, document_id) {
            check_type_name(type_name)?;
            candidates.push(Label {
                lo: span.lo(),
                hi: span.hi(),
                type_name,
            });
        }
    }
    candidates.sort_by(|a, b| {
        a.lo.cmp(&b.lo)
            .then_with(|| b.hi.cmp(&a.hi))
            .then_with(|| a.type_name.cmp(b.type_name))
    });

    let mut accepted: Vec<Label<'_>> = Vec::with_capacity(candidates.len());
    for label in candidates {
        if let Some(other) = accepted.iter().find(|a| a.straddles(&label)) {
            log::debug!(
                "{}: dropping {} [{}..{}) straddling {} [{}..{})",
                document_id,
                label.type_name,
                label.lo,
                label.hi,
                other.type_name,
                other.lo,
                other.hi
            );
            continue;
        }
        accepted.push(label);
    }

    // Sort order keeps equal extents adjacent.
    let mut elements: Vec<Element<'_>> = Vec::new();
    for label in accepted {
        match elements.last_mut() {
            Some(el) if el.lo == label.lo && el.hi == label.hi => el.types.push(label.type_name),
            _ => elements.push(Element {
                lo: label.lo,
                hi: label.hi,
                types: vec![label.type_name],
            }),
        }
    }

    let text = |lo: usize, hi: usize| escape_text(document.slice(lo, hi).unwrap_or_default());
    let mut out = String::from("<root>");
    let mut pos = 0;
    let mut stack: Vec<&Element<'_>> = Vec::new();
    for el in &elements {
        while let Some(top) = stack.last() {
            if el.hi <= top.hi {
                break;
            }
            out.push_str(&text(pos, top.hi));
            out.push_str(&top.close_tag());
            pos = top.hi;
            stack.pop();
        }
        out.push_str(&text(pos, el.lo));
        out.push_str(&el.open_tag());
        pos = el.lo;
        stack.push(el);
    }
    while let Some(top) = stack.pop() {
        out.push_str(&text(pos, top.hi));
        out.push_str(&top.close_tag());
        pos = top.hi;
    }
    out.push_str(&text(pos, document.char_len()));
    out.push_str("</root>");
    Ok(out)
}
