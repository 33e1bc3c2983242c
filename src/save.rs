//! Writing a labeling back out.
//!
//! - [`save_types_as_ops`]: an operation log that [`crate::TextLabelsLoader`]
//!   reads back
//! - [`save_types_as_strings`]: one `TYPE<TAB>text` line per instance
//! - [`save_types_as_xml`]: a flat `<extractions>` listing
//!
//! Offsets are snapped to tokens: a span is written from the start of its
//! first overlapping token to the end of its last one. For whole-token spans
//! this is the span itself.

use spanlab_core::Span;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::markup::{check_type_name, escape_text};
use crate::ops::Operation;
use crate::{Error, Result, TextLabels};

/// Token-snapped `(lo, hi)` of `span`, or `None` if it covers no token.
fn token_extent(labels: &TextLabels, span: &Span) -> Option<(usize, usize)> {
    let tokens = labels.text_base().tokens_in(span);
    Some((tokens.first()?.lo, tokens.last()?.hi))
}

/// Token extent, falling back to the raw character range.
fn display_extent(labels: &TextLabels, span: &Span) -> (usize, usize) {
    token_extent(labels, span).unwrap_or((span.lo(), span.hi()))
}

fn as_i64(n: usize) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

/// Write `labels` as an operation log.
///
/// Per type, in name order: one `addToType` per instance (confidence
/// appended when it is not the default), then one `closeType` per closed
/// document. Then one `setSpanProperty` per (property, span). Spans covering
/// no token cannot be expressed in token offsets and are skipped with a
/// warning.
///
/// # Errors
///
/// [`Error::Unsupported`] if a type is closed over less than a whole
/// document; [`Error::Io`] if writing fails.
pub fn save_types_as_ops<W: Write>(labels: &TextLabels, out: &mut W) -> Result<()> {
    let base = labels.text_base();
    for type_name in labels.types() {
        for span in labels.instances(type_name) {
            let Some((lo, hi)) = token_extent(labels, span) else {
                log::warn!("forgetting label on empty span type {}: {}", type_name, span);
                continue;
            };
            let confidence = labels
                .details(span, type_name)
                .filter(|d| !d.is_default())
                .map(|d| d.confidence);
            let op = Operation::AddToType {
                document_id: span.document_id().to_string(),
                lo: as_i64(lo),
                len: as_i64(hi - lo),
                type_name: type_name.to_string(),
                confidence,
            };
            writeln!(out, "{}", op)?;
        }

        for span in labels.closures(type_name) {
            if base.document_span(span.document_id()).as_ref() != Some(span) {
                return Err(Error::unsupported(format!(
                    "can't save closure of {} over {}: closures must cover whole documents",
                    type_name, span
                )));
            }
            let op = Operation::CloseType {
                document_id: span.document_id().to_string(),
                type_name: type_name.to_string(),
            };
            writeln!(out, "{}", op)?;
        }
    }

    for prop in labels.span_properties() {
        for span in labels.spans_with_property(prop) {
            let Some((lo, hi)) = token_extent(labels, span) else {
                log::warn!("forgetting property {} on empty span: {}", prop, span);
                continue;
            };
            let op = Operation::SetSpanProperty {
                document_id: span.document_id().to_string(),
                lo: as_i64(lo),
                len: as_i64(hi - lo),
                prop: prop.to_string(),
                value: labels.property(span, prop).unwrap_or_default().to_string(),
            };
            writeln!(out, "{}", op)?;
        }
    }
    Ok(())
}

/// [`save_types_as_ops`] into a file.
///
/// # Errors
///
/// As [`save_types_as_ops`], plus [`Error::Io`] if the file cannot be created.
pub fn save_types_as_ops_to_file(labels: &TextLabels, path: impl AsRef<Path>) -> Result<()> {
    let mut out = BufWriter::new(File::create(path.as_ref())?);
    save_types_as_ops(labels, &mut out)?;
    out.flush()?;
    Ok(())
}

/// Write one line per (type, instance): `TYPE<TAB>text`, or
/// `TYPE:doc:lo:hi<TAB>text` with `include_offset`. Newlines in the text
/// become spaces.
///
/// # Errors
///
/// [`Error::Io`] if writing fails.
pub fn save_types_as_strings<W: Write>(
    labels: &TextLabels,
    out: &mut W,
    include_offset: bool,
) -> Result<()> {
    let base = labels.text_base();
    for type_name in labels.types() {
        for span in labels.instances(type_name) {
            write!(out, "{}", type_name)?;
            if include_offset {
                let (lo, hi) = display_extent(labels, span);
                write!(out, ":{}:{}:{}", span.document_id(), lo, hi)?;
            }
            let text = base.span_text(span).unwrap_or_default().replace('\n', " ");
            writeln!(out, "\t{}", text)?;
        }
    }
    Ok(())
}

/// [`save_types_as_strings`] into a file.
///
/// # Errors
///
/// [`Error::Io`] if the file cannot be created or written.
pub fn save_types_as_strings_to_file(
    labels: &TextLabels,
    path: impl AsRef<Path>,
    include_offset: bool,
) -> Result<()> {
    let mut out = BufWriter::new(File::create(path.as_ref())?);
    save_types_as_strings(labels, &mut out, include_offset)?;
    out.flush()?;
    Ok(())
}

/// Render every instance as a flat XML listing:
///
/// ```text
/// <extractions>
///   <PERSON doc="d1" lo="0" hi="3">Ada</PERSON>
/// </extractions>
/// ```
///
/// # Errors
///
/// [`Error::InvalidInput`] if a type name is not a valid XML name.
pub fn save_types_as_xml(labels: &TextLabels) -> Result<String> {
    let base = labels.text_base();
    let mut buf = String::from("<extractions>\n");
    for type_name in labels.types() {
        check_type_name(type_name)?;
        for span in labels.instances(type_name) {
            let (lo, hi) = display_extent(labels, span);
            buf.push_str(&format!(
                "  <{t} doc=\"{}\" lo=\"{}\" hi=\"{}\">{}</{t}>\n",
                escape_text(span.document_id()).replace('"', "&quot;"),
                lo,
                hi,
                escape_text(base.span_text(span).unwrap_or_default()),
                t = type_name,
            ));
        }
    }
    buf.push_str("</extractions>\n");
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::labels::Details;
    use spanlab_core::TextBase;
    use std::sync::Arc;

    fn labels() -> TextLabels {
        let mut base = TextBase::new();
        base.add_document("d1", "Ada met Bob\nin Paris").unwrap();
        base.add_document("d2", "  ").unwrap();
        TextLabels::new(Arc::new(base))
    }

    fn ops(labels: &TextLabels) -> Result<String> {
        let mut out = Vec::new();
        save_types_as_ops(labels, &mut out)?;
        Ok(String::from_utf8(out).unwrap())
    }

    #[test]
    fn ops_snap_to_tokens() {
        let mut l = labels();
        l.add_to_type(Span::new("d1", 0, 3), "PER", None).unwrap();
        // "et Bo" snaps to "met Bob"
        l.add_to_type(Span::new("d1", 5, 10), "PAIR", Some(Details::new(0.5)))
            .unwrap();
        l.add_to_type(Span::new("d1", 8, 11), "PER", Some(Details::default()))
            .unwrap();
        assert_eq!(
            ops(&l).unwrap(),
            "addToType d1 4 7 PAIR 0.5\naddToType d1 0 3 PER\naddToType d1 8 3 PER\n"
        );
    }

    #[test]
    fn ops_closures_and_properties() {
        let mut l = labels();
        l.add_to_type(Span::new("d1", 15, 20), "LOC", None).unwrap();
        let doc = l.text_base().document_span("d1").unwrap();
        l.close_type_inside("LOC", doc.clone()).unwrap();
        l.set_property(doc, "source", "gold").unwrap();
        assert_eq!(
            ops(&l).unwrap(),
            "addToType d1 15 5 LOC\ncloseType d1 LOC\nsetSpanProperty d1 0 20 source gold\n"
        );
    }

    #[test]
    fn partial_closure_unsupported() {
        let mut l = labels();
        l.close_type_inside("LOC", Span::new("d1", 0, 3)).unwrap();
        assert!(matches!(ops(&l), Err(Error::Unsupported(_))));
    }

    #[test]
    fn tokenless_spans_skipped() {
        let mut l = labels();
        l.add_to_type(Span::new("d2", 0, 2), "BLANK", None).unwrap();
        assert_eq!(ops(&l).unwrap(), "");
    }

    #[test]
    fn strings_with_and_without_offsets() {
        let mut l = labels();
        l.add_to_type(Span::new("d1", 8, 14), "X", None).unwrap();
        let mut plain = Vec::new();
        save_types_as_strings(&l, &mut plain, false).unwrap();
        assert_eq!(String::from_utf8(plain).unwrap(), "X\tBob in\n");

        let mut offsets = Vec::new();
        save_types_as_strings(&l, &mut offsets, true).unwrap();
        assert_eq!(String::from_utf8(offsets).unwrap(), "X:d1:8:14\tBob in\n");
    }

    #[test]
    fn xml_listing() {
        let mut l = labels();
        l.add_to_type(Span::new("d1", 0, 3), "PER", None).unwrap();
        assert_eq!(
            save_types_as_xml(&l).unwrap(),
            "<extractions>\n  <PER doc=\"d1\" lo=\"0\" hi=\"3\">Ada</PER>\n</extractions>\n"
        );

        l.add_to_type(Span::new("d1", 0, 3), "not ok", None).unwrap();
        assert!(matches!(save_types_as_xml(&l), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn files() {
        let dir = tempfile::tempdir().unwrap();
        let mut l = labels();
        l.add_to_type(Span::new("d1", 0, 3), "PER", None).unwrap();

        let ops_path = dir.path().join("out.ops");
        save_types_as_ops_to_file(&l, &ops_path).unwrap();
        assert_eq!(
            std::fs::read_to_string(&ops_path).unwrap(),
            "addToType d1 0 3 PER\n"
        );

        let strings_path = dir.path().join("out.txt");
        save_types_as_strings_to_file(&l, &strings_path, true).unwrap();
        assert_eq!(
            std::fs::read_to_string(&strings_path).unwrap(),
            "PER:d1:0:3\tAda\n"
        );
    }
}
