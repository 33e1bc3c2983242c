//! Span-level labelings over a [`TextBase`].
//!
//! A [`TextLabels`] records three things about a corpus:
//!
//! ```text
//! types       PERSON  -> { d1[0..9), d3[4..12) }      positive instances
//! properties  source  -> { d1[0..40) = "gold" }       span -> string
//! closures    PERSON  -> { d1[0..40) }                exhaustively labeled regions
//! ```
//!
//! Closures make the labeling three-valued. Inside a closed region every span
//! that is not a positive instance is a confirmed negative; outside, absence
//! means nothing. See [`TextLabels::label_status`].

use serde::{Deserialize, Serialize};
use spanlab_core::{Span, TextBase};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use crate::{Error, Result};

/// Per-annotation metadata.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Details {
    /// Confidence attached by whoever produced the label.
    pub confidence: f64,
}

impl Details {
    /// Details with the given confidence.
    #[must_use]
    pub const fn new(confidence: f64) -> Self {
        Self { confidence }
    }

    /// True for the default details, which serializers leave implicit.
    #[must_use]
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

impl Default for Details {
    fn default() -> Self {
        Self { confidence: 1.0 }
    }
}

/// What a labeling knows about one (span, type) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LabelStatus {
    /// The span is an instance of the type.
    Positive,
    /// The span lies in a region closed for the type and is not an instance.
    Negative,
    /// Nothing is known.
    Unknown,
}

/// A mutable labeling attached to an immutable corpus.
///
/// Several labelings can share one `Arc<TextBase>`. Every map is ordered, so
/// iteration (and therefore serialization) is deterministic.
///
/// # Example
///
/// ```
/// use spanlab::{TextLabels, LabelStatus};
/// use spanlab_core::{Span, TextBase};
/// use std::sync::Arc;
///
/// let mut base = TextBase::new();
/// base.add_document("d1", "Ada met Alan").unwrap();
/// let mut labels = TextLabels::new(Arc::new(base));
///
/// labels.add_to_type(Span::new("d1", 0, 3), "PERSON", None).unwrap();
/// let doc = labels.text_base().document_span("d1").unwrap();
/// labels.close_type_inside("PERSON", doc).unwrap();
///
/// assert_eq!(labels.label_status(&Span::new("d1", 0, 3), "PERSON"), LabelStatus::Positive);
/// assert_eq!(labels.label_status(&Span::new("d1", 4, 7), "PERSON"), LabelStatus::Negative);
/// ```
#[derive(Debug, Clone)]
pub struct TextLabels {
    base: Arc<TextBase>,
    types: BTreeMap<String, BTreeMap<Span, Option<Details>>>,
    properties: BTreeMap<String, BTreeMap<Span, String>>,
    closures: BTreeMap<String, BTreeSet<Span>>,
}

impl TextLabels {
    /// Create an empty labeling over `base`.
    #[must_use]
    pub fn new(base: Arc<TextBase>) -> Self {
        Self {
            base,
            types: BTreeMap::new(),
            properties: BTreeMap::new(),
            closures: BTreeMap::new(),
        }
    }

    /// The corpus this labeling is attached to.
    #[must_use]
    pub fn text_base(&self) -> &Arc<TextBase> {
        &self.base
    }

    fn check_span(&self, span: &Span) -> Result<()> {
        if self.base.contains_span(span) {
            Ok(())
        } else {
            Err(Error::invalid_input(format!(
                "{} is not inside any document of the text base",
                span
            )))
        }
    }

    /// Add `span` as a positive instance of `type_name`.
    ///
    /// Adding an existing instance again replaces its details.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if the span is not inside a document.
    pub fn add_to_type(
        &mut self,
        span: Span,
        type_name: &str,
        details: Option<Details>,
    ) -> Result<()> {
        self.check_span(&span)?;
        self.types
            .entry(type_name.to_string())
            .or_default()
            .insert(span, details);
        Ok(())
    }

    /// Register `type_name` without adding instances.
    pub fn declare_type(&mut self, type_name: &str) {
        self.types.entry(type_name.to_string()).or_default();
    }

    /// Set property `prop` of `span` to `value`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if the span is not inside a document.
    pub fn set_property(&mut self, span: Span, prop: &str, value: &str) -> Result<()> {
        self.check_span(&span)?;
        self.properties
            .entry(prop.to_string())
            .or_default()
            .insert(span, value.to_string());
        Ok(())
    }

    /// Declare the labeling of `type_name` exhaustive inside `span`.
    ///
    /// Existing instances are kept. The type is registered if it was not yet.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if the span is not inside a document.
    pub fn close_type_inside(&mut self, type_name: &str, span: Span) -> Result<()> {
        self.check_span(&span)?;
        self.declare_type(type_name);
        self.closures
            .entry(type_name.to_string())
            .or_default()
            .insert(span);
        Ok(())
    }

    /// All types, sorted.
    pub fn types(&self) -> impl Iterator<Item = &str> + '_ {
        self.types.keys().map(String::as_str)
    }

    /// True if `type_name` has been registered.
    #[must_use]
    pub fn has_type(&self, type_name: &str) -> bool {
        self.types.contains_key(type_name)
    }

    /// Positive instances of `type_name`, in span order.
    pub fn instances<'a>(&'a self, type_name: &str) -> impl Iterator<Item = &'a Span> + 'a {
        self.types
            .get(type_name)
            .into_iter()
            .flat_map(|spans| spans.keys())
    }

    /// Positive instances of `type_name` inside document `document_id`.
    pub fn instances_in_document<'a>(
        &'a self,
        type_name: &str,
        document_id: &str,
    ) -> impl Iterator<Item = &'a Span> + 'a {
        let lo = Span::new(document_id, 0, 0);
        let hi = Span::new(document_id, usize::MAX, usize::MAX);
        self.types
            .get(type_name)
            .into_iter()
            .flat_map(move |spans| spans.range(lo.clone()..=hi.clone()).map(|(s, _)| s))
    }

    /// Total number of positive instances across all types.
    #[must_use]
    pub fn instance_count(&self) -> usize {
        self.types.values().map(BTreeMap::len).sum()
    }

    /// Details stored with an instance, if any.
    #[must_use]
    pub fn details(&self, span: &Span, type_name: &str) -> Option<&Details> {
        self.types.get(type_name)?.get(span)?.as_ref()
    }

    /// True if `span` is a positive instance of `type_name`.
    #[must_use]
    pub fn has_instance(&self, span: &Span, type_name: &str) -> bool {
        self.types
            .get(type_name)
            .is_some_and(|spans| spans.contains_key(span))
    }

    /// Value of property `prop` on `span`.
    #[must_use]
    pub fn property(&self, span: &Span, prop: &str) -> Option<&str> {
        self.properties.get(prop)?.get(span).map(String::as_str)
    }

    /// All property names, sorted.
    pub fn span_properties(&self) -> impl Iterator<Item = &str> + '_ {
        self.properties.keys().map(String::as_str)
    }

    /// Spans carrying property `prop`, in span order.
    pub fn spans_with_property<'a>(&'a self, prop: &str) -> impl Iterator<Item = &'a Span> + 'a {
        self.properties
            .get(prop)
            .into_iter()
            .flat_map(|spans| spans.keys())
    }

    /// Closure spans of `type_name`, in span order.
    pub fn closures<'a>(&'a self, type_name: &str) -> impl Iterator<Item = &'a Span> + 'a {
        self.closures
            .get(type_name)
            .into_iter()
            .flat_map(|spans| spans.iter())
    }

    /// True if `type_name` is closed over the whole of document `document_id`.
    #[must_use]
    pub fn is_closed(&self, type_name: &str, document_id: &str) -> bool {
        match self.base.document_span(document_id) {
            Some(doc) => self
                .closures
                .get(type_name)
                .is_some_and(|spans| spans.contains(&doc)),
            None => false,
        }
    }

    /// Three-valued status of `span` with respect to `type_name`.
    #[must_use]
    pub fn label_status(&self, span: &Span, type_name: &str) -> LabelStatus {
        if self.has_instance(span, type_name) {
            LabelStatus::Positive
        } else if self.closures(type_name).any(|c| c.contains(span)) {
            LabelStatus::Negative
        } else {
            LabelStatus::Unknown
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels() -> TextLabels {
        let mut base = TextBase::new();
        base.add_document("d1", "0123456789").unwrap();
        base.add_document("d2", "abcdefghij").unwrap();
        TextLabels::new(Arc::new(base))
    }

    #[test]
    fn add_and_query() {
        let mut l = labels();
        l.add_to_type(Span::new("d1", 0, 5), "T", None).unwrap();
        l.add_to_type(Span::new("d2", 1, 2), "T", Some(Details::new(0.5)))
            .unwrap();
        l.add_to_type(Span::new("d1", 3, 4), "U", None).unwrap();

        assert_eq!(l.types().collect::<Vec<_>>(), vec!["T", "U"]);
        assert_eq!(l.instances("T").count(), 2);
        assert_eq!(l.instances("missing").count(), 0);
        assert_eq!(l.instances_in_document("T", "d2").count(), 1);
        assert_eq!(l.instance_count(), 3);
        assert_eq!(
            l.details(&Span::new("d2", 1, 2), "T"),
            Some(&Details::new(0.5))
        );
        assert_eq!(l.details(&Span::new("d1", 0, 5), "T"), None);
    }

    #[test]
    fn rejects_spans_outside_documents() {
        let mut l = labels();
        assert!(l.add_to_type(Span::new("d1", 5, 11), "T", None).is_err());
        assert!(l.add_to_type(Span::new("nope", 0, 1), "T", None).is_err());
        assert!(l.set_property(Span::new("nope", 0, 1), "p", "v").is_err());
    }

    #[test]
    fn closing_keeps_positives() {
        let mut l = labels();
        let inst = Span::new("d1", 0, 5);
        l.add_to_type(inst.clone(), "T", None).unwrap();
        l.close_type_inside("T", l.text_base().document_span("d1").unwrap())
            .unwrap();
        assert!(l.has_instance(&inst, "T"));
        assert!(l.is_closed("T", "d1"));
        assert!(!l.is_closed("T", "d2"));
    }

    #[test]
    fn three_valued_status() {
        let mut l = labels();
        l.add_to_type(Span::new("d1", 0, 5), "T", None).unwrap();
        l.close_type_inside("T", Span::new("d1", 0, 10)).unwrap();
        assert_eq!(
            l.label_status(&Span::new("d1", 0, 5), "T"),
            LabelStatus::Positive
        );
        assert_eq!(
            l.label_status(&Span::new("d1", 6, 8), "T"),
            LabelStatus::Negative
        );
        assert_eq!(
            l.label_status(&Span::new("d2", 6, 8), "T"),
            LabelStatus::Unknown
        );
        assert_eq!(
            l.label_status(&Span::new("d1", 6, 8), "U"),
            LabelStatus::Unknown
        );
    }

    #[test]
    fn properties_and_types_are_separate() {
        let mut l = labels();
        let span = Span::new("d1", 0, 10);
        l.set_property(span.clone(), "T", "gold").unwrap();
        assert!(!l.has_type("T"));
        assert_eq!(l.property(&span, "T"), Some("gold"));
        assert_eq!(l.span_properties().collect::<Vec<_>>(), vec!["T"]);
        assert_eq!(l.spans_with_property("T").count(), 1);
    }

    #[test]
    fn closing_registers_type() {
        let mut l = labels();
        l.close_type_inside("EMPTY", Span::new("d2", 0, 10)).unwrap();
        assert!(l.has_type("EMPTY"));
        assert_eq!(l.instances("EMPTY").count(), 0);
    }
}
