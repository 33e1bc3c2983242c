//! Character spans over documents.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::{Error, Result};

/// A contiguous region of one document.
///
/// Offsets are character offsets, half-open: `[lo, hi)`. A span does not own
/// its text; resolve it against the [`crate::TextBase`] it came from with
/// [`crate::TextBase::span_text`].
///
/// Spans order by `(document_id, lo, hi)`, which is the order every
/// serializer in spanlab writes them in.
///
/// # Example
///
/// ```
/// use spanlab_core::Span;
///
/// let doc = Span::new("d1", 0, 10);
/// let sub = doc.char_index_sub_span(2, 5).unwrap();
/// assert_eq!((sub.lo(), sub.hi()), (2, 5));
/// assert!(doc.contains(&sub));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Span {
    document_id: Arc<str>,
    lo: usize,
    hi: usize,
}

impl Span {
    /// Create a span. `hi` is clamped up to `lo`.
    #[must_use]
    pub fn new(document_id: impl Into<Arc<str>>, lo: usize, hi: usize) -> Self {
        Self {
            document_id: document_id.into(),
            lo,
            hi: hi.max(lo),
        }
    }

    /// Id of the document this span lies in.
    #[must_use]
    pub fn document_id(&self) -> &str {
        &self.document_id
    }

    /// Start offset (inclusive, characters).
    #[must_use]
    pub const fn lo(&self) -> usize {
        self.lo
    }

    /// End offset (exclusive, characters).
    #[must_use]
    pub const fn hi(&self) -> usize {
        self.hi
    }

    /// Length in characters.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.hi - self.lo
    }

    /// True for zero-length spans.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.hi == self.lo
    }

    /// Sub-span `[lo, hi)` with offsets relative to this span's start.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfBounds`] if `lo > hi` or `hi` runs past this span.
    pub fn char_index_sub_span(&self, lo: usize, hi: usize) -> Result<Span> {
        if lo > hi || hi > self.len() {
            return Err(Error::out_of_bounds(format!(
                "[{}, {}) is not inside {} (length {})",
                lo,
                hi,
                self,
                self.len()
            )));
        }
        Ok(Span {
            document_id: Arc::clone(&self.document_id),
            lo: self.lo + lo,
            hi: self.lo + hi,
        })
    }

    /// True if `other` lies entirely inside this span, in the same document.
    #[must_use]
    pub fn contains(&self, other: &Span) -> bool {
        self.document_id == other.document_id && self.lo <= other.lo && other.hi <= self.hi
    }

    /// True if the two spans share at least one character.
    #[must_use]
    pub fn overlaps(&self, other: &Span) -> bool {
        self.document_id == other.document_id && self.lo < other.hi && other.lo < self.hi
    }

    /// True if the spans partially overlap: neither nested nor disjoint.
    #[must_use]
    pub fn straddles(&self, other: &Span) -> bool {
        self.overlaps(other) && !self.contains(other) && !other.contains(self)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}..{})", self.document_id, self.lo, self.hi)
    }
}
