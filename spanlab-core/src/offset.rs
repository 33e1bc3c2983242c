//! Character/byte offset conversion.
//!
//! Spans count characters, Rust strings index bytes:
//!
//! ```text
//! Text:   "café ok"
//! chars:   c a f é _ o k
//!          0 1 2 3 4 5 6
//! bytes:   0 1 2 3-4 5 6 7
//!                └2┘
//! ```
//!
//! Slicing `&text[3..4]` would panic in the middle of `é`. Everything that
//! turns a [`crate::Span`] into text goes through this module.

/// Number of characters in `text`.
#[must_use]
pub fn char_len(text: &str) -> usize {
    if text.is_ascii() {
        text.len()
    } else {
        text.chars().count()
    }
}

/// Precomputed char → byte table for one text.
///
/// Documents are sliced many times (markup, serialization), so the table is
/// built once. ASCII text needs no table at all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct CharIndex {
    /// `char_to_byte[i]` is the byte offset of char `i`; one extra entry for the end.
    /// Empty when the text is ASCII.
    char_to_byte: Vec<usize>,
}

impl CharIndex {
    pub(crate) fn new(text: &str) -> Self {
        if text.is_ascii() {
            return Self::default();
        }
        let mut char_to_byte: Vec<usize> = text.char_indices().map(|(b, _)| b).collect();
        char_to_byte.push(text.len());
        Self { char_to_byte }
    }

    /// Byte offset of char `idx`. `idx` must be at most the char length.
    pub(crate) fn byte(&self, idx: usize) -> usize {
        if self.char_to_byte.is_empty() {
            idx
        } else {
            self.char_to_byte[idx]
        }
    }
}
