//! The document store labelings are attached to.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use crate::offset::{char_len, CharIndex};
use crate::{Error, Result, Span};

/// Runs of digits, runs of letters, or any other single visible character.
static TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[0-9]+|[^\W\d_]+|\S").expect("token regex is valid"));

/// One token of a document, as a character range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Token {
    /// Start offset (inclusive, characters)
    pub lo: usize,
    /// End offset (exclusive, characters)
    pub hi: usize,
}

/// An immutable, tokenized document.
#[derive(Debug, Clone)]
pub struct Document {
    id: Arc<str>,
    text: String,
    char_len: usize,
    tokens: Vec<Token>,
    index: CharIndex,
}

impl Document {
    /// Tokenize `text` into a document called `id`.
    #[must_use]
    pub fn new(id: impl Into<Arc<str>>, text: impl Into<String>) -> Self {
        let text = text.into();
        let index = CharIndex::new(&text);
        let tokens = tokenize(&text);
        Self {
            id: id.into(),
            char_len: char_len(&text),
            text,
            tokens,
            index,
        }
    }

    /// Document id.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Full document text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Length in characters.
    #[must_use]
    pub fn char_len(&self) -> usize {
        self.char_len
    }

    /// Tokens in document order.
    #[must_use]
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// The span covering the whole document.
    #[must_use]
    pub fn span(&self) -> Span {
        Span::new(Arc::clone(&self.id), 0, self.char_len)
    }

    /// Text of the character range `[lo, hi)`, or `None` if it runs past the end.
    #[must_use]
    pub fn slice(&self, lo: usize, hi: usize) -> Option<&str> {
        if lo > hi || hi > self.char_len {
            return None;
        }
        Some(&self.text[self.index.byte(lo)..self.index.byte(hi)])
    }
}

fn tokenize(text: &str) -> Vec<Token> {
    let byte_to_char: Option<Vec<usize>> = if text.is_ascii() {
        None
    } else {
        let mut map = vec![0usize; text.len() + 1];
        let mut count = 0;
        for (byte_idx, ch) in text.char_indices() {
            for slot in &mut map[byte_idx..byte_idx + ch.len_utf8()] {
                *slot = count;
            }
            count += 1;
        }
        map[text.len()] = count;
        Some(map)
    };
    let to_char = |b: usize| byte_to_char.as_ref().map_or(b, |m| m[b]);

    TOKEN
        .find_iter(text)
        .map(|m| Token {
            lo: to_char(m.start()),
            hi: to_char(m.end()),
        })
        .collect()
}

/// Read-only collection of documents, keyed and iterated by id.
///
/// Built once, then shared (usually behind an `Arc`) by every labeling over
/// the same corpus.
///
/// # Example
///
/// ```
/// use spanlab_core::TextBase;
///
/// let mut base = TextBase::new();
/// base.add_document("d1", "Mr. Smith went home").unwrap();
/// let span = base.document_span("d1").unwrap();
/// assert_eq!(base.span_text(&span), Some("Mr. Smith went home"));
/// assert!(base.document_span("nope").is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct TextBase {
    documents: BTreeMap<Arc<str>, Document>,
}

impl TextBase {
    /// Create an empty text base.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateDocument`] if `id` is already present.
    pub fn add_document(&mut self, id: &str, text: impl Into<String>) -> Result<()> {
        if self.documents.contains_key(id) {
            return Err(Error::DuplicateDocument(id.to_string()));
        }
        let id: Arc<str> = Arc::from(id);
        self.documents
            .insert(Arc::clone(&id), Document::new(id, text));
        Ok(())
    }

    /// Load every regular file in `dir` as a document named after the file.
    ///
    /// # Errors
    ///
    /// Fails on unreadable directories or files that are not UTF-8.
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let mut base = Self::new();
        let mut paths = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.is_file() {
                paths.push(path);
            }
        }
        paths.sort();
        for path in paths {
            let id = match path.file_name() {
                Some(name) => name.to_string_lossy().into_owned(),
                None => continue,
            };
            let text = fs::read_to_string(&path).map_err(|e| {
                Error::invalid_input(format!("failed to read {}: {}", path.display(), e))
            })?;
            base.add_document(&id, text)?;
        }
        log::debug!("loaded {} documents from {}", base.len(), dir.display());
        Ok(base)
    }

    /// Number of documents.
    #[must_use]
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// True if there are no documents.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Look up a document.
    #[must_use]
    pub fn document(&self, id: &str) -> Option<&Document> {
        self.documents.get(id)
    }

    /// Span covering document `id`, or `None` for unknown ids.
    #[must_use]
    pub fn document_span(&self, id: &str) -> Option<Span> {
        self.documents.get(id).map(Document::span)
    }

    /// Whole-document spans, in id order.
    pub fn document_spans(&self) -> impl Iterator<Item = Span> + '_ {
        self.documents.values().map(Document::span)
    }

    /// Text covered by `span`, or `None` if the span does not fit the base.
    #[must_use]
    pub fn span_text(&self, span: &Span) -> Option<&str> {
        self.documents
            .get(span.document_id())?
            .slice(span.lo(), span.hi())
    }

    /// True if `span` lies inside a document of this base.
    #[must_use]
    pub fn contains_span(&self, span: &Span) -> bool {
        self.documents
            .get(span.document_id())
            .is_some_and(|doc| span.hi() <= doc.char_len())
    }

    /// Tokens overlapping `span`. Empty spans and unknown documents have none.
    #[must_use]
    pub fn tokens_in(&self, span: &Span) -> &[Token] {
        if span.is_empty() {
            return &[];
        }
        let Some(doc) = self.documents.get(span.document_id()) else {
            return &[];
        };
        let tokens = doc.tokens();
        let first = tokens.partition_point(|t| t.hi <= span.lo());
        let last = tokens.partition_point(|t| t.lo < span.hi());
        if first >= last {
            &[]
        } else {
            &tokens[first..last]
        }
    }
}
