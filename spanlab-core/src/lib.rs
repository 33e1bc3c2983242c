//! # spanlab-core
//!
//! Corpus model shared by the spanlab crates.
//!
//! - **Spans**: [`Span`], a half-open character range inside one document
//! - **Documents**: [`Document`], immutable text plus its tokenization
//! - **Corpus**: [`TextBase`], the read-only document store labelings attach to
//!
//! Offsets are character offsets throughout. The [`offset`] module converts
//! them to byte offsets when text has to be sliced.

pub mod error;
pub mod offset;
pub mod span;
pub mod text_base;

pub use error::{Error, Result};
pub use offset::char_len;
pub use span::Span;
pub use text_base::{Document, TextBase, Token};
