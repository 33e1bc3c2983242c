//! The TextLabels operation log.
//!
//! A line-oriented, replayable description of a labeling:
//!
//! ```text
//! # comment
//! setClosure CLOSE_BY_OPERATION
//! addToType doc17 42 8 PERSON
//! addToType doc17 42 8 PERSON 0.87
//! setSpanProperty doc17 0 -1 source gold
//! closeType doc17 PERSON
//! closeAllTypes doc17
//! ```
//!
//! `lo len` pairs are character offsets. `0 -1` is the whole document and
//! `lo -1` runs from `lo` to the end.
//!
//! [`Operation`] is the parsed form of one line; its `Display` writes the
//! same line back, so the reader and the writer in [`crate::save`] share a
//! grammar. [`TextLabelsLoader`] replays a whole log onto a labeling.

mod loader;

pub use loader::{
    ReplayStats, TextLabelsLoader, WarningEvent, WarningLimiter, DEFAULT_MAX_WARNINGS,
};

use std::fmt;
use std::str::SplitWhitespace;

use crate::closure::ClosurePolicy;
use crate::{Error, Result};

/// One parsed line of an operation log.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    /// `addToType docId lo len type [confidence]`
    AddToType {
        /// Document id
        document_id: String,
        /// Start offset
        lo: i64,
        /// Length, or negative for "to the end"
        len: i64,
        /// Type name
        type_name: String,
        /// Optional confidence
        confidence: Option<f64>,
    },
    /// `setSpanProperty docId lo len prop value`
    SetSpanProperty {
        /// Document id
        document_id: String,
        /// Start offset
        lo: i64,
        /// Length, or negative for "to the end"
        len: i64,
        /// Property name
        prop: String,
        /// Property value (a single token)
        value: String,
    },
    /// `closeType docId type`
    CloseType {
        /// Document id
        document_id: String,
        /// Type name
        type_name: String,
    },
    /// `closeAllTypes docId`
    CloseAllTypes {
        /// Document id
        document_id: String,
    },
    /// `setClosure policyName`
    SetClosure(ClosurePolicy),
}

/// Where a line came from, for error messages.
struct LineCursor<'a> {
    tokens: SplitWhitespace<'a>,
    file: &'a str,
    line: usize,
}

impl<'a> LineCursor<'a> {
    fn next(&mut self, what: &str) -> Result<&'a str> {
        self.tokens.next().ok_or_else(|| {
            Error::op(self.file, self.line, format!("failed to find token ({})", what))
        })
    }

    fn next_int(&mut self, what: &str) -> Result<i64> {
        let token = self.next(what)?;
        token.parse().map_err(|_| {
            Error::op(
                self.file,
                self.line,
                format!("bad number '{}' for {}", token, what),
            )
        })
    }

    /// Optional trailing real number.
    fn next_real_opt(&mut self, what: &str) -> Result<Option<f64>> {
        match self.tokens.next() {
            Some(token) => token.parse().map(Some).map_err(|_| {
                Error::op(
                    self.file,
                    self.line,
                    format!("bad number '{}' for {}", token, what),
                )
            }),
            None => Ok(None),
        }
    }
}

impl Operation {
    /// Parse one line of a log.
    ///
    /// Returns `Ok(None)` for blank lines and `#` comments. Tokens past the
    /// ones an operation needs are ignored.
    ///
    /// # Errors
    ///
    /// [`Error::Op`] naming `file` and `line_no` for unknown operations,
    /// missing tokens and bad numbers; [`Error::Config`] for an unknown
    /// closure policy.
    ///
    /// # Example
    ///
    /// ```
    /// use spanlab::ops::Operation;
    ///
    /// let op = Operation::parse_line("addToType d1 0 5 T 0.5", 1, "demo.ops")
    ///     .unwrap()
    ///     .unwrap();
    /// assert_eq!(op.to_string(), "addToType d1 0 5 T 0.5");
    /// assert!(Operation::parse_line("  # note", 2, "demo.ops").unwrap().is_none());
    /// ```
    pub fn parse_line(line: &str, line_no: usize, file: &str) -> Result<Option<Operation>> {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return Ok(None);
        }

        let mut cur = LineCursor {
            tokens: trimmed.split_whitespace(),
            file,
            line: line_no,
        };
        let op = cur.next("operation")?;

        let parsed = match op {
            "addToType" => {
                let document_id = cur.next("document id")?.to_string();
                let lo = cur.next_int("lo")?;
                let len = cur.next_int("len")?;
                let type_name = cur.next("type")?.to_string();
                let confidence = cur.next_real_opt("confidence")?;
                Operation::AddToType {
                    document_id,
                    lo,
                    len,
                    type_name,
                    confidence,
                }
            }
            "setSpanProperty" | "setSpanProp" => Operation::SetSpanProperty {
                document_id: cur.next("document id")?.to_string(),
                lo: cur.next_int("lo")?,
                len: cur.next_int("len")?,
                prop: cur.next("property")?.to_string(),
                value: cur.next("value")?.to_string(),
            },
            "closeType" => Operation::CloseType {
                document_id: cur.next("document id")?.to_string(),
                type_name: cur.next("type")?.to_string(),
            },
            op if op.eq_ignore_ascii_case("closeAllTypes") => Operation::CloseAllTypes {
                document_id: cur.next("document id")?.to_string(),
            },
            "setClosure" => Operation::SetClosure(cur.next("closure policy")?.parse()?),
            other => {
                return Err(Error::op(
                    file,
                    line_no,
                    format!("unknown operation '{}'", other),
                ))
            }
        };

        if cur.tokens.next().is_some() {
            log::debug!("{}:{}: ignoring trailing tokens", file, line_no);
        }
        Ok(Some(parsed))
    }

    /// Document the operation applies to, if any.
    #[must_use]
    pub fn document_id(&self) -> Option<&str> {
        match self {
            Operation::AddToType { document_id, .. }
            | Operation::SetSpanProperty { document_id, .. }
            | Operation::CloseType { document_id, .. }
            | Operation::CloseAllTypes { document_id } => Some(document_id),
            Operation::SetClosure(_) => None,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::AddToType {
                document_id,
                lo,
                len,
                type_name,
                confidence,
            } => {
                write!(f, "addToType {} {} {} {}", document_id, lo, len, type_name)?;
                if let Some(c) = confidence {
                    write!(f, " {}", c)?;
                }
                Ok(())
            }
            Operation::SetSpanProperty {
                document_id,
                lo,
                len,
                prop,
                value,
            } => write!(
                f,
                "setSpanProperty {} {} {} {} {}",
                document_id, lo, len, prop, value
            ),
            Operation::CloseType {
                document_id,
                type_name,
            } => write!(f, "closeType {} {}", document_id, type_name),
            Operation::CloseAllTypes { document_id } => write!(f, "closeAllTypes {}", document_id),
            Operation::SetClosure(policy) => write!(f, "setClosure {}", policy),
        }
    }
}
