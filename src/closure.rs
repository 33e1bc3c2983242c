//! Closure policies: which (document, type) pairs count as exhaustively labeled.
//!
//! | policy | after replay |
//! |--------|--------------|
//! | `CLOSE_ALL_TYPES` | every type closed on every document |
//! | `CLOSE_TYPES_IN_LABELED_DOCS` | every type closed on documents holding at least one instance of it |
//! | `DONT_CLOSE_TYPES` | nothing |
//! | `CLOSE_BY_OPERATION` | only what `closeType` / `closeAllTypes` asked for |
//!
//! All policies are idempotent: closure sets are sets.

use serde::{Deserialize, Serialize};
use spanlab_core::Span;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::{Error, Result, TextLabels};

/// How a labeling is closed once an operation log has been replayed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClosurePolicy {
    /// Close every type on every document.
    #[serde(rename = "CLOSE_ALL_TYPES")]
    CloseAllTypes,
    /// Close each type on the documents that contain one of its instances.
    #[serde(rename = "CLOSE_TYPES_IN_LABELED_DOCS")]
    CloseTypesInLabeledDocs,
    /// Make no closure assumptions.
    #[serde(rename = "DONT_CLOSE_TYPES")]
    DontCloseTypes,
    /// Close only where the log says so.
    #[default]
    #[serde(rename = "CLOSE_BY_OPERATION")]
    CloseByOperation,
}

impl ClosurePolicy {
    /// All policies, in declaration order.
    pub const ALL: [ClosurePolicy; 4] = [
        ClosurePolicy::CloseAllTypes,
        ClosurePolicy::CloseTypesInLabeledDocs,
        ClosurePolicy::DontCloseTypes,
        ClosurePolicy::CloseByOperation,
    ];

    /// Name used in operation logs and config files.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            ClosurePolicy::CloseAllTypes => "CLOSE_ALL_TYPES",
            ClosurePolicy::CloseTypesInLabeledDocs => "CLOSE_TYPES_IN_LABELED_DOCS",
            ClosurePolicy::DontCloseTypes => "DONT_CLOSE_TYPES",
            ClosurePolicy::CloseByOperation => "CLOSE_BY_OPERATION",
        }
    }
}

impl fmt::Display for ClosurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClosurePolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| {
                Error::config(format!(
                    "unknown closure policy '{}' (expected one of {})",
                    s,
                    Self::ALL.map(|p| p.as_str()).join(", ")
                ))
            })
    }
}

/// Close every type currently in `labels` on `document`.
///
/// # Errors
///
/// Fails if `document` is not part of the labeling's text base.
pub fn close_types_on_document(labels: &mut TextLabels, document: &Span) -> Result<()> {
    let types: Vec<String> = labels.types().map(str::to_string).collect();
    for type_name in &types {
        labels.close_type_inside(type_name, document.clone())?;
    }
    Ok(())
}

/// Apply `policy` to every document and type of `labels`.
///
/// For finer control close individual documents with
/// [`close_types_on_document`] or [`TextLabels::close_type_inside`].
///
/// # Errors
///
/// Only fails if the labeling holds spans outside its own text base.
pub fn close_labels(labels: &mut TextLabels, policy: ClosurePolicy) -> Result<()> {
    match policy {
        ClosurePolicy::CloseAllTypes => {
            let documents: Vec<Span> = labels.text_base().document_spans().collect();
            for document in &documents {
                close_types_on_document(labels, document)?;
            }
        }
        ClosurePolicy::CloseTypesInLabeledDocs => {
            let types: Vec<String> = labels.types().map(str::to_string).collect();
            let mut labeled: BTreeSet<(String, String)> = BTreeSet::new();
            for type_name in &types {
                for span in labels.instances(type_name) {
                    labeled.insert((type_name.clone(), span.document_id().to_string()));
                }
            }
            for (type_name, document_id) in labeled {
                if let Some(document) = labels.text_base().document_span(&document_id) {
                    labels.close_type_inside(&type_name, document)?;
                }
            }
        }
        ClosurePolicy::DontCloseTypes | ClosurePolicy::CloseByOperation => {}
    }
    log::debug!("applied closure policy {}", policy);
    Ok(())
}
