//! Replaying operation logs onto labelings.

use spanlab_core::{Span, TextBase};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::Arc;

use super::Operation;
use crate::closure::{close_labels, close_types_on_document, ClosurePolicy};
use crate::config::LoaderConfig;
use crate::labels::Details;
use crate::{Error, Result, TextLabels};

/// Unknown-document warnings emitted before going quiet.
pub const DEFAULT_MAX_WARNINGS: usize = 10;

/// What a [`WarningLimiter`] did with one warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningEvent {
    /// Logged as is.
    Emitted,
    /// Replaced by the "no more warnings" notice.
    Final,
    /// Dropped.
    Suppressed,
}

/// Rate limiter for one kind of warning.
///
/// The first `max - 1` warnings are logged, the `max`-th is replaced by a
/// notice that no more will follow, the rest are silent.
#[derive(Debug, Clone)]
pub struct WarningLimiter {
    count: usize,
    max: usize,
}

impl WarningLimiter {
    /// Limiter allowing `max` warnings (the last being the notice).
    #[must_use]
    pub fn new(max: usize) -> Self {
        Self { count: 0, max }
    }

    /// Record one warning, logging it if the budget allows.
    pub fn warn(&mut self, message: impl FnOnce() -> String) -> WarningEvent {
        self.count += 1;
        if self.count < self.max {
            log::warn!("{}", message());
            WarningEvent::Emitted
        } else if self.count == self.max {
            log::warn!("there will be no more warnings of this sort given");
            WarningEvent::Final
        } else {
            WarningEvent::Suppressed
        }
    }

    /// Warnings recorded so far, logged or not.
    #[must_use]
    pub fn count(&self) -> usize {
        self.count
    }
}

/// Summary of one replay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplayStats {
    /// Operations read (comments and blank lines excluded).
    pub operations: usize,
    /// Operations skipped because their document was unknown.
    pub skipped: usize,
    /// Unknown-document warnings raised, including suppressed ones.
    pub warnings: usize,
    /// Closure policy in force when the replay finished.
    pub policy: ClosurePolicy,
}

/// Loads labelings from operation logs.
///
/// The loader itself only holds defaults. Each import gets fresh replay
/// state: `setClosure` lines and the warning budget affect that replay alone.
///
/// # Example
///
/// ```
/// use spanlab::ops::TextLabelsLoader;
/// use spanlab::TextLabels;
/// use spanlab_core::{Span, TextBase};
/// use std::sync::Arc;
///
/// let mut base = TextBase::new();
/// base.add_document("d1", "0123456789").unwrap();
/// let mut labels = TextLabels::new(Arc::new(base));
///
/// let log = "addToType d1 0 5 T\ncloseAllTypes d1\n";
/// TextLabelsLoader::new()
///     .import_ops_str(&mut labels, log, "inline")
///     .unwrap();
///
/// assert!(labels.has_instance(&Span::new("d1", 0, 5), "T"));
/// assert!(labels.is_closed("T", "d1"));
/// ```
#[derive(Debug, Clone)]
pub struct TextLabelsLoader {
    policy: ClosurePolicy,
    max_warnings: usize,
}

impl Default for TextLabelsLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl TextLabelsLoader {
    /// Loader with the `CLOSE_BY_OPERATION` policy.
    #[must_use]
    pub fn new() -> Self {
        Self {
            policy: ClosurePolicy::default(),
            max_warnings: DEFAULT_MAX_WARNINGS,
        }
    }

    /// Loader configured from a [`LoaderConfig`].
    #[must_use]
    pub fn from_config(config: &LoaderConfig) -> Self {
        Self {
            policy: config.closure_policy,
            max_warnings: config.max_warnings,
        }
    }

    /// Set the closure policy replays start with.
    #[must_use]
    pub fn with_closure_policy(mut self, policy: ClosurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Set the unknown-document warning budget.
    #[must_use]
    pub fn with_max_warnings(mut self, max_warnings: usize) -> Self {
        self.max_warnings = max_warnings;
        self
    }

    /// Closure policy replays start with.
    #[must_use]
    pub fn closure_policy(&self) -> ClosurePolicy {
        self.policy
    }

    /// Create a labeling over `base` and replay the log at `path` onto it.
    ///
    /// # Errors
    ///
    /// See [`TextLabelsLoader::import_ops_from`].
    pub fn load_ops(&self, base: Arc<TextBase>, path: impl AsRef<Path>) -> Result<TextLabels> {
        let mut labels = TextLabels::new(base);
        self.import_ops(&mut labels, path)?;
        Ok(labels)
    }

    /// Replay the log at `path` onto `labels`.
    ///
    /// # Errors
    ///
    /// See [`TextLabelsLoader::import_ops_from`].
    pub fn import_ops(&self, labels: &mut TextLabels, path: impl AsRef<Path>) -> Result<ReplayStats> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        self.import_ops_from(labels, BufReader::new(file), &name)
    }

    /// Replay an in-memory log onto `labels`.
    ///
    /// # Errors
    ///
    /// See [`TextLabelsLoader::import_ops_from`].
    pub fn import_ops_str(
        &self,
        labels: &mut TextLabels,
        log: &str,
        file_name: &str,
    ) -> Result<ReplayStats> {
        self.import_ops_from(labels, log.as_bytes(), file_name)
    }

    /// Replay a log read from `reader` onto `labels`.
    ///
    /// Operations take effect in file order. Afterwards the documents queued
    /// by `closeAllTypes` are closed for every type in the labeling, then the
    /// active closure policy is applied. Operations on unknown documents are
    /// skipped with a rate-limited warning.
    ///
    /// Replay is not transactional: on error `labels` keeps whatever was
    /// applied before the failing line.
    ///
    /// # Errors
    ///
    /// [`Error::Op`] (naming `file_name` and the line) for malformed lines and
    /// spans outside their document, [`Error::Config`] for unknown closure
    /// policies, [`Error::Io`] for read failures.
    pub fn import_ops_from<R: BufRead>(
        &self,
        labels: &mut TextLabels,
        reader: R,
        file_name: &str,
    ) -> Result<ReplayStats> {
        let mut replay = Replay {
            base: Arc::clone(labels.text_base()),
            labels,
            file: file_name,
            policy: self.policy,
            warnings: WarningLimiter::new(self.max_warnings),
            queued: Vec::new(),
            operations: 0,
            skipped: 0,
        };

        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            let line_no = idx + 1;
            let Some(op) = Operation::parse_line(&line, line_no, file_name)? else {
                continue;
            };
            log::debug!("read line #{}: {}", line_no, line);
            replay.apply(op, line_no)?;
        }

        replay.finish()
    }
}

/// State of one replay.
struct Replay<'a> {
    base: Arc<TextBase>,
    labels: &'a mut TextLabels,
    file: &'a str,
    policy: ClosurePolicy,
    warnings: WarningLimiter,
    queued: Vec<Span>,
    operations: usize,
    skipped: usize,
}

impl Replay<'_> {
    fn document(&mut self, document_id: &str) -> Option<Span> {
        let span = self.base.document_span(document_id);
        if span.is_none() {
            self.skipped += 1;
            self.warnings
                .warn(|| format!("unknown id '{}'", document_id));
        }
        span
    }

    /// Resolve `lo len` against a document span.
    fn resolve(&self, document: &Span, lo: i64, len: i64, line: usize) -> Result<Span> {
        if lo == 0 && len < 0 {
            return Ok(document.clone());
        }
        let out_of_range = || {
            Error::op(
                self.file,
                line,
                format!(
                    "offsets {} {} do not fit {} (length {})",
                    lo,
                    len,
                    document.document_id(),
                    document.len()
                ),
            )
        };
        let lo = usize::try_from(lo).map_err(|_| out_of_range())?;
        let hi = if len < 0 {
            document.len()
        } else {
            let len = usize::try_from(len).map_err(|_| out_of_range())?;
            lo.checked_add(len).ok_or_else(out_of_range)?
        };
        document
            .char_index_sub_span(lo, hi)
            .map_err(|_| out_of_range())
    }

    fn apply(&mut self, op: Operation, line: usize) -> Result<()> {
        self.operations += 1;
        match op {
            Operation::AddToType {
                document_id,
                lo,
                len,
                type_name,
                confidence,
            } => {
                if let Some(document) = self.document(&document_id) {
                    let span = self.resolve(&document, lo, len, line)?;
                    self.labels
                        .add_to_type(span, &type_name, confidence.map(Details::new))?;
                }
            }
            Operation::SetSpanProperty {
                document_id,
                lo,
                len,
                prop,
                value,
            } => {
                if let Some(document) = self.document(&document_id) {
                    let span = self.resolve(&document, lo, len, line)?;
                    self.labels.set_property(span, &prop, &value)?;
                }
            }
            Operation::CloseType {
                document_id,
                type_name,
            } => {
                if let Some(document) = self.document(&document_id) {
                    self.labels.close_type_inside(&type_name, document)?;
                    log::debug!("closed {} on {}", type_name, document_id);
                }
            }
            Operation::CloseAllTypes { document_id } => {
                if let Some(document) = self.document(&document_id) {
                    self.queued.push(document);
                }
            }
            Operation::SetClosure(policy) => {
                self.policy = policy;
            }
        }
        Ok(())
    }

    fn finish(self) -> Result<ReplayStats> {
        for document in &self.queued {
            close_types_on_document(self.labels, document)?;
        }
        close_labels(self.labels, self.policy)?;
        log::debug!(
            "replayed {} operations from {} ({} skipped, {} warnings)",
            self.operations,
            self.file,
            self.skipped,
            self.warnings.count()
        );
        Ok(ReplayStats {
            operations: self.operations,
            skipped: self.skipped,
            warnings: self.warnings.count(),
            policy: self.policy,
        })
    }
}
