//! # spanlab
//!
//! Span labelings over a text corpus, and an online kernel perceptron.
//!
//! - **Labelings**: [`TextLabels`] holds typed spans, span properties and
//!   closure regions over a shared [`spanlab_core::TextBase`]
//! - **Operation logs**: [`TextLabelsLoader`] replays `addToType` /
//!   `closeType` / `setClosure` logs; [`save`] writes them back
//! - **Markup**: [`markup_document_span`] renders one document as inline XML
//! - **Learning**: [`learn::KernelVotedPerceptron`], a voted or averaged
//!   perceptron with an optional polynomial kernel
//!
//! ## Loading an operation log
//!
//! ```rust
//! use spanlab::prelude::*;
//! use spanlab_core::TextBase;
//! use std::sync::Arc;
//!
//! let mut base = TextBase::new();
//! base.add_document("d1", "0123456789").unwrap();
//! let base = Arc::new(base);
//!
//! let mut labels = TextLabels::new(base);
//! TextLabelsLoader::new()
//!     .import_ops_str(&mut labels, "addToType d1 0 5 T\ncloseAllTypes d1\n", "inline")
//!     .unwrap();
//!
//! assert_eq!(labels.types().collect::<Vec<_>>(), vec!["T"]);
//! assert!(labels.is_closed("T", "d1"));
//! ```
//!
//! ## Training a classifier
//!
//! ```rust
//! use spanlab::prelude::*;
//!
//! let mut kvp = KernelVotedPerceptron::new(KvpConfig::default()).unwrap();
//! kvp.add_example(&Example::positive(Instance::new().with("cap", 1.0)));
//! kvp.add_example(&Example::negative(Instance::new().with("lower", 1.0)));
//! let classifier = kvp.get_classifier();
//! let _ = classifier.classification(&Instance::new().with("cap", 1.0));
//! ```

#![warn(missing_docs)]

pub mod closure;
pub mod config;
mod error;
pub mod labels;
pub mod learn;
mod markup;
pub mod ops;
pub mod save;

pub mod prelude {
    //! Commonly used items, re-exported for convenience.
    //!
    //! ```rust
    //! use spanlab::prelude::*;
    //!
    //! let policy: ClosurePolicy = "CLOSE_ALL_TYPES".parse().unwrap();
    //! assert_eq!(policy, ClosurePolicy::CloseAllTypes);
    //! ```
    pub use crate::closure::ClosurePolicy;
    pub use crate::config::{Config, LoaderConfig};
    pub use crate::error::{Error, Result};
    pub use crate::labels::{Details, LabelStatus, TextLabels};
    pub use crate::learn::{
        Classifier, Example, Instance, KernelVotedPerceptron, KvpConfig, OnlineBinaryLearner,
        VotingMode,
    };
    pub use crate::markup::markup_document_span;
    pub use crate::ops::TextLabelsLoader;
}

// Re-exports
pub use closure::{close_labels, close_types_on_document, ClosurePolicy};
pub use config::{Config, LoaderConfig};
pub use error::{Error, Result};
pub use labels::{Details, LabelStatus, TextLabels};
pub use markup::markup_document_span;
pub use ops::{Operation, ReplayStats, TextLabelsLoader};
pub use save::{
    save_types_as_ops, save_types_as_ops_to_file, save_types_as_strings,
    save_types_as_strings_to_file, save_types_as_xml,
};
