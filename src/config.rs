//! TOML configuration.
//!
//! Every field has a default, so an empty file is a valid config:
//!
//! ```toml
//! [kvp]
//! degree = 0
//! mode = "averaged"
//! speedup = true
//! max_vectors = 100
//!
//! [loader]
//! closure_policy = "CLOSE_TYPES_IN_LABELED_DOCS"
//! max_warnings = 5
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use crate::closure::ClosurePolicy;
use crate::learn::{KvpConfig, VotingMode};
use crate::ops::DEFAULT_MAX_WARNINGS;
use crate::{Error, Result};

/// Operation-log replay settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Policy each replay starts with
    pub closure_policy: ClosurePolicy,
    /// Unknown-document warnings emitted per replay before going quiet
    pub max_warnings: usize,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            closure_policy: ClosurePolicy::default(),
            max_warnings: DEFAULT_MAX_WARNINGS,
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Learner hyperparameters
    pub kvp: KvpConfig,
    /// Replay settings
    pub loader: LoaderConfig,
}

impl Config {
    /// Parse and validate a TOML document.
    ///
    /// # Errors
    ///
    /// [`Error::Toml`] for malformed TOML or mistyped fields,
    /// [`Error::Config`] for unknown `mode`/`closure_policy` names and values
    /// that fail validation.
    ///
    /// Enum names are read with the same parsers as the CLI flags, so
    /// `mode = "Averaged"` is accepted here too.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let mut table: toml::Table = text.parse()?;
        normalize_name::<VotingMode>(&mut table, "kvp", "mode")?;
        normalize_name::<ClosurePolicy>(&mut table, "loader", "closure_policy")?;
        let config: Config = toml::Value::Table(table).try_into()?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    ///
    /// # Errors
    ///
    /// [`Error::Io`] if the file cannot be read; otherwise as
    /// [`Config::from_toml_str`].
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        log::debug!("loaded config from {}", path.display());
        Self::from_toml_str(&text)
    }

    /// Render as TOML.
    ///
    /// # Errors
    ///
    /// [`Error::Config`] if serialization fails.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self).map_err(|e| Error::config(format!("Failed to serialize config: {}", e)))
    }

    /// Check every section.
    ///
    /// # Errors
    ///
    /// [`Error::Config`] naming the first bad value.
    pub fn validate(&self) -> Result<()> {
        self.kvp.validate()
    }
}

/// Replace `[section] key = "name"` with the canonical spelling of `T`.
fn normalize_name<T>(table: &mut toml::Table, section: &str, key: &str) -> Result<()>
where
    T: FromStr<Err = Error> + fmt::Display,
{
    let Some(slot) = table.get_mut(section).and_then(|s| s.get_mut(key)) else {
        return Ok(());
    };
    if let Some(name) = slot.as_str() {
        *slot = toml::Value::String(name.parse::<T>()?.to_string());
    }
    Ok(())
}
