//! Plain-text example files.
//!
//! One example per line: a label (`+1`, `-1`, `+` or `-`) followed by
//! `feature:value` pairs. A bare `feature` has value 1. Blank lines and `#`
//! comments are skipped.
//!
//! ```text
//! +1 word=Smith:1 cap:1
//! -1 word=the lower
//! ```

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use super::{BinaryLabel, Classifier, Example, Instance};
use crate::{Error, Result};

fn parse_label(token: &str) -> Option<BinaryLabel> {
    match token {
        "+1" | "+" | "1" => Some(BinaryLabel::Positive),
        "-1" | "-" => Some(BinaryLabel::Negative),
        _ => None,
    }
}

/// Read examples from `reader`. `source` only labels error messages.
///
/// # Errors
///
/// [`Error::Parse`] with the line number for a bad label or value;
/// [`Error::Io`] if reading fails.
pub fn parse_examples<R: BufRead>(reader: R, source: &str) -> Result<Vec<Example>> {
    let mut examples = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = idx + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let mut tokens = trimmed.split_whitespace();
        let label_token = tokens.next().unwrap_or_default();
        let label = parse_label(label_token).ok_or_else(|| {
            Error::parse(format!(
                "{}:{}: bad label '{}' (expected +1 or -1)",
                source, line_no, label_token
            ))
        })?;

        let mut instance = Instance::new();
        for token in tokens {
            let (feature, value) = match token.rsplit_once(':') {
                Some((feature, raw)) if !feature.is_empty() => {
                    let value: f64 = raw.parse().map_err(|_| {
                        Error::parse(format!(
                            "{}:{}: bad value '{}' for feature '{}'",
                            source, line_no, raw, feature
                        ))
                    })?;
                    (feature, value)
                }
                _ => (token, 1.0),
            };
            instance.set(feature, value);
        }
        examples.push(Example::new(instance, label));
    }
    Ok(examples)
}

/// Read an example file.
///
/// # Errors
///
/// See [`parse_examples`].
pub fn load_examples(path: impl AsRef<Path>) -> Result<Vec<Example>> {
    let path = path.as_ref();
    let file = File::open(path)?;
    parse_examples(BufReader::new(file), &path.display().to_string())
}

/// Fraction of `examples` that `classifier` labels correctly; 0 when empty.
#[must_use]
pub fn accuracy<C: Classifier + ?Sized>(classifier: &C, examples: &[Example]) -> f64 {
    if examples.is_empty() {
        return 0.0;
    }
    let correct = examples
        .iter()
        .filter(|e| classifier.classification(&e.instance).label == e.label)
        .count();
    correct as f64 / examples.len() as f64
}
