//! Label set loading and validation.
//!
//! A label set is the ordered, user-defined vocabulary of category names a
//! file can be sorted into. The position of a label is load-bearing: it is
//! the index used to map a score-vector position back to a label, so the
//! set is validated once at construction and immutable afterwards.

use std::path::Path;

use serde::Deserialize;

use crate::error::{PreconditionError, SnapsortError};

/// On-disk label configuration: a JSON document with a single `labels` field.
///
/// ```json
/// { "labels": ["cat", "dog", "screenshot"] }
/// ```
#[derive(Debug, Deserialize)]
struct LabelFile {
    labels: Vec<String>,
}

/// Ordered, unique, non-empty label strings.
#[derive(Debug, Clone)]
pub struct LabelSet {
    labels: Vec<String>,
}

impl LabelSet {
    /// Build a label set, rejecting empty sets, empty strings, and duplicates.
    pub fn new(labels: Vec<String>) -> Result<Self, PreconditionError> {
        if labels.is_empty() {
            return Err(PreconditionError::EmptyLabels);
        }
        for (i, label) in labels.iter().enumerate() {
            if label.trim().is_empty() {
                return Err(PreconditionError::InvalidLabel {
                    label: label.clone(),
                    message: "label must not be empty".to_string(),
                });
            }
            if labels[..i].contains(label) {
                return Err(PreconditionError::InvalidLabel {
                    label: label.clone(),
                    message: "duplicate label".to_string(),
                });
            }
        }
        Ok(Self { labels })
    }

    /// Load a label set from a JSON file with a `labels` field.
    ///
    /// A missing file is a fatal precondition, matching the run contract.
    pub fn load(path: &Path) -> Result<Self, SnapsortError> {
        if !path.exists() {
            return Err(PreconditionError::MissingLabelFile(path.to_path_buf()).into());
        }
        let content = std::fs::read_to_string(path)?;
        let file: LabelFile = serde_json::from_str(&content)?;
        Ok(Self::new(file.labels)?)
    }

    /// Labels in their original order.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Number of labels.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// A valid label set is never empty; kept for idiomatic pairing with `len`.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Label at a score index.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(|s| s.as_str())
    }
}
