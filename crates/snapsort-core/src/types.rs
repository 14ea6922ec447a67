//! Core data types for the Snapsort classification pipeline.

use std::path::PathBuf;
use std::time::Duration;

use serde::Serialize;

use crate::error::FileError;

/// The classification result for one successfully processed file.
#[derive(Debug, Clone, Serialize)]
pub struct Classification {
    /// The winning label
    pub label: String,

    /// Index of the winning label in the label set
    pub label_index: usize,

    /// Full probability distribution, in label-set order, summing to 1
    pub probabilities: Vec<f32>,

    /// Where the file was moved to
    pub destination: PathBuf,
}

/// One outcome per enumerated file: success with its classification, or a
/// per-file failure with the stage and reason.
#[derive(Debug)]
pub struct FileOutcome {
    /// Original path of the file, before any move
    pub path: PathBuf,

    /// Classification, or the error that stopped this file
    pub result: Result<Classification, FileError>,
}

/// Ordered per-file outcomes for a whole run.
///
/// Every enumerated file yields exactly one outcome; a failed file never
/// interrupts the rest of the run.
#[derive(Debug, Default)]
pub struct RunReport {
    /// Outcomes in processing (path) order
    pub outcomes: Vec<FileOutcome>,

    /// Wall-clock duration of the run
    pub elapsed: Duration,
}

impl RunReport {
    /// Number of files successfully classified and moved.
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }

    /// Number of files that failed.
    pub fn failed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_err()).count()
    }

    /// Total number of enumerated files.
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    /// Whether the run saw no files at all.
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }
}
