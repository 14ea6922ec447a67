//! Error types for the Snapsort classification pipeline.
//!
//! Errors are split into two families: fatal errors that abort a run before
//! any file is touched (preconditions, label encoding, configuration), and
//! per-file errors that are caught at the orchestrator boundary and recorded
//! as failed outcomes without interrupting the remaining files.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for Snapsort operations.
#[derive(Error, Debug)]
pub enum SnapsortError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A precondition for the run was not met
    #[error("Precondition failed: {0}")]
    Precondition(#[from] PreconditionError),

    /// Label-side encoding failed (fatal: every image depends on the
    /// shared label embeddings)
    #[error("Label encoding error: {0}")]
    Encoding(#[from] EncodingError),

    /// General I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Fatal preconditions, checked before any file is processed.
#[derive(Error, Debug)]
pub enum PreconditionError {
    /// The input directory does not exist or is not a directory
    #[error("Directory does not exist: {0}")]
    MissingDirectory(PathBuf),

    /// The label file does not exist
    #[error("Label file does not exist: {0}")]
    MissingLabelFile(PathBuf),

    /// The label set is empty
    #[error("Label set is empty")]
    EmptyLabels,

    /// A label string is empty or duplicated
    #[error("Invalid label {label:?}: {message}")]
    InvalidLabel { label: String, message: String },
}

/// Errors from the embedding provider's encode operations.
///
/// Fatal when raised for labels; wrapped into [`FileError::Embedding`]
/// when raised for a single image.
#[derive(Error, Debug)]
pub enum EncodingError {
    /// Model files missing or failed to load
    #[error("Model error: {message}")]
    Model { message: String },

    /// A label was rejected by the tokenizer (e.g. exceeds the context length)
    #[error("Label {label:?} rejected: {message}")]
    LabelRejected { label: String, message: String },

    /// ONNX inference failed
    #[error("Inference failed: {message}")]
    Inference { message: String },

    /// The provider returned vectors inconsistent with the request
    #[error("Provider output mismatch: {message}")]
    OutputMismatch { message: String },
}

/// Per-file errors, recorded in the run report without aborting the run.
#[derive(Error, Debug)]
pub enum FileError {
    /// Image decoding failed (unreadable or not an image)
    #[error("Decode error for {path}: {message}")]
    Decode { path: PathBuf, message: String },

    /// Image-side embedding failed
    #[error("Embedding failed for {path}: {message}")]
    Embedding { path: PathBuf, message: String },

    /// Moving the file into its label folder failed; the source is preserved
    #[error("Placement failed for {path}: {message}")]
    Placement { path: PathBuf, message: String },
}

impl FileError {
    /// The source path this error refers to.
    pub fn path(&self) -> &PathBuf {
        match self {
            FileError::Decode { path, .. } => path,
            FileError::Embedding { path, .. } => path,
            FileError::Placement { path, .. } => path,
        }
    }

    /// Short stage name for log lines and report records.
    pub fn stage(&self) -> &'static str {
        match self {
            FileError::Decode { .. } => "decode",
            FileError::Embedding { .. } => "embedding",
            FileError::Placement { .. } => "placement",
        }
    }
}

/// Convenience type alias for Snapsort results.
pub type Result<T> = std::result::Result<T, SnapsortError>;
