//! Pipeline orchestration - drives classification and sorting over a directory.
//!
//! The run is strictly sequential: label embeddings are computed once up
//! front and reused read-only for every image, and exactly one file move
//! happens per successfully processed image. Per-file failures are caught
//! here, logged, and recorded; only broken preconditions or a label-side
//! encoding failure abort the whole run.

use std::path::Path;
use std::time::Instant;

use crate::classify::{best_index, score, LabelEmbeddings};
use crate::config::Config;
use crate::embedding::{preprocess, EmbeddingProvider};
use crate::error::{FileError, PreconditionError, Result};
use crate::labels::LabelSet;
use crate::types::{Classification, FileOutcome, RunReport};

use super::decode::decode;
use super::discovery::FileDiscovery;
use super::sorter;

/// The classification-and-sort pipeline.
///
/// Borrows the embedding provider from the caller; the pipeline never
/// constructs or tears down the model.
pub struct Pipeline<'a> {
    provider: &'a dyn EmbeddingProvider,
    discovery: FileDiscovery,
    image_size: u32,
}

impl<'a> Pipeline<'a> {
    /// Create a pipeline around an embedding provider.
    pub fn new(provider: &'a dyn EmbeddingProvider, config: &Config) -> Self {
        Self {
            provider,
            discovery: FileDiscovery::new(&config.processing),
            image_size: config.embedding.image_size,
        }
    }

    /// Classify every file in `dir` against `labels` and move each into its
    /// winning label's subfolder.
    ///
    /// Fails fast only on broken preconditions (missing directory, empty
    /// label set) or a label-side encoding failure; every per-file failure
    /// is recorded in the report and processing continues.
    pub fn run(&self, dir: &Path, labels: &LabelSet) -> Result<RunReport> {
        let start = Instant::now();

        if !dir.is_dir() {
            return Err(PreconditionError::MissingDirectory(dir.to_path_buf()).into());
        }
        if labels.is_empty() {
            return Err(PreconditionError::EmptyLabels.into());
        }

        // Shared by every image; a failure here is fatal.
        let label_embeddings = LabelEmbeddings::encode(self.provider, labels)?;

        let files = self.discovery.discover(dir)?;
        tracing::info!(
            "Classifying {} files into {} labels under {:?}",
            files.len(),
            labels.len(),
            dir
        );

        let mut outcomes = Vec::with_capacity(files.len());
        for path in files {
            let result = self.process_file(&path, dir, labels, &label_embeddings);
            match &result {
                Ok(classification) => {
                    tracing::info!(
                        "{:?} -> {} (p={:.3})",
                        path.file_name().unwrap_or(path.as_os_str()),
                        classification.label,
                        classification.probabilities[classification.label_index]
                    );
                }
                Err(e) => {
                    tracing::warn!(
                        "{:?} failed at {}: {}",
                        path.file_name().unwrap_or(path.as_os_str()),
                        e.stage(),
                        e
                    );
                }
            }
            outcomes.push(FileOutcome { path, result });
        }

        let report = RunReport {
            outcomes,
            elapsed: start.elapsed(),
        };
        tracing::info!(
            "Run finished in {:.2?}: {} sorted, {} failed",
            report.elapsed,
            report.succeeded(),
            report.failed()
        );
        Ok(report)
    }

    fn process_file(
        &self,
        path: &Path,
        base_dir: &Path,
        labels: &LabelSet,
        label_embeddings: &LabelEmbeddings,
    ) -> std::result::Result<Classification, FileError> {
        let image = decode(path)?;
        let tensor = preprocess(&image, self.image_size);

        let embedding =
            self.provider
                .encode_image(&tensor)
                .map_err(|e| FileError::Embedding {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })?;
        if embedding.len() != label_embeddings.embedding_dim() {
            return Err(FileError::Embedding {
                path: path.to_path_buf(),
                message: format!(
                    "image embedding dimension {} does not match label dimension {}",
                    embedding.len(),
                    label_embeddings.embedding_dim()
                ),
            });
        }

        let probabilities = score(&embedding, label_embeddings, self.provider.logit_scale());
        let label_index = best_index(&probabilities).ok_or_else(|| FileError::Embedding {
            path: path.to_path_buf(),
            message: "empty probability vector".to_string(),
        })?;
        let label = labels.get(label_index).ok_or_else(|| FileError::Embedding {
            path: path.to_path_buf(),
            message: format!("winning index {label_index} out of label range"),
        })?;

        let destination = sorter::place(path, label, base_dir)?;

        Ok(Classification {
            label: label.to_string(),
            label_index,
            probabilities,
            destination,
        })
    }
}
