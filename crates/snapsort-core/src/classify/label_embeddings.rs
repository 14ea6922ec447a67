//! Pre-computed label embeddings for scoring.
//!
//! Stores a flat N×dim matrix of unit-norm text embeddings, one row per
//! label, in label-set order. Computed once per run before any image is
//! processed and read-only afterwards. Row order is the sole contract
//! linking a score index back to a label.

use crate::embedding::EmbeddingProvider;
use crate::error::EncodingError;
use crate::labels::LabelSet;
use crate::math;

/// Unit-norm text embeddings for a label set.
///
/// Stores a single flat matrix (N × dim, row-major) for efficient dot
/// products against image embeddings.
#[derive(Debug)]
pub struct LabelEmbeddings {
    /// Flat matrix: N × dim stored row-major.
    matrix: Vec<f32>,
    embedding_dim: usize,
    label_count: usize,
}

impl LabelEmbeddings {
    /// Encode every label through the provider and normalize the results.
    ///
    /// Output row order matches the label-set order exactly. Fails if the
    /// provider rejects a label or returns a vector count or dimension
    /// inconsistent with the request.
    pub fn encode(
        provider: &dyn EmbeddingProvider,
        labels: &LabelSet,
    ) -> Result<Self, EncodingError> {
        let vectors = provider.encode_text(labels.labels())?;
        if vectors.len() != labels.len() {
            return Err(EncodingError::OutputMismatch {
                message: format!(
                    "provider returned {} vectors for {} labels",
                    vectors.len(),
                    labels.len()
                ),
            });
        }

        let embedding_dim = vectors[0].len();
        if embedding_dim == 0 {
            return Err(EncodingError::OutputMismatch {
                message: "provider returned zero-dimensional vectors".to_string(),
            });
        }

        let mut matrix: Vec<f32> = Vec::with_capacity(labels.len() * embedding_dim);
        for (i, vector) in vectors.iter().enumerate() {
            if vector.len() != embedding_dim {
                return Err(EncodingError::OutputMismatch {
                    message: format!(
                        "label {:?} embedding has dimension {} (expected {embedding_dim})",
                        labels.get(i).unwrap_or(""),
                        vector.len()
                    ),
                });
            }
            matrix.extend_from_slice(&math::l2_normalize(vector));
        }

        tracing::debug!(
            "Encoded {} labels x {} dims",
            labels.len(),
            embedding_dim
        );

        Ok(Self {
            matrix,
            embedding_dim,
            label_count: labels.len(),
        })
    }

    /// Create label embeddings from a pre-computed matrix (for testing).
    #[cfg(test)]
    pub(crate) fn from_raw(matrix: Vec<f32>, embedding_dim: usize, label_count: usize) -> Self {
        assert_eq!(
            matrix.len(),
            embedding_dim * label_count,
            "Matrix size ({}) does not match {} labels x {} dim",
            matrix.len(),
            label_count,
            embedding_dim,
        );
        Self {
            matrix,
            embedding_dim,
            label_count,
        }
    }

    /// The unit-norm embedding row for one label.
    pub fn row(&self, index: usize) -> &[f32] {
        let offset = index * self.embedding_dim;
        &self.matrix[offset..offset + self.embedding_dim]
    }

    /// Number of labels.
    pub fn label_count(&self) -> usize {
        self.label_count
    }

    /// Embedding dimension.
    pub fn embedding_dim(&self) -> usize {
        self.embedding_dim
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockProvider;

    fn labels(names: &[&str]) -> LabelSet {
        LabelSet::new(names.iter().map(|s| s.to_string()).collect()).unwrap()
    }

    #[test]
    fn test_encode_normalizes_and_preserves_order() {
        // Distinguishable, non-normalized vectors per label.
        let provider = MockProvider::new(vec![vec![3.0, 0.0], vec![0.0, 5.0]]);
        let labels = labels(&["cat", "dog"]);

        let bank = LabelEmbeddings::encode(&provider, &labels).unwrap();
        assert_eq!(bank.label_count(), 2);
        assert_eq!(bank.embedding_dim(), 2);

        // Row 0 is "cat" (unit-norm of [3,0]), row 1 is "dog".
        assert!((bank.row(0)[0] - 1.0).abs() < 1e-6);
        assert!((bank.row(1)[1] - 1.0).abs() < 1e-6);

        for i in 0..bank.label_count() {
            let norm: f32 = bank.row(i).iter().map(|x| x * x).sum::<f32>().sqrt();
            assert!((norm - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_encode_rejects_count_mismatch() {
        // Provider returns one vector for two labels.
        let provider = MockProvider::new(vec![vec![1.0, 0.0]]);
        let labels = labels(&["cat", "dog"]);

        let err = LabelEmbeddings::encode(&provider, &labels).unwrap_err();
        assert!(matches!(err, EncodingError::OutputMismatch { .. }));
    }

    #[test]
    fn test_encode_rejects_dimension_mismatch() {
        let provider = MockProvider::new(vec![vec![1.0, 0.0], vec![0.0, 1.0, 0.0]]);
        let labels = labels(&["cat", "dog"]);

        let err = LabelEmbeddings::encode(&provider, &labels).unwrap_err();
        assert!(matches!(err, EncodingError::OutputMismatch { .. }));
    }
}
