//! Deterministic embedding provider double for tests.

use ndarray::Array4;

use crate::embedding::EmbeddingProvider;
use crate::error::EncodingError;

/// A scripted [`EmbeddingProvider`]: fixed text vectors, a fixed image
/// vector, and switchable failures per encode operation.
pub(crate) struct MockProvider {
    text_vectors: Vec<Vec<f32>>,
    image_vector: Vec<f32>,
    logit_scale: f32,
    fail_text: bool,
    fail_image: bool,
}

impl MockProvider {
    /// Provider returning `text_vectors` for any text batch.
    pub fn new(text_vectors: Vec<Vec<f32>>) -> Self {
        Self {
            text_vectors,
            image_vector: vec![1.0, 0.0],
            logit_scale: 4.6052,
            fail_text: false,
            fail_image: false,
        }
    }

    pub fn with_image_vector(mut self, vector: Vec<f32>) -> Self {
        self.image_vector = vector;
        self
    }

    pub fn with_text_failure(mut self) -> Self {
        self.fail_text = true;
        self
    }

    pub fn with_image_failure(mut self) -> Self {
        self.fail_image = true;
        self
    }
}

impl EmbeddingProvider for MockProvider {
    fn encode_text(&self, _texts: &[String]) -> Result<Vec<Vec<f32>>, EncodingError> {
        if self.fail_text {
            return Err(EncodingError::Inference {
                message: "scripted text failure".to_string(),
            });
        }
        Ok(self.text_vectors.clone())
    }

    fn encode_image(&self, _tensor: &Array4<f32>) -> Result<Vec<f32>, EncodingError> {
        if self.fail_image {
            return Err(EncodingError::Inference {
                message: "scripted image failure".to_string(),
            });
        }
        Ok(self.image_vector.clone())
    }

    fn logit_scale(&self) -> f32 {
        self.logit_scale
    }
}
