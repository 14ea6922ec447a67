//! Embedding provider: the seam between the pipeline and the model.
//!
//! The pipeline only ever sees the [`EmbeddingProvider`] trait: two encode
//! operations plus a learned temperature. The production implementation is
//! [`ClipEngine`], which owns the two ONNX sessions and the tokenizer; tests
//! substitute a deterministic double. The engine is constructed explicitly by
//! the caller and passed into the orchestrator, never held as process-wide
//! state.
//!
//! # Usage
//!
//! ```rust,ignore
//! use snapsort_core::embedding::ClipEngine;
//! use snapsort_core::Config;
//!
//! let config = Config::load()?;
//! let engine = ClipEngine::load(&config.embedding, &config.model_dir())?;
//! let vectors = engine.encode_text(&["a photo of a cat".to_string()])?;
//! ```

pub(crate) mod preprocess;
pub(crate) mod text;
pub(crate) mod visual;

use std::path::{Path, PathBuf};
use std::time::Instant;

use ndarray::Array4;

use crate::config::EmbeddingConfig;
use crate::error::EncodingError;

use self::text::ClipTextEncoder;
use self::visual::ClipVisualSession;

pub use self::preprocess::preprocess;

/// The image encoder ONNX model filename.
const VISUAL_MODEL_FILENAME: &str = "visual.onnx";

/// The text encoder ONNX model filename.
const TEXT_MODEL_FILENAME: &str = "text.onnx";

/// The tokenizer definition filename.
const TOKENIZER_FILENAME: &str = "tokenizer.json";

/// A pretrained vision-language embedding model.
///
/// Implementations are read-only shared state for the duration of a run:
/// both encode operations are deterministic for fixed weights and neither
/// mutates the model.
pub trait EmbeddingProvider: Send + Sync {
    /// Encode a batch of strings into one embedding vector per input,
    /// in input order. Vectors are not required to be unit-norm; callers
    /// normalize.
    fn encode_text(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EncodingError>;

    /// Encode one preprocessed image tensor (`[1, 3, size, size]` NCHW)
    /// into an embedding vector.
    fn encode_image(&self, tensor: &Array4<f32>) -> Result<Vec<f32>, EncodingError>;

    /// The learned temperature, applied as `exp(logit_scale)` to cosine
    /// similarities before the softmax.
    fn logit_scale(&self) -> f32;
}

/// Production [`EmbeddingProvider`] backed by CLIP ONNX sessions.
pub struct ClipEngine {
    visual: ClipVisualSession,
    text: ClipTextEncoder,
    logit_scale: f32,
    image_size: u32,
}

impl ClipEngine {
    /// Load both encoders from the model directory.
    ///
    /// Expects `visual.onnx`, `text.onnx`, and `tokenizer.json` at
    /// `{model_dir}/{model}/`.
    pub fn load(config: &EmbeddingConfig, model_dir: &Path) -> Result<Self, EncodingError> {
        let base = model_dir.join(&config.model);
        for filename in [VISUAL_MODEL_FILENAME, TEXT_MODEL_FILENAME, TOKENIZER_FILENAME] {
            let path = base.join(filename);
            if !path.exists() {
                return Err(EncodingError::Model {
                    message: format!("Model file not found: {path:?}"),
                });
            }
        }

        tracing::info!("Loading CLIP model from {:?}", base);
        let start = Instant::now();
        let visual = ClipVisualSession::load(&base.join(VISUAL_MODEL_FILENAME))?;
        let text = ClipTextEncoder::load(
            &base.join(TEXT_MODEL_FILENAME),
            &base.join(TOKENIZER_FILENAME),
        )?;
        tracing::info!("CLIP model loaded in {:.2?}", start.elapsed());

        Ok(Self {
            visual,
            text,
            logit_scale: config.logit_scale,
            image_size: config.image_size,
        })
    }

    /// Get the image input size for this model.
    pub fn image_size(&self) -> u32 {
        self.image_size
    }

    /// Check whether all model files exist on disk.
    pub fn model_exists(config: &EmbeddingConfig, model_dir: &Path) -> bool {
        let base = model_dir.join(&config.model);
        [VISUAL_MODEL_FILENAME, TEXT_MODEL_FILENAME, TOKENIZER_FILENAME]
            .iter()
            .all(|f| base.join(f).exists())
    }

    /// Get the expected model directory path.
    pub fn model_path(config: &EmbeddingConfig, model_dir: &Path) -> PathBuf {
        model_dir.join(&config.model)
    }
}

impl EmbeddingProvider for ClipEngine {
    fn encode_text(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EncodingError> {
        self.text.encode_batch(texts)
    }

    fn encode_image(&self, tensor: &Array4<f32>) -> Result<Vec<f32>, EncodingError> {
        self.visual.embed(tensor)
    }

    fn logit_scale(&self) -> f32 {
        self.logit_scale
    }
}
