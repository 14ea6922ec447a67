//! CLIP text encoder for generating label embeddings.
//!
//! Loads the CLIP text ONNX model and tokenizer, encodes label strings to
//! vectors aligned with the image encoder's embedding space.

use std::path::Path;
use std::sync::Mutex;

use ort::session::Session;
use ort::value::Value;

use crate::error::EncodingError;

/// CLIP's fixed text context length. A label tokenizing past this is
/// rejected rather than silently truncated.
const CONTEXT_LENGTH: usize = 77;

/// CLIP text encoder wrapper.
///
/// Uses the same `Mutex<Session>` pattern as the visual encoder.
pub struct ClipTextEncoder {
    session: Mutex<Session>,
    tokenizer: tokenizers::Tokenizer,
    input_name: String,
}

impl ClipTextEncoder {
    /// Load the text encoder and tokenizer.
    pub fn load(model_path: &Path, tokenizer_path: &Path) -> Result<Self, EncodingError> {
        let session = Session::builder()
            .map_err(|e| EncodingError::Model {
                message: format!("Failed to create ONNX session builder: {e}"),
            })?
            .commit_from_file(model_path)
            .map_err(|e| EncodingError::Model {
                message: format!("Failed to load text encoder from {model_path:?}: {e}"),
            })?;

        let tokenizer = tokenizers::Tokenizer::from_file(tokenizer_path).map_err(|e| {
            EncodingError::Model {
                message: format!("Failed to load tokenizer from {tokenizer_path:?}: {e}"),
            }
        })?;

        let input_name = session
            .inputs()
            .first()
            .map(|i| i.name().to_string())
            .unwrap_or_else(|| "input_ids".to_string());

        tracing::debug!(
            "Loaded CLIP text encoder (inputs: {:?}, outputs: {:?})",
            session
                .inputs()
                .iter()
                .map(|i| i.name())
                .collect::<Vec<_>>(),
            session
                .outputs()
                .iter()
                .map(|o| o.name())
                .collect::<Vec<_>>()
        );

        Ok(Self {
            session: Mutex::new(session),
            tokenizer,
            input_name,
        })
    }

    /// Encode a batch of strings to raw (un-normalized) embeddings.
    ///
    /// Returns one vector per input, in input order.
    pub fn encode_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EncodingError> {
        let batch_size = texts.len();
        if batch_size == 0 {
            return Ok(vec![]);
        }

        let encodings = self
            .tokenizer
            .encode_batch(texts.to_vec(), true)
            .map_err(|e| EncodingError::Inference {
                message: format!("Tokenization failed: {e}"),
            })?;

        // Build a flat [N, 77] input_ids tensor, zero-padded.
        let mut input_ids = vec![0i64; batch_size * CONTEXT_LENGTH];
        for (i, encoding) in encodings.iter().enumerate() {
            let ids = encoding.get_ids();
            if ids.len() > CONTEXT_LENGTH {
                return Err(EncodingError::LabelRejected {
                    label: texts[i].clone(),
                    message: format!(
                        "{} tokens exceeds the context length of {CONTEXT_LENGTH}",
                        ids.len()
                    ),
                });
            }
            for (j, &id) in ids.iter().enumerate() {
                input_ids[i * CONTEXT_LENGTH + j] = id as i64;
            }
        }

        let input_value = Value::from_array((
            vec![batch_size as i64, CONTEXT_LENGTH as i64],
            input_ids,
        ))
        .map_err(|e| EncodingError::Inference {
            message: format!("Failed to create input tensor: {e}"),
        })?;

        let mut session = self.session.lock().map_err(|e| EncodingError::Inference {
            message: format!("Text encoder lock poisoned: {e}"),
        })?;

        let outputs = session
            .run(ort::inputs![self.input_name.as_str() => input_value])
            .map_err(|e| EncodingError::Inference {
                message: format!("Text encoder inference failed: {e}"),
            })?;

        let features = outputs
            .iter()
            .find(|(name, _)| *name == "features")
            .or_else(|| outputs.iter().next())
            .ok_or_else(|| EncodingError::OutputMismatch {
                message: "Text encoder produced no outputs".to_string(),
            })?;

        let (shape, data) =
            features
                .1
                .try_extract_tensor::<f32>()
                .map_err(|e| EncodingError::OutputMismatch {
                    message: format!("Failed to extract feature tensor: {e}"),
                })?;

        // Output is [N, dim]; derive the embedding dimension from the shape.
        let embedding_dim = match shape.len() {
            2 => shape[1] as usize,
            _ => {
                return Err(EncodingError::OutputMismatch {
                    message: format!("Unexpected text feature shape: {shape:?}"),
                });
            }
        };

        let embeddings: Vec<Vec<f32>> = data
            .chunks(embedding_dim)
            .take(batch_size)
            .map(|chunk| chunk.to_vec())
            .collect();

        if embeddings.len() != batch_size {
            return Err(EncodingError::OutputMismatch {
                message: format!(
                    "Text encoder returned {} vectors for {batch_size} inputs",
                    embeddings.len()
                ),
            });
        }

        Ok(embeddings)
    }
}
