//! CLIP visual encoder ONNX session management and inference.
//!
//! Loads a CLIP image encoder exported to ONNX format and runs inference to
//! produce one embedding vector per preprocessed image tensor.

use std::path::Path;
use std::sync::Mutex;

use ndarray::Array4;
use ort::session::Session;
use ort::value::Value;

use crate::error::EncodingError;

/// Wraps an ONNX Runtime session for the CLIP image encoder.
///
/// Uses a `Mutex` because `Session::run` requires `&mut self`.
pub struct ClipVisualSession {
    session: Mutex<Session>,
    /// Name of the input tensor (detected from model metadata).
    input_name: String,
}

impl ClipVisualSession {
    /// Load a CLIP image encoder from an ONNX file.
    pub fn load(model_path: &Path) -> Result<Self, EncodingError> {
        let session = Session::builder()
            .map_err(|e| EncodingError::Model {
                message: format!("Failed to create ONNX session builder: {e}"),
            })?
            .commit_from_file(model_path)
            .map_err(|e| EncodingError::Model {
                message: format!("Failed to load image encoder from {model_path:?}: {e}"),
            })?;

        // Detect the input tensor name from model metadata.
        let input_name = session
            .inputs()
            .first()
            .map(|i| i.name().to_string())
            .unwrap_or_else(|| "image".to_string());

        tracing::debug!(
            "Loaded CLIP image encoder from {:?} (input: {:?}, outputs: {:?})",
            model_path,
            input_name,
            session
                .outputs()
                .iter()
                .map(|o| o.name())
                .collect::<Vec<_>>()
        );

        Ok(Self {
            session: Mutex::new(session),
            input_name,
        })
    }

    /// Run inference on a preprocessed image tensor and return the raw
    /// (un-normalized) embedding vector.
    ///
    /// Input shape: \[1, 3, image_size, image_size\] (NCHW).
    pub fn embed(&self, preprocessed: &Array4<f32>) -> Result<Vec<f32>, EncodingError> {
        // Convert ndarray to (shape, flat_data) for ort.
        let shape: Vec<i64> = preprocessed.shape().iter().map(|&d| d as i64).collect();
        let flat_data: Vec<f32> = preprocessed.iter().copied().collect();

        let input_value =
            Value::from_array((shape, flat_data)).map_err(|e| EncodingError::Inference {
                message: format!("Failed to create input tensor: {e}"),
            })?;

        let inputs = ort::inputs![self.input_name.as_str() => input_value];

        let mut session = self.session.lock().map_err(|e| EncodingError::Inference {
            message: format!("Session lock poisoned: {e}"),
        })?;

        let outputs = session.run(inputs).map_err(|e| EncodingError::Inference {
            message: format!("ONNX inference failed: {e}"),
        })?;

        // The exported encoder names its output "features"; fall back to the
        // first output for models exported with a different name.
        let features = outputs
            .iter()
            .find(|(name, _)| *name == "features")
            .or_else(|| outputs.iter().next())
            .ok_or_else(|| EncodingError::OutputMismatch {
                message: "Image encoder produced no outputs".to_string(),
            })?;

        let (shape, data) =
            features
                .1
                .try_extract_tensor::<f32>()
                .map_err(|e| EncodingError::OutputMismatch {
                    message: format!("Failed to extract feature tensor: {e}"),
                })?;

        // Output is [1, dim]; extract the single embedding vector.
        match shape.len() {
            1 => Ok(data.to_vec()),
            2 => {
                let dim = shape[1] as usize;
                Ok(data[..dim].to_vec())
            }
            _ => Err(EncodingError::OutputMismatch {
                message: format!("Unexpected feature shape: {shape:?}"),
            }),
        }
    }
}
