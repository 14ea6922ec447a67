//! Configuration validation with range checks.

use crate::error::ConfigError;

use super::Config;

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.embedding.model.is_empty() {
            return Err(ConfigError::ValidationError(
                "embedding.model must not be empty".into(),
            ));
        }
        if self.embedding.image_size == 0 {
            return Err(ConfigError::ValidationError(
                "embedding.image_size must be > 0".into(),
            ));
        }
        if !self.embedding.logit_scale.is_finite() {
            return Err(ConfigError::ValidationError(
                "embedding.logit_scale must be finite".into(),
            ));
        }
        if self.output.format != "json" && self.output.format != "jsonl" {
            return Err(ConfigError::ValidationError(format!(
                "output.format must be \"json\" or \"jsonl\", got {:?}",
                self.output.format
            )));
        }
        Ok(())
    }
}
