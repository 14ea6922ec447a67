//! Snapsort Core - image classification and sorting library.
//!
//! Snapsort classifies the images in a directory against a user-supplied
//! set of text labels using a pretrained vision-language model, then moves
//! each image into a subfolder named after its best-matching label.
//!
//! # Architecture
//!
//! ```text
//! Labels → Encode once ┐
//!                      ├→ Score → Winning label → Move into label folder
//! Image → Preprocess → Embed ┘
//! ```
//!
//! The embedding model sits behind the [`embedding::EmbeddingProvider`]
//! trait and is constructed by the caller, never by the pipeline. The
//! production implementation is [`embedding::ClipEngine`]; tests supply a
//! double.
//!
//! # Usage
//!
//! ```rust,ignore
//! use snapsort_core::{ClipEngine, Config, LabelSet, Pipeline};
//!
//! fn main() -> snapsort_core::Result<()> {
//!     let config = Config::load()?;
//!     let engine = ClipEngine::load(&config.embedding, &config.model_dir())?;
//!     let labels = LabelSet::load("labels.json".as_ref())?;
//!
//!     let pipeline = Pipeline::new(&engine, &config);
//!     let report = pipeline.run("./photos".as_ref(), &labels)?;
//!     println!("{} sorted, {} failed", report.succeeded(), report.failed());
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod classify;
pub mod config;
pub mod embedding;
pub mod error;
pub mod labels;
pub mod math;
pub mod output;
pub mod pipeline;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

// Re-exports for convenient access
pub use config::Config;
pub use embedding::{ClipEngine, EmbeddingProvider};
pub use error::{
    ConfigError, EncodingError, FileError, PreconditionError, Result, SnapsortError,
};
pub use labels::LabelSet;
pub use output::{write_report, OutputFormat};
pub use pipeline::Pipeline;
pub use types::{Classification, FileOutcome, RunReport};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
