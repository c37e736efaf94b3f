//! Transcoding pipeline: workspace lifecycle, variant generation, upload,
//! and the orchestrator that sequences them.

pub mod generator;
pub mod orchestrator;
pub mod resampler;
pub mod store;
pub mod uploader;
pub mod workspace;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use orchestrator::{Pipeline, PipelineConfig, PipelineOutput, PipelineRequest, SourceSummary};
pub use resampler::{ImageMagickResampler, Resampler};
pub use store::{MemoryObjectStore, ObjectStore, PutObject, StoreError};
