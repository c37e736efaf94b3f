use std::sync::Arc;

use thumbnailer_pipeline::Pipeline;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Transcoding pipeline, configured once at startup.
    pub pipeline: Arc<Pipeline>,
}
