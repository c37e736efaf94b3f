//! Pipeline orchestrator.
//!
//! Runs one request through the linear state machine
//!
//! ```text
//! Idle -> WorkspaceCreated -> OriginalStaged -> VariantsGenerated -> Uploaded -> CleanedUp
//! ```
//!
//! Target validation and decoding happen before the workspace exists, so
//! their faults need no cleanup. From `WorkspaceCreated` on, the workspace is
//! destroyed on every exit path before the outcome is returned.

use std::path::PathBuf;
use std::sync::Arc;

use thumbnailer_core::error::{PipelineError, PipelineFailure, Stage};
use thumbnailer_core::request::RequestId;
use thumbnailer_core::sizes::TargetSizes;
use thumbnailer_core::source::SourceImage;
use thumbnailer_core::storage::StorageTarget;

use crate::generator::resize_all;
use crate::resampler::Resampler;
use crate::store::ObjectStore;
use crate::uploader::{upload_all, UploadRecord};
use crate::workspace::{Workspace, WorkspaceManager};

/// Deployment-wide pipeline settings, fixed at startup.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Directory under which per-request workspaces are created.
    pub base_dir: PathBuf,
    pub sizes: TargetSizes,
    pub storage: StorageTarget,
}

/// One upload to process.
#[derive(Debug, Clone)]
pub struct PipelineRequest {
    pub request_id: RequestId,
    pub filename: String,
    pub payload: Vec<u8>,
}

/// Facts about the original upload reported back to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSummary {
    pub filename: String,
    pub width: u32,
    pub height: u32,
    pub bytes: usize,
}

/// Successful pipeline result. `keys` follow the configured size order.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub request_id: RequestId,
    pub keys: Vec<String>,
    pub uploads: Vec<UploadRecord>,
    pub source: SourceSummary,
}

/// Sequences workspace, staging, resizing, uploading and cleanup.
pub struct Pipeline {
    config: PipelineConfig,
    workspaces: WorkspaceManager,
    resampler: Arc<dyn Resampler>,
    store: Arc<dyn ObjectStore>,
}

impl Pipeline {
    pub fn new(
        config: PipelineConfig,
        resampler: Arc<dyn Resampler>,
        store: Arc<dyn ObjectStore>,
    ) -> Self {
        let workspaces = WorkspaceManager::new(config.base_dir.clone());
        Self {
            config,
            workspaces,
            resampler,
            store,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Process one request end to end.
    ///
    /// Returns every variant key on success, or a single terminal failure.
    /// A cleanup fault never replaces the fault that triggered cleanup; it is
    /// attached as [`PipelineFailure::cleanup_error`].
    pub async fn run(&self, request: PipelineRequest) -> Result<PipelineOutput, PipelineFailure> {
        let PipelineRequest {
            request_id,
            filename,
            payload,
        } = request;

        self.config
            .storage
            .validate()
            .map_err(|e| self.fail_early(&request_id, e))?;

        let source =
            SourceImage::decode(&filename, payload).map_err(|e| self.fail_early(&request_id, e))?;

        let workspace = self
            .workspaces
            .create(&request_id)
            .await
            .map_err(|e| self.fail_early(&request_id, e))?;
        tracing::info!(
            request_id = %request_id,
            filename = %source.filename(),
            width = source.width(),
            height = source.height(),
            "Workspace created"
        );

        let mut stage = Stage::WorkspaceCreated;
        let outcome = self.process(&workspace, &source, &mut stage).await;
        let cleanup = workspace.destroy().await;

        match (outcome, cleanup) {
            (Ok(uploads), Ok(())) => {
                let keys: Vec<String> = uploads.iter().map(|u| u.key.clone()).collect();
                tracing::info!(request_id = %request_id, stage = %Stage::CleanedUp, ?keys, "Pipeline complete");
                Ok(PipelineOutput {
                    request_id,
                    keys,
                    uploads,
                    source: SourceSummary {
                        filename: source.filename().to_string(),
                        width: source.width(),
                        height: source.height(),
                        bytes: source.bytes().len(),
                    },
                })
            }
            (Ok(_), Err(cleanup_err)) => {
                tracing::error!(request_id = %request_id, error = %cleanup_err, "Workspace cleanup failed");
                Err(PipelineFailure::new(Stage::Uploaded, cleanup_err))
            }
            (Err(err), Ok(())) => {
                tracing::warn!(request_id = %request_id, %stage, error = %err, "Pipeline failed");
                Err(PipelineFailure::new(stage, err))
            }
            (Err(err), Err(cleanup_err)) => {
                tracing::error!(
                    request_id = %request_id,
                    %stage,
                    error = %err,
                    cleanup_error = %cleanup_err,
                    "Pipeline failed and workspace cleanup failed"
                );
                Err(PipelineFailure {
                    stage,
                    error: err,
                    cleanup_error: Some(cleanup_err),
                })
            }
        }
    }

    /// Stages run strictly in sequence; `stage` tracks the last one completed.
    async fn process(
        &self,
        workspace: &Workspace,
        source: &SourceImage,
        stage: &mut Stage,
    ) -> Result<Vec<UploadRecord>, PipelineError> {
        workspace
            .stage_original(source.filename(), source.bytes())
            .await?;
        *stage = Stage::OriginalStaged;

        let variants = resize_all(
            self.resampler.as_ref(),
            workspace,
            source.filename(),
            &self.config.sizes,
        )
        .await?;
        *stage = Stage::VariantsGenerated;
        tracing::info!(
            request_id = %workspace.request_id(),
            count = variants.len(),
            "Variants generated"
        );

        let uploads = upload_all(
            self.store.as_ref(),
            &self.config.storage,
            workspace,
            &variants,
        )
        .await?;
        *stage = Stage::Uploaded;

        Ok(uploads)
    }

    fn fail_early(&self, request_id: &RequestId, error: PipelineError) -> PipelineFailure {
        tracing::warn!(request_id = %request_id, error = %error, "Pipeline rejected before workspace creation");
        PipelineFailure::new(Stage::Idle, error)
    }
}
