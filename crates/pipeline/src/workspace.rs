//! Per-request working directories.
//!
//! A [`Workspace`] is the only handle through which pipeline code builds
//! paths under the working area, and [`Workspace::destroy`] is the only
//! deletion path.

use std::path::{Path, PathBuf};

use thumbnailer_core::error::PipelineError;
use thumbnailer_core::request::RequestId;
use tokio::io::AsyncWriteExt;

/// Creates and removes workspaces under a shared base directory.
#[derive(Debug, Clone)]
pub struct WorkspaceManager {
    base_dir: PathBuf,
}

impl WorkspaceManager {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Create `base_dir/request_id` (and parents) if absent.
    pub async fn create(&self, request_id: &RequestId) -> Result<Workspace, PipelineError> {
        let root = self.root_for(request_id);
        tokio::fs::create_dir_all(&root)
            .await
            .map_err(|e| PipelineError::storage("create", root.display(), e))?;

        tracing::debug!(path = %root.display(), "Workspace created");
        Ok(Workspace {
            root,
            request_id: request_id.clone(),
        })
    }

    /// Recursively remove the workspace of `request_id`.
    ///
    /// Removing a workspace that does not exist is not an error.
    pub async fn destroy(&self, request_id: &RequestId) -> Result<(), PipelineError> {
        remove_tree(&self.root_for(request_id)).await
    }

    fn root_for(&self, request_id: &RequestId) -> PathBuf {
        self.base_dir.join(request_id.as_str())
    }
}

/// Handle to one request's working directory.
#[derive(Debug)]
pub struct Workspace {
    root: PathBuf,
    request_id: RequestId,
}

impl Workspace {
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn request_id(&self) -> &RequestId {
        &self.request_id
    }

    /// Path of `name` inside this workspace.
    pub(crate) fn path_of(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    /// Write the uploaded bytes to `workspace/filename` and sync them.
    pub async fn stage_original(&self, filename: &str, bytes: &[u8]) -> Result<(), PipelineError> {
        let path = self.path_of(filename);
        let write = async {
            let mut file = tokio::fs::File::create(&path).await?;
            file.write_all(bytes).await?;
            file.sync_all().await
        };
        write
            .await
            .map_err(|e| PipelineError::storage("write", path.display(), e))?;

        tracing::debug!(path = %path.display(), bytes = bytes.len(), "Original staged");
        Ok(())
    }

    /// Read the full content of `name` from this workspace.
    pub async fn read(&self, name: &str) -> Result<Vec<u8>, PipelineError> {
        let path = self.path_of(name);
        tokio::fs::read(&path)
            .await
            .map_err(|e| PipelineError::storage("read", path.display(), e))
    }

    /// Recursively remove this workspace. Idempotent.
    pub async fn destroy(&self) -> Result<(), PipelineError> {
        remove_tree(&self.root).await?;
        tracing::debug!(path = %self.root.display(), "Workspace destroyed");
        Ok(())
    }
}

async fn remove_tree(path: &Path) -> Result<(), PipelineError> {
    match tokio::fs::remove_dir_all(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(PipelineError::storage("remove", path.display(), e)),
    }
}
