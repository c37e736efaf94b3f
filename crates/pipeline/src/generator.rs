//! Variant generator: one resampler call per target size, fail-fast.

use std::path::{Path, PathBuf};

use thumbnailer_core::error::PipelineError;
use thumbnailer_core::naming::variant_filename;
use thumbnailer_core::sizes::TargetSizes;

use crate::resampler::Resampler;
use crate::workspace::Workspace;

/// A generated variant inside a workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantPath {
    pub size: u32,
    /// Relative name inside the workspace, `{size}_{original}`.
    pub name: String,
    path: PathBuf,
}

impl VariantPath {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Resize the staged `source_filename` to every size, in order.
///
/// The first failure aborts the call; later sizes are never attempted.
/// A resampler that reports success without producing the output file is
/// treated as a failure of that size.
pub async fn resize_all(
    resampler: &dyn Resampler,
    workspace: &Workspace,
    source_filename: &str,
    sizes: &TargetSizes,
) -> Result<Vec<VariantPath>, PipelineError> {
    let input = workspace.path_of(source_filename);
    let mut variants = Vec::with_capacity(sizes.len());

    for size in sizes.iter() {
        let name = variant_filename(size, source_filename);
        let output = workspace.path_of(&name);

        tracing::info!(request_id = %workspace.request_id(), size, "Resizing to {size}");
        resampler
            .resample(&input, &output, size)
            .await
            .map_err(|e| PipelineError::Resize {
                size,
                cause: e.to_string(),
            })?;

        let written = tokio::fs::try_exists(&output)
            .await
            .map_err(|e| PipelineError::Resize {
                size,
                cause: e.to_string(),
            })?;
        if !written {
            return Err(PipelineError::Resize {
                size,
                cause: format!("resampler did not write {name}"),
            });
        }

        variants.push(VariantPath {
            size,
            name,
            path: output,
        });
    }

    Ok(variants)
}
