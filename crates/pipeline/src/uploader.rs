//! Upload adapter: reads each variant from the workspace and puts it into
//! the object store, sequentially and fail-fast.

use thumbnailer_core::error::PipelineError;
use thumbnailer_core::naming::variant_key;
use thumbnailer_core::storage::{AccessPolicy, StorageTarget, VARIANT_CONTENT_TYPE};

use crate::generator::VariantPath;
use crate::store::{ObjectStore, PutObject};
use crate::workspace::Workspace;

/// Outcome of persisting one variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRecord {
    pub size: u32,
    pub key: String,
    pub bytes: usize,
}

/// Upload every variant in order.
///
/// The target is validated before the first attempt. The first failed put
/// aborts the remaining uploads; objects already written stay in place.
pub async fn upload_all(
    store: &dyn ObjectStore,
    target: &StorageTarget,
    workspace: &Workspace,
    variants: &[VariantPath],
) -> Result<Vec<UploadRecord>, PipelineError> {
    target.validate()?;

    let mut records = Vec::with_capacity(variants.len());
    for variant in variants {
        let body = workspace.read(&variant.name).await?;
        let key = variant_key(workspace.request_id(), &variant.name);
        let bytes = body.len();

        tracing::debug!(bucket = %target.bucket, key = %key, bytes, "Uploading variant");
        store
            .put(PutObject {
                key: key.clone(),
                body,
                content_type: VARIANT_CONTENT_TYPE.to_string(),
                access: AccessPolicy::AuthenticatedRead,
            })
            .await
            .map_err(|e| PipelineError::Upload {
                key: key.clone(),
                cause: e.to_string(),
            })?;

        records.push(UploadRecord {
            size: variant.size,
            key,
            bytes,
        });
    }

    Ok(records)
}
