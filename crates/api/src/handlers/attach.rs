//! Handler for the `/attach` upload endpoint.

use std::sync::Arc;

use axum::extract::{Multipart, State};
use axum::Json;
use serde::Serialize;
use thumbnailer_core::request::RequestId;
use thumbnailer_core::storage::VARIANT_CONTENT_TYPE;
use thumbnailer_pipeline::{PipelineOutput, PipelineRequest};

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// One stored variant.
#[derive(Debug, Serialize)]
pub struct VariantResponse {
    pub size: u32,
    pub key: String,
    pub bytes: usize,
}

/// The original upload as received.
#[derive(Debug, Serialize)]
pub struct SourceResponse {
    pub filename: String,
    pub width: u32,
    pub height: u32,
    pub bytes: usize,
}

/// Body of a successful `/attach` call.
#[derive(Debug, Serialize)]
pub struct AttachResponse {
    pub request_id: String,
    /// Storage keys in configured size order.
    pub keys: Vec<String>,
    pub variants: Vec<VariantResponse>,
    pub source: SourceResponse,
    pub content_type: &'static str,
}

impl From<PipelineOutput> for AttachResponse {
    fn from(output: PipelineOutput) -> Self {
        Self {
            request_id: output.request_id.to_string(),
            keys: output.keys,
            variants: output
                .uploads
                .into_iter()
                .map(|u| VariantResponse {
                    size: u.size,
                    key: u.key,
                    bytes: u.bytes,
                })
                .collect(),
            source: SourceResponse {
                filename: output.source.filename,
                width: output.source.width,
                height: output.source.height,
                bytes: output.source.bytes,
            },
            content_type: VARIANT_CONTENT_TYPE,
        }
    }
}

/// POST /attach
///
/// Accepts a multipart form with the fields:
/// - `userId`: request identity, names the workspace and key prefix
/// - `sig`: request signature (accepted, not verified)
/// - `file`: the image; its part filename becomes the original filename
///
/// Resizes the image to every configured size and uploads each variant.
pub async fn attach(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<Json<DataResponse<AttachResponse>>> {
    let mut user_id: Option<String> = None;
    let mut file_data: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "userId" => {
                user_id = Some(field.text().await?);
            }
            "file" => {
                let filename = field
                    .file_name()
                    .map(str::to_string)
                    .ok_or_else(|| AppError::BadRequest("'file' field has no filename".into()))?;
                let data = field.bytes().await?;
                file_data = Some((filename, data.to_vec()));
            }
            _ => {} // `sig` and unknown fields are ignored
        }
    }

    let user_id =
        user_id.ok_or_else(|| AppError::BadRequest("Missing required 'userId' field".into()))?;
    let (filename, payload) =
        file_data.ok_or_else(|| AppError::BadRequest("Missing required 'file' field".into()))?;

    let request_id = RequestId::parse(user_id.trim())?;
    tracing::info!(
        request_id = %request_id,
        filename = %filename,
        bytes = payload.len(),
        "Attach request received"
    );

    // The run owns its workspace until cleanup; a timed-out or abandoned
    // request must not cancel it halfway.
    let pipeline = Arc::clone(&state.pipeline);
    let output = tokio::spawn(async move {
        pipeline
            .run(PipelineRequest {
                request_id,
                filename,
                payload,
            })
            .await
    })
    .await
    .map_err(|e| AppError::InternalError(format!("pipeline task failed: {e}")))??;

    Ok(Json(DataResponse {
        data: output.into(),
    }))
}
