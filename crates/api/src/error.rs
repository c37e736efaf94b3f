use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thumbnailer_core::error::{PipelineError, PipelineFailure};

/// Application-level error type for HTTP handlers.
///
/// Wraps pipeline faults and adds HTTP-specific variants. Implements
/// [`IntoResponse`] to produce consistent JSON error responses of the form
/// `{ "error": <short message>, "code": <machine code>, "cause": <detail> }`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A terminal failure of a pipeline run.
    #[error(transparent)]
    Pipeline(#[from] PipelineFailure),

    /// A pipeline-level fault raised before a run started (e.g. invalid request id).
    #[error(transparent)]
    Rejected(#[from] PipelineError),

    /// The multipart body could not be read (malformed, or over the size limit).
    #[error(transparent)]
    Multipart(#[from] MultipartError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            AppError::Pipeline(failure) => {
                let (status, code, message) = classify(&failure.error);
                if status.is_server_error() {
                    tracing::error!(error = %failure, "Pipeline failure");
                }
                let mut body = json!({
                    "error": message,
                    "code": code,
                    "cause": failure.error.cause(),
                    "stage": failure.stage.as_str(),
                });
                if let Some(cleanup) = &failure.cleanup_error {
                    tracing::error!(error = %cleanup, "Workspace cleanup failed after pipeline fault");
                    body["cleanup_error"] = json!(cleanup.to_string());
                }
                (status, body)
            }
            AppError::Rejected(err) => {
                let (status, code, message) = classify(err);
                (status, json!({ "error": message, "code": code, "cause": err.cause() }))
            }
            AppError::Multipart(err) => {
                let status = err.status();
                let (code, message) = if status == StatusCode::PAYLOAD_TOO_LARGE {
                    ("PAYLOAD_TOO_LARGE", "Payload too large")
                } else {
                    ("BAD_REQUEST", "Bad request")
                };
                (
                    status,
                    json!({ "error": message, "code": code, "cause": err.body_text() }),
                )
            }
            AppError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                json!({ "error": "Bad request", "code": "BAD_REQUEST", "cause": msg }),
            ),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({
                        "error": "An internal error occurred",
                        "code": "INTERNAL_ERROR",
                        "cause": "-",
                    }),
                )
            }
        };

        (status, axum::Json(body)).into_response()
    }
}

/// Classify a pipeline fault into an HTTP status, error code, and short message.
fn classify(err: &PipelineError) -> (StatusCode, &'static str, &'static str) {
    match err {
        PipelineError::Config(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "CONFIG_ERROR",
            "Invalid storage configuration",
        ),
        PipelineError::Storage { op, .. } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "STORAGE_ERROR",
            storage_label(op),
        ),
        PipelineError::Resize { .. } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "RESIZE_ERROR",
            "Resize Fail",
        ),
        PipelineError::Upload { .. } => (StatusCode::BAD_GATEWAY, "UPLOAD_ERROR", "S3 Fail"),
        PipelineError::Decode(_) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            "DECODE_ERROR",
            "Bad file",
        ),
        PipelineError::Validation(_) => (
            StatusCode::BAD_REQUEST,
            "VALIDATION_ERROR",
            "Invalid request",
        ),
    }
}

/// Storage faults are labelled by the filesystem operation that failed.
fn storage_label(op: &str) -> &'static str {
    match op {
        "create" | "write" => "Transcoder Init Fail",
        "read" => "Reading variant failed",
        "remove" => "Removing dir",
        _ => "Storage failure",
    }
}
