use std::fmt;

/// A fault raised by one stage of the transcoding pipeline.
///
/// Every variant carries enough context (size, key, path) for the caller to
/// tell which unit of work failed without inspecting logs.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Storage error during {op} of {path}: {source}")]
    Storage {
        op: &'static str,
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Resize to {size}x{size} failed: {cause}")]
    Resize { size: u32, cause: String },

    #[error("Upload of '{key}' failed: {cause}")]
    Upload { key: String, cause: String },

    #[error("Payload is not a decodable image: {0}")]
    Decode(String),

    #[error("Validation failed: {0}")]
    Validation(String),
}

impl PipelineError {
    /// Build a [`PipelineError::Storage`] for a filesystem operation on `path`.
    pub fn storage(op: &'static str, path: impl fmt::Display, source: std::io::Error) -> Self {
        Self::Storage {
            op,
            path: path.to_string(),
            source,
        }
    }

    /// Underlying cause as a plain string, without the stage prefix.
    pub fn cause(&self) -> String {
        match self {
            Self::Config(msg) | Self::Decode(msg) | Self::Validation(msg) => msg.clone(),
            Self::Storage { source, .. } => source.to_string(),
            Self::Resize { cause, .. } | Self::Upload { cause, .. } => cause.clone(),
        }
    }
}

/// Pipeline stage reached when a request finished or failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idle,
    WorkspaceCreated,
    OriginalStaged,
    VariantsGenerated,
    Uploaded,
    CleanedUp,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::WorkspaceCreated => "workspace_created",
            Self::OriginalStaged => "original_staged",
            Self::VariantsGenerated => "variants_generated",
            Self::Uploaded => "uploaded",
            Self::CleanedUp => "cleaned_up",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terminal fault of one pipeline run.
///
/// `stage` is the last stage the run completed before `error` occurred.
/// When cleanup also failed, its fault is kept in `cleanup_error`; `error`
/// always remains the triggering fault.
#[derive(Debug, thiserror::Error)]
#[error("pipeline failed after stage {stage}: {error}")]
pub struct PipelineFailure {
    pub stage: Stage,
    #[source]
    pub error: PipelineError,
    pub cleanup_error: Option<PipelineError>,
}

impl PipelineFailure {
    pub fn new(stage: Stage, error: PipelineError) -> Self {
        Self {
            stage,
            error,
            cleanup_error: None,
        }
    }
}
