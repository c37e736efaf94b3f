//! Resampling capability.
//!
//! The pipeline never touches pixels itself. It hands an input path, an
//! output path and a square size to a [`Resampler`]. The production
//! implementation shells out to ImageMagick's `convert`.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thumbnailer_core::naming::square_geometry;

/// Default ImageMagick binary.
pub const DEFAULT_CONVERT_BIN: &str = "convert";

/// Unsharp mask applied after downscaling: radius 0, sigma 0.9.
pub const UNSHARP_MASK: &str = "0x.9";

/// Error type for a single resample invocation.
#[derive(Debug, thiserror::Error)]
pub enum ResampleError {
    #[error("resampler binary not found: {0}")]
    NotFound(std::io::Error),

    #[error("resampler failed (exit code {exit_code:?}): {stderr}")]
    ExecutionFailed {
        exit_code: Option<i32>,
        stderr: String,
    },

    #[error("resampler I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Produces one square variant of `input` at `output`.
///
/// Implementations are synchronous from the caller's view: the future
/// resolves once the output is complete or the attempt has failed. On
/// failure the output file must not be assumed to exist.
#[async_trait]
pub trait Resampler: Send + Sync {
    async fn resample(&self, input: &Path, output: &Path, size: u32) -> Result<(), ResampleError>;
}

/// Build the `convert` argument list for one square thumbnail.
///
/// Order matters: auto-orient precedes the thumbnail scale, and the
/// centered extent follows it.
pub fn convert_args(input: &Path, output: &Path, size: u32) -> Vec<OsString> {
    let dims = square_geometry(size);
    let mut args: Vec<OsString> = [
        "-auto-orient",
        "-thumbnail",
        dims.as_str(),
        "-gravity",
        "center",
        "-extent",
        dims.as_str(),
        "-unsharp",
        UNSHARP_MASK,
    ]
    .into_iter()
    .map(OsString::from)
    .collect();
    args.push(input.as_os_str().to_owned());
    args.push(output.as_os_str().to_owned());
    args
}

/// [`Resampler`] backed by an ImageMagick `convert` process.
#[derive(Debug, Clone)]
pub struct ImageMagickResampler {
    program: PathBuf,
}

impl ImageMagickResampler {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }
}

impl Default for ImageMagickResampler {
    fn default() -> Self {
        Self::new(DEFAULT_CONVERT_BIN)
    }
}

#[async_trait]
impl Resampler for ImageMagickResampler {
    async fn resample(&self, input: &Path, output: &Path, size: u32) -> Result<(), ResampleError> {
        tracing::debug!(size, input = %input.display(), output = %output.display(), "Resizing");

        // A dropped request must not leave `convert` running.
        let result = tokio::process::Command::new(&self.program)
            .args(convert_args(input, output, size))
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => ResampleError::NotFound(e),
                _ => ResampleError::Io(e),
            })?;

        if !result.status.success() {
            return Err(ResampleError::ExecutionFailed {
                exit_code: result.status.code(),
                stderr: String::from_utf8_lossy(&result.stderr).trim().to_string(),
            });
        }

        Ok(())
    }
}
