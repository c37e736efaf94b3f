//! Test doubles shared by the pipeline unit tests.

use std::io::Cursor;
use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use image::{ImageFormat, RgbImage};

use crate::resampler::{ResampleError, Resampler};

/// Resampler that writes a small marker file instead of invoking ImageMagick.
///
/// Records every size it was asked for, in call order. Fails on `fail_at`,
/// and skips writing the output for `skip_output_at`.
#[derive(Default)]
pub struct FakeResampler {
    pub calls: Mutex<Vec<u32>>,
    pub fail_at: Option<u32>,
    pub skip_output_at: Option<u32>,
}

impl FakeResampler {
    pub fn failing_at(size: u32) -> Self {
        Self {
            fail_at: Some(size),
            ..Self::default()
        }
    }

    pub fn silent_at(size: u32) -> Self {
        Self {
            skip_output_at: Some(size),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<u32> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Resampler for FakeResampler {
    async fn resample(&self, input: &Path, output: &Path, size: u32) -> Result<(), ResampleError> {
        self.calls.lock().unwrap().push(size);

        if !tokio::fs::try_exists(input).await? {
            return Err(ResampleError::ExecutionFailed {
                exit_code: Some(1),
                stderr: format!("unable to open image '{}'", input.display()),
            });
        }
        if self.fail_at == Some(size) {
            return Err(ResampleError::ExecutionFailed {
                exit_code: Some(1),
                stderr: "convert: no decode delegate".into(),
            });
        }
        if self.skip_output_at != Some(size) {
            tokio::fs::write(output, format!("variant {size}")).await?;
        }
        Ok(())
    }
}

/// Encode a black square JPEG of the given edge.
pub fn jpeg(edge: u32) -> Vec<u8> {
    let mut buf = Vec::new();
    RgbImage::new(edge, edge)
        .write_to(&mut Cursor::new(&mut buf), ImageFormat::Jpeg)
        .expect("encode test jpeg");
    buf
}
