//! The originally uploaded image, captured once at ingestion.

use std::io::Cursor;

use image::ImageReader;

use crate::error::PipelineError;
use crate::naming::validate_original_filename;

/// Immutable uploaded image: bytes, declared filename and pixel dimensions.
#[derive(Debug, Clone)]
pub struct SourceImage {
    filename: String,
    bytes: Vec<u8>,
    width: u32,
    height: u32,
}

impl SourceImage {
    /// Validate `filename` and read the dimensions from the image header.
    ///
    /// The format is sniffed from the content, not the filename. Payloads
    /// that are not a supported image fail with [`PipelineError::Decode`].
    pub fn decode(filename: &str, bytes: Vec<u8>) -> Result<Self, PipelineError> {
        validate_original_filename(filename)?;

        if bytes.is_empty() {
            return Err(PipelineError::Decode("payload is empty".into()));
        }

        let (width, height) = ImageReader::new(Cursor::new(bytes.as_slice()))
            .with_guessed_format()
            .map_err(|e| PipelineError::Decode(e.to_string()))?
            .into_dimensions()
            .map_err(|e| PipelineError::Decode(e.to_string()))?;

        Ok(Self {
            filename: filename.to_string(),
            bytes,
            width,
            height,
        })
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}
