//! Variant naming convention.
//!
//! Generates deterministic file names and storage keys for resized
//! variants from the target size and the original upload's filename.

use crate::error::PipelineError;
use crate::request::RequestId;

/// Generate the file name of the variant of `original` at `size`.
///
/// Convention: `{size}_{original}`. The size is always the leading segment,
/// so two different sizes of the same original can never collide.
///
/// # Examples
///
/// ```
/// use thumbnailer_core::naming::variant_filename;
///
/// assert_eq!(variant_filename(30, "photo.jpg"), "30_photo.jpg");
/// assert_eq!(variant_filename(160, "photo.jpg"), "160_photo.jpg");
/// ```
pub fn variant_filename(size: u32, original: &str) -> String {
    format!("{size}_{original}")
}

/// Storage key of a variant: `{request_id}/{variant_filename}`.
pub fn variant_key(request_id: &RequestId, variant_filename: &str) -> String {
    format!("{request_id}/{variant_filename}")
}

/// Square geometry string understood by the resampler, e.g. `80x80`.
pub fn square_geometry(size: u32) -> String {
    format!("{size}x{size}")
}

/// Ensure an uploaded filename is a single, plain path component.
pub fn validate_original_filename(name: &str) -> Result<(), PipelineError> {
    if name.is_empty() || name == "." || name == ".." {
        return Err(PipelineError::Validation(format!(
            "invalid upload filename '{name}'"
        )));
    }
    if name.contains(['/', '\\', '\0']) {
        return Err(PipelineError::Validation(format!(
            "upload filename '{name}' must not contain path separators"
        )));
    }
    Ok(())
}
