//! Target size set: the ordered square edges every request is resized to.

use crate::error::PipelineError;

/// Sizes produced when the settings file does not list any.
pub const DEFAULT_SIZES: &[u32] = &[30, 60, 80, 160];

/// Ordered, non-empty list of distinct positive square sizes (pixels).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetSizes(Vec<u32>);

impl TargetSizes {
    /// Validate and wrap `sizes`, preserving order.
    ///
    /// Duplicates are rejected because two equal sizes would produce the
    /// same variant name.
    pub fn new(sizes: Vec<u32>) -> Result<Self, PipelineError> {
        if sizes.is_empty() {
            return Err(PipelineError::Config(
                "target size set must not be empty".into(),
            ));
        }
        for (i, size) in sizes.iter().enumerate() {
            if *size == 0 {
                return Err(PipelineError::Config(format!(
                    "target size at position {i} must be positive"
                )));
            }
            if sizes[..i].contains(size) {
                return Err(PipelineError::Config(format!(
                    "target size {size} is listed more than once"
                )));
            }
        }
        Ok(Self(sizes))
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.0.iter().copied()
    }
}

impl Default for TargetSizes {
    fn default() -> Self {
        Self(DEFAULT_SIZES.to_vec())
    }
}
