//! Object storage constants, target validation, and access policies.
//!
//! Provides the known-region registry, bucket/region validation, and the
//! fixed content type and ACL every variant is uploaded with.


use crate::error::PipelineError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Content type every variant is uploaded with.
pub const VARIANT_CONTENT_TYPE: &str = "image/png";

/// Regions an object store target may name.
pub const KNOWN_REGIONS: &[&str] = &[
    "us-east-1",
    "us-east-2",
    "us-west-1",
    "us-west-2",
    "us-gov-west-1",
    "ca-central-1",
    "sa-east-1",
    "eu-west-1",
    "eu-west-2",
    "eu-west-3",
    "eu-central-1",
    "eu-north-1",
    "ap-south-1",
    "ap-southeast-1",
    "ap-southeast-2",
    "ap-northeast-1",
    "ap-northeast-2",
    "ap-northeast-3",
    "cn-north-1",
];

// ---------------------------------------------------------------------------
// Region validation
// ---------------------------------------------------------------------------

/// Validate that `region` is one of [`KNOWN_REGIONS`].
pub fn validate_region(region: &str) -> Result<(), PipelineError> {
    if KNOWN_REGIONS.contains(&region) {
        Ok(())
    } else {
        Err(PipelineError::Config(format!(
            "Unknown storage region '{region}'"
        )))
    }
}

// ---------------------------------------------------------------------------
// Target
// ---------------------------------------------------------------------------

/// Bucket and region the variants are written to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageTarget {
    pub bucket: String,
    pub region: String,
}

impl StorageTarget {
    /// Check the target before any upload is attempted.
    pub fn validate(&self) -> Result<(), PipelineError> {
        validate_region(&self.region)?;
        if self.bucket.trim().is_empty() {
            return Err(PipelineError::Config(
                "Storage bucket must be a non-empty string".into(),
            ));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Access policy
// ---------------------------------------------------------------------------

/// Access policy attached to an uploaded object.
///
/// Variants are readable by any authenticated principal and never public.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessPolicy {
    AuthenticatedRead,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn known_region_is_valid() {
        assert!(validate_region("us-east-1").is_ok());
        assert!(validate_region("eu-west-1").is_ok());
    }

    #[test]
    fn unknown_region_names_region() {
        let err = validate_region("mars-north-1").unwrap_err();
        assert_matches!(&err, PipelineError::Config(msg) if msg.contains("mars-north-1"));
    }

    #[test]
    fn region_match_is_exact() {
        assert!(validate_region("US-EAST-1").is_err());
        assert!(validate_region("").is_err());
    }

    #[test]
    fn target_requires_bucket() {
        let target = StorageTarget {
            bucket: "  ".into(),
            region: "us-west-2".into(),
        };
        assert_matches!(target.validate(), Err(PipelineError::Config(_)));
    }

    #[test]
    fn target_valid() {
        let target = StorageTarget {
            bucket: "thumbs".into(),
            region: "us-west-2".into(),
        };
        assert!(target.validate().is_ok());
    }
}
