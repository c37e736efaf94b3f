//! JSON settings file: target sizes and the S3 target.
//!
//! ```json
//! {
//!   "sizes": [30, 60, 80, 160],
//!   "s3": { "access_key": "...", "secret_key": "...", "bucket": "thumbs", "region": "us-east-1" }
//! }
//! ```
//!
//! Loaded once at startup; the values are then handed to the pipeline and
//! never read again.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thumbnailer_cloud::S3Credentials;
use thumbnailer_core::error::PipelineError;
use thumbnailer_core::sizes::TargetSizes;
use thumbnailer_core::storage::StorageTarget;

/// Error loading the settings file.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Unable to read settings file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed settings: {0}")]
    Parse(#[from] serde_json::Error),

    #[error(transparent)]
    Invalid(#[from] PipelineError),
}

#[derive(Debug, Deserialize)]
struct RawSettings {
    #[serde(default)]
    sizes: Option<Vec<u32>>,
    s3: RawS3Settings,
}

#[derive(Debug, Deserialize)]
struct RawS3Settings {
    #[serde(flatten)]
    credentials: S3Credentials,
    bucket: String,
    region: String,
}

/// Validated settings.
#[derive(Debug, Clone)]
pub struct Settings {
    pub sizes: TargetSizes,
    pub storage: StorageTarget,
    pub credentials: S3Credentials,
}

impl Settings {
    /// Read and validate the settings file at `path`.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let text = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// Parse settings from JSON text.
    ///
    /// A missing `sizes` list falls back to the default thumbnail set. The
    /// region is not checked here; the pipeline and the S3 store reject an
    /// unknown region before doing any I/O.
    pub fn from_json(text: &str) -> Result<Self, SettingsError> {
        let raw: RawSettings = serde_json::from_str(text)?;

        let sizes = match raw.sizes {
            Some(sizes) => TargetSizes::new(sizes)?,
            None => TargetSizes::default(),
        };

        Ok(Self {
            sizes,
            storage: StorageTarget {
                bucket: raw.s3.bucket,
                region: raw.s3.region,
            },
            credentials: raw.s3.credentials,
        })
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    const FULL: &str = r#"{
        "sizes": [30, 60, 80, 160],
        "s3": {
            "secret_key": "secret",
            "access_key": "access",
            "bucket": "thumbs",
            "region": "us-west-2"
        }
    }"#;

    #[test]
    fn parses_full_settings() {
        let settings = Settings::from_json(FULL).unwrap();
        assert_eq!(settings.sizes.as_slice(), &[30, 60, 80, 160]);
        assert_eq!(settings.storage.bucket, "thumbs");
        assert_eq!(settings.storage.region, "us-west-2");
        assert_eq!(settings.credentials.access_key, "access");
        assert_eq!(settings.credentials.secret_key, "secret");
    }

    #[test]
    fn missing_sizes_use_default() {
        let settings = Settings::from_json(
            r#"{ "s3": { "access_key": "a", "secret_key": "s", "bucket": "b", "region": "eu-west-1" } }"#,
        )
        .unwrap();
        assert_eq!(settings.sizes, TargetSizes::default());
    }

    #[test]
    fn empty_sizes_rejected() {
        let result = Settings::from_json(
            r#"{ "sizes": [], "s3": { "access_key": "a", "secret_key": "s", "bucket": "b", "region": "eu-west-1" } }"#,
        );
        assert_matches!(result, Err(SettingsError::Invalid(PipelineError::Config(_))));
    }

    #[test]
    fn missing_s3_section_is_parse_error() {
        assert_matches!(Settings::from_json(r#"{ "sizes": [30] }"#), Err(SettingsError::Parse(_)));
    }

    #[test]
    fn unknown_region_is_loaded_unchanged() {
        let settings = Settings::from_json(
            r#"{ "s3": { "access_key": "a", "secret_key": "s", "bucket": "b", "region": "nowhere-1" } }"#,
        )
        .unwrap();
        assert!(settings.storage.validate().is_err());
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let result = Settings::load(Path::new("/nonexistent/settings.json"));
        assert_matches!(result, Err(SettingsError::Io { .. }));
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, FULL).unwrap();
        assert_eq!(Settings::load(&path).unwrap().storage.bucket, "thumbs");
    }
}
