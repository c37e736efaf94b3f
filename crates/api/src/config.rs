use std::path::PathBuf;

/// Where variants are persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    /// Amazon S3, configured from the settings file.
    S3,
    /// In-process store, for local development.
    Memory,
}

impl StorageBackend {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "s3" => Some(Self::S3),
            "memory" => Some(Self::Memory),
            _ => None,
        }
    }
}

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// HTTP request timeout in seconds (default: `60`).
    pub request_timeout_secs: u64,
    /// JSON settings file with target sizes and S3 target.
    pub settings_path: PathBuf,
    /// Base directory for per-request workspaces.
    pub tmp_dir: PathBuf,
    /// ImageMagick `convert` binary.
    pub convert_bin: String,
    pub storage_backend: StorageBackend,
    /// Largest accepted request body in bytes.
    pub max_upload_bytes: usize,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `REQUEST_TIMEOUT_SECS` | `60`                       |
    /// | `SETTINGS_PATH`        | `./config/settings.json`   |
    /// | `TMP_DIR`              | system temp directory      |
    /// | `CONVERT_BIN`          | `convert`                  |
    /// | `STORAGE_BACKEND`      | `s3`                       |
    /// | `MAX_UPLOAD_BYTES`     | `20971520`                 |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "60".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let settings_path = std::env::var("SETTINGS_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./config/settings.json"));

        let tmp_dir = std::env::var("TMP_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| std::env::temp_dir());

        let convert_bin = std::env::var("CONVERT_BIN").unwrap_or_else(|_| "convert".into());

        let storage_backend = std::env::var("STORAGE_BACKEND")
            .map(|v| {
                StorageBackend::from_name(&v)
                    .unwrap_or_else(|| panic!("STORAGE_BACKEND must be 's3' or 'memory', got '{v}'"))
            })
            .unwrap_or(StorageBackend::S3);

        let max_upload_bytes: usize = std::env::var("MAX_UPLOAD_BYTES")
            .unwrap_or_else(|_| "20971520".into())
            .parse()
            .expect("MAX_UPLOAD_BYTES must be a valid usize");

        Self {
            host,
            port,
            request_timeout_secs,
            settings_path,
            tmp_dir,
            convert_bin,
            storage_backend,
            max_upload_bytes,
        }
    }
}
