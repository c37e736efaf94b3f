#![allow(dead_code)]

use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use image::{ImageFormat, RgbImage};
use tempfile::TempDir;
use tower::ServiceExt;

use thumbnailer_api::config::{ServerConfig, StorageBackend};
use thumbnailer_api::router::build_app_router;
use thumbnailer_api::state::AppState;
use thumbnailer_core::sizes::TargetSizes;
use thumbnailer_core::storage::StorageTarget;
use thumbnailer_pipeline::resampler::ResampleError;
use thumbnailer_pipeline::{
    MemoryObjectStore, ObjectStore, Pipeline, PipelineConfig, Resampler,
};

pub const BOUNDARY: &str = "thumbnailer-test-boundary";

/// Build a test `ServerConfig` with safe defaults rooted at `tmp_dir`.
pub fn test_config(tmp_dir: &Path) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        request_timeout_secs: 30,
        settings_path: PathBuf::from("./config/settings.json"),
        tmp_dir: tmp_dir.to_path_buf(),
        convert_bin: "convert".to_string(),
        storage_backend: StorageBackend::Memory,
        max_upload_bytes: 20 * 1024 * 1024,
    }
}

pub fn test_target() -> StorageTarget {
    StorageTarget {
        bucket: "thumbs".to_string(),
        region: "us-east-1".to_string(),
    }
}

/// Resampler that writes a small placeholder instead of running ImageMagick.
pub struct StubResampler;

#[async_trait]
impl Resampler for StubResampler {
    async fn resample(&self, input: &Path, output: &Path, size: u32) -> Result<(), ResampleError> {
        tokio::fs::metadata(input).await?;
        tokio::fs::write(output, format!("thumb {size}")).await?;
        Ok(())
    }
}

/// Resampler that stalls before writing, to outlive a request timeout.
pub struct SlowResampler {
    pub delay: Duration,
}

#[async_trait]
impl Resampler for SlowResampler {
    async fn resample(&self, input: &Path, output: &Path, size: u32) -> Result<(), ResampleError> {
        tokio::time::sleep(self.delay).await;
        StubResampler.resample(input, output, size).await
    }
}

/// Poll until `path` is gone or `deadline` elapses; returns whether it is gone.
pub async fn wait_until_removed(path: &Path, deadline: Duration) -> bool {
    let start = tokio::time::Instant::now();
    while path.exists() {
        if start.elapsed() >= deadline {
            return false;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    true
}

/// A router plus handles on everything behind it.
pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryObjectStore>,
    pub tmp: TempDir,
}

impl TestApp {
    pub fn tmp_dir(&self) -> &Path {
        self.tmp.path()
    }
}

/// Build the full application router over an in-memory store and a stub
/// resampler, using the same middleware stack as production.
pub fn build_test_app() -> TestApp {
    build_test_app_with(MemoryObjectStore::new(), test_target())
}

pub fn build_test_app_with(store: MemoryObjectStore, storage: StorageTarget) -> TestApp {
    build_custom_test_app(store, storage, Arc::new(StubResampler), |_| {})
}

/// Build the router with a chosen resampler, letting the caller adjust the
/// server config (timeouts, body limit) before the middleware is assembled.
pub fn build_custom_test_app(
    store: MemoryObjectStore,
    storage: StorageTarget,
    resampler: Arc<dyn Resampler>,
    configure: impl FnOnce(&mut ServerConfig),
) -> TestApp {
    let tmp = tempfile::tempdir().unwrap();
    let mut config = test_config(tmp.path());
    configure(&mut config);
    let store = Arc::new(store);
    let object_store: Arc<dyn ObjectStore> = store.clone();

    let pipeline = Pipeline::new(
        PipelineConfig {
            base_dir: config.tmp_dir.clone(),
            sizes: TargetSizes::default(),
            storage,
        },
        resampler,
        object_store,
    );

    let state = AppState {
        pipeline: Arc::new(pipeline),
    };

    TestApp {
        router: build_app_router(state, &config),
        store,
        tmp,
    }
}

/// Encode a solid JPEG of the given dimensions.
pub fn jpeg(width: u32, height: u32) -> Vec<u8> {
    let mut buf = Vec::new();
    RgbImage::new(width, height)
        .write_to(&mut Cursor::new(&mut buf), ImageFormat::Jpeg)
        .unwrap();
    buf
}

/// One part of a multipart form.
pub enum Part<'a> {
    Text(&'a str, &'a str),
    File(&'a str, &'a str, &'a [u8]),
}

/// Encode a `multipart/form-data` body with [`BOUNDARY`].
pub fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n")
                        .as_bytes(),
                );
            }
            Part::File(name, filename, data) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\n\
                         Content-Type: application/octet-stream\r\n\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(data);
                body.extend_from_slice(b"\r\n");
            }
        }
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

/// POST a multipart form to `uri`.
pub async fn post_multipart(app: Router, uri: &str, parts: &[Part<'_>]) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(multipart_body(parts)))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
