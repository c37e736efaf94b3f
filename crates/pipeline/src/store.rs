//! Storage-upload contract and an in-process implementation.

use std::sync::Mutex;

use async_trait::async_trait;
use thumbnailer_core::storage::AccessPolicy;

/// One object handed to an [`ObjectStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PutObject {
    pub key: String,
    pub body: Vec<u8>,
    pub content_type: String,
    pub access: AccessPolicy,
}

/// Error returned by an object store `put`.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("object store rejected '{key}': {message}")]
    Rejected { key: String, message: String },

    #[error("object store transport error: {0}")]
    Transport(String),
}

/// Durable destination for variant bytes.
///
/// Credentials, region resolution and transport are the implementation's
/// concern. Callers only see success or a [`StoreError`].
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn put(&self, object: PutObject) -> Result<(), StoreError>;
}

/// Object store that keeps everything in memory.
///
/// Used for local development (`STORAGE_BACKEND=memory`) and tests.
#[derive(Debug, Default)]
pub struct MemoryObjectStore {
    objects: Mutex<Vec<PutObject>>,
    attempts: Mutex<Vec<String>>,
    fail_on: Option<String>,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that rejects `key` and accepts everything else.
    pub fn failing_on(key: impl Into<String>) -> Self {
        Self {
            fail_on: Some(key.into()),
            ..Self::default()
        }
    }

    /// Objects stored so far, in upload order.
    pub fn objects(&self) -> Vec<PutObject> {
        self.objects.lock().map(|o| o.clone()).unwrap_or_default()
    }

    /// Keys stored so far, in upload order.
    pub fn keys(&self) -> Vec<String> {
        self.objects().into_iter().map(|o| o.key).collect()
    }

    /// Every key a `put` was attempted for, including rejected ones.
    pub fn attempts(&self) -> Vec<String> {
        self.attempts.lock().map(|a| a.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn put(&self, object: PutObject) -> Result<(), StoreError> {
        if let Ok(mut attempts) = self.attempts.lock() {
            attempts.push(object.key.clone());
        }

        if self.fail_on.as_deref() == Some(object.key.as_str()) {
            return Err(StoreError::Rejected {
                key: object.key,
                message: "access denied".into(),
            });
        }

        let mut objects = self
            .objects
            .lock()
            .map_err(|e| StoreError::Transport(e.to_string()))?;
        objects.retain(|o| o.key != object.key);
        objects.push(object);
        Ok(())
    }
}
