//! Amazon S3 (and compatible) object store.

use std::fmt;

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_credential_types::Credentials;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::error::{DisplayErrorContext, SdkError};
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::ObjectCannedAcl;
use serde::Deserialize;
use thumbnailer_core::error::PipelineError;
use thumbnailer_core::storage::{AccessPolicy, StorageTarget};
use thumbnailer_pipeline::store::{ObjectStore, PutObject, StoreError};

/// Name reported by the static credentials provider.
const CREDENTIALS_PROVIDER_NAME: &str = "thumbnailer-settings";

/// Static access key pair read from the settings file.
#[derive(Clone, Deserialize)]
pub struct S3Credentials {
    pub access_key: String,
    pub secret_key: String,
}

impl fmt::Debug for S3Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("S3Credentials")
            .field("access_key", &self.access_key)
            .field("secret_key", &"<redacted>")
            .finish()
    }
}

/// [`ObjectStore`] writing to one S3 bucket.
#[derive(Debug, Clone)]
pub struct S3ObjectStore {
    client: aws_sdk_s3::Client,
    bucket: String,
}

impl S3ObjectStore {
    /// Build a client for `target` using static credentials.
    ///
    /// The target is validated first, so an unknown region fails here with
    /// [`PipelineError::Config`] instead of on the first upload.
    pub async fn connect(
        target: &StorageTarget,
        credentials: &S3Credentials,
    ) -> Result<Self, PipelineError> {
        target.validate()?;

        let provider = Credentials::new(
            credentials.access_key.clone(),
            credentials.secret_key.clone(),
            None,
            None,
            CREDENTIALS_PROVIDER_NAME,
        );
        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(target.region.clone()))
            .credentials_provider(provider)
            .load()
            .await;

        tracing::info!(bucket = %target.bucket, region = %target.region, "S3 object store configured");
        Ok(Self::from_client(
            aws_sdk_s3::Client::new(&sdk_config),
            target.bucket.clone(),
        ))
    }

    pub fn from_client(client: aws_sdk_s3::Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }
}

/// Map an access policy onto the S3 canned ACL.
pub fn canned_acl(policy: AccessPolicy) -> ObjectCannedAcl {
    match policy {
        AccessPolicy::AuthenticatedRead => ObjectCannedAcl::AuthenticatedRead,
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn put(&self, object: PutObject) -> Result<(), StoreError> {
        let PutObject {
            key,
            body,
            content_type,
            access,
        } = object;

        let result = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .body(ByteStream::from(body))
            .content_type(content_type)
            .acl(canned_acl(access))
            .send()
            .await;

        match result {
            Ok(_) => {
                tracing::debug!(bucket = %self.bucket, key = %key, "Object stored");
                Ok(())
            }
            Err(err @ SdkError::ServiceError(_)) => Err(StoreError::Rejected {
                key,
                message: DisplayErrorContext(&err).to_string(),
            }),
            Err(err) => Err(StoreError::Transport(DisplayErrorContext(&err).to_string())),
        }
    }
}
