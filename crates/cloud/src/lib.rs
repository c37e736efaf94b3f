//! Cloud object storage providers.

pub mod s3;

pub use s3::{S3Credentials, S3ObjectStore};
