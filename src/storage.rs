use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_s3::presigning::PresigningConfig;
use thiserror::Error;

/// How long a minted upload reference stays valid.
pub const UPLOAD_URL_EXPIRY: Duration = Duration::from_secs(3600);

#[derive(Debug, Error)]
pub enum ImageStoreError {
    #[error("presign failed for '{name}': {reason}")]
    Presign { name: String, reason: String },
    #[error("delete failed for '{name}': {reason}")]
    Delete { name: String, reason: String },
}

/// Object store seam. Uploads never pass through the handlers; only
/// pre-authorized upload references are minted here, and the caller pushes
/// the bytes out of band.
#[async_trait]
pub trait ImageStore: Send + Sync {
    async fn upload_url(&self, name: &str) -> Result<String, ImageStoreError>;
    async fn delete(&self, name: &str) -> Result<(), ImageStoreError>;
}

// ---------------- S3 implementation ----------------
pub struct S3ImageStore {
    bucket: String,
    client: aws_sdk_s3::Client,
}

impl S3ImageStore {
    pub fn new(client: aws_sdk_s3::Client, bucket: String) -> Self {
        Self { bucket, client }
    }
}

#[async_trait]
impl ImageStore for S3ImageStore {
    async fn upload_url(&self, name: &str) -> Result<String, ImageStoreError> {
        let presigning = PresigningConfig::expires_in(UPLOAD_URL_EXPIRY).map_err(|e| {
            ImageStoreError::Presign { name: name.to_string(), reason: e.to_string() }
        })?;
        let presigned = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(name)
            .presigned(presigning)
            .await
            .map_err(|e| ImageStoreError::Presign {
                name: name.to_string(),
                reason: e.to_string(),
            })?;
        Ok(presigned.uri().to_string())
    }

    async fn delete(&self, name: &str) -> Result<(), ImageStoreError> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(name)
            .send()
            .await
            .map_err(|e| ImageStoreError::Delete {
                name: name.to_string(),
                reason: e.to_string(),
            })?;
        Ok(())
    }
}
