use async_trait::async_trait;
use aws_sdk_cloudfront::types::{InvalidationBatch, Paths};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum CdnError {
    #[error("invalidation failed for '{path}': {reason}")]
    Invalidation { path: String, reason: String },
}

/// CDN seam. Invalidations are fire-and-forget from the caller's point of
/// view; the submission itself is awaited but never re-verified.
#[async_trait]
pub trait Cdn: Send + Sync {
    async fn invalidate(&self, path: &str) -> Result<(), CdnError>;
}

// ---------------- CloudFront implementation ----------------
pub struct CloudFrontCdn {
    distribution_id: String,
    client: aws_sdk_cloudfront::Client,
}

impl CloudFrontCdn {
    pub fn new(client: aws_sdk_cloudfront::Client, distribution_id: String) -> Self {
        Self { distribution_id, client }
    }
}

#[async_trait]
impl Cdn for CloudFrontCdn {
    async fn invalidate(&self, path: &str) -> Result<(), CdnError> {
        let err = |e: String| CdnError::Invalidation { path: path.to_string(), reason: e };
        let paths = Paths::builder()
            .quantity(1)
            .items(path)
            .build()
            .map_err(|e| err(e.to_string()))?;
        let batch = InvalidationBatch::builder()
            .caller_reference(Uuid::new_v4().to_string())
            .paths(paths)
            .build()
            .map_err(|e| err(e.to_string()))?;
        self.client
            .create_invalidation()
            .distribution_id(&self.distribution_id)
            .invalidation_batch(batch)
            .send()
            .await
            .map_err(|e| err(e.to_string()))?;
        Ok(())
    }
}
