pub mod create;
pub mod delete;
pub mod list;
pub mod update;

use std::sync::Arc;

use crate::cdn::{Cdn, CloudFrontCdn};
use crate::config::Config;
use crate::repo::{DynamoPostRepo, PostRepo};
use crate::storage::{ImageStore, S3ImageStore};

/// Shared-by-reference service handles, built once per process and reused
/// across invocations with no per-request teardown.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<dyn PostRepo>,
    pub images: Arc<dyn ImageStore>,
    pub cdn: Arc<dyn Cdn>,
    pub config: Config,
}

/// Construct the AWS-backed state used by the Lambda binaries.
pub async fn app_state(config: Config) -> AppState {
    let shared = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(aws_config::Region::new(config.region.clone()))
        .load()
        .await;
    AppState {
        repo: Arc::new(DynamoPostRepo::new(
            aws_sdk_dynamodb::Client::new(&shared),
            config.table_name.clone(),
            config.partition_id.clone(),
        )),
        images: Arc::new(S3ImageStore::new(
            aws_sdk_s3::Client::new(&shared),
            config.bucket_name.clone(),
        )),
        cdn: Arc::new(CloudFrontCdn::new(
            aws_sdk_cloudfront::Client::new(&shared),
            config.cdn_distribution_id.clone(),
        )),
        config,
    }
}
