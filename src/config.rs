/// Environment-style configuration, read once at process start.
///
/// Lambda deployments inject these variables; local runs can place them in a
/// `.env` file (loaded by the binaries in debug builds only).
#[derive(Debug, Clone)]
pub struct Config {
    pub region: String,
    pub table_name: String,
    pub bucket_name: String,
    /// Base URL prepended to image names when deriving `imageUrls`.
    pub cdn_base_url: String,
    pub cdn_distribution_id: String,
    /// Fixed partition-key value shared by every post record.
    pub partition_id: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            region: require("REGION_NAME")?,
            table_name: require("DYNAMO_TABLE_NAME")?,
            bucket_name: require("S3_BUCKET_NAME")?,
            cdn_base_url: require("CLOUDFRONT_URL")?,
            cdn_distribution_id: require("CLOUDFRONT_DISTRIBUTION_ID")?,
            partition_id: require("POST_PARTITION_ID")?,
        })
    }
}

fn require(name: &str) -> anyhow::Result<String> {
    std::env::var(name).map_err(|_| anyhow::anyhow!("{name} must be set"))
}
