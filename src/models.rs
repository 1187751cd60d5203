use chrono::{DateTime, SecondsFormat, Utc};
use chrono_tz::Australia::Sydney;
use serde::{Deserialize, Serialize};

/// A stored post record. `imageUrls` is derived at read time and never
/// persisted; every other field is written once at creation, except `report`
/// and `buildSite` which the update handler may change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// Fixed partition value shared by all posts (configuration-supplied).
    pub id: String,
    /// Per-post unique identifier, informational only.
    pub post_id: String,
    /// Sort key: ISO-8601 timestamp in Australia/Sydney local time.
    pub created_at: String,
    pub name: String,
    pub hours: String,
    pub costs: String,
    pub report: String,
    pub build_site: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_names: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_urls: Option<Vec<String>>,
}

/// Create-post request body. All five string fields are required; a typed
/// parse failure is a validation error.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPost {
    pub name: String,
    pub hours: String,
    pub costs: String,
    pub report: String,
    pub build_site: String,
    #[serde(default)]
    pub image_names: Option<Vec<String>>,
}

/// Update-post request body; the only two mutable fields.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePost {
    pub report: String,
    pub build_site: String,
}

/// Delete-post request body. The whole body is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteBody {
    #[serde(default)]
    pub image_names: Option<Vec<String>>,
}

/// Current time in the fixed deployment time zone, RFC 3339.
pub fn sydney_now() -> String {
    Utc::now()
        .with_timezone(&Sydney)
        .to_rfc3339_opts(SecondsFormat::Micros, false)
}

/// Re-impose newest-first order regardless of store-level ordering quirks.
pub fn sort_newest_first(posts: &mut [Post]) {
    posts.sort_by_key(|p| std::cmp::Reverse(parse_created_at(&p.created_at)));
}

fn parse_created_at(raw: &str) -> i64 {
    DateTime::parse_from_rfc3339(raw)
        .map(|d| d.timestamp_micros())
        .unwrap_or(i64::MIN)
}

/// Derive `imageUrls` by prefixing each image name with the CDN base URL.
/// Posts without image names are left untouched; re-deriving is idempotent.
pub fn with_image_urls(mut post: Post, base_url: &str) -> Post {
    if let Some(names) = &post.image_names {
        post.image_urls = Some(
            names
                .iter()
                .map(|name| format!("{base_url}{name}"))
                .collect(),
        );
    }
    post
}
