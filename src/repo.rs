use async_trait::async_trait;
use aws_sdk_dynamodb::types::{AttributeValue, ReturnValue};
use serde_dynamo::aws_sdk_dynamodb_1::{from_item, from_items, to_item};

use crate::models::{Post, UpdatePost};

#[derive(thiserror::Error, Debug)]
pub enum RepoError {
    #[error("not found")] NotFound,
    #[error("bad record shape: {0}")] Schema(String),
    #[error("store error: {0}")] Store(String),
}

pub type RepoResult<T> = Result<T, RepoError>;

/// One page worth of query input. `upper_bound` caps the sort key at "now";
/// `cursor` is the last-seen sort-key value (exclusive start).
#[derive(Debug, Clone)]
pub struct PageQuery {
    pub limit: u32,
    pub cursor: Option<String>,
    pub build_site: Option<String>,
    pub upper_bound: String,
}

#[derive(Debug, Clone)]
pub struct PostPage {
    pub posts: Vec<Post>,
    pub continuation_token: Option<String>,
}

#[async_trait]
pub trait PostRepo: Send + Sync {
    async fn put_post(&self, post: &Post) -> RepoResult<()>;
    async fn query_posts(&self, query: &PageQuery) -> RepoResult<PostPage>;
    /// Patch `report` and `buildSite` on an existing record, returning the
    /// full post-update record. Never creates a record.
    async fn update_post(&self, created_at: &str, patch: &UpdatePost) -> RepoResult<Post>;
    /// Remove a record by key, returning the old record when one existed.
    async fn delete_post(&self, created_at: &str) -> RepoResult<Option<Post>>;
}

// ---------------- DynamoDB implementation ----------------
//
// Key model: every record shares the configured partition value in `id` and
// is addressed by its `createdAt` sort key. Update and Delete receive that
// sort-key value from the request path.
pub struct DynamoPostRepo {
    client: aws_sdk_dynamodb::Client,
    table_name: String,
    partition_id: String,
}

impl DynamoPostRepo {
    pub fn new(client: aws_sdk_dynamodb::Client, table_name: String, partition_id: String) -> Self {
        Self { client, table_name, partition_id }
    }

    fn key(&self, created_at: &str) -> [(String, AttributeValue); 2] {
        [
            ("id".to_string(), AttributeValue::S(self.partition_id.clone())),
            ("createdAt".to_string(), AttributeValue::S(created_at.to_string())),
        ]
    }
}

#[async_trait]
impl PostRepo for DynamoPostRepo {
    async fn put_post(&self, post: &Post) -> RepoResult<()> {
        let item = to_item(post).map_err(|e| RepoError::Schema(e.to_string()))?;
        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(item))
            // a sort-key collision must surface instead of overwriting
            .condition_expression("attribute_not_exists(createdAt)")
            .send()
            .await
            .map_err(|e| {
                let collision = e
                    .as_service_error()
                    .map(|se| se.is_conditional_check_failed_exception())
                    .unwrap_or(false);
                if collision {
                    RepoError::Store(format!("record already exists at {}", post.created_at))
                } else {
                    RepoError::Store(e.to_string())
                }
            })?;
        Ok(())
    }

    async fn query_posts(&self, query: &PageQuery) -> RepoResult<PostPage> {
        let mut req = self
            .client
            .query()
            .table_name(&self.table_name)
            .key_condition_expression("id = :id AND createdAt <= :upper")
            .expression_attribute_values(":id", AttributeValue::S(self.partition_id.clone()))
            .expression_attribute_values(":upper", AttributeValue::S(query.upper_bound.clone()))
            .scan_index_forward(false)
            // one extra item so a full page can be told apart from the end of data
            .limit(query.limit as i32 + 1);

        // Store-side filtering does not change the limit accounting above:
        // filtered-out items still count against the fetched window, so a
        // filtered page may come back under-filled. Known limitation.
        if let Some(site) = &query.build_site {
            req = req
                .filter_expression("buildSite = :buildSite")
                .expression_attribute_values(":buildSite", AttributeValue::S(site.clone()));
        }

        if let Some(cursor) = &query.cursor {
            for (k, v) in self.key(cursor) {
                req = req.exclusive_start_key(k, v);
            }
        }

        let out = req.send().await.map_err(|e| RepoError::Store(e.to_string()))?;

        let mut items = out.items.unwrap_or_default();
        let mut continuation_token = None;
        if items.len() > query.limit as usize {
            items.truncate(query.limit as usize);
            continuation_token = items
                .last()
                .and_then(|item| item.get("createdAt"))
                .and_then(|v| v.as_s().ok().cloned());
        } else if let Some(key) = out.last_evaluated_key {
            continuation_token = key.get("createdAt").and_then(|v| v.as_s().ok().cloned());
        }

        let posts: Vec<Post> =
            from_items(items).map_err(|e| RepoError::Schema(e.to_string()))?;
        Ok(PostPage { posts, continuation_token })
    }

    async fn update_post(&self, created_at: &str, patch: &UpdatePost) -> RepoResult<Post> {
        let [(pk, pv), (sk, sv)] = self.key(created_at);
        let out = self
            .client
            .update_item()
            .table_name(&self.table_name)
            .key(pk, pv)
            .key(sk, sv)
            .update_expression("SET report = :report, buildSite = :buildSite")
            .expression_attribute_values(":report", AttributeValue::S(patch.report.clone()))
            .expression_attribute_values(":buildSite", AttributeValue::S(patch.build_site.clone()))
            // do not upsert a phantom record for an unknown key
            .condition_expression("attribute_exists(createdAt)")
            .return_values(ReturnValue::AllNew)
            .send()
            .await
            .map_err(|e| {
                let not_found = e
                    .as_service_error()
                    .map(|se| se.is_conditional_check_failed_exception())
                    .unwrap_or(false);
                if not_found { RepoError::NotFound } else { RepoError::Store(e.to_string()) }
            })?;

        let attributes = out
            .attributes
            .ok_or_else(|| RepoError::Schema("update returned no attributes".into()))?;
        from_item(attributes).map_err(|e| RepoError::Schema(e.to_string()))
    }

    async fn delete_post(&self, created_at: &str) -> RepoResult<Option<Post>> {
        let [(pk, pv), (sk, sv)] = self.key(created_at);
        let out = self
            .client
            .delete_item()
            .table_name(&self.table_name)
            .key(pk, pv)
            .key(sk, sv)
            .return_values(ReturnValue::AllOld)
            .send()
            .await
            .map_err(|e| RepoError::Store(e.to_string()))?;

        match out.attributes {
            Some(attributes) => Ok(Some(
                from_item(attributes).map_err(|e| RepoError::Schema(e.to_string()))?,
            )),
            None => Ok(None),
        }
    }
}

#[cfg(feature = "inmem-store")]
pub mod inmem {
    use super::*;
    use std::sync::{Arc, RwLock};

    /// In-memory repository mirroring the DynamoDB paging semantics,
    /// including the quirk that the fetched window is bounded before the
    /// `buildSite` filter is applied.
    #[derive(Clone, Default)]
    pub struct InMemRepo {
        posts: Arc<RwLock<Vec<Post>>>,
    }

    impl InMemRepo {
        pub fn new() -> Self {
            Self::default()
        }
    }

    #[async_trait]
    impl PostRepo for InMemRepo {
        async fn put_post(&self, post: &Post) -> RepoResult<()> {
            let mut posts = self.posts.write().unwrap();
            if posts.iter().any(|p| p.created_at == post.created_at) {
                return Err(RepoError::Store(format!(
                    "record already exists at {}",
                    post.created_at
                )));
            }
            posts.push(post.clone());
            Ok(())
        }

        async fn query_posts(&self, query: &PageQuery) -> RepoResult<PostPage> {
            let posts = self.posts.read().unwrap();
            let limit = query.limit as usize;

            // String comparison matches the document store's bytewise sort
            // key. Both orders are local-time lexicographic: the UTC offset
            // flips between +11:00 and +10:00 at the DST transitions, so
            // timestamps inside the April fold can sort out of true order.
            let mut window: Vec<&Post> = posts
                .iter()
                .filter(|p| p.created_at <= query.upper_bound)
                .filter(|p| match &query.cursor {
                    Some(cursor) => p.created_at < *cursor,
                    None => true,
                })
                .collect();
            window.sort_by(|a, b| b.created_at.cmp(&a.created_at));

            let evaluated: Vec<Post> =
                window.into_iter().take(limit + 1).cloned().collect();
            // the store reports a resume key whenever the limit stopped the scan
            let last_evaluated = (evaluated.len() == limit + 1)
                .then(|| evaluated.last().map(|p| p.created_at.clone()))
                .flatten();

            let mut items: Vec<Post> = evaluated
                .into_iter()
                .filter(|p| match &query.build_site {
                    Some(site) => p.build_site == *site,
                    None => true,
                })
                .collect();

            let mut continuation_token = None;
            if items.len() > limit {
                items.truncate(limit);
                continuation_token = items.last().map(|p| p.created_at.clone());
            } else if let Some(key) = last_evaluated {
                continuation_token = Some(key);
            }

            Ok(PostPage { posts: items, continuation_token })
        }

        async fn update_post(&self, created_at: &str, patch: &UpdatePost) -> RepoResult<Post> {
            let mut posts = self.posts.write().unwrap();
            let post = posts
                .iter_mut()
                .find(|p| p.created_at == created_at)
                .ok_or(RepoError::NotFound)?;
            post.report = patch.report.clone();
            post.build_site = patch.build_site.clone();
            Ok(post.clone())
        }

        async fn delete_post(&self, created_at: &str) -> RepoResult<Option<Post>> {
            let mut posts = self.posts.write().unwrap();
            let removed = posts.iter().position(|p| p.created_at == created_at);
            Ok(removed.map(|idx| posts.remove(idx)))
        }
    }
}
