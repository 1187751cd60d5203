use lambda_http::{http::StatusCode, Body, Error, Request, RequestExt, Response};
use serde::Serialize;
use tracing::{error, info};

use super::AppState;
use crate::error::Error as ApiError;
use crate::models::{sort_newest_first, sydney_now, with_image_urls, Post};
use crate::repo::PageQuery;
use crate::response::{error_response, json_response};

const ALLOW_METHODS: &str = "GET";
const FAILURE_MESSAGE: &str = "There was an error listing posts";
const DEFAULT_LIMIT: u32 = 20;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ListResponse {
    /// Opaque cursor for the next page; absent once the data is exhausted.
    #[serde(skip_serializing_if = "Option::is_none")]
    continuation_token: Option<String>,
    posts: Vec<Post>,
}

pub async fn handle(state: &AppState, event: Request) -> Result<Response<Body>, Error> {
    info!("handling list-posts request");
    match list_posts(state, &event).await {
        Ok(body) => json_response(StatusCode::OK, ALLOW_METHODS, &body),
        Err(err) => {
            error!("list-posts failed: {err}");
            error_response(ALLOW_METHODS, FAILURE_MESSAGE)
        }
    }
}

async fn list_posts(state: &AppState, event: &Request) -> Result<ListResponse, ApiError> {
    let params = event.query_string_parameters();

    let limit = match params.first("limit") {
        Some(raw) => raw
            .parse::<u32>()
            .ok()
            .filter(|l| *l > 0)
            .ok_or_else(|| ApiError::Validation(format!("bad limit: {raw}")))?,
        None => DEFAULT_LIMIT,
    };

    let query = PageQuery {
        limit,
        cursor: params.first("continuationToken").map(str::to_string),
        build_site: params.first("buildSite").map(str::to_string),
        upper_bound: sydney_now(),
    };

    let mut page = state.repo.query_posts(&query).await?;

    sort_newest_first(&mut page.posts);
    let posts = page
        .posts
        .into_iter()
        .map(|post| with_image_urls(post, &state.config.cdn_base_url))
        .collect();

    Ok(ListResponse { continuation_token: page.continuation_token, posts })
}
