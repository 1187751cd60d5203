use futures_util::future::try_join_all;
use lambda_http::{http::StatusCode, Body, Error, Request, Response};
use serde::Serialize;
use tracing::{error, info};
use uuid::Uuid;

use super::AppState;
use crate::error::Error as ApiError;
use crate::models::{sydney_now, NewPost, Post};
use crate::response::{error_response, json_response};

const ALLOW_METHODS: &str = "POST";
const FAILURE_MESSAGE: &str = "There was an error saving the post";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateResponse {
    new_post: Post,
    /// Pre-authorized upload references, one per requested image name, in
    /// request order. Absent when no image names were supplied.
    #[serde(skip_serializing_if = "Option::is_none")]
    image_upload_urls: Option<Vec<String>>,
}

pub async fn handle(state: &AppState, event: Request) -> Result<Response<Body>, Error> {
    info!("handling create-post request");
    match create_post(state, &event).await {
        Ok(body) => json_response(StatusCode::OK, ALLOW_METHODS, &body),
        Err(err) => {
            error!("create-post failed: {err}");
            error_response(ALLOW_METHODS, FAILURE_MESSAGE)
        }
    }
}

async fn create_post(state: &AppState, event: &Request) -> Result<CreateResponse, ApiError> {
    let new_post: NewPost = serde_json::from_slice(event.body())
        .map_err(|e| ApiError::Validation(format!("bad create body: {e}")))?;

    // Mint one upload URL per image name, concurrently, keeping request
    // order. The bytes themselves arrive out of band via these URLs.
    let image_names = new_post.image_names.filter(|names| !names.is_empty());
    let image_upload_urls = match &image_names {
        Some(names) => Some(
            try_join_all(names.iter().map(|name| state.images.upload_url(name))).await?,
        ),
        None => None,
    };

    let post = Post {
        id: state.config.partition_id.clone(),
        post_id: Uuid::new_v4().to_string(),
        created_at: sydney_now(),
        name: new_post.name,
        hours: new_post.hours,
        costs: new_post.costs,
        report: new_post.report,
        build_site: new_post.build_site,
        image_names,
        image_urls: None,
    };

    state.repo.put_post(&post).await?;

    Ok(CreateResponse { new_post: post, image_upload_urls })
}
