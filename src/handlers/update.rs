use lambda_http::{http::StatusCode, Body, Error, Request, RequestExt, Response};
use tracing::{error, info};

use super::AppState;
use crate::error::Error as ApiError;
use crate::models::{Post, UpdatePost};
use crate::response::{error_response, json_response};

const ALLOW_METHODS: &str = "PUT";
const FAILURE_MESSAGE: &str = "There was an error updating the post";

pub async fn handle(state: &AppState, event: Request) -> Result<Response<Body>, Error> {
    info!("handling update-post request");
    match update_post(state, &event).await {
        Ok(post) => json_response(StatusCode::OK, ALLOW_METHODS, &post),
        Err(err) => {
            error!("update-post failed: {err}");
            error_response(ALLOW_METHODS, FAILURE_MESSAGE)
        }
    }
}

async fn update_post(state: &AppState, event: &Request) -> Result<Post, ApiError> {
    let created_at = event
        .path_parameters()
        .first("createdAt")
        .map(str::to_string)
        .ok_or_else(|| ApiError::Validation("createdAt missing from path".into()))?;

    let patch: UpdatePost = serde_json::from_slice(event.body())
        .map_err(|e| ApiError::Validation(format!("bad update body: {e}")))?;

    // The repository validates the returned record against the full Post
    // shape; a non-existent key surfaces as the same generic failure.
    let updated = state.repo.update_post(&created_at, &patch).await?;
    Ok(updated)
}
