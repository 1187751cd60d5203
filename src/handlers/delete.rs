use futures_util::future::try_join_all;
use lambda_http::{http::StatusCode, Body, Error, Request, RequestExt, Response};
use serde::Serialize;
use tracing::{error, info, warn};

use super::AppState;
use crate::error::Error as ApiError;
use crate::models::{DeleteBody, Post};
use crate::response::{error_response, json_response};
use crate::storage::ImageStoreError;

const ALLOW_METHODS: &str = "DELETE";
const FAILURE_MESSAGE: &str = "There was an error deleting the post";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DeleteResponse {
    /// The removed record, when the store had one for the key.
    #[serde(skip_serializing_if = "Option::is_none")]
    deleted: Option<Post>,
}

pub async fn handle(state: &AppState, event: Request) -> Result<Response<Body>, Error> {
    info!("handling delete-post request");
    match delete_post(state, &event).await {
        Ok(body) => json_response(StatusCode::OK, ALLOW_METHODS, &body),
        Err(err) => {
            error!("delete-post failed: {err}");
            error_response(ALLOW_METHODS, FAILURE_MESSAGE)
        }
    }
}

async fn delete_post(state: &AppState, event: &Request) -> Result<DeleteResponse, ApiError> {
    let created_at = event
        .path_parameters()
        .first("createdAt")
        .map(str::to_string)
        .ok_or_else(|| ApiError::Validation("createdAt missing from path".into()))?;

    let raw: &[u8] = event.body();
    let body: DeleteBody = if raw.is_empty() {
        DeleteBody::default()
    } else {
        serde_json::from_slice(raw)
            .map_err(|e| ApiError::Validation(format!("bad delete body: {e}")))?
    };

    // Images first, all-or-nothing: if any deletion fails the record stays.
    // Images already deleted by then are not restored.
    if let Some(names) = &body.image_names {
        try_join_all(names.iter().map(|name| remove_image(state, name))).await?;
    }

    let deleted = state.repo.delete_post(&created_at).await?;
    Ok(DeleteResponse { deleted })
}

async fn remove_image(state: &AppState, name: &str) -> Result<(), ImageStoreError> {
    state.images.delete(name).await?;
    // Cache invalidation is best-effort; its failure must not abort the
    // image-deletion success path.
    if let Err(err) = state.cdn.invalidate(&format!("/{name}")).await {
        warn!("cdn invalidation for /{name} failed: {err}");
    }
    Ok(())
}
