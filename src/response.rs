use lambda_http::{http::StatusCode, Body, Error, Response};
use serde::Serialize;

/// JSON response with the fixed permissive CORS header set. The allowed
/// methods value is the only header that varies between handlers.
pub fn json_response(
    status: StatusCode,
    allow_methods: &str,
    body: &impl Serialize,
) -> Result<Response<Body>, Error> {
    Ok(Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Headers", "Content-Type")
        .header("Access-Control-Allow-Origin", "*")
        .header("Access-Control-Allow-Methods", allow_methods)
        .body(serde_json::to_string(body)?.into())
        .map_err(Box::new)?)
}

/// The generic failure envelope: always HTTP 500, fixed per-handler message.
pub fn error_response(allow_methods: &str, message: &str) -> Result<Response<Body>, Error> {
    json_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        allow_methods,
        &serde_json::json!({ "message": message }),
    )
}
