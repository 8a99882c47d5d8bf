use serde::Serialize;
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::check_cancelled;
use crate::constants::{CONTENT_TYPE_JSON, HEADER_CACHE_CONTROL};
use crate::error::ChatError;

/// A completion-service reply that arrived with a JSON body, whatever its status.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpReply {
    pub status: u16,
    pub body: Value,
}

impl HttpReply {
    pub fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Reads the body as JSON. An undecodable body counts as a transport failure.
pub async fn read_json_reply(
    response: reqwest::Response,
    cancellation_token: CancellationToken,
) -> Result<HttpReply, ChatError> {
    check_cancelled!(cancellation_token);

    let status = response.status();

    tokio::select! {
        result = response.json::<Value>() => match result {
            Ok(body) => Ok(HttpReply::new(status.as_u16(), body)),
            Err(e) => Err(ChatError::network(&format!(
                "invalid JSON from completion service (HTTP {}): {}",
                status.as_u16(),
                e
            ))),
        },
        _ = cancellation_token.cancelled() => Err(ChatError::cancelled()),
    }
}

pub fn json_response<T: Serialize>(value: &T) -> warp::reply::Response {
    json_response_with_status(value, warp::http::StatusCode::OK)
}

pub fn json_response_with_status<T: Serialize>(
    value: &T,
    status: warp::http::StatusCode,
) -> warp::reply::Response {
    let json_string = serde_json::to_string(value).unwrap_or_else(|_| "{}".to_string());
    let content_length = json_string.len();

    warp::http::Response::builder()
        .status(status)
        .header("Content-Type", CONTENT_TYPE_JSON)
        .header("Content-Length", content_length.to_string())
        .header("Cache-Control", HEADER_CACHE_CONTROL)
        .body(json_string.into())
        .unwrap_or_else(|_| {
            let mut fallback = warp::reply::Response::new("Internal Server Error".into());
            *fallback.status_mut() = warp::http::StatusCode::INTERNAL_SERVER_ERROR;
            fallback
        })
}
