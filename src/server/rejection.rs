use std::convert::Infallible;

use serde_json::json;
use warp::http::StatusCode;
use warp::{Rejection, Reply};

use crate::constants::{LOG_PREFIX_ERROR, LOG_PREFIX_WARNING};
use crate::error::ChatError;

pub async fn handle_rejection(rejection: Rejection) -> Result<impl Reply, Infallible> {
    let (status, message) = if let Some(chat_err) = rejection.find::<ChatError>() {
        log_chat_error(chat_err);
        (
            StatusCode::from_u16(chat_err.status_code)
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            chat_err.message.clone(),
        )
    } else if rejection.is_not_found() {
        (StatusCode::NOT_FOUND, "endpoint not found".to_string())
    } else if rejection.find::<warp::reject::MethodNotAllowed>().is_some() {
        (
            StatusCode::METHOD_NOT_ALLOWED,
            "method not allowed".to_string(),
        )
    } else if rejection.find::<warp::reject::PayloadTooLarge>().is_some() {
        (
            StatusCode::PAYLOAD_TOO_LARGE,
            "request body too large".to_string(),
        )
    } else if rejection.find::<warp::reject::LengthRequired>().is_some() {
        (StatusCode::BAD_REQUEST, "missing JSON body".to_string())
    } else if rejection.find::<warp::reject::UnsupportedMediaType>().is_some() {
        (
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            "unsupported media type".to_string(),
        )
    } else {
        log::error!("unhandled rejection: {:?}", rejection);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "internal server error".to_string(),
        )
    };

    let error_response = json!({
        "error": message,
        "status": status.as_u16()
    });

    Ok(warp::reply::with_status(
        warp::reply::json(&error_response),
        status,
    ))
}

/// Caller mistakes stay at debug; failures of the completion service are errors.
fn log_chat_error(err: &ChatError) {
    if err.is_validation() || err.is_index() || err.is_busy() {
        log::debug!("request rejected: {}", err.message);
    } else if err.is_network() || err.is_remote_defaults() {
        log::error!("{} {}", LOG_PREFIX_ERROR, err.message);
    } else if err.is_api() {
        log::warn!(
            "{} completion service answered HTTP {}: {}",
            LOG_PREFIX_WARNING,
            err.status_code,
            err.message
        );
    } else {
        log::error!("internal error: {}", err.message);
    }
}
