use crate::constants::{ERROR_SERVICE_UNAVAILABLE, ERROR_TIMEOUT};
use crate::error::ChatError;

pub fn map_reqwest_error(err: reqwest::Error) -> ChatError {
    if err.is_connect() {
        log::warn!("connect failed: {}", err);
        ChatError::network(&format!("{} ({})", ERROR_SERVICE_UNAVAILABLE, root_cause(&err)))
    } else if err.is_timeout() {
        ChatError::network(ERROR_TIMEOUT)
    } else if err.is_decode() {
        ChatError::network(&format!("malformed response: {}", err))
    } else {
        log::error!("HTTP request failed: {}", err);
        ChatError::network(&format!("request failed: {}", err))
    }
}

/// Innermost error text, e.g. "Connection refused (os error 111)".
fn root_cause(err: &(dyn std::error::Error + 'static)) -> String {
    let mut current = err;
    while let Some(source) = current.source() {
        current = source;
    }
    current.to_string()
}
