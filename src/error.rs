use std::error::Error;
use std::fmt;

use warp::reject::Reject;

use crate::constants::{ERROR_BUSY, ERROR_CANCELLED, ERROR_EMPTY_PROMPT};

/// Error type shared by the orchestrator core and the JSON surface
#[derive(Debug, Clone)]
pub struct ChatError {
    pub message: String,
    pub status_code: u16,
    kind: ChatErrorKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChatErrorKind {
    Validation,
    Index,
    RemoteDefaults,
    Api,
    Network,
    Busy,
    Internal,
}

impl ChatError {
    pub fn validation(message: &str) -> Self {
        Self {
            message: message.to_string(),
            status_code: 400,
            kind: ChatErrorKind::Validation,
        }
    }

    pub fn empty_prompt() -> Self {
        Self::validation(ERROR_EMPTY_PROMPT)
    }

    pub fn index_out_of_range(index: usize, len: usize) -> Self {
        Self {
            message: format!("index {} out of range for history of {}", index, len),
            status_code: 400,
            kind: ChatErrorKind::Index,
        }
    }

    pub fn remote_defaults(message: &str) -> Self {
        Self {
            message: message.to_string(),
            status_code: 502,
            kind: ChatErrorKind::RemoteDefaults,
        }
    }

    pub fn api(message: String, status_code: u16) -> Self {
        Self {
            message,
            status_code,
            kind: ChatErrorKind::Api,
        }
    }

    pub fn network(message: &str) -> Self {
        Self {
            message: message.to_string(),
            status_code: 503,
            kind: ChatErrorKind::Network,
        }
    }

    pub fn cancelled() -> Self {
        Self::network(ERROR_CANCELLED)
    }

    pub fn busy() -> Self {
        Self {
            message: ERROR_BUSY.to_string(),
            status_code: 409,
            kind: ChatErrorKind::Busy,
        }
    }

    pub fn internal(message: &str) -> Self {
        Self {
            message: message.to_string(),
            status_code: 500,
            kind: ChatErrorKind::Internal,
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self.kind, ChatErrorKind::Validation)
    }

    pub fn is_index(&self) -> bool {
        matches!(self.kind, ChatErrorKind::Index)
    }

    pub fn is_remote_defaults(&self) -> bool {
        matches!(self.kind, ChatErrorKind::RemoteDefaults)
    }

    pub fn is_api(&self) -> bool {
        matches!(self.kind, ChatErrorKind::Api)
    }

    pub fn is_network(&self) -> bool {
        matches!(self.kind, ChatErrorKind::Network)
    }

    pub fn is_busy(&self) -> bool {
        matches!(self.kind, ChatErrorKind::Busy)
    }

    /// Re-labels a transport or API failure as a defaults failure, keeping the text.
    pub fn into_remote_defaults(self) -> Self {
        Self::remote_defaults(&format!("failed to load default parameters: {}", self.message))
    }
}

impl fmt::Display for ChatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChatError {}: {}", self.status_code, self.message)
    }
}

impl Error for ChatError {}

impl Reject for ChatError {}

#[macro_export]
macro_rules! check_cancelled {
    ($token:expr) => {
        if $token.is_cancelled() {
            return Err($crate::error::ChatError::cancelled());
        }
    };
}

#[cfg(test)]
mod tests {
    use super::ChatError;

    #[test]
    fn kinds_map_to_http_status() {
        assert_eq!(ChatError::empty_prompt().status_code, 400);
        assert_eq!(ChatError::busy().status_code, 409);
        assert_eq!(ChatError::network("down").status_code, 503);
        assert_eq!(ChatError::index_out_of_range(3, 2).status_code, 400);
    }

    #[test]
    fn remote_defaults_wraps_original_message() {
        let err = ChatError::network("connection refused").into_remote_defaults();
        assert!(err.is_remote_defaults());
        assert!(err.message.contains("connection refused"));
    }
}
