use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::constants::{API_ERROR_PREFIX, NETWORK_ERROR_PREFIX, NO_RESPONSE_CONTENT, UNKNOWN_ERROR};
use crate::error::ChatError;
use crate::http::HttpReply;
use crate::params::ParameterSet;

/// How a chat submission ended.
#[derive(Debug, Clone, PartialEq)]
pub enum CompletionOutcome {
    /// Model output, or the no-content marker when the payload lacked it.
    Success(String),
    /// Non-success status with a JSON body; holds the service's error text.
    ApiError(String),
    /// No usable reply at all; holds the transport failure text.
    NetworkError(String),
}

impl CompletionOutcome {
    pub fn from_result(result: Result<HttpReply, ChatError>) -> Self {
        match result {
            Ok(reply) if reply.is_success() => Self::Success(extract_content(&reply.body)),
            Ok(reply) => Self::ApiError(extract_error(&reply.body)),
            Err(e) => Self::NetworkError(e.message),
        }
    }

    pub fn is_error(&self) -> bool {
        !matches!(self, Self::Success(_))
    }

    /// Text stored in the record; failures carry their origin prefix.
    pub fn into_content(self) -> String {
        match self {
            Self::Success(content) => content,
            Self::ApiError(message) => format!("{}{}", API_ERROR_PREFIX, message),
            Self::NetworkError(message) => format!("{}{}", NETWORK_ERROR_PREFIX, message),
        }
    }
}

fn extract_content(body: &Value) -> String {
    body.pointer("/choices/0/message/content")
        .and_then(|c| c.as_str())
        .filter(|c| !c.is_empty())
        .unwrap_or(NO_RESPONSE_CONTENT)
        .to_string()
}

fn extract_error(body: &Value) -> String {
    match body.get("error") {
        Some(Value::String(message)) => Some(message.clone()),
        Some(Value::Object(obj)) => obj
            .get("message")
            .and_then(|m| m.as_str())
            .map(|m| m.to_string()),
        _ => None,
    }
    .unwrap_or_else(|| UNKNOWN_ERROR.to_string())
}

/// One prompt/response pair. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseRecord {
    id: i64,
    prompt: String,
    content: String,
    created_at: DateTime<Utc>,
    parameters_snapshot: ParameterSet,
    is_error: bool,
}

impl ResponseRecord {
    pub fn new(
        id: i64,
        prompt: String,
        outcome: CompletionOutcome,
        parameters_snapshot: ParameterSet,
    ) -> Self {
        let is_error = outcome.is_error();
        Self {
            id,
            prompt,
            content: outcome.into_content(),
            created_at: Utc::now(),
            parameters_snapshot,
            is_error,
        }
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    #[cfg(test)]
    pub fn parameters_snapshot(&self) -> &ParameterSet {
        &self.parameters_snapshot
    }

    pub fn is_error(&self) -> bool {
        self.is_error
    }
}
