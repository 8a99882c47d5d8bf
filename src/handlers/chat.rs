use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;

use crate::backend::CompletionBackend;
use crate::error::ChatError;
use crate::http::json_response;
use crate::orchestrator::Orchestrator;

#[derive(Debug, Deserialize)]
struct ChatSubmission {
    prompt: String,
}

/// Submits on a detached task so a dropped client connection cannot abandon
/// the request halfway; the record still lands in the history.
pub async fn handle_chat_submit<B: CompletionBackend + 'static>(
    orchestrator: Arc<Orchestrator<B>>,
    body: Value,
) -> Result<warp::reply::Response, ChatError> {
    let submission: ChatSubmission = serde_json::from_value(body)
        .map_err(|e| ChatError::validation(&format!("invalid chat body: {}", e)))?;

    let task = tokio::spawn(async move { orchestrator.submit(&submission.prompt).await });
    let record = task
        .await
        .map_err(|e| ChatError::internal(&format!("chat task failed: {}", e)))??;

    Ok(json_response(&record))
}
