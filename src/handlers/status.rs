use std::sync::Arc;

use serde_json::json;

use crate::backend::CompletionBackend;
use crate::error::ChatError;
use crate::http::json_response;
use crate::logging::LogConfig;
use crate::orchestrator::Orchestrator;

pub async fn handle_session_state<B: CompletionBackend>(
    orchestrator: Arc<Orchestrator<B>>,
) -> Result<warp::reply::Response, ChatError> {
    let snapshot = orchestrator.snapshot().await;
    if LogConfig::get().debug_enabled {
        log::debug!(
            "state: status={:?} busy={} history={}",
            snapshot.api_status,
            snapshot.busy,
            snapshot.history_len
        );
    }
    Ok(json_response(&snapshot))
}

pub async fn handle_list_models<B: CompletionBackend>(
    orchestrator: Arc<Orchestrator<B>>,
) -> Result<warp::reply::Response, ChatError> {
    let models = orchestrator.list_models().await?;
    Ok(json_response(&json!({ "models": models })))
}
