use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;

use crate::backend::CompletionBackend;
use crate::error::ChatError;
use crate::http::json_response;
use crate::orchestrator::Orchestrator;
use crate::params::{ChatParameter, ParameterRange};

#[derive(Debug, Deserialize)]
struct ParameterUpdate {
    value: f64,
}

pub async fn handle_get_parameters<B: CompletionBackend>(
    orchestrator: Arc<Orchestrator<B>>,
) -> Result<warp::reply::Response, ChatError> {
    Ok(json_response(&orchestrator.parameters().await))
}

pub async fn handle_set_parameter<B: CompletionBackend>(
    orchestrator: Arc<Orchestrator<B>>,
    key: String,
    body: Value,
) -> Result<warp::reply::Response, ChatError> {
    let update: ParameterUpdate = serde_json::from_value(body)
        .map_err(|e| ChatError::validation(&format!("invalid parameter body: {}", e)))?;
    let set = orchestrator.set_parameter(&key, update.value).await?;
    Ok(json_response(&set))
}

pub async fn handle_reset_parameters<B: CompletionBackend>(
    orchestrator: Arc<Orchestrator<B>>,
) -> Result<warp::reply::Response, ChatError> {
    let set = orchestrator.reset_parameters().await?;
    Ok(json_response(&set))
}

pub fn handle_parameter_ranges() -> warp::reply::Response {
    let ranges: BTreeMap<&'static str, &'static ParameterRange> = ChatParameter::ALL
        .into_iter()
        .map(|param| (param.as_str(), param.range()))
        .collect();
    json_response(&ranges)
}
