use std::sync::atomic::{AtomicBool, Ordering};

use serde::Serialize;
use serde_json::Value;
use tokio::sync::RwLock;

use crate::backend::CompletionBackend;
use crate::constants::HEALTH_STATUS_HEALTHY;
use crate::error::ChatError;
use crate::http::HttpReply;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiStatus {
    Checking,
    Healthy,
    Partial,
    Error,
}

/// Detail shown next to the status badge.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HealthReport {
    pub status_text: Option<String>,
    pub lm_studio_connected: Option<bool>,
    pub available_models: Option<usize>,
    pub message: Option<String>,
}

/// One-shot availability probe. The status leaves `Checking` once and never moves again.
pub struct HealthMonitor {
    state: RwLock<(ApiStatus, HealthReport)>,
    probed: AtomicBool,
}

impl HealthMonitor {
    pub fn new() -> Self {
        Self {
            state: RwLock::new((ApiStatus::Checking, HealthReport::default())),
            probed: AtomicBool::new(false),
        }
    }

    pub async fn status(&self) -> ApiStatus {
        self.state.read().await.0
    }

    pub async fn report(&self) -> HealthReport {
        self.state.read().await.1.clone()
    }

    /// Issues the single status request. Later calls return the settled status without I/O.
    pub async fn probe<B: CompletionBackend>(&self, backend: &B) -> ApiStatus {
        if self.probed.swap(true, Ordering::SeqCst) {
            return self.status().await;
        }

        let (status, report) = classify_health(backend.fetch_health().await);
        match status {
            ApiStatus::Healthy => log::info!("completion service healthy"),
            ApiStatus::Partial => log::warn!(
                "completion service reachable but not ready: {}",
                report.status_text.as_deref().unwrap_or("no status")
            ),
            _ => log::error!(
                "completion service unreachable: {}",
                report.message.as_deref().unwrap_or("unknown failure")
            ),
        }

        let mut guard = self.state.write().await;
        *guard = (status, report);
        status
    }
}

impl Default for HealthMonitor {
    fn default() -> Self {
        Self::new()
    }
}

/// Maps a probe result to a status: `healthy` only for `{"status": "healthy"}`,
/// `partial` for any other JSON object, `error` for transport or payload failures.
pub fn classify_health(result: Result<HttpReply, ChatError>) -> (ApiStatus, HealthReport) {
    let reply = match result {
        Ok(reply) => reply,
        Err(e) => {
            let report = HealthReport {
                message: Some(e.message),
                ..HealthReport::default()
            };
            return (ApiStatus::Error, report);
        }
    };

    let Value::Object(payload) = &reply.body else {
        let report = HealthReport {
            message: Some(format!("malformed health payload: {}", reply.body)),
            ..HealthReport::default()
        };
        return (ApiStatus::Error, report);
    };

    let status_text = payload
        .get("status")
        .and_then(|s| s.as_str())
        .map(|s| s.to_string());

    let report = HealthReport {
        lm_studio_connected: payload.get("lm_studio_connected").and_then(|c| c.as_bool()),
        available_models: payload
            .get("available_models")
            .and_then(|m| m.as_array())
            .map(|models| models.len()),
        message: payload
            .get("message")
            .or_else(|| payload.get("error"))
            .and_then(|m| m.as_str())
            .map(|m| m.to_string()),
        status_text,
    };

    let status = if report.status_text.as_deref() == Some(HEALTH_STATUS_HEALTHY) {
        ApiStatus::Healthy
    } else {
        ApiStatus::Partial
    };
    (status, report)
}
