pub mod history;
pub mod record;

use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::time::Instant;

use serde::Serialize;
use tokio::sync::{Notify, RwLock};

use crate::backend::CompletionBackend;
use crate::constants::{LOG_PREFIX_ERROR, LOG_PREFIX_SUCCESS};
use crate::error::ChatError;
use crate::health::{ApiStatus, HealthMonitor, HealthReport};
use crate::http::build_chat_request;
use crate::logging::{log_exchange, log_timed, preview};
use crate::params::{ParameterSet, ParameterStore};

pub use history::ResponseHistory;
pub use record::{CompletionOutcome, ResponseRecord};

/// Rendering-agnostic view of the session for the presentation layer.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub api_status: ApiStatus,
    pub health: HealthReport,
    pub parameters: ParameterSet,
    pub busy: bool,
    pub history_len: usize,
    pub current_index: usize,
    pub current: Option<ResponseRecord>,
}

/// Clears the in-flight flag when dropped, whichever way `submit` exits,
/// and wakes anyone waiting for the orchestrator to go idle.
struct InFlightGuard<'a> {
    flag: &'a AtomicBool,
    settled: &'a Notify,
}

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool, settled: &'a Notify) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag, settled })
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
        self.settled.notify_waiters();
    }
}

/// Owns one session's parameters, history and health status and drives the
/// completion service on its behalf.
pub struct Orchestrator<B> {
    backend: B,
    params: RwLock<ParameterStore>,
    history: RwLock<ResponseHistory>,
    health: HealthMonitor,
    in_flight: AtomicBool,
    settled: Notify,
    last_id: AtomicI64,
}

impl<B: CompletionBackend> Orchestrator<B> {
    pub fn new(backend: B, strict_defaults: bool) -> Self {
        Self {
            backend,
            params: RwLock::new(ParameterStore::new(strict_defaults)),
            history: RwLock::new(ResponseHistory::new()),
            health: HealthMonitor::new(),
            in_flight: AtomicBool::new(false),
            settled: Notify::new(),
            last_id: AtomicI64::new(0),
        }
    }

    /// Runs the one-shot health probe.
    pub async fn start(&self) -> ApiStatus {
        self.health.probe(&self.backend).await
    }

    pub async fn api_status(&self) -> ApiStatus {
        self.health.status().await
    }

    pub async fn parameters(&self) -> ParameterSet {
        self.params.read().await.get()
    }

    pub async fn set_parameter(&self, key: &str, raw_value: f64) -> Result<ParameterSet, ChatError> {
        self.params.write().await.set(key, raw_value)
    }

    /// Replaces every parameter with the service's defaults.
    ///
    /// The fetch runs against a staged copy so reads are not blocked on the
    /// network; the live store is only swapped after the payload validates.
    pub async fn reset_parameters(&self) -> Result<ParameterSet, ChatError> {
        let start_time = Instant::now();
        let mut staged = self.params.read().await.clone();

        match staged.reset_to_defaults(&self.backend).await {
            Ok(set) => {
                *self.params.write().await = staged;
                log_timed(LOG_PREFIX_SUCCESS, "parameters reset to defaults", start_time);
                Ok(set)
            }
            Err(e) => {
                log_timed(
                    LOG_PREFIX_ERROR,
                    &format!("parameter reset failed: {}", e.message),
                    start_time,
                );
                Err(e)
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn backend(&self) -> &B {
        &self.backend
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Resolves once no submission is in flight; its record is already in the history.
    pub async fn wait_idle(&self) {
        loop {
            let settled = self.settled.notified();
            if !self.is_busy() {
                return;
            }
            settled.await;
        }
    }

    /// Sends one prompt and appends exactly one record for it.
    ///
    /// Blank prompts fail with a validation error and touch nothing. A call made
    /// while another is pending fails with `busy`. Every other outcome, including
    /// API and transport failures, becomes a record at the front of the history.
    pub async fn submit(&self, prompt_text: &str) -> Result<ResponseRecord, ChatError> {
        let prompt = prompt_text.trim();
        if prompt.is_empty() {
            log::debug!("ignoring blank prompt");
            return Err(ChatError::empty_prompt());
        }

        let Some(_guard) = InFlightGuard::acquire(&self.in_flight, &self.settled) else {
            log::warn!("submission rejected, another one is in flight");
            return Err(ChatError::busy());
        };

        let start_time = Instant::now();
        let snapshot = self.parameters().await;
        let body = build_chat_request(prompt, &snapshot);
        log::info!("chat submit: {}", preview(prompt, 60));
        log_exchange("chat", Some(&body), None);

        let result = self.backend.send_chat(&body).await;
        if let Ok(reply) = &result {
            log_exchange("chat", None, Some(&reply.body));
        }

        let outcome = CompletionOutcome::from_result(result);
        let record = ResponseRecord::new(self.next_id(), prompt.to_string(), outcome, snapshot);

        log_timed(
            if record.is_error() {
                LOG_PREFIX_ERROR
            } else {
                LOG_PREFIX_SUCCESS
            },
            &format!(
                "chat record {} for '{}': {}",
                record.id(),
                preview(record.prompt(), 40),
                preview(record.content(), 60)
            ),
            start_time,
        );

        self.history.write().await.push(record.clone());
        Ok(record)
    }

    pub async fn list_models(&self) -> Result<Vec<String>, ChatError> {
        let reply = self.backend.fetch_models().await?;
        if !reply.is_success() {
            let message = reply
                .body
                .get("error")
                .and_then(|e| e.as_str())
                .unwrap_or("failed to fetch models")
                .to_string();
            return Err(ChatError::api(message, reply.status));
        }

        Ok(reply
            .body
            .get("data")
            .and_then(|d| d.as_array())
            .map(|models| {
                models
                    .iter()
                    .filter_map(|m| m.get("id").and_then(|id| id.as_str()))
                    .map(|id| id.to_string())
                    .collect()
            })
            .unwrap_or_default())
    }

    pub async fn next(&self) -> Option<ResponseRecord> {
        let mut history = self.history.write().await;
        history.next();
        history.current().cloned()
    }

    pub async fn previous(&self) -> Option<ResponseRecord> {
        let mut history = self.history.write().await;
        history.previous();
        history.current().cloned()
    }

    pub async fn jump_to(&self, index: usize) -> Result<Option<ResponseRecord>, ChatError> {
        let mut history = self.history.write().await;
        history.jump_to(index)?;
        Ok(history.current().cloned())
    }

    pub async fn clear_history(&self) {
        let mut history = self.history.write().await;
        if history.is_empty() {
            log::debug!("history already empty");
            return;
        }
        history.clear();
        log::info!("history cleared");
    }

    #[cfg(test)]
    pub async fn current(&self) -> Option<ResponseRecord> {
        self.history.read().await.current().cloned()
    }

    pub async fn current_index(&self) -> usize {
        self.history.read().await.current_index()
    }

    pub async fn history(&self) -> Vec<ResponseRecord> {
        self.history.read().await.records()
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        let (history_len, current_index, current) = {
            let history = self.history.read().await;
            (
                history.len(),
                history.current_index(),
                history.current().cloned(),
            )
        };

        SessionSnapshot {
            api_status: self.api_status().await,
            health: self.health.report().await,
            parameters: self.parameters().await,
            busy: self.is_busy(),
            history_len,
            current_index,
            current,
        }
    }

    /// Millisecond timestamp, bumped when needed so ids strictly increase.
    fn next_id(&self) -> i64 {
        let now = chrono::Utc::now().timestamp_millis();
        let mut last = self.last_id.load(Ordering::Relaxed);
        loop {
            let candidate = now.max(last + 1);
            match self.last_id.compare_exchange_weak(
                last,
                candidate,
                Ordering::AcqRel,
                Ordering::Relaxed,
            ) {
                Ok(_) => return candidate,
                Err(actual) => last = actual,
            }
        }
    }
}
