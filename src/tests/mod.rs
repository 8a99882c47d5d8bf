mod routes_tests;

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use serde_json::{Value, json};
use tokio::sync::Notify;

use crate::backend::CompletionBackend;
use crate::error::ChatError;
use crate::http::HttpReply;

/// Holds a chat call open until the test releases it.
#[derive(Default)]
pub struct ChatGate {
    pub entered: Notify,
    pub release: Notify,
}

/// Scripted completion service for orchestrator tests.
pub struct MockBackend {
    health: Result<HttpReply, ChatError>,
    defaults: Result<HttpReply, ChatError>,
    models: Result<HttpReply, ChatError>,
    chat_replies: Mutex<VecDeque<Result<HttpReply, ChatError>>>,
    chat_bodies: Mutex<Vec<Value>>,
    health_calls: AtomicUsize,
    gate: Option<Arc<ChatGate>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self {
            health: Ok(HttpReply::new(200, json!({ "status": "healthy" }))),
            defaults: Ok(HttpReply::new(200, defaults_payload(0.7))),
            models: Ok(HttpReply::new(200, json!({ "data": [] }))),
            chat_replies: Mutex::new(VecDeque::new()),
            chat_bodies: Mutex::new(Vec::new()),
            health_calls: AtomicUsize::new(0),
            gate: None,
        }
    }

    pub fn with_health(mut self, reply: Result<HttpReply, ChatError>) -> Self {
        self.health = reply;
        self
    }

    pub fn with_defaults(mut self, reply: Result<HttpReply, ChatError>) -> Self {
        self.defaults = reply;
        self
    }

    pub fn with_models(mut self, reply: Result<HttpReply, ChatError>) -> Self {
        self.models = reply;
        self
    }

    pub fn with_chat(self, reply: Result<HttpReply, ChatError>) -> Self {
        self.chat_replies.lock().unwrap().push_back(reply);
        self
    }

    pub fn with_gate(mut self, gate: Arc<ChatGate>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn chat_bodies(&self) -> Vec<Value> {
        self.chat_bodies.lock().unwrap().clone()
    }

    pub fn health_calls(&self) -> usize {
        self.health_calls.load(Ordering::SeqCst)
    }
}

impl CompletionBackend for MockBackend {
    async fn fetch_health(&self) -> Result<HttpReply, ChatError> {
        self.health_calls.fetch_add(1, Ordering::SeqCst);
        self.health.clone()
    }

    async fn fetch_defaults(&self) -> Result<HttpReply, ChatError> {
        self.defaults.clone()
    }

    async fn send_chat(&self, body: &Value) -> Result<HttpReply, ChatError> {
        self.chat_bodies.lock().unwrap().push(body.clone());
        if let Some(gate) = &self.gate {
            gate.entered.notify_one();
            gate.release.notified().await;
        }
        let scripted = self.chat_replies.lock().unwrap().pop_front();
        scripted.unwrap_or_else(|| Ok(chat_success("ok")))
    }

    async fn fetch_models(&self) -> Result<HttpReply, ChatError> {
        self.models.clone()
    }
}

pub fn chat_success(content: &str) -> HttpReply {
    HttpReply::new(
        200,
        json!({ "choices": [{ "message": { "role": "assistant", "content": content } }] }),
    )
}

pub fn defaults_payload(temperature: f64) -> Value {
    json!({
        "defaults": {
            "temperature": temperature,
            "top_p": 0.9,
            "top_k": 40,
            "max_tokens": 256,
            "frequency_penalty": 0.0,
            "presence_penalty": 0.0,
            "repeat_penalty": 1.1,
            "stream": false
        },
        "parameter_info": {}
    })
}
