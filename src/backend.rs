use std::future::Future;
use std::time::{Duration, Instant};

use reqwest::Method;
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::constants::{
    API_CHAT_COMPLETIONS, API_HEALTH, API_MODELS, API_PARAMETER_DEFAULTS, LOG_PREFIX_ERROR,
    LOG_PREFIX_SUCCESS,
};
use crate::error::ChatError;
use crate::http::{CancellableRequest, HttpReply, read_json_reply};
use crate::logging::log_timed;

/// The completion-service collaborator.
///
/// Implementations return `Err` only for transport-level failures (no usable
/// HTTP reply). Any reply carrying a JSON body comes back as [`HttpReply`],
/// including non-success statuses, so callers can classify it themselves.
pub trait CompletionBackend: Send + Sync {
    fn fetch_health(&self) -> impl Future<Output = Result<HttpReply, ChatError>> + Send;

    fn fetch_defaults(&self) -> impl Future<Output = Result<HttpReply, ChatError>> + Send;

    fn send_chat(&self, body: &Value) -> impl Future<Output = Result<HttpReply, ChatError>> + Send;

    fn fetch_models(&self) -> impl Future<Output = Result<HttpReply, ChatError>> + Send;
}

/// [`CompletionBackend`] over HTTP with a base URL fixed at construction.
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
    token: CancellationToken,
}

impl HttpBackend {
    pub fn new(
        base_url: &str,
        timeout: Duration,
        token: CancellationToken,
    ) -> Result<Self, ChatError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .pool_max_idle_per_host(4)
            .tcp_keepalive(Duration::from_secs(60))
            .user_agent(format!("lmchat-console/{}", crate::VERSION))
            .build()
            .map_err(|e| ChatError::network(&format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint_url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    async fn exchange(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&Value>,
    ) -> Result<HttpReply, ChatError> {
        let start_time = Instant::now();
        let url = self.endpoint_url(endpoint);
        let request = CancellableRequest::new(&self.client, self.token.clone());

        let result = match request.make_request(method.clone(), &url, body).await {
            Ok(response) => read_json_reply(response, self.token.clone()).await,
            Err(e) => Err(e),
        };

        match &result {
            Ok(reply) => log_timed(
                if reply.is_success() {
                    LOG_PREFIX_SUCCESS
                } else {
                    LOG_PREFIX_ERROR
                },
                &format!("{} {} -> {}", method, endpoint, reply.status),
                start_time,
            ),
            Err(e) => log_timed(
                LOG_PREFIX_ERROR,
                &format!("{} {} failed: {}", method, endpoint, e.message),
                start_time,
            ),
        }

        result
    }
}

impl CompletionBackend for HttpBackend {
    async fn fetch_health(&self) -> Result<HttpReply, ChatError> {
        self.exchange(Method::GET, API_HEALTH, None).await
    }

    async fn fetch_defaults(&self) -> Result<HttpReply, ChatError> {
        self.exchange(Method::GET, API_PARAMETER_DEFAULTS, None).await
    }

    async fn send_chat(&self, body: &Value) -> Result<HttpReply, ChatError> {
        self.exchange(Method::POST, API_CHAT_COMPLETIONS, Some(body))
            .await
    }

    async fn fetch_models(&self) -> Result<HttpReply, ChatError> {
        self.exchange(Method::GET, API_MODELS, None).await
    }
}
