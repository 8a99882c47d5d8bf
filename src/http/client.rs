use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::check_cancelled;
use crate::constants::CONTENT_TYPE_JSON;
use crate::error::ChatError;
use crate::http::error::map_reqwest_error;

pub struct CancellableRequest<'a> {
    client: &'a reqwest::Client,
    token: CancellationToken,
}

impl<'a> CancellableRequest<'a> {
    pub fn new(client: &'a reqwest::Client, token: CancellationToken) -> Self {
        Self { client, token }
    }

    pub async fn make_request<B: Serialize>(
        &self,
        method: reqwest::Method,
        url: &str,
        body: Option<B>,
    ) -> Result<reqwest::Response, ChatError> {
        check_cancelled!(self.token);

        let mut request_builder = self.client.request(method, url);

        if let Some(body_content) = body {
            request_builder = request_builder
                .header("Content-Type", CONTENT_TYPE_JSON)
                .json(&body_content);
        }

        tokio::select! {
            result = request_builder.send() => result.map_err(map_reqwest_error),
            _ = self.token.cancelled() => Err(ChatError::cancelled()),
        }
    }
}
