use std::time::Duration;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::UpstreamError;
use crate::retry::{execute_with_retry, RetryConfig};

/// Longest response body excerpt kept in [`UpstreamError::Status`].
const MAX_ERROR_BODY: usize = 512;

/// A JSON-over-HTTPS client bound to a single remote endpoint.
///
/// The underlying `reqwest::Client` pools connections, so one instance should
/// be built per service and shared (it is cheap to clone).
#[derive(Clone, Debug)]
pub struct UpstreamClient {
    http: reqwest::Client,
    service: &'static str,
    endpoint: String,
    api_key: Option<String>,
    timeout: Duration,
    retry: Option<RetryConfig>,
}

impl UpstreamClient {
    /// Build a client for `endpoint`.
    ///
    /// `service` is a short static name used in logs (e.g. `"embedding"`).
    pub fn new(
        service: &'static str,
        endpoint: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, UpstreamError> {
        let endpoint = endpoint.into();
        if endpoint.trim().is_empty() {
            return Err(UpstreamError::InvalidConfig(format!(
                "{service} endpoint url is empty"
            )));
        }

        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .pool_max_idle_per_host(16)
            .build()
            .map_err(|e| UpstreamError::InvalidConfig(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            service,
            endpoint,
            api_key,
            timeout,
            retry: None,
        })
    }

    /// Enable retries for every call made through this client.
    pub fn with_retry(mut self, retry: Option<RetryConfig>) -> Self {
        self.retry = retry;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn service(&self) -> &'static str {
        self.service
    }

    /// POST `body` as JSON and decode the response into `Resp`.
    ///
    /// Retries transient failures when a [`RetryConfig`] is set.
    pub async fn post_json<Req, Resp>(&self, body: &Req) -> Result<Resp, UpstreamError>
    where
        Req: Serialize + ?Sized,
        Resp: DeserializeOwned,
    {
        let payload = serde_json::to_vec(body)
            .map_err(|e| UpstreamError::InvalidConfig(format!("unserializable request: {e}")))?;

        match self.retry {
            Some(retry) => {
                let outcome =
                    execute_with_retry(&retry, |_attempt| self.send_once::<Resp>(&payload)).await;
                if outcome.attempts > 1 {
                    tracing::debug!(
                        service = self.service,
                        attempts = outcome.attempts,
                        elapsed_ms = outcome.total_duration.as_millis() as u64,
                        succeeded = outcome.succeeded(),
                        "upstream call finished after retries"
                    );
                }
                outcome.into_result()
            }
            None => self.send_once(&payload).await,
        }
    }

    async fn send_once<Resp>(&self, payload: &[u8]) -> Result<Resp, UpstreamError>
    where
        Resp: DeserializeOwned,
    {
        let mut request = self
            .http
            .post(&self.endpoint)
            .timeout(self.timeout)
            .header(CONTENT_TYPE, "application/json")
            .body(payload.to_vec());
        if let Some(key) = self.api_key.as_deref() {
            request = request.header(AUTHORIZATION, format!("Bearer {key}"));
        }

        let response = request
            .send()
            .await
            .map_err(|e| UpstreamError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                body: truncate(body, MAX_ERROR_BODY),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| UpstreamError::Transport(format!("failed to read body: {e}")))?;

        serde_json::from_slice(&bytes).map_err(|e| UpstreamError::Format(e.to_string()))
    }
}

fn truncate(mut body: String, max: usize) -> String {
    if body.len() > max {
        let mut cut = max;
        while !body.is_char_boundary(cut) {
            cut -= 1;
        }
        body.truncate(cut);
    }
    body
}
