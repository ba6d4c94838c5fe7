//! HTTP client for the Anthropic Messages API, implementing the
//! [`ModelClient`] port.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client as ReqwestClient, Response, StatusCode};
use tracing::{debug, info, instrument, warn};

use crate::domain::models::Config;
use crate::domain::ports::{CompletionRequest, ModelClient, ModelError};

use super::errors::AnthropicApiError;
use super::rate_limiter::TokenBucketRateLimiter;
use super::types::{MessageRequest, MessageResponse};

const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Configuration for the Anthropic HTTP client
#[derive(Debug, Clone)]
pub struct AnthropicClientConfig {
    /// Anthropic API key
    pub api_key: String,

    /// Base URL for the API
    pub base_url: String,

    /// Model identifier sent with every request
    pub model: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Rate limit in requests per second
    pub rate_limit_rps: f64,
}

impl From<&Config> for AnthropicClientConfig {
    fn from(config: &Config) -> Self {
        Self {
            api_key: config.api_key.clone(),
            base_url: config.base_url.clone(),
            model: config.model.clone(),
            timeout_secs: config.timeout_secs,
            rate_limit_rps: config.rate_limit.requests_per_second,
        }
    }
}

/// HTTP client for the Anthropic Messages API
///
/// Provides connection pooling and reuse, token-bucket request throttling,
/// and structured error classification. Retry is deliberately NOT handled
/// here: each `complete` call maps to exactly one HTTP request, and the
/// caller decides whether a transient failure is worth retrying.
pub struct AnthropicClient {
    http_client: ReqwestClient,
    base_url: String,
    model: String,
    rate_limiter: TokenBucketRateLimiter,
}

impl AnthropicClient {
    /// Create a new API client
    pub fn new(config: AnthropicClientConfig) -> Result<Self, ModelError> {
        info!(
            base_url = %config.base_url,
            model = %config.model,
            rate_limit_rps = config.rate_limit_rps,
            timeout_secs = config.timeout_secs,
            api_key = %scrub_api_key(&config.api_key),
            "initializing Anthropic API client"
        );

        let mut headers = header::HeaderMap::new();
        headers.insert(
            "x-api-key",
            header::HeaderValue::from_str(&config.api_key)
                .map_err(|e| ModelError::InvalidRequest(format!("invalid API key: {e}")))?,
        );
        headers.insert(
            "anthropic-version",
            header::HeaderValue::from_static(ANTHROPIC_VERSION),
        );
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        let http_client = ReqwestClient::builder()
            .pool_max_idle_per_host(10)
            .timeout(Duration::from_secs(config.timeout_secs))
            .tcp_nodelay(true)
            .default_headers(headers)
            .build()
            .map_err(|e| ModelError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: config.base_url,
            model: config.model,
            rate_limiter: TokenBucketRateLimiter::new(config.rate_limit_rps),
        })
    }

    async fn execute_message_request(
        &self,
        request: &MessageRequest,
    ) -> Result<MessageResponse, AnthropicApiError> {
        let url = format!("{}/v1/messages", self.base_url);
        debug!("POST {url}");

        let response = self
            .http_client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(classify_reqwest_error)?;

        self.handle_response(response).await
    }

    async fn handle_response(
        &self,
        response: Response,
    ) -> Result<MessageResponse, AnthropicApiError> {
        let status = response.status();
        debug!("response status: {status}");

        if !status.is_success() {
            return Err(self.handle_error_response(status, response).await);
        }

        let message_response: MessageResponse =
            response.json().await.map_err(classify_reqwest_error)?;
        Ok(message_response)
    }

    async fn handle_error_response(
        &self,
        status: StatusCode,
        response: Response,
    ) -> AnthropicApiError {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "unable to read error body".to_string());

        warn!("API error ({status}): {body}");
        AnthropicApiError::from_status(status, body)
    }
}

fn classify_reqwest_error(err: reqwest::Error) -> AnthropicApiError {
    if err.is_timeout() {
        AnthropicApiError::Timeout
    } else {
        AnthropicApiError::NetworkError(err)
    }
}

/// Scrub all but a short prefix of the API key for log output.
fn scrub_api_key(api_key: &str) -> String {
    if api_key.len() > 8 {
        format!("{}...[REDACTED]", &api_key[..8])
    } else {
        "[REDACTED]".to_string()
    }
}

#[async_trait]
impl ModelClient for AnthropicClient {
    #[instrument(skip(self, request), fields(model = %self.model, max_tokens = request.max_tokens))]
    async fn complete(&self, request: CompletionRequest) -> Result<String, ModelError> {
        self.rate_limiter.acquire().await;

        let message_request = MessageRequest::single_turn(
            self.model.clone(),
            request.prompt,
            request.max_tokens,
            request.temperature,
        );

        let response = self
            .execute_message_request(&message_request)
            .await
            .map_err(ModelError::from)?;

        info!(
            input_tokens = response.usage.input_tokens,
            output_tokens = response.usage.output_tokens,
            stop_reason = response.stop_reason.as_deref().unwrap_or("unknown"),
            "completion succeeded"
        );

        let text = response.text();
        if text.trim().is_empty() {
            return Err(AnthropicApiError::EmptyResponse.into());
        }
        Ok(text)
    }
}
