//! Error classification for the Anthropic HTTP client.

use reqwest::StatusCode;
use thiserror::Error;

use crate::domain::ports::ModelError;

/// Errors that can occur when talking to the Anthropic API
#[derive(Debug, Error)]
pub enum AnthropicApiError {
    /// Invalid request parameters (HTTP 400)
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Invalid or missing API key (HTTP 401)
    #[error("invalid API key - authentication failed")]
    InvalidApiKey,

    /// Forbidden - permission denied (HTTP 403)
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Resource not found (HTTP 404)
    #[error("resource not found")]
    NotFound,

    /// Rate limit exceeded (HTTP 429)
    #[error("rate limit exceeded - too many requests")]
    RateLimitExceeded,

    /// Server error from the API (HTTP 5xx)
    #[error("server error ({0}): {1}")]
    ServerError(StatusCode, String),

    /// Request timeout
    #[error("request timeout")]
    Timeout,

    /// Network or connection error
    #[error("network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// Response body could not be decoded
    #[error("json error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// The response carried no text content
    #[error("response contained no text content")]
    EmptyResponse,

    /// Unknown or unexpected error
    #[error("unknown error ({0}): {1}")]
    UnknownError(StatusCode, String),
}

impl AnthropicApiError {
    /// Classify a non-success HTTP status with its response body.
    pub fn from_status(status: StatusCode, body: String) -> Self {
        match status {
            StatusCode::BAD_REQUEST => Self::InvalidRequest(body),
            StatusCode::UNAUTHORIZED => Self::InvalidApiKey,
            StatusCode::FORBIDDEN => Self::Forbidden(body),
            StatusCode::NOT_FOUND => Self::NotFound,
            StatusCode::TOO_MANY_REQUESTS => Self::RateLimitExceeded,
            status if status.is_server_error() => Self::ServerError(status, body),
            status => Self::UnknownError(status, body),
        }
    }

    /// Returns true if this error is transient and a retry could succeed
    pub const fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::RateLimitExceeded
                | Self::ServerError(_, _)
                | Self::Timeout
                | Self::NetworkError(_)
        )
    }

    /// Returns true if this is a permanent error that should not be retried
    pub const fn is_permanent(&self) -> bool {
        !self.is_transient()
    }
}

impl From<AnthropicApiError> for ModelError {
    fn from(err: AnthropicApiError) -> Self {
        match err {
            AnthropicApiError::InvalidRequest(message) => Self::InvalidRequest(message),
            AnthropicApiError::InvalidApiKey => Self::InvalidApiKey,
            AnthropicApiError::RateLimitExceeded => Self::RateLimitExceeded,
            AnthropicApiError::Timeout => Self::Timeout,
            AnthropicApiError::NetworkError(inner) => Self::Network(inner.to_string()),
            AnthropicApiError::ServerError(status, message) => Self::Server {
                status: status.as_u16(),
                message,
            },
            AnthropicApiError::EmptyResponse => Self::EmptyCompletion,
            AnthropicApiError::Forbidden(message) => Self::Api {
                status: 403,
                message,
            },
            AnthropicApiError::NotFound => Self::Api {
                status: 404,
                message: "resource not found".to_string(),
            },
            AnthropicApiError::JsonError(inner) => Self::Api {
                status: 200,
                message: format!("undecodable response body: {inner}"),
            },
            AnthropicApiError::UnknownError(status, message) => Self::Api {
                status: status.as_u16(),
                message,
            },
        }
    }
}
