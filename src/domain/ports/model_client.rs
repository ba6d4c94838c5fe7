//! Port trait for the external language-model endpoint.
//!
//! The pipeline consumes exactly one capability from the outside world:
//! send a prompt, get completion text back. Keeping the port this narrow
//! lets tests substitute deterministic fakes and keeps provider specifics
//! (HTTP, auth, rate limiting) inside the infrastructure adapter.

use async_trait::async_trait;
use thiserror::Error;

/// One completion request: the fully rendered prompt plus sampling
/// parameters. Model selection is fixed at client construction time.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// Fully rendered prompt text.
    pub prompt: String,

    /// Sampling temperature in [0, 1]. Higher values produce more random
    /// output.
    pub temperature: f32,

    /// Maximum tokens to generate.
    pub max_tokens: u32,
}

/// Failures surfaced by a model endpoint invocation.
///
/// Transient errors (rate limits, timeouts, network and server failures)
/// may be retried by the caller; the pipeline itself never retries.
#[derive(Debug, Error)]
pub enum ModelError {
    /// Invalid request parameters rejected by the provider.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Invalid or missing API key.
    #[error("invalid API key - authentication failed")]
    InvalidApiKey,

    /// Provider-side rate limit hit.
    #[error("rate limit exceeded - too many requests")]
    RateLimitExceeded,

    /// Request timed out before a response arrived.
    #[error("request timed out")]
    Timeout,

    /// Network or connection failure.
    #[error("network error: {0}")]
    Network(String),

    /// Provider-side server error.
    #[error("server error ({status}): {message}")]
    Server {
        /// HTTP status code.
        status: u16,
        /// Response body, as far as it could be read.
        message: String,
    },

    /// The provider answered but the response carried no text content.
    #[error("model returned no text content")]
    EmptyCompletion,

    /// Anything else the provider reported.
    #[error("api error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body, as far as it could be read.
        message: String,
    },
}

impl ModelError {
    /// Whether a retry of the same request could plausibly succeed.
    pub const fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::RateLimitExceeded | Self::Timeout | Self::Network(_) | Self::Server { .. }
        )
    }

    /// Whether retrying the same request is pointless.
    pub const fn is_permanent(&self) -> bool {
        !self.is_transient()
    }
}

/// Port trait for language-model completion.
///
/// Implementations must be `Send + Sync` and take `&self`, so one client
/// can serve concurrent pipeline invocations without shared mutable state.
/// Each call performs exactly one outbound request: no caching, no
/// dedup, no retry.
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// Send one prompt and return the completion text.
    async fn complete(&self, request: CompletionRequest) -> Result<String, ModelError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_errors() {
        assert!(ModelError::RateLimitExceeded.is_transient());
        assert!(ModelError::Timeout.is_transient());
        assert!(ModelError::Network("connection reset".to_string()).is_transient());
        assert!(ModelError::Server {
            status: 503,
            message: "overloaded".to_string()
        }
        .is_transient());
    }

    #[test]
    fn test_permanent_errors() {
        assert!(ModelError::InvalidApiKey.is_permanent());
        assert!(ModelError::InvalidRequest("bad".to_string()).is_permanent());
        assert!(ModelError::EmptyCompletion.is_permanent());
    }

    #[test]
    fn test_classification_is_exclusive() {
        let errors = [
            ModelError::RateLimitExceeded,
            ModelError::InvalidApiKey,
            ModelError::Timeout,
            ModelError::EmptyCompletion,
        ];
        for error in errors {
            assert_ne!(error.is_transient(), error.is_permanent());
        }
    }
}
