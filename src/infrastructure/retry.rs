//! Caller-side retry policy with exponential backoff.
//!
//! The pipeline never retries on its own; a caller that wants resilience
//! wraps whole invocations in this policy. Only transient model errors are
//! retried - schema parse failures and missing variables fail immediately,
//! since repeating the identical call cannot fix them.

use std::future::Future;
use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, warn};

use crate::application::PipelineError;
use crate::domain::models::RetryConfig;

/// Retry policy configuration for handling transient model errors
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    max_retries: u32,
    initial_backoff_ms: u64,
    max_backoff_ms: u64,
}

impl RetryPolicy {
    /// Create a new retry policy
    pub fn new(max_retries: u32, initial_backoff_ms: u64, max_backoff_ms: u64) -> Self {
        assert!(max_retries > 0, "max_retries must be greater than 0");
        assert!(
            initial_backoff_ms > 0,
            "initial_backoff_ms must be greater than 0"
        );
        assert!(
            max_backoff_ms >= initial_backoff_ms,
            "max_backoff_ms must be >= initial_backoff_ms"
        );

        Self {
            max_retries,
            initial_backoff_ms,
            max_backoff_ms,
        }
    }

    /// Build a policy from loaded configuration with the given attempt cap.
    pub fn from_config(config: &RetryConfig, max_retries: u32) -> Self {
        Self::new(
            max_retries,
            config.initial_backoff_ms,
            config.max_backoff_ms,
        )
    }

    /// Execute an operation, retrying transient failures with exponential
    /// backoff.
    pub async fn execute<F, Fut, T>(&self, mut operation: F) -> Result<T, PipelineError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, PipelineError>>,
    {
        let mut attempt = 0;

        loop {
            match operation().await {
                Ok(result) => {
                    if attempt > 0 {
                        debug!("operation succeeded after {attempt} retries");
                    }
                    return Ok(result);
                }
                Err(err) => {
                    if self.should_retry(&err, attempt) {
                        let backoff = self.calculate_backoff(attempt);
                        warn!(
                            "attempt {} failed with transient error: {}. Retrying in {:?}",
                            attempt + 1,
                            err,
                            backoff
                        );

                        sleep(backoff).await;
                        attempt += 1;
                    } else {
                        if attempt >= self.max_retries {
                            warn!("operation failed after {} attempts: {}", attempt + 1, err);
                        } else {
                            debug!("non-retryable error: {err}");
                        }
                        return Err(err);
                    }
                }
            }
        }
    }

    /// min(initial_backoff * 2^attempt, max_backoff)
    fn calculate_backoff(&self, attempt: u32) -> Duration {
        let backoff_ms = self
            .initial_backoff_ms
            .saturating_mul(2_u64.saturating_pow(attempt))
            .min(self.max_backoff_ms);

        Duration::from_millis(backoff_ms)
    }

    fn should_retry(&self, error: &PipelineError, attempt: u32) -> bool {
        if attempt >= self.max_retries {
            return false;
        }
        matches!(error, PipelineError::Model(model_err) if model_err.is_transient())
    }
}
