//! Generic chain stage: render a prompt template, make one model call,
//! hand the raw text to the caller.

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use crate::domain::models::{MissingVariablesError, PromptTemplate, SchemaParseError};
use crate::domain::ports::{CompletionRequest, ModelClient, ModelError};

/// Failures of a pipeline stage or of the pipeline as a whole.
///
/// Every variant propagates unchanged to the caller; the pipeline performs
/// no recovery, defaulting, or partial-result substitution.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// A stage was invoked without a required template variable. Caller
    /// programming error; not retryable.
    #[error(transparent)]
    MissingVariables(#[from] MissingVariablesError),

    /// The model endpoint call failed. Check
    /// [`ModelError::is_transient`](crate::domain::ports::ModelError::is_transient)
    /// before retrying; the pipeline itself never retries.
    #[error("model invocation failed: {0}")]
    Model(#[from] ModelError),

    /// Stage-1 model output could not be decoded into a valid agent
    /// config. Not retryable without re-prompting.
    #[error(transparent)]
    SchemaParse(#[from] SchemaParseError),

    /// `generate_prompt` was called with blank input.
    #[error("user input must not be empty")]
    EmptyInput,

    /// An artifact could not be serialized for embedding into a prompt.
    #[error("failed to serialize agent config: {0}")]
    Serialization(#[from] serde_yaml::Error),
}

/// One template-substitute-invoke unit.
///
/// Holds a prompt template, the sampling parameters, and the shared model
/// client. `invoke` performs exactly one outbound model call; identical
/// inputs are not deduplicated, since completions are non-deterministic
/// under nonzero temperature. Post-processing beyond text extraction is the
/// concrete stage's business.
pub struct ChainStage {
    template: PromptTemplate,
    temperature: f32,
    max_tokens: u32,
    client: Arc<dyn ModelClient>,
}

impl ChainStage {
    /// Create a stage over the given template and sampling parameters.
    pub fn new(
        client: Arc<dyn ModelClient>,
        template: PromptTemplate,
        temperature: f32,
        max_tokens: u32,
    ) -> Self {
        Self {
            template,
            temperature,
            max_tokens,
            client,
        }
    }

    /// Render the template against `variables` and run one model call.
    ///
    /// Fails with [`PipelineError::MissingVariables`] before any network
    /// traffic when a required placeholder has no value.
    pub async fn invoke(
        &self,
        variables: &HashMap<String, String>,
    ) -> Result<String, PipelineError> {
        let prompt = self.template.render(variables)?;
        debug!(prompt_chars = prompt.len(), temperature = self.temperature, "invoking model");

        let text = self
            .client
            .complete(CompletionRequest {
                prompt,
                temperature: self.temperature,
                max_tokens: self.max_tokens,
            })
            .await?;

        if text.trim().is_empty() {
            return Err(ModelError::EmptyCompletion.into());
        }

        debug!(response_chars = text.len(), "model responded");
        Ok(text)
    }
}

/// Build a single-entry variables map.
pub(crate) fn single_variable(name: &str, value: &str) -> HashMap<String, String> {
    HashMap::from([(name.to_string(), value.to_string())])
}
