//! Role analysis stage: free-text request -> [`AgentConfig`].

use std::sync::Arc;

use tracing::instrument;

use crate::domain::models::{AgentConfig, AgentConfigSchema, PromptTemplate};
use crate::domain::ports::ModelClient;

use super::stage::{single_variable, ChainStage, PipelineError};

const ROLE_ANALYSIS_TEMPLATE: &str = "\
Analyze the user's request and derive the agent role and tools best suited to it.

Request:
{user_input}

Cover all of the following in your analysis:
1. The agent's role and its responsibilities
2. The tools the agent needs (each with a name, description, parameters, and usage format)
3. Operating principles and hard constraints

Output format:
{format_instructions}
";

/// Extracts a structured [`AgentConfig`] from a free-text description of
/// the desired agent.
///
/// The prompt embeds the schema descriptor's format instructions (baked in
/// at construction) so the model is steered toward parseable output;
/// post-processing delegates to the schema descriptor's strict decoder.
pub struct RoleAnalysisStage {
    stage: ChainStage,
}

impl RoleAnalysisStage {
    /// Build the stage over a shared model client.
    pub fn new(client: Arc<dyn ModelClient>, temperature: f32, max_tokens: u32) -> Self {
        let template = PromptTemplate::new(ROLE_ANALYSIS_TEMPLATE, &[
            "user_input",
            "format_instructions",
        ])
        .partial("format_instructions", &AgentConfigSchema::format_instructions());

        Self {
            stage: ChainStage::new(client, template, temperature, max_tokens),
        }
    }

    /// Analyze a non-empty user request into a validated config.
    ///
    /// On parse failure the raw model text travels inside the error; it is
    /// never discarded.
    #[instrument(skip(self, user_input), fields(input_chars = user_input.len()))]
    pub async fn analyze(&self, user_input: &str) -> Result<AgentConfig, PipelineError> {
        if user_input.trim().is_empty() {
            return Err(PipelineError::EmptyInput);
        }

        let raw = self
            .stage
            .invoke(&single_variable("user_input", user_input))
            .await?;

        Ok(AgentConfigSchema::parse(&raw)?)
    }
}
