//! Pipeline orchestrator: analysis -> synthesis -> critique.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::domain::models::GeneratedPrompt;
use crate::domain::ports::ModelClient;

use super::critique::CritiqueStage;
use super::role_analysis::RoleAnalysisStage;
use super::stage::PipelineError;
use super::template_synthesis::TemplateSynthesisStage;

/// Sampling parameters shared by the three stages, fixed at construction.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Sampling temperature in [0, 1].
    pub temperature: f32,

    /// Maximum tokens per stage completion.
    pub max_tokens: u32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_tokens: 4096,
        }
    }
}

/// Progression of one pipeline run. Strictly linear; no branching, no
/// retry loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PipelineState {
    Analyzing,
    Synthesizing,
    Critiquing,
    Done,
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Analyzing => "analyzing",
            Self::Synthesizing => "synthesizing",
            Self::Critiquing => "critiquing",
            Self::Done => "done",
        })
    }
}

/// Composes the three stages into one `generate_prompt` operation.
///
/// Immutable after construction: the stages and the shared model client
/// are the only state, so concurrent invocations need no coordination.
/// Artifacts produced mid-run live in per-invocation locals and are
/// threaded forward by value; nothing is mutated after a stage produces
/// it, and nothing is retained once the result is returned.
pub struct PromptPipeline {
    role_analysis: RoleAnalysisStage,
    template_synthesis: TemplateSynthesisStage,
    critique: CritiqueStage,
}

impl PromptPipeline {
    /// Build a pipeline over a shared model client.
    pub fn new(client: Arc<dyn ModelClient>, config: &PipelineConfig) -> Self {
        Self {
            role_analysis: RoleAnalysisStage::new(
                Arc::clone(&client),
                config.temperature,
                config.max_tokens,
            ),
            template_synthesis: TemplateSynthesisStage::new(
                Arc::clone(&client),
                config.temperature,
                config.max_tokens,
            ),
            critique: CritiqueStage::new(client, config.temperature, config.max_tokens),
        }
    }

    /// Run the full pipeline over one user request.
    ///
    /// Any stage failure aborts immediately and propagates unchanged; no
    /// later stage runs and no partial result is returned.
    #[instrument(skip(self, user_input), fields(input_chars = user_input.len()))]
    pub async fn generate_prompt(
        &self,
        user_input: &str,
    ) -> Result<GeneratedPrompt, PipelineError> {
        debug!(state = %PipelineState::Analyzing, "running role analysis");
        let config = self.role_analysis.analyze(user_input).await?;

        debug!(state = %PipelineState::Synthesizing, role = %config.role_name, "running template synthesis");
        let template_source = self.template_synthesis.synthesize(&config).await?;

        debug!(state = %PipelineState::Critiquing, "running critique");
        let critique = self.critique.critique(&template_source).await?;

        let result = GeneratedPrompt::new(config, template_source, critique);
        info!(state = %PipelineState::Done, run_id = %result.id, "prompt generation complete");
        Ok(result)
    }
}
