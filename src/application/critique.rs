//! Critique stage: template source -> free-text review.

use std::sync::Arc;

use tracing::instrument;

use crate::domain::models::PromptTemplate;
use crate::domain::ports::ModelClient;

use super::stage::{single_variable, ChainStage, PipelineError};

const CRITIQUE_TEMPLATE: &str = "\
Review the generated Jinja2 agent prompt template below.

Template:
{agent_prompt}

Assess it on these points and call out concrete improvements:
1. Jinja2 template syntax correctness
2. Appropriate use of the imported macros
3. Consistency between declared and referenced variables
4. Correct use of loop and conditional constructs
5. Adherence to the expected output structure

Return your review as plain text.
";

/// Reviews synthesized template source along five fixed quality
/// dimensions. The review is free text with no machine-checkable verdict;
/// it never gates the pipeline's result.
pub struct CritiqueStage {
    stage: ChainStage,
}

impl CritiqueStage {
    /// Build the stage over a shared model client.
    pub fn new(client: Arc<dyn ModelClient>, temperature: f32, max_tokens: u32) -> Self {
        let template = PromptTemplate::new(CRITIQUE_TEMPLATE, &["agent_prompt"]);
        Self {
            stage: ChainStage::new(client, template, temperature, max_tokens),
        }
    }

    /// Critique non-empty template source.
    #[instrument(skip(self, template_source), fields(template_chars = template_source.len()))]
    pub async fn critique(&self, template_source: &str) -> Result<String, PipelineError> {
        if template_source.trim().is_empty() {
            return Err(PipelineError::EmptyInput);
        }

        self.stage
            .invoke(&single_variable("agent_prompt", template_source))
            .await
    }
}
