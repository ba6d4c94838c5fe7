//! Final artifact of one pipeline run.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::agent_config::AgentConfig;

/// The tri-partite result of one `generate_prompt` invocation: the
/// structured agent config, the synthesized template source, and the
/// critique text. Owned entirely by the caller; the pipeline keeps no
/// reference after returning it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedPrompt {
    /// Unique identifier for this run.
    pub id: String,

    /// Structured agent specification extracted from the user's request.
    pub config: AgentConfig,

    /// Jinja2 template source produced by the synthesis stage. Template
    /// SOURCE, not a rendered document; rendering happens elsewhere.
    pub template_source: String,

    /// Free-text review of the template source. Advisory only.
    pub critique: String,

    /// When the run completed.
    pub generated_at: DateTime<Utc>,
}

impl GeneratedPrompt {
    /// Assemble a result from the three stage outputs.
    pub fn new(config: AgentConfig, template_source: String, critique: String) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            config,
            template_source,
            critique,
            generated_at: Utc::now(),
        }
    }
}
