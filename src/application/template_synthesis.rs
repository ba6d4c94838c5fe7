//! Template synthesis stage: [`AgentConfig`] -> Jinja2 template source.

use std::sync::Arc;

use tracing::instrument;

use crate::domain::models::{AgentConfig, PromptTemplate};
use crate::domain::ports::ModelClient;

use super::stage::{single_variable, ChainStage, PipelineError};

// The deliverable is template SOURCE for a downstream rendering engine,
// not a rendered document. The structure block below is the fixed grammar
// every generated template must follow.
const TEMPLATE_SYNTHESIS_TEMPLATE: &str = r#"Using the agent configuration below, generate an agent prompt as a Jinja2 template.

Configuration:
{agent_config}

Output Jinja2 template source, not rendered text. The template will later be
rendered against `role`, `version`, `tools`, and `constraints` context
variables. Follow this structure exactly:

```jinja2
{% import 'macros/formatting.j2' as fmt %}
{% import 'macros/tools.j2' as tools %}
{% import 'macros/validation.j2' as validate %}

{# Agent definition #}
◤◢◤◢◤◢◤◢◤◢◤◢◤◢◤◢◤◢◤◢◤◢◤◢◤◢◤◢
# {{ role.name }}
Version: {{ version }}

## Core Principles
{% for principle in role.principles %}
- {{ principle }}
{% endfor %}
◤◢◤◢◤◢◤◢◤◢◤◢◤◢◤◢◤◢◤◢◤◢◤◢◤◢◤◢

## System Role
You act as {{ role.name }} with the following responsibilities:

{% for responsibility in role.responsibilities %}
- {{ responsibility }}
{% endfor %}

## Available Tools
{% for tool in tools %}
### {{ tool.name }}
{{ tool.description }}

Usage format:
```
{{ tool.usage_format }}
```
{% endfor %}

## Constraints
{% for constraint in constraints %}
- {{ constraint }}
{% endfor %}
```
"#;

/// Turns a validated [`AgentConfig`] into Jinja2 template source following
/// the fixed document grammar (banner, principles loop, responsibilities
/// preamble, per-tool subsections, constraints loop).
///
/// Post-processing is a pass-through: grammar conformance is assessed
/// downstream by the critique stage, not here.
pub struct TemplateSynthesisStage {
    stage: ChainStage,
}

impl TemplateSynthesisStage {
    /// Build the stage over a shared model client.
    pub fn new(client: Arc<dyn ModelClient>, temperature: f32, max_tokens: u32) -> Self {
        let template = PromptTemplate::new(TEMPLATE_SYNTHESIS_TEMPLATE, &["agent_config"]);
        Self {
            stage: ChainStage::new(client, template, temperature, max_tokens),
        }
    }

    /// Synthesize template source for the given config.
    ///
    /// The config is embedded as YAML, which reads well in a prompt and
    /// keeps nested tool structures legible to the model.
    #[instrument(skip(self, config), fields(role = %config.role_name))]
    pub async fn synthesize(&self, config: &AgentConfig) -> Result<String, PipelineError> {
        let serialized = serde_yaml::to_string(config)?;

        self.stage
            .invoke(&single_variable("agent_config", &serialized))
            .await
    }
}
