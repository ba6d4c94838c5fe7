//! Shared test helpers.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use promptforge::domain::models::{AgentConfig, Tool, ToolParameter};
use promptforge::{CompletionRequest, ModelClient, ModelError};

/// Deterministic model fake: serves queued responses in order and records
/// every prompt it receives.
pub struct ScriptedModelClient {
    responses: Mutex<VecDeque<Result<String, ModelError>>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedModelClient {
    pub fn new(responses: Vec<Result<String, ModelError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into_iter().collect()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Number of completions served so far.
    pub fn call_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    /// Every prompt received, in order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl ModelClient for ScriptedModelClient {
    async fn complete(&self, request: CompletionRequest) -> Result<String, ModelError> {
        self.prompts.lock().unwrap().push(request.prompt);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Err(ModelError::InvalidRequest(
                    "scripted client exhausted".to_string(),
                ))
            })
    }
}

/// The development-support agent config exercised throughout the suite.
pub fn dev_support_config() -> AgentConfig {
    AgentConfig {
        role_name: "開発支援エージェント".to_string(),
        responsibilities: vec!["タスク管理".to_string(), "コードレビュー".to_string()],
        principles: vec!["効率性重視".to_string(), "品質重視".to_string()],
        tools: vec![Tool {
            name: "task_manager".to_string(),
            description: "タスク管理ツール".to_string(),
            parameters: vec![ToolParameter {
                name: "task_id".to_string(),
                param_type: "string".to_string(),
            }],
            usage_format: "<task_manager><task_id>123</task_id></task_manager>".to_string(),
        }],
        constraints: vec!["セキュリティ重視".to_string()],
    }
}

/// A plausible stage-2 output for tests that thread it onward.
pub fn sample_template_source() -> String {
    r#"{% import 'macros/formatting.j2' as fmt %}
# {{ role.name }}
Version: {{ version }}

{% for principle in role.principles %}
- {{ principle }}
{% endfor %}
"#
    .to_string()
}
