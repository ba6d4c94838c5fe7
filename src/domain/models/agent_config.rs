//! Agent Configuration Domain Models
//!
//! Models for the structured agent specification produced by the role
//! analysis stage and consumed by the template synthesis stage.

use serde::{Deserialize, Serialize};

/// One invocation argument of a [`Tool`].
///
/// Serialized with the JSON key `type` for the argument type, matching the
/// shape the role analysis stage asks the model to emit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ToolParameter {
    /// Argument name.
    pub name: String,

    /// Argument type, as free text (e.g. "string", "integer").
    #[serde(rename = "type")]
    pub param_type: String,
}

/// One capability the synthesized agent may invoke.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Tool {
    /// Tool identifier, must be non-empty.
    pub name: String,

    /// Human-readable purpose of the tool.
    pub description: String,

    /// Ordered invocation arguments; may be empty.
    pub parameters: Vec<ToolParameter>,

    /// Literal invocation syntax example (e.g. an XML-ish markup snippet).
    /// Opaque beyond non-emptiness.
    pub usage_format: String,
}

impl Tool {
    /// Collect invariant violations for this tool.
    ///
    /// `prefix` locates the tool inside a parent structure (e.g. `tools[2]`)
    /// so diagnostics stay field-addressable.
    pub fn violations(&self, prefix: &str) -> Vec<String> {
        let mut problems = Vec::new();

        if self.name.trim().is_empty() {
            problems.push(format!("{prefix}.name must be a non-empty string"));
        }
        if self.usage_format.trim().is_empty() {
            problems.push(format!("{prefix}.usage_format must be a non-empty string"));
        }

        problems
    }
}

/// Structured description of one synthesized agent: its role, duties,
/// principles, tools, and constraints.
///
/// Produced once by the role analysis stage and treated as read-only from
/// then on; a config that needs different values is rebuilt, not mutated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AgentConfig {
    /// Role name, must be non-empty.
    pub role_name: String,

    /// Ordered responsibilities; must be non-empty for the config to be usable.
    pub responsibilities: Vec<String>,

    /// Ordered operating principles; may be empty.
    pub principles: Vec<String>,

    /// Available tools; must be non-empty and each tool must be valid.
    pub tools: Vec<Tool>,

    /// Ordered constraints; must be non-empty.
    pub constraints: Vec<String>,
}

impl AgentConfig {
    /// Collect every invariant violation in this config.
    ///
    /// Returns an empty vector when the config is usable. Violations are
    /// reported all at once rather than stopping at the first, so one model
    /// round trip surfaces the complete set of problems.
    pub fn violations(&self) -> Vec<String> {
        let mut problems = Vec::new();

        if self.role_name.trim().is_empty() {
            problems.push("role_name must be a non-empty string".to_string());
        }
        if self.responsibilities.is_empty() {
            problems.push("responsibilities must contain at least one entry".to_string());
        }
        if self.constraints.is_empty() {
            problems.push("constraints must contain at least one entry".to_string());
        }
        if self.tools.is_empty() {
            problems.push("tools must contain at least one entry".to_string());
        }
        for (index, tool) in self.tools.iter().enumerate() {
            problems.extend(tool.violations(&format!("tools[{index}]")));
        }

        problems
    }

    /// Whether all invariants hold.
    pub fn is_valid(&self) -> bool {
        self.violations().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_config() -> AgentConfig {
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

    #[test]
    fn test_valid_config_has_no_violations() {
        let config = sample_config();
        assert!(config.is_valid());
        assert!(config.violations().is_empty());
    }

    #[test]
    fn test_empty_principles_allowed() {
        let mut config = sample_config();
        config.principles.clear();
        assert!(config.is_valid());
    }

    #[test]
    fn test_empty_role_name_rejected() {
        let mut config = sample_config();
        config.role_name = "  ".to_string();
        let problems = config.violations();
        assert_eq!(problems.len(), 1);
        assert!(problems[0].contains("role_name"));
    }

    #[test]
    fn test_all_violations_reported_at_once() {
        let config = AgentConfig {
            role_name: String::new(),
            responsibilities: vec![],
            principles: vec![],
            tools: vec![],
            constraints: vec![],
        };
        let problems = config.violations();
        assert_eq!(problems.len(), 4);
    }

    #[test]
    fn test_invalid_tool_reported_with_index() {
        let mut config = sample_config();
        config.tools.push(Tool {
            name: String::new(),
            description: "second tool".to_string(),
            parameters: vec![],
            usage_format: String::new(),
        });
        let problems = config.violations();
        assert!(problems.iter().any(|p| p.contains("tools[1].name")));
        assert!(problems.iter().any(|p| p.contains("tools[1].usage_format")));
    }

    #[test]
    fn test_tool_parameter_serializes_type_key() {
        let parameter = ToolParameter {
            name: "task_id".to_string(),
            param_type: "string".to_string(),
        };
        let json = serde_json::to_string(&parameter).unwrap();
        assert!(json.contains(r#""type":"string""#));
        assert!(!json.contains("param_type"));
    }

    #[test]
    fn test_config_json_round_trip() {
        let config = sample_config();
        let json = serde_json::to_string(&config).unwrap();
        let restored: AgentConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, config);
    }
}
