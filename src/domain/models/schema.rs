//! Agent Config Schema Descriptor
//!
//! Documents the [`AgentConfig`] shape as prompt-embeddable format
//! instructions, and decodes free-text model output back into a validated
//! `AgentConfig`. Decoding is strict and all-or-nothing: either every field
//! is present, well-typed, and invariant-clean, or the caller gets the raw
//! output back together with one diagnostic per violation.

use serde_json::Value;
use thiserror::Error;

use super::agent_config::AgentConfig;

/// Raised when model output cannot be mapped to a valid [`AgentConfig`].
///
/// The full raw output is retained for forensics; it must never be
/// discarded on the way up to the caller.
#[derive(Debug, Error)]
#[error("agent config parse failed: {}", .diagnostics.join("; "))]
pub struct SchemaParseError {
    /// Complete, unmodified model output.
    pub raw_output: String,

    /// One entry per missing, malformed, or invariant-violating field.
    pub diagnostics: Vec<String>,
}

impl SchemaParseError {
    fn new(raw_output: &str, diagnostics: Vec<String>) -> Self {
        Self {
            raw_output: raw_output.to_string(),
            diagnostics,
        }
    }
}

/// Stateless descriptor for the `AgentConfig` wire shape.
pub struct AgentConfigSchema;

impl AgentConfigSchema {
    /// Natural-language format instructions for embedding into a prompt.
    ///
    /// Deterministic and side-effect-free, so the role analysis template can
    /// bake the result in at construction time.
    pub fn format_instructions() -> String {
        r#"Respond with a single JSON object and nothing else. The object must have exactly these fields:

- "role_name": string, the agent's role name (non-empty)
- "responsibilities": array of strings, the agent's duties (at least one)
- "principles": array of strings, operating principles (may be empty)
- "tools": array of tool objects (at least one), where each tool object has:
    - "name": string, tool identifier (non-empty)
    - "description": string, what the tool does
    - "parameters": array of {"name": string, "type": string} objects (may be empty)
    - "usage_format": string, a literal invocation example (non-empty)
- "constraints": array of strings, hard constraints (at least one)

Example:
```json
{
  "role_name": "Example Agent",
  "responsibilities": ["First duty"],
  "principles": ["First principle"],
  "tools": [
    {
      "name": "example_tool",
      "description": "What the tool does",
      "parameters": [{"name": "arg", "type": "string"}],
      "usage_format": "<example_tool><arg>value</arg></example_tool>"
    }
  ],
  "constraints": ["First constraint"]
}
```"#
        .to_string()
    }

    /// Decode raw model output into a validated [`AgentConfig`].
    ///
    /// Tolerates the decoration models habitually add around JSON payloads
    /// (markdown fences, leading prose, echoed instructions) by scanning for
    /// balanced top-level JSON objects and decoding the last one that
    /// parses. Field validation then collects every violation before
    /// failing, so the error names all problems in one pass.
    pub fn parse(raw: &str) -> Result<AgentConfig, SchemaParseError> {
        let stripped = strip_code_fences(raw);

        let value = extract_last_json_object(stripped).ok_or_else(|| {
            SchemaParseError::new(raw, vec!["no JSON object found in model output".to_string()])
        })?;

        let shape_problems = check_shape(&value);
        if !shape_problems.is_empty() {
            return Err(SchemaParseError::new(raw, shape_problems));
        }

        let config: AgentConfig = serde_json::from_value(value)
            .map_err(|err| SchemaParseError::new(raw, vec![err.to_string()]))?;

        let invariant_problems = config.violations();
        if !invariant_problems.is_empty() {
            return Err(SchemaParseError::new(raw, invariant_problems));
        }

        Ok(config)
    }
}

/// Strip a wrapping markdown code fence, if present.
///
/// Models wrap JSON in ``` blocks even when instructed not to.
fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    if !(trimmed.starts_with("```") && trimmed.ends_with("```") && trimmed.len() > 6) {
        return trimmed;
    }
    let start = trimmed.find('\n').map_or(3, |pos| pos + 1);
    let end = trimmed.rfind("\n```").unwrap_or(trimmed.len() - 3);
    if start >= end {
        return trimmed;
    }
    trimmed[start..end].trim()
}

/// Find balanced top-level `{...}` regions and decode the last one that
/// parses as a JSON object.
///
/// The scanner is string-aware: braces inside string literals (and their
/// escapes) do not affect nesting depth. Taking the last parseable object
/// means prepended prose containing example JSON never shadows the actual
/// payload.
fn extract_last_json_object(text: &str) -> Option<Value> {
    let mut candidates = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (index, ch) in text.char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }
        match ch {
            '"' if depth > 0 => in_string = true,
            '{' => {
                if depth == 0 {
                    start = index;
                }
                depth += 1;
            }
            '}' => {
                if depth > 0 {
                    depth -= 1;
                    if depth == 0 {
                        candidates.push(&text[start..=index]);
                    }
                }
            }
            _ => {}
        }
    }

    candidates
        .into_iter()
        .rev()
        .find_map(|candidate| match serde_json::from_str::<Value>(candidate) {
            Ok(value @ Value::Object(_)) => Some(value),
            _ => None,
        })
}

/// Structural checks: every required field present and of the right JSON
/// type. Non-emptiness rules live on the domain model itself.
fn check_shape(value: &Value) -> Vec<String> {
    let mut problems = Vec::new();
    let Some(object) = value.as_object() else {
        return vec!["model output is not a JSON object".to_string()];
    };

    check_string(object, "role_name", &mut problems);
    check_string_array(object, "responsibilities", &mut problems);
    check_string_array(object, "principles", &mut problems);
    check_string_array(object, "constraints", &mut problems);

    match object.get("tools") {
        None => problems.push("missing required field `tools`".to_string()),
        Some(Value::Array(tools)) => {
            for (index, tool) in tools.iter().enumerate() {
                check_tool_shape(tool, index, &mut problems);
            }
        }
        Some(_) => problems.push("`tools` must be an array of tool objects".to_string()),
    }

    problems
}

fn check_tool_shape(value: &Value, index: usize, problems: &mut Vec<String>) {
    let Some(tool) = value.as_object() else {
        problems.push(format!("`tools[{index}]` must be an object"));
        return;
    };

    for key in ["name", "description", "usage_format"] {
        match tool.get(key) {
            None => problems.push(format!("missing required field `tools[{index}].{key}`")),
            Some(Value::String(_)) => {}
            Some(_) => problems.push(format!("`tools[{index}].{key}` must be a string")),
        }
    }

    match tool.get("parameters") {
        None => problems.push(format!("missing required field `tools[{index}].parameters`")),
        Some(Value::Array(parameters)) => {
            for (param_index, parameter) in parameters.iter().enumerate() {
                let well_formed = parameter.as_object().is_some_and(|p| {
                    p.get("name").is_some_and(Value::is_string)
                        && p.get("type").is_some_and(Value::is_string)
                });
                if !well_formed {
                    problems.push(format!(
                        "`tools[{index}].parameters[{param_index}]` must be an object with string `name` and `type`"
                    ));
                }
            }
        }
        Some(_) => problems.push(format!("`tools[{index}].parameters` must be an array")),
    }
}

fn check_string(object: &serde_json::Map<String, Value>, key: &str, problems: &mut Vec<String>) {
    match object.get(key) {
        None => problems.push(format!("missing required field `{key}`")),
        Some(Value::String(_)) => {}
        Some(_) => problems.push(format!("`{key}` must be a string")),
    }
}

fn check_string_array(
    object: &serde_json::Map<String, Value>,
    key: &str,
    problems: &mut Vec<String>,
) {
    match object.get(key) {
        None => problems.push(format!("missing required field `{key}`")),
        Some(Value::Array(items)) => {
            if !items.iter().all(Value::is_string) {
                problems.push(format!("`{key}` must be an array of strings"));
            }
        }
        Some(_) => problems.push(format!("`{key}` must be an array of strings")),
    }
}
