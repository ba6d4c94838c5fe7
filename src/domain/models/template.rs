//! Prompt templates with named placeholders.

use std::collections::HashMap;

use thiserror::Error;

/// Raised when a template is rendered without every required placeholder.
///
/// Names every absent placeholder; a missing value is never silently
/// substituted with an empty string.
#[derive(Debug, Error)]
#[error("missing required template variables: {}", .names.join(", "))]
pub struct MissingVariablesError {
    /// Placeholder names that had no supplied value, in declaration order.
    pub names: Vec<String>,
}

/// A prompt template with `{name}` placeholders and a declared set of
/// required placeholder names.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    template: String,
    required: Vec<String>,
}

impl PromptTemplate {
    /// Create a template. `required` lists the placeholders that must be
    /// supplied at render time.
    pub fn new(template: impl Into<String>, required: &[&str]) -> Self {
        Self {
            template: template.into(),
            required: required.iter().map(ToString::to_string).collect(),
        }
    }

    /// Substitute a placeholder up front, returning a template that no
    /// longer requires it.
    ///
    /// Used for values fixed at construction time, e.g. format
    /// instructions.
    pub fn partial(mut self, name: &str, value: &str) -> Self {
        self.template = self.template.replace(&placeholder(name), value);
        self.required.retain(|required| required != name);
        self
    }

    /// Render the template against the supplied variables.
    pub fn render(
        &self,
        variables: &HashMap<String, String>,
    ) -> Result<String, MissingVariablesError> {
        let missing: Vec<String> = self
            .required
            .iter()
            .filter(|name| !variables.contains_key(*name))
            .cloned()
            .collect();
        if !missing.is_empty() {
            return Err(MissingVariablesError { names: missing });
        }

        let mut rendered = self.template.clone();
        for (name, value) in variables {
            rendered = rendered.replace(&placeholder(name), value);
        }
        Ok(rendered)
    }

    /// The raw template text.
    pub fn text(&self) -> &str {
        &self.template
    }
}

fn placeholder(name: &str) -> String {
    format!("{{{name}}}")
}
