//! Domain models.

pub mod agent_config;
pub mod config;
pub mod generated_prompt;
pub mod schema;
pub mod template;

pub use agent_config::{AgentConfig, Tool, ToolParameter};
pub use config::{Config, LoggingConfig, RateLimitConfig, RetryConfig};
pub use generated_prompt::GeneratedPrompt;
pub use schema::{AgentConfigSchema, SchemaParseError};
pub use template::{MissingVariablesError, PromptTemplate};
