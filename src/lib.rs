//! Promptforge - Agent Prompt Generation Pipeline
//!
//! Promptforge turns a free-text description of a desired AI agent into
//! three artifacts: a structured agent configuration, a Jinja2 prompt
//! template embedding that configuration, and a model-written critique of
//! the generated template.
//!
//! # Architecture
//!
//! This crate follows Clean Architecture / Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): Pure domain models and port traits
//! - **Application Layer** (`application`): The chain stages and pipeline orchestrator
//! - **Infrastructure Layer** (`infrastructure`): Anthropic API adapter, config, retry
//! - **CLI Layer** (`cli`): Command-line interface
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use promptforge::application::{PipelineConfig, PromptPipeline};
//! use promptforge::infrastructure::anthropic::{AnthropicClient, AnthropicClientConfig};
//! use promptforge::infrastructure::config::ConfigLoader;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ConfigLoader::load()?;
//!     let client = Arc::new(AnthropicClient::new(AnthropicClientConfig::from(&config))?);
//!     let pipeline = PromptPipeline::new(client, &PipelineConfig::default());
//!
//!     let result = pipeline.generate_prompt("I need a task management agent").await?;
//!     println!("{}", result.template_source);
//!     Ok(())
//! }
//! ```

pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;

// Re-export commonly used types for convenience
pub use application::{PipelineConfig, PipelineError, PromptPipeline};
pub use domain::models::{
    AgentConfig, AgentConfigSchema, Config, GeneratedPrompt, SchemaParseError, Tool,
    ToolParameter,
};
pub use domain::ports::{CompletionRequest, ModelClient, ModelError};
pub use infrastructure::anthropic::{AnthropicClient, AnthropicClientConfig};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use infrastructure::retry::RetryPolicy;
