//! `promptforge generate` command.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Args;

use crate::application::{PipelineConfig, PromptPipeline};
use crate::cli::display;
use crate::infrastructure::anthropic::{AnthropicClient, AnthropicClientConfig};
use crate::infrastructure::config::ConfigLoader;
use crate::infrastructure::retry::RetryPolicy;

/// Arguments for the generate command
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Free-text description of the desired agent (positional argument)
    pub input: Option<String>,

    /// Read the description from a file instead
    #[arg(short = 'f', long, conflicts_with = "input")]
    pub input_file: Option<PathBuf>,

    /// Override the configured sampling temperature (0.0-1.0)
    #[arg(short, long)]
    pub temperature: Option<f32>,

    /// Retry transient model failures up to N times (0 = no retry)
    #[arg(long, default_value_t = 0)]
    pub retries: u32,
}

/// Run the generation pipeline and display its three artifacts.
pub async fn execute(args: GenerateArgs, json: bool) -> Result<()> {
    let mut config = ConfigLoader::load()?;
    if let Some(temperature) = args.temperature {
        config.temperature = temperature;
        ConfigLoader::validate(&config)?;
    }

    let user_input = resolve_input(&args)?;

    let client = Arc::new(AnthropicClient::new(AnthropicClientConfig::from(&config))?);
    let pipeline = PromptPipeline::new(client, &PipelineConfig {
        temperature: config.temperature,
        max_tokens: config.max_tokens,
    });

    let spinner = (!json).then(|| display::create_spinner("Generating agent prompt"));

    let result = if args.retries > 0 {
        let policy = RetryPolicy::from_config(&config.retry, args.retries);
        policy.execute(|| pipeline.generate_prompt(&user_input)).await
    } else {
        pipeline.generate_prompt(&user_input).await
    };

    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    let generated = result?;

    if json {
        println!("{}", serde_json::to_string_pretty(&generated)?);
    } else {
        display::render_generated_prompt(&generated);
    }

    Ok(())
}

fn resolve_input(args: &GenerateArgs) -> Result<String> {
    if let Some(path) = &args.input_file {
        return std::fs::read_to_string(path)
            .with_context(|| format!("failed to read input file {}", path.display()));
    }
    match &args.input {
        Some(input) if !input.trim().is_empty() => Ok(input.clone()),
        _ => bail!("provide an agent description as an argument or via --input-file"),
    }
}
