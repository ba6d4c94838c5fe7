//! Command-line interface.

pub mod commands;
pub mod display;

use clap::{Parser, Subcommand};

use crate::cli::commands::generate::GenerateArgs;

/// Promptforge command-line interface
#[derive(Parser)]
#[command(name = "promptforge")]
#[command(about = "Generate agent prompt templates from free-text descriptions", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,
}

/// Top-level commands
#[derive(Subcommand)]
pub enum Commands {
    /// Generate an agent config, prompt template, and critique from a
    /// free-text description
    Generate(GenerateArgs),
}

/// Present an error to the user without panicking, then exit non-zero.
pub fn handle_error(err: anyhow::Error, json: bool) -> ! {
    if json {
        let payload = serde_json::json!({ "error": format!("{err:#}") });
        eprintln!("{payload}");
    } else {
        eprintln!("{} {err:#}", console::style("error:").red().bold());
    }
    std::process::exit(1);
}
