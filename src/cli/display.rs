//! Terminal rendering for pipeline results.

use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use crate::domain::models::GeneratedPrompt;

const SPINNER_TEMPLATE: &str = "[{elapsed_precise}] {spinner:.green} {msg}";
const SPINNER_CHARS: &str = "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏";

/// Create a spinner for an indeterminate operation.
pub fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template(SPINNER_TEMPLATE)
            .expect("invalid spinner template")
            .tick_chars(SPINNER_CHARS),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Pretty-print the three artifacts of a pipeline run.
pub fn render_generated_prompt(generated: &GeneratedPrompt) {
    let config = &generated.config;

    println!();
    println!("{}", style("Agent Configuration").cyan().bold());
    println!("{}", style("═".repeat(60)).dim());
    println!("Role: {}", style(&config.role_name).bold());

    println!("\n{}", style("Responsibilities").underlined());
    for responsibility in &config.responsibilities {
        println!("  - {responsibility}");
    }

    if !config.principles.is_empty() {
        println!("\n{}", style("Principles").underlined());
        for principle in &config.principles {
            println!("  - {principle}");
        }
    }

    println!("\n{}", style("Tools").underlined());
    println!("{}", tool_table(config));

    println!("\n{}", style("Constraints").underlined());
    for constraint in &config.constraints {
        println!("  - {constraint}");
    }

    println!();
    println!("{}", style("Prompt Template").cyan().bold());
    println!("{}", style("═".repeat(60)).dim());
    println!("{}", generated.template_source);

    println!();
    println!("{}", style("Critique").cyan().bold());
    println!("{}", style("═".repeat(60)).dim());
    println!("{}", generated.critique);

    println!();
    println!(
        "{}",
        style(format!(
            "run {} completed at {}",
            generated.id,
            generated.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        ))
        .dim()
    );
}

fn tool_table(config: &crate::domain::models::AgentConfig) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Name", "Description", "Parameters"]);

    for tool in &config.tools {
        let parameters = if tool.parameters.is_empty() {
            "-".to_string()
        } else {
            tool.parameters
                .iter()
                .map(|p| format!("{}: {}", p.name, p.param_type))
                .collect::<Vec<_>>()
                .join(", ")
        };
        table.add_row(vec![&tool.name, &tool.description, &parameters]);
    }

    table
}
