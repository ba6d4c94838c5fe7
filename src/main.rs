//! Promptforge CLI entry point.

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use promptforge::cli::{Cli, Commands};
use promptforge::infrastructure::config::ConfigLoader;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing();

    let result = match cli.command {
        Commands::Generate(args) => {
            promptforge::cli::commands::generate::execute(args, cli.json).await
        }
    };

    if let Err(err) = result {
        promptforge::cli::handle_error(err, cli.json);
    }
}

/// Initialize logging to stderr. The configured log level and format are
/// the defaults; `RUST_LOG` overrides the level.
fn init_tracing() {
    // A config error here is reported later by the command itself.
    let logging = ConfigLoader::load()
        .map(|config| config.logging)
        .unwrap_or_default();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(logging.level.clone()));

    let fmt_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);
    let fmt_layer = if logging.format == "json" {
        fmt_layer.json().boxed()
    } else {
        fmt_layer.boxed()
    };

    tracing_subscriber::registry().with(filter).with(fmt_layer).init();
}
