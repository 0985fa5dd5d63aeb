//! revu CLI - publish AI code-review reports to object storage.
//!
//! Provides the `publish` command: render a Markdown review body into an
//! HTML report and upload it to a `gs://` or `s3://` destination.

mod commands;
mod config;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::PublishArgs;
use error::error_chain;
use output::Output;

/// revu - Publish AI code-review reports to object storage.
#[derive(Parser)]
#[command(name = "revu", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a review report and upload it to a gs:// or s3:// destination.
    Publish(PublishArgs),
}

fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let output = Output::new();

    let result = match cli.command {
        Commands::Publish(args) => {
            let rt = tokio::runtime::Runtime::new().expect("Failed to create tokio runtime");
            rt.block_on(args.execute(&output))
        }
    };

    if let Err(err) = result {
        output.error(&format!("Error: {}", error_chain(&err)));
        std::process::exit(1);
    }
}
