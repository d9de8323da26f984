mod emitter;
mod scrape;
mod session;

#[cfg(test)]
mod test_support;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "fandom-cli")]
#[command(about = "Instagram profile scraper for fandom velocity tracking")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Scrape every username in the job input (the default)
    Run {
        /// Read the job input from this file instead of local storage
        #[arg(long)]
        input: Option<PathBuf>,

        /// Resolve the job input and print the plan without contacting Instagram
        #[arg(long)]
        dry_run: bool,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let config = fandom_core::load_runtime_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();
    let (input, dry_run) = match cli.command {
        Some(Commands::Run { input, dry_run }) => (input, dry_run),
        None => (None, false),
    };

    let input_path = input.unwrap_or_else(|| config.input_path());
    scrape::run_job(&config, &input_path, dry_run).await?;

    Ok(())
}
