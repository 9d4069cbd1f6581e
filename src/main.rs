//! execbox - Sandboxed Execution Client
//!
//! CLI entry point that dispatches to subcommands.

use clap::Parser;
use console::style;
use execbox::cli::{Cli, Commands};
use execbox::config::ConfigManager;
use execbox::error::ExecboxResult;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> ExecboxResult<()> {
    let cli = Cli::parse();

    // Initialize logging: 0 = warn, 1 = info, 2+ = debug
    let filter = match cli.verbose {
        0 => EnvFilter::new("execbox=warn"),
        1 => EnvFilter::new("execbox=info"),
        _ => EnvFilter::new("execbox=debug"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .without_time()
        .init();

    let config_manager = ConfigManager::locate(cli.config.clone());
    let config = config_manager.load().await?;

    match cli.command {
        Commands::Run(args) => execbox::cli::commands::run(args, &config).await,
        Commands::Resolve(args) => execbox::cli::commands::resolve(args, &config).await,
        Commands::Config(args) => {
            execbox::cli::commands::config(args, &config_manager, &config).await
        }
    }
}
