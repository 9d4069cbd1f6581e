//! CLI argument definitions using clap derive

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

/// execbox - run commands in sandboxed execution containers
///
/// Sends argv-style command pipelines to a remote execution container
/// together with a repository archive URL, and prints each outcome.
#[derive(Parser, Debug)]
#[command(name = "execbox")]
#[command(
    author,
    version,
    about = "Run commands in sandboxed execution containers",
    long_about = None
)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true, env = "EXECBOX_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run command pipelines in an execution container
    Run(RunArgs),

    /// Print the archive URL the container would fetch
    Resolve(ResolveArgs),

    /// Show or initialize configuration
    Config(ConfigArgs),
}

/// Arguments for the run command
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Repository identifier (e.g. github.com/acme/widgets)
    #[arg(short, long)]
    pub repo: String,

    /// Commit to run against
    #[arg(long)]
    pub commit: String,

    /// Subdirectory to run in
    #[arg(short, long)]
    pub path: Option<String>,

    /// Command pipeline, shell-quoted; repeat for several pipelines
    #[arg(short = 'C', long = "command", required = true)]
    pub commands: Vec<String>,

    /// Execution container (defaults to container.name from config)
    #[arg(long)]
    pub container: Option<String>,

    /// File to capture after running (repeatable, adds to config)
    #[arg(short, long = "include")]
    pub include: Vec<String>,

    /// Send every request even if an identical one already ran
    #[arg(long)]
    pub no_cache: bool,

    /// Print the raw JSON result
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the resolve command
#[derive(Parser, Debug)]
pub struct ResolveArgs {
    /// Repository identifier
    #[arg(short, long)]
    pub repo: String,

    /// Commit to resolve
    #[arg(long)]
    pub commit: String,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Subcommand for config
    #[command(subcommand)]
    pub action: Option<ConfigAction>,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Initialize default configuration
    Init {
        /// Overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },
}
