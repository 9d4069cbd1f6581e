//! Resolve command - print a repository's archive URL

use crate::cli::args::ResolveArgs;
use crate::client::{ClientOptions, ExecClient, RepositoryContext};
use crate::config::Config;
use crate::error::ExecboxResult;
use console::style;

/// Execute the resolve command
pub async fn execute(args: ResolveArgs, config: &Config) -> ExecboxResult<()> {
    let client = ExecClient::new(ClientOptions::from_config(config)?)?;
    let context = RepositoryContext::new(args.repo, args.commit);

    let archive = client.archive_url(&context)?;
    println!("{}", archive.url);

    if !archive.public {
        eprintln!(
            "{} {} is served by {} and needs an access token",
            style("Warning:").yellow(),
            context.repository,
            config.server.origin
        );
    }

    Ok(())
}
