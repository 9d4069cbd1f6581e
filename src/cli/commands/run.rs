//! Run command - execute pipelines in a container

use crate::cli::args::RunArgs;
use crate::client::{ClientOptions, ExecClient, RepositoryContext};
use crate::config::Config;
use crate::error::{ExecboxError, ExecboxResult};
use crate::ui::{self, TaskSpinner, UiContext};
use tracing::debug;

/// Execute the run command
pub async fn execute(args: RunArgs, config: &Config) -> ExecboxResult<()> {
    let ctx = UiContext::detect().with_quiet(args.json);
    let commands = parse_pipelines(&args.commands)?;

    let mut options = ClientOptions::from_config(config)?;
    if let Some(container) = args.container {
        options.container = container;
    }
    options.include_files.extend(args.include);
    if args.no_cache {
        options.cache = false;
    }
    let client = ExecClient::new(options)?;
    debug!("Using endpoint {}", client.endpoint());

    let mut context = RepositoryContext::new(args.repo, args.commit);
    if let Some(path) = args.path {
        context = context.with_path(path);
    }

    let mut spinner = TaskSpinner::new(&ctx);
    spinner.start(&format!(
        "Running {} command(s) in {}@{}",
        commands.len(),
        context.repository,
        context.commit
    ));

    let result = match client.execute(commands.clone(), context).await {
        Ok(result) => {
            spinner.stop(&format!("Received {} outcome(s)", result.commands.len()));
            result
        }
        Err(e) => {
            spinner.stop_error("Execution request failed");
            return Err(e.into());
        }
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    for (argv, outcome) in commands.iter().zip(&result.commands) {
        ui::command_outcome(&ctx, argv, outcome);
    }

    if !result.files.is_empty() {
        ui::section(&ctx, "Captured files");
        for (path, contents) in &result.files {
            ui::key_value(&ctx, path, &format!("{} bytes", contents.len()));
        }
    }

    let failed = result.failed().count();
    if failed > 0 {
        return Err(ExecboxError::User(format!(
            "{} of {} command(s) failed",
            failed,
            result.commands.len()
        )));
    }

    Ok(())
}

/// Split shell-quoted pipelines into argv tokens
fn parse_pipelines(raw: &[String]) -> ExecboxResult<Vec<Vec<String>>> {
    raw.iter()
        .map(|line| {
            let argv = shlex::split(line)
                .ok_or_else(|| ExecboxError::InvalidCommand(format!("unbalanced quotes in '{}'", line)))?;
            if argv.is_empty() {
                return Err(ExecboxError::InvalidCommand("empty command".to_string()));
            }
            Ok(argv)
        })
        .collect()
}
