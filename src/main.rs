use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commitlint_bot::server::{self, AppState};
use commitlint_bot::utils::{get_current_repo, parse_repo_arg};
use commitlint_bot::{ServerSettings, Settings};

/// Lints pull request commit messages and reports a status check
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    settings: Settings,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Receive pull_request webhooks and lint each delivery
    Serve(ServerSettings),

    /// Lint an existing pull request once
    Check {
        /// Pull request number
        #[arg(long)]
        pr: u64,

        /// owner/repo or GitHub URL (defaults to the origin remote)
        #[arg(long)]
        repo: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("commitlint_bot=info,tower_http=info")),
        )
        .init();

    let cli = Cli::parse();
    let client = Arc::new(cli.settings.github_client().await?);
    tracing::info!("Commenting as {}", client.bot_login());
    let bot = cli.settings.build_bot(client.clone());

    match cli.command {
        Commands::Serve(server_settings) => {
            let state = AppState::new(bot, server_settings.webhook_secret);
            server::serve(server_settings.listen, state).await?;
        }
        Commands::Check { pr, repo } => {
            let (owner, name) = match repo {
                Some(arg) => parse_repo_arg(&arg)
                    .with_context(|| format!("Not a GitHub repository: {}", arg))?,
                None => get_current_repo().context("Not in a GitHub repository")?,
            };

            let ctx = client.fetch_invocation(&owner, &name, pr).await?;
            let report = bot.run(&ctx).await?;

            println!(
                "{}: found {} problems, {} warnings",
                ctx.slug(),
                report.errors_count,
                report.warns_count
            );
            if !report.valid {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
