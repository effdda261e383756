use clap::Args;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use crate::app::CommitlintBot;
use crate::error::Result;
use crate::services::{
    get_default_rules_path, get_github_token, ConventionalLinter, GitHubClient, RuleSource,
};

/// Settings shared by every subcommand.
#[derive(Debug, Clone, Args)]
pub struct Settings {
    /// GitHub token (falls back to `gh auth token`)
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true, global = true)]
    pub token: Option<String>,

    /// Login the bot posts comments as (defaults to the token's owner)
    #[arg(long, env = "BOT_LOGIN", global = true)]
    pub bot_login: Option<String>,

    /// commitlint JSON rule file (missing file means the conventional preset)
    #[arg(long, env = "COMMITLINT_RULES", global = true)]
    pub rules: Option<PathBuf>,
}

/// Settings for the webhook server.
#[derive(Debug, Clone, Args)]
pub struct ServerSettings {
    /// Address to listen on
    #[arg(long, env = "LISTEN_ADDR", default_value = "0.0.0.0:3000")]
    pub listen: SocketAddr,

    /// Shared secret used to verify webhook signatures
    #[arg(long, env = "WEBHOOK_SECRET", hide_env_values = true)]
    pub webhook_secret: Option<String>,
}

impl Settings {
    pub fn rule_source(&self) -> RuleSource {
        if let Some(path) = &self.rules {
            return RuleSource::file(path);
        }
        match get_default_rules_path() {
            Some(path) => RuleSource::default_file(path),
            None => RuleSource::preset(),
        }
    }

    pub async fn github_client(&self) -> Result<GitHubClient> {
        let token = get_github_token(self.token.as_deref())?;
        GitHubClient::connect(token, self.bot_login.clone()).await
    }

    pub fn build_bot(&self, client: Arc<GitHubClient>) -> CommitlintBot {
        CommitlintBot::new(client, Arc::new(ConventionalLinter::new()), self.rule_source())
    }
}
