use async_trait::async_trait;
use octocrab::models::issues::Comment;
use octocrab::models::CommentId;
use octocrab::Octocrab;
use std::process::Command;

use crate::data::{
    CommentRef, CommitPage, CommitRecord, InvocationContext, PrCommitsGraphQLResponse,
    StatusState, STATUS_CONTEXT,
};
use crate::error::{Error, Result};
use crate::services::HostingApi;

const COMMITS_PER_PAGE: i64 = 100;
const COMMENTS_PER_PAGE: u8 = 100;

/// Resolve a token from the explicit value, then `gh auth token`.
pub fn get_github_token(explicit: Option<&str>) -> Result<String> {
    if let Some(token) = explicit.map(str::trim).filter(|t| !t.is_empty()) {
        return Ok(token.to_string());
    }

    let output = Command::new("gh")
        .args(["auth", "token"])
        .output()
        .map_err(|e| Error::Token(format!("failed to run gh: {}", e)))?;

    if !output.status.success() {
        return Err(Error::Token(
            "set GITHUB_TOKEN or run 'gh auth login' first".to_string(),
        ));
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Octocrab-backed hosting client acting as the bot identity.
pub struct GitHubClient {
    octocrab: Octocrab,
    bot_login: String,
}

impl GitHubClient {
    /// Build a client for `token`. Without an explicit login the bot acts as
    /// the token's owner, so its comments are found under that login.
    pub async fn connect(token: String, bot_login: Option<String>) -> Result<Self> {
        let octocrab = Octocrab::builder().personal_token(token).build()?;

        let bot_login = match bot_login
            .map(|login| login.trim().to_string())
            .filter(|login| !login.is_empty())
        {
            Some(login) => login,
            None => octocrab.current().user().await?.login,
        };

        Ok(Self {
            octocrab,
            bot_login,
        })
    }

    pub fn bot_login(&self) -> &str {
        &self.bot_login
    }

    /// Build an invocation context for an existing PR by looking up its head.
    pub async fn fetch_invocation(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> Result<InvocationContext> {
        let pr = self.octocrab.pulls(owner, repo).get(number).await?;

        Ok(InvocationContext {
            owner: owner.to_string(),
            repo: repo.to_string(),
            number,
            head_sha: pr.head.sha.clone(),
        })
    }
}

#[async_trait]
impl HostingApi for GitHubClient {
    async fn create_status(
        &self,
        ctx: &InvocationContext,
        state: StatusState,
        description: &str,
    ) -> Result<()> {
        self.octocrab
            .repos(&ctx.owner, &ctx.repo)
            .create_status(ctx.head_sha.clone(), state.into())
            .context(STATUS_CONTEXT.to_string())
            .description(description.to_string())
            .send()
            .await?;

        tracing::debug!("{}: status {} ({})", ctx.slug(), state.to_str(), description);
        Ok(())
    }

    async fn fetch_commit_page(
        &self,
        ctx: &InvocationContext,
        cursor: Option<&str>,
    ) -> Result<CommitPage> {
        let query = r#"
            query($owner: String!, $repo: String!, $number: Int!, $first: Int!, $after: String) {
                repository(owner: $owner, name: $repo) {
                    pullRequest(number: $number) {
                        commits(first: $first, after: $after) {
                            nodes {
                                commit {
                                    oid
                                    message
                                }
                            }
                            pageInfo {
                                hasNextPage
                                endCursor
                            }
                        }
                    }
                }
            }
        "#;

        let response: PrCommitsGraphQLResponse = self
            .octocrab
            .graphql(&serde_json::json!({
                "query": query,
                "variables": {
                    "owner": ctx.owner,
                    "repo": ctx.repo,
                    "number": ctx.number as i64,
                    "first": COMMITS_PER_PAGE,
                    "after": cursor
                }
            }))
            .await?;

        let connection = response
            .data
            .repository
            .and_then(|r| r.pull_request)
            .map(|pr| pr.commits)
            .ok_or_else(|| Error::PullRequestNotFound(ctx.slug()))?;

        let commits = connection
            .nodes
            .into_iter()
            .map(|node| CommitRecord {
                sha: node.commit.oid,
                message: node.commit.message,
            })
            .collect();

        // A page claiming more without a cursor ends the walk.
        let next_cursor = if connection.page_info.has_next_page {
            connection.page_info.end_cursor
        } else {
            None
        };

        Ok(CommitPage {
            commits,
            next_cursor,
        })
    }

    async fn find_existing_report(&self, ctx: &InvocationContext) -> Result<Option<CommentRef>> {
        let mut page = self
            .octocrab
            .issues(&ctx.owner, &ctx.repo)
            .list_comments(ctx.number)
            .per_page(COMMENTS_PER_PAGE)
            .send()
            .await?;

        loop {
            if let Some(comment) = page
                .items
                .iter()
                .find(|c| c.user.login == self.bot_login)
            {
                return Ok(Some(CommentRef {
                    id: comment.id.into_inner(),
                }));
            }

            match self.octocrab.get_page::<Comment>(&page.next).await? {
                Some(next) => page = next,
                None => return Ok(None),
            }
        }
    }

    async fn create_comment(&self, ctx: &InvocationContext, body: &str) -> Result<()> {
        self.octocrab
            .issues(&ctx.owner, &ctx.repo)
            .create_comment(ctx.number, body)
            .await?;
        Ok(())
    }

    async fn edit_comment(
        &self,
        ctx: &InvocationContext,
        comment: CommentRef,
        body: &str,
    ) -> Result<()> {
        self.octocrab
            .issues(&ctx.owner, &ctx.repo)
            .update_comment(CommentId(comment.id), body)
            .await?;
        Ok(())
    }

    async fn delete_comment(&self, ctx: &InvocationContext, comment: CommentRef) -> Result<()> {
        self.octocrab
            .issues(&ctx.owner, &ctx.repo)
            .delete_comment(CommentId(comment.id))
            .await?;
        Ok(())
    }
}
