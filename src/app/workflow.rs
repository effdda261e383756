use std::sync::Arc;

use crate::app::{apply_comment, final_state, lint_page, plan_comment, status_description};
use crate::data::{InvocationContext, Report, StatusState};
use crate::error::Result;
use crate::services::{HostingApi, Linter, RuleSource};

pub const PENDING_DESCRIPTION: &str = "Waiting for the status to be reported";

/// Lints every commit of a pull request and reports the result on it.
#[derive(Clone)]
pub struct CommitlintBot {
    host: Arc<dyn HostingApi>,
    linter: Arc<dyn Linter>,
    rules: RuleSource,
}

impl CommitlintBot {
    pub fn new(host: Arc<dyn HostingApi>, linter: Arc<dyn Linter>, rules: RuleSource) -> Self {
        Self {
            host,
            linter,
            rules,
        }
    }

    /// One run: pending status, lint all pages, final status, reconcile comment.
    ///
    /// Any hosting or rule-load failure aborts the remaining steps. A failure
    /// after the pending status leaves that status in place.
    pub async fn run(&self, ctx: &InvocationContext) -> Result<Report> {
        let host = self.host.as_ref();
        tracing::info!("{}: linting commits at {}", ctx.slug(), ctx.head_sha);

        host.create_status(ctx, StatusState::Pending, PENDING_DESCRIPTION)
            .await?;

        let rules = self.rules.load().await?;

        let mut report = Report::default();
        let mut cursor: Option<String> = None;
        let mut pages = 0usize;
        loop {
            let page = host.fetch_commit_page(ctx, cursor.as_deref()).await?;
            pages += 1;
            tracing::debug!("{}: page {} has {} commits", ctx.slug(), pages, page.commits.len());

            report = lint_page(report, &page.commits, &rules, self.linter.as_ref());

            match page.next_cursor {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }

        let state = final_state(&report);
        let description = status_description(&report);
        host.create_status(ctx, state, &description).await?;

        let existing = host.find_existing_report(ctx).await?;
        apply_comment(host, ctx, plan_comment(existing, &report)).await?;

        tracing::info!(
            "{}: {} ({}, {} pages)",
            ctx.slug(),
            state.to_str(),
            description,
            pages
        );
        Ok(report)
    }
}
