use crate::data::{CommentRef, InvocationContext, Report};
use crate::error::Result;
use crate::services::{format_report, HostingApi};

/// What to do with the bot comment after a run.
#[derive(Debug, Clone, PartialEq)]
pub enum CommentAction {
    Create(String),
    Edit(CommentRef, String),
    Delete(CommentRef),
    Nothing,
}

/// Decide the comment action from the prior comment and the report.
pub fn plan_comment(existing: Option<CommentRef>, report: &Report) -> CommentAction {
    match (existing, report.has_problems()) {
        (None, true) => CommentAction::Create(format_report(&report.commits)),
        (Some(comment), true) => CommentAction::Edit(comment, format_report(&report.commits)),
        (Some(comment), false) => CommentAction::Delete(comment),
        (None, false) => CommentAction::Nothing,
    }
}

pub async fn apply_comment(
    host: &dyn HostingApi,
    ctx: &InvocationContext,
    action: CommentAction,
) -> Result<()> {
    match action {
        CommentAction::Create(body) => {
            tracing::info!("{}: creating report comment", ctx.slug());
            host.create_comment(ctx, &body).await
        }
        CommentAction::Edit(comment, body) => {
            tracing::info!("{}: updating report comment {}", ctx.slug(), comment.id);
            host.edit_comment(ctx, comment, &body).await
        }
        CommentAction::Delete(comment) => {
            tracing::info!("{}: deleting report comment {}", ctx.slug(), comment.id);
            host.delete_comment(ctx, comment).await
        }
        CommentAction::Nothing => Ok(()),
    }
}
