use async_trait::async_trait;

use crate::data::{CommentRef, CommitPage, InvocationContext, StatusState};
use crate::error::Result;

/// Calls the bot makes against the code-hosting platform.
///
/// Every method is a single awaited request (or, for the comment search, a
/// single logical lookup). Implementations do not retry.
#[async_trait]
pub trait HostingApi: Send + Sync {
    /// Create or overwrite the `commitlint` status on the head commit.
    async fn create_status(
        &self,
        ctx: &InvocationContext,
        state: StatusState,
        description: &str,
    ) -> Result<()>;

    /// Fetch one page of PR commits. `cursor` is `None` for the first page.
    async fn fetch_commit_page(
        &self,
        ctx: &InvocationContext,
        cursor: Option<&str>,
    ) -> Result<CommitPage>;

    /// Find the comment previously posted by the bot identity, if any.
    async fn find_existing_report(&self, ctx: &InvocationContext) -> Result<Option<CommentRef>>;

    async fn create_comment(&self, ctx: &InvocationContext, body: &str) -> Result<()>;

    async fn edit_comment(
        &self,
        ctx: &InvocationContext,
        comment: CommentRef,
        body: &str,
    ) -> Result<()>;

    async fn delete_comment(&self, ctx: &InvocationContext, comment: CommentRef) -> Result<()>;
}
