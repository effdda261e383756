pub mod normalize;
pub mod reconcile;
pub mod report;
pub mod workflow;

pub use normalize::normalize_message;
pub use reconcile::{apply_comment, plan_comment, CommentAction};
pub use report::{final_state, fold_commit, lint_page, status_description};
pub use workflow::{CommitlintBot, PENDING_DESCRIPTION};
