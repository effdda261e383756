pub mod models;
pub mod types;

pub use models::{
    CommentRef, CommitPage, CommitRecord, InvocationContext, StatusState, STATUS_CONTEXT,
};
pub use types::{
    CommitReport, Condition, Level, LintOutcome, PageInfo, PrCommitConnection, PrCommitData,
    PrCommitNode, PrCommitsGraphQLData, PrCommitsGraphQLResponse, Problem, PullRequestEvent,
    PullRequestNode, Report, RepositoryNode, RuleConfig, RuleSet,
};
