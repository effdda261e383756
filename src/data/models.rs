/// Status check context shown on the head commit.
pub const STATUS_CONTEXT: &str = "commitlint";

/// One pull request under check. Immutable for the duration of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct InvocationContext {
    pub owner: String,
    pub repo: String,
    pub number: u64,
    pub head_sha: String,
}

impl InvocationContext {
    pub fn slug(&self) -> String {
        format!("{}/{}#{}", self.owner, self.repo, self.number)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CommitRecord {
    pub sha: String,
    pub message: String,
}

/// One page of PR commits plus the cursor of the following page, if any.
#[derive(Debug, Clone, Default)]
pub struct CommitPage {
    pub commits: Vec<CommitRecord>,
    pub next_cursor: Option<String>,
}

/// A previously posted bot comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommentRef {
    pub id: u64,
}

// Commit status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusState {
    Pending,
    Success,
    Failure,
}

impl StatusState {
    pub fn to_str(self) -> &'static str {
        match self {
            StatusState::Pending => "pending",
            StatusState::Success => "success",
            StatusState::Failure => "failure",
        }
    }
}

impl From<StatusState> for octocrab::models::StatusState {
    fn from(state: StatusState) -> Self {
        match state {
            StatusState::Pending => octocrab::models::StatusState::Pending,
            StatusState::Success => octocrab::models::StatusState::Success,
            StatusState::Failure => octocrab::models::StatusState::Failure,
        }
    }
}
