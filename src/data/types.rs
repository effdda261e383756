use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::data::InvocationContext;
use crate::error::{Error, Result};

// Webhook payload types

/// The subset of a `pull_request` webhook delivery the bot consumes.
#[derive(Debug, Deserialize)]
pub struct PullRequestEvent {
    pub action: String,
    pub number: u64,
    pub pull_request: PullRequestPayload,
    pub repository: RepositoryPayload,
}

#[derive(Debug, Deserialize)]
pub struct PullRequestPayload {
    pub head: HeadPayload,
}

#[derive(Debug, Deserialize)]
pub struct HeadPayload {
    pub sha: String,
}

#[derive(Debug, Deserialize)]
pub struct RepositoryPayload {
    pub name: String,
    pub owner: OwnerPayload,
}

#[derive(Debug, Deserialize)]
pub struct OwnerPayload {
    pub login: String,
}

impl PullRequestEvent {
    /// Validate the payload once at the boundary.
    pub fn into_context(self) -> Result<InvocationContext> {
        let owner = self.repository.owner.login.trim().to_string();
        let repo = self.repository.name.trim().to_string();
        let head_sha = self.pull_request.head.sha.trim().to_string();

        if owner.is_empty() || repo.is_empty() {
            return Err(Error::Payload("missing repository owner or name".into()));
        }
        if head_sha.is_empty() {
            return Err(Error::Payload("missing pull request head sha".into()));
        }
        if self.number == 0 {
            return Err(Error::Payload("pull request number must be positive".into()));
        }

        Ok(InvocationContext {
            owner,
            repo,
            number: self.number,
            head_sha,
        })
    }

    /// Actions that change the commit list or (re)open the PR.
    pub fn triggers_lint(&self) -> bool {
        matches!(
            self.action.as_str(),
            "opened" | "synchronize" | "reopened" | "edited"
        )
    }
}

// GraphQL response types

#[derive(Debug, Deserialize)]
pub struct PrCommitsGraphQLResponse {
    pub data: PrCommitsGraphQLData,
}

#[derive(Debug, Deserialize)]
pub struct PrCommitsGraphQLData {
    pub repository: Option<RepositoryNode>,
}

#[derive(Debug, Deserialize)]
pub struct RepositoryNode {
    #[serde(rename = "pullRequest")]
    pub pull_request: Option<PullRequestNode>,
}

#[derive(Debug, Deserialize)]
pub struct PullRequestNode {
    pub commits: PrCommitConnection,
}

#[derive(Debug, Deserialize)]
pub struct PrCommitConnection {
    pub nodes: Vec<PrCommitNode>,
    #[serde(rename = "pageInfo")]
    pub page_info: PageInfo,
}

#[derive(Debug, Deserialize)]
pub struct PrCommitNode {
    pub commit: PrCommitData,
}

#[derive(Debug, Deserialize)]
pub struct PrCommitData {
    pub oid: String,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct PageInfo {
    #[serde(rename = "hasNextPage")]
    pub has_next_page: bool,
    #[serde(rename = "endCursor")]
    pub end_cursor: Option<String>,
}

// Rule set types

/// Severity of a rule: 0 disables it, 1 reports warnings, 2 reports errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Off,
    Warning,
    Error,
}

impl Level {
    pub fn from_code(code: u64) -> Option<Self> {
        match code {
            0 => Some(Level::Off),
            1 => Some(Level::Warning),
            2 => Some(Level::Error),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    Always,
    Never,
}

impl std::str::FromStr for Condition {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "always" => Ok(Condition::Always),
            "never" => Ok(Condition::Never),
            other => Err(format!("unknown rule condition '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RuleConfig {
    pub level: Level,
    pub condition: Condition,
    pub value: Option<serde_json::Value>,
}

impl RuleConfig {
    pub fn new(level: Level, condition: Condition, value: Option<serde_json::Value>) -> Self {
        Self {
            level,
            condition,
            value,
        }
    }

    pub fn value_usize(&self) -> Option<usize> {
        self.value
            .as_ref()
            .and_then(|v| v.as_u64())
            .map(|v| v as usize)
    }

    /// String or list-of-strings value.
    pub fn value_strings(&self) -> Vec<String> {
        match &self.value {
            Some(serde_json::Value::String(s)) => vec![s.clone()],
            Some(serde_json::Value::Array(items)) => items
                .iter()
                .filter_map(|v| v.as_str().map(|s| s.to_string()))
                .collect(),
            _ => Vec::new(),
        }
    }
}

/// Rule name to configuration. Read-only during a run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleSet {
    pub rules: BTreeMap<String, RuleConfig>,
}

impl RuleSet {
    pub fn get(&self, name: &str) -> Option<&RuleConfig> {
        self.rules.get(name)
    }

    pub fn insert(&mut self, name: &str, config: RuleConfig) {
        self.rules.insert(name.to_string(), config);
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

// Lint result types

/// One rule violation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Problem {
    pub rule: String,
    pub message: String,
}

impl Problem {
    pub fn new(rule: &str, message: impl Into<String>) -> Self {
        Self {
            rule: rule.to_string(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct LintOutcome {
    pub valid: bool,
    pub errors: Vec<Problem>,
    pub warnings: Vec<Problem>,
}

impl LintOutcome {
    pub fn has_findings(&self) -> bool {
        !self.errors.is_empty() || !self.warnings.is_empty()
    }
}

/// Findings for a single commit that had at least one problem.
#[derive(Debug, Clone, PartialEq)]
pub struct CommitReport {
    pub sha: String,
    pub errors: Vec<Problem>,
    pub warnings: Vec<Problem>,
}

/// Aggregate over every commit in the pull request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub valid: bool,
    #[serde(rename = "errors")]
    pub errors_count: usize,
    #[serde(rename = "warnings")]
    pub warns_count: usize,
    #[serde(skip)]
    pub commits: Vec<CommitReport>,
}

impl Default for Report {
    fn default() -> Self {
        Self {
            valid: true,
            errors_count: 0,
            warns_count: 0,
            commits: Vec::new(),
        }
    }
}

impl Report {
    pub fn has_problems(&self) -> bool {
        self.errors_count > 0 || self.warns_count > 0
    }
}
