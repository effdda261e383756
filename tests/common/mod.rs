//! In-memory hosting fake that records every call (testing only)

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;

use commitlint_bot::data::{LintOutcome, Problem, RuleSet};
use commitlint_bot::{
    CommentRef, CommitPage, CommitRecord, Error, HostingApi, InvocationContext, Linter, Result,
    StatusState,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Status(StatusState, String),
    FetchPage(Option<String>),
    FindComment,
    Create(String),
    Edit(u64, String),
    Delete(u64),
}

/// Serves commits from fixed pages and records every request.
#[derive(Debug, Default)]
pub struct RecordingHost {
    pages: Vec<Vec<CommitRecord>>,
    existing: Option<CommentRef>,
    fail_fetch: bool,
    fetch_gate: Option<Arc<Notify>>,
    fetch_started: Arc<Notify>,
    calls: Mutex<Vec<Call>>,
}

impl RecordingHost {
    pub fn new(pages: Vec<Vec<CommitRecord>>) -> Self {
        Self {
            pages,
            ..Default::default()
        }
    }

    pub fn with_existing_comment(mut self, id: u64) -> Self {
        self.existing = Some(CommentRef { id });
        self
    }

    pub fn failing_fetch(mut self) -> Self {
        self.fail_fetch = true;
        self
    }

    /// Hold every page fetch until `gate` is notified.
    pub fn gated_fetch(mut self, gate: Arc<Notify>) -> Self {
        self.fetch_gate = Some(gate);
        self
    }

    /// Wait until a page fetch has been requested.
    pub async fn fetch_requested(&self) {
        self.fetch_started.notified().await;
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn statuses(&self) -> Vec<(StatusState, String)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Status(state, desc) => Some((state, desc)),
                _ => None,
            })
            .collect()
    }

    pub fn comment_calls(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| matches!(c, Call::Create(_) | Call::Edit(..) | Call::Delete(_)))
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl HostingApi for RecordingHost {
    async fn create_status(
        &self,
        _ctx: &InvocationContext,
        state: StatusState,
        description: &str,
    ) -> Result<()> {
        self.record(Call::Status(state, description.to_string()));
        Ok(())
    }

    async fn fetch_commit_page(
        &self,
        ctx: &InvocationContext,
        cursor: Option<&str>,
    ) -> Result<CommitPage> {
        self.record(Call::FetchPage(cursor.map(str::to_string)));
        if let Some(gate) = &self.fetch_gate {
            self.fetch_started.notify_one();
            gate.notified().await;
        }
        if self.fail_fetch {
            return Err(Error::PullRequestNotFound(ctx.slug()));
        }

        let index = match cursor {
            None => 0,
            Some(c) => c.trim_start_matches("page-").parse::<usize>().unwrap(),
        };
        let commits = self.pages.get(index).cloned().unwrap_or_default();
        let next_cursor = (index + 1 < self.pages.len()).then(|| format!("page-{}", index + 1));
        Ok(CommitPage {
            commits,
            next_cursor,
        })
    }

    async fn find_existing_report(&self, _ctx: &InvocationContext) -> Result<Option<CommentRef>> {
        self.record(Call::FindComment);
        Ok(self.existing)
    }

    async fn create_comment(&self, _ctx: &InvocationContext, body: &str) -> Result<()> {
        self.record(Call::Create(body.to_string()));
        Ok(())
    }

    async fn edit_comment(
        &self,
        _ctx: &InvocationContext,
        comment: CommentRef,
        body: &str,
    ) -> Result<()> {
        self.record(Call::Edit(comment.id, body.to_string()));
        Ok(())
    }

    async fn delete_comment(&self, _ctx: &InvocationContext, comment: CommentRef) -> Result<()> {
        self.record(Call::Delete(comment.id));
        Ok(())
    }
}

/// Linter returning canned outcomes per (normalized) message; unknown
/// messages are valid with no findings.
#[derive(Debug, Default)]
pub struct ScriptedLinter {
    outcomes: HashMap<String, LintOutcome>,
    seen: Mutex<Vec<String>>,
}

impl ScriptedLinter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn errors(mut self, message: &str, rules: &[&str]) -> Self {
        self.outcomes.insert(
            message.to_string(),
            LintOutcome {
                valid: false,
                errors: rules
                    .iter()
                    .map(|r| Problem::new(r, format!("{} failed", r)))
                    .collect(),
                warnings: Vec::new(),
            },
        );
        self
    }

    pub fn warnings(mut self, message: &str, rules: &[&str]) -> Self {
        self.outcomes.insert(
            message.to_string(),
            LintOutcome {
                valid: true,
                errors: Vec::new(),
                warnings: rules
                    .iter()
                    .map(|r| Problem::new(r, format!("{} warned", r)))
                    .collect(),
            },
        );
        self
    }

    pub fn seen(&self) -> Vec<String> {
        self.seen.lock().unwrap().clone()
    }
}

impl Linter for ScriptedLinter {
    fn lint(&self, message: &str, _rules: &RuleSet) -> LintOutcome {
        self.seen.lock().unwrap().push(message.to_string());
        self.outcomes.get(message).cloned().unwrap_or(LintOutcome {
            valid: true,
            ..Default::default()
        })
    }
}

pub fn commit(sha: &str, message: &str) -> CommitRecord {
    CommitRecord {
        sha: sha.to_string(),
        message: message.to_string(),
    }
}

pub fn context() -> InvocationContext {
    InvocationContext {
        owner: "acme".to_string(),
        repo: "widgets".to_string(),
        number: 12,
        head_sha: "head123".to_string(),
    }
}
