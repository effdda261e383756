//! Error types shared by the library seams.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

/// Bot error type.
#[derive(Error, Debug)]
pub enum Error {
    #[error("GitHub API error: {0}")]
    GitHub(#[from] octocrab::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid webhook payload: {0}")]
    Payload(String),

    #[error("Webhook signature mismatch")]
    Signature,

    #[error("Invalid rule configuration in {source_name}: {message}")]
    RuleConfig {
        source_name: String,
        message: String,
    },

    #[error("Pull request not found: {0}")]
    PullRequestNotFound(String),

    #[error("No GitHub token: {0}")]
    Token(String),

    #[error("Lint run did not finish: {0}")]
    Task(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
    code: &'static str,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            Error::Payload(_) | Error::Json(_) => (StatusCode::BAD_REQUEST, "BAD_PAYLOAD"),
            Error::Signature => (StatusCode::UNAUTHORIZED, "BAD_SIGNATURE"),
            Error::PullRequestNotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Error::RuleConfig { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "RULE_CONFIG"),
            Error::GitHub(_) => (StatusCode::BAD_GATEWAY, "GITHUB_ERROR"),
            Error::Io(_) | Error::Token(_) | Error::Task(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
            }
        };

        let body = ErrorResponse {
            error: self.to_string(),
            code,
        };

        (status, Json(body)).into_response()
    }
}
