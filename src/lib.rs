pub mod app;
pub mod config;
pub mod data;
pub mod error;
pub mod server;
pub mod services;
pub mod utils;

pub use app::{CommitlintBot, PENDING_DESCRIPTION};
pub use config::{ServerSettings, Settings};
pub use data::{CommentRef, CommitPage, CommitRecord, InvocationContext, Report, StatusState};
pub use error::{Error, Result};
pub use services::{ConventionalLinter, HostingApi, Linter, RuleSource};
