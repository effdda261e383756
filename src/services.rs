pub mod format;
pub mod github;
pub mod hosting;
pub mod lint;
pub mod rules;

pub use format::format_report;
pub use github::{get_github_token, GitHubClient};
pub use hosting::HostingApi;
pub use lint::{ConventionalLinter, Linter};
pub use rules::{conventional_preset, get_default_rules_path, parse_rules, RuleSource};
