pub mod git;

pub use git::{get_current_repo, parse_repo_arg};
