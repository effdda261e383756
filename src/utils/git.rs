use std::process::Command;

/// Owner and name of the repository behind the local `origin` remote.
pub fn get_current_repo() -> Option<(String, String)> {
    let output = Command::new("git")
        .args(["remote", "get-url", "origin"])
        .output()
        .ok()?;

    if !output.status.success() {
        return None;
    }

    let url = String::from_utf8_lossy(&output.stdout).trim().to_string();
    parse_repo_arg(&url)
}

/// Accepts `owner/repo`, an SSH remote, or an HTTPS URL.
pub fn parse_repo_arg(arg: &str) -> Option<(String, String)> {
    let arg = arg.trim();

    let path = if let Some(path) = arg.strip_prefix("git@github.com:") {
        path
    } else if let Some((_, path)) = arg.split_once("github.com") {
        path.trim_start_matches(['/', ':'])
    } else if arg.contains("://") || arg.contains('@') {
        return None;
    } else {
        arg
    };

    let path = path.strip_suffix(".git").unwrap_or(path);
    let mut parts = path.split('/').filter(|p| !p.is_empty());
    match (parts.next(), parts.next()) {
        (Some(owner), Some(repo)) => Some((owner.to_string(), repo.to_string())),
        _ => None,
    }
}
