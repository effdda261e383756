use crate::data::{CommitReport, Problem};

const HEADING: &str = "There were the following issues with this Pull Request";
const HELP: &str = "You may need to [change the commit messages](https://help.github.com/articles/changing-a-commit-message/) to comply with the repository contributing guidelines.";

/// Render the bot comment body for the commits that had findings.
pub fn format_report(commits: &[CommitReport]) -> String {
    let mut out = String::new();
    out.push_str(HEADING);
    out.push_str("\n\n");

    for commit in commits {
        out.push_str(&format!("* Commit: {}\n", commit.sha));
        out.push_str("```\n");
        push_problems(&mut out, "✖", &commit.errors);
        push_problems(&mut out, "⚠", &commit.warnings);
        out.push_str("```\n\n");
    }

    out.push_str(HELP);
    out.push_str("\n\n---\n<sub>This comment is updated on every push and removed once all commits pass.</sub>\n");
    out
}

fn push_problems(out: &mut String, marker: &str, problems: &[Problem]) {
    for problem in problems {
        out.push_str(&format!("{}   {} [{}]\n", marker, problem.message, problem.rule));
    }
}
