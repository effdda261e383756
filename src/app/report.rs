use crate::app::normalize_message;
use crate::data::{CommitRecord, CommitReport, LintOutcome, Report, RuleSet, StatusState};
use crate::services::Linter;

/// Fold one commit's lint outcome into the running report.
pub fn fold_commit(mut report: Report, sha: &str, outcome: LintOutcome) -> Report {
    if !outcome.valid {
        report.valid = false;
    }

    if outcome.has_findings() {
        report.errors_count += outcome.errors.len();
        report.warns_count += outcome.warnings.len();
        report.commits.push(CommitReport {
            sha: sha.to_string(),
            errors: outcome.errors,
            warnings: outcome.warnings,
        });
    }

    report
}

/// Lint every commit of a page, in order, and fold the results.
pub fn lint_page(
    report: Report,
    commits: &[CommitRecord],
    rules: &RuleSet,
    linter: &dyn Linter,
) -> Report {
    commits.iter().fold(report, |report, commit| {
        let message = normalize_message(&commit.message);
        let outcome = linter.lint(&message, rules);
        tracing::debug!(
            "{}: valid={} errors={} warnings={}",
            commit.sha,
            outcome.valid,
            outcome.errors.len(),
            outcome.warnings.len()
        );
        fold_commit(report, &commit.sha, outcome)
    })
}

pub fn final_state(report: &Report) -> StatusState {
    if report.valid {
        StatusState::Success
    } else {
        StatusState::Failure
    }
}

pub fn status_description(report: &Report) -> String {
    format!(
        "found {} problems, {} warnings",
        report.errors_count, report.warns_count
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Problem;

    fn outcome(valid: bool, errors: usize, warnings: usize) -> LintOutcome {
        LintOutcome {
            valid,
            errors: (0..errors)
                .map(|i| Problem::new("type-empty", format!("error {}", i)))
                .collect(),
            warnings: (0..warnings)
                .map(|i| Problem::new("body-leading-blank", format!("warning {}", i)))
                .collect(),
        }
    }

    #[test]
    fn clean_commits_are_counted_but_not_listed() {
        let report = fold_commit(Report::default(), "a", outcome(true, 0, 0));
        assert!(report.valid);
        assert!(report.commits.is_empty());
        assert!(!report.has_problems());
        assert_eq!(final_state(&report), StatusState::Success);
        assert_eq!(status_description(&report), "found 0 problems, 0 warnings");
    }

    #[test]
    fn one_invalid_commit_fails_the_report() {
        let report = [
            ("a", outcome(true, 0, 1)),
            ("b", outcome(false, 2, 0)),
            ("c", outcome(true, 0, 0)),
        ]
        .into_iter()
        .fold(Report::default(), |r, (sha, o)| fold_commit(r, sha, o));

        assert!(!report.valid);
        assert_eq!(report.errors_count, 2);
        assert_eq!(report.warns_count, 1);
        let shas: Vec<&str> = report.commits.iter().map(|c| c.sha.as_str()).collect();
        assert_eq!(shas, vec!["a", "b"]);
        assert_eq!(final_state(&report), StatusState::Failure);
        assert_eq!(status_description(&report), "found 2 problems, 1 warnings");
    }

    #[test]
    fn warnings_alone_keep_the_report_valid() {
        let report = fold_commit(Report::default(), "a", outcome(true, 0, 3));
        assert!(report.valid);
        assert!(report.has_problems());
    }

    struct EchoLinter;

    impl Linter for EchoLinter {
        fn lint(&self, message: &str, _rules: &RuleSet) -> LintOutcome {
            if message.starts_with("fix") {
                LintOutcome {
                    valid: true,
                    ..Default::default()
                }
            } else {
                LintOutcome {
                    valid: false,
                    errors: vec![Problem::new("type-empty", message)],
                    warnings: Vec::new(),
                }
            }
        }
    }

    #[test]
    fn lint_page_normalizes_before_linting() {
        let commits = vec![
            CommitRecord {
                sha: "a".into(),
                message: "TICK-1: fix thing".into(),
            },
            CommitRecord {
                sha: "b".into(),
                message: "oops".into(),
            },
        ];
        let report = lint_page(Report::default(), &commits, &RuleSet::default(), &EchoLinter);
        assert!(!report.valid);
        assert_eq!(report.commits.len(), 1);
        assert_eq!(report.commits[0].sha, "b");
        assert_eq!(report.commits[0].errors[0].message, "oops");
    }
}
