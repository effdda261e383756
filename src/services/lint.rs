use regex::Regex;
use std::sync::LazyLock;

use crate::data::{Condition, Level, LintOutcome, Problem, RuleConfig, RuleSet};

/// Evaluates a commit message against a rule set.
pub trait Linter: Send + Sync {
    fn lint(&self, message: &str, rules: &RuleSet) -> LintOutcome;
}

static HEADER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\w*)(?:\((.*)\))?!?: (.*)$").unwrap());

static FOOTER_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:BREAKING[ -]CHANGE: |[A-Za-z][\w-]*: |[A-Za-z][\w-]* #)").unwrap()
});

static QUOTED: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"`.*?`|".*?"|'.*?'"#).unwrap());

static IGNORED: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        Regex::new(r"^Merge pull request #\d+").unwrap(),
        Regex::new(r"^Merge (?:remote-tracking )?branch ").unwrap(),
        Regex::new(r"^Merge tag ").unwrap(),
        Regex::new(r"^Merge .+ into .+").unwrap(),
        Regex::new(r#"^Revert "Merge"#).unwrap(),
        Regex::new(r"^(?:fixup|squash|amend)! ").unwrap(),
        Regex::new(r"^Automatic merge").unwrap(),
        Regex::new(r"^Auto-merged .+ into").unwrap(),
    ]
});

/// A commit message split into conventional-commit parts.
#[derive(Debug, Default, PartialEq)]
pub struct ParsedMessage<'a> {
    pub header: &'a str,
    pub kind: Option<&'a str>,
    pub scope: Option<&'a str>,
    pub subject: Option<&'a str>,
    /// Lines after the header, untrimmed.
    pub rest: Vec<&'a str>,
    /// Index into `rest` where the footer begins.
    pub footer_start: Option<usize>,
}

impl<'a> ParsedMessage<'a> {
    pub fn parse(message: &'a str) -> Self {
        let mut lines = message.lines();
        let header = lines.next().unwrap_or("");
        let rest: Vec<&str> = lines.collect();

        let (kind, scope, subject) = match HEADER_PATTERN.captures(header) {
            Some(caps) => (
                caps.get(1).map(|m| m.as_str()).filter(|s| !s.is_empty()),
                caps.get(2).map(|m| m.as_str()).filter(|s| !s.is_empty()),
                caps.get(3).map(|m| m.as_str()).filter(|s| !s.is_empty()),
            ),
            None => (None, None, None),
        };

        let footer_start = rest.iter().position(|line| FOOTER_TOKEN.is_match(line));

        Self {
            header,
            kind,
            scope,
            subject,
            rest,
            footer_start,
        }
    }

    pub fn body_lines(&self) -> Vec<&'a str> {
        let end = self.footer_start.unwrap_or(self.rest.len());
        let lines = &self.rest[..end];
        let first = lines.iter().position(|l| !l.trim().is_empty());
        let last = lines.iter().rposition(|l| !l.trim().is_empty());
        match (first, last) {
            (Some(first), Some(last)) => lines[first..=last].to_vec(),
            _ => Vec::new(),
        }
    }

    pub fn footer_lines(&self) -> Vec<&'a str> {
        match self.footer_start {
            Some(start) => self.rest[start..].to_vec(),
            None => Vec::new(),
        }
    }

    fn has_body(&self) -> bool {
        !self.body_lines().is_empty()
    }
}

/// Built-in conventional-commit rule engine.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConventionalLinter;

impl ConventionalLinter {
    pub fn new() -> Self {
        Self
    }
}

impl Linter for ConventionalLinter {
    fn lint(&self, message: &str, rules: &RuleSet) -> LintOutcome {
        if is_ignored(message) {
            return LintOutcome {
                valid: true,
                ..Default::default()
            };
        }

        let parsed = ParsedMessage::parse(message);
        let mut outcome = LintOutcome::default();

        for (name, config) in &rules.rules {
            if config.level == Level::Off {
                continue;
            }
            let Some(problem) = check_rule(name, config, &parsed) else {
                continue;
            };
            match config.level {
                Level::Error => outcome.errors.push(problem),
                Level::Warning => outcome.warnings.push(problem),
                Level::Off => {}
            }
        }

        outcome.valid = outcome.errors.is_empty();
        outcome
    }
}

pub fn is_ignored(message: &str) -> bool {
    IGNORED.iter().any(|re| re.is_match(message))
}

fn check_rule(name: &str, config: &RuleConfig, msg: &ParsedMessage) -> Option<Problem> {
    let never = config.condition == Condition::Never;
    let must = if never { "may not" } else { "must" };

    match name {
        "type-empty" => check_empty(name, "type", msg.kind, never),
        "scope-empty" => check_empty(name, "scope", msg.scope, never),
        "subject-empty" => check_empty(name, "subject", msg.subject, never),

        "type-enum" => check_enum(name, "type", msg.kind.map(|k| vec![k]), config),
        "scope-enum" => check_enum(
            name,
            "scope",
            msg.scope.map(|s| s.split([',', '/']).map(str::trim).collect()),
            config,
        ),

        "type-case" => check_case(name, "type", msg.kind, config),
        "scope-case" => check_case(name, "scope", msg.scope, config),
        "subject-case" => check_case(name, "subject", msg.subject, config),

        "subject-full-stop" => {
            let subject = msg.subject?;
            let stop = config
                .value
                .as_ref()
                .and_then(|v| v.as_str())
                .unwrap_or(".");
            let ends = subject.ends_with(stop);
            (ends == never).then(|| Problem::new(name, format!("subject {} end with full stop", must)))
        }

        "header-max-length" => {
            let max = config.value_usize()?;
            let len = msg.header.chars().count();
            (len > max).then(|| {
                Problem::new(
                    name,
                    format!(
                        "header must not be longer than {} characters, current length is {}",
                        max, len
                    ),
                )
            })
        }
        "header-min-length" => {
            let min = config.value_usize()?;
            let len = msg.header.chars().count();
            (len < min).then(|| {
                Problem::new(
                    name,
                    format!(
                        "header must not be shorter than {} characters, current length is {}",
                        min, len
                    ),
                )
            })
        }

        "body-leading-blank" => {
            if !msg.has_body() {
                return None;
            }
            let blank = msg.rest.first().is_some_and(|l| l.trim().is_empty());
            (blank == never).then(|| Problem::new(name, format!("body {} have leading blank line", must)))
        }
        "footer-leading-blank" => {
            let start = msg.footer_start?;
            let blank = start > 0 && msg.rest[start - 1].trim().is_empty();
            (blank == never)
                .then(|| Problem::new(name, format!("footer {} have leading blank line", must)))
        }

        "body-max-line-length" => {
            let max = config.value_usize()?;
            msg.body_lines()
                .iter()
                .any(|l| l.chars().count() > max)
                .then(|| {
                    Problem::new(
                        name,
                        format!("body's lines must not be longer than {} characters", max),
                    )
                })
        }
        "footer-max-line-length" => {
            let max = config.value_usize()?;
            msg.footer_lines()
                .iter()
                .any(|l| l.chars().count() > max)
                .then(|| {
                    Problem::new(
                        name,
                        format!("footer's lines must not be longer than {} characters", max),
                    )
                })
        }

        other => {
            tracing::debug!("Skipping unsupported rule {}", other);
            None
        }
    }
}

fn check_empty(name: &str, part: &str, value: Option<&str>, never: bool) -> Option<Problem> {
    let empty = value.map_or(true, |v| v.trim().is_empty());
    if never && empty {
        Some(Problem::new(name, format!("{} may not be empty", part)))
    } else if !never && !empty {
        Some(Problem::new(name, format!("{} must be empty", part)))
    } else {
        None
    }
}

fn check_enum(
    name: &str,
    part: &str,
    values: Option<Vec<&str>>,
    config: &RuleConfig,
) -> Option<Problem> {
    let values = values?;
    let allowed = config.value_strings();
    if allowed.is_empty() {
        return None;
    }

    let all_listed = values.iter().all(|v| allowed.iter().any(|a| a == v));
    let any_listed = values.iter().any(|v| allowed.iter().any(|a| a == v));
    let violation = match config.condition {
        Condition::Always => !all_listed,
        Condition::Never => any_listed,
    };

    violation.then(|| {
        let verb = match config.condition {
            Condition::Always => "must be one of",
            Condition::Never => "must not be one of",
        };
        Problem::new(name, format!("{} {} [{}]", part, verb, allowed.join(", ")))
    })
}

fn check_case(name: &str, part: &str, value: Option<&str>, config: &RuleConfig) -> Option<Problem> {
    let value = value?;
    let cases = config.value_strings();
    let input = QUOTED.replace_all(value, "");
    let input = input.trim();
    if cases.is_empty() || !input.chars().any(char::is_alphabetic) {
        return None;
    }

    let matched = cases.iter().any(|case| matches_case(input, case));
    let violation = match config.condition {
        Condition::Always => !matched,
        Condition::Never => matched,
    };

    violation.then(|| {
        let verb = match config.condition {
            Condition::Always => "must be",
            Condition::Never => "must not be",
        };
        Problem::new(name, format!("{} {} {}", part, verb, cases.join(", ")))
    })
}

/// Whether `input` is already written in the named letter case.
pub fn matches_case(input: &str, case: &str) -> bool {
    let words: Vec<&str> = input
        .split(|c: char| c.is_whitespace() || c == '-' || c == '_')
        .filter(|w| !w.is_empty())
        .collect();
    let starts_upper = |w: &str| w.chars().next().is_some_and(char::is_uppercase);
    let no_upper = |w: &str| !w.chars().any(char::is_uppercase);

    match case {
        "lower-case" | "lowercase" => input == input.to_lowercase(),
        "upper-case" | "uppercase" => input == input.to_uppercase(),
        "sentence-case" | "sentencecase" => {
            let mut chars = input.chars();
            chars.next().is_some_and(char::is_uppercase) && no_upper(chars.as_str())
        }
        "start-case" | "startcase" => {
            let tail: String = input.chars().skip(1).collect();
            (input.contains(' ') && words.iter().all(|&w| starts_upper(w)))
                || (words.len() == 1 && starts_upper(input) && no_upper(&tail))
        }
        "pascal-case" | "pascalcase" => {
            !input.contains([' ', '-', '_'])
                && starts_upper(input)
                && input.chars().all(char::is_alphanumeric)
        }
        "camel-case" | "camelcase" => {
            !input.contains([' ', '-', '_'])
                && input.chars().next().is_some_and(char::is_lowercase)
                && input.chars().all(char::is_alphanumeric)
        }
        "kebab-case" | "kebabcase" => {
            !input.contains([' ', '_']) && input == input.to_lowercase()
        }
        "snake-case" | "snakecase" => {
            !input.contains([' ', '-']) && input == input.to_lowercase()
        }
        other => {
            tracing::debug!("Unknown case {}", other);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::rules::conventional_preset;

    fn lint(message: &str) -> LintOutcome {
        ConventionalLinter::new().lint(message, &conventional_preset())
    }

    fn rule_names(problems: &[Problem]) -> Vec<&str> {
        problems.iter().map(|p| p.rule.as_str()).collect()
    }

    #[test]
    fn parses_header_parts() {
        let parsed = ParsedMessage::parse("feat(parser)!: add arrays\n\nbody text\n\nRefs: #12");
        assert_eq!(parsed.kind, Some("feat"));
        assert_eq!(parsed.scope, Some("parser"));
        assert_eq!(parsed.subject, Some("add arrays"));
        assert_eq!(parsed.body_lines(), vec!["body text"]);
        assert_eq!(parsed.footer_lines(), vec!["Refs: #12"]);
    }

    #[test]
    fn non_conventional_header_has_no_parts() {
        let parsed = ParsedMessage::parse(". bad");
        assert_eq!(parsed.kind, None);
        assert_eq!(parsed.subject, None);
    }

    #[test]
    fn conventional_message_is_valid() {
        let outcome = lint("fix(api): handle empty pages\n\nThe last page may be empty.");
        assert!(outcome.valid);
        assert!(!outcome.has_findings());
    }

    #[test]
    fn missing_type_and_subject_are_errors() {
        let outcome = lint(". bad");
        assert!(!outcome.valid);
        let names = rule_names(&outcome.errors);
        assert!(names.contains(&"type-empty"));
        assert!(names.contains(&"subject-empty"));
    }

    #[test]
    fn unknown_type_is_reported() {
        let outcome = lint("feature: add thing");
        assert_eq!(rule_names(&outcome.errors), vec!["type-enum"]);
        assert!(outcome.errors[0].message.starts_with("type must be one of [build"));
    }

    #[test]
    fn sentence_case_subject_and_full_stop() {
        let outcome = lint("docs: Update readme.");
        let names = rule_names(&outcome.errors);
        assert!(names.contains(&"subject-case"));
        assert!(names.contains(&"subject-full-stop"));
    }

    #[test]
    fn missing_body_blank_line_is_a_warning() {
        let outcome = lint("chore: bump deps\nsecond line");
        assert!(outcome.valid);
        assert_eq!(rule_names(&outcome.warnings), vec!["body-leading-blank"]);
    }

    #[test]
    fn long_header_is_reported_with_length() {
        let header = format!("feat: {}", "x".repeat(120));
        let outcome = lint(&header);
        assert_eq!(rule_names(&outcome.errors), vec!["header-max-length"]);
        assert!(outcome.errors[0].message.ends_with("current length is 126"));
    }

    #[test]
    fn merge_commits_are_ignored() {
        assert!(is_ignored("Merge pull request #42 from acme/feature"));
        assert!(is_ignored("fixup! feat: thing"));
        let outcome = lint("Merge branch 'main' into feature");
        assert!(outcome.valid);
        assert!(!outcome.has_findings());
    }

    #[test]
    fn disabled_rules_are_skipped() {
        let mut rules = conventional_preset();
        rules.insert(
            "type-enum",
            RuleConfig::new(Level::Off, Condition::Always, None),
        );
        let outcome = ConventionalLinter::new().lint("feature: add thing", &rules);
        assert!(outcome.valid);
    }

    #[test]
    fn scope_enum_checks_each_scope() {
        let mut rules = RuleSet::default();
        rules.insert(
            "scope-enum",
            RuleConfig::new(
                Level::Warning,
                Condition::Always,
                Some(serde_json::json!(["api", "cli"])),
            ),
        );
        let linter = ConventionalLinter::new();
        assert!(!linter.lint("fix(api,cli): x", &rules).has_findings());
        let outcome = linter.lint("fix(api,web): x", &rules);
        assert!(outcome.valid);
        assert_eq!(rule_names(&outcome.warnings), vec!["scope-enum"]);
    }

    #[test]
    fn case_predicates() {
        assert!(matches_case("fix the bug", "lower-case"));
        assert!(matches_case("Fix the bug", "sentence-case"));
        assert!(matches_case("Fix The Bug", "start-case"));
        assert!(matches_case("FixTheBug", "pascal-case"));
        assert!(matches_case("FIX", "upper-case"));
        assert!(!matches_case("fix the bug", "sentence-case"));
        assert!(!matches_case("Fix the bug", "start-case"));
    }
}
