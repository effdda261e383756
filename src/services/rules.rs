use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::data::{Condition, Level, RuleConfig, RuleSet};
use crate::error::{Error, Result};

pub const CONVENTIONAL_PRESET: &str = "@commitlint/config-conventional";

pub fn get_default_rules_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("commitlint-bot").join("commitlint.json"))
}

/// Where the effective rule set comes from. Loaded once per run.
#[derive(Debug, Clone, Default)]
pub struct RuleSource {
    path: Option<PathBuf>,
    explicit: bool,
}

impl RuleSource {
    /// Rules from a commitlint JSON file the user asked for. A missing file
    /// falls back to the preset with a warning.
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            explicit: true,
        }
    }

    /// Rules from the default config location, which may well not exist.
    pub fn default_file(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            explicit: false,
        }
    }

    /// The built-in conventional preset only.
    pub fn preset() -> Self {
        Self::default()
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn is_explicit(&self) -> bool {
        self.explicit
    }

    pub async fn load(&self) -> Result<RuleSet> {
        let Some(path) = &self.path else {
            return Ok(conventional_preset());
        };

        let content = match tokio::fs::read_to_string(path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                if self.explicit {
                    tracing::warn!(
                        "Rule file {} not found, using {}",
                        path.display(),
                        CONVENTIONAL_PRESET
                    );
                } else {
                    tracing::debug!(
                        "No rule file at {}, using {}",
                        path.display(),
                        CONVENTIONAL_PRESET
                    );
                }
                return Ok(conventional_preset());
            }
            Err(e) => return Err(e.into()),
        };

        let rules = parse_rules(&content, &path.display().to_string())?;
        if rules.is_empty() {
            tracing::warn!("{} enables no rules, every commit will pass", path.display());
        }
        Ok(rules)
    }
}

#[derive(Debug, Deserialize)]
struct RuleFile {
    #[serde(default)]
    extends: Extends,
    #[serde(default)]
    rules: BTreeMap<String, Vec<serde_json::Value>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(untagged)]
enum Extends {
    #[default]
    None,
    One(String),
    Many(Vec<String>),
}

impl Extends {
    fn includes(&self, preset: &str) -> bool {
        match self {
            Extends::None => false,
            Extends::One(name) => name == preset,
            Extends::Many(names) => names.iter().any(|n| n == preset),
        }
    }
}

/// Parse a commitlint-format JSON document into a rule set.
pub fn parse_rules(content: &str, source_name: &str) -> Result<RuleSet> {
    let config_error = |message: String| Error::RuleConfig {
        source_name: source_name.to_string(),
        message,
    };

    let file: RuleFile =
        serde_json::from_str(content).map_err(|e| config_error(e.to_string()))?;

    let mut rule_set = if file.extends.includes(CONVENTIONAL_PRESET) {
        conventional_preset()
    } else {
        RuleSet::default()
    };

    for (name, raw) in file.rules {
        let config = parse_rule(&raw).map_err(|msg| config_error(format!("{}: {}", name, msg)))?;
        rule_set.insert(&name, config);
    }

    Ok(rule_set)
}

fn parse_rule(raw: &[serde_json::Value]) -> std::result::Result<RuleConfig, String> {
    let level = raw
        .first()
        .and_then(|v| v.as_u64())
        .and_then(Level::from_code)
        .ok_or_else(|| "level must be 0, 1 or 2".to_string())?;

    let condition = match raw.get(1) {
        Some(v) => v
            .as_str()
            .ok_or_else(|| "condition must be a string".to_string())?
            .parse()?,
        None if level == Level::Off => Condition::Always,
        None => return Err("missing condition".to_string()),
    };

    Ok(RuleConfig::new(level, condition, raw.get(2).cloned()))
}

/// The `@commitlint/config-conventional` rule levels and values.
pub fn conventional_preset() -> RuleSet {
    use serde_json::json;

    let mut rules = RuleSet::default();
    let mut add = |name: &str, level: Level, condition: Condition, value: Option<serde_json::Value>| {
        rules.insert(name, RuleConfig::new(level, condition, value));
    };

    add("body-leading-blank", Level::Warning, Condition::Always, None);
    add("body-max-line-length", Level::Error, Condition::Always, Some(json!(100)));
    add("footer-leading-blank", Level::Warning, Condition::Always, None);
    add("footer-max-line-length", Level::Error, Condition::Always, Some(json!(100)));
    add("header-max-length", Level::Error, Condition::Always, Some(json!(100)));
    add(
        "subject-case",
        Level::Error,
        Condition::Never,
        Some(json!(["sentence-case", "start-case", "pascal-case", "upper-case"])),
    );
    add("subject-empty", Level::Error, Condition::Never, None);
    add("subject-full-stop", Level::Error, Condition::Never, Some(json!(".")));
    add("type-case", Level::Error, Condition::Always, Some(json!("lower-case")));
    add("type-empty", Level::Error, Condition::Never, None);
    add(
        "type-enum",
        Level::Error,
        Condition::Always,
        Some(json!([
            "build", "chore", "ci", "docs", "feat", "fix", "perf", "refactor", "revert",
            "style", "test"
        ])),
    );

    rules
}
