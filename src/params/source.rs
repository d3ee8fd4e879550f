//! Log source descriptors and path-prefix rewriting.
//!
//! Sources describe files for the log-shipping agent to tail. When the agent
//! sees the host filesystem from a different mount point (for example inside
//! a container), transform rules relocate each source's `path`.

use crate::error::{ConfigurationError, PlanResult};
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    Tail,
    Syslog,
    Forward,
    Exec,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogSourceDescriptor {
    /// fluentd format; a `/regex/` or a named parser.
    pub format: String,
    pub path: String,
    pub pos_file: String,
    pub tag: String,
    #[serde(rename = "type")]
    pub source_type: SourceType,
}

impl LogSourceDescriptor {
    /// Compile the format when it is a `/.../` regex.
    ///
    /// Returns `None` for named parsers and for patterns the regex crate
    /// rejects; the agent may still accept those.
    pub fn format_regex(&self) -> Option<Regex> {
        let inner = self.format.strip_prefix('/')?.strip_suffix('/')?;
        match Regex::new(inner) {
            Ok(re) => Some(re),
            Err(err) => {
                warn!(tag = %self.tag, error = %err, "log source format is not a portable regex");
                None
            }
        }
    }
}

/// Warn about every `/regex/` format the regex crate cannot compile.
pub fn check_formats(sources: &[LogSourceDescriptor]) {
    for src in sources {
        src.format_regex();
    }
}

/// Replace a leading `from` with `to`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathTransformRule {
    pub from: String,
    pub to: String,
}

impl PathTransformRule {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }

    fn apply(&self, path: &str) -> Option<String> {
        path.strip_prefix(self.from.as_str())
            .map(|rest| format!("{}{}", self.to, rest))
    }
}

/// Rules as written by operators: explicit pairs or a flat `[from, to, ...]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathTransformSpec {
    Rules(Vec<PathTransformRule>),
    Flat(Vec<String>),
}

impl Default for PathTransformSpec {
    fn default() -> Self {
        PathTransformSpec::Rules(Vec::new())
    }
}

impl PathTransformSpec {
    pub fn rules(&self) -> PlanResult<Vec<PathTransformRule>> {
        match self {
            PathTransformSpec::Rules(rules) => Ok(rules.clone()),
            PathTransformSpec::Flat(list) => {
                if list.len() % 2 != 0 {
                    return Err(ConfigurationError::UnpairedPathTransform(list.len()));
                }
                Ok(list
                    .chunks_exact(2)
                    .map(|pair| PathTransformRule::new(pair[0].clone(), pair[1].clone()))
                    .collect())
            }
        }
    }
}

/// Rewrite a single path; first matching rule wins.
pub fn transform_path(path: &str, rules: &[PathTransformRule]) -> String {
    rules
        .iter()
        .find_map(|rule| rule.apply(path))
        .unwrap_or_else(|| path.to_string())
}

/// Rewrite every source's path. Length, order and other fields are kept.
pub fn transform(
    sources: &[LogSourceDescriptor],
    rules: &[PathTransformRule],
) -> Vec<LogSourceDescriptor> {
    sources
        .iter()
        .map(|src| LogSourceDescriptor {
            path: transform_path(&src.path, rules),
            ..src.clone()
        })
        .collect()
}
