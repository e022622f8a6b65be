use regex::Regex;
use serde::{Deserialize, Serialize};

use super::RuleError;

/// How a rule's `from` pattern is compared with a specifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchKind {
    /// Whole specifier equals `from`.
    #[default]
    Exact,
    /// Specifier is `from` or a subpath `from/...`.
    Prefix,
    /// `from` is a regular expression; `to` may use `$1` captures.
    Regex,
}

/// One rewrite rule, as written in configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportRule {
    /// Specifier or pattern to match.
    pub from: String,
    /// Replacement. `None` marks the module as unsupported for the target.
    #[serde(default)]
    pub to: Option<String>,
    /// Matching mode.
    #[serde(default, rename = "match")]
    pub match_kind: MatchKind,
    /// Restrict the rule to one target; `None` applies to every target.
    #[serde(default)]
    pub target: Option<String>,
    /// Human note appended to diagnostics.
    #[serde(default)]
    pub note: Option<String>,
}

impl ImportRule {
    fn new(from: impl Into<String>, to: Option<String>, match_kind: MatchKind) -> Self {
        Self {
            from: from.into(),
            to,
            match_kind,
            target: None,
            note: None,
        }
    }

    /// Exact specifier swap.
    #[must_use]
    pub fn exact(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self::new(from, Some(to.into()), MatchKind::Exact)
    }

    /// Package swap that carries subpaths along.
    #[must_use]
    pub fn prefix(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self::new(from, Some(to.into()), MatchKind::Prefix)
    }

    /// Regex rewrite.
    #[must_use]
    pub fn regex(pattern: impl Into<String>, to: impl Into<String>) -> Self {
        Self::new(pattern, Some(to.into()), MatchKind::Regex)
    }

    /// Package (and subpaths) with no equivalent under the target.
    #[must_use]
    pub fn unsupported(from: impl Into<String>) -> Self {
        Self::new(from, None, MatchKind::Prefix)
    }

    /// Restrict to one target.
    #[must_use]
    pub fn for_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    /// Attach a note.
    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Whether the rule is active for `target`.
    #[must_use]
    pub fn applies_to(&self, target: &str) -> bool {
        self.target.as_deref().is_none_or(|t| t == target)
    }

    pub(super) fn compile(&self) -> Result<CompiledRule, RuleError> {
        let matcher = match self.match_kind {
            MatchKind::Exact => Matcher::Exact,
            MatchKind::Prefix => Matcher::Prefix,
            MatchKind::Regex => {
                let re = Regex::new(&self.from).map_err(|e| RuleError::InvalidPattern {
                    pattern: self.from.clone(),
                    message: e.to_string(),
                })?;
                Matcher::Regex(re)
            }
        };
        Ok(CompiledRule {
            rule: self.clone(),
            matcher,
        })
    }
}

/// Outcome of matching one specifier against one rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleMatch {
    /// Replace the specifier with this value.
    Rewrite(String),
    /// The specifier has no equivalent under the target.
    Unsupported,
}

#[derive(Debug, Clone)]
enum Matcher {
    Exact,
    Prefix,
    Regex(Regex),
}

/// A rule with its pattern ready to run.
#[derive(Debug, Clone)]
pub(super) struct CompiledRule {
    pub(super) rule: ImportRule,
    matcher: Matcher,
}

impl CompiledRule {
    pub(super) fn resolve(&self, specifier: &str) -> Option<RuleMatch> {
        let from = self.rule.from.as_str();
        let rewritten = match &self.matcher {
            Matcher::Exact => {
                if specifier != from {
                    return None;
                }
                self.rule.to.clone()
            }
            Matcher::Prefix => {
                let rest = specifier.strip_prefix(from)?;
                if !on_segment_boundary(rest) {
                    return None;
                }
                if let Some(to) = &self.rule.to {
                    // Already under the replacement prefix, e.g. `x/esm` for `x` -> `x/esm`
                    if specifier
                        .strip_prefix(to.as_str())
                        .is_some_and(on_segment_boundary)
                    {
                        return None;
                    }
                }
                self.rule.to.as_ref().map(|to| format!("{to}{rest}"))
            }
            Matcher::Regex(re) => {
                if !re.is_match(specifier) {
                    return None;
                }
                self.rule
                    .to
                    .as_ref()
                    .map(|to| re.replace(specifier, to.as_str()).into_owned())
            }
        };
        Some(rewritten.map_or(RuleMatch::Unsupported, RuleMatch::Rewrite))
    }
}

fn on_segment_boundary(rest: &str) -> bool {
    rest.is_empty() || rest.starts_with('/')
}
