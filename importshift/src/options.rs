//! Transform options and the default/partial merge.
//!
//! Every option has a hard-coded default. Callers pass a [`PartialOptions`]
//! with any subset of fields set, and [`PartialOptions::resolve`] fills the
//! rest field by field.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::constants::DEFAULT_TARGET;

/// Source dialect handed to the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Syntax {
    /// TypeScript without JSX.
    #[default]
    TypeScript,
    /// TypeScript with JSX.
    Tsx,
    /// JavaScript, JSX included.
    JavaScript,
}

impl Syntax {
    /// Lowercase name, as used in config files.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TypeScript => "typescript",
            Self::Tsx => "tsx",
            Self::JavaScript => "javascript",
        }
    }
}

impl fmt::Display for Syntax {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Syntax {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "typescript" | "ts" => Ok(Self::TypeScript),
            "tsx" => Ok(Self::Tsx),
            "javascript" | "js" | "jsx" => Ok(Self::JavaScript),
            other => Err(format!("unknown syntax '{other}'")),
        }
    }
}

/// Fully resolved options for one transform call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransformOptions {
    /// Dialect the parser reads. Affects the parser only.
    pub syntax: Syntax,
    /// Whether comments survive regeneration. Affects the printer only.
    pub preserve_comments: bool,
    /// Opaque label naming the destination convention, consumed by the rule engine.
    pub target: String,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            syntax: Syntax::TypeScript,
            preserve_comments: true,
            target: DEFAULT_TARGET.to_owned(),
        }
    }
}

impl TransformOptions {
    /// Overlays `partial` on the defaults. Caller values win field by field.
    #[must_use]
    pub fn merge(partial: &PartialOptions) -> Self {
        let defaults = Self::default();
        Self {
            syntax: partial.syntax.unwrap_or(defaults.syntax),
            preserve_comments: partial
                .preserve_comments
                .unwrap_or(defaults.preserve_comments),
            target: partial.target.clone().unwrap_or(defaults.target),
        }
    }
}

/// Caller-supplied options; any field may be left unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartialOptions {
    /// Dialect override.
    pub syntax: Option<Syntax>,
    /// Comment preservation override.
    pub preserve_comments: Option<bool>,
    /// Target override.
    pub target: Option<String>,
}

impl PartialOptions {
    /// Empty options: every field takes its default.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the syntax.
    #[must_use]
    pub fn with_syntax(mut self, syntax: Syntax) -> Self {
        self.syntax = Some(syntax);
        self
    }

    /// Sets comment preservation.
    #[must_use]
    pub fn with_preserve_comments(mut self, preserve: bool) -> Self {
        self.preserve_comments = Some(preserve);
        self
    }

    /// Sets the target label.
    #[must_use]
    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    /// Fills fields left unset here from `lower`, a lower-precedence layer.
    #[must_use]
    pub fn or(self, lower: &PartialOptions) -> Self {
        Self {
            syntax: self.syntax.or(lower.syntax),
            preserve_comments: self.preserve_comments.or(lower.preserve_comments),
            target: self.target.or_else(|| lower.target.clone()),
        }
    }

    /// Produces the complete option set.
    #[must_use]
    pub fn resolve(&self) -> TransformOptions {
        TransformOptions::merge(self)
    }
}
