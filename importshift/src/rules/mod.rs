//! Import rewrite rules.
//!
//! The rule engine is the middle stage of the pipeline: it walks the import
//! sites of a [`SyntaxTree`], rewrites the ones a rule matches, and reports
//! what it saw on three channels.

use thiserror::Error;

use crate::cst::SyntaxTree;

mod engine;
/// Built-in rule sets keyed by target.
pub mod presets;
mod rule;

pub use engine::SpecifierRuleEngine;
pub use rule::{ImportRule, MatchKind, RuleMatch};

/// Diagnostics produced by one engine run.
///
/// Every channel is optional; the pipeline treats an absent channel as empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleReport {
    /// Problems worth a human's attention
    pub warnings: Option<Vec<String>>,
    /// Descriptions of rewrites actually applied
    pub changes: Option<Vec<String>>,
    /// Specifiers inspected, in source order
    pub imports: Option<Vec<String>>,
}

/// Error raised by a rule engine
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    /// A regex rule failed to compile
    #[error("invalid import rule pattern '{pattern}': {message}")]
    InvalidPattern {
        /// Pattern as configured
        pattern: String,
        /// Compiler message
        message: String,
    },
    /// Engine-specific failure
    #[error("{0}")]
    Failed(String),
}

/// Rewrites import sites of a tree for a target convention.
///
/// Implementations mutate `tree` in place and must be reentrant.
pub trait ImportRuleEngine: Send + Sync {
    /// Apply the rules registered for `target`.
    fn apply(&self, tree: &mut SyntaxTree, target: &str)
        -> Result<Option<RuleReport>, RuleError>;
}
