//! Transform results and the append-only diagnostics accumulator.

use serde::Serialize;

use crate::rules::RuleReport;

/// Outcome of one transform call.
///
/// `code` is always usable: the regenerated program on success, the input
/// verbatim on fallback. Callers detect degraded results through `warnings`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TransformResult {
    /// Resulting source text
    pub code: String,
    /// Human-readable problems, in the order they were raised
    pub warnings: Vec<String>,
    /// Rewrites actually applied to `code`
    pub changes: Vec<String>,
    /// Specifiers inspected
    pub imports: Vec<String>,
}

impl TransformResult {
    /// Whether `code` differs from the input because of applied rewrites
    #[must_use]
    pub fn is_changed(&self) -> bool {
        !self.changes.is_empty()
    }
}

/// Diagnostics gathered across the stages of one call.
#[derive(Debug, Default)]
pub struct Diagnostics {
    warnings: Vec<String>,
    changes: Vec<String>,
    imports: Vec<String>,
}

impl Diagnostics {
    /// Empty accumulator
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one warning
    pub fn warn(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    /// Append a rule report. Absent reports and channels count as empty.
    pub fn absorb(&mut self, report: Option<RuleReport>) {
        let Some(report) = report else {
            return;
        };
        self.warnings.extend(report.warnings.unwrap_or_default());
        self.changes.extend(report.changes.unwrap_or_default());
        self.imports.extend(report.imports.unwrap_or_default());
    }

    /// Result for a pipeline that ran to completion
    #[must_use]
    pub fn finish(self, code: String) -> TransformResult {
        TransformResult {
            code,
            warnings: self.warnings,
            changes: self.changes,
            imports: self.imports,
        }
    }

    /// Fallback result: the untouched source, earlier warnings kept, changes
    /// and imports discarded since none of them reached `code`.
    #[must_use]
    pub fn fall_back(mut self, source: &str, failure: String) -> TransformResult {
        self.warnings.push(failure);
        TransformResult {
            code: source.to_owned(),
            warnings: self.warnings,
            changes: Vec::new(),
            imports: Vec::new(),
        }
    }
}
