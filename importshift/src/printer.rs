//! Printer stage: regenerates source text from a [`SyntaxTree`].
//!
//! [`SourcePrinter`] never reflows code. It copies the original source and
//! splices in only the bytes the tree says changed, through
//! [`ByteRangeRewriter`].

use thiserror::Error;

use crate::cst::SyntaxTree;
use crate::rewrite::{ByteRangeRewriter, Edit, RewriteError};
use crate::utils::quote_js_string;

/// Formatting switches passed to the printer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrintOptions {
    /// Keep comments
    pub comments: bool,
    /// Drop blank lines
    pub compact: bool,
    /// Escape only what string syntax requires
    pub minimal_escaping: bool,
}

impl Default for PrintOptions {
    fn default() -> Self {
        Self {
            comments: true,
            compact: false,
            minimal_escaping: true,
        }
    }
}

/// Regenerated source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintOutput {
    /// Program text
    pub code: String,
}

/// Error raised by a printer stage
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PrintError {
    /// The collected edits could not be applied
    #[error("failed to regenerate source: {0}")]
    Rewrite(#[from] RewriteError),
    /// Printer-specific failure
    #[error("{0}")]
    Failed(String),
}

/// Turns a tree back into source text.
pub trait Printer: Send + Sync {
    /// Print `tree` with `options`.
    fn print(&self, tree: &SyntaxTree, options: &PrintOptions) -> Result<PrintOutput, PrintError>;
}

/// Formatting-preserving printer
#[derive(Debug, Clone, Copy, Default)]
pub struct SourcePrinter;

impl SourcePrinter {
    /// Create a new printer
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn specifier_edits(tree: &SyntaxTree, minimal: bool) -> Vec<Edit> {
        tree.imports()
            .iter()
            .filter_map(|site| {
                let replacement = site.replacement()?;
                Some(Edit::new(
                    site.literal_start,
                    site.literal_end,
                    quote_js_string(replacement, site.quote, minimal),
                ))
            })
            .collect()
    }

    fn comment_edits(tree: &SyntaxTree) -> Vec<Edit> {
        tree.comments()
            .iter()
            .map(|comment| {
                let (start, end) = comment.removal_range(tree.source());
                if comment.separates_tokens(tree.source()) {
                    Edit::new(start, end, " ")
                } else {
                    Edit::delete(start, end)
                }
            })
            .collect()
    }

    /// Deletions for whitespace-only lines outside template literals,
    /// skipping any line already covered by another edit.
    fn blank_line_edits(tree: &SyntaxTree, taken: &[Edit]) -> Vec<Edit> {
        let source = tree.source();
        let templates = tree.template_ranges();
        let mut edits = Vec::new();

        let mut line_start = 0;
        for line in source.split_inclusive('\n') {
            let line_end = line_start + line.len();
            let blank = line.trim().is_empty();
            let guarded = templates
                .iter()
                .any(|&(start, end)| start < line_end && line_start < end);
            let candidate = Edit::delete(line_start, line_end);
            let claimed = taken.iter().any(|edit| edit.overlaps(&candidate));
            if blank && !guarded && !claimed && line_start < line_end {
                edits.push(candidate);
            }
            line_start = line_end;
        }
        edits
    }
}

impl Printer for SourcePrinter {
    fn print(&self, tree: &SyntaxTree, options: &PrintOptions) -> Result<PrintOutput, PrintError> {
        let mut edits = Self::specifier_edits(tree, options.minimal_escaping);
        if !options.comments {
            edits.extend(Self::comment_edits(tree));
        }
        if options.compact {
            let blank = Self::blank_line_edits(tree, &edits);
            edits.extend(blank);
        }

        let mut rewriter = ByteRangeRewriter::new(tree.source());
        rewriter.add_edits(edits);
        tracing::trace!(edits = rewriter.edit_count(), "printing tree");
        let code = rewriter.apply()?;
        Ok(PrintOutput { code })
    }
}
