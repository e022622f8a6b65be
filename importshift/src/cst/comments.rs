//! Comment extraction from JS/TS source using the CST.
//!
//! Tree-sitter captures comments as explicit nodes, making extraction reliable.

use super::parser::CstTree;

/// A comment extracted from source code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    /// The comment text (including `//` or `/* */`)
    pub text: String,
    /// Start byte offset
    pub start_byte: usize,
    /// End byte offset
    pub end_byte: usize,
    /// Line number (1-indexed)
    pub line: usize,
    /// Whether code precedes this comment on its line
    pub is_inline: bool,
}

impl Comment {
    /// Byte range covering the whole line when the comment stands alone on
    /// it (leading indentation, trailing whitespace and the newline).
    /// Returns the comment's own range otherwise.
    #[must_use]
    pub fn removal_range(&self, source: &str) -> (usize, usize) {
        let line_start = source[..self.start_byte]
            .rfind('\n')
            .map_or(0, |pos| pos + 1);
        let rest = &source[self.end_byte..];
        let line_end = rest.find('\n').map_or(source.len(), |pos| self.end_byte + pos);
        let trailing_blank = source[self.end_byte..line_end].trim().is_empty();

        if self.is_inline || !trailing_blank {
            // Keep the code around it; drop the whitespace separating an
            // inline comment from its code.
            let start = if self.is_inline {
                source[line_start..self.start_byte]
                    .trim_end()
                    .len()
                    + line_start
            } else {
                self.start_byte
            };
            return (start, self.end_byte);
        }

        let end = if line_end < source.len() {
            line_end + 1
        } else {
            line_end
        };
        (line_start, end)
    }

    /// Whether the comment is the only separator between two tokens, so
    /// deleting [`Self::removal_range`] outright would join them
    /// (`return/* c */x`).
    #[must_use]
    pub fn separates_tokens(&self, source: &str) -> bool {
        let (start, end) = self.removal_range(source);
        let before = source[..start].chars().next_back();
        let after = source[end..].chars().next();
        matches!(
            (before, after),
            (Some(b), Some(a)) if !b.is_whitespace() && !a.is_whitespace()
        )
    }
}

/// Extract all comments from a CST tree
#[must_use]
pub fn extract_comments(tree: &CstTree) -> Vec<Comment> {
    let source = tree.source.as_str();
    tree.root
        .descendants()
        .filter(|node| node.kind == "comment")
        .map(|node| {
            let line_start = source[..node.start_byte]
                .rfind('\n')
                .map_or(0, |pos| pos + 1);
            let before_comment = &source[line_start..node.start_byte];

            Comment {
                text: source[node.start_byte..node.end_byte].to_owned(),
                start_byte: node.start_byte,
                end_byte: node.end_byte,
                line: node.start_point.row + 1,
                is_inline: before_comment.chars().any(|c| !c.is_whitespace()),
            }
        })
        .collect()
}
