//! Tree-sitter based CST parser for JavaScript and TypeScript sources.
//!
//! Provides precise byte-range information for safe code rewriting.

use thiserror::Error;
use tree_sitter::TreeCursor;

use super::tree::SyntaxTree;
use crate::constants::MAX_NESTING_DEPTH;
use crate::options::{Syntax, TransformOptions};

/// A point in source code (row, column)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Point {
    /// Zero-indexed row number
    pub row: usize,
    /// Zero-indexed column (byte offset within line)
    pub column: usize,
}

impl From<tree_sitter::Point> for Point {
    fn from(p: tree_sitter::Point) -> Self {
        Self {
            row: p.row,
            column: p.column,
        }
    }
}

/// A CST node with exact source location
#[derive(Debug, Clone)]
pub struct CstNode {
    /// Node kind (e.g., "import_statement", "string")
    pub kind: String,
    /// Grammar field this node fills in its parent (e.g., "source")
    pub field: Option<&'static str>,
    /// Start byte offset (inclusive)
    pub start_byte: usize,
    /// End byte offset (exclusive)
    pub end_byte: usize,
    /// Start point (row, column)
    pub start_point: Point,
    /// End point (row, column)
    pub end_point: Point,
    /// Whether this is a named node (vs anonymous like punctuation)
    pub is_named: bool,
    /// Whether the parser inserted this node to recover from an error
    pub is_missing: bool,
    /// Child nodes
    pub children: Vec<CstNode>,
}

impl CstNode {
    fn shell(cursor: &TreeCursor<'_>) -> Self {
        let node = cursor.node();
        Self {
            kind: node.kind().to_owned(),
            field: cursor.field_name(),
            start_byte: node.start_byte(),
            end_byte: node.end_byte(),
            start_point: node.start_position().into(),
            end_point: node.end_position().into(),
            is_named: node.is_named(),
            is_missing: node.is_missing(),
            children: Vec::new(),
        }
    }

    /// Build a `CstNode` subtree from the node under `cursor`.
    ///
    /// Walks with an explicit stack of open ancestors and gives up once that
    /// stack would exceed `max_depth`, so the finished tree is never deeper
    /// than the limit.
    fn from_cursor(
        cursor: &mut TreeCursor<'_>,
        syntax: Syntax,
        max_depth: usize,
    ) -> Result<Self, ParseError> {
        let mut open: Vec<CstNode> = Vec::new();
        let mut current = Self::shell(cursor);

        loop {
            if cursor.goto_first_child() {
                if open.len() + 1 >= max_depth {
                    return Err(ParseError::NestingTooDeep {
                        syntax,
                        line: cursor.node().start_position().row + 1,
                        limit: max_depth,
                    });
                }
                let child = Self::shell(cursor);
                open.push(std::mem::replace(&mut current, child));
                continue;
            }

            // `current` is complete: attach it and move to the next sibling,
            // closing ancestors that have none left.
            loop {
                let Some(parent) = open.last_mut() else {
                    return Ok(current);
                };
                if cursor.goto_next_sibling() {
                    let sibling = Self::shell(cursor);
                    parent.children.push(std::mem::replace(&mut current, sibling));
                    break;
                }
                cursor.goto_parent();
                let Some(mut parent) = open.pop() else {
                    return Ok(current);
                };
                parent.children.push(current);
                current = parent;
            }
        }
    }

    /// Child filling the given grammar field, if any
    #[must_use]
    pub fn child_by_field(&self, field: &str) -> Option<&CstNode> {
        self.children.iter().find(|c| c.field == Some(field))
    }

    /// Named children only
    pub fn named_children(&self) -> impl Iterator<Item = &CstNode> {
        self.children.iter().filter(|c| c.is_named)
    }

    /// This node and every node below it, in source order.
    #[must_use]
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants {
            pending: vec![self],
        }
    }

    /// Find all nodes of a specific kind, in source order
    #[must_use]
    pub fn find_by_kind(&self, kind: &str) -> Vec<&CstNode> {
        self.descendants().filter(|n| n.kind == kind).collect()
    }
}

/// Pre-order iterator over a subtree, see [`CstNode::descendants`].
#[derive(Debug, Clone)]
pub struct Descendants<'a> {
    pending: Vec<&'a CstNode>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a CstNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.pending.pop()?;
        self.pending.extend(node.children.iter().rev());
        Some(node)
    }
}

/// A parsed CST tree
#[derive(Debug)]
pub struct CstTree {
    /// Root node of the CST
    pub root: CstNode,
    /// Original source code
    pub source: String,
}

impl CstTree {
    /// Extract a slice of source code by byte range
    #[must_use]
    pub fn slice(&self, start: usize, end: usize) -> &str {
        &self.source[start..end]
    }

    /// Source text covered by a node
    #[must_use]
    pub fn text(&self, node: &CstNode) -> &str {
        self.slice(node.start_byte, node.end_byte)
    }
}

/// Error raised by a parser stage
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The grammar could not be loaded
    #[error("failed to create {syntax} parser: {message}")]
    ParserCreation {
        /// Requested dialect
        syntax: Syntax,
        /// Underlying loader message
        message: String,
    },
    /// Tree-sitter returned no tree
    #[error("failed to parse source as {0}")]
    ParseFailed(Syntax),
    /// The source is not valid under the configured dialect
    #[error("{syntax} syntax error at line {line}, column {column}: {detail}")]
    Syntax {
        /// Configured dialect
        syntax: Syntax,
        /// 1-based line
        line: usize,
        /// 1-based column
        column: usize,
        /// Short description of the offending token
        detail: String,
    },
    /// The tree is nested deeper than the parser will follow
    #[error("{syntax} source nests deeper than {limit} levels at line {line}")]
    NestingTooDeep {
        /// Configured dialect
        syntax: Syntax,
        /// 1-based line where the limit was crossed
        line: usize,
        /// Maximum supported depth
        limit: usize,
    },
}

/// Turns source text into a [`SyntaxTree`].
///
/// Implementations must be reentrant: one parser may serve many
/// concurrent transform calls.
pub trait Parser: Send + Sync {
    /// Parse `source` under the dialect named in `options`.
    fn parse(&self, source: &str, options: &TransformOptions) -> Result<SyntaxTree, ParseError>;
}

/// Tree-sitter backed parser for TypeScript, TSX and JavaScript
#[derive(Debug, Clone, Copy, Default)]
pub struct TreeSitterParser;

impl TreeSitterParser {
    /// Create a new parser
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn language(syntax: Syntax) -> tree_sitter::Language {
        match syntax {
            Syntax::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            Syntax::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
            Syntax::JavaScript => tree_sitter_javascript::LANGUAGE.into(),
        }
    }

    /// Parse into a bare CST, rejecting trees that contain errors.
    pub fn parse_cst(&self, source: &str, syntax: Syntax) -> Result<CstTree, ParseError> {
        let mut parser = tree_sitter::Parser::new();
        parser
            .set_language(&Self::language(syntax))
            .map_err(|e| ParseError::ParserCreation {
                syntax,
                message: e.to_string(),
            })?;

        let tree = parser
            .parse(source, None)
            .ok_or(ParseError::ParseFailed(syntax))?;
        if tree.root_node().has_error() {
            return Err(Self::syntax_error(&tree, source, syntax));
        }
        let root = CstNode::from_cursor(&mut tree.walk(), syntax, MAX_NESTING_DEPTH)?;

        Ok(CstTree {
            root,
            source: source.to_owned(),
        })
    }

    /// Locate the first error or missing node without building the CST,
    /// which may be arbitrarily deep in broken input.
    fn syntax_error(tree: &tree_sitter::Tree, source: &str, syntax: Syntax) -> ParseError {
        let mut cursor = tree.walk();
        let bad = loop {
            let node = cursor.node();
            if node.is_error() || node.is_missing() {
                break Some(node);
            }
            // Only descend into subtrees that contain the error
            if node.has_error() && cursor.goto_first_child() {
                continue;
            }
            let mut advanced = cursor.goto_next_sibling();
            while !advanced && cursor.goto_parent() {
                advanced = cursor.goto_next_sibling();
            }
            if !advanced {
                break None;
            }
        };

        let Some(bad) = bad else {
            let end = tree.root_node().end_position();
            return ParseError::Syntax {
                syntax,
                line: end.row + 1,
                column: end.column + 1,
                detail: "unexpected end of input".to_owned(),
            };
        };
        let detail = if bad.is_missing() {
            format!("missing `{}`", bad.kind())
        } else {
            match source[bad.start_byte()..bad.end_byte()].chars().next() {
                Some(c) => format!("unexpected `{c}`"),
                None => "unexpected end of input".to_owned(),
            }
        };
        let start = bad.start_position();
        ParseError::Syntax {
            syntax,
            line: start.row + 1,
            column: start.column + 1,
            detail,
        }
    }
}

impl Parser for TreeSitterParser {
    fn parse(&self, source: &str, options: &TransformOptions) -> Result<SyntaxTree, ParseError> {
        let cst = self.parse_cst(source, options.syntax)?;
        Ok(SyntaxTree::new(cst, options.syntax))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str, syntax: Syntax) -> Result<CstTree, ParseError> {
        TreeSitterParser::new().parse_cst(source, syntax)
    }

    #[test]
    fn test_parse_simple_import() {
        let tree = parse("import a from 'old-lib';\n", Syntax::TypeScript).unwrap();
        assert_eq!(tree.root.kind, "program");
        let imports = tree.root.find_by_kind("import_statement");
        assert_eq!(imports.len(), 1);

        let source = imports[0].child_by_field("source").unwrap();
        assert_eq!(source.kind, "string");
        assert_eq!(tree.text(source), "'old-lib'");
    }

    #[test]
    fn test_byte_ranges_accurate() {
        let source = "const x = 1;";
        let tree = parse(source, Syntax::JavaScript).unwrap();
        assert_eq!(tree.root.start_byte, 0);
        assert_eq!(tree.root.end_byte, source.len());
    }

    #[test]
    fn test_empty_source_parses() {
        let tree = parse("", Syntax::TypeScript).unwrap();
        assert!(tree.root.children.is_empty());
    }

    #[test]
    fn test_unclosed_brace_is_syntax_error() {
        let err = parse("const x = {", Syntax::TypeScript).unwrap_err();
        assert!(matches!(err, ParseError::Syntax { line: 1, .. }));
    }

    #[test]
    fn test_type_annotations_need_typescript() {
        let source = "let n: number = 1;\n";
        assert!(parse(source, Syntax::TypeScript).is_ok());
        assert!(parse(source, Syntax::JavaScript).is_err());
    }

    #[test]
    fn test_jsx_needs_tsx_or_javascript() {
        let source = "const el = <div className=\"a\">hi</div>;\n";
        assert!(parse(source, Syntax::Tsx).is_ok());
        assert!(parse(source, Syntax::JavaScript).is_ok());
    }

    #[test]
    fn test_error_message_mentions_position() {
        let err = parse("import { from 'x';", Syntax::TypeScript).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("syntax error at line 1"), "{message}");
    }

    fn nested_array(depth: usize) -> String {
        format!("const x = {}{};\n", "[".repeat(depth), "]".repeat(depth))
    }

    #[test]
    fn test_moderate_nesting_builds_full_tree() {
        let tree = parse(&nested_array(200), Syntax::TypeScript).unwrap();
        assert_eq!(tree.root.find_by_kind("array").len(), 200);
    }

    #[test]
    fn test_deep_nesting_is_rejected() {
        let err = parse(&nested_array(MAX_NESTING_DEPTH * 20), Syntax::TypeScript).unwrap_err();
        assert!(matches!(
            err,
            ParseError::NestingTooDeep {
                line: 1,
                limit: MAX_NESTING_DEPTH,
                ..
            }
        ));
    }

    #[test]
    fn test_deep_broken_input_reports_syntax_error() {
        let source = format!("const x = {};", "[".repeat(5_000));
        let err = parse(&source, Syntax::TypeScript).unwrap_err();
        assert!(matches!(err, ParseError::Syntax { .. }), "{err}");
    }

    #[test]
    fn test_descendants_in_source_order() {
        let tree = parse("import a from 'a';\nimport b from 'b';\n", Syntax::TypeScript).unwrap();
        let strings: Vec<&str> = tree
            .root
            .descendants()
            .filter(|n| n.kind == "string")
            .map(|n| tree.text(n))
            .collect();
        assert_eq!(strings, vec!["'a'", "'b'"]);
    }
}
