//! CST (Concrete Syntax Tree) parsing for JavaScript and TypeScript.
//!
//! This module provides the parser stage of the pipeline:
//! - Tree-sitter based parsing with byte-exact node ranges
//! - Import site discovery (static, re-export, dynamic, `require`)
//! - Comment extraction for the printer
//!
//! # Design Principles
//!
//! - **Strict**: tree-sitter recovers from errors, but any `ERROR` or
//!   `MISSING` node rejects the parse so the pipeline can fall back.
//! - **Bounded**: trees are built and walked with explicit stacks, and
//!   nesting beyond [`crate::constants::MAX_NESTING_DEPTH`] is a parse error.
//! - **Byte-range anchored**: rewrites are recorded against literal ranges,
//!   never by reprinting structure.

mod comments;
mod imports;
mod parser;
mod tree;

pub use comments::{extract_comments, Comment};
pub use imports::{collect_import_sites, ImportKind, ImportSite};
pub use parser::{CstNode, CstTree, Descendants, ParseError, Parser, Point, TreeSitterParser};
pub use tree::SyntaxTree;
