//! The parsed program handed between pipeline stages.

use super::comments::{extract_comments, Comment};
use super::imports::{collect_import_sites, ImportSite};
use super::parser::{CstNode, CstTree};
use crate::options::Syntax;

/// Parsed source plus its import sites.
///
/// The rule engine mutates the tree in place through [`SyntaxTree::imports_mut`];
/// the printer reads the pending rewrites back out.
#[derive(Debug)]
pub struct SyntaxTree {
    cst: CstTree,
    syntax: Syntax,
    imports: Vec<ImportSite>,
}

impl SyntaxTree {
    /// Wrap a CST and index its import sites.
    #[must_use]
    pub fn new(cst: CstTree, syntax: Syntax) -> Self {
        let imports = collect_import_sites(&cst);
        Self {
            cst,
            syntax,
            imports,
        }
    }

    /// Original source text
    #[must_use]
    pub fn source(&self) -> &str {
        &self.cst.source
    }

    /// Root CST node
    #[must_use]
    pub fn root(&self) -> &CstNode {
        &self.cst.root
    }

    /// Dialect the source was parsed under
    #[must_use]
    pub fn syntax(&self) -> Syntax {
        self.syntax
    }

    /// Import sites in source order
    #[must_use]
    pub fn imports(&self) -> &[ImportSite] {
        &self.imports
    }

    /// Mutable import sites, for rule engines
    pub fn imports_mut(&mut self) -> &mut [ImportSite] {
        &mut self.imports
    }

    /// Comments in source order
    #[must_use]
    pub fn comments(&self) -> Vec<Comment> {
        extract_comments(&self.cst)
    }

    /// Byte ranges of template literals, whose contents are whitespace-sensitive
    #[must_use]
    pub fn template_ranges(&self) -> Vec<(usize, usize)> {
        self.cst
            .root
            .find_by_kind("template_string")
            .into_iter()
            .map(|node| (node.start_byte, node.end_byte))
            .collect()
    }

    /// Whether any import site carries a pending rewrite
    #[must_use]
    pub fn is_modified(&self) -> bool {
        self.imports.iter().any(ImportSite::is_rewritten)
    }
}
