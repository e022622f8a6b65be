//! Import site discovery.
//!
//! An import site is one string literal naming a module: the source of an
//! `import`/`export ... from` declaration, a TypeScript `import x = require()`
//! clause, or the sole literal argument of `import()` / `require()`.

use serde::Serialize;
use std::fmt;

use super::parser::{CstNode, CstTree};
use crate::utils::unescape_js_string;

/// How a specifier is referenced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ImportKind {
    /// `import x from 'm'`, `import 'm'`, `import x = require('m')`
    Static,
    /// `export { x } from 'm'`, `export * from 'm'`
    ReExport,
    /// `import('m')`
    Dynamic,
    /// `require('m')`
    Require,
}

impl fmt::Display for ImportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Static => "import",
            Self::ReExport => "re-export",
            Self::Dynamic => "dynamic import",
            Self::Require => "require",
        })
    }
}

/// One module specifier occurrence in the source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSite {
    /// Reference form
    pub kind: ImportKind,
    /// Decoded specifier value as written in the source
    pub specifier: String,
    /// Start of the string literal, quote included
    pub literal_start: usize,
    /// End of the string literal, quote included
    pub literal_end: usize,
    /// Delimiter used by the literal
    pub quote: char,
    /// 1-based line of the literal
    pub line: usize,
    replacement: Option<String>,
}

impl ImportSite {
    /// Specifier the printer will emit: the pending replacement if any.
    #[must_use]
    pub fn current(&self) -> &str {
        self.replacement.as_deref().unwrap_or(&self.specifier)
    }

    /// Pending replacement, if one was set and differs from the original
    #[must_use]
    pub fn replacement(&self) -> Option<&str> {
        self.replacement
            .as_deref()
            .filter(|replacement| *replacement != self.specifier)
    }

    /// Replace the specifier. Takes effect when the tree is printed.
    pub fn rewrite(&mut self, specifier: impl Into<String>) {
        self.replacement = Some(specifier.into());
    }

    /// Whether a rewrite is pending
    #[must_use]
    pub fn is_rewritten(&self) -> bool {
        self.replacement().is_some()
    }

    fn from_literal(kind: ImportKind, literal: &CstNode, tree: &CstTree) -> Option<Self> {
        if literal.kind != "string" {
            return None;
        }
        let text = tree.text(literal);
        let quote = text.chars().next()?;
        if text.len() < 2 || !matches!(quote, '\'' | '"') {
            return None;
        }
        Some(Self {
            kind,
            specifier: unescape_js_string(&text[1..text.len() - 1]),
            literal_start: literal.start_byte,
            literal_end: literal.end_byte,
            quote,
            line: literal.start_point.row + 1,
            replacement: None,
        })
    }
}

/// Collect every import site of the tree, in source order.
#[must_use]
pub fn collect_import_sites(tree: &CstTree) -> Vec<ImportSite> {
    tree.root
        .descendants()
        .filter_map(|node| match node.kind.as_str() {
            // Only the module source can be a direct string child here
            "import_statement" | "import_require_clause" => node
                .child_by_field("source")
                .or_else(|| node.named_children().find(|c| c.kind == "string"))
                .and_then(|lit| ImportSite::from_literal(ImportKind::Static, lit, tree)),
            "export_statement" => node
                .child_by_field("source")
                .and_then(|lit| ImportSite::from_literal(ImportKind::ReExport, lit, tree)),
            "call_expression" => call_site(node, tree),
            _ => None,
        })
        .collect()
}

fn call_site(call: &CstNode, tree: &CstTree) -> Option<ImportSite> {
    let callee = call.child_by_field("function")?;
    let kind = match callee.kind.as_str() {
        "import" => ImportKind::Dynamic,
        "identifier" if tree.text(callee) == "require" => ImportKind::Require,
        _ => return None,
    };

    let arguments = call.child_by_field("arguments")?;
    let mut named = arguments.named_children().filter(|n| n.kind != "comment");
    let literal = named.next()?;
    if named.next().is_some() {
        return None;
    }
    ImportSite::from_literal(kind, literal, tree)
}
