//! Import specifier rewriting for JavaScript and TypeScript modules.
//!
//! Given the source of one module, importshift rewrites its import
//! declarations to match a target bundler/runtime convention and leaves every
//! other byte alone. The work happens in three stages (parse, apply rules,
//! print) behind a boundary that never fails: on any internal error the
//! original source comes back with a warning.
//!
//! ```
//! use importshift::{transform, PartialOptions};
//!
//! let result = transform("const x = {", PartialOptions::new());
//! assert_eq!(result.code, "const x = {");
//! assert_eq!(result.warnings.len(), 1);
//! ```

#![allow(
    clippy::similar_names,
    clippy::map_unwrap_or,
    clippy::items_after_statements
)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

/// Module for loading configuration files.
pub mod config;

/// Module containing shared constants.
pub mod constants;

/// Module containing the CST parser stage and the syntax tree.
pub mod cst;

/// Module defining the transform result and diagnostics accumulator.
pub mod diagnostics;

/// Module defining the pipeline error type.
pub mod error;

/// Module defining transform options and their merge.
pub mod options;

/// Module orchestrating the parse, rules and print stages.
pub mod pipeline;

/// Module containing the printer stage.
pub mod printer;

/// Module containing the byte-range rewriter used by the printer.
pub mod rewrite;

/// Module containing the import rule engine stage.
pub mod rules;

/// Module containing string literal helpers.
pub mod utils;

pub use diagnostics::TransformResult;
pub use options::{PartialOptions, Syntax, TransformOptions};
pub use pipeline::{transform, AstTransformer, Pipeline};
