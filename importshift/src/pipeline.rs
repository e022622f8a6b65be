//! The transform pipeline: parse, apply import rules, print.
//!
//! Every call runs the three stages once, in order. Stage errors and stage
//! panics are caught at a single boundary in [`Pipeline::transform`], which
//! then returns the input unchanged with one warning describing the failure.
//! Nothing escapes to the caller.

use std::cell::Cell;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::OnceLock;

use crate::config::Config;
use crate::constants::{TRANSFORM_ERROR_PREFIX, UNKNOWN_ERROR};
use crate::cst::{Parser, TreeSitterParser};
use crate::diagnostics::{Diagnostics, TransformResult};
use crate::error::{Stage, TransformError};
use crate::options::{PartialOptions, TransformOptions};
use crate::printer::{PrintOptions, Printer, SourcePrinter};
use crate::rules::{ImportRuleEngine, SpecifierRuleEngine};

/// A configured parser, rule engine and printer.
///
/// Stages are stateless per call, so one pipeline can serve many threads.
pub struct Pipeline {
    parser: Box<dyn Parser>,
    engine: Box<dyn ImportRuleEngine>,
    printer: Box<dyn Printer>,
    base_options: PartialOptions,
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("base_options", &self.base_options)
            .finish_non_exhaustive()
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl Pipeline {
    /// Start from the built-in stages.
    #[must_use]
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::default()
    }

    /// Pipeline using a project's rules and option defaults.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::builder()
            .engine(SpecifierRuleEngine::with_rules(
                config.importshift.rules.clone(),
            ))
            .base_options(config.importshift.options())
            .build()
    }

    /// Options for one call: caller values, then the base layer, then defaults.
    #[must_use]
    pub fn resolve_options(&self, options: PartialOptions) -> TransformOptions {
        options.or(&self.base_options).resolve()
    }

    /// Rewrite the imports of `source_code`.
    ///
    /// Always returns. On any stage failure `code` is `source_code` verbatim,
    /// `changes` and `imports` are empty, and the last warning describes the
    /// failure.
    #[must_use]
    pub fn transform(&self, source_code: &str, options: PartialOptions) -> TransformResult {
        let options = self.resolve_options(options);
        let mut diagnostics = Diagnostics::new();
        let stage = Cell::new(Stage::Parse);

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            self.run_stages(source_code, &options, &mut diagnostics, &stage)
        }));

        let failure = match outcome {
            Ok(Ok(code)) => return diagnostics.finish(code),
            Ok(Err(err)) => err,
            Err(payload) => TransformError::from_panic(stage.get(), payload.as_ref()),
        };

        tracing::error!(
            stage = %failure.stage(),
            target_name = %options.target,
            error = %failure,
            "{}",
            TRANSFORM_ERROR_PREFIX
        );
        let message = failure.to_string();
        let message = if message.trim().is_empty() {
            UNKNOWN_ERROR
        } else {
            message.as_str()
        };
        diagnostics.fall_back(source_code, format!("{TRANSFORM_ERROR_PREFIX}: {message}"))
    }

    fn run_stages(
        &self,
        source_code: &str,
        options: &TransformOptions,
        diagnostics: &mut Diagnostics,
        stage: &Cell<Stage>,
    ) -> Result<String, TransformError> {
        stage.set(Stage::Parse);
        let mut tree = self.parser.parse(source_code, options)?;
        tracing::debug!(
            syntax = %options.syntax,
            imports = tree.imports().len(),
            "parsed source"
        );

        stage.set(Stage::Transform);
        let report = self.engine.apply(&mut tree, &options.target)?;
        diagnostics.absorb(report);

        stage.set(Stage::Print);
        let print_options = PrintOptions {
            comments: options.preserve_comments,
            compact: false,
            minimal_escaping: true,
        };
        let output = self.printer.print(&tree, &print_options)?;
        tracing::debug!(modified = tree.is_modified(), "printed source");
        Ok(output.code)
    }
}

/// Builder for [`Pipeline`]; unset stages use the built-ins.
#[derive(Default)]
pub struct PipelineBuilder {
    parser: Option<Box<dyn Parser>>,
    engine: Option<Box<dyn ImportRuleEngine>>,
    printer: Option<Box<dyn Printer>>,
    base_options: PartialOptions,
}

impl PipelineBuilder {
    /// Replace the parser stage
    #[must_use]
    pub fn parser(mut self, parser: impl Parser + 'static) -> Self {
        self.parser = Some(Box::new(parser));
        self
    }

    /// Replace the rule engine stage
    #[must_use]
    pub fn engine(mut self, engine: impl ImportRuleEngine + 'static) -> Self {
        self.engine = Some(Box::new(engine));
        self
    }

    /// Replace the printer stage
    #[must_use]
    pub fn printer(mut self, printer: impl Printer + 'static) -> Self {
        self.printer = Some(Box::new(printer));
        self
    }

    /// Options layered between caller values and the hard-coded defaults
    #[must_use]
    pub fn base_options(mut self, options: PartialOptions) -> Self {
        self.base_options = options;
        self
    }

    /// Finish the pipeline
    #[must_use]
    pub fn build(self) -> Pipeline {
        Pipeline {
            parser: self
                .parser
                .unwrap_or_else(|| Box::new(TreeSitterParser::new())),
            engine: self
                .engine
                .unwrap_or_else(|| Box::new(SpecifierRuleEngine::new())),
            printer: self
                .printer
                .unwrap_or_else(|| Box::new(SourcePrinter::new())),
            base_options: self.base_options,
        }
    }
}

fn default_pipeline() -> &'static Pipeline {
    static PIPELINE: OnceLock<Pipeline> = OnceLock::new();
    PIPELINE.get_or_init(Pipeline::default)
}

/// Rewrite the imports of `source_code` with the built-in stages.
///
/// See [`Pipeline::transform`] for the failure contract.
#[must_use]
pub fn transform(source_code: &str, options: PartialOptions) -> TransformResult {
    default_pipeline().transform(source_code, options)
}

/// Stable entry point for upstream tooling.
#[derive(Debug, Clone, Copy, Default)]
pub struct AstTransformer;

impl AstTransformer {
    /// Same as [`transform`].
    #[must_use]
    pub fn transform(source_code: &str, options: PartialOptions) -> TransformResult {
        transform(source_code, options)
    }
}
