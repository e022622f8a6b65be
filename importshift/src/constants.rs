//! Shared constants: file names, defaults and diagnostic prefixes.

/// Name of the dedicated configuration file.
pub const CONFIG_FILENAME: &str = ".importshift.toml";

/// Name of the npm manifest that may carry an `"importshift"` section.
pub const PACKAGE_JSON_FILENAME: &str = "package.json";

/// Key of the configuration section in both config file formats.
pub const CONFIG_SECTION: &str = "importshift";

/// Target convention used when the caller names none.
pub const DEFAULT_TARGET: &str = "react-vite";

/// Prefix of the warning recorded when the pipeline falls back.
pub const TRANSFORM_ERROR_PREFIX: &str = "AST transformation error";

/// Message used when a failure carries no readable message.
pub const UNKNOWN_ERROR: &str = "Unknown error";

/// Deepest CST the parser will build. Deeper input is rejected as a parse
/// error so the tree walks downstream stay bounded.
pub const MAX_NESTING_DEPTH: usize = 1000;
