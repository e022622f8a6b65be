//! Pipeline error type.
//!
//! Errors never leave [`crate::transform`]; the pipeline turns them into a
//! warning on the fallback result.

use std::any::Any;
use std::fmt;
use thiserror::Error;

use crate::constants::UNKNOWN_ERROR;
use crate::cst::ParseError;
use crate::printer::PrintError;
use crate::rules::RuleError;

/// Pipeline stage, for logging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Source text to tree
    Parse,
    /// Rule engine over the tree
    Transform,
    /// Tree back to text
    Print,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Parse => "parse",
            Self::Transform => "transform",
            Self::Print => "print",
        })
    }
}

/// Any failure inside the pipeline boundary
#[derive(Debug, Error)]
pub enum TransformError {
    /// Parser stage failed
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// Rule engine failed
    #[error(transparent)]
    Rule(#[from] RuleError),
    /// Printer failed
    #[error(transparent)]
    Print(#[from] PrintError),
    /// A stage panicked
    #[error("{message}")]
    Panicked {
        /// Stage running when the panic happened
        stage: Stage,
        /// Panic payload, when it was a string
        message: String,
    },
}

impl TransformError {
    /// Stage the error came from
    #[must_use]
    pub fn stage(&self) -> Stage {
        match self {
            Self::Parse(_) => Stage::Parse,
            Self::Rule(_) => Stage::Transform,
            Self::Print(_) => Stage::Print,
            Self::Panicked { stage, .. } => *stage,
        }
    }

    /// Wrap a panic payload caught while `stage` was running
    #[must_use]
    pub fn from_panic(stage: Stage, payload: &(dyn Any + Send)) -> Self {
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| (*s).to_owned())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| UNKNOWN_ERROR.to_owned());
        Self::Panicked { stage, message }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::Syntax;

    #[test]
    fn test_stage_of_wrapped_errors() {
        let parse: TransformError = ParseError::ParseFailed(Syntax::TypeScript).into();
        assert_eq!(parse.stage(), Stage::Parse);
        let rule: TransformError = RuleError::Failed("x".to_owned()).into();
        assert_eq!(rule.stage(), Stage::Transform);
        let print: TransformError = PrintError::Failed("y".to_owned()).into();
        assert_eq!(print.stage(), Stage::Print);
    }

    #[test]
    fn test_panic_payloads() {
        let from_str = TransformError::from_panic(Stage::Print, &"static message");
        assert_eq!(from_str.to_string(), "static message");

        let owned: Box<dyn Any + Send> = Box::new(String::from("owned message"));
        let from_string = TransformError::from_panic(Stage::Transform, owned.as_ref());
        assert_eq!(from_string.to_string(), "owned message");
        assert_eq!(from_string.stage(), Stage::Transform);

        let opaque: Box<dyn Any + Send> = Box::new(42_u32);
        let unknown = TransformError::from_panic(Stage::Parse, opaque.as_ref());
        assert_eq!(unknown.to_string(), "Unknown error");
    }
}
