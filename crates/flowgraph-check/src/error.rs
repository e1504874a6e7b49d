//! The type-check bridge's own error types, plus [`CompileError`]: the
//! single aggregate `Result` a caller driving the whole pipeline matches on
//! (§7).

use flowgraph_lower::LowerError;
use flowgraph_syntax::{LexError, ParseError, Span};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single structured type error returned by the external type checker.
/// Thin and `Serialize`/`Deserialize`-derived: this crate does not know how
/// the real checker represents a type mismatch internally, only that it
/// gets a span and a message back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Error)]
#[error("type error at {span}: {message}")]
pub struct TypeError {
    pub span: Span,
    pub message: String,
}

/// The top-level error for the whole lex -> parse -> lower -> type-check
/// pipeline. Each stage's own error enum is wrapped unchanged so a caller
/// can match down into the original diagnostic.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CompileError {
    #[error("{0}")]
    Lex(#[from] LexError),

    #[error("{0}")]
    Parse(#[from] ParseError),

    #[error("{0}")]
    Lower(#[from] LowerError),

    #[error("type check failed with {} error(s)", .0.len())]
    TypeCheck(Vec<TypeError>),

    #[error("no function named '{0}' was declared")]
    UnknownEntry(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// A `TypeError` round-trips through JSON unchanged for any span
        /// and message -- required since it crosses the `TypeChecker`
        /// trait boundary as serialized data, not an in-process value.
        #[test]
        fn type_error_round_trips_through_json(start in 0usize..10_000, end in 0usize..10_000, message in ".*") {
            let original = TypeError { span: Span::new(start, end), message };
            let json = serde_json::to_string(&original).unwrap();
            let decoded: TypeError = serde_json::from_str(&json).unwrap();
            prop_assert_eq!(decoded, original);
        }
    }
}
