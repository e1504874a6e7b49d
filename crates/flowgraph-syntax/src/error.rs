//! Syntax-stage errors. Every variant carries the [`Span`] of the offending
//! text so a host can point a user (or an AI agent) straight at it.

use thiserror::Error;

use crate::span::Span;
use crate::token::TokenKind;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum LexError {
    #[error("unrecognized character '{ch}' at {span}")]
    UnrecognizedChar { ch: char, span: Span },

    #[error("unterminated string literal starting at {span}")]
    UnterminatedString { span: Span },

    #[error("invalid escape sequence '\\{ch}' at {span}")]
    InvalidEscape { ch: char, span: Span },
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParseError {
    #[error("{0}")]
    Lex(#[from] LexError),

    #[error("expected {expected}, found {found} at {span}")]
    Unexpected {
        expected: String,
        found: TokenKind,
        span: Span,
    },

    #[error("a call's argument list may not mix named and positional arguments, at {span}")]
    MixedArgumentStyle { span: Span },
}
