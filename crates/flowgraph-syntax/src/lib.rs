//! Lexing and parsing for the dataflow source language: `&str` in,
//! [`ast::Program`] out. No semantic analysis happens here -- that is
//! `flowgraph-lower`'s job.

pub mod ast;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod span;
pub mod token;

pub use ast::{
    ArgList, CallExpr, ConstExpr, Declaration, FuncDef, Ident, Instruction, OutportExpr, PortRef,
    Program, Signature, TypeAliasDecl, TypeExpr,
};
pub use error::{LexError, ParseError};
pub use lexer::{lex, Lexer};
pub use parser::{parse, Parser};
pub use span::Span;
pub use token::{keyword, Token, TokenKind};
