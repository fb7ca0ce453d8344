//! Java source parser
//!
//! This module turns snippet text into the structures the interpreter works
//! with:
//! - [`lexer`]: Tokenization (source text → tokens with byte spans)
//! - [`parse`]: The [`Parser`] cursor, shared helpers and [`ParseError`]
//! - [`expressions`]: Single expressions (tokens → [`ast::Expr`])
//! - [`declarations`]: Class and method skeletons (tokens → [`ast::CompilationUnit`])
//! - [`scan`]: Literal/comment-aware text scanning for passes that work on raw text
//! - [`ast`]: Node definitions
//!
//! # Scope
//!
//! Statements are never parsed into a tree. The interpreter splits method
//! bodies into statement text itself and only calls into the parser for
//! expressions and for locating `static main`.
//!
//! # Parser Implementation
//!
//! Hand-written recursive descent parser with precedence climbing for binary operators.
//! No external parser generator dependencies.

pub mod ast;
pub mod declarations;
pub mod expressions;
pub mod lexer;
pub mod parse;
pub mod scan;

pub use parse::{ParseError, Parser};
