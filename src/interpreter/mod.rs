//! Fallback interpreter
//!
//! This module runs a snippet without a compiler:
//! - [`engine`]: The [`Interpreter`] driver, `main` body extraction, limits
//! - [`splitter`]: Method body text → top-level statements
//! - [`statements`]: Statement dispatch (print, declarations, assignment, mutation)
//! - [`loops`]: `for`, enhanced `for` and `while`
//! - [`expressions`]: Expression evaluation with raw-text fallback
//! - [`ops`]: Operator semantics and numeric promotion
//! - [`builtins`]: Collection types and the member-call allow-list
//! - [`terminal`]: Captured `System.out` output
//! - [`errors`]: Runtime error types
//!
//! # Execution Model
//!
//! A single linear pass over the `main` body. Each statement is matched
//! against a fixed set of shapes; statements that match none are skipped.
//! Loops re-run their body once per iteration. There is no call stack:
//! methods other than `main` are never entered.

pub mod builtins;
pub mod engine;
pub mod errors;
pub mod expressions;
pub mod loops;
pub mod ops;
pub mod splitter;
pub mod statements;
pub mod terminal;

pub use engine::{Interpreter, InterpreterLimits};
pub use errors::InterpreterError;
pub use expressions::evaluate;
