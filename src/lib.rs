//! # Introduction
//!
//! sniprun runs short, possibly incomplete Java snippets and reports their
//! console output or diagnostics. A snippet does not need a class or a
//! `main` method; bare statements are wrapped before anything runs.
//!
//! ## Execution pipeline
//!
//! ```text
//! Source → Security screen → SourceUnit → Native tier ─┬→ ExecutionResult
//!                                                      └→ Interpreter tier (fallback)
//! ```
//!
//! 1. [`orchestrator`]: [`Engine::execute`], the deny-list
//!    [`orchestrator::SecurityValidator`] and the serialized
//!    [`orchestrator::ExecutionWorker`].
//! 2. [`source`]: normalization of a snippet into a compilable
//!    [`source::SourceUnit`] with a line map back to the submitted text.
//! 3. [`native`]: compile with an external `javac`, launch with `java`
//!    under a wall-clock timeout, parse compiler diagnostics.
//! 4. [`interpreter`]: statement-by-statement fallback over the `main`
//!    body, built on [`parser`] and [`runtime`].
//! 5. [`config`] and [`result`]: policy in, [`ExecutionResult`] out.
//!
//! ## Supported interpreter subset
//!
//! Declarations, assignment (plain and compound), `++`/`--`,
//! `System.out.print`/`println`, counted and enhanced `for`, `while`,
//! `List`/`Map` construction with `add`/`put`, and expressions with numeric
//! promotion, string concatenation, casts and the ternary operator.
//! Conditionals, exceptions and user-defined methods are skipped.
//!
//! ## Example
//!
//! ```
//! use sniprun::{Engine, EngineConfig};
//!
//! let engine = Engine::new(EngineConfig::interpreter_only());
//! let result = engine.execute("System.out.println(\"n=\" + (1 + 2));");
//! assert!(result.success);
//! assert_eq!(result.output, "n=3\n");
//! ```

pub mod config;
pub mod interpreter;
pub mod native;
pub mod orchestrator;
pub mod parser;
pub mod result;
pub mod runtime;
pub mod source;

pub use config::{EngineConfig, ExecutionPolicy, NativeConfig, SecurityRule};
pub use orchestrator::{Engine, ExecutionWorker};
pub use result::{Diagnostic, ExecutionResult, ExecutionTier, Severity};
