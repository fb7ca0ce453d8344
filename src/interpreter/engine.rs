// Execution engine for the fallback interpreter

use crate::config::ExecutionPolicy;
use crate::interpreter::errors::InterpreterError;
use crate::interpreter::splitter::{extract_main_body, line_at, split_statements, Statement};
use crate::interpreter::terminal::CapturedOutput;
use crate::parser::Parser;
use crate::result::{Diagnostic, ExecutionResult, ExecutionTier};
use crate::runtime::Environment;
use crate::source::SourceUnit;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Resource bounds for one interpreter run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterpreterLimits {
    pub max_loop_iterations: usize,
    pub max_output_bytes: usize,
    pub timeout: Duration,
}

impl From<&ExecutionPolicy> for InterpreterLimits {
    fn from(policy: &ExecutionPolicy) -> Self {
        Self {
            max_loop_iterations: policy.max_loop_iterations,
            max_output_bytes: policy.max_output_bytes,
            timeout: policy.timeout(),
        }
    }
}

impl Default for InterpreterLimits {
    fn default() -> Self {
        Self::from(&ExecutionPolicy::default())
    }
}

/// Statement-by-statement interpreter for the `main` body of a snippet
pub struct Interpreter {
    /// Variable environment, fresh for every run
    pub(crate) env: Environment,

    /// Mock terminal for `System.out` output
    pub(crate) terminal: CapturedOutput,

    pub(crate) limits: InterpreterLimits,

    /// Wall-clock bound of the current run
    deadline: Option<Instant>,
}

impl Interpreter {
    pub fn new(limits: InterpreterLimits) -> Self {
        Self {
            env: Environment::new(),
            terminal: CapturedOutput::new(limits.max_output_bytes),
            limits,
            deadline: None,
        }
    }

    /// Run the `main` body of `unit`.
    ///
    /// Succeeds unless a resource bound is hit; in that case the result
    /// carries the error and whatever was printed before it.
    pub fn interpret(&mut self, unit: &SourceUnit) -> ExecutionResult {
        let started = Instant::now();
        self.env.clear();
        self.terminal = CapturedOutput::new(self.limits.max_output_bytes);
        self.deadline = started.checked_add(self.limits.timeout);

        let statements = main_statements(unit);
        debug!(statements = statements.len(), entry = unit.entry_type_name(), "interpreting");

        let result = match self.execute_block(&statements) {
            Ok(()) => {
                info!(bytes = self.terminal.as_str().len(), "interpreter run finished");
                ExecutionResult::success(self.terminal.as_str(), ExecutionTier::Interpreter)
            }
            Err(err) => {
                let err = match err {
                    InterpreterError::LoopLimitExceeded { limit, line } => InterpreterError::LoopLimitExceeded {
                        limit,
                        line: unit.raw_line(line).unwrap_or(line),
                    },
                    other => other,
                };
                warn!(error = %err, "interpreter run stopped");
                let line = err.line();
                ExecutionResult::failure(
                    format!("Runtime error: {}", err),
                    vec![Diagnostic::error(err.to_string()).at_line(line)],
                    ExecutionTier::Interpreter,
                )
                .with_output(self.terminal.as_str())
            }
        };
        self.deadline = None;
        result.with_duration(started.elapsed())
    }

    /// Normalize `source` and interpret it
    pub fn run_source(&mut self, source: &str) -> ExecutionResult {
        self.interpret(&SourceUnit::new(source))
    }

    /// Output printed by the most recent run
    pub fn output(&self) -> &str {
        self.terminal.as_str()
    }

    /// Variables left bound by the most recent run
    pub fn environment(&self) -> &Environment {
        &self.env
    }

    pub(crate) fn check_deadline(&self) -> Result<(), InterpreterError> {
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Err(InterpreterError::DeadlineExceeded {
                limit: self.limits.timeout,
            }),
            _ => Ok(()),
        }
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new(InterpreterLimits::default())
    }
}

/// Statements of the `main` body: located structurally when the unit
/// parses, by brace matching when it does not, and the whole text as a
/// last resort.
fn main_statements(unit: &SourceUnit) -> Vec<Statement> {
    let text = unit.normalized();

    let structural = Parser::new(text)
        .and_then(|mut parser| parser.parse_compilation_unit())
        .map(|compilation_unit| compilation_unit.find_static_main().and_then(|main| main.body));
    match structural {
        Ok(Some(body)) => return split_statements(body.text(text), line_at(text, body.start)),
        Ok(None) => debug!("no static main declared"),
        Err(err) => debug!(error = %err, "structural main extraction failed"),
    }

    if let Some((offset, body)) = extract_main_body(text) {
        return split_statements(body, line_at(text, offset));
    }

    debug!("interpreting the whole text");
    split_statements(text, 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::Value;
    use pretty_assertions::assert_eq;

    fn run(source: &str) -> ExecutionResult {
        Interpreter::default().run_source(source)
    }

    #[test]
    fn test_hello_world() {
        let result = run("System.out.println(\"Hello, World!\");");
        assert!(result.success);
        assert_eq!(result.output, "Hello, World!\n");
        assert_eq!(result.tier, ExecutionTier::Interpreter);
    }

    #[test]
    fn test_no_output_message() {
        let result = run("int x = 1;");
        assert!(result.success);
        assert_eq!(result.output, crate::result::NO_OUTPUT_MESSAGE);
    }

    #[test]
    fn test_environment_is_fresh_per_run() {
        let mut interpreter = Interpreter::default();
        interpreter.run_source("int x = 1;");
        assert_eq!(interpreter.environment().get("x"), Some(&Value::Int(1)));
        interpreter.run_source("System.out.println(x);");
        assert_eq!(interpreter.output(), "x\n");
    }

    #[test]
    fn test_broken_class_falls_back_to_brace_matching() {
        // `#` does not lex, but the main body can still be found.
        let source = "public class Broken {\n  int x = #;\n  public static void main(String[] args) {\n    System.out.println(1 + 1);\n  }\n}";
        let result = run(source);
        assert_eq!(result.output, "2\n");
    }

    #[test]
    fn test_loop_limit_reports_raw_line() {
        let mut interpreter = Interpreter::new(InterpreterLimits {
            max_loop_iterations: 5,
            ..InterpreterLimits::default()
        });
        let result = interpreter.run_source("System.out.println(\"start\");\nfor (;;) { }");
        assert!(!result.success);
        assert_eq!(
            result.error_message.as_deref(),
            Some("Runtime error: loop at line 2 exceeded 5 iterations")
        );
        assert_eq!(result.output, "start\n");
        assert_eq!(result.diagnostics[0].source_line, Some(2));
    }

    #[test]
    fn test_deadline() {
        let mut interpreter = Interpreter::new(InterpreterLimits {
            timeout: Duration::ZERO,
            ..InterpreterLimits::default()
        });
        let result = interpreter.run_source("System.out.println(1);");
        assert!(!result.success);
        assert_eq!(
            result.error_message.as_deref(),
            Some("Runtime error: Execution timeout exceeded (0 seconds)")
        );
    }
}
