//! Execution orchestration
//!
//! [`Engine::execute`] is the single entry point callers use:
//!
//! 1. Empty or whitespace-only input fails immediately.
//! 2. The [`SecurityValidator`] screens the text; a violation ends the run.
//! 3. The snippet is normalized into a [`SourceUnit`].
//! 4. The native tier compiles and runs it.
//! 5. If the native tier fails for a reason other than a timeout, the
//!    interpreter runs the same unit and its result is returned instead,
//!    marked with `used_fallback`.
//!
//! Every failure becomes an [`ExecutionResult`]; nothing is propagated.

pub mod security;
pub mod worker;

pub use security::{SecurityValidator, SecurityViolation};
pub use worker::{ExecutionTicket, ExecutionWorker};

use crate::config::EngineConfig;
use crate::interpreter::{Interpreter, InterpreterLimits};
use crate::native::{ClasspathResolver, NativeError, NativeStrategy};
use crate::result::{Diagnostic, ExecutionResult, ExecutionTier};
use crate::source::SourceUnit;
use std::sync::{Mutex, PoisonError};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Error message for empty or whitespace-only input
pub const EMPTY_SOURCE_MESSAGE: &str = "empty source";

/// Error message for a snippet rejected by the deny-list
pub const UNSAFE_CODE_MESSAGE: &str = "Code contains unsafe operations";

#[derive(Debug)]
pub struct Engine {
    config: EngineConfig,
    validator: SecurityValidator,
    native: NativeStrategy,
    /// Held for the duration of a run; native runs must not share scratch directories
    run_lock: Mutex<()>,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            validator: SecurityValidator::from_policy(&config.policy),
            native: NativeStrategy::new(&config.native, &config.policy),
            config,
            run_lock: Mutex::new(()),
        }
    }

    /// Replace the standard classpath probe order
    pub fn with_classpath_resolver(mut self, resolver: ClasspathResolver) -> Self {
        self.native = self.native.with_resolver(resolver);
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn execute(&self, source: &str) -> ExecutionResult {
        let started = Instant::now();
        let result = self.run(source);
        info!(
            success = result.success,
            tier = ?result.tier,
            used_fallback = result.used_fallback,
            "execution finished"
        );
        result.with_duration(started.elapsed())
    }

    fn run(&self, source: &str) -> ExecutionResult {
        if source.trim().is_empty() {
            return ExecutionResult::failure(EMPTY_SOURCE_MESSAGE, Vec::new(), ExecutionTier::None);
        }

        if let Err(violation) = self.validator.validate(source) {
            warn!(pattern = %violation.pattern, "snippet rejected");
            return ExecutionResult::failure(
                UNSAFE_CODE_MESSAGE,
                vec![Diagnostic::error(format!("Security violation: {}", violation))],
                ExecutionTier::None,
            );
        }

        let unit = SourceUnit::new(source);
        let _guard = self.run_lock.lock().unwrap_or_else(PoisonError::into_inner);

        if !self.native.is_enabled() {
            debug!("native tier disabled");
            return self.interpret(&unit);
        }

        let native_err = match self.native.run(&unit) {
            Ok(run) => return ExecutionResult::success(run.output(), ExecutionTier::Native),
            Err(err) => err,
        };

        if native_err.is_fatal() {
            warn!(error = %native_err, "native run aborted");
            return native_err.to_result();
        }
        if native_err.is_runtime_failure() && !self.config.policy.fallback_on_runtime_error {
            return native_err.to_result();
        }

        warn!(error = %native_err, "native tier failed, falling back to interpreter");
        self.fall_back(&unit, &native_err)
    }

    fn interpret(&self, unit: &SourceUnit) -> ExecutionResult {
        Interpreter::new(InterpreterLimits::from(&self.config.policy)).interpret(unit)
    }

    fn fall_back(&self, unit: &SourceUnit, native_err: &NativeError) -> ExecutionResult {
        let fallback = self.interpret(unit);

        if fallback.success {
            let mut carried: Vec<Diagnostic> = native_err
                .diagnostics()
                .into_iter()
                .filter(Diagnostic::is_error)
                .map(Diagnostic::into_warning)
                .collect();
            if native_err.is_runtime_failure() {
                carried.push(Diagnostic::warning(both_failed_message(native_err)));
            }
            let mut result = fallback.with_diagnostics(carried);
            result.used_fallback = true;
            return result;
        }

        // Both tiers failed: report the native failure, with the interpreter's
        // error as an extra diagnostic.
        let output = match native_err.partial_output() {
            Some(output) if !output.is_empty() => output.to_string(),
            _ => fallback.output,
        };
        let mut diagnostics = native_err.diagnostics();
        diagnostics.extend(fallback.diagnostics);
        ExecutionResult::failure(both_failed_message(native_err), diagnostics, ExecutionTier::Native).with_output(output)
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

fn both_failed_message(err: &NativeError) -> String {
    match err {
        NativeError::CompilationFailed { .. } => err.to_string(),
        NativeError::Invocation { .. } => format!("Execution failed: {}", err),
        _ => format!("Compilation failed: {}", err),
    }
}
