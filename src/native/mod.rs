//! Native compilation tier
//!
//! [`NativeStrategy`] turns a [`SourceUnit`] into a real program run:
//!
//! ```text
//! balance check → scratch dirs → write source → resolve classpath → compile → launch
//! ```
//!
//! Each stage short-circuits with a [`NativeError`]. The scratch space is
//! dropped (and wiped) on every exit path, including errors from the later
//! stages.

pub mod classpath;
pub mod compiler;
pub mod runner;
pub mod scratch;
pub mod syntax;

pub use classpath::{ClasspathProbe, ClasspathResolver, ClasspathSetting};
pub use runner::NativeRun;

use crate::config::{ExecutionPolicy, NativeConfig};
use crate::interpreter::errors::format_timeout;
use crate::result::{Diagnostic, ExecutionResult, ExecutionTier};
use crate::source::SourceUnit;
use scratch::ScratchSpace;
use std::io;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum NativeError {
    /// Unbalanced delimiters or an unterminated literal in the raw snippet
    #[error("{message}")]
    SyntaxImbalance { message: String, line: Option<usize> },

    #[error("compiler `{compiler}` is not available: {source}")]
    CompilerUnavailable {
        compiler: String,
        #[source]
        source: io::Error,
    },

    #[error("Compilation failed")]
    CompilationFailed { diagnostics: Vec<Diagnostic> },

    #[error("Class file was not generated - compilation may have failed silently")]
    ArtifactMissing,

    #[error("Execution timeout exceeded ({})", format_timeout(.limit))]
    Timeout { limit: Duration, output: String },

    /// The program started but exited abnormally
    #[error("{message}")]
    Invocation { message: String, output: String },

    #[error("launcher `{launcher}` could not be started: {source}")]
    LauncherUnavailable {
        launcher: String,
        #[source]
        source: io::Error,
    },

    #[error("scratch space error: {0}")]
    Io(#[from] io::Error),
}

impl NativeError {
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        match self {
            NativeError::SyntaxImbalance { message, line } => {
                vec![Diagnostic::error(message.clone()).at_line(*line)]
            }
            NativeError::CompilationFailed { diagnostics } => diagnostics.clone(),
            _ => Vec::new(),
        }
    }

    /// Output the program produced before it failed
    pub fn partial_output(&self) -> Option<&str> {
        match self {
            NativeError::Timeout { output, .. } | NativeError::Invocation { output, .. } => Some(output),
            _ => None,
        }
    }

    /// The program itself ran and failed, as opposed to never starting
    pub fn is_runtime_failure(&self) -> bool {
        matches!(self, NativeError::Invocation { .. })
    }

    /// Failures that end the run without trying another tier
    pub fn is_fatal(&self) -> bool {
        matches!(self, NativeError::Timeout { .. })
    }

    pub fn to_result(&self) -> ExecutionResult {
        let result = ExecutionResult::failure(self.to_string(), self.diagnostics(), ExecutionTier::Native);
        match self.partial_output() {
            Some(output) => result.with_output(output),
            None => result,
        }
    }
}

#[derive(Debug)]
pub struct NativeStrategy {
    config: NativeConfig,
    resolver: ClasspathResolver,
    timeout: Duration,
    compile_timeout: Duration,
}

impl NativeStrategy {
    pub fn new(config: &NativeConfig, policy: &ExecutionPolicy) -> Self {
        Self {
            resolver: ClasspathResolver::from_config(config),
            config: config.clone(),
            timeout: policy.timeout(),
            compile_timeout: policy.compile_timeout(),
        }
    }

    /// Replace the standard probe order
    pub fn with_resolver(mut self, resolver: ClasspathResolver) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Compile and launch `unit`, returning what the program printed
    pub fn run(&self, unit: &SourceUnit) -> Result<NativeRun, NativeError> {
        syntax::check_balance(unit.raw())?;

        let scratch = ScratchSpace::create(self.config.work_dir.as_deref())?;
        let source_file = scratch.write_source(unit)?;
        let setting = self.resolver.resolve();
        let classes_dir = scratch.classes_dir();

        let class_file = compiler::compile(
            &self.config,
            &classes_dir,
            &source_file,
            setting.as_ref(),
            unit,
            self.compile_timeout,
        )?;
        debug!(class_file = %class_file.display(), "compiled");

        runner::launch(&self.config.launcher, &classes_dir, &scratch.tmp_dir(), unit, self.timeout)
    }

    pub fn compile_and_run(&self, unit: &SourceUnit) -> ExecutionResult {
        let started = Instant::now();
        let result = match self.run(unit) {
            Ok(run) => {
                info!(entry = unit.entry_type_name(), "native run succeeded");
                ExecutionResult::success(run.output(), ExecutionTier::Native)
            }
            Err(err) => {
                debug!(error = %err, "native run failed");
                err.to_result()
            }
        };
        result.with_duration(started.elapsed())
    }
}
