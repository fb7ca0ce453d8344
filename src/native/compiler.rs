//! Batch compiler invocation and diagnostic parsing
//!
//! The compiler's stdout and stderr are read as one diagnostic stream. Two
//! formats are understood:
//!
//! - `javac`: `File.java:3: error: ';' expected`, followed by a source echo
//!   and a caret line
//! - Eclipse-style blocks: `1. ERROR in File.java (at line 3)`, the source
//!   echo, a caret line and the message, separated by `----------`
//!
//! Lines carrying an error marker, a stack-trace marker or a `File.java:N:`
//! position become error diagnostics; `warning:` lines become warnings;
//! everything else is noise.

use crate::config::NativeConfig;
use crate::native::classpath::{classpath_args, ClasspathSetting};
use crate::native::runner::run_with_timeout;
use crate::native::NativeError;
use crate::result::{Diagnostic, Severity};
use crate::source::SourceUnit;
use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;
use tracing::{debug, trace};

const BLOCK_SEPARATOR: &str = "----------";

/// Full compiler argument list for one source file
pub fn compiler_args(
    config: &NativeConfig,
    classes_dir: &Path,
    source_file: &Path,
    setting: Option<&ClasspathSetting>,
) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec![
        "-d".into(),
        classes_dir.as_os_str().to_owned(),
        "-source".into(),
        config.source_version.as_str().into(),
        "-target".into(),
        config.target_version.as_str().into(),
        "-nowarn".into(),
        "-g".into(),
        "-encoding".into(),
        config.encoding.as_str().into(),
        "-proc:none".into(),
    ];
    args.extend(classpath_args(setting, classes_dir));
    args.push(source_file.as_os_str().to_owned());
    args
}

/// Compile `source_file` and return the path of the entry class file
pub fn compile(
    config: &NativeConfig,
    classes_dir: &Path,
    source_file: &Path,
    setting: Option<&ClasspathSetting>,
    unit: &SourceUnit,
    timeout: Duration,
) -> Result<PathBuf, NativeError> {
    let mut command = Command::new(&config.compiler);
    command.args(compiler_args(config, classes_dir, source_file, setting));
    debug!(compiler = %config.compiler, source = %source_file.display(), "compiling");

    let output = run_with_timeout(&mut command, timeout).map_err(|err| {
        if err.kind() == io::ErrorKind::NotFound {
            NativeError::CompilerUnavailable {
                compiler: config.compiler.clone(),
                source: err,
            }
        } else {
            NativeError::Io(err)
        }
    })?;

    if output.timed_out {
        return Err(NativeError::CompilationFailed {
            diagnostics: vec![Diagnostic::error(format!(
                "Compiler did not finish within {} ms",
                timeout.as_millis()
            ))],
        });
    }

    let combined = format!("{}\n{}", output.stdout, output.stderr);
    let diagnostics = parse_diagnostics(&combined, unit);
    let has_errors = diagnostics.iter().any(Diagnostic::is_error);

    if has_errors || !output.success() {
        let mut diagnostics = diagnostics;
        if !has_errors {
            diagnostics.push(Diagnostic::error(format!(
                "Compiler exited with status {}",
                output.exit_code.map_or_else(|| "unknown".to_string(), |c| c.to_string())
            )));
        }
        return Err(NativeError::CompilationFailed { diagnostics });
    }

    let class_file = classes_dir.join(unit.class_file());
    if !class_file.is_file() {
        return Err(NativeError::ArtifactMissing);
    }
    Ok(class_file)
}

/// Parse a combined compiler stream. Line numbers are mapped back to the
/// raw snippet through `unit`.
pub fn parse_diagnostics(output: &str, unit: &SourceUnit) -> Vec<Diagnostic> {
    if output.lines().any(|line| is_block_header(strip_ordinal(line.trim()))) {
        parse_blocks(output, unit)
    } else {
        parse_lines(output, unit)
    }
}

fn parse_lines(output: &str, unit: &SourceUnit) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    for line in output.lines() {
        let line = line.trim();
        if line.is_empty() || line == BLOCK_SEPARATOR || is_summary(line) {
            continue;
        }

        let position = java_position(line);
        let severity = if line.contains("warning:") {
            Severity::Warning
        } else if position.is_some()
            || line.contains("error")
            || line.contains("ERROR")
            || line.contains("Exception")
            || line.contains("at line")
        {
            Severity::Error
        } else {
            trace!(line, "compiler noise");
            continue;
        };

        let (normalized_line, message) = match position {
            Some((number, rest)) => (Some(number), rest),
            None => (at_line_number(line), line),
        };
        let message = message
            .trim()
            .trim_start_matches("error:")
            .trim_start_matches("warning:")
            .trim();

        let diagnostic = Diagnostic::error(message).at_line(normalized_line.and_then(|n| unit.raw_line(n)));
        diagnostics.push(match severity {
            Severity::Error => diagnostic,
            Severity::Warning => diagnostic.into_warning(),
        });
    }

    diagnostics
}

fn parse_blocks(output: &str, unit: &SourceUnit) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    let mut block: Vec<&str> = Vec::new();

    for line in output.lines().chain(std::iter::once(BLOCK_SEPARATOR)) {
        if line.trim() != BLOCK_SEPARATOR {
            block.push(line);
            continue;
        }

        let header = block.iter().map(|l| strip_ordinal(l.trim())).find(|l| is_block_header(l));
        if let Some(header) = header {
            let message = block
                .iter()
                .rev()
                .map(|l| l.trim())
                .find(|l| !l.is_empty() && !is_summary(l))
                .unwrap_or(header);
            let raw_line = at_line_number(header).and_then(|n| unit.raw_line(n));
            let diagnostic = Diagnostic::error(message).at_line(raw_line);
            diagnostics.push(if header.starts_with("WARNING") {
                diagnostic.into_warning()
            } else {
                diagnostic
            });
        }
        block.clear();
    }

    diagnostics
}

fn is_block_header(line: &str) -> bool {
    (line.starts_with("ERROR in ") || line.starts_with("WARNING in ")) && line.contains("(at line")
}

/// `1. ERROR in ...` → `ERROR in ...`
fn strip_ordinal(line: &str) -> &str {
    let digits = line.bytes().take_while(u8::is_ascii_digit).count();
    if digits > 0 {
        if let Some(rest) = line[digits..].strip_prefix(". ") {
            return rest;
        }
    }
    line
}

/// `3 errors`, `1 warning`, `2 problems (2 errors)`
fn is_summary(line: &str) -> bool {
    let mut words = line.split_whitespace();
    let count_first = words.next().is_some_and(|w| w.chars().all(|c| c.is_ascii_digit()));
    let noun = words.next().unwrap_or("");
    count_first
        && matches!(
            noun.trim_end_matches(','),
            "error" | "errors" | "warning" | "warnings" | "problem" | "problems"
        )
}

/// `path/File.java:12: rest` → `(12, "rest")`
fn java_position(line: &str) -> Option<(usize, &str)> {
    let at = line.find(".java:")?;
    let after = &line[at + ".java:".len()..];
    let digits = after.bytes().take_while(u8::is_ascii_digit).count();
    let number = after[..digits].parse().ok()?;
    let rest = after[digits..].strip_prefix(':')?;
    Some((number, rest))
}

/// Number following `at line `
fn at_line_number(line: &str) -> Option<usize> {
    let at = line.find("at line ")?;
    let after = &line[at + "at line ".len()..];
    let digits = after.bytes().take_while(u8::is_ascii_digit).count();
    after[..digits].parse().ok()
}
