//! Child process execution with a wall-clock bound
//!
//! Used for both the compiler and the program launch. Standard output and
//! error are drained on reader threads while the parent polls for exit; a
//! child still running at the deadline is killed and reaped. Every run is a
//! fresh process, so no loaded classes or static state survive between runs.

use crate::native::NativeError;
use crate::source::SourceUnit;
use std::io::{self, Read};
use std::path::Path;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

const POLL_INTERVAL: Duration = Duration::from_millis(5);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutput {
    /// `None` when the process was killed at the deadline
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
    pub timed_out: bool,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        !self.timed_out && self.exit_code == Some(0)
    }
}

/// Spawn `command` and wait at most `timeout` for it to finish
pub fn run_with_timeout(command: &mut Command, timeout: Duration) -> io::Result<ProcessOutput> {
    let mut child = command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()?;

    let stdout = child.stdout.take().map(spawn_reader);
    let stderr = child.stderr.take().map(spawn_reader);

    let (status, timed_out) = wait_with_deadline(&mut child, timeout)?;

    let stdout = collect(stdout);
    let stderr = collect(stderr);
    Ok(ProcessOutput {
        exit_code: if timed_out { None } else { status.code() },
        stdout,
        stderr,
        timed_out,
    })
}

fn spawn_reader<R: Read + Send + 'static>(mut reader: R) -> thread::JoinHandle<Vec<u8>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Err(err) = reader.read_to_end(&mut buf) {
            debug!(error = %err, "child stream closed early");
        }
        buf
    })
}

fn collect(handle: Option<thread::JoinHandle<Vec<u8>>>) -> String {
    let bytes = handle.and_then(|h| h.join().ok()).unwrap_or_default();
    String::from_utf8_lossy(&bytes).into_owned()
}

fn wait_with_deadline(child: &mut Child, timeout: Duration) -> io::Result<(ExitStatus, bool)> {
    let deadline = Instant::now().checked_add(timeout);

    loop {
        if let Some(status) = child.try_wait()? {
            return Ok((status, false));
        }
        if deadline.is_some_and(|d| Instant::now() >= d) {
            warn!(pid = child.id(), "killing child at deadline");
            let _ = child.kill();
            let status = child.wait()?;
            return Ok((status, true));
        }
        thread::sleep(POLL_INTERVAL);
    }
}

/// What a successfully launched program printed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NativeRun {
    pub stdout: String,
    pub stderr: String,
}

impl NativeRun {
    /// Standard output, followed by standard error under an `Errors:` header
    pub fn output(&self) -> String {
        combine_streams(&self.stdout, &self.stderr)
    }
}

pub(crate) fn combine_streams(stdout: &str, stderr: &str) -> String {
    if stderr.trim().is_empty() {
        stdout.to_string()
    } else {
        format!("{}\nErrors:\n{}", stdout, stderr)
    }
}

/// Run the compiled entry point of `unit` from `classes_dir`
pub fn launch(
    launcher: &str,
    classes_dir: &Path,
    tmp_dir: &Path,
    unit: &SourceUnit,
    timeout: Duration,
) -> Result<NativeRun, NativeError> {
    let mut command = Command::new(launcher);
    command
        .arg(format!("-Djava.io.tmpdir={}", tmp_dir.display()))
        .arg("-cp")
        .arg(classes_dir)
        .arg(unit.qualified_entry_name())
        .current_dir(tmp_dir);

    let started = Instant::now();
    let output = run_with_timeout(&mut command, timeout).map_err(|err| NativeError::LauncherUnavailable {
        launcher: launcher.to_string(),
        source: err,
    })?;
    debug!(
        elapsed_ms = started.elapsed().as_millis() as u64,
        exit_code = ?output.exit_code,
        "program finished"
    );

    if output.timed_out {
        return Err(NativeError::Timeout {
            limit: timeout,
            output: combine_streams(&output.stdout, &output.stderr),
        });
    }
    if !output.success() {
        return Err(NativeError::Invocation {
            message: invocation_message(&output),
            output: combine_streams(&output.stdout, &output.stderr),
        });
    }

    Ok(NativeRun {
        stdout: output.stdout,
        stderr: output.stderr,
    })
}

/// `Exception in thread "main" java.lang.X: msg` → `java.lang.X: msg`
fn invocation_message(output: &ProcessOutput) -> String {
    const MARKER: &str = "Exception in thread \"main\" ";

    if let Some(line) = output.stderr.lines().find(|line| line.contains(MARKER)) {
        if let Some(at) = line.find(MARKER) {
            return line[at + MARKER.len()..].trim().to_string();
        }
    }
    match output.stderr.lines().map(str::trim).find(|line| !line.is_empty()) {
        Some(line) => line.to_string(),
        None => format!(
            "Program exited with status {}",
            output.exit_code.map_or_else(|| "unknown".to_string(), |c| c.to_string())
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output(code: i32, stderr: &str) -> ProcessOutput {
        ProcessOutput {
            exit_code: Some(code),
            stdout: String::new(),
            stderr: stderr.to_string(),
            timed_out: false,
        }
    }

    #[test]
    fn test_exception_is_unwrapped() {
        let stderr = "Exception in thread \"main\" java.lang.ArithmeticException: / by zero\n\tat TempClass.main(TempClass.java:3)\n";
        assert_eq!(
            invocation_message(&output(1, stderr)),
            "java.lang.ArithmeticException: / by zero"
        );
        assert_eq!(invocation_message(&output(3, "")), "Program exited with status 3");
        assert_eq!(invocation_message(&output(1, "\nboom\n")), "boom");
    }

    #[test]
    fn test_stderr_section() {
        assert_eq!(combine_streams("out\n", ""), "out\n");
        assert_eq!(combine_streams("out\n", "warn\n"), "out\n\nErrors:\nwarn\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_captures_both_streams() {
        let mut command = Command::new("sh");
        command.args(["-c", "echo hello; echo oops 1>&2; exit 4"]);
        let result = run_with_timeout(&mut command, Duration::from_secs(10)).unwrap();
        assert_eq!(result.stdout, "hello\n");
        assert_eq!(result.stderr, "oops\n");
        assert_eq!(result.exit_code, Some(4));
        assert!(!result.success());
    }

    #[cfg(unix)]
    #[test]
    fn test_kills_at_deadline() {
        let mut command = Command::new("sleep");
        command.arg("5");
        let started = Instant::now();
        let result = run_with_timeout(&mut command, Duration::from_millis(100)).unwrap();
        assert!(result.timed_out);
        assert_eq!(result.exit_code, None);
        assert!(started.elapsed() < Duration::from_secs(4));
    }

    #[test]
    fn test_missing_program() {
        let mut command = Command::new("sniprun-definitely-not-a-program");
        let err = run_with_timeout(&mut command, Duration::from_secs(1)).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
