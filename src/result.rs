//! Execution results and diagnostics
//!
//! [`ExecutionResult`] is the only value that crosses the engine boundary.
//! Its constructors keep the invariant that a successful result never carries
//! an error message; diagnostics on a successful result are warnings.

use serde::Serialize;
use std::fmt;
use std::time::Duration;

/// Output reported when a program ran to completion without printing anything
pub const NO_OUTPUT_MESSAGE: &str = "Program executed successfully (no output)";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    /// 1-based line in the submitted snippet, when it can be attributed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_line: Option<usize>,
}

impl Diagnostic {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
            source_line: None,
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
            source_line: None,
        }
    }

    pub fn at_line(mut self, line: Option<usize>) -> Self {
        self.source_line = line;
        self
    }

    /// Same diagnostic re-tagged as a warning
    pub fn into_warning(mut self) -> Self {
        self.severity = Severity::Warning;
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        match self.source_line {
            Some(line) => write!(f, "{} (line {}): {}", label, line, self.message),
            None => write!(f, "{}: {}", label, self.message),
        }
    }
}

/// Which tier produced a result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionTier {
    /// Rejected before any tier ran
    None,
    Native,
    Interpreter,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExecutionResult {
    pub success: bool,
    pub output: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    pub diagnostics: Vec<Diagnostic>,
    pub duration_ms: u64,
    pub tier: ExecutionTier,
    /// The native tier was attempted, failed, and the interpreter produced this result
    pub used_fallback: bool,
}

impl ExecutionResult {
    /// Successful run. Empty output is replaced by [`NO_OUTPUT_MESSAGE`].
    pub fn success(output: impl Into<String>, tier: ExecutionTier) -> Self {
        let output = output.into();
        Self {
            success: true,
            output: if output.is_empty() {
                NO_OUTPUT_MESSAGE.to_string()
            } else {
                output
            },
            error_message: None,
            diagnostics: Vec::new(),
            duration_ms: 0,
            tier,
            used_fallback: false,
        }
    }

    pub fn failure(message: impl Into<String>, diagnostics: Vec<Diagnostic>, tier: ExecutionTier) -> Self {
        Self {
            success: false,
            output: String::new(),
            error_message: Some(message.into()),
            diagnostics,
            duration_ms: 0,
            tier,
            used_fallback: false,
        }
    }

    /// Attach partial output to a failed result
    pub fn with_output(mut self, output: impl Into<String>) -> Self {
        self.output = output.into();
        self
    }

    pub fn with_diagnostics(mut self, diagnostics: impl IntoIterator<Item = Diagnostic>) -> Self {
        self.diagnostics.extend(diagnostics);
        self
    }

    pub fn with_duration(mut self, elapsed: Duration) -> Self {
        self.duration_ms = elapsed.as_millis().try_into().unwrap_or(u64::MAX);
        self
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    /// Error message followed by one bullet per diagnostic, or `None` when
    /// there is nothing to report.
    pub fn formatted_error(&self) -> Option<String> {
        if self.error_message.is_none() && self.diagnostics.is_empty() {
            return None;
        }

        let mut text = self.error_message.clone().unwrap_or_default();
        for diagnostic in &self.diagnostics {
            if !text.is_empty() {
                text.push('\n');
            }
            text.push_str("• ");
            text.push_str(&diagnostic.to_string());
        }
        Some(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_success_output_is_replaced() {
        let result = ExecutionResult::success("", ExecutionTier::Interpreter);
        assert_eq!(result.output, NO_OUTPUT_MESSAGE);
        assert!(result.error_message.is_none());
    }

    #[test]
    fn test_formatted_error_lists_diagnostics() {
        let result = ExecutionResult::failure(
            "Compilation failed",
            vec![
                Diagnostic::error("';' expected").at_line(Some(2)),
                Diagnostic::warning("unchecked call"),
            ],
            ExecutionTier::Native,
        );
        assert_eq!(
            result.formatted_error().unwrap(),
            "Compilation failed\n• error (line 2): ';' expected\n• warning: unchecked call"
        );
    }

    #[test]
    fn test_formatted_error_absent_on_clean_success() {
        let result = ExecutionResult::success("ok\n", ExecutionTier::Native);
        assert!(result.formatted_error().is_none());
    }

    #[test]
    fn test_json_shape() {
        let result = ExecutionResult::failure("empty source", Vec::new(), ExecutionTier::None);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["error_message"], "empty source");
        assert_eq!(json["tier"], "none");
    }
}
