//! Runtime error types for the fallback interpreter
//!
//! Unsupported syntax is never an error here: unrecognised statements are
//! skipped and unreducible expressions evaluate to their own text. The only
//! failures are the resource bounds that keep a run finite.

use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InterpreterError {
    /// A single loop ran more iterations than the policy allows
    #[error("loop at line {line} exceeded {limit} iterations")]
    LoopLimitExceeded { limit: usize, line: usize },

    /// The run took longer than the execution timeout
    #[error("Execution timeout exceeded ({})", format_timeout(.limit))]
    DeadlineExceeded { limit: Duration },

    /// Printed output grew past the policy cap
    #[error("output exceeded {limit} bytes")]
    OutputLimitExceeded { limit: usize },
}

impl InterpreterError {
    pub fn line(&self) -> Option<usize> {
        match self {
            InterpreterError::LoopLimitExceeded { line, .. } => Some(*line),
            InterpreterError::DeadlineExceeded { .. }
            | InterpreterError::OutputLimitExceeded { .. } => None,
        }
    }
}

/// `10 seconds` for whole seconds, `250 ms` otherwise
pub fn format_timeout(limit: &Duration) -> String {
    if limit.subsec_millis() == 0 {
        let secs = limit.as_secs();
        format!("{} second{}", secs, if secs == 1 { "" } else { "s" })
    } else {
        format!("{} ms", limit.as_millis())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_message() {
        let err = InterpreterError::DeadlineExceeded {
            limit: Duration::from_secs(10),
        };
        assert_eq!(err.to_string(), "Execution timeout exceeded (10 seconds)");
        assert_eq!(format_timeout(&Duration::from_millis(250)), "250 ms");
    }
}
