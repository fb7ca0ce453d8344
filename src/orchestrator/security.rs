//! Deny-list screen applied before either tier runs
//!
//! A plain substring match over the submitted text. It catches the obvious
//! destructive calls (process exit, process spawning, file deletion); it is
//! not an analysis and does not look inside strings or comments any
//! differently from code.

use crate::config::{ExecutionPolicy, SecurityRule};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} ({pattern})")]
pub struct SecurityViolation {
    pub message: String,
    /// The deny-list fragment that matched
    pub pattern: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecurityValidator {
    rules: Vec<SecurityRule>,
}

impl SecurityValidator {
    pub fn new(rules: Vec<SecurityRule>) -> Self {
        Self { rules }
    }

    pub fn from_policy(policy: &ExecutionPolicy) -> Self {
        Self::new(policy.deny.clone())
    }

    pub fn rules(&self) -> &[SecurityRule] {
        &self.rules
    }

    /// Fails with the first rule, in deny-list order, that matches `text`
    pub fn validate(&self, text: &str) -> Result<(), SecurityViolation> {
        match self.rules.iter().find(|rule| matches_rule(rule, text)) {
            Some(rule) => Err(SecurityViolation {
                message: rule.message.clone(),
                pattern: rule.pattern.clone(),
            }),
            None => Ok(()),
        }
    }
}

impl Default for SecurityValidator {
    fn default() -> Self {
        Self::new(SecurityRule::default_rules())
    }
}

fn matches_rule(rule: &SecurityRule, text: &str) -> bool {
    text.contains(rule.pattern.as_str())
        && (rule.requires_any.is_empty() || rule.requires_any.iter().any(|f| text.contains(f.as_str())))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn violation(text: &str) -> Option<String> {
        SecurityValidator::default().validate(text).err().map(|v| v.message)
    }

    #[test]
    fn test_default_rules() {
        assert_eq!(
            violation("System.exit(0);").as_deref(),
            Some("System.exit() calls are not allowed")
        );
        assert_eq!(
            violation("Runtime.getRuntime().exec(\"ls\");").as_deref(),
            Some("Runtime access is restricted")
        );
        assert_eq!(
            violation("new ProcessBuilder(\"sh\").start();").as_deref(),
            Some("Process execution is not allowed")
        );
        assert_eq!(violation("System.out.println(1);"), None);
    }

    #[test]
    fn test_file_rule_needs_a_destructive_call() {
        assert_eq!(violation("java.io.File f = new java.io.File(\"a\");"), None);
        assert_eq!(
            violation("new java.io.File(\"a\").delete();").as_deref(),
            Some("File system modifications are restricted")
        );
        assert_eq!(
            violation("import java.io.File;\nnew File(\"d\").mkdirs();").as_deref(),
            Some("File system modifications are restricted")
        );
    }

    #[test]
    fn test_first_rule_wins() {
        let err = SecurityValidator::default()
            .validate("Runtime.getRuntime(); System.exit(1);")
            .unwrap_err();
        assert_eq!(err.pattern, "System.exit");
        assert_eq!(err.to_string(), "System.exit() calls are not allowed (System.exit)");
    }

    #[test]
    fn test_custom_rules() {
        let validator = SecurityValidator::new(vec![SecurityRule::new("Thread.sleep", "Sleeping is not allowed")]);
        assert!(validator.validate("System.exit(0);").is_ok());
        assert!(validator.validate("Thread.sleep(10);").is_err());
    }
}
