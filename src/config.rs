//! Engine configuration
//!
//! [`EngineConfig`] is deserialized from TOML. Every field has a default, so
//! an empty file (or no file at all) yields the built-in policy:
//!
//! ```toml
//! [policy]
//! timeout_ms = 10000
//! max_loop_iterations = 100000
//!
//! [[policy.deny]]
//! pattern = "System.exit"
//! message = "System.exit() calls are not allowed"
//!
//! [native]
//! compiler = "javac"
//! launcher = "java"
//! java_home = "/usr/lib/jvm/java-17-openjdk"
//! ```
//!
//! Supplying `[[policy.deny]]` replaces the default deny list rather than
//! extending it.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Toml(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    pub policy: ExecutionPolicy,
    pub native: NativeConfig,
}

impl EngineConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Default policy with the native tier switched off
    pub fn interpreter_only() -> Self {
        let mut config = Self::default();
        config.native.enabled = false;
        config
    }
}

/// Limits and screening rules applied uniformly to every execution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExecutionPolicy {
    /// Wall-clock bound for running a compiled program or an interpreter pass
    pub timeout_ms: u64,
    pub compile_timeout_ms: u64,
    /// Iteration cap per interpreted loop
    pub max_loop_iterations: usize,
    /// Cap on interpreter output
    pub max_output_bytes: usize,
    /// Retry in the interpreter when a compiled program throws
    pub fallback_on_runtime_error: bool,
    pub deny: Vec<SecurityRule>,
}

impl ExecutionPolicy {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn compile_timeout(&self) -> Duration {
        Duration::from_millis(self.compile_timeout_ms)
    }
}

impl Default for ExecutionPolicy {
    fn default() -> Self {
        Self {
            timeout_ms: 10_000,
            compile_timeout_ms: 30_000,
            max_loop_iterations: 100_000,
            max_output_bytes: 1024 * 1024,
            fallback_on_runtime_error: true,
            deny: SecurityRule::default_rules(),
        }
    }
}

/// One deny-list entry: the snippet is rejected when it contains `pattern`
/// and, if `requires_any` is non-empty, also at least one of those fragments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SecurityRule {
    pub pattern: String,
    #[serde(default)]
    pub requires_any: Vec<String>,
    pub message: String,
}

impl SecurityRule {
    pub fn new(pattern: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            requires_any: Vec::new(),
            message: message.into(),
        }
    }

    pub fn requiring_any<I, S>(mut self, fragments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.requires_any = fragments.into_iter().map(Into::into).collect();
        self
    }

    pub fn default_rules() -> Vec<SecurityRule> {
        vec![
            SecurityRule::new("System.exit", "System.exit() calls are not allowed"),
            SecurityRule::new("Runtime.getRuntime", "Runtime access is restricted"),
            SecurityRule::new("ProcessBuilder", "Process execution is not allowed"),
            SecurityRule::new("java.io.File", "File system modifications are restricted")
                .requiring_any(["delete", "mkdir"]),
        ]
    }
}

/// Native tier settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NativeConfig {
    pub enabled: bool,
    pub compiler: String,
    pub launcher: String,
    pub source_version: String,
    pub target_version: String,
    pub encoding: String,
    /// Root for the src/classes/tmp scratch directories; a fresh temporary
    /// directory is used per run when unset
    pub work_dir: Option<PathBuf>,
    /// Platform runtime jars, probed first for a boot classpath
    pub platform_jars: Vec<PathBuf>,
    /// JDK root probed for a `lib/modules` system image
    pub java_home: Option<PathBuf>,
    /// Extra compile classpath entries, probed last
    pub classpath: Vec<PathBuf>,
}

impl Default for NativeConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            compiler: "javac".to_string(),
            launcher: "java".to_string(),
            source_version: "11".to_string(),
            target_version: "11".to_string(),
            encoding: "UTF-8".to_string(),
            work_dir: None,
            platform_jars: ["framework", "core", "ext", "android"]
                .iter()
                .map(|name| PathBuf::from(format!("/system/framework/{name}.jar")))
                .collect(),
            java_home: None,
            classpath: Vec::new(),
        }
    }
}
