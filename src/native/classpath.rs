//! Compile classpath resolution
//!
//! The host is not guaranteed to expose a conventional compiler classpath,
//! so the resolver asks an ordered list of [`ClasspathProbe`]s and uses the
//! first one that finds something:
//!
//! 1. [`PlatformJars`]: platform runtime jars → `-bootclasspath`
//! 2. [`JdkModules`]: a JDK `lib/modules` image → `--system`
//! 3. [`ProcessClasspath`]: configured entries, else `CLASSPATH` → extra `-cp` entries
//!
//! When nothing matches the compiler runs with its own defaults.

use crate::config::NativeConfig;
use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Compiler setting contributed by a probe
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClasspathSetting {
    BootClasspath(Vec<PathBuf>),
    SystemModules(PathBuf),
    UserClasspath(Vec<PathBuf>),
}

/// Compiler arguments for `setting`. `classes_dir` is always the first
/// `-cp` entry so sources can see each other's output.
pub fn classpath_args(setting: Option<&ClasspathSetting>, classes_dir: &Path) -> Vec<OsString> {
    let mut classpath = vec![classes_dir.to_path_buf()];
    let mut args = Vec::new();

    match setting {
        Some(ClasspathSetting::BootClasspath(jars)) => {
            args.push(OsString::from("-bootclasspath"));
            args.push(join_paths(jars));
        }
        Some(ClasspathSetting::SystemModules(java_home)) => {
            args.push(OsString::from("--system"));
            args.push(java_home.clone().into_os_string());
        }
        Some(ClasspathSetting::UserClasspath(entries)) => classpath.extend(entries.iter().cloned()),
        None => {}
    }

    args.push(OsString::from("-cp"));
    args.push(join_paths(&classpath));
    args
}

fn join_paths(paths: &[PathBuf]) -> OsString {
    // Only fails on entries containing the separator; fall back to a plain join.
    env::join_paths(paths).unwrap_or_else(|_| {
        let separator = if cfg!(windows) { ";" } else { ":" };
        let joined: Vec<String> = paths.iter().map(|p| p.display().to_string()).collect();
        OsString::from(joined.join(separator))
    })
}

pub trait ClasspathProbe: Send + Sync {
    fn name(&self) -> &'static str;

    fn probe(&self) -> Option<ClasspathSetting>;
}

/// Matches when at least one of the candidate jars exists
#[derive(Debug, Clone)]
pub struct PlatformJars {
    pub candidates: Vec<PathBuf>,
}

impl ClasspathProbe for PlatformJars {
    fn name(&self) -> &'static str {
        "platform-jars"
    }

    fn probe(&self) -> Option<ClasspathSetting> {
        let present: Vec<PathBuf> = self.candidates.iter().filter(|jar| jar.is_file()).cloned().collect();
        (!present.is_empty()).then_some(ClasspathSetting::BootClasspath(present))
    }
}

/// Matches a JDK root that carries a `lib/modules` system image
#[derive(Debug, Clone)]
pub struct JdkModules {
    pub java_home: Option<PathBuf>,
}

impl ClasspathProbe for JdkModules {
    fn name(&self) -> &'static str {
        "jdk-modules"
    }

    fn probe(&self) -> Option<ClasspathSetting> {
        let home = self.java_home.as_ref()?;
        home.join("lib")
            .join("modules")
            .is_file()
            .then(|| ClasspathSetting::SystemModules(home.clone()))
    }
}

/// Configured entries, or the inherited `CLASSPATH` when none are configured
#[derive(Debug, Clone)]
pub struct ProcessClasspath {
    pub entries: Vec<PathBuf>,
}

impl ClasspathProbe for ProcessClasspath {
    fn name(&self) -> &'static str {
        "process-classpath"
    }

    fn probe(&self) -> Option<ClasspathSetting> {
        let entries = if self.entries.is_empty() {
            env::var_os("CLASSPATH")
                .map(|value| env::split_paths(&value).filter(|p| !p.as_os_str().is_empty()).collect())
                .unwrap_or_default()
        } else {
            self.entries.clone()
        };
        (!entries.is_empty()).then_some(ClasspathSetting::UserClasspath(entries))
    }
}

pub struct ClasspathResolver {
    probes: Vec<Box<dyn ClasspathProbe>>,
}

impl ClasspathResolver {
    pub fn new(probes: Vec<Box<dyn ClasspathProbe>>) -> Self {
        Self { probes }
    }

    /// The standard probe order for `config`. A missing `java_home` falls
    /// back to `JAVA_HOME`.
    pub fn from_config(config: &NativeConfig) -> Self {
        let java_home = config
            .java_home
            .clone()
            .or_else(|| env::var_os("JAVA_HOME").map(PathBuf::from));
        Self::new(vec![
            Box::new(PlatformJars {
                candidates: config.platform_jars.clone(),
            }),
            Box::new(JdkModules { java_home }),
            Box::new(ProcessClasspath {
                entries: config.classpath.clone(),
            }),
        ])
    }

    pub fn resolve(&self) -> Option<ClasspathSetting> {
        for probe in &self.probes {
            if let Some(setting) = probe.probe() {
                debug!(probe = probe.name(), ?setting, "classpath resolved");
                return Some(setting);
            }
            debug!(probe = probe.name(), "no match");
        }
        None
    }
}

impl std::fmt::Debug for ClasspathResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.probes.iter().map(|p| p.name()).collect();
        f.debug_struct("ClasspathResolver").field("probes", &names).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_first_matching_probe_wins() {
        let dir = tempfile::tempdir().unwrap();
        let jar = dir.path().join("core.jar");
        fs::write(&jar, b"").unwrap();
        let home = dir.path().join("jdk");
        fs::create_dir_all(home.join("lib")).unwrap();
        fs::write(home.join("lib").join("modules"), b"").unwrap();

        let resolver = ClasspathResolver::new(vec![
            Box::new(PlatformJars {
                candidates: vec![dir.path().join("missing.jar"), jar.clone()],
            }),
            Box::new(JdkModules {
                java_home: Some(home.clone()),
            }),
        ]);
        assert_eq!(resolver.resolve(), Some(ClasspathSetting::BootClasspath(vec![jar])));

        let resolver = ClasspathResolver::new(vec![
            Box::new(PlatformJars {
                candidates: vec![dir.path().join("missing.jar")],
            }),
            Box::new(JdkModules {
                java_home: Some(home.clone()),
            }),
        ]);
        assert_eq!(resolver.resolve(), Some(ClasspathSetting::SystemModules(home)));
    }

    #[test]
    fn test_no_match() {
        let resolver = ClasspathResolver::new(vec![Box::new(JdkModules { java_home: None })]);
        assert_eq!(resolver.resolve(), None);
    }

    #[test]
    fn test_configured_entries_extend_cp() {
        let probe = ProcessClasspath {
            entries: vec![PathBuf::from("/opt/lib/a.jar")],
        };
        let setting = probe.probe();
        let args = classpath_args(setting.as_ref(), Path::new("/w/classes"));
        let sep = if cfg!(windows) { ";" } else { ":" };
        assert_eq!(
            args,
            vec![
                OsString::from("-cp"),
                OsString::from(format!("/w/classes{sep}/opt/lib/a.jar"))
            ]
        );
    }

    #[test]
    fn test_boot_classpath_args() {
        let setting = ClasspathSetting::BootClasspath(vec![PathBuf::from("/system/framework/core.jar")]);
        let args = classpath_args(Some(&setting), Path::new("/w/classes"));
        assert_eq!(args[0], OsString::from("-bootclasspath"));
        assert_eq!(args[2], OsString::from("-cp"));
        assert_eq!(args[3], OsString::from("/w/classes"));
    }
}
