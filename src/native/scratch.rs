//! Scratch directories for one native run
//!
//! A [`ScratchSpace`] owns the `src`, `classes` and `tmp` directories a
//! compile-and-run uses. With a configured work directory the three are wiped
//! and recreated when the space is created and wiped again when it is
//! dropped; otherwise a fresh temporary directory is used and removed on drop.
//! Either way nothing from one run is visible to the next.

use crate::source::SourceUnit;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tempfile::TempDir;
use tracing::{debug, warn};

const SUBDIRS: [&str; 3] = ["src", "classes", "tmp"];

static NEXT_RUN: AtomicU64 = AtomicU64::new(0);

#[derive(Debug)]
pub struct ScratchSpace {
    root: PathBuf,
    /// Keeps a per-run temporary root alive; `None` for a configured work dir
    temp: Option<TempDir>,
}

impl ScratchSpace {
    pub fn create(work_dir: Option<&Path>) -> io::Result<Self> {
        let space = match work_dir {
            Some(dir) => {
                let space = Self {
                    root: dir.to_path_buf(),
                    temp: None,
                };
                space.wipe()?;
                space
            }
            None => {
                let temp = tempfile::Builder::new().prefix("sniprun-").tempdir()?;
                Self {
                    root: temp.path().to_path_buf(),
                    temp: Some(temp),
                }
            }
        };

        for dir in SUBDIRS {
            fs::create_dir_all(space.root.join(dir))?;
        }
        debug!(root = %space.root.display(), "scratch space ready");
        Ok(space)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn source_dir(&self) -> PathBuf {
        self.root.join("src")
    }

    pub fn classes_dir(&self) -> PathBuf {
        self.root.join("classes")
    }

    pub fn tmp_dir(&self) -> PathBuf {
        self.root.join("tmp")
    }

    /// Write the normalized source to `src/<unique>/<Entry>.java`
    pub fn write_source(&self, unit: &SourceUnit) -> io::Result<PathBuf> {
        let run = NEXT_RUN.fetch_add(1, Ordering::Relaxed);
        let run_dir = self
            .source_dir()
            .join(format!("run-{}-{}", std::process::id(), run));
        fs::create_dir(&run_dir)?;
        let path = run_dir.join(unit.file_name());
        fs::write(&path, unit.normalized())?;
        Ok(path)
    }

    fn wipe(&self) -> io::Result<()> {
        for dir in SUBDIRS {
            let path = self.root.join(dir);
            match fs::remove_dir_all(&path) {
                Ok(()) => {}
                Err(err) if err.kind() == io::ErrorKind::NotFound => {}
                Err(err) => return Err(err),
            }
        }
        Ok(())
    }
}

impl Drop for ScratchSpace {
    fn drop(&mut self) {
        if self.temp.is_some() {
            return;
        }
        if let Err(err) = self.wipe() {
            warn!(root = %self.root.display(), error = %err, "failed to clean scratch space");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_work_dir_is_wiped_before_and_after() {
        let dir = tempfile::tempdir().unwrap();
        let stale = dir.path().join("classes").join("Stale.class");
        fs::create_dir_all(stale.parent().unwrap()).unwrap();
        fs::write(&stale, b"old").unwrap();

        let space = ScratchSpace::create(Some(dir.path())).unwrap();
        assert!(!stale.exists());
        assert!(space.classes_dir().is_dir());

        let source = space.write_source(&SourceUnit::new("int x = 1;")).unwrap();
        assert!(source.ends_with("TempClass.java"));
        assert!(source.starts_with(space.source_dir()));

        drop(space);
        assert!(!dir.path().join("src").exists());
        assert!(!dir.path().join("classes").exists());
    }

    #[test]
    fn test_temporary_root_is_removed() {
        let space = ScratchSpace::create(None).unwrap();
        let root = space.root().to_path_buf();
        assert!(space.tmp_dir().is_dir());
        drop(space);
        assert!(!root.exists());
    }

    #[test]
    fn test_sources_get_unique_directories() {
        let space = ScratchSpace::create(None).unwrap();
        let unit = SourceUnit::new("int x = 1;");
        let first = space.write_source(&unit).unwrap();
        let second = space.write_source(&unit).unwrap();
        assert_ne!(first, second);
    }
}
