//! Per-run work directory management.
//!
//! Each run owns a `.porter` work directory under the install root. Freshly
//! fetched packages land in staging directories inside it, keyed by the
//! dependency chain, before they are validated and copied into place. The
//! workspace is an explicit value passed into the resolver rather than
//! process-global state, and is torn down at run end.

use crate::context::Context;
use crate::error::{PorterError, Result};
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;

/// Name of the work directory created under the install root.
pub const WORK_DIR_NAME: &str = ".porter";

/// Run-scoped working area holding staging directories for fetched packages.
#[derive(Debug)]
pub struct Workspace {
    root: Utf8PathBuf,
    work_dir: Utf8PathBuf,
}

impl Workspace {
    /// Creates the work directory under `root` and verifies it is writable.
    ///
    /// # Errors
    ///
    /// Returns `TargetNotWritable` when the directory cannot be created or
    /// written to.
    pub fn create(root: &Utf8Path) -> Result<Self> {
        let work_dir = root.join(WORK_DIR_NAME);
        fs::create_dir_all(&work_dir).map_err(|e| PorterError::TargetNotWritable {
            path: work_dir.clone(),
            reason: e.to_string(),
        })?;

        // Verify writability by attempting to create a probe file
        let probe = work_dir.join(".porter-write-probe");
        match fs::write(&probe, b"probe") {
            Ok(()) => {
                let _ = fs::remove_file(&probe);
            }
            Err(e) => {
                return Err(PorterError::TargetNotWritable {
                    path: work_dir,
                    reason: e.to_string(),
                });
            }
        }

        Ok(Self {
            root: root.to_owned(),
            work_dir,
        })
    }

    /// Install root this workspace was created for.
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// Deterministic staging directory for the given dependency chain.
    ///
    /// The key is unique per chain within one run; concurrent runs sharing an
    /// install root would collide, matching the strictly sequential model.
    #[must_use]
    pub fn staging_dir(&self, context: &Context) -> Utf8PathBuf {
        self.work_dir.join(context.staging_key())
    }

    /// Removes a staging directory if present.
    ///
    /// # Errors
    ///
    /// Returns `StagingFailed` when the directory exists but cannot be
    /// removed.
    pub fn clear_staging(&self, staging: &Utf8Path) -> Result<()> {
        if staging.is_dir() {
            fs::remove_dir_all(staging).map_err(|e| PorterError::StagingFailed {
                reason: format!("could not remove staging directory {staging}: {e}"),
            })?;
        }
        Ok(())
    }

    /// Best-effort removal of the work directory at run end.
    pub fn teardown(&self) {
        if self.work_dir.is_dir() {
            let _ = fs::remove_dir_all(&self.work_dir);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    struct TempRoot {
        _temp: TempDir,
        path: Utf8PathBuf,
    }

    #[fixture]
    fn temp_root() -> TempRoot {
        let temp = TempDir::new().expect("failed to create temp dir");
        let path = Utf8PathBuf::try_from(temp.path().to_owned()).expect("non-UTF8 temp path");
        TempRoot { _temp: temp, path }
    }

    #[rstest]
    fn create_makes_work_directory(temp_root: TempRoot) {
        let workspace = Workspace::create(&temp_root.path).expect("create");
        assert!(temp_root.path.join(WORK_DIR_NAME).is_dir());
        assert_eq!(workspace.root(), temp_root.path);
    }

    #[rstest]
    fn staging_dir_is_deterministic_per_chain(temp_root: TempRoot) {
        let workspace = Workspace::create(&temp_root.path).expect("create");
        let context = Context::default().child("App").child("Widgets");

        let first = workspace.staging_dir(&context);
        let second = workspace.staging_dir(&context);
        assert_eq!(first, second);
        assert!(first.starts_with(temp_root.path.join(WORK_DIR_NAME)));
    }

    #[rstest]
    fn clear_staging_removes_populated_directory(temp_root: TempRoot) {
        let workspace = Workspace::create(&temp_root.path).expect("create");
        let staging = workspace.staging_dir(&Context::default().child("App"));
        std::fs::create_dir_all(&staging).expect("mkdir");
        std::fs::write(staging.join("leftover.cs"), "class X {}").expect("write");

        workspace.clear_staging(&staging).expect("clear");
        assert!(!staging.exists());
    }

    #[rstest]
    fn clear_staging_accepts_missing_directory(temp_root: TempRoot) {
        let workspace = Workspace::create(&temp_root.path).expect("create");
        let staging = workspace.staging_dir(&Context::default().child("App"));
        assert!(workspace.clear_staging(&staging).is_ok());
    }

    #[rstest]
    fn teardown_removes_work_directory(temp_root: TempRoot) {
        let workspace = Workspace::create(&temp_root.path).expect("create");
        workspace.teardown();
        assert!(!temp_root.path.join(WORK_DIR_NAME).exists());
    }
}
