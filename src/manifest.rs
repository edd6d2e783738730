//! Manifest model and loading.
//!
//! Every directory porter visits must contain a `porter.json` manifest
//! declaring the package's name, the runtimes it targets, and the packages it
//! depends on. Missing optional fields default to empty.

use crate::error::{PorterError, Result};
use camino::{Utf8Path, Utf8PathBuf};
use serde::Deserialize;

/// File name of the per-directory manifest.
pub const MANIFEST_FILE_NAME: &str = "porter.json";

/// Decoded `porter.json` contents.
#[derive(Debug, Clone, Deserialize)]
pub struct Manifest {
    /// Package name; also names the install directory under `porter/`.
    pub name: String,

    /// Runtimes this package can run on. Must be non-empty at the root.
    #[serde(default)]
    pub runtimes: Vec<String>,

    /// Ordered package reference tokens (`source.owner.repo@tag`).
    #[serde(default)]
    pub packages: Vec<String>,

    /// Glob patterns for source files excluded from installation.
    #[serde(default)]
    pub ignore: Vec<String>,

    /// Subdirectory that is actually published; defaults to the manifest's
    /// own directory when absent or empty.
    #[serde(default)]
    pub export: Option<String>,
}

impl Manifest {
    /// Path of the manifest file within `dir`.
    #[must_use]
    pub fn path_in(dir: &Utf8Path) -> Utf8PathBuf {
        dir.join(MANIFEST_FILE_NAME)
    }

    /// Whether `dir` contains a manifest file.
    #[must_use]
    pub fn exists_in(dir: &Utf8Path) -> bool {
        Self::path_in(dir).is_file()
    }

    /// Loads and decodes the manifest in `dir`.
    ///
    /// # Errors
    ///
    /// Returns `ManifestNotFound` when no manifest file exists,
    /// `ManifestUnreadable` when it cannot be read, and `InvalidManifest`
    /// when it is not valid JSON for this schema.
    pub fn load(dir: &Utf8Path) -> Result<Self> {
        let path = Self::path_in(dir);
        if !path.is_file() {
            return Err(PorterError::ManifestNotFound { path });
        }

        let raw = std::fs::read_to_string(&path).map_err(|e| PorterError::ManifestUnreadable {
            path: path.clone(),
            reason: e.to_string(),
        })?;

        serde_json::from_str(&raw).map_err(|e| PorterError::InvalidManifest {
            path,
            reason: e.to_string(),
        })
    }

    /// Directory whose sources are published for installation.
    #[must_use]
    pub fn export_root(&self, package_dir: &Utf8Path) -> Utf8PathBuf {
        match self.export.as_deref() {
            Some(rel) if !rel.is_empty() => package_dir.join(rel),
            _ => package_dir.to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    struct TempManifestDir {
        _temp: TempDir,
        path: Utf8PathBuf,
    }

    #[fixture]
    fn manifest_dir() -> TempManifestDir {
        let temp = TempDir::new().expect("failed to create temp dir");
        let path = Utf8PathBuf::try_from(temp.path().to_owned()).expect("non-UTF8 temp path");
        TempManifestDir { _temp: temp, path }
    }

    fn write_manifest(dir: &Utf8Path, json: &str) {
        std::fs::write(Manifest::path_in(dir), json).expect("failed to write manifest");
    }

    #[rstest]
    fn load_applies_defaults_for_missing_fields(manifest_dir: TempManifestDir) {
        write_manifest(&manifest_dir.path, r#"{"name": "App"}"#);

        let manifest = Manifest::load(&manifest_dir.path).expect("load");
        assert_eq!(manifest.name, "App");
        assert!(manifest.runtimes.is_empty());
        assert!(manifest.packages.is_empty());
        assert!(manifest.ignore.is_empty());
        assert!(manifest.export.is_none());
    }

    #[rstest]
    fn load_reports_missing_manifest(manifest_dir: TempManifestDir) {
        let err = Manifest::load(&manifest_dir.path).expect_err("expected missing manifest");
        assert!(matches!(err, PorterError::ManifestNotFound { .. }));
    }

    #[rstest]
    fn load_reports_invalid_json(manifest_dir: TempManifestDir) {
        write_manifest(&manifest_dir.path, "not-json");

        let err = Manifest::load(&manifest_dir.path).expect_err("expected decode failure");
        assert!(matches!(err, PorterError::InvalidManifest { .. }));
    }

    #[rstest]
    fn load_reports_missing_name(manifest_dir: TempManifestDir) {
        write_manifest(&manifest_dir.path, r#"{"runtimes": ["net8"]}"#);

        let err = Manifest::load(&manifest_dir.path).expect_err("expected decode failure");
        assert!(matches!(err, PorterError::InvalidManifest { .. }));
    }

    #[rstest]
    #[case::absent(None, "/pkg")]
    #[case::empty(Some(""), "/pkg")]
    #[case::relative(Some("src"), "/pkg/src")]
    fn export_root_resolves_relative_to_package_dir(
        #[case] export: Option<&str>,
        #[case] expected: &str,
    ) {
        let manifest = Manifest {
            name: "App".to_owned(),
            runtimes: Vec::new(),
            packages: Vec::new(),
            ignore: Vec::new(),
            export: export.map(str::to_owned),
        };
        assert_eq!(
            manifest.export_root(Utf8Path::new("/pkg")),
            Utf8PathBuf::from(expected)
        );
    }
}
