//! Error types for the porter installer.
//!
//! This module defines semantic error variants for every fatal condition the
//! resolver can hit. Diagnostics identify the offending manifest path or
//! package reference so users can correct the input without reading a stack
//! trace. Non-fatal conditions (a malformed reference in lenient mode, a
//! fetched package that is not a porter package) are reported as warnings by
//! the resolver rather than surfaced here.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors that can occur during a porter install run.
#[derive(Debug, Error)]
pub enum PorterError {
    /// The install directory given on the command line does not exist.
    #[error("install directory {path} not found")]
    InstallDirNotFound {
        /// Path that was expected to exist.
        path: Utf8PathBuf,
    },

    /// The install directory could not be resolved to a UTF-8 path.
    #[error("install directory is not valid UTF-8: {reason}")]
    InvalidInstallDir {
        /// Description of the conversion failure.
        reason: String,
    },

    /// No manifest file was found where one was required.
    #[error("expected porter.json not found at {path}")]
    ManifestNotFound {
        /// Path where the manifest was expected.
        path: Utf8PathBuf,
    },

    /// A manifest file exists but could not be read.
    #[error("could not read manifest {path}: {reason}")]
    ManifestUnreadable {
        /// Path to the unreadable manifest.
        path: Utf8PathBuf,
        /// Description of the underlying I/O error.
        reason: String,
    },

    /// A manifest file could not be decoded from JSON.
    #[error("invalid manifest {path}: {reason}")]
    InvalidManifest {
        /// Path to the invalid manifest.
        path: Utf8PathBuf,
        /// Description of the decode error.
        reason: String,
    },

    /// The root manifest declares no runtimes.
    #[error("root manifest {path} must declare at least one runtime")]
    MissingRuntimes {
        /// Path to the root manifest.
        path: Utf8PathBuf,
    },

    /// A package reference token failed to parse under strict policy.
    #[error("malformed package reference {token:?} in {manifest}")]
    MalformedReference {
        /// The offending token.
        token: String,
        /// Manifest that declared the token.
        manifest: Utf8PathBuf,
    },

    /// A package reference names a source kind the installer cannot honor.
    #[error("unsupported package source {source_kind:?} in {token:?}; only github is supported")]
    UnsupportedSource {
        /// The unsupported source kind.
        source_kind: String,
        /// The full reference token.
        token: String,
    },

    /// The same repository is referenced more than once by one manifest.
    #[error("package {slug} is referenced more than once by {manifest}")]
    DuplicateDependency {
        /// Repository slug that occurs more than once.
        slug: String,
        /// Manifest containing the duplicate references.
        manifest: Utf8PathBuf,
    },

    /// Fetching a repository failed or timed out.
    #[error("failed to fetch {url} at tag {tag}: {message}")]
    Fetch {
        /// Repository URL that was being fetched.
        url: String,
        /// Pinned tag.
        tag: String,
        /// Description of the failure.
        message: String,
    },

    /// A fetched package declares no runtime shared with the root project.
    #[error(
        "package {package} runtimes [{declared}] do not align with required runtimes [{required}]"
    )]
    RuntimeIncompatible {
        /// Name of the incompatible package.
        package: String,
        /// Runtimes the package declares.
        declared: String,
        /// Runtimes the root project requires.
        required: String,
    },

    /// An ignore glob pattern in a manifest could not be compiled.
    #[error("invalid ignore pattern {pattern:?}: {reason}")]
    InvalidIgnorePattern {
        /// The offending glob pattern.
        pattern: String,
        /// Description of the compile error.
        reason: String,
    },

    /// The work directory exists but is not writable.
    #[error("work directory {path} is not writable: {reason}")]
    TargetNotWritable {
        /// Path to the non-writable directory.
        path: Utf8PathBuf,
        /// Description of the underlying I/O error.
        reason: String,
    },

    /// A staging or install filesystem operation failed.
    #[error("staging failed: {reason}")]
    StagingFailed {
        /// Description of the staging failure.
        reason: String,
    },

    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using [`PorterError`].
pub type Result<T> = std::result::Result<T, PorterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_dependency_names_slug_and_manifest() {
        let err = PorterError::DuplicateDependency {
            slug: "acme.widgets".to_owned(),
            manifest: Utf8PathBuf::from("/proj/porter.json"),
        };
        let msg = err.to_string();
        assert!(msg.contains("acme.widgets"));
        assert!(msg.contains("/proj/porter.json"));
    }

    #[test]
    fn fetch_error_includes_url_and_tag() {
        let err = PorterError::Fetch {
            url: "https://github.com/acme/widgets".to_owned(),
            tag: "v1.0".to_owned(),
            message: "network error".to_owned(),
        };
        let msg = err.to_string();
        assert!(msg.contains("https://github.com/acme/widgets"));
        assert!(msg.contains("v1.0"));
        assert!(msg.contains("network error"));
    }

    #[test]
    fn runtime_incompatible_lists_both_sets() {
        let err = PorterError::RuntimeIncompatible {
            package: "Widgets".to_owned(),
            declared: "net6".to_owned(),
            required: "net8".to_owned(),
        };
        let msg = err.to_string();
        assert!(msg.contains("Widgets"));
        assert!(msg.contains("net6"));
        assert!(msg.contains("net8"));
    }

    #[test]
    fn unsupported_source_suggests_github() {
        let err = PorterError::UnsupportedSource {
            source_kind: "gitlab".to_owned(),
            token: "gitlab.acme.widgets@v1".to_owned(),
        };
        let msg = err.to_string();
        assert!(msg.contains("gitlab"));
        assert!(msg.contains("only github"));
    }
}
