//! Package reference tokens.
//!
//! A manifest declares each dependency as a compact token of the form
//! `<source>.<owner.repo>@<tag>`, for example `github.acme.widgets@v1.0`.
//! The repository slug may itself contain dots; they become path separators
//! when the fetch URL is formed. Parsing is a small dedicated tokenizer so
//! malformed-input handling is exhaustive and testable without touching the
//! filesystem.

use crate::error::{PorterError, Result};
use camino::Utf8Path;
use thiserror::Error;

/// The only source kind the installer can honor.
pub const SUPPORTED_SOURCE: &str = "github";

const GITHUB_BASE_URL: &str = "https://github.com";

/// One parsed dependency reference: a repository slug pinned to a tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageRef {
    /// Dotted `owner.repo` slug as written in the manifest.
    pub slug: String,
    /// Pinned tag to fetch.
    pub tag: String,
}

impl PackageRef {
    /// Clone URL for this reference; the slug's dots become path separators.
    #[must_use]
    pub fn fetch_url(&self) -> String {
        format!("{GITHUB_BASE_URL}/{}", self.slug.replace('.', "/"))
    }
}

/// Reasons a reference token fails to parse.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RefError {
    /// The token has no `@tag` part.
    #[error("missing @tag")]
    MissingTag,

    /// The token has no `source.` prefix before the repository slug.
    #[error("missing source prefix")]
    MissingSource,

    /// A structural part of the token is empty.
    #[error("empty {part}")]
    EmptyPart {
        /// Which part was empty.
        part: &'static str,
    },

    /// The token names a source kind other than [`SUPPORTED_SOURCE`].
    #[error("unsupported source {0:?}")]
    UnsupportedSource(String),
}

impl RefError {
    /// An unsupported source kind aborts the whole run; every other parse
    /// failure only skips the single entry (in lenient mode).
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, RefError::UnsupportedSource(_))
    }
}

/// Parses one reference token.
///
/// The tag is taken after the last `@` (tags themselves never contain `@`),
/// then the source kind before the first `.` of the remainder.
///
/// # Errors
///
/// Returns a [`RefError`] describing the first structural problem found.
pub fn parse(token: &str) -> std::result::Result<PackageRef, RefError> {
    let (coordinates, tag) = token.rsplit_once('@').ok_or(RefError::MissingTag)?;
    if tag.is_empty() {
        return Err(RefError::EmptyPart { part: "tag" });
    }

    let (source, slug) = coordinates.split_once('.').ok_or(RefError::MissingSource)?;
    if source.is_empty() {
        return Err(RefError::EmptyPart { part: "source" });
    }
    if slug.is_empty() {
        return Err(RefError::EmptyPart { part: "repository" });
    }

    if source != SUPPORTED_SOURCE {
        return Err(RefError::UnsupportedSource(source.to_owned()));
    }

    Ok(PackageRef {
        slug: slug.to_owned(),
        tag: tag.to_owned(),
    })
}

/// Rejects a reference list where the same repository occurs more than once,
/// regardless of tag. Runs before any fetch so a mistaken double listing can
/// never produce a nondeterministic last-write-wins install.
///
/// # Errors
///
/// Returns `DuplicateDependency` naming the repeated slug and the manifest
/// that declared it.
pub fn check_duplicates(refs: &[PackageRef], manifest_path: &Utf8Path) -> Result<()> {
    for (index, package_ref) in refs.iter().enumerate() {
        let repeated = refs
            .iter()
            .skip(index + 1)
            .any(|other| other.slug == package_ref.slug);
        if repeated {
            return Err(PorterError::DuplicateDependency {
                slug: package_ref.slug.clone(),
                manifest: manifest_path.to_owned(),
            });
        }
    }
    Ok(())
}
