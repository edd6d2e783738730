//! Recursive dependency resolution and installation.
//!
//! The resolver drives the whole install: for each visited directory it loads
//! the manifest, parses and validates the package references, then installs
//! each dependency in order — fetch into staging, validate it is a porter
//! package, check runtime compatibility, wrap and copy its sources into
//! `porter/<name>`, and recurse into the freshly installed package. Traversal
//! is strictly sequential and depth-first: a child subtree is fully resolved
//! before the next sibling of its parent starts.
//!
//! Fatal conditions abort the run by propagating an error up the call chain;
//! already-installed siblings are left on disk. Non-fatal conditions (a
//! malformed reference in lenient mode, a fetched package without a manifest)
//! are reported and skipped.

use crate::context::Context;
use crate::error::{PorterError, Result};
use crate::fetch::Fetcher;
use crate::manifest::Manifest;
use crate::output::{installed_message, write_stderr_line};
use crate::reference::{self, PackageRef, RefError};
use crate::scanner::SourceFilter;
use crate::workspace::Workspace;
use crate::{runtime, wrapper};
use camino::Utf8Path;
use std::fs;
use std::io::Write;

/// Directory created under each consumer to hold installed packages.
pub const PACKAGES_DIR_NAME: &str = "porter";

/// Policy for package reference tokens that fail to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TokenPolicy {
    /// Skip the malformed entry with a warning.
    #[default]
    Lenient,
    /// Abort the run.
    Strict,
}

/// Options controlling one resolver run.
#[derive(Debug, Clone)]
pub struct InstallOptions {
    /// How malformed reference tokens are handled.
    pub token_policy: TokenPolicy,
    /// Source file extension to wrap and install.
    pub source_extension: String,
    /// Suppress progress output; errors are still reported by the caller.
    pub quiet: bool,
}

impl Default for InstallOptions {
    fn default() -> Self {
        Self {
            token_policy: TokenPolicy::default(),
            source_extension: "cs".to_owned(),
            quiet: false,
        }
    }
}

/// Drives recursive resolution over a workspace.
pub struct Resolver<'a> {
    workspace: &'a Workspace,
    fetcher: &'a dyn Fetcher,
    options: InstallOptions,
}

impl<'a> Resolver<'a> {
    /// Creates a resolver over `workspace` using `fetcher` for clones.
    #[must_use]
    pub fn new(workspace: &'a Workspace, fetcher: &'a dyn Fetcher, options: InstallOptions) -> Self {
        Self {
            workspace,
            fetcher,
            options,
        }
    }

    /// Resolves the workspace root and everything beneath it.
    ///
    /// # Errors
    ///
    /// Returns the first fatal condition encountered; see [`PorterError`].
    pub fn run(&self, stderr: &mut dyn Write) -> Result<()> {
        self.process_directory(self.workspace.root(), &Context::default(), None, stderr)
    }

    /// Resolves one manifest directory.
    ///
    /// `required` is `None` only at the root, where the manifest's own
    /// runtimes become the run-wide requirement.
    fn process_directory(
        &self,
        dir: &Utf8Path,
        parent_context: &Context,
        required: Option<&[String]>,
        stderr: &mut dyn Write,
    ) -> Result<()> {
        let manifest_path = Manifest::path_in(dir);
        let manifest = Manifest::load(dir)?;

        let required: Vec<String> = match required {
            Some(runtimes) => runtimes.to_vec(),
            None => {
                if manifest.runtimes.is_empty() {
                    return Err(PorterError::MissingRuntimes {
                        path: manifest_path,
                    });
                }
                manifest.runtimes.clone()
            }
        };

        let context = parent_context.child(&manifest.name);
        log::debug!("processing {dir} at depth {}", context.depth());

        let refs = self.parse_references(&manifest, &manifest_path, stderr)?;
        reference::check_duplicates(&refs, &manifest_path)?;

        let packages_dir = dir.join(PACKAGES_DIR_NAME);
        fs::create_dir_all(&packages_dir)?;

        for package_ref in &refs {
            self.install_package(package_ref, &packages_dir, &context, &required, stderr)?;
        }

        Ok(())
    }

    /// Parses the manifest's reference tokens, applying the token policy.
    fn parse_references(
        &self,
        manifest: &Manifest,
        manifest_path: &Utf8Path,
        stderr: &mut dyn Write,
    ) -> Result<Vec<PackageRef>> {
        let mut refs = Vec::new();
        for token in &manifest.packages {
            match reference::parse(token) {
                Ok(package_ref) => refs.push(package_ref),
                Err(RefError::UnsupportedSource(source)) => {
                    return Err(PorterError::UnsupportedSource {
                        source_kind: source,
                        token: token.clone(),
                    });
                }
                Err(err) => {
                    if self.options.token_policy == TokenPolicy::Strict {
                        return Err(PorterError::MalformedReference {
                            token: token.clone(),
                            manifest: manifest_path.to_owned(),
                        });
                    }
                    log::warn!("skipping malformed package reference {token:?}: {err}");
                    if !self.options.quiet {
                        write_stderr_line(
                            stderr,
                            format!(
                                "Warning: skipping malformed package reference {token:?} in {manifest_path}: {err}"
                            ),
                        );
                    }
                }
            }
        }
        Ok(refs)
    }

    /// Installs one dependency: fetch, validate, wrap, copy, recurse.
    fn install_package(
        &self,
        package_ref: &PackageRef,
        packages_dir: &Utf8Path,
        context: &Context,
        required: &[String],
        stderr: &mut dyn Write,
    ) -> Result<()> {
        let staging = self.workspace.staging_dir(context);
        self.workspace.clear_staging(&staging)?;

        let url = package_ref.fetch_url();
        if !self.options.quiet {
            write_stderr_line(stderr, format!("Fetching {url} at tag {}...", package_ref.tag));
        }
        self.fetcher.fetch(&url, &package_ref.tag, &staging)?;

        // A fetched repository without its own manifest is not installable:
        // skip it entirely rather than install an unwrappable package.
        if !Manifest::exists_in(&staging) {
            log::warn!("package {} is not a porter package", package_ref.slug);
            if !self.options.quiet {
                write_stderr_line(
                    stderr,
                    format!(
                        "Warning: package {} at tag {} is not a porter package; skipping",
                        package_ref.slug, package_ref.tag
                    ),
                );
            }
            self.workspace.clear_staging(&staging)?;
            return Ok(());
        }

        let staged = Manifest::load(&staging)?;

        if !runtime::compatible(required, &staged.runtimes) {
            return Err(PorterError::RuntimeIncompatible {
                package: staged.name.clone(),
                declared: runtime::display_set(&staged.runtimes),
                required: runtime::display_set(required),
            });
        }

        // The install directory is named after the declared manifest name,
        // not the repository slug.
        let install_dir = packages_dir.join(&staged.name);
        if install_dir.is_dir() {
            fs::remove_dir_all(&install_dir).map_err(|e| PorterError::StagingFailed {
                reason: format!("could not replace install directory {install_dir}: {e}"),
            })?;
        }
        fs::create_dir_all(&install_dir)?;

        let child_context = context.child(&staged.name);
        self.copy_wrapped_sources(&staged, &staging, &install_dir, &child_context)?;

        fs::copy(
            Manifest::path_in(&staging),
            Manifest::path_in(&install_dir),
        )
        .map_err(|e| PorterError::StagingFailed {
            reason: format!("could not copy manifest into {install_dir}: {e}"),
        })?;

        self.workspace.clear_staging(&staging)?;

        if !self.options.quiet {
            write_stderr_line(stderr, installed_message(&staged.name));
        }

        // Depth-first: resolve the freshly installed package before the next
        // sibling begins.
        self.process_directory(&install_dir, context, Some(required), stderr)
    }

    /// Wraps and copies eligible sources from staging into the install dir,
    /// mirroring the export-root layout.
    fn copy_wrapped_sources(
        &self,
        staged: &Manifest,
        staging: &Utf8Path,
        install_dir: &Utf8Path,
        context: &Context,
    ) -> Result<()> {
        let export_root = staged.export_root(staging);
        if !export_root.is_dir() {
            return Err(PorterError::StagingFailed {
                reason: format!(
                    "export root {export_root} does not exist in package {}",
                    staged.name
                ),
            });
        }

        let filter = SourceFilter::new(&self.options.source_extension, &staged.ignore)?;
        for rel_path in filter.collect_sources(&export_root)? {
            let content = fs::read_to_string(export_root.join(&rel_path))?;
            let wrapped = wrapper::wrap(&content, context);

            let dest = install_dir.join(&rel_path);
            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&dest, wrapped)?;
            log::debug!("wrapped {rel_path}");
        }
        Ok(())
    }
}
