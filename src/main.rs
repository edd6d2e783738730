//! Porter CLI entrypoint.
//!
//! Resolves the install path, sets up the run-scoped workspace and fetcher,
//! drives the recursive resolver, and maps the result to an exit code. All
//! fatal conditions surface here as a human-readable diagnostic on stderr and
//! a non-zero status.

use camino::Utf8PathBuf;
use clap::Parser;
use porter::cli::{Cli, InstallArgs};
use porter::error::{PorterError, Result};
use porter::fetch::GitFetcher;
use porter::manifest::Manifest;
use porter::output::write_stderr_line;
use porter::resolver::{InstallOptions, Resolver, TokenPolicy};
use porter::workspace::Workspace;
use std::io::Write;
use std::time::Duration;

fn main() {
    let cli = Cli::parse();
    let mut stderr = std::io::stderr();
    let result = run(cli.install_args(), &mut stderr);
    let exit_code = exit_code_for_run_result(result, &mut stderr);
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

fn run(args: &InstallArgs, stderr: &mut dyn Write) -> Result<()> {
    let root = resolve_install_path(args.path.clone())?;
    if !root.is_dir() {
        return Err(PorterError::InstallDirNotFound { path: root });
    }
    if !Manifest::exists_in(&root) {
        return Err(PorterError::ManifestNotFound {
            path: Manifest::path_in(&root),
        });
    }

    if !args.quiet {
        write_stderr_line(stderr, format!("Installing porter packages in {root}..."));
    }

    let workspace = Workspace::create(&root)?;
    let fetcher = GitFetcher::new(Duration::from_secs(args.fetch_timeout));
    let options = InstallOptions {
        token_policy: if args.strict {
            TokenPolicy::Strict
        } else {
            TokenPolicy::Lenient
        },
        source_extension: args.source_ext.clone(),
        quiet: args.quiet,
    };

    let result = Resolver::new(&workspace, &fetcher, options).run(stderr);
    workspace.teardown();

    if result.is_ok() && !args.quiet {
        write_stderr_line(stderr, "Done installing");
    }
    result
}

/// Uses the CLI path when given, the current directory otherwise.
fn resolve_install_path(cli_path: Option<Utf8PathBuf>) -> Result<Utf8PathBuf> {
    match cli_path {
        Some(path) => Ok(path),
        None => {
            let cwd = std::env::current_dir()?;
            Utf8PathBuf::try_from(cwd).map_err(|e| PorterError::InvalidInstallDir {
                reason: e.to_string(),
            })
        }
    }
}

fn exit_code_for_run_result(result: Result<()>, stderr: &mut dyn Write) -> i32 {
    match result {
        Ok(()) => 0,
        Err(err) => {
            write_stderr_line(stderr, format!("ERROR: {err}"));
            1
        }
    }
}
