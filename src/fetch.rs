//! Repository fetching.
//!
//! Fetching is porter's only external collaborator: a "clone repository at
//! tag into path" capability that either succeeds or reports a failure. It is
//! expressed as a trait so the resolver can be exercised in tests without a
//! network. The real implementation shells out to git with a bounded wait, so
//! a hung clone surfaces as a reported timeout instead of stalling the run
//! indefinitely.

use crate::error::{PorterError, Result};
use camino::Utf8Path;
use std::process::{Command, Output, Stdio};
use std::time::Duration;
use wait_timeout::ChildExt;

/// Default timeout for one fetch (5 minutes).
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(300);

/// Fetches a repository at a pinned tag into a destination directory.
#[cfg_attr(test, mockall::automock)]
pub trait Fetcher {
    /// Fetches `url` at `tag` into `dest`. `dest` does not exist beforehand.
    ///
    /// # Errors
    ///
    /// Returns `PorterError::Fetch` when the fetch fails or times out.
    fn fetch(&self, url: &str, tag: &str, dest: &Utf8Path) -> Result<()>;
}

/// Fetches repositories by shelling out to `git clone`.
#[derive(Debug, Clone)]
pub struct GitFetcher {
    timeout: Duration,
}

impl GitFetcher {
    /// Creates a fetcher that abandons clones exceeding `timeout`.
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Default for GitFetcher {
    fn default() -> Self {
        Self::new(DEFAULT_FETCH_TIMEOUT)
    }
}

impl Fetcher for GitFetcher {
    fn fetch(&self, url: &str, tag: &str, dest: &Utf8Path) -> Result<()> {
        if let Some(parent) = dest.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let args = [
            "clone",
            "--depth",
            "1",
            "--branch",
            tag,
            url,
            dest.as_str(),
        ];
        let output = match run_git_with_timeout(&args, self.timeout)? {
            Some(output) => output,
            None => {
                return Err(PorterError::Fetch {
                    url: url.to_owned(),
                    tag: tag.to_owned(),
                    message: format!("clone timed out after {} seconds", self.timeout.as_secs()),
                });
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(PorterError::Fetch {
                url: url.to_owned(),
                tag: tag.to_owned(),
                message: stderr.trim().to_owned(),
            });
        }

        Ok(())
    }
}

/// Runs a git command with a timeout.
///
/// Returns `Ok(None)` when the command exceeds the timeout; the child is
/// killed before returning.
fn run_git_with_timeout(args: &[&str], timeout: Duration) -> Result<Option<Output>> {
    let mut cmd = Command::new("git");
    cmd.args(args).stdout(Stdio::piped()).stderr(Stdio::piped());

    let mut child = cmd.spawn()?;

    match child.wait_timeout(timeout)? {
        Some(status) => {
            let stdout = child
                .stdout
                .take()
                .map(std::io::read_to_string)
                .transpose()?
                .unwrap_or_default();
            let stderr = child
                .stderr
                .take()
                .map(std::io::read_to_string)
                .transpose()?
                .unwrap_or_default();

            Ok(Some(Output {
                status,
                stdout: stdout.into_bytes(),
                stderr: stderr.into_bytes(),
            }))
        }
        None => {
            let _ = child.kill();
            let _ = child.wait();
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_error_reports_timeout_duration() {
        let err = PorterError::Fetch {
            url: "https://github.com/acme/widgets".to_owned(),
            tag: "v1.0".to_owned(),
            message: "clone timed out after 300 seconds".to_owned(),
        };
        let msg = err.to_string();
        assert!(msg.contains("timed out"));
        assert!(msg.contains("300"));
    }

    #[test]
    fn default_fetcher_uses_five_minute_timeout() {
        let fetcher = GitFetcher::default();
        assert_eq!(fetcher.timeout, DEFAULT_FETCH_TIMEOUT);
    }
}
