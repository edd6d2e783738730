//! Ancestor package chain threaded through recursive resolution.
//!
//! The context is the ordered chain of package names from the root project
//! down to the package currently being processed. It determines namespace
//! nesting depth and keys the staging directory. Extension always produces a
//! new value, so sibling branches of the traversal can never alias each
//! other's chain.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;

/// Immutable chain of package names, root first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Context {
    names: Vec<String>,
}

impl Context {
    /// Returns a new context extended by one package name. `self` is left
    /// untouched.
    #[must_use]
    pub fn child(&self, name: &str) -> Self {
        let mut names = self.names.clone();
        names.push(name.to_owned());
        Self { names }
    }

    /// Number of packages in the chain; equals recursion depth.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.names.len()
    }

    /// Package names from the root of the chain to the current package.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Deterministic filesystem-safe key for this chain's staging directory.
    ///
    /// The chain is joined with `_` and encoded with the URL-safe base64
    /// alphabet, which never produces path separators or other characters
    /// needing substitution.
    #[must_use]
    pub fn staging_key(&self) -> String {
        URL_SAFE_NO_PAD.encode(self.names.join("_"))
    }
}
