//! Runtime compatibility checks.
//!
//! A package is usable by a consumer when the two runtime sets intersect;
//! exact match is not required. A package declaring no runtimes is never
//! compatible once runtimes are required.

/// Returns `true` when `candidate` declares at least one runtime that the
/// consumer requires.
#[must_use]
pub fn compatible(required: &[String], candidate: &[String]) -> bool {
    candidate.iter().any(|r| required.contains(r))
}

/// Formats a runtime set for diagnostics.
#[must_use]
pub fn display_set(runtimes: &[String]) -> String {
    runtimes.join(", ")
}
