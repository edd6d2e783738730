//! Namespace wrapping transform.
//!
//! Installed source files are nested inside one namespace scope per package
//! in the dependency chain, so a vendored dependency's symbols can never
//! collide with unrelated code. A sentinel comment delimits the injected
//! header and trailer from the original body and makes the transform
//! idempotent: wrapping already-wrapped text is a no-op.

use crate::context::Context;

/// Sentinel comment marking wrapped content.
pub const SENTINEL: &str = "//PORTER-WRAPPER!";

/// Suffix appended to each package name when forming its namespace scope.
const NAMESPACE_SUFFIX: &str = "Porter_Packages";

/// Whether `content` has already been wrapped.
#[must_use]
pub fn is_wrapped(content: &str) -> bool {
    content.contains(SENTINEL)
}

/// Wraps `content` in one namespace scope per context name, outermost scope
/// first (the root project), innermost last (the current package).
///
/// Already-wrapped content is returned unchanged.
#[must_use]
pub fn wrap(content: &str, context: &Context) -> String {
    if is_wrapped(content) {
        return content.to_owned();
    }

    let mut lead = format!("{SENTINEL}\n");
    let mut tail = String::new();
    for name in context.names() {
        lead.push_str("namespace ");
        lead.push_str(name);
        lead.push('.');
        lead.push_str(NAMESPACE_SUFFIX);
        lead.push_str(" {\n");
        tail.push_str("}\n");
    }

    format!("{lead}{SENTINEL}\n\n\n{content}\n\n{SENTINEL}\n{tail}{SENTINEL}")
}
