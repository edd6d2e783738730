//! Progress output for the porter CLI.
//!
//! User-facing progress goes to an injected writer so library callers and
//! tests can capture it; `log` carries diagnostics for embedders.

use std::io::Write;

/// Writes one line to the given writer, ignoring write failures.
pub fn write_stderr_line(stderr: &mut dyn Write, message: impl std::fmt::Display) {
    if writeln!(stderr, "{message}").is_err() {
        // Best-effort logging; ignore write failures.
    }
}

/// Confirmation line printed after one package installs successfully.
#[must_use]
pub fn installed_message(name: &str) -> String {
    format!("Installed package {name}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_stderr_line_appends_newline() {
        let mut sink = Vec::new();
        write_stderr_line(&mut sink, "hello");
        assert_eq!(sink, b"hello\n");
    }

    #[test]
    fn installed_message_names_the_package() {
        assert_eq!(installed_message("Widgets"), "Installed package Widgets");
    }
}
