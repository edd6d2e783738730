//! Source file enumeration and filtering.
//!
//! Selects which files of a fetched package are installed: files carrying the
//! configured source extension under the package's export root, minus a small
//! built-in blacklist and anything matching the manifest's `ignore` globs.

use crate::error::{PorterError, Result};
use camino::{Utf8Path, Utf8PathBuf};
use glob::{MatchOptions, Pattern};
use std::fs;

/// File names never copied out of a fetched package. A vendored assembly
/// definition would override the parent project's own properties.
const FILE_BLACKLIST: &[&str] = &["CustomAssemblyInfo.cs"];

/// Eligibility filter for one package's source files.
#[derive(Debug, Clone)]
pub struct SourceFilter {
    extension: String,
    ignore: Vec<Pattern>,
}

impl SourceFilter {
    /// Compiles a filter for the given extension and ignore globs.
    ///
    /// # Errors
    ///
    /// Returns `InvalidIgnorePattern` when a glob fails to compile.
    pub fn new(extension: &str, ignore_globs: &[String]) -> Result<Self> {
        let ignore = ignore_globs
            .iter()
            .map(|raw| {
                Pattern::new(raw).map_err(|e| PorterError::InvalidIgnorePattern {
                    pattern: raw.clone(),
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            extension: extension.trim_start_matches('.').to_owned(),
            ignore,
        })
    }

    /// Whether a file at `rel_path` (relative to the export root) should be
    /// installed.
    #[must_use]
    pub fn is_eligible(&self, rel_path: &Utf8Path) -> bool {
        let Some(extension) = rel_path.extension() else {
            return false;
        };
        if !extension.eq_ignore_ascii_case(&self.extension) {
            return false;
        }

        let name = rel_path.file_name().unwrap_or_default();
        if FILE_BLACKLIST.contains(&name) {
            log::debug!("skipping blacklisted file {rel_path}");
            return false;
        }

        let options = MatchOptions {
            case_sensitive: false,
            ..MatchOptions::new()
        };
        let ignored = self.ignore.iter().any(|pattern| {
            pattern.matches_with(rel_path.as_str(), options)
                || pattern.matches_with(name, options)
        });
        !ignored
    }

    /// Recursively enumerates eligible files under `root`, returning paths
    /// relative to it in sorted order.
    ///
    /// # Errors
    ///
    /// Returns an I/O error when a directory cannot be read.
    pub fn collect_sources(&self, root: &Utf8Path) -> Result<Vec<Utf8PathBuf>> {
        let mut found = Vec::new();
        self.walk(root, Utf8Path::new(""), &mut found)?;
        found.sort();
        Ok(found)
    }

    fn walk(&self, root: &Utf8Path, rel: &Utf8Path, found: &mut Vec<Utf8PathBuf>) -> Result<()> {
        for entry in fs::read_dir(root.join(rel))? {
            let entry = entry?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                // Non-UTF-8 names can never carry the source extension.
                continue;
            };
            let rel_path = rel.join(name);
            let file_type = entry.file_type()?;

            if file_type.is_dir() {
                if name == ".git" {
                    continue;
                }
                self.walk(root, &rel_path, found)?;
            } else if file_type.is_file() && self.is_eligible(&rel_path) {
                found.push(rel_path);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    struct TempTree {
        _temp: TempDir,
        path: Utf8PathBuf,
    }

    #[fixture]
    fn temp_tree() -> TempTree {
        let temp = TempDir::new().expect("failed to create temp dir");
        let path = Utf8PathBuf::try_from(temp.path().to_owned()).expect("non-UTF8 temp path");
        TempTree { _temp: temp, path }
    }

    fn touch(root: &Utf8Path, rel: &str) {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("mkdir");
        }
        std::fs::write(path, "class X {}").expect("write");
    }

    fn filter(ignore: &[&str]) -> SourceFilter {
        let globs: Vec<String> = ignore.iter().map(|s| (*s).to_owned()).collect();
        SourceFilter::new("cs", &globs).expect("compile filter")
    }

    #[rstest]
    #[case::matching("Foo.cs", true)]
    #[case::case_insensitive_extension("Foo.CS", true)]
    #[case::wrong_extension("Foo.txt", false)]
    #[case::no_extension("Makefile", false)]
    #[case::blacklisted("Properties/CustomAssemblyInfo.cs", false)]
    fn is_eligible_filters_by_extension_and_blacklist(#[case] rel: &str, #[case] expected: bool) {
        assert_eq!(filter(&[]).is_eligible(Utf8Path::new(rel)), expected);
    }

    #[rstest]
    #[case::by_name("*.g.cs", "obj/Model.g.cs", false)]
    #[case::by_path("tests/*", "tests/FooTests.cs", false)]
    #[case::unmatched("tests/*", "src/Foo.cs", true)]
    fn is_eligible_honours_ignore_globs(
        #[case] pattern: &str,
        #[case] rel: &str,
        #[case] expected: bool,
    ) {
        assert_eq!(filter(&[pattern]).is_eligible(Utf8Path::new(rel)), expected);
    }

    #[test]
    fn new_rejects_invalid_glob() {
        let err = SourceFilter::new("cs", &["[".to_owned()]).expect_err("expected glob failure");
        assert!(matches!(err, PorterError::InvalidIgnorePattern { .. }));
    }

    #[rstest]
    fn collect_sources_recurses_and_sorts(temp_tree: TempTree) {
        touch(&temp_tree.path, "b/Nested.cs");
        touch(&temp_tree.path, "A.cs");
        touch(&temp_tree.path, "readme.md");

        let found = filter(&[]).collect_sources(&temp_tree.path).expect("collect");
        assert_eq!(
            found,
            vec![Utf8PathBuf::from("A.cs"), Utf8PathBuf::from("b/Nested.cs")]
        );
    }

    #[rstest]
    fn collect_sources_skips_git_directory(temp_tree: TempTree) {
        touch(&temp_tree.path, ".git/hooks/sample.cs");
        touch(&temp_tree.path, "Foo.cs");

        let found = filter(&[]).collect_sources(&temp_tree.path).expect("collect");
        assert_eq!(found, vec![Utf8PathBuf::from("Foo.cs")]);
    }

    #[rstest]
    fn collect_sources_applies_ignore_globs(temp_tree: TempTree) {
        touch(&temp_tree.path, "Foo.cs");
        touch(&temp_tree.path, "Foo.Designer.cs");

        let found = filter(&["*.Designer.cs"])
            .collect_sources(&temp_tree.path)
            .expect("collect");
        assert_eq!(found, vec![Utf8PathBuf::from("Foo.cs")]);
    }
}
