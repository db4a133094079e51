//! File discovery over files and directory trees.
//!
//! Uses the `ignore` crate's walker with its gitignore/hidden filters switched
//! off: every descendant is visited, and only the fixed skip-set and the
//! optional include glob decide what is kept.

use std::path::{Path, PathBuf};

use glob::{MatchOptions, Pattern};
use ignore::WalkBuilder;
use thiserror::Error;

use crate::settings::is_skipped_name;

/// Errors reported (and skipped) while walking a directory.
#[derive(Debug, Error)]
pub enum WalkError {
    #[error("permission denied accessing directory: {path}")]
    PermissionDenied { path: PathBuf },

    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("walk error: {0}")]
    Other(String),
}

impl From<ignore::Error> for WalkError {
    fn from(err: ignore::Error) -> Self {
        let path = error_path(&err).unwrap_or_else(|| PathBuf::from("<walk error>"));
        let message = err.to_string();
        match err.into_io_error() {
            Some(io) if io.kind() == std::io::ErrorKind::PermissionDenied => {
                WalkError::PermissionDenied { path }
            }
            Some(io) => WalkError::Io { path, source: io },
            None => WalkError::Other(message),
        }
    }
}

fn error_path(err: &ignore::Error) -> Option<PathBuf> {
    match err {
        ignore::Error::WithPath { path, .. } => Some(path.clone()),
        ignore::Error::WithDepth { err, .. } | ignore::Error::WithLineNumber { err, .. } => {
            error_path(err)
        }
        _ => None,
    }
}

/// Compile an optional include glob (`*.py`, `test_?.rs`, `[ab]*`).
///
/// A pattern that is not a valid glob, such as an unclosed `[`, is matched
/// literally instead.
pub fn compile_include(pattern: Option<&str>) -> Option<Pattern> {
    let p = pattern?;
    match Pattern::new(p) {
        Ok(compiled) => Some(compiled),
        Err(e) => {
            log::warn!("Invalid include pattern '{}' ({}); matching it literally", p, e);
            Pattern::new(&Pattern::escape(p)).ok()
        }
    }
}

/// Glob matching follows the host's filename case rules.
fn match_options() -> MatchOptions {
    MatchOptions {
        case_sensitive: !cfg!(windows),
        require_literal_separator: false,
        require_literal_leading_dot: false,
    }
}

/// Check a file's base name against the include pattern.
pub fn should_include_file(path: &Path, include: Option<&Pattern>) -> bool {
    match include {
        None => true,
        Some(pattern) => path
            .file_name()
            .map(|name| pattern.matches_with(&name.to_string_lossy(), match_options()))
            .unwrap_or(false),
    }
}

/// Check whether any component of the full path is in the skip-set.
pub fn should_skip_path(path: &Path) -> bool {
    path.components()
        .any(|c| is_skipped_name(&c.as_os_str().to_string_lossy()))
}

/// Discover every file reachable from the given paths.
///
/// Explicitly named files only go through the include filter. Files found by
/// descending a directory must also pass [`should_skip_path`]. Directories that
/// cannot be read are logged and skipped. Order follows the walk; sort the
/// result when order matters.
pub fn discover_files(paths: &[PathBuf], include: Option<&Pattern>) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for path in paths {
        if path.is_file() {
            if should_include_file(path, include) {
                files.push(path.clone());
            }
        } else if path.is_dir() {
            walk_directory(path, include, &mut files);
        } else {
            log::debug!("Skipping path that is neither file nor directory: {}", path.display());
        }
    }

    files
}

fn walk_directory(root: &Path, include: Option<&Pattern>, files: &mut Vec<PathBuf>) {
    let walker = WalkBuilder::new(root)
        .standard_filters(false)
        .follow_links(false)
        // Skip-set directories below the root can never yield a kept file.
        .filter_entry(|entry| {
            entry.depth() == 0
                || !entry.file_type().is_some_and(|ft| ft.is_dir())
                || !is_skipped_name(&entry.file_name().to_string_lossy())
        })
        .build();

    for result in walker {
        match result {
            Ok(entry) => {
                let entry_path = entry.path();
                if entry_path.is_file()
                    && should_include_file(entry_path, include)
                    && !should_skip_path(entry_path)
                {
                    files.push(entry_path.to_path_buf());
                }
            }
            Err(err) => {
                let err = WalkError::from(err);
                log::warn!("{}", err);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn create_test_dir() -> TempDir {
        let dir = TempDir::new().unwrap();

        fs::create_dir_all(dir.path().join("src")).unwrap();
        fs::write(dir.path().join("src/main.py"), "print('hi')").unwrap();
        fs::write(dir.path().join("src/util.py"), "x = 1").unwrap();
        fs::write(dir.path().join("README.md"), "# readme").unwrap();
        fs::write(dir.path().join(".hidden.py"), "y = 2").unwrap();

        dir
    }

    fn names(files: &[PathBuf]) -> Vec<String> {
        let mut names: Vec<String> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_discover_basic() {
        let dir = create_test_dir();
        let files = discover_files(&[dir.path().to_path_buf()], None);

        // Hidden files are not filtered.
        assert_eq!(
            names(&files),
            vec![".hidden.py", "README.md", "main.py", "util.py"]
        );
        assert!(files.iter().all(|p| p.is_file()));
    }

    #[test]
    fn test_discover_include_pattern() {
        let dir = create_test_dir();
        let pattern = compile_include(Some("*.py"));
        let files = discover_files(&[dir.path().to_path_buf()], pattern.as_ref());

        assert_eq!(names(&files), vec![".hidden.py", "main.py", "util.py"]);
    }

    #[test]
    fn test_include_matches_base_name_only() {
        let pattern = Pattern::new("src*").unwrap();
        assert!(!should_include_file(Path::new("/repo/src/main.py"), Some(&pattern)));
        assert!(should_include_file(Path::new("/repo/lib/src_gen.py"), Some(&pattern)));

        let seq = Pattern::new("[ab]?.rs").unwrap();
        assert!(should_include_file(Path::new("a1.rs"), Some(&seq)));
        assert!(!should_include_file(Path::new("c1.rs"), Some(&seq)));
    }

    #[test]
    fn test_discover_skips_excluded_dirs() {
        let dir = create_test_dir();
        for skipped in [".git", "node_modules/pkg/deep", "__pycache__"] {
            let sub = dir.path().join(skipped);
            fs::create_dir_all(&sub).unwrap();
            fs::write(sub.join("hidden.py"), "z = 3").unwrap();
        }

        let pattern = compile_include(Some("*.py"));
        let files = discover_files(&[dir.path().to_path_buf()], pattern.as_ref());

        assert!(!files.iter().any(|p| p.ends_with("hidden.py")));
        assert!(!files.iter().any(|p| should_skip_path(p)));
    }

    #[test]
    fn test_explicit_file_bypasses_skip_set() {
        let dir = TempDir::new().unwrap();
        let build = dir.path().join("build");
        fs::create_dir_all(&build).unwrap();
        fs::write(build.join("out.txt"), "artifact").unwrap();

        let files = discover_files(&[build.join("out.txt")], None);
        assert_eq!(files.len(), 1);

        let walked = discover_files(&[dir.path().to_path_buf()], None);
        assert!(walked.is_empty());
    }

    #[test]
    fn test_explicit_file_respects_include() {
        let dir = create_test_dir();
        let pattern = compile_include(Some("*.rs"));
        let files = discover_files(&[dir.path().join("README.md")], pattern.as_ref());
        assert!(files.is_empty());
    }

    #[test]
    fn test_invalid_pattern_matches_literally() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("["), "bracket").unwrap();
        fs::write(dir.path().join("a.py"), "x = 1").unwrap();

        let pattern = compile_include(Some("["));
        assert!(pattern.is_some());
        let files = discover_files(&[dir.path().to_path_buf()], pattern.as_ref());
        assert_eq!(names(&files), vec!["["]);

        assert!(compile_include(None).is_none());
    }

    #[test]
    fn test_should_skip_path() {
        assert!(should_skip_path(Path::new("/repo/.git/config")));
        assert!(should_skip_path(Path::new("/repo/a/b/node_modules/x.js")));
        assert!(should_skip_path(Path::new("/repo/.DS_Store")));
        assert!(!should_skip_path(Path::new("/repo/src/builder.rs")));
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_directory_is_skipped() {
        use std::os::unix::fs::PermissionsExt;

        let dir = create_test_dir();
        let locked = dir.path().join("locked");
        fs::create_dir(&locked).unwrap();
        fs::write(locked.join("secret.py"), "s = 1").unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        let files = discover_files(&[dir.path().to_path_buf()], None);
        // Root ignores directory permissions.
        let unreadable = fs::read_dir(&locked).is_err();

        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        assert!(files.iter().any(|p| p.ends_with("main.py")));
        assert_eq!(
            files.iter().any(|p| p.ends_with("secret.py")),
            !unreadable
        );
    }
}
