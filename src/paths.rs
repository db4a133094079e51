//! Input path resolution and repository-root selection.

use std::path::{Component, Path, PathBuf};

use crate::errors::ContextError;

/// Resolve user-supplied paths to absolute, existing filesystem entries.
///
/// Paths that do not exist are reported through the log and dropped.
/// Fails only when none of the inputs survive.
pub fn resolve_paths<S: AsRef<str>>(inputs: &[S]) -> Result<Vec<PathBuf>, ContextError> {
    let mut resolved = Vec::with_capacity(inputs.len());

    for input in inputs {
        let input = input.as_ref();
        match std::fs::canonicalize(input) {
            Ok(path) => resolved.push(path),
            Err(e) => log::warn!("Path does not exist: {} ({})", input, e),
        }
    }

    if resolved.is_empty() {
        return Err(ContextError::NoValidPaths);
    }

    Ok(resolved)
}

/// Pick the directory every relative path and tree label is computed against.
///
/// - one directory: the directory itself
/// - one file: its parent directory
/// - several paths: their longest common ancestor
pub fn determine_repo_root(paths: &[PathBuf]) -> Option<PathBuf> {
    match paths {
        [] => None,
        [single] => {
            if single.is_file() {
                Some(single.parent().map_or_else(|| single.clone(), Path::to_path_buf))
            } else {
                Some(single.clone())
            }
        }
        [first, rest @ ..] => {
            let mut common: Vec<Component<'_>> = first.components().collect();
            for path in rest {
                let shared = common
                    .iter()
                    .zip(path.components())
                    .take_while(|(a, b)| **a == *b)
                    .count();
                common.truncate(shared);
            }

            let root: PathBuf = common.iter().collect();
            // Identical file inputs share the file itself; use its directory.
            if root.is_file() {
                return root.parent().map(Path::to_path_buf);
            }
            Some(root)
        }
    }
}

/// Path of `path` relative to `root`, or `None` when it lies outside it.
pub fn relative_to<'a>(path: &'a Path, root: &Path) -> Option<&'a Path> {
    path.strip_prefix(root).ok()
}

/// Relative path rendered with `/` separators for display and map keys.
pub fn display_relative(path: &Path, root: &Path) -> String {
    let rel = relative_to(path, root).unwrap_or(path);
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
