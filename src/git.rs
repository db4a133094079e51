//! Repository metadata from the `git` command line.
//!
//! Every public function degrades to an absent or empty value when git is
//! missing, the path is not in a repository, or a command fails.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::process::Command;

use serde::Serialize;
use thiserror::Error;

use crate::paths::relative_to;

#[derive(Debug, Error)]
enum GitError {
    #[error("git is not installed")]
    NotInstalled,

    #[error("not a git repository")]
    NotARepo,

    #[error("git command failed: {0}")]
    CommandFailed(String),
}

/// Commit metadata for the repository head.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GitInfo {
    pub commit: String,
    pub branch: String,
    pub author: String,
    pub date: String,
}

fn run_git(root: &Path, args: &[&str]) -> Result<String, GitError> {
    let output = Command::new("git")
        .args(args)
        .current_dir(root)
        .output()
        .map_err(|_| GitError::NotInstalled)?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        if stderr.contains("not a git repository") {
            return Err(GitError::NotARepo);
        }
        return Err(GitError::CommandFailed(stderr.trim().to_string()));
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Output of a git command, or empty on failure.
fn git_output(root: &Path, args: &[&str]) -> String {
    run_git(root, args).unwrap_or_else(|e| {
        log::debug!("git {} in {}: {}", args.join(" "), root.display(), e);
        String::new()
    })
}

/// Nearest ancestor of `start` (itself included) containing a `.git` entry.
pub fn find_git_root(start: &Path) -> Option<PathBuf> {
    let start = start.canonicalize().unwrap_or_else(|_| start.to_path_buf());
    start
        .ancestors()
        .find(|dir| dir.join(".git").exists())
        .map(Path::to_path_buf)
}

/// Head commit details, or `None` outside a repository or before the first
/// commit.
pub fn git_info(path: &Path) -> Option<GitInfo> {
    let root = find_git_root(path)?;

    let commit = git_output(&root, &["rev-parse", "HEAD"]);
    if commit.is_empty() {
        return None;
    }

    let or_default = |value: String, default: &str| {
        if value.is_empty() {
            default.to_string()
        } else {
            value
        }
    };

    Some(GitInfo {
        commit,
        branch: or_default(git_output(&root, &["rev-parse", "--abbrev-ref", "HEAD"]), "HEAD"),
        author: or_default(git_output(&root, &["log", "-1", "--pretty=format:%an <%ae>"]), "Unknown"),
        date: or_default(git_output(&root, &["log", "-1", "--pretty=format:%cd"]), "Unknown"),
    })
}

/// Files touched by commits in the last `days` days, as absolute paths.
///
/// Only files that still exist are returned, each once, in the order git
/// first lists them.
pub fn recent_files(path: &Path, days: u32) -> Vec<PathBuf> {
    let Some(root) = find_git_root(path) else {
        return Vec::new();
    };

    let since = format!("--since={}.days.ago", days);
    let output = git_output(&root, &["log", &since, "--name-only", "--pretty=format:", "--"]);

    let mut seen = HashSet::new();
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| root.join(line))
        .filter(|file| file.is_file())
        .filter(|file| seen.insert(file.clone()))
        .collect()
}

/// Last commit time of `file` as `YYYY-MM-DD HH:MM:SS`, without the zone.
pub fn file_timestamp(file: &Path, git_root: &Path) -> Option<String> {
    let relative = relative_to(file, git_root)?;
    let relative = relative.to_string_lossy();

    let output = run_git(git_root, &["log", "-1", "--pretty=format:%ci", "--", &relative]).ok()?;
    if output.is_empty() {
        return None;
    }

    Some(output.split(' ').take(2).collect::<Vec<_>>().join(" "))
}

/// Discovered files that git also reports as recent, in discovery order.
pub fn intersect_recent(recent: &[PathBuf], discovered: &[PathBuf]) -> Vec<PathBuf> {
    let recent: HashSet<&PathBuf> = recent.iter().collect();
    discovered
        .iter()
        .filter(|file| recent.contains(file))
        .cloned()
        .collect()
}
