//! Fixed limits and name sets shared across the pipeline.

/// Name of the per-project configuration file.
pub const DEFAULT_CONFIG_FILE: &str = ".contextr.toml";

/// Paths analysed when neither the command line nor the config names any.
pub const DEFAULT_PATHS: &[&str] = &["."];

/// Look-back window for "recent" files, in days.
pub const DEFAULT_RECENT_DAYS: u32 = 7;

/// Files larger than this are truncated when read.
pub const MAX_FILE_SIZE: u64 = 16 * 1024;

/// Bytes sampled from the head of a file for binary detection.
pub const CHUNK_SIZE: usize = 8192;

/// Fraction of printable characters a decoded sample needs to count as text.
pub const PRINTABLE_RATIO: f64 = 0.95;

/// Path components excluded anywhere below a walked directory.
pub const SKIP_DIRS: &[&str] = &[
    // Version control
    ".git",
    ".svn",
    ".hg",
    // Python caches
    "__pycache__",
    ".pytest_cache",
    // Node.js
    "node_modules",
    ".npm",
    // IDE
    ".vscode",
    ".idea",
    // Build output
    "build",
    "dist",
    "target",
    // Virtual environments
    ".env",
    "venv",
    ".venv",
    // Python tooling
    ".mypy_cache",
    ".tox",
    // Coverage reports
    "coverage",
    ".coverage",
    // OS metadata
    ".DS_Store",
    "Thumbs.db",
];

/// Check whether a single path component is in [`SKIP_DIRS`].
pub fn is_skipped_name(name: &str) -> bool {
    SKIP_DIRS.contains(&name)
}
