//! Summary statistics over a file list.
//!
//! Binary and unreadable files are skipped silently by every function here.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::Serialize;

use crate::classify::is_binary_file;
use crate::reader::{count_lines, read_file_content};

/// Label used for files without an extension.
pub const NO_EXTENSION: &str = "no extension";

/// The text file with the most lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LargestFile {
    pub path: PathBuf,
    pub lines: usize,
}

/// Aggregate statistics for a file list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total_files: usize,
    pub total_lines: usize,
    pub file_type_counts: IndexMap<String, usize>,
    pub largest_file: Option<LargestFile>,
    pub average_lines: usize,
}

/// Lowercased extension of `path`, or [`NO_EXTENSION`].
pub fn extension_label(path: &Path) -> String {
    match path.extension().map(|e| e.to_string_lossy()) {
        Some(ext) if !ext.is_empty() => ext.to_lowercase(),
        _ => NO_EXTENSION.to_string(),
    }
}

/// Line count of a readable text file.
fn text_line_count(path: &Path) -> Option<usize> {
    if is_binary_file(path) {
        log::trace!("Skipping binary file in statistics: {}", path.display());
        return None;
    }
    read_file_content(path).map(|content| count_lines(&content))
}

/// Count text files per extension, most common first.
///
/// Extensions with equal counts stay in the order they were first seen.
pub fn file_type_counts(files: &[PathBuf]) -> IndexMap<String, usize> {
    let mut counts: IndexMap<String, usize> = IndexMap::new();

    for file in files {
        if is_binary_file(file) {
            continue;
        }
        *counts.entry(extension_label(file)).or_insert(0) += 1;
    }

    // IndexMap::sort_by is stable.
    counts.sort_by(|_, a, _, b| b.cmp(a));
    counts
}

/// Find the text file with the most lines; the first one wins a tie.
pub fn largest_file(files: &[PathBuf]) -> Option<LargestFile> {
    let mut largest: Option<LargestFile> = None;

    for file in files {
        let Some(lines) = text_line_count(file) else {
            continue;
        };
        let max_lines = largest.as_ref().map_or(0, |l| l.lines);
        if lines > max_lines {
            largest = Some(LargestFile {
                path: file.clone(),
                lines,
            });
        }
    }

    largest
}

/// Compute the full [`Summary`] for `files`.
pub fn summary(files: &[PathBuf]) -> Summary {
    let mut total_files = 0;
    let mut total_lines = 0;

    for file in files {
        if let Some(lines) = text_line_count(file) {
            total_files += 1;
            total_lines += lines;
        }
    }

    let average_lines = if total_files == 0 {
        0
    } else {
        total_lines / total_files
    };

    Summary {
        total_files,
        total_lines,
        file_type_counts: file_type_counts(files),
        largest_file: largest_file(files),
        average_lines,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_lines(dir: &TempDir, name: &str, lines: usize) -> PathBuf {
        let path = dir.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        let content: String = (0..lines).map(|i| format!("line {}\n", i)).collect();
        fs::write(&path, content).unwrap();
        path
    }

    fn write_binary(dir: &TempDir, name: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, [0u8; 512]).unwrap();
        path
    }

    #[test]
    fn test_extension_label() {
        assert_eq!(extension_label(Path::new("main.PY")), "py");
        assert_eq!(extension_label(Path::new("archive.tar.gz")), "gz");
        assert_eq!(extension_label(Path::new("Makefile")), NO_EXTENSION);
        assert_eq!(extension_label(Path::new(".gitignore")), NO_EXTENSION);
    }

    #[test]
    fn test_file_type_counts_excludes_binary() {
        let dir = TempDir::new().unwrap();
        let files = vec![
            write_lines(&dir, "a.py", 1),
            write_binary(&dir, "logo.png"),
            write_lines(&dir, "b.py", 1),
        ];

        let counts = file_type_counts(&files);
        assert_eq!(counts.get("py"), Some(&2));
        assert!(!counts.contains_key("png"));
    }

    #[test]
    fn test_file_type_counts_order() {
        let dir = TempDir::new().unwrap();
        let files = vec![
            write_lines(&dir, "z.md", 1),
            write_lines(&dir, "a.rs", 1),
            write_lines(&dir, "Makefile", 1),
            write_lines(&dir, "b.rs", 1),
            write_lines(&dir, "y.txt", 1),
        ];

        let counts = file_type_counts(&files);
        let keys: Vec<&str> = counts.keys().map(String::as_str).collect();
        // Ties keep first-seen order rather than sorting by name.
        assert_eq!(keys, vec!["rs", "md", NO_EXTENSION, "txt"]);
    }

    #[test]
    fn test_largest_file_first_wins_tie() {
        let dir = TempDir::new().unwrap();
        let files = vec![
            write_lines(&dir, "three.txt", 3),
            write_lines(&dir, "five_a.txt", 5),
            write_lines(&dir, "five_b.txt", 5),
        ];

        let largest = largest_file(&files).unwrap();
        assert_eq!(largest.path, files[1]);
        assert_eq!(largest.lines, 5);
    }

    #[test]
    fn test_largest_file_absent() {
        let dir = TempDir::new().unwrap();
        assert_eq!(largest_file(&[]), None);
        assert_eq!(largest_file(&[write_binary(&dir, "x.bin")]), None);
    }

    #[test]
    fn test_summary() {
        let dir = TempDir::new().unwrap();
        let files = vec![
            write_lines(&dir, "a.py", 10),
            write_binary(&dir, "b.png"),
            write_lines(&dir, "sub/c.py", 21),
        ];

        let summary = summary(&files);
        assert_eq!(summary.total_files, 2);
        assert_eq!(summary.total_lines, 31);
        assert_eq!(summary.average_lines, 15);
        assert_eq!(summary.largest_file.unwrap().lines, 21);
    }

    #[test]
    fn test_summary_empty() {
        let summary = summary(&[]);
        assert_eq!(summary.total_files, 0);
        assert_eq!(summary.average_lines, 0);
        assert!(summary.file_type_counts.is_empty());
        assert!(summary.largest_file.is_none());
    }
}
