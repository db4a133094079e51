//! Token estimation for LLM context budgets.
//!
//! Counts are a character-ratio approximation (about four characters per
//! token), not the output of a real tokenizer. Per-file counts can be rolled up
//! onto the directory structure as a [`TokenTree`].

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use serde::Serialize;

use crate::classify::is_binary_file;
use crate::paths::relative_to;
use crate::reader::read_file_content;

/// Default characters-per-token ratio.
pub const CHARS_PER_TOKEN: f64 = 4.0;

/// Character-ratio token estimator.
///
/// # Examples
///
/// ```
/// use contextr::tokens::TokenCounter;
///
/// let counter = TokenCounter::default();
/// assert_eq!(counter.estimate_tokens("Hello, World!"), 3);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct TokenCounter {
    chars_per_token: f64,
}

impl TokenCounter {
    /// Create a counter with a custom ratio. Non-positive or non-finite
    /// ratios fall back to [`CHARS_PER_TOKEN`].
    pub fn new(chars_per_token: f64) -> Self {
        if chars_per_token.is_finite() && chars_per_token > 0.0 {
            Self { chars_per_token }
        } else {
            log::warn!(
                "Invalid chars-per-token ratio {}, using {}",
                chars_per_token,
                CHARS_PER_TOKEN
            );
            Self::default()
        }
    }

    /// Get the ratio this counter uses.
    pub fn chars_per_token(&self) -> f64 {
        self.chars_per_token
    }

    /// Estimate tokens in `text`: character count divided by the ratio,
    /// rounded down.
    pub fn estimate_tokens(&self, text: &str) -> usize {
        if text.is_empty() {
            return 0;
        }
        (text.chars().count() as f64 / self.chars_per_token) as usize
    }

    /// Tokens in a single file. Binary files count as `Some(0)`; files that
    /// cannot be read give `None`.
    pub fn count_file_tokens(&self, path: &Path) -> Option<usize> {
        if is_binary_file(path) {
            return Some(0);
        }
        read_file_content(path).map(|content| self.estimate_tokens(&content))
    }

    /// Like [`count_file_tokens`](Self::count_file_tokens), with unreadable
    /// files counted as zero.
    pub fn count_file_tokens_lenient(&self, path: &Path) -> usize {
        self.count_file_tokens(path).unwrap_or(0)
    }

    /// Lenient token counts for many files.
    ///
    /// Every file whose metadata can be read appears in the result, binary and
    /// empty files included.
    pub fn count_files_tokens(&self, files: &[PathBuf]) -> BTreeMap<PathBuf, usize> {
        files
            .par_iter()
            .filter_map(|path| {
                if let Err(e) = std::fs::metadata(path) {
                    log::warn!("Cannot stat {}: {}", path.display(), e);
                    return None;
                }
                Some((path.clone(), self.count_file_tokens_lenient(path)))
            })
            .collect()
    }

    /// Build a hierarchical token tree rooted at `root`.
    ///
    /// With `threshold > 0`, files below the threshold are left out of both
    /// the tree and the total. Files outside `root` are counted in
    /// `file_count` but not placed in the tree.
    pub fn build_token_tree(&self, files: &[PathBuf], root: &Path, threshold: usize) -> TokenTree {
        let mut counts = self.count_files_tokens(files);
        if threshold > 0 {
            counts.retain(|_, count| *count >= threshold);
        }

        let mut tree = BTreeMap::new();
        let mut total_tokens = 0;

        for (path, &count) in &counts {
            let Some(relative) = relative_to(path, root) else {
                log::debug!("Skipping file outside {}: {}", root.display(), path.display());
                continue;
            };

            let parts: Vec<String> = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect();

            if insert_leaf(&mut tree, &parts, count) {
                total_tokens += count;
            }
        }

        roll_up(&mut tree);

        TokenTree {
            tree,
            total_tokens,
            file_count: counts.len(),
            threshold,
        }
    }
}

impl Default for TokenCounter {
    fn default() -> Self {
        Self {
            chars_per_token: CHARS_PER_TOKEN,
        }
    }
}

/// Node of a token tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TokenNode {
    File {
        tokens: usize,
    },
    /// Directory total is the sum of its children once rolled up.
    Directory {
        tokens: usize,
        children: BTreeMap<String, TokenNode>,
    },
}

impl TokenNode {
    fn empty_directory() -> Self {
        TokenNode::Directory {
            tokens: 0,
            children: BTreeMap::new(),
        }
    }

    pub fn tokens(&self) -> usize {
        match self {
            TokenNode::File { tokens } | TokenNode::Directory { tokens, .. } => *tokens,
        }
    }

    pub fn is_directory(&self) -> bool {
        matches!(self, TokenNode::Directory { .. })
    }

    /// Child nodes; empty for files.
    pub fn children(&self) -> Option<&BTreeMap<String, TokenNode>> {
        match self {
            TokenNode::Directory { children, .. } => Some(children),
            TokenNode::File { .. } => None,
        }
    }
}

/// Result of [`TokenCounter::build_token_tree`].
#[derive(Debug, Clone, Serialize)]
pub struct TokenTree {
    /// Top-level entries below the root, keyed by name.
    pub tree: BTreeMap<String, TokenNode>,
    /// Sum of the per-file counts placed in the tree.
    pub total_tokens: usize,
    /// Files that survived the threshold.
    pub file_count: usize,
    pub threshold: usize,
}

impl TokenTree {
    /// Sum of the rolled-up top-level node totals.
    pub fn root_tokens(&self) -> usize {
        self.tree.values().map(TokenNode::tokens).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }
}

fn insert_leaf(tree: &mut BTreeMap<String, TokenNode>, parts: &[String], tokens: usize) -> bool {
    match parts {
        [] => false,
        [name] => {
            tree.insert(name.clone(), TokenNode::File { tokens });
            true
        }
        [dir, rest @ ..] => {
            match tree.entry(dir.clone()).or_insert_with(TokenNode::empty_directory) {
                TokenNode::Directory { children, .. } => insert_leaf(children, rest, tokens),
                TokenNode::File { .. } => false,
            }
        }
    }
}

/// Set every directory's total to the sum of its children, deepest first.
fn roll_up(tree: &mut BTreeMap<String, TokenNode>) -> usize {
    tree.values_mut()
        .map(|node| match node {
            TokenNode::File { tokens } => *tokens,
            TokenNode::Directory { tokens, children } => {
                *tokens = roll_up(children);
                *tokens
            }
        })
        .sum()
}

/// Format a token count with `,` thousands separators.
pub fn format_token_count(n: usize) -> String {
    let s = n.to_string();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}
