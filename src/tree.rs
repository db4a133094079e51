//! Directory tree rendering with box-drawing characters.
//!
//! Two layouts share the same connectors. The plain tree lists files before
//! directories, both alphabetically, and has no root line. The token tree
//! lists directories first (alphabetically, case-insensitive) and then files by
//! descending token count, under a root line carrying the overall total.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::paths::relative_to;
use crate::tokens::{format_token_count, TokenNode, TokenTree};

/// Box-drawing characters for tree rendering.
const BRANCH: &str = "├── ";
const LAST_BRANCH: &str = "└── ";
const VERTICAL: &str = "│   ";
const SPACE: &str = "    ";

/// Entry of the plain tree: a file marker or a directory of entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlainNode {
    File,
    Directory(BTreeMap<String, PlainNode>),
}

impl PlainNode {
    pub fn is_directory(&self) -> bool {
        matches!(self, PlainNode::Directory(_))
    }
}

/// Nest `files` by path segment below `root`. Files outside `root` are
/// skipped.
pub fn build_plain_tree(files: &[PathBuf], root: &Path) -> BTreeMap<String, PlainNode> {
    let mut tree = BTreeMap::new();

    for file in files {
        let Some(relative) = relative_to(file, root) else {
            continue;
        };
        let parts: Vec<String> = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        insert_plain(&mut tree, &parts);
    }

    tree
}

fn insert_plain(tree: &mut BTreeMap<String, PlainNode>, parts: &[String]) {
    match parts {
        [] => {}
        [name] => {
            tree.insert(name.clone(), PlainNode::File);
        }
        [dir, rest @ ..] => {
            let node = tree
                .entry(dir.clone())
                .or_insert_with(|| PlainNode::Directory(BTreeMap::new()));
            if let PlainNode::Directory(children) = node {
                insert_plain(children, rest);
            }
        }
    }
}

/// Render the plain tree of `files` relative to `root`.
///
/// Returns an empty string for an empty file list. Lines are joined with
/// `\n`, without a trailing newline.
///
/// # Examples
///
/// ```
/// use std::path::{Path, PathBuf};
/// use contextr::tree::render_plain;
///
/// let files = vec![PathBuf::from("/repo/src/lib.rs"), PathBuf::from("/repo/README.md")];
/// let output = render_plain(&files, Path::new("/repo"));
/// assert_eq!(output, "├── README.md\n└── src/\n    └── lib.rs");
/// ```
pub fn render_plain(files: &[PathBuf], root: &Path) -> String {
    let tree = build_plain_tree(files, root);
    let mut lines = Vec::new();
    render_plain_level(&mut lines, &tree, "");
    lines.join("\n")
}

fn render_plain_level(lines: &mut Vec<String>, tree: &BTreeMap<String, PlainNode>, prefix: &str) {
    let mut items: Vec<(&String, &PlainNode)> = tree.iter().collect();
    // Files first; BTreeMap order already gives names within each group.
    items.sort_by_key(|(_, node)| node.is_directory());

    let count = items.len();
    for (i, (name, node)) in items.into_iter().enumerate() {
        let is_last = i + 1 == count;
        let branch = if is_last { LAST_BRANCH } else { BRANCH };

        match node {
            PlainNode::File => lines.push(format!("{}{}{}", prefix, branch, name)),
            PlainNode::Directory(children) => {
                lines.push(format!("{}{}{}/", prefix, branch, name));
                let continuation = if is_last { SPACE } else { VERTICAL };
                render_plain_level(lines, children, &format!("{}{}", prefix, continuation));
            }
        }
    }
}

/// Render a token tree under a root line `name/ (N tokens)`.
///
/// The root name is the last component of `root`, or the whole path when it
/// has none (e.g. `/`).
pub fn render_token_tree(tree: &TokenTree, root: &Path) -> String {
    let root_name = root
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| root.display().to_string());

    let mut lines = vec![format!(
        "{}/ ({} tokens)",
        root_name,
        format_token_count(tree.root_tokens())
    )];
    render_token_level(&mut lines, &tree.tree, "");
    lines.join("\n")
}

/// Directories first by lowercased name, then files by descending tokens.
fn compare_token_entries(a: &(&String, &TokenNode), b: &(&String, &TokenNode)) -> Ordering {
    match (a.1, b.1) {
        (TokenNode::Directory { .. }, TokenNode::File { .. }) => Ordering::Less,
        (TokenNode::File { .. }, TokenNode::Directory { .. }) => Ordering::Greater,
        (TokenNode::Directory { .. }, TokenNode::Directory { .. }) => {
            a.0.to_lowercase().cmp(&b.0.to_lowercase())
        }
        (TokenNode::File { tokens: x }, TokenNode::File { tokens: y }) => y.cmp(x),
    }
}

fn render_token_level(lines: &mut Vec<String>, tree: &BTreeMap<String, TokenNode>, prefix: &str) {
    let mut items: Vec<(&String, &TokenNode)> = tree.iter().collect();
    items.sort_by(compare_token_entries);

    let count = items.len();
    for (i, (name, node)) in items.into_iter().enumerate() {
        let is_last = i + 1 == count;
        let branch = if is_last { LAST_BRANCH } else { BRANCH };
        let tokens = format_token_count(node.tokens());

        match node {
            TokenNode::File { .. } => {
                lines.push(format!("{}{}{} ({} tokens)", prefix, branch, name, tokens));
            }
            TokenNode::Directory { children, .. } => {
                lines.push(format!("{}{}{}/ ({} tokens)", prefix, branch, name, tokens));
                let continuation = if is_last { SPACE } else { VERTICAL };
                render_token_level(lines, children, &format!("{}{}", prefix, continuation));
            }
        }
    }
}
