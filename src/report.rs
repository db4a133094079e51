//! Markdown and JSON report assembly.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::classify::is_binary_file;
use crate::errors::ContextError;
use crate::git::{file_timestamp, GitInfo};
use crate::languages::language_for_extension;
use crate::paths::display_relative;
use crate::reader::{count_lines, read_file_content};
use crate::stats::{self, Summary};
use crate::tokens::{format_token_count, TokenCounter, TokenTree};
use crate::tree::{render_plain, render_token_tree};

/// Shown by the token report when discovery found nothing.
pub const NO_FILES_MESSAGE: &str = "No files found to analyze.";

/// Everything the repository report is assembled from.
#[derive(Debug, Clone)]
pub struct ReportContext<'a> {
    pub repo_root: &'a Path,
    pub git_info: Option<&'a GitInfo>,
    pub all_files: &'a [PathBuf],
    /// Recent files, already intersected with `all_files`.
    pub recent_files: &'a [PathBuf],
    pub recent_days: u32,
    /// Only report on `recent_files`.
    pub recent_mode: bool,
    pub show_tokens: bool,
    pub threshold: usize,
    pub counter: TokenCounter,
}

impl ReportContext<'_> {
    fn files_to_process(&self) -> &[PathBuf] {
        if self.recent_mode {
            self.recent_files
        } else {
            self.all_files
        }
    }
}

/// Line and file totals of the rendered content sections.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct ContentStats {
    total_lines: usize,
    processed_files: usize,
}

/// Build the full repository context document.
pub fn repository_report(ctx: &ReportContext<'_>) -> String {
    let mut parts = vec![
        "# Repository Context\n".to_string(),
        format!("## File System Location\n\n{}\n", ctx.repo_root.display()),
        git_section(ctx.git_info),
        structure_section(ctx),
    ];

    let stats = if ctx.recent_mode {
        parts.push("## File Contents\n".to_string());
        file_sections(ctx.recent_files, ctx.repo_root, &mut parts)
    } else {
        if !ctx.recent_files.is_empty() {
            parts.push("## Recent Changes\n".to_string());
            file_sections(ctx.recent_files, ctx.repo_root, &mut parts);
        }
        parts.push("## File Contents\n".to_string());
        file_sections(ctx.all_files, ctx.repo_root, &mut parts)
    };

    parts.push(summary_section(ctx, stats));
    parts.join("\n")
}

fn git_section(info: Option<&GitInfo>) -> String {
    match info {
        Some(info) => format!(
            "## Git Info\n\n- Commit: {}\n- Branch: {}\n- Author: {}\n- Date: {}\n",
            info.commit, info.branch, info.author, info.date
        ),
        None => "## Git Info\n\nNot a git repository\n".to_string(),
    }
}

fn structure_section(ctx: &ReportContext<'_>) -> String {
    let files = ctx.files_to_process();

    if !ctx.show_tokens {
        return format!(
            "## Structure\n\n```\n{}\n```\n",
            render_plain(files, ctx.repo_root)
        );
    }

    let tree = ctx.counter.build_token_tree(files, ctx.repo_root, ctx.threshold);
    let mut header = format!(
        "## Structure\n\n**Total Tokens:** {}\n",
        format_token_count(tree.total_tokens)
    );
    if ctx.threshold > 0 {
        header.push_str(&format!(
            "**Token Threshold:** {} (showing only files/dirs above threshold)\n",
            format_token_count(ctx.threshold)
        ));
    }

    format!(
        "{}\n```\n{}\n```\n",
        header,
        render_token_tree(&tree, ctx.repo_root)
    )
}

/// Append a heading and fenced block per readable text file, in path order.
fn file_sections(files: &[PathBuf], repo_root: &Path, parts: &mut Vec<String>) -> ContentStats {
    let mut sorted = files.to_vec();
    sorted.sort();

    let mut stats = ContentStats::default();

    for file in &sorted {
        let relative = display_relative(file, repo_root);

        if is_binary_file(file) {
            log::debug!("Skipping binary file: {}", relative);
            continue;
        }
        let Some(content) = read_file_content(file) else {
            log::debug!("Skipping file (could not read): {}", relative);
            continue;
        };

        let modified = file_timestamp(file, repo_root)
            .map(|ts| format!(" (Modified: {})", ts))
            .unwrap_or_default();
        let extension = file
            .extension()
            .map(|e| e.to_string_lossy().into_owned())
            .unwrap_or_default();

        parts.push(format!("### File: {}{}", relative, modified));
        parts.push(format!("```{}", language_for_extension(&extension)));
        stats.total_lines += count_lines(&content);
        parts.push(content);
        parts.push("```\n".to_string());

        stats.processed_files += 1;
    }

    stats
}

fn summary_section(ctx: &ReportContext<'_>, stats: ContentStats) -> String {
    let files = ctx.files_to_process();

    let mut lines = vec![
        "## Summary".to_string(),
        format!("- Total files: {}", stats.processed_files),
        format!("- Total lines: {}", stats.total_lines),
        format!(
            "- Recent files (last {} days): {}",
            ctx.recent_days,
            ctx.recent_files.len()
        ),
    ];

    if ctx.show_tokens {
        let total: usize = ctx.counter.count_files_tokens(files).values().sum();
        lines.push(format!("- Estimated tokens: {}", format_token_count(total)));
    }

    lines.extend(summary_detail_lines(
        &stats::file_type_counts(files),
        stats::largest_file(files).as_ref(),
        ctx.repo_root,
    ));

    if stats.processed_files > 0 {
        lines.push(format!(
            "- Average file size: {} lines",
            stats.total_lines / stats.processed_files
        ));
    }

    lines.join("\n")
}

fn summary_detail_lines(
    file_types: &indexmap::IndexMap<String, usize>,
    largest: Option<&stats::LargestFile>,
    repo_root: &Path,
) -> Vec<String> {
    let mut lines = Vec::new();

    if !file_types.is_empty() {
        let types: Vec<String> = file_types
            .iter()
            .map(|(ext, count)| format!(".{} ({})", ext, count))
            .collect();
        lines.push(format!("- File types: {}", types.join(", ")));
    }

    if let Some(largest) = largest {
        lines.push(format!(
            "- Largest file: {} ({} lines)",
            display_relative(&largest.path, repo_root),
            largest.lines
        ));
    }

    lines
}

/// Markdown form of a [`Summary`], as printed by `contextr stats`.
pub fn format_summary(summary: &Summary, repo_root: &Path) -> String {
    let mut lines = vec![
        "## Summary".to_string(),
        format!("- Total files: {}", summary.total_files),
        format!("- Total lines: {}", summary.total_lines),
    ];
    lines.extend(summary_detail_lines(
        &summary.file_type_counts,
        summary.largest_file.as_ref(),
        repo_root,
    ));
    if summary.total_files > 0 {
        lines.push(format!("- Average file size: {} lines", summary.average_lines));
    }
    lines.join("\n")
}

/// Token distribution report.
pub fn format_token_report(tree: &TokenTree, repo_root: &Path) -> String {
    let mut parts = vec![
        "# Token Count Tree\n".to_string(),
        format!("**Repository:** {}\n", repo_root.display()),
        format!("**Total Tokens:** {}", format_token_count(tree.total_tokens)),
        format!("**Files Analyzed:** {}", tree.file_count),
    ];

    if tree.threshold > 0 {
        parts.push(format!(
            "**Threshold:** {} tokens (showing only files/dirs above threshold)\n",
            format_token_count(tree.threshold)
        ));
    } else {
        parts.push(String::new());
    }

    if tree.is_empty() {
        parts.push("No files found or all files below threshold.".to_string());
    } else {
        parts.push("## Token Distribution\n".to_string());
        parts.push("```".to_string());
        parts.push(render_token_tree(tree, repo_root));
        parts.push("```".to_string());
    }

    parts.join("\n")
}

/// One-line token summary.
pub fn format_token_summary(tree: &TokenTree) -> String {
    format!(
        "Estimated tokens: {} (across {} files)",
        format_token_count(tree.total_tokens),
        tree.file_count
    )
}

#[derive(Serialize)]
struct TokenReportJson<'a> {
    repository: String,
    #[serde(flatten)]
    tree: &'a TokenTree,
}

#[derive(Serialize)]
struct SummaryJson<'a> {
    repository: String,
    #[serde(flatten)]
    summary: &'a Summary,
}

/// JSON form of a token tree, tagged with the repository root.
pub fn token_report_json(tree: &TokenTree, repo_root: &Path) -> Result<String, ContextError> {
    let report = TokenReportJson {
        repository: repo_root.display().to_string(),
        tree,
    };
    Ok(serde_json::to_string_pretty(&report)?)
}

/// JSON form of summary statistics, tagged with the repository root.
pub fn summary_json(summary: &Summary, repo_root: &Path) -> Result<String, ContextError> {
    let report = SummaryJson {
        repository: repo_root.display().to_string(),
        summary,
    };
    Ok(serde_json::to_string_pretty(&report)?)
}
