//! Fluent builder API for contextr.
//!
//! Ties discovery, statistics, git metadata and report assembly together.

use std::path::PathBuf;

use crate::config::Config;
use crate::errors::ContextError;
use crate::git;
use crate::paths::{determine_repo_root, resolve_paths};
use crate::report::{self, ReportContext, NO_FILES_MESSAGE};
use crate::settings::{DEFAULT_PATHS, DEFAULT_RECENT_DAYS};
use crate::stats::{self, Summary};
use crate::tokens::{TokenCounter, TokenTree};
use crate::tree::render_plain;
use crate::walker::{compile_include, discover_files};

/// Builder for packaging a repository into LLM context.
///
/// # Examples
///
/// ```no_run
/// use contextr::Contextr;
///
/// let report = Contextr::new(["./project"])
///     .include("*.rs")
///     .show_tokens(true)
///     .package()
///     .unwrap();
/// println!("{}", report);
/// ```
#[derive(Debug, Clone)]
pub struct Contextr {
    paths: Vec<String>,
    include: Option<String>,
    recent: bool,
    recent_days: u32,
    show_tokens: bool,
    threshold: usize,
    counter: TokenCounter,
}

impl Contextr {
    /// Create a builder over the given input paths. No paths means the
    /// current directory.
    pub fn new<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
            include: None,
            recent: false,
            recent_days: DEFAULT_RECENT_DAYS,
            show_tokens: false,
            threshold: 0,
            counter: TokenCounter::default(),
        }
    }

    /// Create a builder from merged configuration.
    pub fn from_config(config: &Config) -> Self {
        let mut builder = Self::new(config.paths.iter().cloned())
            .recent(config.recent)
            .show_tokens(config.tokens)
            .threshold(config.threshold);
        builder.include = config.include.clone();
        builder
    }

    /// Only keep files whose name matches a glob.
    pub fn include(mut self, pattern: impl Into<String>) -> Self {
        self.include = Some(pattern.into());
        self
    }

    /// Report only files touched by recent commits.
    pub fn recent(mut self, recent: bool) -> Self {
        self.recent = recent;
        self
    }

    pub fn recent_days(mut self, days: u32) -> Self {
        self.recent_days = days;
        self
    }

    /// Annotate the structure section with token counts.
    pub fn show_tokens(mut self, show: bool) -> Self {
        self.show_tokens = show;
        self
    }

    /// Minimum token count for a file to appear in token trees.
    pub fn threshold(mut self, threshold: usize) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn chars_per_token(mut self, ratio: f64) -> Self {
        self.counter = TokenCounter::new(ratio);
        self
    }

    /// Resolve inputs, pick the root and discover files, sorted by path.
    pub fn discover(&self) -> Result<Discovery, ContextError> {
        let include = compile_include(self.include.as_deref());

        let inputs = if self.paths.is_empty() {
            resolve_paths(DEFAULT_PATHS)?
        } else {
            resolve_paths(&self.paths)?
        };
        let root = determine_repo_root(&inputs).ok_or(ContextError::NoValidPaths)?;
        log::info!("Repository root: {}", root.display());

        let mut files = discover_files(&inputs, include.as_ref());
        files.sort();
        files.dedup();
        log::info!("Discovered {} files", files.len());

        Ok(Discovery {
            inputs,
            root,
            files,
        })
    }

    /// Build the full repository context report.
    pub fn package(&self) -> Result<String, ContextError> {
        let discovery = self.discover()?;
        let target = discovery.git_target();

        let git_info = git::git_info(&target);
        let recent = git::recent_files(&target, self.recent_days);
        let recent = git::intersect_recent(&recent, &discovery.files);

        let ctx = ReportContext {
            repo_root: &discovery.root,
            git_info: git_info.as_ref(),
            all_files: &discovery.files,
            recent_files: &recent,
            recent_days: self.recent_days,
            recent_mode: self.recent,
            show_tokens: self.show_tokens,
            threshold: self.threshold,
            counter: self.counter,
        };

        Ok(report::repository_report(&ctx))
    }

    /// Token tree over the discovered files.
    pub fn token_tree(&self, discovery: &Discovery) -> TokenTree {
        self.counter
            .build_token_tree(&discovery.files, &discovery.root, self.threshold)
    }

    /// Token distribution report, or its one-line summary form.
    pub fn token_report(&self, summary_only: bool) -> Result<String, ContextError> {
        let discovery = self.discover()?;
        if discovery.is_empty() {
            return Ok(NO_FILES_MESSAGE.to_string());
        }

        let tree = self.token_tree(&discovery);
        if summary_only {
            Ok(report::format_token_summary(&tree))
        } else {
            Ok(report::format_token_report(&tree, &discovery.root))
        }
    }

    /// Plain directory tree of the discovered files.
    pub fn tree(&self) -> Result<String, ContextError> {
        let discovery = self.discover()?;
        Ok(render_plain(&discovery.files, &discovery.root))
    }

    /// Summary statistics over the discovered files.
    pub fn summary(&self) -> Result<(Discovery, Summary), ContextError> {
        let discovery = self.discover()?;
        let summary = stats::summary(&discovery.files);
        Ok((discovery, summary))
    }
}

/// Result of resolving inputs and discovering files.
#[derive(Debug, Clone)]
pub struct Discovery {
    /// Canonical input paths that exist.
    pub inputs: Vec<PathBuf>,
    /// Directory relative paths are computed against.
    pub root: PathBuf,
    /// Discovered files, sorted.
    pub files: Vec<PathBuf>,
}

impl Discovery {
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Where git metadata is looked up: a single directory input, otherwise
    /// the root.
    pub fn git_target(&self) -> PathBuf {
        match self.inputs.as_slice() {
            [single] if single.is_dir() => single.clone(),
            _ => self.root.clone(),
        }
    }
}
