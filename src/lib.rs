//! Contextr - Package repository content into context for LLMs.
//!
//! Contextr walks the given paths, skips binary files and build/VCS/cache
//! directories, and renders one markdown document with repository metadata, a
//! directory tree, the contents of every text file and summary statistics.
//! Token counts are estimated from character counts.
//!
//! # Quick Start
//!
//! ```no_run
//! use contextr::Contextr;
//!
//! let report = Contextr::new(["./my-project"])
//!     .include("*.py")
//!     .show_tokens(true)
//!     .package()
//!     .unwrap();
//!
//! println!("{}", report);
//! ```
//!
//! # Modules
//!
//! - [`walker`] - File discovery with a fixed skip-set and include glob
//! - [`classify`] - Binary/text classification by content sampling
//! - [`reader`] - Text decoding with size-based truncation
//! - [`tokens`] - Token estimation and hierarchical token trees
//! - [`stats`] - Line counts, file types and largest file
//! - [`tree`] - Plain and token-annotated tree rendering
//! - [`git`] - Commit metadata and recently changed files
//! - [`report`] - Markdown and JSON report assembly
//! - [`builder`] - Fluent API over the whole pipeline

pub mod settings;
pub mod errors;
pub mod paths;
pub mod walker;
pub mod encoding;
pub mod classify;
pub mod reader;
pub mod tokens;
pub mod stats;
pub mod tree;
pub mod languages;
pub mod git;
pub mod config;
pub mod report;
pub mod builder;

// Re-export key types at crate root for convenience
pub use builder::{Contextr, Discovery};
pub use config::{CliOverrides, Config, ConfigError};
pub use errors::{exit_code, ContextError};
pub use git::GitInfo;
pub use stats::{LargestFile, Summary};
pub use tokens::{TokenCounter, TokenNode, TokenTree};
pub use walker::WalkError;
