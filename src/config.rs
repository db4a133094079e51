//! Project configuration from `.contextr.toml`.
//!
//! ```toml
//! [Flags]
//! paths = ["src", "tests"]   # or a single string
//! include = "*.rs"
//! output = "context.md"
//! recent = false
//! tokens = false
//! threshold = 0
//! ```
//!
//! Command-line values take precedence over the file.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::settings::{DEFAULT_CONFIG_FILE, DEFAULT_PATHS};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("error reading config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid TOML syntax in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(rename = "Flags", default)]
    flags: Flags,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Flags {
    paths: Option<PathList>,
    include: Option<String>,
    output: Option<PathBuf>,
    recent: Option<bool>,
    tokens: Option<bool>,
    threshold: Option<usize>,
}

/// `paths` may be given as one string or a list.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PathList {
    One(String),
    Many(Vec<String>),
}

impl From<PathList> for Vec<String> {
    fn from(list: PathList) -> Self {
        match list {
            PathList::One(path) => vec![path],
            PathList::Many(paths) => paths,
        }
    }
}

/// Effective settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub paths: Vec<String>,
    pub include: Option<String>,
    pub output: Option<PathBuf>,
    pub recent: bool,
    pub tokens: bool,
    pub threshold: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            paths: DEFAULT_PATHS.iter().map(|p| p.to_string()).collect(),
            include: None,
            output: None,
            recent: false,
            tokens: false,
            threshold: 0,
        }
    }
}

/// Values given on the command line. Unset options and `false` flags leave
/// the configured value in place.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub paths: Vec<String>,
    pub include: Option<String>,
    pub output: Option<PathBuf>,
    pub recent: bool,
    pub tokens: bool,
    pub threshold: Option<usize>,
}

impl Config {
    /// Load `path`, or `.contextr.toml` in the working directory.
    ///
    /// A missing file yields the defaults; an unreadable or malformed one is
    /// an error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = path.map_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE), Path::to_path_buf);
        if !path.exists() {
            log::debug!("No config file at {}", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        let config = Self::from_toml_str(&content)
            .map_err(|source| ConfigError::Parse { path: path.clone(), source })?;

        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Parse the `[Flags]` table of a config document.
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        let file: ConfigFile = toml::from_str(content)?;
        let flags = file.flags;
        let defaults = Self::default();

        Ok(Self {
            paths: flags.paths.map_or(defaults.paths, Vec::from),
            include: flags.include,
            output: flags.output,
            recent: flags.recent.unwrap_or(false),
            tokens: flags.tokens.unwrap_or(false),
            threshold: flags.threshold.unwrap_or(0),
        })
    }

    pub fn merge_with_cli(self, cli: CliOverrides) -> Self {
        Self {
            paths: if cli.paths.is_empty() { self.paths } else { cli.paths },
            include: cli.include.or(self.include),
            output: cli.output.or(self.output),
            recent: cli.recent || self.recent,
            tokens: cli.tokens || self.tokens,
            threshold: cli.threshold.unwrap_or(self.threshold),
        }
    }
}
