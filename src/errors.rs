//! Error types for contextr.

use std::path::PathBuf;

use crate::config::ConfigError;

/// Top-level error type for contextr operations.
#[derive(Debug, thiserror::Error)]
pub enum ContextError {
    #[error("no valid paths provided")]
    NoValidPaths,

    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("could not write {path}: {source}")]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Map an error to its exit code.
pub fn exit_code(error: &ContextError) -> i32 {
    match error {
        ContextError::NoValidPaths => 3,
        ContextError::Config(_) => 2,
        ContextError::Output { .. } => 4,
        ContextError::Serialization(_) => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(ContextError::NoValidPaths.to_string(), "no valid paths provided");

        let err = ContextError::Output {
            path: PathBuf::from("out.md"),
            source: std::io::Error::other("disk full"),
        };
        assert_eq!(err.to_string(), "could not write out.md: disk full");
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(exit_code(&ContextError::NoValidPaths), 3);
        let err = ContextError::Config(ConfigError::Read {
            path: PathBuf::from(".contextr.toml"),
            source: std::io::Error::other("boom"),
        });
        assert_eq!(exit_code(&err), 2);
    }
}
