// file: src/error.rs
// description: Custom error types and result type aliases
// reference: https://docs.rs/thiserror

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, MirrorError>;

#[derive(Error, Debug)]
pub enum MirrorError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Listing {repository} failed: {message}")]
    ListFailed { repository: String, message: String },

    #[error("Fetching {path} failed: {message}")]
    FetchFailed { path: String, message: String },

    #[error("Rendering {path} failed: {message}")]
    RenderFailed { path: String, message: String },

    #[error("No markdown files found under {subdirectory}/")]
    NoMarkdownFound { subdirectory: String },

    #[error("None of {candidates} markdown files could be rendered")]
    NothingRendered { candidates: usize },

    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Disk mirror write failed for {path}: {source}")]
    DiskWriteFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Disk mirror not found at {0}")]
    MirrorNotFound(PathBuf),

    #[error("Disk mirror manifest at {path} is corrupt: {message}")]
    MirrorCorrupt { path: PathBuf, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl MirrorError {
    /// Errors that end a sync pass, as opposed to per-file failures the
    /// orchestrator absorbs.
    pub fn is_pass_level(&self) -> bool {
        matches!(
            self,
            MirrorError::ListFailed { .. }
                | MirrorError::NoMarkdownFound { .. }
                | MirrorError::NothingRendered { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pass_level_classification() {
        let listing = MirrorError::ListFailed {
            repository: "o/r".to_string(),
            message: "HTTP 401".to_string(),
        };
        let fetch = MirrorError::FetchFailed {
            path: "data/a.md".to_string(),
            message: "HTTP 404".to_string(),
        };

        assert!(listing.is_pass_level());
        assert!(MirrorError::NothingRendered { candidates: 2 }.is_pass_level());
        assert!(!fetch.is_pass_level());
    }

    #[test]
    fn test_error_messages_carry_context() {
        let err = MirrorError::NoMarkdownFound {
            subdirectory: "data".to_string(),
        };
        assert_eq!(err.to_string(), "No markdown files found under data/");

        let err = MirrorError::Http {
            status: 403,
            body: "rate limited".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP 403: rate limited");
    }
}
