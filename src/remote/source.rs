// file: src/remote/source.rs
// description: abstraction over where markdown documents are read from
// reference: https://docs.rs/async-trait

use crate::error::Result;
use async_trait::async_trait;

/// Read-only access to a repository's markdown documents.
///
/// Implementations map transport failures to
/// [`MirrorError::ListFailed`](crate::error::MirrorError::ListFailed) and
/// [`MirrorError::FetchFailed`](crate::error::MirrorError::FetchFailed).
/// Dropping a returned future abandons the request.
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Human-readable label identifying the source, e.g. `owner/repo@main`.
    fn label(&self) -> String;

    /// Markdown blob paths under `subdirectory`, sorted. An empty result is
    /// not an error.
    async fn list_candidate_files(&self, subdirectory: &str) -> Result<Vec<String>>;

    /// Raw text of one file.
    async fn fetch_file(&self, path: &str) -> Result<String>;
}
