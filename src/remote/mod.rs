// file: src/remote/mod.rs
// description: remote repository access module exports
// reference: internal module structure

pub mod client;
pub mod source;
pub mod types;

pub use client::GitHubClient;
pub use source::ContentSource;
pub use types::{ContentResponse, TreeEntry, TreeResponse, filter_candidates};
