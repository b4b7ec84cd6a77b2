// file: src/remote/types.rs
// description: GitHub git-trees and contents API payloads
// reference: https://docs.github.com/en/rest/git/trees, https://docs.github.com/en/rest/repos/contents

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Deserialize;
use std::collections::BTreeSet;

use crate::utils::Validator;

#[derive(Debug, Deserialize)]
pub struct TreeResponse {
    #[serde(default)]
    pub tree: Vec<TreeEntry>,
    #[serde(default)]
    pub truncated: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TreeEntry {
    pub path: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Deserialize)]
pub struct ContentResponse {
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub encoding: Option<String>,
}

impl TreeEntry {
    pub fn is_blob(&self) -> bool {
        self.kind == "blob"
    }
}

impl ContentResponse {
    /// Decodes base64 bodies (GitHub wraps them at 60 columns); any other
    /// encoding is taken as already-decoded text.
    pub fn decode(self) -> Result<String, String> {
        let is_base64 = self
            .encoding
            .as_deref()
            .is_some_and(|encoding| encoding.eq_ignore_ascii_case("base64"));

        if !is_base64 {
            return Ok(self.content);
        }

        let compact: String = self
            .content
            .chars()
            .filter(|c| !c.is_ascii_whitespace())
            .collect();
        let bytes = STANDARD
            .decode(compact.as_bytes())
            .map_err(|e| format!("invalid base64 content: {}", e))?;
        String::from_utf8(bytes).map_err(|e| format!("content is not valid UTF-8: {}", e))
    }
}

/// Blob paths under `subdirectory/` with a markdown extension, sorted and
/// de-duplicated.
pub fn filter_candidates(
    entries: &[TreeEntry],
    subdirectory: &str,
    extensions: &[String],
) -> Vec<String> {
    let root = subdirectory.trim_matches('/');
    let prefix = format!("{}/", root);

    entries
        .iter()
        .filter(|entry| entry.is_blob())
        .filter(|entry| root.is_empty() || entry.path.starts_with(&prefix))
        .filter(|entry| Validator::has_markdown_extension(&entry.path, extensions))
        .map(|entry| entry.path.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
