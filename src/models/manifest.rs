// file: src/models/manifest.rs
// description: on-disk manifest describing the last published snapshot
// reference: internal data structures

use crate::models::Snapshot;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiskManifest {
    pub generated_at: DateTime<Utc>,
    pub repository: String,
    pub posts: Vec<ManifestEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub slug: String,
    pub title: String,
    pub excerpt: String,
    pub source_path: String,
    /// Hash of the body this entry was rendered from. Absent in manifests
    /// written before hashes were recorded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha256: Option<String>,
}

impl DiskManifest {
    /// Mirrors `snapshot` in its published order. `bodies` holds one body per
    /// slug, so only the post owning a slug in the snapshot index gets a
    /// hash; colliding posts and posts without a body are recorded without one.
    pub fn from_snapshot(
        snapshot: &Snapshot,
        bodies: &BTreeMap<String, String>,
        repository: &str,
    ) -> Self {
        let posts = snapshot
            .posts()
            .iter()
            .map(|post| ManifestEntry {
                slug: post.slug.clone(),
                title: post.title.clone(),
                excerpt: post.excerpt.clone(),
                source_path: post.source_path.clone(),
                sha256: snapshot
                    .get(&post.slug)
                    .filter(|owner| owner.source_path == post.source_path)
                    .and_then(|_| bodies.get(&post.slug))
                    .map(|body| compute_hash(body)),
            })
            .collect();

        Self {
            generated_at: Utc::now(),
            repository: repository.to_string(),
            posts,
        }
    }
}

impl ManifestEntry {
    /// Whether `body` is the one this entry was rendered from.
    pub fn matches_body(&self, body: &str) -> bool {
        match &self.sha256 {
            Some(expected) => *expected == compute_hash(body),
            None => true,
        }
    }
}

pub fn compute_hash(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("{:x}", hasher.finalize())
}
