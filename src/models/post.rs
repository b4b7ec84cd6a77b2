// file: src/models/post.rs
// description: rendered post model produced by the transformer
// reference: internal data structures

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub slug: String,
    pub title: String,
    pub excerpt: String,
    /// Rendered markup, safe to embed without further escaping.
    pub html: String,
    /// Repository-relative path the post was rendered from.
    pub source_path: String,
}

impl Post {
    /// Descending `source_path` order used for every published post list.
    pub fn sort_newest_first(posts: &mut [Post]) {
        posts.sort_by(|a, b| b.source_path.cmp(&a.source_path));
    }
}
