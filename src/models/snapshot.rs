// file: src/models/snapshot.rs
// description: immutable cache generation with ordered posts and slug index
// reference: internal data structures

use crate::models::Post;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;

/// Where a snapshot's posts came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SnapshotOrigin {
    Empty,
    DiskMirror,
    Remote,
}

/// One fully built cache generation. Never mutated after [`Snapshot::build`].
///
/// The slug index stores positions into `posts`, so the list and the index
/// cannot disagree. When two posts share a slug the one later in sort order
/// owns the index entry; both stay in the list.
#[derive(Debug, Clone)]
pub struct Snapshot {
    posts: Vec<Post>,
    by_slug: HashMap<String, usize>,
    origin: SnapshotOrigin,
    built_at: DateTime<Utc>,
}

impl Snapshot {
    pub fn empty() -> Self {
        Self {
            posts: Vec::new(),
            by_slug: HashMap::new(),
            origin: SnapshotOrigin::Empty,
            built_at: Utc::now(),
        }
    }

    pub fn build(mut posts: Vec<Post>, origin: SnapshotOrigin) -> Self {
        Post::sort_newest_first(&mut posts);

        let mut by_slug = HashMap::with_capacity(posts.len());
        for (index, post) in posts.iter().enumerate() {
            by_slug.insert(post.slug.clone(), index);
        }

        Self {
            posts,
            by_slug,
            origin,
            built_at: Utc::now(),
        }
    }

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn get(&self, slug: &str) -> Option<&Post> {
        self.by_slug.get(slug).map(|&index| &self.posts[index])
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    pub fn origin(&self) -> SnapshotOrigin {
        self.origin
    }

    pub fn built_at(&self) -> DateTime<Utc> {
        self.built_at
    }

    /// Number of distinct slugs; smaller than [`Snapshot::len`] when slugs collide.
    pub fn indexed_len(&self) -> usize {
        self.by_slug.len()
    }

    /// True when every index entry points at a post carrying that slug.
    pub fn is_consistent(&self) -> bool {
        self.by_slug.iter().all(|(slug, &index)| {
            self.posts
                .get(index)
                .is_some_and(|post| &post.slug == slug)
        }) && self
            .posts
            .iter()
            .all(|post| self.by_slug.contains_key(&post.slug))
    }
}
