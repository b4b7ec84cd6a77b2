// file: src/pipeline/orchestrator.rs
// description: one sync pass from remote listing to rendered posts
// reference: orchestrates asynchronous fetch and render workflow

use crate::config::Config;
use crate::error::{MirrorError, Result};
use crate::models::Post;
use crate::parser::PostTransformer;
use crate::pipeline::stats::SyncStats;
use crate::remote::ContentSource;
use crate::utils::OperationTimer;
use futures::stream::{self, StreamExt};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Posts rendered by one pass, plus the raw bodies they came from.
#[derive(Debug, Clone)]
pub struct SyncOutput {
    /// Sorted newest first (descending source path).
    pub posts: Vec<Post>,
    /// Raw markdown keyed by slug. On a slug collision the body belongs to
    /// the post that owns the slug in the snapshot index.
    pub bodies: BTreeMap<String, String>,
    pub stats: SyncStats,
}

/// True only for a successful pass that rendered at least one post.
pub fn should_publish(result: &Result<SyncOutput>) -> bool {
    matches!(result, Ok(output) if !output.posts.is_empty())
}

pub struct SyncOrchestrator {
    source: Arc<dyn ContentSource>,
    transformer: Arc<PostTransformer>,
    subdirectory: String,
    fetch_concurrency: usize,
}

impl SyncOrchestrator {
    pub fn new(
        source: Arc<dyn ContentSource>,
        transformer: Arc<PostTransformer>,
        subdirectory: impl Into<String>,
        fetch_concurrency: usize,
    ) -> Self {
        Self {
            source,
            transformer,
            subdirectory: subdirectory.into(),
            fetch_concurrency: fetch_concurrency.max(1),
        }
    }

    pub fn from_config(config: &Config, source: Arc<dyn ContentSource>) -> Self {
        let transformer = Arc::new(PostTransformer::from_config(
            &config.remote,
            &config.content,
        ));
        Self::new(
            source,
            transformer,
            config.remote.subdirectory.clone(),
            config.scheduler.fetch_concurrency,
        )
    }

    pub fn transformer(&self) -> &Arc<PostTransformer> {
        &self.transformer
    }

    pub fn source_label(&self) -> String {
        self.source.label()
    }

    /// Lists, fetches, and renders every candidate file.
    ///
    /// A single file failing to fetch or render is logged and skipped. The
    /// pass itself fails when listing fails, when nothing matches, or when
    /// every candidate failed.
    pub async fn sync_once(&self) -> Result<SyncOutput> {
        let timer = OperationTimer::new("sync pass");
        info!(
            "Syncing {} (subdirectory '{}')",
            self.source.label(),
            self.subdirectory
        );

        let mut candidates = self.source.list_candidate_files(&self.subdirectory).await?;
        candidates.sort();
        candidates.dedup();

        if candidates.is_empty() {
            return Err(MirrorError::NoMarkdownFound {
                subdirectory: self.subdirectory.clone(),
            });
        }

        let mut stats = SyncStats::new();
        stats.files_listed = candidates.len();
        debug!(
            "Fetching {} files with concurrency {}",
            candidates.len(),
            self.fetch_concurrency
        );

        let source = &self.source;
        let fetched: Vec<(String, Result<String>)> = stream::iter(candidates)
            .map(|path| async move {
                let body = source.fetch_file(&path).await;
                (path, body)
            })
            .buffered(self.fetch_concurrency)
            .collect()
            .await;

        let mut posts = Vec::with_capacity(fetched.len());
        let mut raw_by_path = BTreeMap::new();

        for (path, body) in fetched {
            let raw = match body {
                Ok(raw) => raw,
                Err(e) => {
                    warn!("Skipping {}: {}", path, e);
                    stats.fetch_failures += 1;
                    continue;
                }
            };
            stats.files_fetched += 1;

            match self.transformer.transform(&path, &raw) {
                Ok(post) => {
                    raw_by_path.insert(path, raw);
                    posts.push(post);
                }
                Err(e) => {
                    warn!("Skipping {}: {}", path, e);
                    stats.render_failures += 1;
                }
            }
        }

        if posts.is_empty() {
            return Err(MirrorError::NothingRendered {
                candidates: stats.files_listed,
            });
        }

        Post::sort_newest_first(&mut posts);

        // Insert in sort order so a colliding slug keeps the body of the
        // post that wins the index.
        let mut bodies = BTreeMap::new();
        for post in &posts {
            if let Some(raw) = raw_by_path.remove(&post.source_path) {
                bodies.insert(post.slug.clone(), raw);
            }
        }

        stats.posts_rendered = posts.len();
        stats.duration_ms = timer.finish_with_count(posts.len()).as_millis() as u64;

        Ok(SyncOutput {
            posts,
            bodies,
            stats,
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// In-memory source. Paths mapped to `None` fail to fetch.
    #[derive(Default)]
    pub(crate) struct FakeSource {
        pub files: Mutex<HashMap<String, Option<String>>>,
        pub list_error: Mutex<Option<String>>,
    }

    impl FakeSource {
        pub(crate) fn with_files(files: &[(&str, Option<&str>)]) -> Self {
            let files = files
                .iter()
                .map(|(path, body)| (path.to_string(), body.map(str::to_string)))
                .collect();
            Self {
                files: Mutex::new(files),
                list_error: Mutex::new(None),
            }
        }

        pub(crate) fn fail_listing(&self, message: &str) {
            *self.list_error.lock().unwrap() = Some(message.to_string());
        }
    }

    #[async_trait]
    impl ContentSource for FakeSource {
        fn label(&self) -> String {
            "fake/blog@main".to_string()
        }

        async fn list_candidate_files(&self, subdirectory: &str) -> Result<Vec<String>> {
            if let Some(message) = self.list_error.lock().unwrap().clone() {
                return Err(MirrorError::ListFailed {
                    repository: self.label(),
                    message,
                });
            }
            let prefix = format!("{}/", subdirectory);
            Ok(self
                .files
                .lock()
                .unwrap()
                .keys()
                .filter(|path| path.starts_with(&prefix) && path.ends_with(".md"))
                .cloned()
                .collect())
        }

        async fn fetch_file(&self, path: &str) -> Result<String> {
            match self.files.lock().unwrap().get(path) {
                Some(Some(body)) => Ok(body.clone()),
                _ => Err(MirrorError::FetchFailed {
                    path: path.to_string(),
                    message: "HTTP 404".to_string(),
                }),
            }
        }
    }

    pub(crate) fn orchestrator(source: Arc<FakeSource>) -> SyncOrchestrator {
        SyncOrchestrator::from_config(&Config::default_config(), source)
    }

    #[tokio::test]
    async fn test_sync_renders_and_sorts() {
        let source = Arc::new(FakeSource::with_files(&[
            ("data/a.md", Some("# Title A\nBody a")),
            ("data/b.md", Some("# Hello\nWorld")),
            ("data/notes.txt", Some("ignored")),
        ]));

        let output = orchestrator(source).sync_once().await.unwrap();

        let slugs: Vec<&str> = output.posts.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, vec!["b", "a"]);
        assert_eq!(output.posts[0].title, "Hello");
        assert_eq!(output.posts[0].excerpt, "World");
        assert_eq!(output.bodies.get("a").map(String::as_str), Some("# Title A\nBody a"));
        assert_eq!(output.stats.files_listed, 2);
        assert_eq!(output.stats.posts_rendered, 2);
        assert!(should_publish(&Ok(output)));
    }

    #[tokio::test]
    async fn test_fetch_failure_skips_file() {
        let source = Arc::new(FakeSource::with_files(&[
            ("data/a.md", Some("# A\nfine")),
            ("data/c.md", None),
        ]));

        let output = orchestrator(source).sync_once().await.unwrap();

        assert_eq!(output.posts.len(), 1);
        assert_eq!(output.posts[0].slug, "a");
        assert_eq!(output.stats.fetch_failures, 1);
        assert_eq!(output.stats.files_fetched, 1);
    }

    #[tokio::test]
    async fn test_no_candidates_fails_pass() {
        let source = Arc::new(FakeSource::with_files(&[("docs/a.md", Some("# A"))]));

        let result = orchestrator(source).sync_once().await;

        assert!(matches!(result, Err(MirrorError::NoMarkdownFound { .. })));
        assert!(!should_publish(&result));
    }

    #[tokio::test]
    async fn test_all_fetches_failing_fails_pass() {
        let source = Arc::new(FakeSource::with_files(&[
            ("data/a.md", None),
            ("data/b.md", None),
        ]));

        let result = orchestrator(source).sync_once().await;

        assert!(matches!(
            result,
            Err(MirrorError::NothingRendered { candidates: 2 })
        ));
        assert!(!should_publish(&result));
    }

    #[tokio::test]
    async fn test_listing_failure_propagates() {
        let source = Arc::new(FakeSource::default());
        source.fail_listing("HTTP 502");

        let err = orchestrator(source).sync_once().await.unwrap_err();
        assert!(err.is_pass_level());
        assert!(err.to_string().contains("HTTP 502"));
    }

    #[tokio::test]
    async fn test_colliding_slugs_keep_index_owner_body() {
        let source = Arc::new(FakeSource::with_files(&[
            ("data/foo/bar.md", Some("# Nested")),
            ("data/foo-bar.md", Some("# Flat")),
        ]));

        let output = orchestrator(source).sync_once().await.unwrap();

        assert_eq!(output.posts.len(), 2);
        assert_eq!(output.bodies.len(), 1);
        assert_eq!(output.bodies.get("foo-bar").map(String::as_str), Some("# Flat"));
    }

    #[test]
    fn test_should_publish_rejects_empty_output() {
        let empty = Ok(SyncOutput {
            posts: Vec::new(),
            bodies: BTreeMap::new(),
            stats: SyncStats::new(),
        });
        assert!(!should_publish(&empty));
    }
}
