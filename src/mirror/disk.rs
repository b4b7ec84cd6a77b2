// file: src/mirror/disk.rs
// description: persists the published snapshot to a local directory and restores it at startup
// reference: atomic write-then-rename persistence with tokio::fs

use crate::error::{MirrorError, Result};
use crate::models::{DiskManifest, Post, Snapshot, SnapshotOrigin};
use crate::parser::PostTransformer;
use crate::utils::OperationTimer;
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, warn};

pub const MANIFEST_FILE: &str = "manifest.json";
const BODY_EXTENSION: &str = "md";

/// Posts restored from a mirror directory.
#[derive(Debug, Clone)]
pub struct MirrorContents {
    pub generated_at: DateTime<Utc>,
    pub repository: String,
    pub posts: Vec<Post>,
    pub bodies: BTreeMap<String, String>,
    /// Manifest entries that could not be restored.
    pub skipped: usize,
}

impl MirrorContents {
    pub fn into_snapshot(self) -> Snapshot {
        Snapshot::build(self.posts, SnapshotOrigin::DiskMirror)
    }
}

/// Directory layout: `manifest.json` plus one `<slug>.md` raw body per post.
#[derive(Debug, Clone)]
pub struct DiskMirror {
    dir: PathBuf,
    repository: String,
}

impl DiskMirror {
    pub fn new(dir: impl Into<PathBuf>, repository: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            repository: repository.into(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.dir.join(MANIFEST_FILE)
    }

    fn body_path(&self, slug: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", slug, BODY_EXTENSION))
    }

    /// Writes every body, then the manifest, then removes bodies that the
    /// previous manifest listed and the new one does not. Files the mirror
    /// never wrote are left alone. Each file is replaced atomically, so a
    /// crash leaves the previous manifest intact.
    pub async fn save(
        &self,
        snapshot: &Snapshot,
        bodies: &BTreeMap<String, String>,
    ) -> Result<DiskManifest> {
        let timer = OperationTimer::new("mirror save");
        fs::create_dir_all(&self.dir)
            .await
            .map_err(|source| MirrorError::DiskWriteFailed {
                path: self.dir.clone(),
                source,
            })?;

        let previous = self.previous_slugs().await;
        let manifest = DiskManifest::from_snapshot(snapshot, bodies, &self.repository);

        let mut written = HashSet::new();
        for entry in &manifest.posts {
            if !written.insert(entry.slug.as_str()) {
                continue;
            }
            match bodies.get(&entry.slug) {
                Some(body) => write_atomic(&self.body_path(&entry.slug), body.as_bytes()).await?,
                None => warn!("No raw body for '{}'; it will not be restorable", entry.slug),
            }
        }

        let json = serde_json::to_string_pretty(&manifest)?;
        write_atomic(&self.manifest_path(), json.as_bytes()).await?;

        let pruned = self.prune(&previous, &written).await?;
        info!(
            "Mirrored {} posts to {:?} ({} stale bodies removed)",
            manifest.posts.len(),
            self.dir,
            pruned
        );
        timer.finish();
        Ok(manifest)
    }

    /// Slugs of the manifest currently on disk. Empty when there is none or
    /// it cannot be parsed, in which case nothing is pruned.
    async fn previous_slugs(&self) -> HashSet<String> {
        let contents = match fs::read_to_string(self.manifest_path()).await {
            Ok(contents) => contents,
            Err(_) => return HashSet::new(),
        };

        match serde_json::from_str::<DiskManifest>(&contents) {
            Ok(manifest) => manifest.posts.into_iter().map(|entry| entry.slug).collect(),
            Err(e) => {
                warn!("Previous manifest is unreadable; skipping prune: {}", e);
                HashSet::new()
            }
        }
    }

    async fn prune(&self, previous: &HashSet<String>, keep: &HashSet<&str>) -> Result<usize> {
        let mut removed = 0;

        for slug in previous.iter().filter(|slug| !keep.contains(slug.as_str())) {
            let path = self.body_path(slug);
            match fs::remove_file(&path).await {
                Ok(()) => {
                    debug!("Removed stale mirror body {:?}", path);
                    removed += 1;
                }
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(source) => return Err(MirrorError::DiskWriteFailed { path, source }),
            }
        }

        Ok(removed)
    }

    /// Reads the manifest and re-renders each stored body.
    ///
    /// Entries are skipped when their slug is owned by a later entry, or
    /// when the body is missing, unreadable, edited since it was recorded or
    /// fails to render.
    pub async fn load(&self, transformer: &PostTransformer) -> Result<MirrorContents> {
        let manifest_path = self.manifest_path();
        let contents = match fs::read_to_string(&manifest_path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(MirrorError::MirrorNotFound(self.dir.clone()));
            }
            Err(e) => return Err(MirrorError::Io(e)),
        };

        let manifest: DiskManifest =
            serde_json::from_str(&contents).map_err(|e| MirrorError::MirrorCorrupt {
                path: manifest_path.clone(),
                message: e.to_string(),
            })?;

        // Entries are in published order, so the last entry for a slug is the
        // one that owns it and the one its body was written for.
        let owners: HashMap<&str, usize> = manifest
            .posts
            .iter()
            .enumerate()
            .map(|(index, entry)| (entry.slug.as_str(), index))
            .collect();

        let mut posts = Vec::with_capacity(manifest.posts.len());
        let mut bodies = BTreeMap::new();
        let mut skipped = 0;

        for (index, entry) in manifest.posts.iter().enumerate() {
            if owners.get(entry.slug.as_str()) != Some(&index) {
                warn!(
                    "Skipping mirrored post {}: slug '{}' belongs to another post",
                    entry.source_path, entry.slug
                );
                skipped += 1;
                continue;
            }

            let body_path = self.body_path(&entry.slug);
            let body = match fs::read_to_string(&body_path).await {
                Ok(body) => body,
                Err(e) => {
                    warn!("Skipping mirrored post '{}': {}", entry.slug, e);
                    skipped += 1;
                    continue;
                }
            };

            if !entry.matches_body(&body) {
                warn!(
                    "Skipping mirrored post '{}' ({}): body does not match manifest hash",
                    entry.slug, entry.source_path
                );
                skipped += 1;
                continue;
            }

            match transformer.transform(&entry.source_path, &body) {
                Ok(post) => {
                    bodies.insert(post.slug.clone(), body);
                    posts.push(post);
                }
                Err(e) => {
                    warn!("Skipping mirrored post '{}': {}", entry.slug, e);
                    skipped += 1;
                }
            }
        }

        info!(
            "Loaded {} posts from mirror {:?} (generated {})",
            posts.len(),
            self.dir,
            manifest.generated_at
        );

        Ok(MirrorContents {
            generated_at: manifest.generated_at,
            repository: manifest.repository,
            posts,
            bodies,
            skipped,
        })
    }
}

async fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    let write_failed = |source| MirrorError::DiskWriteFailed {
        path: path.to_path_buf(),
        source,
    };

    fs::write(&tmp, contents).await.map_err(write_failed)?;
    fs::rename(&tmp, path).await.map_err(write_failed)?;
    Ok(())
}
