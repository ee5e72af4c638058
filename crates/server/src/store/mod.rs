//! Post storage — the `PostStore` trait seam and the JSON-file-backed
//! implementation.
//!
//! The store is the only shared mutable resource in the system. All
//! publish-time mutation goes through [`PostStore::publish_if_scheduled`],
//! a compare-and-set: the Scheduled → Published write only takes effect if
//! the post is still Scheduled at the moment of the write. Concurrent runs
//! racing the same post are therefore safe — exactly one write observes
//! Scheduled and wins, the other sees the changed status.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use ink_domain::post::{Post, PostStatus};
use ink_domain::{Error, Result};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Trait
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Outcome of the conditional publish write.
#[derive(Debug, Clone)]
pub enum CasOutcome {
    /// The post was Scheduled and is now Published.
    Published(Post),
    /// The post was no longer Scheduled — another run or a user edit got
    /// there first. Carries the status that was observed.
    AlreadyHandled(PostStatus),
}

#[async_trait]
pub trait PostStore: Send + Sync {
    async fn list(&self) -> Vec<Post>;

    async fn get(&self, id: &Uuid) -> Option<Post>;

    /// Insert or replace a post.
    async fn save(&self, post: Post) -> Result<Post>;

    async fn delete(&self, id: &Uuid) -> Result<bool>;

    /// Ordered, read-only selection of due posts: status Scheduled and
    /// `scheduled_at <= now`, ascending by `scheduled_at`, ties broken by id.
    async fn due_posts(&self, now: DateTime<Utc>) -> Result<Vec<Post>>;

    /// Conditional Scheduled → Published write. Sets `published_at = now`
    /// only if the post is still Scheduled at write time.
    ///
    /// The conditional check guards concurrent callers within one process.
    /// Durability is best-effort: with the JSON-file store the transition is
    /// decided in memory and the disk write trails it, so a crash between
    /// the two can bring the post back as Scheduled after a restart, and a
    /// later run will publish it again with a fresh `published_at`.
    async fn publish_if_scheduled(&self, id: &Uuid, now: DateTime<Utc>) -> Result<CasOutcome>;
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// JsonPostStore
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// In-memory post table persisted to `posts.json` in the state directory.
pub struct JsonPostStore {
    inner: RwLock<HashMap<Uuid, Post>>,
    persist_path: PathBuf,
}

impl JsonPostStore {
    pub fn new(state_path: &Path) -> Self {
        let persist_path = state_path.join("posts.json");
        let mut store = Self {
            inner: RwLock::new(HashMap::new()),
            persist_path,
        };
        store.load();
        store
    }

    fn load(&mut self) {
        if let Ok(data) = std::fs::read_to_string(&self.persist_path) {
            if let Ok(posts) = serde_json::from_str::<Vec<Post>>(&data) {
                let mut map = HashMap::new();
                for post in posts {
                    if !post.invariants_hold() {
                        tracing::warn!(post_id = %post.id, "post violates status invariants, loading anyway");
                    }
                    map.insert(post.id, post);
                }
                let count = map.len();
                self.inner = RwLock::new(map);
                tracing::info!(count, "loaded posts from disk");
            }
        }
    }

    async fn persist(&self) {
        let map = self.inner.read().await;
        let posts: Vec<&Post> = map.values().collect();
        if let Ok(json) = serde_json::to_string_pretty(&posts) {
            let path = self.persist_path.clone();
            // Spawn blocking to avoid blocking the Tokio executor.
            let _ = tokio::task::spawn_blocking(move || {
                if let Some(parent) = path.parent() {
                    let _ = std::fs::create_dir_all(parent);
                }
                if let Err(e) = std::fs::write(&path, json) {
                    tracing::warn!(error = %e, "failed to persist posts");
                }
            })
            .await;
        }
    }
}

#[async_trait]
impl PostStore for JsonPostStore {
    async fn list(&self) -> Vec<Post> {
        self.inner.read().await.values().cloned().collect()
    }

    async fn get(&self, id: &Uuid) -> Option<Post> {
        self.inner.read().await.get(id).cloned()
    }

    async fn save(&self, mut post: Post) -> Result<Post> {
        post.updated_at = Utc::now();
        self.inner.write().await.insert(post.id, post.clone());
        self.persist().await;
        Ok(post)
    }

    async fn delete(&self, id: &Uuid) -> Result<bool> {
        let removed = self.inner.write().await.remove(id).is_some();
        if removed {
            self.persist().await;
        }
        Ok(removed)
    }

    async fn due_posts(&self, now: DateTime<Utc>) -> Result<Vec<Post>> {
        let mut due: Vec<Post> = self
            .inner
            .read()
            .await
            .values()
            .filter(|p| p.is_due(now))
            .cloned()
            .collect();
        due.sort_by(|a, b| {
            a.scheduled_at
                .cmp(&b.scheduled_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(due)
    }

    async fn publish_if_scheduled(&self, id: &Uuid, now: DateTime<Utc>) -> Result<CasOutcome> {
        let outcome = {
            // Status re-check and mutation happen under the same write lock,
            // so at most one caller can observe Scheduled and win.
            let mut map = self.inner.write().await;
            let post = map.get_mut(id).ok_or(Error::PostNotFound(*id))?;
            match post.status {
                PostStatus::Scheduled => {
                    post.status = PostStatus::Published;
                    post.published_at = Some(now);
                    post.updated_at = now;
                    CasOutcome::Published(post.clone())
                }
                status => CasOutcome::AlreadyHandled(status),
            }
        };
        if matches!(outcome, CasOutcome::Published(_)) {
            self.persist().await;
        }
        Ok(outcome)
    }
}
