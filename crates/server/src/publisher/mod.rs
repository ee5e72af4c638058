//! Scheduler orchestrator — one end-to-end publish cycle.
//!
//! Each invocation is independent and holds no state across runs, so the
//! cycle is safe to repeat and safe to overlap: the store's conditional
//! write is the only mutation, and a concurrent run that loses the race
//! on a post simply records an idempotent no-op. Running twice in quick
//! succession publishes nothing extra on the second pass.

pub mod executor;
pub mod report;

pub use executor::{publish_one, PublishOutcome};
pub use report::{ExecutionReport, PublishError, ReportBuilder};

use chrono::Utc;

use ink_domain::Result;

use crate::store::PostStore;

/// Run one publish cycle: select due posts at a single `now`, publish each
/// in selection order, and return the execution report.
///
/// Per-post failures are captured into the report; only an error from the
/// selection read itself propagates, to be handled at the trigger boundary.
pub async fn run_publish_cycle(store: &dyn PostStore) -> Result<ExecutionReport> {
    let now = Utc::now();
    let mut builder = ReportBuilder::begin(now);
    let execution_id = builder.execution_id();

    let due = store.due_posts(now).await?;
    tracing::debug!(execution_id = %execution_id, due = due.len(), "publish cycle started");

    for post in &due {
        let outcome = publish_one(store, post.id, now).await;
        builder.record(post.id, &outcome);
    }

    let report = builder.finish(Utc::now());
    tracing::info!(
        execution_id = %report.execution_id,
        processed = report.posts_processed,
        published = report.posts_published,
        errors = report.errors.len(),
        duration_ms = report.duration_ms,
        "publish cycle completed"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::JsonPostStore;
    use chrono::Duration;
    use ink_domain::post::{Post, PostStatus};

    fn scheduled(offset: Duration) -> Post {
        let mut post = Post::new_draft("t", "b");
        post.status = PostStatus::Scheduled;
        post.scheduled_at = Some(Utc::now() + offset);
        post
    }

    #[tokio::test]
    async fn cycle_publishes_only_due_posts() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonPostStore::new(dir.path());
        let due = scheduled(Duration::hours(-1));
        let due_id = due.id;
        store.save(due).await.unwrap();
        store.save(scheduled(Duration::hours(1))).await.unwrap();
        store.save(Post::new_draft("d", "b")).await.unwrap();

        let report = run_publish_cycle(&store).await.unwrap();
        assert_eq!(report.posts_processed, 1);
        assert_eq!(report.posts_published, 1);
        assert!(report.errors.is_empty());
        assert_eq!(store.get(&due_id).await.unwrap().status, PostStatus::Published);
    }

    #[tokio::test]
    async fn second_cycle_finds_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonPostStore::new(dir.path());
        store.save(scheduled(Duration::minutes(-5))).await.unwrap();

        let first = run_publish_cycle(&store).await.unwrap();
        assert_eq!(first.posts_published, 1);

        let second = run_publish_cycle(&store).await.unwrap();
        assert_eq!(second.posts_processed, 0);
        assert_eq!(second.posts_published, 0);
        assert_ne!(first.execution_id, second.execution_id);
    }

    #[tokio::test]
    async fn batch_processes_in_scheduled_order() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonPostStore::new(dir.path());
        for hours in [-3i64, -1, -2] {
            store.save(scheduled(Duration::hours(hours))).await.unwrap();
        }
        let report = run_publish_cycle(&store).await.unwrap();
        assert_eq!(report.posts_processed, 3);
        assert_eq!(report.posts_published, 3);
    }
}
