//! Publish executor — transitions one due post, isolating failures so a
//! bad post never aborts the batch.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::store::{CasOutcome, PostStore};

/// Result of one publish attempt, modeled as a value — a store failure is
/// captured here, never raised to the orchestrator.
#[derive(Debug, Clone)]
pub enum PublishOutcome {
    /// The conditional write observed Scheduled and won.
    Published,
    /// The post was no longer Scheduled: another run or a user edit got
    /// there first. Idempotent no-op, the end state is what we wanted.
    AlreadyPublished,
    /// The store write failed; the post stays Scheduled and will be picked
    /// up again next run.
    Failed { message: String },
}

/// Attempt to publish a single post via the store's compare-and-set.
pub async fn publish_one(
    store: &dyn PostStore,
    post_id: Uuid,
    now: DateTime<Utc>,
) -> PublishOutcome {
    match store.publish_if_scheduled(&post_id, now).await {
        Ok(CasOutcome::Published(post)) => {
            tracing::info!(post_id = %post.id, title = %post.title, "post published");
            PublishOutcome::Published
        }
        Ok(CasOutcome::AlreadyHandled(status)) => {
            tracing::debug!(post_id = %post_id, status = ?status, "post no longer scheduled, skipping");
            PublishOutcome::AlreadyPublished
        }
        Err(e) => {
            tracing::warn!(post_id = %post_id, error = %e, "publish write failed");
            PublishOutcome::Failed {
                message: e.to_string(),
            }
        }
    }
}
