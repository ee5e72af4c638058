//! Post data model — the single entity the publishing pipeline acts on.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Status
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Lifecycle state of a post. Transitions are forward-only:
/// Draft → Scheduled → Published. Nothing leaves Published.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PostStatus {
    Draft,
    Scheduled,
    Published,
}

impl Default for PostStatus {
    fn default() -> Self {
        Self::Draft
    }
}

impl PostStatus {
    /// Whether a transition from `self` to `target` is allowed.
    pub fn can_transition_to(self, target: PostStatus) -> bool {
        matches!(
            (self, target),
            (PostStatus::Draft, PostStatus::Scheduled)
                | (PostStatus::Scheduled, PostStatus::Published)
        )
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Post
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Persisted post.
///
/// Invariants:
/// - `published_at` is `Some` iff `status == Published`.
/// - `scheduled_at` is `Some` iff `status` is Scheduled or Published
///   (retained after publish for audit).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub status: PostStatus,
    /// When the post should go live. Required while Scheduled.
    #[serde(default)]
    pub scheduled_at: Option<DateTime<Utc>>,
    /// Set exactly once, on the Scheduled → Published transition.
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Create a new draft.
    pub fn new_draft(title: impl Into<String>, body: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            body: body.into(),
            status: PostStatus::Draft,
            scheduled_at: None,
            published_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// A post is due when it is Scheduled and its publish time has passed.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.status == PostStatus::Scheduled
            && self.scheduled_at.map_or(false, |at| at <= now)
    }

    /// Check the status/timestamp invariants. Used by store load and tests.
    pub fn invariants_hold(&self) -> bool {
        let published_ok = (self.published_at.is_some())
            == (self.status == PostStatus::Published);
        let scheduled_ok = match self.status {
            PostStatus::Draft => self.scheduled_at.is_none(),
            PostStatus::Scheduled | PostStatus::Published => self.scheduled_at.is_some(),
        };
        published_ok && scheduled_ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn new_draft_holds_invariants() {
        let post = Post::new_draft("hello", "world");
        assert_eq!(post.status, PostStatus::Draft);
        assert!(post.invariants_hold());
        assert!(!post.is_due(Utc::now()));
    }

    #[test]
    fn scheduled_in_past_is_due() {
        let mut post = Post::new_draft("t", "b");
        post.status = PostStatus::Scheduled;
        post.scheduled_at = Some(Utc::now() - Duration::hours(1));
        assert!(post.invariants_hold());
        assert!(post.is_due(Utc::now()));
    }

    #[test]
    fn scheduled_in_future_is_not_due() {
        let mut post = Post::new_draft("t", "b");
        post.status = PostStatus::Scheduled;
        post.scheduled_at = Some(Utc::now() + Duration::hours(1));
        assert!(!post.is_due(Utc::now()));
    }

    #[test]
    fn published_post_is_never_due() {
        let mut post = Post::new_draft("t", "b");
        post.status = PostStatus::Published;
        post.scheduled_at = Some(Utc::now() - Duration::hours(2));
        post.published_at = Some(Utc::now() - Duration::hours(1));
        assert!(post.invariants_hold());
        assert!(!post.is_due(Utc::now()));
    }

    #[test]
    fn transitions_are_forward_only() {
        assert!(PostStatus::Draft.can_transition_to(PostStatus::Scheduled));
        assert!(PostStatus::Scheduled.can_transition_to(PostStatus::Published));
        // No backward moves: a scheduled post stays on the calendar until it
        // publishes, and nothing leaves Published.
        assert!(!PostStatus::Scheduled.can_transition_to(PostStatus::Draft));
        assert!(!PostStatus::Published.can_transition_to(PostStatus::Scheduled));
        assert!(!PostStatus::Published.can_transition_to(PostStatus::Draft));
        assert!(!PostStatus::Draft.can_transition_to(PostStatus::Published));
        // Self-transitions are not part of the state machine either.
        assert!(!PostStatus::Scheduled.can_transition_to(PostStatus::Scheduled));
    }

    #[test]
    fn post_deserializes_without_optional_fields() {
        let json = serde_json::json!({
            "id": Uuid::new_v4(),
            "title": "legacy",
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z",
        });
        let post: Post = serde_json::from_value(json).unwrap();
        assert_eq!(post.status, PostStatus::Draft);
        assert!(post.scheduled_at.is_none());
        assert!(post.published_at.is_none());
    }

    #[test]
    fn status_serde_uses_snake_case() {
        assert_eq!(
            serde_json::to_string(&PostStatus::Scheduled).unwrap(),
            "\"scheduled\""
        );
        let back: PostStatus = serde_json::from_str("\"published\"").unwrap();
        assert_eq!(back, PostStatus::Published);
    }
}
