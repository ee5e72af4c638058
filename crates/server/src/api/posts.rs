//! Post management CRUD + scheduling API.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use ink_domain::post::{Post, PostStatus};

use crate::state::AppState;

/// Build a standardized JSON error response: `{ "error": "<message>" }`.
fn api_error(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(serde_json::json!({ "error": message.into() }))).into_response()
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// GET /v1/posts
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub async fn list_posts(State(state): State<AppState>) -> impl IntoResponse {
    let mut posts = state.posts.list().await;
    posts.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
    let count = posts.len();
    Json(serde_json::json!({
        "posts": posts,
        "count": count,
    }))
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// GET /v1/posts/:id
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
) -> impl IntoResponse {
    match state.posts.get(&id).await {
        Some(post) => Json(serde_json::json!({ "post": post })).into_response(),
        None => api_error(StatusCode::NOT_FOUND, "post not found"),
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// POST /v1/posts
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    pub title: String,
    #[serde(default)]
    pub body: String,
}

pub async fn create_post(
    State(state): State<AppState>,
    Json(req): Json<CreatePostRequest>,
) -> Response {
    if req.title.trim().is_empty() {
        return api_error(StatusCode::UNPROCESSABLE_ENTITY, "title must not be empty");
    }
    let post = Post::new_draft(req.title, req.body);
    match state.posts.save(post).await {
        Ok(post) => (StatusCode::CREATED, Json(serde_json::json!({ "post": post }))).into_response(),
        Err(e) => api_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// PUT /v1/posts/:id
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Deserialize)]
pub struct UpdatePostRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
}

pub async fn update_post(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
    Json(req): Json<UpdatePostRequest>,
) -> Response {
    let Some(mut post) = state.posts.get(&id).await else {
        return api_error(StatusCode::NOT_FOUND, "post not found");
    };
    if let Some(title) = req.title {
        if title.trim().is_empty() {
            return api_error(StatusCode::UNPROCESSABLE_ENTITY, "title must not be empty");
        }
        post.title = title;
    }
    if let Some(body) = req.body {
        post.body = body;
    }
    match state.posts.save(post).await {
        Ok(post) => Json(serde_json::json!({ "post": post })).into_response(),
        Err(e) => api_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// DELETE /v1/posts/:id
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub async fn delete_post(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
) -> Response {
    match state.posts.delete(&id).await {
        Ok(true) => Json(serde_json::json!({ "deleted": id })).into_response(),
        Ok(false) => api_error(StatusCode::NOT_FOUND, "post not found"),
        Err(e) => api_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// POST /v1/posts/:id/schedule
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Deserialize)]
pub struct SchedulePostRequest {
    pub scheduled_at: DateTime<Utc>,
}

/// Move a draft (or an already-scheduled post) onto the publish calendar.
/// The publish time must lie in the future; published posts cannot be
/// rescheduled.
pub async fn schedule_post(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
    Json(req): Json<SchedulePostRequest>,
) -> Response {
    if req.scheduled_at <= Utc::now() {
        return api_error(
            StatusCode::UNPROCESSABLE_ENTITY,
            "scheduled_at must be in the future",
        );
    }
    let Some(mut post) = state.posts.get(&id).await else {
        return api_error(StatusCode::NOT_FOUND, "post not found");
    };
    let allowed = post.status == PostStatus::Scheduled
        || post.status.can_transition_to(PostStatus::Scheduled);
    if !allowed {
        return api_error(
            StatusCode::CONFLICT,
            format!("cannot schedule a post in status {:?}", post.status),
        );
    }
    post.status = PostStatus::Scheduled;
    post.scheduled_at = Some(req.scheduled_at);
    match state.posts.save(post).await {
        Ok(post) => Json(serde_json::json!({ "post": post })).into_response(),
        Err(e) => api_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use chrono::Duration;

    use ink_domain::config::Config;

    use crate::security::{AttemptTracker, AuditLog};
    use crate::store::{JsonPostStore, PostStore};

    fn test_state(dir: &tempfile::TempDir) -> AppState {
        AppState {
            config: Arc::new(Config::default()),
            posts: Arc::new(JsonPostStore::new(dir.path())),
            attempts: Arc::new(AttemptTracker::new(Default::default())),
            audit: Arc::new(AuditLog::new(None)),
            cron_validator: None,
            api_token_hash: None,
        }
    }

    #[tokio::test]
    async fn schedule_rejects_past_timestamps() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(&dir);
        let post = state.posts.save(Post::new_draft("t", "b")).await.unwrap();

        let resp = schedule_post(
            State(state.clone()),
            Path(post.id),
            Json(SchedulePostRequest {
                scheduled_at: Utc::now() - Duration::minutes(1),
            }),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        // The post is untouched.
        assert_eq!(state.posts.get(&post.id).await.unwrap().status, PostStatus::Draft);
    }

    #[tokio::test]
    async fn schedule_accepts_future_timestamp() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(&dir);
        let post = state.posts.save(Post::new_draft("t", "b")).await.unwrap();
        let at = Utc::now() + Duration::hours(1);

        let resp = schedule_post(
            State(state.clone()),
            Path(post.id),
            Json(SchedulePostRequest { scheduled_at: at }),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let saved = state.posts.get(&post.id).await.unwrap();
        assert_eq!(saved.status, PostStatus::Scheduled);
        assert_eq!(saved.scheduled_at, Some(at));
    }

    #[tokio::test]
    async fn published_post_cannot_be_rescheduled() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(&dir);
        let mut post = Post::new_draft("t", "b");
        post.status = PostStatus::Published;
        post.scheduled_at = Some(Utc::now() - Duration::hours(2));
        post.published_at = Some(Utc::now() - Duration::hours(1));
        let post = state.posts.save(post).await.unwrap();

        let resp = schedule_post(
            State(state.clone()),
            Path(post.id),
            Json(SchedulePostRequest {
                scheduled_at: Utc::now() + Duration::hours(1),
            }),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);
    }
}
