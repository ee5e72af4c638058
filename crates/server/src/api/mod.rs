pub mod auth;
pub mod cron;
pub mod posts;

use axum::middleware;
use axum::routing::{delete, get, post, put};
use axum::Router;

use crate::state::AppState;

/// Build the full API router.
///
/// Routes are split into **public** (no auth required) and **protected**
/// (gated behind the API bearer-token middleware). The cron trigger is
/// public at the router level because it carries its own credential and
/// rate-limiting discipline inside the handler.
///
/// `state` is needed to wire up the auth middleware at build time.
pub fn router(state: AppState) -> Router<AppState> {
    let public = Router::new()
        // Health + readiness (used by probes, no side effects)
        .route("/v1/health", get(cron::health))
        .route("/v1/cron/readiness", get(cron::readiness))
        // Scheduled-publishing trigger (validated in the handler)
        .route("/v1/cron/publish", post(cron::trigger_publish));

    let protected = Router::new()
        // Post management
        .route("/v1/posts", get(posts::list_posts))
        .route("/v1/posts", post(posts::create_post))
        .route("/v1/posts/:id", get(posts::get_post))
        .route("/v1/posts/:id", put(posts::update_post))
        .route("/v1/posts/:id", delete(posts::delete_post))
        .route("/v1/posts/:id/schedule", post(posts::schedule_post))
        // Apply API auth middleware to all protected routes.
        .route_layer(middleware::from_fn_with_state(
            state,
            auth::require_api_token,
        ));

    public.merge(protected)
}
