use std::sync::Arc;

use ink_domain::config::Config;

use crate::security::{AttemptTracker, AuditLog, CronAuthValidator};
use crate::store::PostStore;

/// Shared application state passed to all API handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,

    /// Post table — the only shared mutable resource.
    pub posts: Arc<dyn PostStore>,

    // ── Security (startup-computed) ───────────────────────────────────
    /// Per-source credential-failure tracker for the cron endpoint.
    pub attempts: Arc<AttemptTracker>,
    /// Audit sink for cron auth outcomes.
    pub audit: Arc<AuditLog>,
    /// Cron secret validator. `None` = secret not configured, HTTP trigger
    /// disabled (the in-process ticker still runs).
    pub cron_validator: Option<Arc<CronAuthValidator>>,
    /// SHA-256 hash of the API bearer token for post management endpoints.
    /// `None` = dev mode (no auth enforced).
    pub api_token_hash: Option<Vec<u8>>,
}
