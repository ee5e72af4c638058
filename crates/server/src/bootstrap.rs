//! AppState construction and background-task spawning extracted from
//! `main.rs`.

use std::sync::Arc;

use sha2::{Digest, Sha256};

use ink_domain::config::{Config, ConfigSeverity};

use crate::security::{AttemptTracker, AuditLog, CronAuthValidator};
use crate::state::AppState;
use crate::store::JsonPostStore;

/// Validate config, initialize every subsystem and return a fully-wired
/// [`AppState`].
pub fn build_app_state(config: Arc<Config>) -> anyhow::Result<AppState> {
    // ── Config validation ────────────────────────────────────────────
    let issues = config.validate();
    for issue in &issues {
        match issue.severity {
            ConfigSeverity::Warning => tracing::warn!("config: {issue}"),
            ConfigSeverity::Error => tracing::error!("config: {issue}"),
        }
    }
    if issues.iter().any(|i| i.severity == ConfigSeverity::Error) {
        anyhow::bail!(
            "config validation failed with {} error(s)",
            issues
                .iter()
                .filter(|i| i.severity == ConfigSeverity::Error)
                .count()
        );
    }

    // ── Post store ───────────────────────────────────────────────────
    if let Err(e) = std::fs::create_dir_all(&config.workspace.state_path) {
        tracing::warn!(path = %config.workspace.state_path.display(), error = %e, "failed to create state dir");
    }
    let posts = Arc::new(JsonPostStore::new(&config.workspace.state_path));
    tracing::info!(path = %config.workspace.state_path.display(), "post store ready");

    // ── Attempt tracker (credential-failure lockout) ─────────────────
    let attempts = Arc::new(AttemptTracker::new(config.security.clone()));
    tracing::info!(
        max_failures = config.security.max_failures,
        window_secs = config.security.window_secs,
        lockout_secs = config.security.lockout_secs,
        "attempt tracker ready"
    );

    // ── Audit sink ───────────────────────────────────────────────────
    let audit = Arc::new(AuditLog::new(config.audit.log_path.clone()));
    match &config.audit.log_path {
        Some(p) => tracing::info!(path = %p.display(), "audit log file enabled"),
        None => tracing::info!("audit records go to the log stream only"),
    }

    // ── Cron secret (read once, hashed for constant-time comparison) ─
    let cron_validator = {
        let env_var = &config.cron.secret_env;
        match std::env::var(env_var).ok().filter(|s| !s.is_empty()) {
            Some(secret) => {
                tracing::info!(source = %format!("env:{env_var}"), "cron trigger auth enabled");
                Some(Arc::new(CronAuthValidator::new(&secret)))
            }
            None => {
                tracing::warn!(
                    "cron trigger DISABLED — set the {env_var} env var to enable POST /v1/cron/publish"
                );
                None
            }
        }
    };

    // ── API token (read once, hash for constant-time comparison) ────
    let api_token_hash = {
        let env_var = &config.server.api_token_env;
        match std::env::var(env_var).ok().filter(|t| !t.is_empty()) {
            Some(token) => {
                tracing::info!(source = %format!("env:{env_var}"), "API bearer-token auth enabled");
                Some(Sha256::digest(token.as_bytes()).to_vec())
            }
            None => {
                tracing::warn!(
                    "API bearer-token auth DISABLED — set the {env_var} env var"
                );
                None
            }
        }
    };

    Ok(AppState {
        config,
        posts,
        attempts,
        audit,
        cron_validator,
        api_token_hash,
    })
}

/// Spawn the long-running background tokio tasks (publish ticker, stale
/// attempt-entry eviction).
///
/// Call this **after** [`build_app_state`] when running the HTTP server.
pub fn spawn_background_tasks(state: &AppState) {
    // ── Publish ticker ───────────────────────────────────────────────
    if state.config.cron.ticker_enabled {
        let posts = state.posts.clone();
        let tick_secs = state.config.cron.tick_secs;
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(
                std::time::Duration::from_secs(tick_secs),
            );
            loop {
                interval.tick().await;
                match crate::publisher::run_publish_cycle(posts.as_ref()).await {
                    Ok(report) if report.posts_processed == 0 => {}
                    Ok(report) => tracing::info!(
                        execution_id = %report.execution_id,
                        published = report.posts_published,
                        errors = report.errors.len(),
                        "ticker publish cycle done"
                    ),
                    Err(e) => tracing::error!(error = %e, "ticker publish cycle failed"),
                }
            }
        });
    } else {
        tracing::info!("publish ticker disabled (cron.ticker_enabled = false)");
    }

    // ── Periodic stale attempt-entry eviction ────────────────────────
    {
        let attempts = state.attempts.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(
                std::time::Duration::from_secs(300),
            );
            loop {
                interval.tick().await;
                let evicted = attempts.evict_stale(chrono::Utc::now());
                if evicted > 0 {
                    tracing::debug!(evicted, "evicted stale auth attempt entries");
                }
            }
        });
    }
    tracing::info!("background tasks spawned");
}
