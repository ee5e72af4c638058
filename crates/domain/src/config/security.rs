use serde::{Deserialize, Serialize};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Security (credential-failure lockout)
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Brute-force lockout policy for the cron trigger endpoint.
///
/// After `max_failures` failed credential attempts from one source within
/// a `window_secs` window, that source is locked out for `lockout_secs`
/// regardless of credential validity. A successful attempt clears the
/// counter and any lock immediately.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    #[serde(default = "d_max_failures")]
    pub max_failures: u32,
    #[serde(default = "d_window_secs")]
    pub window_secs: u64,
    #[serde(default = "d_lockout_secs")]
    pub lockout_secs: u64,
    /// Entries idle longer than this are evicted by the background sweep.
    #[serde(default = "d_idle_evict_secs")]
    pub idle_evict_secs: u64,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_failures: d_max_failures(),
            window_secs: d_window_secs(),
            lockout_secs: d_lockout_secs(),
            idle_evict_secs: d_idle_evict_secs(),
        }
    }
}

// ── serde default helpers ───────────────────────────────────────────

fn d_max_failures() -> u32 {
    5
}
fn d_window_secs() -> u64 {
    5 * 60
}
fn d_lockout_secs() -> u64 {
    15 * 60
}
fn d_idle_evict_secs() -> u64 {
    60 * 60
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn security_defaults_match_lockout_policy() {
        let cfg = SecurityConfig::default();
        assert_eq!(cfg.max_failures, 5);
        assert_eq!(cfg.window_secs, 300);
        assert_eq!(cfg.lockout_secs, 900);
    }

    #[test]
    fn security_parses_overrides() {
        let cfg: SecurityConfig = toml::from_str(
            r#"
            max_failures = 3
            lockout_secs = 60
        "#,
        )
        .unwrap();
        assert_eq!(cfg.max_failures, 3);
        assert_eq!(cfg.lockout_secs, 60);
        assert_eq!(cfg.window_secs, 300);
    }
}
