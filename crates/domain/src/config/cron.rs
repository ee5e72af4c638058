use serde::{Deserialize, Serialize};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Cron
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Scheduled-publishing trigger configuration.
///
/// The publish cycle can be invoked two ways: the in-process ticker
/// (every `tick_secs`) and the authenticated `POST /v1/cron/publish`
/// endpoint. Both run the same orchestrator; overlap is safe because
/// the store's conditional write is the only mutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CronConfig {
    /// Environment variable holding the cron bearer secret.
    /// If unset or empty, the HTTP trigger is disabled (503).
    #[serde(default = "d_secret_env")]
    pub secret_env: String,
    /// In-process ticker interval in seconds.
    #[serde(default = "d_tick_secs")]
    pub tick_secs: u64,
    /// Whether the in-process ticker runs at all. The HTTP trigger is
    /// unaffected by this flag.
    #[serde(default = "d_true")]
    pub ticker_enabled: bool,
}

impl Default for CronConfig {
    fn default() -> Self {
        Self {
            secret_env: d_secret_env(),
            tick_secs: d_tick_secs(),
            ticker_enabled: true,
        }
    }
}

// ── serde default helpers ───────────────────────────────────────────

fn d_secret_env() -> String {
    "INK_CRON_SECRET".into()
}
fn d_tick_secs() -> u64 {
    60
}
fn d_true() -> bool {
    true
}
