mod cron;
mod security;
mod server;
mod workspace;

pub use cron::*;
pub use security::*;
pub use server::*;
pub use workspace::*;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Top-level config
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub cron: CronConfig,
    #[serde(default)]
    pub security: SecurityConfig,
    #[serde(default)]
    pub workspace: WorkspaceConfig,
    #[serde(default)]
    pub audit: AuditConfig,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Audit
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AuditConfig {
    /// Optional JSONL file that auth outcomes are appended to, in addition
    /// to the structured log stream. Write failures are swallowed.
    #[serde(default)]
    pub log_path: Option<PathBuf>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Config validation
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Severity level for a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSeverity {
    Error,
    Warning,
}

/// A single configuration validation issue.
#[derive(Debug, Clone)]
pub struct ConfigError {
    pub severity: ConfigSeverity,
    pub field: String,
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.severity {
            ConfigSeverity::Error => "ERROR",
            ConfigSeverity::Warning => "WARN",
        };
        write!(f, "[{tag}] {}: {}", self.field, self.message)
    }
}

impl Config {
    /// Validate the configuration and return a list of issues.
    ///
    /// Returns an empty vec when everything looks good.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut issues = Vec::new();

        if self.server.port == 0 {
            issues.push(ConfigError {
                severity: ConfigSeverity::Error,
                field: "server.port".into(),
                message: "port must be non-zero".into(),
            });
        }

        if let Some(rl) = &self.server.rate_limit {
            if rl.requests_per_second == 0 || rl.burst_size == 0 {
                issues.push(ConfigError {
                    severity: ConfigSeverity::Error,
                    field: "server.rate_limit".into(),
                    message: "requests_per_second and burst_size must be > 0".into(),
                });
            }
        }

        if self.cron.tick_secs == 0 {
            issues.push(ConfigError {
                severity: ConfigSeverity::Error,
                field: "cron.tick_secs".into(),
                message: "tick interval must be > 0".into(),
            });
        }
        if self.cron.secret_env.is_empty() {
            issues.push(ConfigError {
                severity: ConfigSeverity::Warning,
                field: "cron.secret_env".into(),
                message: "empty secret env var name — cron endpoint will be disabled".into(),
            });
        }

        if self.security.max_failures == 0 {
            issues.push(ConfigError {
                severity: ConfigSeverity::Error,
                field: "security.max_failures".into(),
                message: "max_failures must be > 0".into(),
            });
        }
        if self.security.window_secs == 0 || self.security.lockout_secs == 0 {
            issues.push(ConfigError {
                severity: ConfigSeverity::Error,
                field: "security".into(),
                message: "window_secs and lockout_secs must be > 0".into(),
            });
        }

        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates_clean() {
        assert!(Config::default().validate().is_empty());
    }

    #[test]
    fn zero_max_failures_is_an_error() {
        let mut config = Config::default();
        config.security.max_failures = 0;
        let issues = config.validate();
        assert!(issues
            .iter()
            .any(|i| i.severity == ConfigSeverity::Error && i.field == "security.max_failures"));
    }

    #[test]
    fn zero_tick_is_an_error() {
        let mut config = Config::default();
        config.cron.tick_secs = 0;
        assert!(config
            .validate()
            .iter()
            .any(|i| i.field == "cron.tick_secs"));
    }

    #[test]
    fn empty_secret_env_is_a_warning() {
        let mut config = Config::default();
        config.cron.secret_env = String::new();
        let issues = config.validate();
        assert!(issues
            .iter()
            .any(|i| i.severity == ConfigSeverity::Warning && i.field == "cron.secret_env"));
    }
}
