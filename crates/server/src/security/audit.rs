//! Audit sink for cron auth outcomes.
//!
//! Every validation outcome — success included — produces one structured
//! record. Records always go to the `tracing` stream; when a log path is
//! configured they are also appended as JSON lines. Sink failures are
//! swallowed: auditing must never abort the validator.

use std::io::Write;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// One auth outcome, as written to the audit sink.
#[derive(Debug, Clone, Serialize)]
pub struct AuditRecord {
    pub timestamp: DateTime<Utc>,
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    /// `"allowed"` or the violation kind in snake_case.
    pub outcome: String,
}

pub struct AuditLog {
    file_path: Option<PathBuf>,
}

impl AuditLog {
    pub fn new(file_path: Option<PathBuf>) -> Self {
        Self { file_path }
    }

    /// Write one record. Never fails.
    pub fn record(&self, record: &AuditRecord) {
        tracing::info!(
            source = %record.source,
            user_agent = record.user_agent.as_deref().unwrap_or(""),
            outcome = %record.outcome,
            "cron auth attempt"
        );

        let Some(path) = &self.file_path else {
            return;
        };
        let Ok(line) = serde_json::to_string(record) else {
            return;
        };
        let result = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .and_then(|mut f| writeln!(f, "{line}"));
        if let Err(e) = result {
            tracing::debug!(error = %e, "audit file append failed, record kept in log stream only");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(outcome: &str) -> AuditRecord {
        AuditRecord {
            timestamp: Utc::now(),
            source: "10.0.0.1".into(),
            user_agent: Some("curl/8".into()),
            outcome: outcome.into(),
        }
    }

    #[test]
    fn appends_json_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.jsonl");
        let log = AuditLog::new(Some(path.clone()));
        log.record(&record("allowed"));
        log.record(&record("invalid_credential"));

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["outcome"], "allowed");
        assert_eq!(first["source"], "10.0.0.1");
    }

    #[test]
    fn unwritable_path_does_not_panic() {
        let log = AuditLog::new(Some(PathBuf::from("/nonexistent-dir/audit.jsonl")));
        log.record(&record("rate_limited"));
    }

    #[test]
    fn no_path_is_log_stream_only() {
        let log = AuditLog::new(None);
        log.record(&record("missing_header"));
    }
}
