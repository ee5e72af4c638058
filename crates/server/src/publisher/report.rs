//! Execution reporting — aggregates per-post outcomes into one immutable
//! report per run.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::executor::PublishOutcome;

/// One failed publish attempt inside a run.
#[derive(Debug, Clone, Serialize)]
pub struct PublishError {
    pub post_id: Uuid,
    pub message: String,
}

/// Structured summary of one publish cycle. Never mutated after `finish`.
#[derive(Debug, Clone, Serialize)]
pub struct ExecutionReport {
    pub execution_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    pub duration_ms: u64,
    /// Due posts considered.
    pub posts_processed: usize,
    /// Successful transitions, including idempotent no-ops (end state is
    /// published either way).
    pub posts_published: usize,
    /// Per-post failures in batch order.
    pub errors: Vec<PublishError>,
}

/// Accumulates outcomes as the executor works through the batch.
pub struct ReportBuilder {
    execution_id: Uuid,
    started_at: DateTime<Utc>,
    posts_processed: usize,
    posts_published: usize,
    errors: Vec<PublishError>,
}

impl ReportBuilder {
    /// Start a report. Called before due-post selection so `started_at`
    /// covers the whole run.
    pub fn begin(started_at: DateTime<Utc>) -> Self {
        Self {
            execution_id: Uuid::new_v4(),
            started_at,
            posts_processed: 0,
            posts_published: 0,
            errors: Vec::new(),
        }
    }

    pub fn execution_id(&self) -> Uuid {
        self.execution_id
    }

    pub fn record(&mut self, post_id: Uuid, outcome: &PublishOutcome) {
        self.posts_processed += 1;
        match outcome {
            PublishOutcome::Published | PublishOutcome::AlreadyPublished => {
                self.posts_published += 1;
            }
            PublishOutcome::Failed { message } => {
                self.errors.push(PublishError {
                    post_id,
                    message: message.clone(),
                });
            }
        }
    }

    pub fn finish(self, completed_at: DateTime<Utc>) -> ExecutionReport {
        let duration_ms = (completed_at - self.started_at)
            .num_milliseconds()
            .max(0) as u64;
        ExecutionReport {
            execution_id: self.execution_id,
            started_at: self.started_at,
            completed_at,
            duration_ms,
            posts_processed: self.posts_processed,
            posts_published: self.posts_published,
            errors: self.errors,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn empty_run_reports_zeroes() {
        let started = Utc::now();
        let report = ReportBuilder::begin(started).finish(started + Duration::milliseconds(5));
        assert_eq!(report.posts_processed, 0);
        assert_eq!(report.posts_published, 0);
        assert!(report.errors.is_empty());
        assert_eq!(report.duration_ms, 5);
    }

    #[test]
    fn counts_ok_noop_and_failed_outcomes() {
        let mut builder = ReportBuilder::begin(Utc::now());
        let failed_id = Uuid::new_v4();
        builder.record(Uuid::new_v4(), &PublishOutcome::Published);
        builder.record(Uuid::new_v4(), &PublishOutcome::AlreadyPublished);
        builder.record(
            failed_id,
            &PublishOutcome::Failed {
                message: "store unavailable".into(),
            },
        );
        let report = builder.finish(Utc::now());
        assert_eq!(report.posts_processed, 3);
        assert_eq!(report.posts_published, 2);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].post_id, failed_id);
        assert_eq!(report.errors[0].message, "store unavailable");
    }

    #[test]
    fn errors_keep_batch_order() {
        let mut builder = ReportBuilder::begin(Utc::now());
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();
        builder.record(first, &PublishOutcome::Failed { message: "a".into() });
        builder.record(second, &PublishOutcome::Failed { message: "b".into() });
        let report = builder.finish(Utc::now());
        assert_eq!(report.errors[0].post_id, first);
        assert_eq!(report.errors[1].post_id, second);
    }

    #[test]
    fn execution_ids_are_unique_per_run() {
        let a = ReportBuilder::begin(Utc::now());
        let b = ReportBuilder::begin(Utc::now());
        assert_ne!(a.execution_id(), b.execution_id());
    }

    #[test]
    fn report_serializes_expected_fields() {
        let report = ReportBuilder::begin(Utc::now()).finish(Utc::now());
        let json = serde_json::to_value(&report).unwrap();
        for field in [
            "execution_id",
            "started_at",
            "completed_at",
            "duration_ms",
            "posts_processed",
            "posts_published",
            "errors",
        ] {
            assert!(json.get(field).is_some(), "missing field {field}");
        }
    }
}
