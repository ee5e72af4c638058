//! Cron trigger authentication.
//!
//! The secret is read once at startup and cached as a SHA-256 digest;
//! presented credentials are hashed to the same fixed length and compared
//! in constant time, so neither the comparison nor the token length leaks
//! timing information.
//!
//! Validation order matters: the lockout check runs before the credential
//! is even parsed. A locked-out source learns nothing about credential
//! validity and cannot use request volume to extend its own window.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use super::audit::{AuditLog, AuditRecord};
use super::limiter::AttemptTracker;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Types
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Request metadata carried into validation and the audit trail.
#[derive(Debug, Clone)]
pub struct RequestMeta {
    /// Source identifier — the client IP.
    pub source: String,
    pub user_agent: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Violation {
    MissingHeader,
    MalformedHeader,
    InvalidCredential,
    RateLimited,
}

impl Violation {
    pub fn as_str(self) -> &'static str {
        match self {
            Violation::MissingHeader => "missing_header",
            Violation::MalformedHeader => "malformed_header",
            Violation::InvalidCredential => "invalid_credential",
            Violation::RateLimited => "rate_limited",
        }
    }
}

/// Validation result, modeled as a value — violations are expected
/// outcomes here, not errors.
#[derive(Debug, Clone)]
pub enum AuthDecision {
    Allowed,
    Denied {
        violation: Violation,
        message: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// CronAuthValidator
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub struct CronAuthValidator {
    /// SHA-256 of the configured secret, computed once at startup.
    secret_hash: Vec<u8>,
}

impl CronAuthValidator {
    pub fn new(secret: &str) -> Self {
        Self {
            secret_hash: Sha256::digest(secret.as_bytes()).to_vec(),
        }
    }

    /// Validate one trigger request. Consults the attempt tracker, records
    /// failure/success on it, and writes an audit record for every outcome.
    pub fn validate(
        &self,
        authorization: Option<&str>,
        meta: &RequestMeta,
        attempts: &AttemptTracker,
        audit: &AuditLog,
        now: DateTime<Utc>,
    ) -> AuthDecision {
        // 1. Lockout check, before the credential is inspected.
        if attempts.is_locked(&meta.source, now) {
            return self.deny(meta, audit, now, Violation::RateLimited, "too many failed attempts");
        }

        // 2. Header presence and scheme.
        let Some(header) = authorization else {
            return self.deny(meta, audit, now, Violation::MissingHeader, "authorization header required");
        };
        let token = match header.strip_prefix("Bearer ") {
            Some(t) if !t.is_empty() => t,
            _ => {
                return self.deny(meta, audit, now, Violation::MalformedHeader, "expected Bearer scheme");
            }
        };

        // 3. Constant-time credential comparison.
        let provided_hash = Sha256::digest(token.as_bytes());
        if !bool::from(provided_hash.ct_eq(self.secret_hash.as_slice())) {
            attempts.record_failure(&meta.source, now);
            return self.deny(meta, audit, now, Violation::InvalidCredential, "invalid credential");
        }

        // 4. Match — clear any failure count for this source.
        attempts.record_success(&meta.source);
        audit.record(&AuditRecord {
            timestamp: now,
            source: meta.source.clone(),
            user_agent: meta.user_agent.clone(),
            outcome: "allowed".into(),
        });
        AuthDecision::Allowed
    }

    fn deny(
        &self,
        meta: &RequestMeta,
        audit: &AuditLog,
        now: DateTime<Utc>,
        violation: Violation,
        message: &str,
    ) -> AuthDecision {
        audit.record(&AuditRecord {
            timestamp: now,
            source: meta.source.clone(),
            user_agent: meta.user_agent.clone(),
            outcome: violation.as_str().into(),
        });
        AuthDecision::Denied {
            violation,
            message: message.into(),
        }
    }
}
