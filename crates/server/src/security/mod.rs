pub mod audit;
pub mod limiter;
pub mod validator;

pub use audit::AuditLog;
pub use limiter::AttemptTracker;
pub use validator::{AuthDecision, CronAuthValidator, RequestMeta, Violation};
