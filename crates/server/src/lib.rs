//! Inkpress server — HTTP API, post store, and the scheduled-publishing
//! pipeline (rate-limited cron auth, due-post selection, compare-and-set
//! publish, execution reporting).

pub mod api;
pub mod bootstrap;
pub mod cli;
pub mod publisher;
pub mod security;
pub mod state;
pub mod store;
