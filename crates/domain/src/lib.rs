//! Shared types for the Inkpress publishing service: the post model,
//! configuration tree, and the common error enum.

pub mod config;
pub mod error;
pub mod post;

pub use error::{Error, Result};
