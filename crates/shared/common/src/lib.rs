//! Common utilities shared across the workspace.
//!
//! This crate provides:
//! - Transport-facing error handling with HTTP status codes
//! - The prefixed configuration provider and typed configuration
//! - Structured logging setup

pub mod config;
pub mod error;
pub mod logging;

pub use config::*;
pub use error::{code_of, AppError, BoxError, ErrorBody};
pub use logging::{LogError, LogFormat};
