//! Shared types, errors, and configuration for Docstore.
//!
//! This crate provides common types used across all other crates:
//! - File type allow-list entries
//! - Application-wide error types
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use types::FileTypeRule;
