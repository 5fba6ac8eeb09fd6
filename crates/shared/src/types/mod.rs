//! Common types used across the application.

pub mod file_type;

pub use file_type::FileTypeRule;
