//! Shared types, errors, and configuration for Neraca.
//!
//! This crate provides common types used across all other crates:
//! - The materiality rule for decimal amounts
//! - Typed IDs for type-safe entity references
//! - Pagination types for list endpoints
//! - Application-wide error types
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::{AppConfig, ReportingConfig};
pub use error::AppError;
