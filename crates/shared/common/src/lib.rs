//! Common utilities shared across identity services.
//!
//! This crate provides:
//! - Unified error handling for HTTP, with domain error conversion
//! - Configuration structures

pub mod config;
pub mod error;

pub use config::*;
pub use error::{AppError, AppResult, OptionExt};
