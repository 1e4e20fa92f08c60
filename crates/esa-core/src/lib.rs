//! esa Core - shared errors and configuration access.
//!
//! This crate provides the foundational types used across all esa crates.
//! It has no internal dependencies (dependency level 0).
//!
//! # Modules
//!
//! - [`error`]: Error taxonomy and Result alias
//! - [`config`]: Required-value lookup over the process environment

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

pub mod config;
pub mod error;

// Re-export key types at crate root for convenience
pub use config::{ConfigSource, EnvConfig, StaticConfig, API_KEY, DEFAULT_TEAM};
pub use error::{Error, FieldViolation, Result};
