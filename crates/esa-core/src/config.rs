//! Configuration access.
//!
//! Values are looked up by name at the point of use, so a missing key only
//! fails the operations that need it. The process environment is the only
//! store; nothing is cached here.
//!
//! ```rust
//! use esa_core::{ConfigSource, StaticConfig, DEFAULT_TEAM};
//!
//! let config = StaticConfig::new().with(DEFAULT_TEAM, "docs");
//! assert_eq!(config.get_required(DEFAULT_TEAM).unwrap(), "docs");
//! assert!(config.get_required("ESA_API_KEY").is_err());
//! ```

use crate::error::{Error, Result};
use std::collections::HashMap;

/// Bearer credential attached to every outbound API call.
pub const API_KEY: &str = "ESA_API_KEY";

/// Team used when a tool call does not name one.
pub const DEFAULT_TEAM: &str = "DEFAULT_ESA_TEAM";

/// A source of named configuration values.
pub trait ConfigSource: Send + Sync {
    /// Look up a raw value.
    fn get(&self, key: &str) -> Option<String>;

    /// Look up a value that must be present and non-empty.
    fn get_required(&self, key: &str) -> Result<String> {
        match self.get(key) {
            Some(value) if !value.is_empty() => Ok(value),
            _ => {
                log::debug!("Required configuration value {key} is not set");
                Err(Error::configuration(key))
            }
        }
    }
}

/// Reads values from the process environment.
#[derive(Clone, Copy, Debug, Default)]
pub struct EnvConfig;

impl ConfigSource for EnvConfig {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// Fixed in-memory values, for embedding and tests.
#[derive(Clone, Debug, Default)]
pub struct StaticConfig {
    values: HashMap<String, String>,
}

impl StaticConfig {
    /// Create an empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a value.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }
}

impl ConfigSource for StaticConfig {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}
