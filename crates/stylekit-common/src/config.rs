//! StyleKit configuration

use crate::logging::LogConfig;
use crate::Result;
use serde::{Deserialize, Serialize};

/// Settings for declaration handling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    /// Expand shorthand properties (`margin`, `border`, ...) into their
    /// longhands when they are set.
    pub expand_shorthands: bool,

    /// Log filter directive (e.g. `"stylekit_cssom=debug"`).
    pub log_filter: Option<String>,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            expand_shorthands: true,
            log_filter: None,
        }
    }
}

impl StyleConfig {
    /// Load a configuration from JSON. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize the configuration to pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Logging configuration derived from these settings.
    pub fn log_config(&self) -> LogConfig {
        match &self.log_filter {
            Some(filter) => LogConfig::default().with_filter(filter.clone()),
            None => LogConfig::default(),
        }
    }
}
