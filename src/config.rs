//! Engine configuration
//!
//! Loaded from a JSON file; every field has a default so an empty object is a
//! valid configuration.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::observability::Severity;

/// Page window defaults
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationConfig {
    /// Limit used when a page request carries none (default: 50)
    #[serde(default = "default_limit")]
    pub default_limit: u32,

    /// Upper bound a requested limit is clamped to (default: 100)
    #[serde(default = "default_max_limit")]
    pub max_limit: u32,
}

fn default_limit() -> u32 {
    50
}

fn default_max_limit() -> u32 {
    100
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
            max_limit: default_max_limit(),
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub pagination: PaginationConfig,

    /// Minimum log severity: trace, info, warn, error (default: "info")
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            pagination: PaginationConfig::default(),
            log_level: default_log_level(),
        }
    }
}

impl EngineConfig {
    /// Load and validate configuration from a JSON file
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config {}: {}", path.display(), e))?;

        let config: EngineConfig =
            serde_json::from_str(&content).map_err(|e| format!("Invalid config JSON: {}", e))?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.pagination.max_limit == 0 {
            return Err("pagination.max_limit must be > 0".into());
        }

        if self.pagination.default_limit == 0
            || self.pagination.default_limit > self.pagination.max_limit
        {
            return Err(format!(
                "pagination.default_limit must be within [1, {}]",
                self.pagination.max_limit
            ));
        }

        self.severity()?;
        Ok(())
    }

    /// Parsed minimum log severity
    pub fn severity(&self) -> Result<Severity, String> {
        Severity::parse(&self.log_level)
            .ok_or_else(|| format!("Invalid log_level: '{}'", self.log_level))
    }
}
