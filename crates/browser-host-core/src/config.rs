//! Configuration types for the dispatch host.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::Error;

/// Host configuration loaded from a YAML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// Emit debug-level traces for session lifecycle events
    /// (after-created, before-close)
    pub trace_lifecycle: bool,

    /// Device scale factor reported when a session carries no render
    /// delegate
    pub default_scale_factor: f64,

    /// Maximum number of concurrently tracked sessions (0 = unlimited)
    pub max_sessions: usize,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            trace_lifecycle: false,
            default_scale_factor: 1.0,
            max_sessions: 0,
        }
    }
}

impl HostConfig {
    /// Load configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> crate::Result<Self> {
        let config: HostConfig =
            serde_yaml::from_str(yaml).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> crate::Result<()> {
        if self.default_scale_factor <= 0.0 {
            return Err(Error::Config(
                "default_scale_factor must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}
