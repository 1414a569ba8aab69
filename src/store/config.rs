//! Store configuration
//!
//! Loaded from a JSON file:
//!
//! ```json
//! {
//!   "path": "./data/app.db",
//!   "fast_bulk_insert": false,
//!   "busy_timeout_ms": 5000,
//!   "log_level": "warn"
//! }
//! ```
//!
//! Only `path` is required.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::observability::{Logger, Severity};

use super::errors::{StoreError, StoreResult};

/// Configuration of a [`Store`](super::Store)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Database file (required)
    pub path: PathBuf,

    /// Default for `fast_mode` in batch inserts (optional, default false)
    #[serde(default)]
    pub fast_bulk_insert: bool,

    /// How long a connection waits on a locked database (optional)
    #[serde(default)]
    pub busy_timeout_ms: Option<u64>,

    /// Minimum severity logged (optional, default "warn")
    #[serde(default = "default_log_level")]
    pub log_level: Severity,
}

fn default_log_level() -> Severity {
    Severity::Warn
}

impl StoreConfig {
    /// Config for `path` with every optional setting at its default
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            fast_bulk_insert: false,
            busy_timeout_ms: None,
            log_level: default_log_level(),
        }
    }

    /// Load configuration from file
    pub fn load(path: &Path) -> StoreResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| StoreError::Config(format!("Failed to read config: {}", e)))?;
        Self::from_json(&content)
    }

    /// Parse configuration from JSON text
    pub fn from_json(content: &str) -> StoreResult<Self> {
        let config: StoreConfig = serde_json::from_str(content)
            .map_err(|e| StoreError::Config(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> StoreResult<()> {
        if self.path.as_os_str().is_empty() {
            return Err(StoreError::Config("path must not be empty".into()));
        }
        if self.busy_timeout_ms == Some(0) {
            return Err(StoreError::Config("busy_timeout_ms must be > 0".into()));
        }
        Ok(())
    }

    pub fn busy_timeout(&self) -> Option<Duration> {
        self.busy_timeout_ms.map(Duration::from_millis)
    }

    /// Applies `log_level` to the process logger
    pub fn apply_logging(&self) {
        Logger::set_min_severity(self.log_level);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_minimal_config() {
        let config = StoreConfig::from_json(r#"{ "path": "app.db" }"#).unwrap();
        assert_eq!(config, StoreConfig::new("app.db"));
        assert_eq!(config.log_level, Severity::Warn);
        assert!(config.busy_timeout().is_none());
    }

    #[test]
    fn test_full_config() {
        let config = StoreConfig::from_json(
            r#"{
                "path": "/var/lib/app.db",
                "fast_bulk_insert": true,
                "busy_timeout_ms": 250,
                "log_level": "trace"
            }"#,
        )
        .unwrap();
        assert!(config.fast_bulk_insert);
        assert_eq!(config.busy_timeout(), Some(Duration::from_millis(250)));
        assert_eq!(config.log_level, Severity::Trace);
    }

    #[test]
    fn test_invalid_config() {
        assert!(StoreConfig::from_json("{}").is_err());
        assert!(StoreConfig::from_json(r#"{ "path": "" }"#).is_err());
        assert!(StoreConfig::from_json(r#"{ "path": "a", "busy_timeout_ms": 0 }"#).is_err());
        assert!(StoreConfig::from_json(r#"{ "path": "a", "log_level": "loud" }"#).is_err());
    }

    #[test]
    fn test_load_from_file() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("tablemap.json");
        fs::write(&file, r#"{ "path": "x.db", "fast_bulk_insert": true }"#).unwrap();

        let config = StoreConfig::load(&file).unwrap();
        assert!(config.fast_bulk_insert);

        let missing = StoreConfig::load(&tmp.path().join("missing.json"));
        assert!(matches!(missing, Err(StoreError::Config(_))));
    }
}
