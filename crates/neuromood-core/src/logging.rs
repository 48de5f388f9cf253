//! Logging configuration
//!
//! The library only emits `tracing` events; installing a subscriber is left
//! to the binary. This struct carries the settings it needs.

use serde::{Deserialize, Serialize};
use std::io;
use std::path::PathBuf;
use tracing::Level;

/// Logging settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogConfig {
    /// Minimum level: trace, debug, info, warn or error
    pub level: String,
    /// Write to stderr
    pub console_output: bool,
    /// Write to `log_path`
    pub file_output: bool,
    /// Log file location
    pub log_path: PathBuf,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            console_output: true,
            file_output: false,
            log_path: PathBuf::from("neuromood.log"),
        }
    }
}

impl LogConfig {
    /// Parsed level, falling back to INFO for unknown strings
    pub fn parse_level(&self) -> Level {
        self.level.trim().parse().unwrap_or(Level::INFO)
    }

    /// Create the parent directory of `log_path` if it is missing
    pub fn ensure_log_directory(&self) -> io::Result<()> {
        match self.log_path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => std::fs::create_dir_all(dir),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level() {
        let mut config = LogConfig::default();
        assert_eq!(config.parse_level(), Level::INFO);
        config.level = "DEBUG".to_string();
        assert_eq!(config.parse_level(), Level::DEBUG);
        config.level = "loud".to_string();
        assert_eq!(config.parse_level(), Level::INFO);
    }

    #[test]
    fn test_ensure_log_directory() {
        let dir = tempfile::tempdir().unwrap();
        let config = LogConfig {
            log_path: dir.path().join("logs").join("run.log"),
            ..Default::default()
        };
        config.ensure_log_directory().unwrap();
        assert!(dir.path().join("logs").is_dir());

        // Bare file name has no directory to create
        LogConfig::default().ensure_log_directory().unwrap();
    }
}
