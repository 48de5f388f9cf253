//! Analyzer settings and their on-disk format
//!
//! Settings are stored as RON or JSON, chosen by file extension.

use crate::error::{CoreError, Result};
use crate::filter::FilterConfig;
use crate::logging::LogConfig;
use crate::signal::{DURATION, SAMPLE_RATE};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Maximum accepted settings file size (1 MB)
pub const MAX_SETTINGS_FILE_SIZE: u64 = 1024 * 1024;

/// Top-level analyzer settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalyzerSettings {
    /// Synthesis sample rate in Hz
    pub sample_rate: u32,
    /// Synthesis duration in seconds
    pub duration: f64,
    /// Filter stage selection
    pub filters: FilterConfig,
    /// Logging
    pub log: LogConfig,
}

impl Default for AnalyzerSettings {
    fn default() -> Self {
        Self {
            sample_rate: SAMPLE_RATE,
            duration: DURATION,
            filters: FilterConfig::default(),
            log: LogConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SettingsFormat {
    Json,
    Ron,
}

fn format_for(path: &Path) -> Result<SettingsFormat> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("ron");
    match extension {
        "json" => Ok(SettingsFormat::Json),
        "ron" => Ok(SettingsFormat::Ron),
        other => Err(CoreError::UnsupportedFormat(other.to_string())),
    }
}

impl AnalyzerSettings {
    /// Load settings from a `.ron` or `.json` file
    pub fn load(path: &Path) -> Result<Self> {
        Self::load_with_limit(path, MAX_SETTINGS_FILE_SIZE)
    }

    fn load_with_limit(path: &Path, limit: u64) -> Result<Self> {
        let format = format_for(path)?;
        let size = fs::metadata(path)?.len();
        if size > limit {
            return Err(CoreError::FileTooLarge { size, limit });
        }

        let content = fs::read_to_string(path)?;
        let settings = match format {
            SettingsFormat::Json => serde_json::from_str(&content)?,
            SettingsFormat::Ron => ron::from_str(&content)?,
        };
        debug!("Loaded settings from {:?}", path);
        Ok(settings)
    }

    /// Save settings, format chosen by extension
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = match format_for(path)? {
            SettingsFormat::Json => serde_json::to_string_pretty(self)?,
            SettingsFormat::Ron => {
                ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?
            }
        };
        fs::write(path, content)?;
        debug!("Saved settings to {:?}", path);
        Ok(())
    }
}
