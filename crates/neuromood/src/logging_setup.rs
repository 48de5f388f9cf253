//! Subscriber setup for the CLI
//!
//! Reports go to stdout, so console logging is pinned to stderr.

use anyhow::{Context, Result};
use neuromood_core::LogConfig;
use std::fs::File;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    filter::EnvFilter, fmt, layer::SubscriberExt, registry::Registry, util::SubscriberInitExt,
    Layer,
};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Flushes the file writer when dropped; hold it until `main` returns
pub struct LogGuard {
    _guard: WorkerGuard,
}

/// `RUST_LOG` wins over `config.level`
fn level_filter(config: &LogConfig) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(config.parse_level().into())
        .from_env_lossy()
}

fn console_layer(config: &LogConfig) -> BoxedLayer {
    fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(level_filter(config))
        .boxed()
}

fn file_layer(config: &LogConfig) -> Result<(BoxedLayer, LogGuard)> {
    config
        .ensure_log_directory()
        .with_context(|| format!("Failed to create directory for {:?}", config.log_path))?;
    let file = File::create(&config.log_path)
        .with_context(|| format!("Failed to create log file: {:?}", config.log_path))?;

    let (writer, guard) = tracing_appender::non_blocking(file);
    let layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_filter(level_filter(config))
        .boxed();
    Ok((layer, LogGuard { _guard: guard }))
}

/// Install the global subscriber described by `config`
pub fn init(config: &LogConfig) -> Result<Option<LogGuard>> {
    let mut layers: Vec<BoxedLayer> = Vec::new();
    if config.console_output {
        layers.push(console_layer(config));
    }

    let guard = if config.file_output {
        let (layer, guard) = file_layer(config)?;
        layers.push(layer);
        Some(guard)
    } else {
        None
    };

    tracing_subscriber::registry().with(layers).init();

    tracing::debug!(
        "Logging at '{}' (console={}, file={})",
        config.level,
        config.console_output,
        config.file_output
    );
    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_layer_creates_nested_log_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = LogConfig {
            file_output: true,
            log_path: dir.path().join("logs").join("neuromood.log"),
            ..Default::default()
        };
        let (_layer, _guard) = file_layer(&config).unwrap();
        assert!(config.log_path.is_file());
    }

    #[test]
    fn test_file_layer_reports_bad_path() {
        let dir = tempfile::tempdir().unwrap();
        // A directory where the file should be
        let config = LogConfig {
            file_output: true,
            log_path: dir.path().to_path_buf(),
            ..Default::default()
        };
        assert!(file_layer(&config).is_err());
    }
}
