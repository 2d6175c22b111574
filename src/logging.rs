//! Logging setup
//!
//! In debug mode everything at `debug` and above goes to a daily-rolling file
//! under the log directory. Otherwise a configured log file receives the
//! configured level, and without one only warnings reach stderr so the
//! terminal UI stays readable.

use crate::config::LoggingConfig;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

/// File name prefix of the rolling debug logs
pub const LOG_FILE_PREFIX: &str = "neighborhub.log";

#[derive(Debug, Clone)]
pub struct LogConfig {
    debug_mode: bool,
    log_dir: PathBuf,
    level: String,
    log_file: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl LogConfig {
    pub fn new() -> Self {
        Self {
            debug_mode: false,
            log_dir: default_log_dir(),
            level: "info".to_string(),
            log_file: None,
        }
    }

    pub fn with_debug_mode(mut self, debug: bool) -> Self {
        self.debug_mode = debug;
        self
    }

    pub fn with_log_dir(mut self, dir: PathBuf) -> Self {
        self.log_dir = dir;
        self
    }

    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = level.into();
        self
    }

    pub fn with_log_file(mut self, file: Option<PathBuf>) -> Self {
        self.log_file = file;
        self
    }

    /// Take level and file from the `[logging]` config section
    pub fn with_settings(self, settings: &LoggingConfig) -> Self {
        self.with_level(settings.level.clone())
            .with_log_file(settings.file.clone())
    }

    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }

    /// Filter directive used when `RUST_LOG` is not set
    fn default_directive(&self) -> String {
        if self.debug_mode {
            "neighborhub=debug".to_string()
        } else if self.log_file.is_some() {
            format!("neighborhub={}", self.level)
        } else {
            "warn".to_string()
        }
    }
}

/// `~/.neighborhub/logs`
pub fn default_log_dir() -> PathBuf {
    crate::config::neighborhub_home().join("logs")
}

/// Install the global subscriber.
///
/// Keep the returned guard alive for the life of the program; dropping it
/// flushes and stops the background writer.
pub fn init_logging(config: LogConfig) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.default_directive()));

    let appender = if config.debug_mode {
        std::fs::create_dir_all(&config.log_dir)
            .with_context(|| format!("Failed to create log directory: {:?}", config.log_dir))?;
        Some(tracing_appender::rolling::daily(&config.log_dir, LOG_FILE_PREFIX))
    } else if let Some(file) = &config.log_file {
        let dir = file.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."));
        let name = file
            .file_name()
            .with_context(|| format!("Log file has no file name: {:?}", file))?;
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create log directory: {:?}", dir))?;
        Some(tracing_appender::rolling::never(dir, name))
    } else {
        None
    };

    match appender {
        Some(appender) => {
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::registry()
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_target(true)
                        .with_writer(writer)
                        .with_ansi(false),
                )
                .with(filter)
                .try_init()
                .context("A global subscriber is already installed")?;
            tracing::debug!(dir = ?config.log_dir, "File logging initialized");
            Ok(Some(guard))
        }
        None => {
            tracing_subscriber::registry()
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .with(filter)
                .try_init()
                .context("A global subscriber is already installed")?;
            Ok(None)
        }
    }
}

/// Delete rolling log files in `dir` older than `max_age_days`. Returns how many were removed.
pub fn cleanup_old_logs(dir: &Path, max_age_days: u64) -> std::io::Result<usize> {
    if !dir.exists() {
        return Ok(0);
    }

    let max_age = Duration::from_secs(max_age_days * 24 * 60 * 60);
    let now = SystemTime::now();
    let mut removed = 0;

    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        let is_log = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with(LOG_FILE_PREFIX));
        if !is_log || !path.is_file() {
            continue;
        }

        let modified = entry.metadata()?.modified()?;
        let age = now.duration_since(modified).unwrap_or_default();
        if age > max_age {
            std::fs::remove_file(&path)?;
            removed += 1;
        }
    }

    Ok(removed)
}
