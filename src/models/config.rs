//! Configuration model.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// FFmpeg invocation settings.
    pub ffmpeg: FfmpegConfig,
    /// Job queue settings.
    pub queue: QueueConfig,
}

/// FFmpeg configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FfmpegConfig {
    /// Program to run (looked up on PATH unless absolute).
    pub program: PathBuf,
    /// Thread count hint; `None` uses every available core.
    pub threads: Option<usize>,
    /// Extension accepted as conversion input.
    pub source_extension: String,
    /// Extension of the produced container.
    pub target_extension: String,
    /// Pass `-y` so existing outputs are replaced.
    pub overwrite: bool,
}

/// Job queue configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QueueConfig {
    /// Seconds to wait for queued work during shutdown.
    pub shutdown_grace_secs: u64,
}

impl Default for FfmpegConfig {
    fn default() -> Self {
        Self {
            program: PathBuf::from("ffmpeg"),
            threads: None,
            source_extension: "ts".to_string(),
            target_extension: "mp4".to_string(),
            overwrite: false,
        }
    }
}

impl FfmpegConfig {
    /// Thread count applied to every threading flag.
    pub fn thread_count(&self) -> usize {
        self.threads.unwrap_or_else(available_threads)
    }
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            shutdown_grace_secs: 60,
        }
    }
}

impl QueueConfig {
    /// Grace period as a duration.
    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_secs(self.shutdown_grace_secs)
    }
}

/// Number of processing units available to this process.
pub fn available_threads() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

/// Get the configuration directory path.
fn dirs_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ts_converter")
}

/// Load configuration from the default location.
pub fn load_config() -> Config {
    load_config_from(&dirs_config_path().join("config.toml"))
}

/// Load configuration from a file, falling back to defaults.
pub fn load_config_from(config_path: &Path) -> Config {
    if config_path.exists() {
        match parse_config_file(config_path) {
            Ok(config) => return config,
            Err(e) => {
                tracing::warn!("Ignoring config {}: {}", config_path.display(), e);
            }
        }
    }

    Config::default()
}

fn parse_config_file(path: &Path) -> crate::Result<Config> {
    let content = std::fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}
