//! Check configuration
//!
//! Loaded from `~/.config/deskwatch/config.json`. Every field has a default,
//! so a missing file means default behavior and a partial file only overrides
//! what it names. A corrupt file degrades to defaults with a warning rather
//! than failing the cycle.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::emission::LogFormat;
use crate::notifier::DEFAULT_HEARTBEAT_SECS;
use crate::severity::SeverityRule;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Directory to count; `None` resolves the user's Desktop at runtime
    pub desktop_path: Option<PathBuf>,
    /// Literal entry names to exclude, case-insensitive
    pub excluded_names: Vec<String>,
    /// Heartbeat interval in seconds
    pub heartbeat_secs: i64,
    /// Severity tier mapping
    pub severity: SeverityRule,
    /// Emission log location
    pub emission_log: PathBuf,
    /// Emission log layout
    pub log_format: LogFormat,
    /// Poll state file location
    pub state_file: PathBuf,
    /// Gauge metric name
    pub metric_name: String,
    /// DogStatsD endpoint; `None` logs gauges instead of sending
    pub statsd_addr: Option<String>,
    /// Source identity reported in records and tags
    pub source: String,
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = Self::data_dir();
        Self {
            desktop_path: None,
            excluded_names: vec!["Thumbs.db".to_string()],
            heartbeat_secs: DEFAULT_HEARTBEAT_SECS,
            severity: SeverityRule::default(),
            emission_log: data_dir.join("emissions.log"),
            log_format: LogFormat::Jsonl,
            state_file: data_dir.join("state.json"),
            metric_name: "deskwatch.desktop.file_count".to_string(),
            statsd_addr: Some("127.0.0.1:8125".to_string()),
            source: "deskwatch".to_string(),
        }
    }
}

impl Config {
    /// Data directory for state and logs
    pub fn data_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("deskwatch")
    }

    /// Default config file location
    pub fn default_path() -> PathBuf {
        Self::data_dir().join("config.json")
    }

    /// Load the config file at `path`, or defaults when it does not exist
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match Self::load_from(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Could not load config, using defaults");
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading config from {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("parsing config from {}", path.display()))
    }
}
