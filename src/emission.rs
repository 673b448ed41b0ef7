//! Emission records and the append-only emission log
//!
//! Each emitting cycle produces exactly one record. The log is an append
//! target, one record per line, in either JSONL or plain-text form. Records
//! are never read back by the check itself; `read_recent` exists for the
//! `status` command.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use crate::notifier::EmitReason;
use crate::severity::Severity;

/// One logged emission
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmissionRecord {
    /// Hostname the count was observed on
    pub comp_name: String,
    /// UTC datetime, `%Y-%m-%d %H:%M:%S`
    pub datetime: String,
    /// Unix timestamp of the cycle
    pub ts: i64,
    /// Friendly OS name
    pub os: String,
    /// Source identity of the check
    pub script: String,
    /// Observed count (-1 = measurement failed)
    pub file_count: i64,
    /// Delta from the previous count (0 on first run)
    pub file_count_change: i64,
    /// Directory that was counted
    pub desktop_path: String,
    /// Severity tier at this count
    pub status: Severity,
    /// Human-readable reason for the emission
    pub reason: String,
}

impl EmissionRecord {
    #[allow(clippy::too_many_arguments)]
    pub fn build(
        host: &str,
        now: i64,
        os: &str,
        script: &str,
        observed: i64,
        desktop_path: &str,
        status: Severity,
        reason: &EmitReason,
        heartbeat_secs: i64,
    ) -> Self {
        let datetime = chrono::DateTime::from_timestamp(now, 0)
            .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_default();

        Self {
            comp_name: host.to_string(),
            datetime,
            ts: now,
            os: os.to_string(),
            script: script.to_string(),
            file_count: observed,
            file_count_change: reason.delta(observed),
            desktop_path: desktop_path.to_string(),
            status,
            reason: reason.message(observed, host, heartbeat_secs),
        }
    }

    /// Plain-text rendering, one line
    pub fn render_line(&self) -> String {
        let mark = if self.status.is_elevated() { "!!" } else { "ok" };
        format!("{} {}: {} {}", self.datetime, self.status, mark, self.reason)
    }
}

/// On-disk layout of the emission log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// One JSON record per line
    Jsonl,
    /// One formatted text line per record
    Text,
}

/// Append-only emission log, caller-owned (no process-wide singleton)
pub struct EmissionLog {
    path: PathBuf,
    format: LogFormat,
}

impl EmissionLog {
    pub fn new(path: impl Into<PathBuf>, format: LogFormat) -> Self {
        Self {
            path: path.into(),
            format,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one record under an exclusive advisory lock
    pub fn append(&self, record: &EmissionRecord) -> Result<()> {
        use fs2::FileExt;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        file.lock_exclusive()?;
        let line = match self.format {
            LogFormat::Jsonl => serde_json::to_string(record)?,
            LogFormat::Text => record.render_line(),
        };
        let result = writeln!(file, "{}", line);
        file.unlock()?;
        result?;

        Ok(())
    }

    /// Read the last N records
    ///
    /// Only the JSONL layout can be parsed back; a text-format log yields an
    /// empty list. Unparseable lines are skipped.
    pub fn read_recent(&self, n: usize) -> Vec<EmissionRecord> {
        if self.format != LogFormat::Jsonl || !self.path.exists() {
            return Vec::new();
        }

        let file = match File::open(&self.path) {
            Ok(f) => f,
            Err(_) => return Vec::new(),
        };

        let records: Vec<EmissionRecord> = BufReader::new(file)
            .lines()
            .filter_map(|line| line.ok())
            .filter_map(|line| serde_json::from_str(&line).ok())
            .collect();

        let start = records.len().saturating_sub(n);
        records[start..].to_vec()
    }
}
