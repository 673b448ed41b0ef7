//! Severity classification for emission records
//!
//! The severity tier determines how an emission is tagged and rendered:
//! - INFO: count within normal range
//! - WARNING: count elevated past the configured threshold
//! - ALERT: count past the alert threshold (tiered rule only)
//! - UNKNOWN: measurement failed (sentinel count -1), never compared numerically

use serde::{Deserialize, Serialize};

/// Severity tier for an emission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Info,
    Warning,
    Alert,
    Unknown,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "INFO",
            Severity::Warning => "WARNING",
            Severity::Alert => "ALERT",
            Severity::Unknown => "UNKNOWN",
        }
    }

    /// Whether this tier is elevated (used for the text-format line marker)
    pub fn is_elevated(&self) -> bool {
        matches!(self, Severity::Warning | Severity::Alert)
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Configurable mapping from an observed count to a severity tier
///
/// Two shapes are supported: a single warn-above threshold, and a
/// tiered warning/alert pair. A count of -1 always maps to UNKNOWN.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum SeverityRule {
    /// WARNING when count > threshold, INFO otherwise
    WarnAbove { threshold: i64 },
    /// INFO below `warning_at`, WARNING in [warning_at, alert_at), ALERT at or above `alert_at`
    Tiered { warning_at: i64, alert_at: i64 },
}

impl Default for SeverityRule {
    fn default() -> Self {
        SeverityRule::Tiered {
            warning_at: 10,
            alert_at: 15,
        }
    }
}

impl SeverityRule {
    /// Map an observed count to a severity tier
    pub fn classify(&self, count: i64) -> Severity {
        if count < 0 {
            return Severity::Unknown;
        }
        match self {
            SeverityRule::WarnAbove { threshold } => {
                if count > *threshold {
                    Severity::Warning
                } else {
                    Severity::Info
                }
            }
            SeverityRule::Tiered {
                warning_at,
                alert_at,
            } => {
                if count >= *alert_at {
                    Severity::Alert
                } else if count >= *warning_at {
                    Severity::Warning
                } else {
                    Severity::Info
                }
            }
        }
    }
}
