//! One poll cycle: measure, report, decide, persist
//!
//! Every failure in here degrades: an unreadable directory becomes the -1
//! sentinel, a failed gauge or log append is logged and the cycle continues,
//! and a failed state write is surfaced in the outcome without rolling back
//! the emission already produced (at-most-once persistence).

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::collector::{self, COUNT_UNAVAILABLE};
use crate::config::Config;
use crate::emission::{EmissionLog, EmissionRecord};
use crate::host;
use crate::metrics::MetricsSink;
use crate::notifier::{decide, Decision};
use crate::severity::Severity;
use crate::state::StateStore;

/// Summary of one completed cycle
#[derive(Debug, Clone, Serialize)]
pub struct CheckOutcome {
    pub host: String,
    pub desktop_path: String,
    pub observed_count: i64,
    pub status: Severity,
    pub emitted: bool,
    /// Reason line when an emission was produced
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Set when the post-emission state write failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_write_error: Option<String>,
}

/// Run one poll cycle at `now` (unix seconds)
pub fn run_cycle(config: &Config, sink: &dyn MetricsSink, now: i64) -> CheckOutcome {
    let host = host::hostname();
    let os = host::os_name();

    let desktop = config
        .desktop_path
        .clone()
        .or_else(collector::desktop_path);

    let observed = match &desktop {
        Some(path) => collector::count_visible_entries(path, &config.excluded_names),
        None => {
            warn!("No desktop directory could be resolved");
            COUNT_UNAVAILABLE
        }
    };

    let desktop_display = desktop
        .as_deref()
        .map(|p| p.display().to_string())
        .unwrap_or_default();

    let status = config.severity.classify(observed);

    let tags = vec![
        format!("os:{}", os),
        format!("status:{}", status),
        format!("script:{}", config.source),
    ];
    if let Err(e) = sink.gauge(&config.metric_name, observed as f64, &tags) {
        warn!(metric = %config.metric_name, error = %e, "Could not submit gauge");
    }

    let store = StateStore::new(&config.state_file);
    let previous = store.load();

    let decision = decide(observed, now, previous.as_ref(), config.heartbeat_secs);

    let (emitted, reason, state_write_error) = match decision {
        Decision::Skip => {
            debug!(count = observed, "No emission required this run");
            (false, None, None)
        }
        Decision::Emit { reason, next_state } => {
            let record = EmissionRecord::build(
                &host,
                now,
                &os,
                &config.source,
                observed,
                &desktop_display,
                status,
                &reason,
                config.heartbeat_secs,
            );

            let log = EmissionLog::new(&config.emission_log, config.log_format);
            if let Err(e) = log.append(&record) {
                warn!(path = %config.emission_log.display(), error = %e, "Could not append emission record");
            }
            info!(count = observed, status = %status, "{}", record.reason);

            // The emission stands even if this write fails; the next cycle
            // will re-detect the change against the stale state.
            let write_error = match store.save(&next_state) {
                Ok(()) => None,
                Err(e) => {
                    warn!(path = %config.state_file.display(), error = %e, "Could not write state file");
                    Some(e.to_string())
                }
            };

            (true, Some(record.reason), write_error)
        }
    };

    CheckOutcome {
        host,
        desktop_path: desktop_display,
        observed_count: observed,
        status,
        emitted,
        reason,
        state_write_error,
    }
}
