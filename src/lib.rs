//! Deskwatch - desktop folder monitoring check
//!
//! Counts visible entries in a watched directory each poll cycle, submits a
//! gauge metric, and emits a log record when the count changes or a
//! heartbeat interval elapses.

pub mod check;
pub mod collector;
pub mod config;
pub mod emission;
pub mod host;
pub mod metrics;
pub mod notifier;
pub mod severity;
pub mod state;

pub use check::{run_cycle, CheckOutcome};
pub use collector::{count_visible_entries, desktop_path, COUNT_UNAVAILABLE};
pub use config::Config;
pub use emission::{EmissionLog, EmissionRecord, LogFormat};
pub use metrics::{MetricsSink, StatsdSink, TracingSink};
pub use notifier::{decide, Decision, EmitReason, DEFAULT_HEARTBEAT_SECS};
pub use severity::{Severity, SeverityRule};
pub use state::{PollState, StateStore};
