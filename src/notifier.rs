//! Change-or-heartbeat decision core
//!
//! One decision per poll cycle: emit a record because the observed count
//! changed, emit because the heartbeat interval elapsed with no change, or
//! skip. The decision is a pure function of its inputs; persistence and
//! record construction happen elsewhere.

use crate::state::PollState;

/// Default heartbeat interval: 12 hours
pub const DEFAULT_HEARTBEAT_SECS: i64 = 43_200;

/// Why an emission was produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmitReason {
    /// Observed count differs from the previous cycle (or there was no previous cycle)
    Changed { previous: Option<i64> },
    /// Count unchanged, but more than the heartbeat interval passed since the last emission
    Heartbeat,
}

impl EmitReason {
    /// Human-readable reason line for the emission record
    pub fn message(&self, observed: i64, host: &str, heartbeat_secs: i64) -> String {
        match self {
            EmitReason::Changed { previous } => {
                let prev = previous
                    .map(|c| c.to_string())
                    .unwrap_or_else(|| "unset".to_string());
                format!("File count changed: {} -> {} on {}", prev, observed, host)
            }
            EmitReason::Heartbeat => {
                let hours = heartbeat_secs / 3600;
                format!(
                    "No change, but {}h passed since last log. {} was alive.",
                    hours, host
                )
            }
        }
    }

    /// Delta from the previous count; a first run deltas against itself (zero)
    pub fn delta(&self, observed: i64) -> i64 {
        match self {
            EmitReason::Changed {
                previous: Some(prev),
            } => observed - prev,
            _ => 0,
        }
    }
}

/// Outcome of one poll cycle's decision
#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
    /// Nothing to emit; state stays untouched
    Skip,
    /// Emit one record, then attempt to persist `next_state`
    Emit {
        reason: EmitReason,
        next_state: PollState,
    },
}

impl Decision {
    pub fn is_emit(&self) -> bool {
        matches!(self, Decision::Emit { .. })
    }
}

/// Decide whether this cycle emits
///
/// Change wins over staleness: an absent previous state counts as changed,
/// so the heartbeat branch is only reached with a real prior state. The
/// staleness comparison is strict (`> heartbeat_secs`, not `>=`).
pub fn decide(
    observed: i64,
    now: i64,
    previous: Option<&PollState>,
    heartbeat_secs: i64,
) -> Decision {
    let (last_count, last_logged) = match previous {
        Some(state) => (state.last_count, state.last_logged),
        None => (None, 0),
    };

    let changed = last_count != Some(observed);
    let stale = now - last_logged > heartbeat_secs;

    if !changed && !stale {
        return Decision::Skip;
    }

    let reason = if changed {
        EmitReason::Changed {
            previous: last_count,
        }
    } else {
        EmitReason::Heartbeat
    };

    Decision::Emit {
        reason,
        next_state: PollState {
            last_count: Some(observed),
            last_logged: now,
        },
    }
}
