use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Scalar snapshot of engine-level flags and timestamps.
///
/// The timeline and execution history are intentionally not part of this
/// struct — they are returned by their own accessors (`Engine::get_timeline`,
/// `Engine::get_execution_history`) since they hold live item trait objects
/// that cannot be represented in a plain, serializable snapshot. `get_state`
/// stays a separate, cheaply-cloned scalar accessor rather than bundling
/// everything into one call.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EngineState {
    pub current_index: usize,
    pub timeline_len: usize,
    pub is_running: bool,
    pub is_paused: bool,
    pub is_complete: bool,
    pub is_cancelling: bool,
    pub error: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
}

impl Default for EngineState {
    fn default() -> Self {
        Self {
            current_index: 0,
            timeline_len: 0,
            is_running: false,
            is_paused: false,
            is_complete: false,
            is_cancelling: false,
            error: None,
            start_time: None,
            end_time: None,
        }
    }
}

impl EngineState {
    /// Idle: never started, or reset. The other engine-level states
    /// (Running, Paused, Cancelling, Stopped, Complete) are derived from the
    /// flag combination rather than stored as a separate enum.
    pub fn is_idle(&self) -> bool {
        !self.is_running
            && !self.is_paused
            && !self.is_complete
            && !self.is_cancelling
            && self.start_time.is_none()
    }

    /// Stopped: terminal, either errored, `stop()`'d, or `cancel()`'d, and
    /// not the "all items processed" terminal state (`Complete`). Note that
    /// `is_cancelling` stays `true` after a cancel completes — it is a
    /// persistent marker that gates re-entry (idempotence), not a
    /// "currently cancelling" flag that clears once cancellation finishes.
    pub fn is_stopped(&self) -> bool {
        !self.is_running && !self.is_paused && !self.is_complete && self.end_time.is_some()
    }
}
