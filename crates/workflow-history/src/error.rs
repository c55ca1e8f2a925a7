use workflow_types::ItemStatus;

/// Describes a specific violation discovered by replaying a recorded run
/// through the invariant checkers in `invariants/`. Grouped into
/// `structural` (item-state machine and end-time checks), `ordering`
/// (event-sequence checks) and `progress` (progress-guard, cancel
/// idempotence, and monotonicity checks).
#[derive(Clone, Debug, PartialEq)]
pub enum HistoryViolation {
    /// An item's observed status sequence took a transition the item-state
    /// machine does not allow.
    InvalidTransition {
        item_id: String,
        from: ItemStatus,
        to: ItemStatus,
    },
    /// A terminal item has no `end_time`, or `end_time` is earlier than its
    /// `start_time`.
    MissingOrInvalidEndTime { item_id: String },
    /// An event concerning the item at timeline position `i+1` was observed
    /// before the terminal event of the item at position `i`.
    ItemOutOfOrder {
        item_id: String,
        expected_after: String,
    },
    /// An `item_progress` event for an item was observed before that item's
    /// `item_started`, or after its terminal event.
    ProgressOutOfBracket { item_id: String, sequence: u64 },
    /// A `item_progress` event was observed for an item after that item had
    /// already reached `error` or `user_action_required` — the live
    /// engine's `emit_progress` guard should have suppressed the emission
    /// entirely, so seeing one here means the guard did not hold.
    ProgressGuardViolated { item_id: String, sequence: u64 },
    /// More than one `cancelled` event was observed in a single recorded
    /// run.
    CancelledEmittedTwice { first_sequence: u64, second_sequence: u64 },
    /// `getProgress()` was observed to decrease between two consecutive
    /// samples.
    ProgressDecreased { from: f64, to: f64 },
}

impl std::fmt::Display for HistoryViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidTransition { item_id, from, to } => {
                write!(f, "item {item_id}: invalid transition {from} -> {to}")
            }
            Self::MissingOrInvalidEndTime { item_id } => {
                write!(f, "item {item_id}: terminal status missing a valid end_time")
            }
            Self::ItemOutOfOrder {
                item_id,
                expected_after,
            } => write!(
                f,
                "item {item_id} observed before {expected_after} reached a terminal state"
            ),
            Self::ProgressOutOfBracket { item_id, sequence } => write!(
                f,
                "item_progress for {item_id} at sequence {sequence} falls outside its started/terminal bracket"
            ),
            Self::ProgressGuardViolated { item_id, sequence } => write!(
                f,
                "item_progress for {item_id} at sequence {sequence} was emitted after a terminal-looking result"
            ),
            Self::CancelledEmittedTwice {
                first_sequence,
                second_sequence,
            } => write!(
                f,
                "cancelled emitted twice, at sequence {first_sequence} and {second_sequence}"
            ),
            Self::ProgressDecreased { from, to } => {
                write!(f, "progress decreased from {from} to {to}")
            }
        }
    }
}

/// Errors produced by `HistoryPort` implementations and by the projector's
/// callers. The engine treats a rejected write as non-fatal — it swallows
/// and logs this type rather than surfacing it to the caller.
#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    #[error("no history entry is being tracked for site {site_id}")]
    NotTracking { site_id: String },
    #[error("history entry not found: {id}")]
    EntryNotFound { id: String },
    #[error("history port write failed: {0}")]
    WriteFailed(String),
}
