//! Validators for this engine's run-level correctness properties, split
//! into sub-modules each exposing plain `check_*` functions over a recorded
//! log rather than one god-function:
//! - [`structural`]: item-status monotonicity and end-time stamping,
//!   checked against a `TimelineItemSnapshot` slice plus (for monotonicity)
//!   a recorded transition log.
//! - [`ordering`]: cross-item and intra-item event ordering, checked
//!   against a `RecordedEvent` log.
//! - [`progress`]: the progress guard, cancel idempotence, and progress
//!   monotonicity/exclusion.
//!
//! "Placeholder exists before `item_started` fires" is deliberately not a
//! log-replay check here: it is a statement about what
//! `Engine::get_execution_history()` returns *at the instant* an
//! `item_started` handler runs, which only the live engine can observe —
//! `workflow-engine`'s own test suite asserts it directly against a running
//! `Engine` rather than this crate's batch replay.

pub mod ordering;
pub mod progress;
pub mod structural;

use crate::error::HistoryViolation;
use crate::log::RecordedEvent;
use workflow_types::TimelineItemSnapshot;

/// Run every check group over a recorded run and collect all violations
/// rather than stopping at the first failure — useful for diagnosing a
/// suspicious recording where more than one property might be broken at
/// once.
pub fn validate_run(
    timeline: &[TimelineItemSnapshot],
    transitions: &[RecordedEvent],
    item_order: &[String],
) -> Vec<HistoryViolation> {
    let mut violations = Vec::new();
    violations.extend(structural::check_end_time_stamping(timeline));
    violations.extend(structural::check_transition_sequence(transitions));
    violations.extend(ordering::check_cross_item_order(transitions, item_order));
    violations.extend(ordering::check_progress_bracket(transitions));
    violations.extend(progress::check_progress_guard(transitions));
    violations.extend(progress::check_cancelled_emitted_once(transitions));
    violations
}
