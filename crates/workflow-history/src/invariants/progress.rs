use workflow_types::EventKind;

use crate::error::HistoryViolation;
use crate::log::RecordedEvent;

/// Progress guard: once an item has emitted `item_error` or
/// `user_action_required`, no later `item_progress` for that same item
/// should appear in the recording. On the live engine this is enforced by
/// `emit_progress`'s guard refusing to even emit the event — seeing one
/// here means a caller's `HistoryPort`/recorder observed a progress event
/// the guard should have suppressed.
pub fn check_progress_guard(events: &[RecordedEvent]) -> Vec<HistoryViolation> {
    let mut guarded: std::collections::HashSet<&str> = std::collections::HashSet::new();
    let mut violations = Vec::new();
    for event in events {
        let Some(item_id) = &event.item_id else { continue };
        match event.kind {
            EventKind::ItemError | EventKind::UserActionRequired => {
                guarded.insert(item_id.as_str());
            }
            EventKind::ItemProgress if guarded.contains(item_id.as_str()) => {
                violations.push(HistoryViolation::ProgressGuardViolated {
                    item_id: item_id.clone(),
                    sequence: event.sequence,
                });
            }
            _ => {}
        }
    }
    violations
}

/// Cancel idempotence, the emitted-effect half — the call-twice-is-a-no-op
/// half is an engine-level property asserted directly in the engine's own
/// test suite, not recoverable from a flat event log: at most one
/// `cancelled` event appears in a recorded run.
pub fn check_cancelled_emitted_once(events: &[RecordedEvent]) -> Vec<HistoryViolation> {
    let mut cancelled_sequences = events
        .iter()
        .filter(|event| event.kind == EventKind::Cancelled)
        .map(|event| event.sequence);
    let Some(first) = cancelled_sequences.next() else {
        return Vec::new();
    };
    cancelled_sequences
        .map(|second| HistoryViolation::CancelledEmittedTwice {
            first_sequence: first,
            second_sequence: second,
        })
        .collect()
}

/// Progress monotonicity: a sequence of `getProgress()` samples taken over
/// the course of a successful run never decreases.
pub fn check_progress_monotonic(samples: &[f64]) -> Vec<HistoryViolation> {
    samples
        .windows(2)
        .filter(|pair| pair[1] < pair[0])
        .map(|pair| HistoryViolation::ProgressDecreased {
            from: pair[0],
            to: pair[1],
        })
        .collect()
}
