use std::collections::HashMap;

use workflow_types::EventKind;

use crate::error::HistoryViolation;
use crate::log::RecordedEvent;

fn terminal_kind(kind: EventKind) -> bool {
    matches!(kind, EventKind::ItemCompleted | EventKind::ItemError)
}

/// The sequence number at which each item reached a state that lets the
/// engine advance past it: its first `item_completed` or `item_error`.
/// `user_action_required` does not count — the engine stays parked on that
/// item until a user action resolves it, so it is not "done" from an
/// ordering point of view.
fn advancing_sequence_by_item(events: &[RecordedEvent]) -> HashMap<&str, u64> {
    let mut result = HashMap::new();
    for event in events {
        if let Some(item_id) = &event.item_id {
            if terminal_kind(event.kind) {
                result.entry(item_id.as_str()).or_insert(event.sequence);
            }
        }
    }
    result
}

fn first_started_sequence_by_item(events: &[RecordedEvent]) -> HashMap<&str, u64> {
    let mut result = HashMap::new();
    for event in events {
        if event.kind == EventKind::ItemStarted {
            if let Some(item_id) = &event.item_id {
                result.entry(item_id.as_str()).or_insert(event.sequence);
            }
        }
    }
    result
}

/// Cross-item ordering and splice correctness: for every pair of
/// consecutive ids in the observed `item_order` (the timeline order *after*
/// any splices have happened, since splice correctness is exactly this
/// property applied to the post-splice order), the second id's
/// `item_started` must not occur before the first id's advancing event.
///
/// Pairs where either id never reaches a recorded state are silently
/// skipped — nothing to compare yet, not a violation (e.g. a run stopped
/// or still in progress).
pub fn check_cross_item_order(events: &[RecordedEvent], item_order: &[String]) -> Vec<HistoryViolation> {
    let advancing = advancing_sequence_by_item(events);
    let started = first_started_sequence_by_item(events);
    let mut violations = Vec::new();
    for pair in item_order.windows(2) {
        let [current, next] = pair else { continue };
        let (Some(&current_done), Some(&next_started)) =
            (advancing.get(current.as_str()), started.get(next.as_str()))
        else {
            continue;
        };
        if next_started < current_done {
            violations.push(HistoryViolation::ItemOutOfOrder {
                item_id: next.clone(),
                expected_after: current.clone(),
            });
        }
    }
    violations
}

/// `item_started(X)` strictly precedes any `item_progress(X, ...)` which
/// strictly precedes the terminal event of `X`: every `item_progress` for
/// an item falls strictly between that item's
/// `item_started` and its first terminal-or-pausing event (`item_completed`,
/// `item_error`, or `user_action_required` — unlike `check_cross_item_order`
/// this bracket check does treat `user_action_required` as closing the
/// bracket, since no further progress should arrive once the item has
/// stopped executing to await a user).
pub fn check_progress_bracket(events: &[RecordedEvent]) -> Vec<HistoryViolation> {
    let started = first_started_sequence_by_item(events);
    let mut closed: HashMap<&str, u64> = HashMap::new();
    for event in events {
        if let Some(item_id) = &event.item_id {
            if matches!(
                event.kind,
                EventKind::ItemCompleted | EventKind::ItemError | EventKind::UserActionRequired
            ) {
                closed.entry(item_id.as_str()).or_insert(event.sequence);
            }
        }
    }

    let mut violations = Vec::new();
    for event in events {
        if event.kind != EventKind::ItemProgress {
            continue;
        }
        let Some(item_id) = &event.item_id else { continue };
        let after_start = started
            .get(item_id.as_str())
            .is_some_and(|&start| event.sequence > start);
        let before_close = closed
            .get(item_id.as_str())
            .is_none_or(|&close| event.sequence < close);
        if !after_start || !before_close {
            violations.push(HistoryViolation::ProgressOutOfBracket {
                item_id: item_id.clone(),
                sequence: event.sequence,
            });
        }
    }
    violations
}
