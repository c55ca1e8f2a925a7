use std::collections::HashMap;

use workflow_types::{EventKind, ItemStatus, TimelineItemSnapshot};

use crate::error::HistoryViolation;
use crate::log::RecordedEvent;

/// The item-state machine's allowed edges: `pending -> active -> {complete |
/// error | user_action_required | cancelled}`, `user_action_required ->
/// {complete | skipped | cancelled | error}`, any non-terminal -> `skipped`
/// via `skipItem`, any non-terminal -> `cancelled` via engine cancel. No
/// edge ever starts from a terminal status — that is what "monotonic" means
/// here.
const ALLOWED_TRANSITIONS: &[(ItemStatus, ItemStatus)] = &[
    (ItemStatus::Pending, ItemStatus::Active),
    (ItemStatus::Pending, ItemStatus::Skipped),
    (ItemStatus::Pending, ItemStatus::Cancelled),
    (ItemStatus::Active, ItemStatus::Complete),
    (ItemStatus::Active, ItemStatus::Error),
    (ItemStatus::Active, ItemStatus::UserActionRequired),
    (ItemStatus::Active, ItemStatus::Cancelled),
    (ItemStatus::Active, ItemStatus::Skipped),
    (ItemStatus::UserActionRequired, ItemStatus::Complete),
    (ItemStatus::UserActionRequired, ItemStatus::Skipped),
    (ItemStatus::UserActionRequired, ItemStatus::Cancelled),
    (ItemStatus::UserActionRequired, ItemStatus::Error),
];

fn is_allowed(from: ItemStatus, to: ItemStatus) -> bool {
    ALLOWED_TRANSITIONS.iter().any(|(f, t)| *f == from && *t == to)
}

/// Status monotonicity: every consecutive pair of statuses observed for the
/// same item, in recording order, is an edge of the item-state machine.
/// Events without an attached `status` (the recorder's choice, see
/// `RecordedEvent`) are skipped rather than treated as a gap.
pub fn check_transition_sequence(events: &[RecordedEvent]) -> Vec<HistoryViolation> {
    let mut last_status: HashMap<&str, ItemStatus> = HashMap::new();
    let mut violations = Vec::new();
    for event in events {
        let (Some(item_id), Some(status)) = (&event.item_id, event.status) else {
            continue;
        };
        if let Some(&previous) = last_status.get(item_id.as_str()) {
            if previous != status && !is_allowed(previous, status) {
                violations.push(HistoryViolation::InvalidTransition {
                    item_id: item_id.clone(),
                    from: previous,
                    to: status,
                });
            }
        }
        last_status.insert(item_id.as_str(), status);
    }
    violations
}

/// End-time stamping: every item whose final observed status is terminal
/// has an `end_time`, and it is not earlier than `start_time` when both are
/// set.
pub fn check_end_time_stamping(timeline: &[TimelineItemSnapshot]) -> Vec<HistoryViolation> {
    timeline
        .iter()
        .filter(|item| item.status.is_terminal())
        .filter_map(|item| match (item.start_time, item.end_time) {
            (_, None) => Some(HistoryViolation::MissingOrInvalidEndTime {
                item_id: item.id.clone(),
            }),
            (Some(start), Some(end)) if end < start => Some(HistoryViolation::MissingOrInvalidEndTime {
                item_id: item.id.clone(),
            }),
            _ => None,
        })
        .collect()
}

/// True when `kind` is one that can carry a meaningful `status` field —
/// exported mainly so recorders building a `RecordedEvent` log know which
/// event kinds are worth attaching a status to.
pub fn carries_item_status(kind: EventKind) -> bool {
    matches!(
        kind,
        EventKind::ItemStarted
            | EventKind::ItemCompleted
            | EventKind::ItemError
            | EventKind::UserActionRequired
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(id: &str, status: ItemStatus, start: Option<chrono::DateTime<chrono::Utc>>, end: Option<chrono::DateTime<chrono::Utc>>) -> TimelineItemSnapshot {
        TimelineItemSnapshot {
            id: id.to_string(),
            title: String::new(),
            description: String::new(),
            status,
            start_time: start,
            end_time: end,
        }
    }

    #[test]
    fn pending_to_active_to_complete_is_allowed() {
        let events = vec![
            RecordedEvent::new(0, EventKind::ItemStarted, Some("a".into()), Some(ItemStatus::Active)),
            RecordedEvent::new(1, EventKind::ItemCompleted, Some("a".into()), Some(ItemStatus::Complete)),
        ];
        assert!(check_transition_sequence(&events).is_empty());
    }

    #[test]
    fn complete_to_active_is_rejected() {
        let events = vec![
            RecordedEvent::new(0, EventKind::ItemCompleted, Some("a".into()), Some(ItemStatus::Complete)),
            RecordedEvent::new(1, EventKind::ItemStarted, Some("a".into()), Some(ItemStatus::Active)),
        ];
        let violations = check_transition_sequence(&events);
        assert_eq!(violations.len(), 1);
        assert!(matches!(violations[0], HistoryViolation::InvalidTransition { .. }));
    }

    #[test]
    fn terminal_without_end_time_is_flagged() {
        let timeline = vec![snapshot("a", ItemStatus::Complete, None, None)];
        let violations = check_end_time_stamping(&timeline);
        assert_eq!(violations.len(), 1);
    }

    #[test]
    fn end_before_start_is_flagged() {
        let now = chrono::Utc::now();
        let earlier = now - chrono::Duration::seconds(5);
        let timeline = vec![snapshot("a", ItemStatus::Complete, Some(now), Some(earlier))];
        let violations = check_end_time_stamping(&timeline);
        assert_eq!(violations.len(), 1);
    }

    #[test]
    fn pending_item_is_not_flagged() {
        let timeline = vec![snapshot("a", ItemStatus::Pending, None, None)];
        assert!(check_end_time_stamping(&timeline).is_empty());
    }
}
