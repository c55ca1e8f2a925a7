use crate::action::AppliedAction;
use crate::outcome::RecordedOutcome;

/// The engine's log entry for one executed item .
///
/// Appended when the item begins executing (with a placeholder result) and
/// mutated in place thereafter. Records outlive the timeline slot that
/// produced them: if the item is later removed from the timeline (e.g. by
/// `remove_item`), its record remains in `execution_history` untouched,
/// which is why `item_id`/`item_title` are snapshotted here rather than
/// looked up from the live timeline.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ExecutionRecord {
    pub item_id: String,
    pub item_title: String,
    pub result: RecordedOutcome,
    pub applied_actions: Vec<AppliedAction>,
    pub execution_time_ms: u64,
}

impl ExecutionRecord {
    pub fn placeholder(item_id: impl Into<String>, item_title: impl Into<String>) -> Self {
        Self {
            item_id: item_id.into(),
            item_title: item_title.into(),
            result: RecordedOutcome::placeholder(),
            applied_actions: Vec::new(),
            execution_time_ms: 0,
        }
    }
}
