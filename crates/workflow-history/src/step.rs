use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use workflow_types::{ExecutionRecord, ItemStatus, RecordedOutcome, TimelineItemSnapshot};

/// A near-identity mapping of an item's live status into the history
/// projection, collapsing `user_action_required` into `active`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryStepStatus {
    Pending,
    Active,
    Complete,
    Error,
    Skipped,
    Cancelled,
}

impl From<ItemStatus> for HistoryStepStatus {
    fn from(status: ItemStatus) -> Self {
        match status {
            ItemStatus::Pending => Self::Pending,
            ItemStatus::Active | ItemStatus::UserActionRequired => Self::Active,
            ItemStatus::Complete => Self::Complete,
            ItemStatus::Error => Self::Error,
            ItemStatus::Skipped => Self::Skipped,
            ItemStatus::Cancelled => Self::Cancelled,
        }
    }
}

/// One derived entry in the history projection: `{id, title, summary,
/// startTime, endTime, status, error?}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistoryStep {
    pub id: String,
    pub title: String,
    pub summary: String,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub status: HistoryStepStatus,
    pub error: Option<String>,
}

/// A pure projection over an item's id and the `data` payload of its latest
/// recorded result, pluggable per workflow type — a strategy supplied by the
/// caller, not a switch inside the engine. Returning an empty string drops
/// the step from the projection.
pub type SummaryFn = Arc<dyn Fn(&str, Option<&Value>) -> String + Send + Sync>;

/// A summary function that always keeps the step, using the item's own id
/// as its summary (the function only ever sees `id` + `data`, not the
/// item's title). Useful as a harmless default; real workflow types are
/// expected to supply their own summarizer that reads structured `data` and
/// drops steps it has nothing to say about.
pub fn identity_summary() -> SummaryFn {
    Arc::new(|id, _data| id.to_string())
}

/// Derive the history projection from a timeline snapshot and its matching
/// execution records. For each timeline item, the *last* matching
/// execution record is used (an item may have been retried, producing more
/// than one record with the same `item_id` over a run); items with no
/// record yet (still `pending`) produce a step with an empty summary and no
/// error, which the summary function is free to drop.
pub fn project_steps(
    timeline: &[TimelineItemSnapshot],
    records: &[ExecutionRecord],
    summarize: &SummaryFn,
) -> Vec<HistoryStep> {
    timeline
        .iter()
        .filter_map(|item| {
            let record = records.iter().rev().find(|record| record.item_id == item.id);
            let data = record.and_then(|record| match &record.result {
                RecordedOutcome::Success { data, .. } => data.as_ref(),
                _ => None,
            });
            let error = record.and_then(|record| record.result.error_message().map(str::to_string));
            let summary = summarize(&item.id, data);
            if summary.is_empty() {
                return None;
            }
            Some(HistoryStep {
                id: item.id.clone(),
                title: item.title.clone(),
                summary,
                start_time: item.start_time,
                end_time: item.end_time,
                status: item.status.into(),
                error,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use workflow_types::ExecutionRecord;

    fn snapshot(id: &str, status: ItemStatus) -> TimelineItemSnapshot {
        TimelineItemSnapshot {
            id: id.to_string(),
            title: format!("title-{id}"),
            description: String::new(),
            status,
            start_time: None,
            end_time: None,
        }
    }

    #[test]
    fn empty_summary_drops_the_step() {
        let timeline = vec![snapshot("a", ItemStatus::Complete)];
        let records = vec![ExecutionRecord::placeholder("a", "title-a")];
        let summarize: SummaryFn = Arc::new(|_id, _data| String::new());
        let steps = project_steps(&timeline, &records, &summarize);
        assert!(steps.is_empty());
    }

    #[test]
    fn non_empty_summary_keeps_the_step_and_maps_status() {
        let timeline = vec![snapshot("a", ItemStatus::UserActionRequired)];
        let records = vec![ExecutionRecord::placeholder("a", "title-a")];
        let summarize: SummaryFn = Arc::new(|id, _data| format!("step {id}"));
        let steps = project_steps(&timeline, &records, &summarize);
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].summary, "step a");
        assert_eq!(steps[0].status, HistoryStepStatus::Active);
    }

    #[test]
    fn error_is_read_from_the_latest_record() {
        let timeline = vec![snapshot("a", ItemStatus::Error)];
        let mut record = ExecutionRecord::placeholder("a", "title-a");
        record.result = RecordedOutcome::Error {
            error: "boom".to_string(),
        };
        let summarize: SummaryFn = Arc::new(|id, _data| format!("step {id}"));
        let steps = project_steps(&timeline, &[record], &summarize);
        assert_eq!(steps[0].error.as_deref(), Some("boom"));
    }
}
