use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::status::ItemStatus;

/// A pure, serializable view over one timeline slot: enough for
/// `workflow-history`'s projector to derive steps from without that crate
/// needing to depend on the trait objects `workflow-engine` drives.
///
/// `workflow-engine::Engine::get_timeline` produces a `Vec` of these from
/// its live `Vec<TimelineSlot>` on every call — it is a snapshot, not a
/// live view, even though the running engine keeps mutating the timeline
/// underneath it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TimelineItemSnapshot {
    pub id: String,
    pub title: String,
    pub description: String,
    pub status: ItemStatus,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
}
