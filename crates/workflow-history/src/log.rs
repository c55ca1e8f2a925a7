use chrono::{DateTime, Utc};
use workflow_types::{EventKind, ItemStatus};

/// One flattened entry in a recorded run — a plain, serializable stand-in
/// for a single engine event.
///
/// `workflow-engine`'s live `EngineEvent` carries a `dyn Item` trait object
/// and is not serializable; a caller who wants to run this crate's
/// invariant validators against a real run subscribes to every event kind
/// (or uses `EngineObserver`) and appends one `RecordedEvent` per callback
/// invocation. `sequence` is the position in that recording, not anything
/// the engine itself assigns.
#[derive(Clone, Debug, PartialEq)]
pub struct RecordedEvent {
    pub sequence: u64,
    pub timestamp: DateTime<Utc>,
    pub kind: EventKind,
    pub item_id: Option<String>,
    /// The status the item moved to, when this event represents a
    /// transition. Left to the recorder to attach (e.g. read off
    /// `Engine::get_timeline()` at callback time) since the live event
    /// payload does not always carry it directly.
    pub status: Option<ItemStatus>,
}

impl RecordedEvent {
    pub fn new(sequence: u64, kind: EventKind, item_id: Option<String>, status: Option<ItemStatus>) -> Self {
        Self {
            sequence,
            timestamp: Utc::now(),
            kind,
            item_id,
            status,
        }
    }
}

/// Builds a `Vec<RecordedEvent>` incrementally, the lightweight recorder a
/// test or an `EngineObserver` subscriber hands events to one at a time.
#[derive(Default)]
pub struct EventLog {
    events: Vec<RecordedEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, kind: EventKind, item_id: Option<String>, status: Option<ItemStatus>) {
        let sequence = self.events.len() as u64;
        self.events.push(RecordedEvent::new(sequence, kind, item_id, status));
    }

    pub fn entries(&self) -> &[RecordedEvent] {
        &self.events
    }

    pub fn into_entries(self) -> Vec<RecordedEvent> {
        self.events
    }
}
