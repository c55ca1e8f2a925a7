use serde::{Deserialize, Serialize};

/// The fixed set of event kinds the engine emits.
///
/// This is the serializable tag used for subscription keys and for logging;
/// the live payload (which carries a reference to the executing `Item` trait
/// object) is a separate, non-serializable enum in `workflow-engine` since it
/// cannot be represented here without a dependency cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Started,
    Paused,
    Resumed,
    Stopped,
    Cancelled,
    Completed,
    ItemStarted,
    ItemCompleted,
    ItemError,
    UserActionRequired,
    ItemProgress,
}

impl EventKind {
    pub const ALL: [EventKind; 11] = [
        Self::Started,
        Self::Paused,
        Self::Resumed,
        Self::Stopped,
        Self::Cancelled,
        Self::Completed,
        Self::ItemStarted,
        Self::ItemCompleted,
        Self::ItemError,
        Self::UserActionRequired,
        Self::ItemProgress,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Started => "started",
            Self::Paused => "paused",
            Self::Resumed => "resumed",
            Self::Stopped => "stopped",
            Self::Cancelled => "cancelled",
            Self::Completed => "completed",
            Self::ItemStarted => "item_started",
            Self::ItemCompleted => "item_completed",
            Self::ItemError => "item_error",
            Self::UserActionRequired => "user_action_required",
            Self::ItemProgress => "item_progress",
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
