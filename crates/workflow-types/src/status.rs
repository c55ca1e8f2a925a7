use serde::{Deserialize, Serialize};

/// The closed set of states an item moves through during a run.
///
/// Transitions are monotone: `pending -> active -> {complete | error |
/// user_action_required | cancelled}`, and `user_action_required -> {complete
/// | skipped | cancelled | error}`. No terminal state ever moves back to a
/// non-terminal one. See the engine's timeline module for the code that
/// enforces this.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    Pending,
    Active,
    Complete,
    Error,
    Skipped,
    Cancelled,
    UserActionRequired,
}

impl ItemStatus {
    /// Terminal statuses are the ones that stamp `end_time` and never move again.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Complete | Self::Error | Self::Skipped | Self::Cancelled
        )
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Active => "active",
            Self::Complete => "complete",
            Self::Error => "error",
            Self::Skipped => "skipped",
            Self::Cancelled => "cancelled",
            Self::UserActionRequired => "user_action_required",
        }
    }
}

impl std::fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
