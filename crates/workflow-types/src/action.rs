use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Visual weight of a user action, purely a presentation hint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionVariant {
    Primary,
    Secondary,
    Danger,
}

/// Presentation-only description of a choice an interactive item is offering.
///
/// This is the part of a `UserAction` that is safe to serialize into an
/// event payload or a history record; the executable half (`execute()`)
/// lives on the `UserAction` trait in `workflow-engine`, which is not
/// serializable and is never sent over the event bus by value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserActionDescriptor {
    pub id: String,
    pub label: String,
    pub description: String,
    pub variant: ActionVariant,
    pub disabled: bool,
}

/// The discriminator of a `UserActionResult`'s `action` field.
///
/// Kept separate from the executable `ActionOutcome` in `workflow-engine`
/// (which also carries `additional_items: Vec<Box<dyn Item>>`) so that the
/// *fact* an action of this kind was taken can be recorded and serialized
/// after the engine has already spliced any additional items into the
/// timeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Continue,
    Skip,
    Stop,
    Cancel,
    Retry,
}

/// One entry in an `ExecutionRecord`'s applied-action log.
///
/// Appended by `Engine::handle_user_action` after the chosen action's
/// `execute()` resolves; never mutated afterwards.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AppliedAction {
    pub action_id: String,
    pub applied_at: DateTime<Utc>,
    pub kind: ActionKind,
    /// Data merged from the action's result, if any (the `continue` branch).
    pub data: Option<Value>,
}
