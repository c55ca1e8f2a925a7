use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::action::UserActionDescriptor;

/// The serializable projection of an item's `execute()` result that is
/// worth keeping in an `ExecutionRecord` after the engine has already acted
/// on the live parts of the result (spliced `next_items`, applied
/// `pause_workflow`).
///
/// The executable counterpart (`ExecutionOutcome` in `workflow-engine`, which
/// additionally carries `next_items: Vec<Box<dyn Item>>`) is what an `Item`
/// actually returns; the engine converts it to this type the moment it
/// decides what to do with the live parts.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RecordedOutcome {
    Success {
        data: Option<Value>,
        ui_content: Option<Value>,
        pause_workflow: bool,
    },
    Error {
        error: String,
    },
    UserActionRequired {
        ui_content: Option<Value>,
        actions: Vec<UserActionDescriptor>,
        pause_workflow: bool,
    },
}

impl RecordedOutcome {
    /// A placeholder recorded the instant an item starts executing, so that
    /// progress emissions in flight during `execute()` find a record to
    /// update. Carries `status: success` with everything empty, matching the
    /// "placeholder with a success/null result" shape the engine appends
    /// before the item has actually produced anything.
    pub fn placeholder() -> Self {
        Self::Success {
            data: None,
            ui_content: None,
            pause_workflow: false,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(
            self,
            Self::Success {
                data: None,
                ui_content: None,
                pause_workflow: false,
            }
        )
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Success { .. } => "success",
            Self::Error { .. } => "error",
            Self::UserActionRequired { .. } => "user_action_required",
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }

    pub fn is_user_action_required(&self) -> bool {
        matches!(self, Self::UserActionRequired { .. })
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Error { error } => Some(error.as_str()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_is_recognized_and_is_not_an_error() {
        let placeholder = RecordedOutcome::placeholder();
        assert!(placeholder.is_placeholder());
        assert!(!placeholder.is_error());
        assert!(!placeholder.is_user_action_required());
    }

    #[test]
    fn a_real_success_with_data_is_not_a_placeholder() {
        let outcome = RecordedOutcome::Success {
            data: Some(serde_json::json!({"ok": true})),
            ui_content: None,
            pause_workflow: false,
        };
        assert!(!outcome.is_placeholder());
    }

    #[test]
    fn error_message_round_trips() {
        let outcome = RecordedOutcome::Error {
            error: "boom".to_string(),
        };
        assert_eq!(outcome.error_message(), Some("boom"));
        assert!(outcome.is_error());
    }
}
