use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use workflow_types::{ActionVariant, UserActionDescriptor};

use crate::item::Item;

/// The executable counterpart of `UserActionDescriptor`: what the engine
/// actually invokes when `handle_user_action` resolves an id to an action.
///
/// Split the same way `Item`/`ExecutionOutcome` are split from their
/// `workflow-types` projections — the descriptor is what gets serialized
/// into an `ExecutionRecord`/event payload, this trait is what the engine
/// calls.
#[async_trait]
pub trait UserAction: Send + Sync {
    fn id(&self) -> &str;
    fn label(&self) -> &str;
    fn description(&self) -> &str;
    fn variant(&self) -> ActionVariant {
        ActionVariant::Primary
    }
    fn disabled(&self) -> bool {
        false
    }

    async fn execute(&self) -> ActionOutcome;

    /// The presentation-only half of this action, for events and records.
    fn descriptor(&self) -> UserActionDescriptor {
        UserActionDescriptor {
            id: self.id().to_string(),
            label: self.label().to_string(),
            description: self.description().to_string(),
            variant: self.variant(),
            disabled: self.disabled(),
        }
    }
}

/// What choosing a `UserAction` tells the engine to do next.
///
/// `additional_items`/`data` only make sense for `Continue` — a sum type
/// can put them only where they're meaningful instead of leaving every
/// other variant carrying two always-`None` fields.
pub enum ActionOutcome {
    Continue {
        additional_items: Vec<Arc<dyn Item>>,
        data: Option<Value>,
    },
    Skip,
    Stop,
    Cancel,
    Retry,
}

impl ActionOutcome {
    pub fn continue_with(additional_items: Vec<Arc<dyn Item>>, data: Option<Value>) -> Self {
        Self::Continue {
            additional_items,
            data,
        }
    }
}
