use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::action::UserAction;
use crate::context::Context;

/// The polymorphic contract every timeline entry satisfies.
///
/// Identity (`id`/`title`/`description`) is immutable for the lifetime of
/// the item; mutable lifecycle state (`status`, `start_time`, `end_time`) is
/// deliberately *not* part of this trait. The engine tracks that state in
/// its own `TimelineSlot` instead of requiring every implementation to carry
/// interior mutability — status is a projection the engine maintains over
/// the timeline rather than a field the item itself owns. The engine only
/// ever calls through this trait; it never downcasts a `dyn Item` back to a
/// concrete type.
#[async_trait]
pub trait Item: Send + Sync {
    /// Stable, unique identifier within the live timeline.
    fn id(&self) -> &str;
    fn title(&self) -> &str;
    fn description(&self) -> &str;

    /// Run the item's work. `ctx` is the shared scratchpad plus the engine
    /// back-reference used for `emit_progress`.
    async fn execute(&self, ctx: &Context) -> ExecutionOutcome;

    /// Called when the engine skips this item via `skip_item`. Default is a
    /// no-op; override for items that need to release resources.
    async fn on_skip(&self) {}

    /// Called when the engine retries this item via `retry_item`.
    async fn on_retry(&self) {}

    /// Called during `cancel()` for items that are `active`, `pending`, or
    /// `user_action_required`. Failures here are logged and ignored.
    async fn on_cancel(&self) {}

    /// Whether `skip_item` is permitted for this item.
    fn can_skip(&self) -> bool {
        false
    }

    /// Whether `retry_item` is permitted for this item.
    fn can_retry(&self) -> bool {
        false
    }
}

/// The tagged result of an `Item::execute` call.
///
/// Named `ExecutionOutcome` rather than `Result` to avoid colliding with
/// `std::result::Result` — this type is never itself fallible, it *is* the
/// value an infallible `execute()` always returns, threading
/// success/error/pause through one discriminated value rather than an
/// exception.
pub enum ExecutionOutcome {
    Success {
        data: Option<Value>,
        ui_content: Option<Value>,
        /// Items to splice into the timeline immediately after the current
        /// position.
        next_items: Vec<Arc<dyn Item>>,
        pause_workflow: bool,
    },
    Error {
        error: String,
    },
    UserActionRequired {
        ui_content: Option<Value>,
        actions: Vec<Arc<dyn UserAction>>,
        pause_workflow: bool,
    },
}

impl ExecutionOutcome {
    /// Convenience constructor for the common "just succeeded" case.
    pub fn success() -> Self {
        Self::Success {
            data: None,
            ui_content: None,
            next_items: Vec::new(),
            pause_workflow: false,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            error: message.into(),
        }
    }
}
