use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use serde_json::Value;
use workflow_types::{EventKind, RecordedOutcome};

use crate::item::Item;

/// The live, trait-object-carrying payload handed to subscribers.
/// `EventKind` (in `workflow-types`) is the serializable tag used
/// for subscription keys and logging; this is the value actually delivered.
#[derive(Clone)]
pub enum EngineEvent {
    Started,
    Paused,
    Resumed,
    Stopped,
    Cancelled,
    Completed,
    ItemStarted { item: Arc<dyn Item> },
    ItemCompleted { item: Arc<dyn Item>, result: RecordedOutcome },
    ItemError { item: Arc<dyn Item>, message: String },
    UserActionRequired { item: Arc<dyn Item>, result: RecordedOutcome },
    ItemProgress { item: Arc<dyn Item>, data: Value },
}

impl EngineEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Started => EventKind::Started,
            Self::Paused => EventKind::Paused,
            Self::Resumed => EventKind::Resumed,
            Self::Stopped => EventKind::Stopped,
            Self::Cancelled => EventKind::Cancelled,
            Self::Completed => EventKind::Completed,
            Self::ItemStarted { .. } => EventKind::ItemStarted,
            Self::ItemCompleted { .. } => EventKind::ItemCompleted,
            Self::ItemError { .. } => EventKind::ItemError,
            Self::UserActionRequired { .. } => EventKind::UserActionRequired,
            Self::ItemProgress { .. } => EventKind::ItemProgress,
        }
    }
}

/// Opaque handle returned by `EventBus::on`, used to unsubscribe later.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Handler = Arc<dyn Fn(&EngineEvent) + Send + Sync>;

/// Synchronous, multi-subscriber pub/sub over the fixed 11-event set.
///
/// Handlers run in registration order on the thread that calls `emit`, with
/// no re-entrant delivery guarantee beyond that ordering. A panicking
/// handler is trapped and logged rather than poisoning the bus or aborting
/// the run — one bad subscriber should never take down the engine.
#[derive(Default)]
pub struct EventBus {
    handlers: Mutex<HashMap<EventKind, Vec<(u64, Handler)>>>,
    next_id: AtomicU64,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(
        &self,
        kind: EventKind,
        handler: impl Fn(&EngineEvent) + Send + Sync + 'static,
    ) -> SubscriptionId {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.handlers
            .lock()
            .unwrap()
            .entry(kind)
            .or_default()
            .push((id, Arc::new(handler)));
        SubscriptionId(id)
    }

    pub fn off(&self, kind: EventKind, subscription: SubscriptionId) {
        if let Some(handlers) = self.handlers.lock().unwrap().get_mut(&kind) {
            handlers.retain(|(id, _)| *id != subscription.0);
        }
    }

    /// Invoke every handler subscribed to `event.kind()`. Handlers are
    /// collected and the lock released before any of them run, so a handler
    /// that calls back into the engine (e.g. to read `get_state()`) cannot
    /// deadlock against this same bus.
    pub fn emit(&self, event: EngineEvent) {
        let kind = event.kind();
        let snapshot: Vec<Handler> = {
            let guard = self.handlers.lock().unwrap();
            guard
                .get(&kind)
                .map(|handlers| handlers.iter().map(|(_, handler)| handler.clone()).collect())
                .unwrap_or_default()
        };
        for handler in snapshot {
            let result = std::panic::catch_unwind(AssertUnwindSafe(|| handler(&event)));
            if let Err(payload) = result {
                let message = payload
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "non-string panic payload".to_string());
                tracing::warn!(event = %kind, %message, "event handler panicked, continuing");
            }
        }
    }
}
