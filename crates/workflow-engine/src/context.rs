use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use serde_json::Value;

use crate::engine::Inner;
use crate::events::EventBus;

/// The shared scratchpad passed to every item's `execute()` call, plus a
/// back-reference to the engine used only to call `emit_progress`. One
/// `Context` is built per engine and handed to every item in the run; it
/// shares the engine's own lock rather than keeping a private copy, which
/// is what makes it a genuine back-reference instead of a snapshot.
#[derive(Clone)]
pub struct Context {
    pub(crate) inner: Arc<Mutex<Inner>>,
    pub(crate) events: Arc<EventBus>,
}

impl Context {
    pub fn get(&self, key: &str) -> Option<Value> {
        self.inner.lock().unwrap().context_values.get(key).cloned()
    }

    pub fn set(&self, key: impl Into<String>, value: Value) {
        self.inner
            .lock()
            .unwrap()
            .context_values
            .insert(key.into(), value);
    }

    pub fn remove(&self, key: &str) -> Option<Value> {
        self.inner.lock().unwrap().context_values.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.inner.lock().unwrap().context_values.contains_key(key)
    }

    pub fn snapshot(&self) -> HashMap<String, Value> {
        self.inner.lock().unwrap().context_values.clone()
    }

    /// The engine-side entry point an item calls from inside its own
    /// `execute()` to report incremental progress. `item_id` is the
    /// caller's own id — items call `ctx.emit_progress(self.id(), ...)`.
    pub fn emit_progress(&self, item_id: &str, data: Value) {
        crate::engine::Engine::emit_progress_for(&self.inner, &self.events, item_id, data);
    }
}
