use std::sync::{Arc, Mutex};

use workflow_types::{EventKind, TimelineItemSnapshot};

use crate::engine::Engine;

/// A push-model snapshot of everything a UI needs to render progress,
/// recomputed after every event.
#[derive(Clone, Debug, PartialEq)]
pub struct EngineSnapshot {
    pub timeline: Vec<TimelineItemSnapshot>,
    pub progress: f64,
    pub is_running: bool,
    pub is_paused: bool,
    pub is_complete: bool,
    pub error: Option<String>,
}

impl EngineSnapshot {
    fn capture(engine: &Engine) -> Self {
        let state = engine.get_state();
        Self {
            timeline: engine.get_timeline(),
            progress: engine.get_progress(),
            is_running: state.is_running,
            is_paused: state.is_paused,
            is_complete: state.is_complete,
            error: state.error,
        }
    }
}

type ChangeHandler = Arc<dyn Fn(&EngineSnapshot) + Send + Sync>;

/// Adapts the engine's eleven discrete event kinds into a single push
/// subscription for UIs — a small push-model adapter exposing a single
/// `on_change(handler)` registration so a UI only needs one subscription
/// instead of eleven.
///
/// Subscribes to every event kind on construction and keeps a cached
/// `EngineSnapshot` that it recomputes from the engine's own getters each
/// time any event fires, rather than trying to incrementally patch state
/// from individual event payloads.
pub struct EngineObserver {
    engine: Engine,
    handlers: Arc<Mutex<Vec<ChangeHandler>>>,
}

impl EngineObserver {
    pub fn new(engine: Engine) -> Self {
        let handlers: Arc<Mutex<Vec<ChangeHandler>>> = Arc::new(Mutex::new(Vec::new()));
        let observer = Self {
            engine: engine.clone(),
            handlers: handlers.clone(),
        };
        for kind in EventKind::ALL {
            let engine_for_handler = engine.clone();
            let handlers_for_handler = handlers.clone();
            engine.on(kind, move |_event| {
                let snapshot = EngineSnapshot::capture(&engine_for_handler);
                for handler in handlers_for_handler.lock().unwrap().iter() {
                    handler(&snapshot);
                }
            });
        }
        observer
    }

    /// Register a handler invoked with the freshly recomputed snapshot
    /// after any engine event.
    pub fn on_change(&self, handler: impl Fn(&EngineSnapshot) + Send + Sync + 'static) {
        self.handlers.lock().unwrap().push(Arc::new(handler));
    }

    /// The current snapshot, computed on demand rather than from the cache
    /// so a caller that subscribes late still sees up-to-date state.
    pub fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot::capture(&self.engine)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::test_support::StubItem;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn on_change_fires_and_reflects_completion() {
        let engine = Engine::with_items(vec![StubItem::arc("a")], EngineConfig::default());
        let observer = EngineObserver::new(engine.clone());
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_clone = calls.clone();
        observer.on_change(move |_snapshot| {
            calls_clone.fetch_add(1, Ordering::SeqCst);
        });

        engine.start().await.unwrap();

        assert!(calls.load(Ordering::SeqCst) > 0);
        let snapshot = observer.snapshot();
        assert!(snapshot.is_complete);
        assert_eq!(snapshot.progress, 100.0);
    }
}
