//! Shared test doubles for this crate's unit tests. Not part of the public
//! API; `#[cfg(test)]`-only.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Notify;

use crate::action::{ActionOutcome, UserAction};
use crate::context::Context;
use crate::item::{ExecutionOutcome, Item};

pub struct StubItem {
    id: String,
    title: String,
    on_execute: Box<dyn Fn() -> ExecutionOutcome + Send + Sync>,
    execute_calls: AtomicUsize,
}

impl StubItem {
    pub fn arc(id: &str) -> Arc<dyn Item> {
        Arc::new(Self::new(id))
    }

    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            title: format!("item {id}"),
            on_execute: Box::new(ExecutionOutcome::success),
            execute_calls: AtomicUsize::new(0),
        }
    }

    pub fn with_outcome(
        id: &str,
        on_execute: impl Fn() -> ExecutionOutcome + Send + Sync + 'static,
    ) -> Arc<dyn Item> {
        Arc::new(Self {
            id: id.to_string(),
            title: format!("item {id}"),
            on_execute: Box::new(on_execute),
            execute_calls: AtomicUsize::new(0),
        })
    }

    pub fn execute_calls(&self) -> usize {
        self.execute_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Item for StubItem {
    fn id(&self) -> &str {
        &self.id
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn description(&self) -> &str {
        "stub item used in tests"
    }

    async fn execute(&self, _ctx: &Context) -> ExecutionOutcome {
        self.execute_calls.fetch_add(1, Ordering::SeqCst);
        (self.on_execute)()
    }

    fn can_skip(&self) -> bool {
        true
    }

    fn can_retry(&self) -> bool {
        true
    }
}

/// An item whose `execute` blocks on an external signal, modeling S6's "A
/// awaits a signal" — a stand-in for an item doing real in-flight I/O that
/// a test can choose never to resolve, so it can assert on engine behavior
/// while the item is still `active`.
pub struct AwaitingItem {
    id: String,
    title: String,
    release: Arc<Notify>,
    cancelled: Arc<AtomicBool>,
}

impl AwaitingItem {
    /// Returns the item plus two handles: the `Notify` a test can fire to
    /// let `execute` resolve, and a flag set by `on_cancel`.
    pub fn new(id: &str) -> (Arc<dyn Item>, Arc<Notify>, Arc<AtomicBool>) {
        let release = Arc::new(Notify::new());
        let cancelled = Arc::new(AtomicBool::new(false));
        let item = Arc::new(Self {
            id: id.to_string(),
            title: format!("item {id}"),
            release: release.clone(),
            cancelled: cancelled.clone(),
        });
        (item, release, cancelled)
    }
}

#[async_trait]
impl Item for AwaitingItem {
    fn id(&self) -> &str {
        &self.id
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn description(&self) -> &str {
        "item awaiting an external signal"
    }

    async fn execute(&self, _ctx: &Context) -> ExecutionOutcome {
        self.release.notified().await;
        ExecutionOutcome::success()
    }

    async fn on_cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }
}

/// A `UserAction` test double whose `execute()` returns whatever the test
/// supplies, mirroring `StubItem::with_outcome`.
pub struct StubAction {
    id: String,
    on_execute: Box<dyn Fn() -> ActionOutcome + Send + Sync>,
}

impl StubAction {
    pub fn arc(
        id: &str,
        on_execute: impl Fn() -> ActionOutcome + Send + Sync + 'static,
    ) -> Arc<dyn UserAction> {
        Arc::new(Self {
            id: id.to_string(),
            on_execute: Box::new(on_execute),
        })
    }
}

#[async_trait]
impl UserAction for StubAction {
    fn id(&self) -> &str {
        &self.id
    }

    fn label(&self) -> &str {
        "stub action"
    }

    fn description(&self) -> &str {
        "stub action used in tests"
    }

    async fn execute(&self) -> ActionOutcome {
        (self.on_execute)()
    }
}
