//! The cooperative, single-threaded state machine that drives a timeline of
//! polymorphic items through their lifecycle, plus the contracts (`Item`,
//! `UserAction`), shared `Context`, event bus, and push-model
//! `EngineObserver` that surround it.
//!
//! `workflow-engine` depends on `workflow-types` for the plain, serializable
//! data every crate shares, and on `workflow-history` for the `HistoryPort`
//! it flushes derived snapshots through on `stop`/`cancel`/`complete`. It
//! does not know anything about the concrete items a caller drives through
//! it — the engine only ever calls through the `Item`/`UserAction` traits,
//! never downcasting to a concrete type.

mod action;
mod config;
mod context;
mod engine;
mod error;
mod events;
mod item;
mod observer;
#[cfg(test)]
mod scenario_tests;
#[cfg(test)]
mod test_support;
mod timeline;

pub use action::{ActionOutcome, UserAction};
pub use config::EngineConfig;
pub use context::Context;
pub use engine::Engine;
pub use error::EngineError;
pub use events::{EngineEvent, EventBus, SubscriptionId};
pub use item::{ExecutionOutcome, Item};
pub use observer::{EngineObserver, EngineSnapshot};
pub use timeline::{Timeline, TimelineSlot};
