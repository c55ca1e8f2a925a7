//! Plain, serializable domain data shared by `workflow-engine` and
//! `workflow-history`: item status, the fixed event set, recorded outcomes,
//! execution records, and engine state. Nothing here is async and nothing
//! here depends on the `Item`/`UserAction` trait objects the engine drives —
//! see `workflow-engine` for those.

pub mod action;
pub mod error;
pub mod event;
pub mod outcome;
pub mod record;
pub mod snapshot;
pub mod state;
pub mod status;

pub use action::{ActionKind, ActionVariant, AppliedAction, UserActionDescriptor};
pub use error::DomainError;
pub use event::EventKind;
pub use outcome::RecordedOutcome;
pub use record::ExecutionRecord;
pub use snapshot::TimelineItemSnapshot;
pub use state::EngineState;
pub use status::ItemStatus;
