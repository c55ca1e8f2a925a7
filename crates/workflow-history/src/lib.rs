//! The history projector: derives a summary projection of an engine's
//! timeline, defines the `HistoryPort` consumer interface the engine
//! flushes that projection through, and provides pure validators for a set
//! of run-level correctness properties.
//!
//! This crate replays a workflow engine's timeline + execution records into
//! `HistoryStep`s and checks the correctness properties that apply to a run
//! of this engine — status monotonicity, end-time stamping, event
//! ordering, progress-guard adherence, and cancel idempotence. Depends only
//! on `workflow-types` so it can be consumed by `workflow-engine` without a
//! dependency cycle.

pub mod error;
pub mod invariants;
pub mod log;
pub mod port;
pub mod step;

pub use error::{HistoryError, HistoryViolation};
pub use log::RecordedEvent;
pub use port::{
    CreateEntryRequest, HistoryEntry, HistoryPort, InMemoryHistoryPort, NullHistoryPort,
    RunStatus, UpdateEntryRequest, WorkflowType,
};
pub use step::{HistoryStep, HistoryStepStatus, SummaryFn, identity_summary, project_steps};
