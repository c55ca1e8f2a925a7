use std::sync::Arc;

use workflow_history::{HistoryPort, NullHistoryPort, SummaryFn, WorkflowType, identity_summary};

/// Engine tuning knobs — a small `Default` struct with chained setters
/// rather than a god-object of unrelated flags.
#[derive(Clone)]
pub struct EngineConfig {
    /// Whether the drive loop yields to the async scheduler between items
    /// (`tokio::task::yield_now`). Defaults to `true` so a long timeline
    /// cannot starve other tasks on a current_thread runtime; items that
    /// must run back-to-back without ceding the executor can disable it.
    pub(crate) yield_between_items: bool,
    /// Prefix used for the tracing spans the engine opens around each state
    /// transition and item execution.
    pub(crate) span_name: String,
    /// The `HistoryPort` flushed on `stop`/`cancel`/`complete`.
    /// Defaults to a `NullHistoryPort` so an engine constructed without
    /// calling `history_port(...)` still has somewhere to write, it just
    /// writes to traces instead of a real persistence service.
    pub(crate) history_port: Arc<dyn HistoryPort>,
    /// The workflow kind recorded when history tracking starts.
    pub(crate) workflow_type: WorkflowType,
    /// The per-workflow-type summary projection: a strategy plugged in by
    /// the caller rather than a switch inside the engine.
    pub(crate) summary_fn: SummaryFn,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            yield_between_items: true,
            span_name: "workflow_engine".to_string(),
            history_port: Arc::new(NullHistoryPort::new()),
            workflow_type: WorkflowType::Update,
            summary_fn: identity_summary(),
        }
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn yield_between_items(mut self, yield_between_items: bool) -> Self {
        self.yield_between_items = yield_between_items;
        self
    }

    pub fn span_name(mut self, span_name: impl Into<String>) -> Self {
        self.span_name = span_name.into();
        self
    }

    pub fn history_port(mut self, history_port: Arc<dyn HistoryPort>) -> Self {
        self.history_port = history_port;
        self
    }

    pub fn workflow_type(mut self, workflow_type: WorkflowType) -> Self {
        self.workflow_type = workflow_type;
        self
    }

    pub fn summary_fn(mut self, summary_fn: SummaryFn) -> Self {
        self.summary_fn = summary_fn;
        self
    }
}
