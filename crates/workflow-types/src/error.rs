/// Caller-misuse errors.
///
/// The engine's own policy for these is a silent no-op — defensively
/// declining the operation so the engine stays in a consistent state —
/// these variants exist so a caller who wants to know *why* an operation
/// was a no-op can inspect the `Result` rather than guessing from
/// unchanged state.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum DomainError {
    #[error("engine is already running")]
    AlreadyRunning,

    #[error("timeline is empty")]
    EmptyTimeline,

    #[error("index {index} out of bounds for timeline of length {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("item not found: {id}")]
    ItemNotFound { id: String },

    #[error("user action {action_id} not found on item {item_id}")]
    ActionNotFound { item_id: String, action_id: String },

    #[error("item {id} cannot be skipped")]
    CannotSkip { id: String },

    #[error("item {id} cannot be retried")]
    CannotRetry { id: String },
}
