/// The engine's caller-facing error type. Re-exported from `workflow-types`
/// rather than duplicated — the same error enum is useful both as the
/// `ExecutionRecord`-adjacent domain type and as what the engine's
/// `Result`-returning methods hand back.
pub use workflow_types::DomainError as EngineError;
