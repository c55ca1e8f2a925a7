use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::HistoryError;
use crate::step::HistoryStep;

/// The workflow kinds a concrete application might drive: `update`,
/// `migration`, `composer`. The engine itself is domain-agnostic; this enum
/// only exists because `createEntry`'s request shape names it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowType {
    Update,
    Migration,
    Composer,
}

/// The run-level status written on a history flush, distinct from any
/// individual step's status: `stop` writes `error`, `cancel` writes
/// `cancelled`, `complete` writes `finished`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Error,
    Cancelled,
    Finished,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CreateEntryRequest {
    pub site_id: String,
    pub workflow_type: WorkflowType,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UpdateEntryRequest {
    pub site_id: String,
    pub status: Option<RunStatus>,
    pub end_time: Option<DateTime<Utc>>,
    pub steps: Vec<HistoryStep>,
}

/// The opaque handle a `HistoryPort` hands back, carrying an `id` and
/// `siteId`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: String,
    pub site_id: String,
    pub workflow_type: WorkflowType,
    pub status: Option<RunStatus>,
    pub end_time: Option<DateTime<Utc>>,
    pub steps: Vec<HistoryStep>,
}

/// The external persistence service the engine consumes but never owns.
/// `create_entry` is called once per run from
/// `Engine::start_history_tracking`; `update_entry` is called on every
/// non-trivial transition from `stop`/`cancel`/`complete` and is idempotent
/// under repeated writes of the same snapshot, since each call fully
/// replaces the steps projection rather than merging into it.
#[async_trait]
pub trait HistoryPort: Send + Sync {
    async fn create_entry(&self, request: CreateEntryRequest) -> Result<HistoryEntry, HistoryError>;
    async fn update_entry(
        &self,
        id: &str,
        update: UpdateEntryRequest,
    ) -> Result<HistoryEntry, HistoryError>;
}

/// An append-only, in-process reference implementation: a production crate
/// ships this next to the port it defines so downstream callers have
/// something runnable without standing up the real history service.
#[derive(Default)]
pub struct InMemoryHistoryPort {
    entries: Mutex<HashMap<String, HistoryEntry>>,
}

impl InMemoryHistoryPort {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Option<HistoryEntry> {
        self.entries.lock().unwrap().get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().unwrap().is_empty()
    }
}

#[async_trait]
impl HistoryPort for InMemoryHistoryPort {
    async fn create_entry(&self, request: CreateEntryRequest) -> Result<HistoryEntry, HistoryError> {
        let entry = HistoryEntry {
            id: Uuid::new_v4().to_string(),
            site_id: request.site_id,
            workflow_type: request.workflow_type,
            status: None,
            end_time: None,
            steps: Vec::new(),
        };
        self.entries
            .lock()
            .unwrap()
            .insert(entry.id.clone(), entry.clone());
        Ok(entry)
    }

    async fn update_entry(
        &self,
        id: &str,
        update: UpdateEntryRequest,
    ) -> Result<HistoryEntry, HistoryError> {
        let mut entries = self.entries.lock().unwrap();
        let entry = entries
            .get_mut(id)
            .ok_or_else(|| HistoryError::EntryNotFound { id: id.to_string() })?;
        entry.site_id = update.site_id;
        entry.status = update.status.or(entry.status);
        entry.end_time = update.end_time.or(entry.end_time);
        entry.steps = update.steps;
        Ok(entry.clone())
    }
}

/// A history port for callers who do not need persistence but still want
/// the write attempts visible in traces — logs every call at `debug` and
/// hands back a deterministic placeholder entry.
#[derive(Default)]
pub struct NullHistoryPort;

impl NullHistoryPort {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl HistoryPort for NullHistoryPort {
    async fn create_entry(&self, request: CreateEntryRequest) -> Result<HistoryEntry, HistoryError> {
        tracing::debug!(site_id = %request.site_id, "null history port: create_entry");
        Ok(HistoryEntry {
            id: "null".to_string(),
            site_id: request.site_id,
            workflow_type: request.workflow_type,
            status: None,
            end_time: None,
            steps: Vec::new(),
        })
    }

    async fn update_entry(
        &self,
        id: &str,
        update: UpdateEntryRequest,
    ) -> Result<HistoryEntry, HistoryError> {
        tracing::debug!(id, steps = update.steps.len(), "null history port: update_entry");
        Ok(HistoryEntry {
            id: id.to_string(),
            site_id: update.site_id,
            workflow_type: WorkflowType::Update,
            status: update.status,
            end_time: update.end_time,
            steps: update.steps,
        })
    }
}
