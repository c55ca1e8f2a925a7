use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::Utc;
use serde_json::Value;
use tracing::instrument;
use workflow_types::{
    ActionKind, AppliedAction, EngineState, ExecutionRecord, ItemStatus, RecordedOutcome,
    TimelineItemSnapshot, UserActionDescriptor,
};

use workflow_history::{CreateEntryRequest, HistoryEntry, RunStatus, UpdateEntryRequest, project_steps};

use crate::action::{ActionOutcome, UserAction};
use crate::config::EngineConfig;
use crate::context::Context;
use crate::error::EngineError;
use crate::events::{EngineEvent, EventBus, SubscriptionId};
use crate::item::{ExecutionOutcome, Item};
use crate::timeline::Timeline;

pub(crate) struct Inner {
    pub(crate) timeline: Timeline,
    pub(crate) execution_history: Vec<ExecutionRecord>,
    pub(crate) state: EngineState,
    pub(crate) context_values: HashMap<String, Value>,
    pending_actions: HashMap<String, Vec<Arc<dyn UserAction>>>,
    /// Set by `start_history_tracking`, which calls `HistoryPort::create_entry`.
    /// `None` until then, so a caller who never opts in to history tracking
    /// pays no cost and `stop`/`cancel`/`complete` simply skip the flush.
    history_entry: Option<HistoryEntry>,
}

impl Default for Inner {
    fn default() -> Self {
        Self {
            timeline: Timeline::new(),
            execution_history: Vec::new(),
            state: EngineState::default(),
            context_values: HashMap::new(),
            pending_actions: HashMap::new(),
            history_entry: None,
        }
    }
}

/// Runs a future on its own tokio task and turns a panic into a plain
/// `Err`, the Rust-native analogue of trapping an exception thrown from an
/// item's `execute()`/`on*` hooks.
async fn run_trapped<F>(future: F) -> Result<F::Output, String>
where
    F: std::future::Future + Send + 'static,
    F::Output: Send + 'static,
{
    match tokio::spawn(future).await {
        Ok(value) => Ok(value),
        Err(join_err) => Err(format!("panicked: {join_err}")),
    }
}

/// The cooperative, single-threaded state machine that drives a timeline of
/// items to completion. `Engine` is a cheap-to-clone handle over shared
/// state — cloning it does not duplicate the timeline, it shares it.
#[derive(Clone)]
pub struct Engine {
    inner: Arc<Mutex<Inner>>,
    events: Arc<EventBus>,
    config: EngineConfig,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner::default())),
            events: Arc::new(EventBus::new()),
            config,
        }
    }

    pub fn with_items(items: Vec<Arc<dyn Item>>, config: EngineConfig) -> Self {
        let engine = Self::new(config);
        engine.add_items(items);
        engine
    }

    /// A `Context` sharing this engine's own lock and event bus — the
    /// back-reference `Item::execute` uses to call `emit_progress`.
    pub fn context(&self) -> Context {
        Context {
            inner: self.inner.clone(),
            events: self.events.clone(),
        }
    }

    pub fn on(
        &self,
        kind: workflow_types::EventKind,
        handler: impl Fn(&EngineEvent) + Send + Sync + 'static,
    ) -> SubscriptionId {
        self.events.on(kind, handler)
    }

    pub fn off(&self, kind: workflow_types::EventKind, subscription: SubscriptionId) {
        self.events.off(kind, subscription)
    }

    /// Append items to the end of the timeline. Duplicate ids are the
    /// caller's responsibility; the engine does not deduplicate.
    pub fn add_items(&self, items: Vec<Arc<dyn Item>>) {
        let mut inner = self.inner.lock().unwrap();
        inner.timeline.append(items);
        inner.state.timeline_len = inner.timeline.len();
    }

    /// Insert items immediately after `index`, or after the current index
    /// when `index` is `None`.
    pub fn insert_items(&self, items: Vec<Arc<dyn Item>>, index: Option<usize>) {
        let mut inner = self.inner.lock().unwrap();
        let at = index.unwrap_or(inner.state.current_index);
        inner.timeline.insert_after(at, items);
        inner.state.timeline_len = inner.timeline.len();
    }

    pub fn remove_item(&self, id: &str) -> Result<(), EngineError> {
        let mut inner = self.inner.lock().unwrap();
        let Some(removed_at) = inner.timeline.remove_by_id(id) else {
            return Err(EngineError::ItemNotFound { id: id.to_string() });
        };
        if removed_at <= inner.state.current_index && inner.state.current_index > 0 {
            inner.state.current_index -= 1;
        }
        inner.state.timeline_len = inner.timeline.len();
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn start(&self) -> Result<(), EngineError> {
        {
            let mut inner = self.inner.lock().unwrap();
            if inner.state.is_running {
                return Err(EngineError::AlreadyRunning);
            }
            if inner.timeline.is_empty() {
                return Err(EngineError::EmptyTimeline);
            }
            let timeline_len = inner.timeline.len();
            inner.state = EngineState {
                is_running: true,
                timeline_len,
                start_time: Some(Utc::now()),
                ..Default::default()
            };
        }
        self.events.emit(EngineEvent::Started);
        self.execute_from(0).await;
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn start_from_step(&self, step: usize) -> Result<(), EngineError> {
        {
            let mut inner = self.inner.lock().unwrap();
            if inner.state.is_running {
                return Err(EngineError::AlreadyRunning);
            }
            if inner.timeline.is_empty() {
                return Err(EngineError::EmptyTimeline);
            }
            let timeline_len = inner.timeline.len();
            if step >= timeline_len {
                return Err(EngineError::IndexOutOfBounds {
                    index: step,
                    len: timeline_len,
                });
            }
            for i in 0..step {
                if let Some(slot) = inner.timeline.get_mut(i) {
                    slot.status = ItemStatus::Skipped;
                    slot.end_time = Some(Utc::now());
                }
            }
            inner.state = EngineState {
                is_running: true,
                current_index: step,
                timeline_len,
                start_time: Some(Utc::now()),
                ..Default::default()
            };
        }
        self.events.emit(EngineEvent::Started);
        self.execute_from(step).await;
        Ok(())
    }

    pub fn pause(&self) {
        let paused = {
            let mut inner = self.inner.lock().unwrap();
            if inner.state.is_running && !inner.state.is_paused {
                inner.state.is_running = false;
                inner.state.is_paused = true;
                true
            } else {
                false
            }
        };
        if paused {
            self.events.emit(EngineEvent::Paused);
        }
    }

    pub async fn resume(&self) {
        let resumed_at = {
            let mut inner = self.inner.lock().unwrap();
            if inner.state.is_paused {
                inner.state.is_paused = false;
                inner.state.is_running = true;
                Some(inner.state.current_index)
            } else {
                None
            }
        };
        if let Some(index) = resumed_at {
            self.events.emit(EngineEvent::Resumed);
            self.execute_from(index).await;
        }
    }

    /// Begin history tracking for this run: calls `HistoryPort::create_entry`
    /// and stashes the returned entry id so `stop`/`cancel`/`complete` have
    /// somewhere to flush to. Safe to skip entirely — a caller that
    /// never calls this simply gets no history writes, which is also what
    /// happens if the port is the default `NullHistoryPort`.
    pub async fn start_history_tracking(&self, site_id: impl Into<String>) {
        let request = CreateEntryRequest {
            site_id: site_id.into(),
            workflow_type: self.config.workflow_type,
        };
        match self.config.history_port.create_entry(request).await {
            Ok(entry) => {
                self.inner.lock().unwrap().history_entry = Some(entry);
            }
            Err(err) => {
                tracing::warn!(%err, "history port create_entry failed, continuing without tracking");
            }
        }
    }

    async fn flush_history(&self, status: RunStatus) {
        let (entry_id, site_id, end_time) = {
            let inner = self.inner.lock().unwrap();
            let Some(entry) = &inner.history_entry else {
                return;
            };
            (entry.id.clone(), entry.site_id.clone(), inner.state.end_time)
        };
        let steps = {
            let inner = self.inner.lock().unwrap();
            let timeline = inner
                .timeline
                .iter()
                .map(|slot| TimelineItemSnapshot {
                    id: slot.item.id().to_string(),
                    title: slot.item.title().to_string(),
                    description: slot.item.description().to_string(),
                    status: slot.status,
                    start_time: slot.start_time,
                    end_time: slot.end_time,
                })
                .collect::<Vec<_>>();
            project_steps(&timeline, &inner.execution_history, &self.config.summary_fn)
        };
        let update = UpdateEntryRequest {
            site_id,
            status: Some(status),
            end_time,
            steps,
        };
        match self.config.history_port.update_entry(&entry_id, update).await {
            Ok(entry) => {
                self.inner.lock().unwrap().history_entry = Some(entry);
            }
            Err(err) => {
                tracing::warn!(%err, "history port update_entry failed, continuing");
            }
        }
    }

    /// Fatal halt. Always writes history with `RunStatus::Error`, even when
    /// called from a graceful path rather than a genuine failure — see
    /// `DESIGN.md` for why that mislabeling is kept rather than "fixed" here.
    pub async fn stop(&self) {
        {
            let mut inner = self.inner.lock().unwrap();
            inner.state.is_running = false;
            inner.state.is_paused = false;
            inner.state.end_time = Some(Utc::now());
        }
        self.flush_history(RunStatus::Error).await;
        self.events.emit(EngineEvent::Stopped);
    }

    /// Idempotent: a second call while `is_cancelling` is already set is a
    /// silent no-op.
    pub async fn cancel(&self) {
        let already_cancelling = {
            let mut inner = self.inner.lock().unwrap();
            if inner.state.is_cancelling {
                true
            } else {
                inner.state.is_cancelling = true;
                false
            }
        };
        if already_cancelling {
            return;
        }

        let cancellable: Vec<Arc<dyn Item>> = {
            let inner = self.inner.lock().unwrap();
            inner
                .timeline
                .iter()
                .filter(|slot| {
                    matches!(
                        slot.status,
                        ItemStatus::Active | ItemStatus::Pending | ItemStatus::UserActionRequired
                    )
                })
                .map(|slot| slot.item.clone())
                .collect()
        };

        let mut joins = tokio::task::JoinSet::new();
        for item in cancellable {
            joins.spawn(async move { item.on_cancel().await });
        }
        while let Some(result) = joins.join_next().await {
            if let Err(err) = result {
                tracing::warn!(%err, "on_cancel hook panicked, ignoring");
            }
        }

        {
            let mut inner = self.inner.lock().unwrap();
            for slot in inner.timeline.iter_mut() {
                if !matches!(slot.status, ItemStatus::Complete | ItemStatus::Skipped) {
                    slot.status = ItemStatus::Cancelled;
                    slot.end_time = Some(Utc::now());
                }
            }
            inner.state.is_running = false;
            inner.state.is_paused = false;
            inner.state.end_time = Some(Utc::now());
        }
        self.flush_history(RunStatus::Cancelled).await;
        self.events.emit(EngineEvent::Cancelled);
    }

    pub async fn retry_item(&self, index: usize) -> Result<(), EngineError> {
        let item = {
            let inner = self.inner.lock().unwrap();
            inner.timeline.item_at(index).ok_or(EngineError::IndexOutOfBounds {
                index,
                len: inner.timeline.len(),
            })?
        };
        if !item.can_retry() {
            return Err(EngineError::CannotRetry {
                id: item.id().to_string(),
            });
        }
        let hook_item = item.clone();
        if let Err(message) = run_trapped(async move { hook_item.on_retry().await }).await {
            tracing::warn!(item_id = %item.id(), %message, "on_retry hook panicked, continuing");
        }
        let running = {
            let mut inner = self.inner.lock().unwrap();
            inner.state.current_index = index;
            inner.state.is_running
        };
        if running {
            self.execute_from(index).await;
        } else {
            self.resume().await;
        }
        Ok(())
    }

    pub async fn skip_item(&self, index: usize) -> Result<(), EngineError> {
        let item = {
            let inner = self.inner.lock().unwrap();
            inner.timeline.item_at(index).ok_or(EngineError::IndexOutOfBounds {
                index,
                len: inner.timeline.len(),
            })?
        };
        if !item.can_skip() {
            return Err(EngineError::CannotSkip {
                id: item.id().to_string(),
            });
        }
        let hook_item = item.clone();
        if let Err(message) = run_trapped(async move { hook_item.on_skip().await }).await {
            tracing::warn!(item_id = %item.id(), %message, "on_skip hook panicked, continuing");
        }

        let (is_current, running, paused) = {
            let mut inner = self.inner.lock().unwrap();
            if let Some(slot) = inner.timeline.get_mut(index) {
                slot.status = ItemStatus::Skipped;
                slot.end_time = Some(Utc::now());
            }
            let is_current = inner.state.current_index == index;
            if is_current {
                inner.state.current_index = index + 1;
            }
            (is_current, inner.state.is_running, inner.state.is_paused)
        };

        if is_current {
            if running {
                self.execute_from(index + 1).await;
            } else if paused {
                self.resume().await;
            }
        }
        Ok(())
    }

    pub async fn handle_user_action(&self, item_id: &str, action_id: &str) -> Result<(), EngineError> {
        let action = {
            let inner = self.inner.lock().unwrap();
            let pending = inner
                .pending_actions
                .get(item_id)
                .ok_or_else(|| EngineError::ItemNotFound { id: item_id.to_string() })?;
            pending
                .iter()
                .find(|candidate| candidate.id() == action_id)
                .cloned()
                .ok_or_else(|| EngineError::ActionNotFound {
                    item_id: item_id.to_string(),
                    action_id: action_id.to_string(),
                })?
        };

        let item_index = { self.inner.lock().unwrap().state.current_index };
        let applied_at = Utc::now();
        let call_action = action.clone();
        let outcome = match run_trapped(async move { call_action.execute().await }).await {
            Ok(outcome) => outcome,
            Err(message) => {
                {
                    let mut inner = self.inner.lock().unwrap();
                    inner.state.error = Some(message.clone());
                    inner.pending_actions.remove(item_id);
                }
                tracing::warn!(item_id, action_id, %message, "user action panicked");
                self.stop().await;
                return Ok(());
            }
        };

        let kind = match &outcome {
            ActionOutcome::Continue { .. } => ActionKind::Continue,
            ActionOutcome::Skip => ActionKind::Skip,
            ActionOutcome::Stop => ActionKind::Stop,
            ActionOutcome::Cancel => ActionKind::Cancel,
            ActionOutcome::Retry => ActionKind::Retry,
        };
        let record_data = match &outcome {
            ActionOutcome::Continue { data, .. } => data.clone(),
            _ => None,
        };

        {
            let mut inner = self.inner.lock().unwrap();
            inner.pending_actions.remove(item_id);
            if let Some(record) = inner
                .execution_history
                .iter_mut()
                .rev()
                .find(|record| record.item_id == item_id)
            {
                record.applied_actions.push(AppliedAction {
                    action_id: action_id.to_string(),
                    applied_at,
                    kind,
                    data: record_data,
                });
            }
        }

        match outcome {
            ActionOutcome::Continue { additional_items, data } => {
                let completed_item = {
                    let mut inner = self.inner.lock().unwrap();
                    if !additional_items.is_empty() {
                        inner.timeline.insert_after(item_index, additional_items);
                    }
                    // `data`, if set, already lives on the `AppliedAction`
                    // entry pushed above (`record_data`) — the record's own
                    // `result` is still the `UserActionRequired` variant the
                    // item returned, which has no `data` slot of its own to
                    // merge into, so there is nothing further to mutate here.
                    let _ = data;
                    if let Some(slot) = inner.timeline.get_mut(item_index) {
                        slot.status = ItemStatus::Complete;
                        slot.end_time = Some(Utc::now());
                    }
                    inner.state.current_index = item_index + 1;
                    inner.state.timeline_len = inner.timeline.len();
                    inner.timeline.item_at(item_index)
                };
                if let Some(item) = completed_item {
                    let result = {
                        let inner = self.inner.lock().unwrap();
                        inner
                            .execution_history
                            .iter()
                            .rev()
                            .find(|record| record.item_id == item_id)
                            .map(|record| record.result.clone())
                    };
                    if let Some(result) = result {
                        self.events.emit(EngineEvent::ItemCompleted { item, result });
                    }
                }
                self.continue_after_action(item_index + 1).await;
            }
            ActionOutcome::Skip => {
                let next_index = item_index + 1;
                let current_item = {
                    let mut inner = self.inner.lock().unwrap();
                    let item = inner.timeline.item_at(item_index);
                    if let Some(slot) = inner.timeline.get_mut(item_index) {
                        slot.status = ItemStatus::Complete;
                        slot.end_time = Some(Utc::now());
                    }
                    item
                };
                if let Some(item) = current_item {
                    // Same as the `continue` arm: the interactive item
                    // itself is "the current item" the user acknowledged,
                    // and §4.1 defines `skip` as "same as continue for the
                    // current item (mark complete...)" — that includes
                    // emitting its `item_completed`, not just the
                    // synthetically-skipped follow-up item's.
                    let result = {
                        let inner = self.inner.lock().unwrap();
                        inner
                            .execution_history
                            .iter()
                            .rev()
                            .find(|record| record.item_id == item_id)
                            .map(|record| record.result.clone())
                    };
                    if let Some(result) = result {
                        self.events.emit(EngineEvent::ItemCompleted { item, result });
                    }
                }
                let skipped = {
                    let mut inner = self.inner.lock().unwrap();
                    let item = inner.timeline.item_at(next_index);
                    if let Some(slot) = inner.timeline.get_mut(next_index) {
                        slot.status = ItemStatus::Skipped;
                        slot.start_time = Some(Utc::now());
                        slot.end_time = Some(Utc::now());
                    }
                    item
                };
                let advance_to = match skipped {
                    Some(item) => {
                        let record = ExecutionRecord::placeholder(
                            item.id().to_string(),
                            item.title().to_string(),
                        );
                        let result = record.result.clone();
                        {
                            self.inner.lock().unwrap().execution_history.push(record);
                        }
                        self.events.emit(EngineEvent::ItemCompleted { item, result });
                        next_index + 1
                    }
                    None => next_index,
                };
                {
                    self.inner.lock().unwrap().state.current_index = advance_to;
                }
                self.continue_after_action(advance_to).await;
            }
            ActionOutcome::Stop => self.stop().await,
            ActionOutcome::Cancel => self.cancel().await,
            ActionOutcome::Retry => {
                self.retry_item(item_index).await?;
            }
        }
        Ok(())
    }

    async fn continue_after_action(&self, index: usize) {
        let (running, paused) = {
            let inner = self.inner.lock().unwrap();
            (inner.state.is_running, inner.state.is_paused)
        };
        if paused {
            self.resume().await;
        } else if running {
            self.execute_from(index).await;
        }
    }

    async fn execute_from(&self, mut index: usize) {
        loop {
            let (len, paused, running) = {
                let inner = self.inner.lock().unwrap();
                (inner.timeline.len(), inner.state.is_paused, inner.state.is_running)
            };
            if paused || !running {
                return;
            }
            if index >= len {
                self.complete().await;
                return;
            }
            if !self.execute_one(index).await {
                return;
            }
            index += 1;
            if self.config.yield_between_items {
                tokio::task::yield_now().await;
            }
        }
    }

    /// Execute the single item at `index` and dispatch its outcome.
    /// Returns whether the drive loop should continue to `index + 1`.
    async fn execute_one(&self, index: usize) -> bool {
        let (item, item_id, item_title) = {
            let mut inner = self.inner.lock().unwrap();
            let Some(slot) = inner.timeline.get_mut(index) else {
                return false;
            };
            slot.status = ItemStatus::Active;
            slot.start_time = Some(Utc::now());
            let item = slot.item.clone();
            let item_id = item.id().to_string();
            let item_title = item.title().to_string();
            inner
                .execution_history
                .push(ExecutionRecord::placeholder(item_id.clone(), item_title.clone()));
            (item, item_id, item_title)
        };

        self.events.emit(EngineEvent::ItemStarted { item: item.clone() });
        tracing::info!(item_id = %item_id, item_title = %item_title, "item started");

        let call_item = item.clone();
        let ctx = self.context();
        let started_at = std::time::Instant::now();
        let outcome = match run_trapped(async move { call_item.execute(&ctx).await }).await {
            Ok(outcome) => outcome,
            Err(message) => ExecutionOutcome::Error { error: message },
        };
        let elapsed_ms = started_at.elapsed().as_millis() as u64;

        match outcome {
            ExecutionOutcome::Success {
                data,
                ui_content,
                next_items,
                pause_workflow,
            } => {
                let recorded = RecordedOutcome::Success {
                    data,
                    ui_content,
                    pause_workflow,
                };
                let still_live = {
                    let mut inner = self.inner.lock().unwrap();
                    if let Some(record) = inner
                        .execution_history
                        .iter_mut()
                        .rev()
                        .find(|record| record.item_id == item_id)
                    {
                        record.result = recorded.clone();
                        record.execution_time_ms = elapsed_ms;
                    }
                    // `cancel()` may have already marked this slot `Cancelled`
                    // (and halted the run) while `execute` was still in
                    // flight. Per §5, a result that resolves after cancel has
                    // run is recorded but must not flip a terminal status
                    // back to `Complete` or advance `current_index`.
                    let still_live = !inner.state.is_cancelling;
                    if still_live {
                        if let Some(slot) = inner.timeline.get_mut(index) {
                            slot.status = ItemStatus::Complete;
                            slot.end_time = Some(Utc::now());
                        }
                        if !next_items.is_empty() {
                            inner.timeline.insert_after(index, next_items);
                        }
                        inner.state.current_index = index + 1;
                        inner.state.timeline_len = inner.timeline.len();
                    }
                    still_live
                };
                if !still_live {
                    tracing::debug!(item_id = %item_id, "item resolved success after cancel, result recorded without advancing");
                    return false;
                }
                self.events.emit(EngineEvent::ItemCompleted {
                    item: item.clone(),
                    result: recorded,
                });
                tracing::info!(item_id = %item_id, "item completed");
                if pause_workflow {
                    self.pause();
                    false
                } else {
                    true
                }
            }
            ExecutionOutcome::Error { error } => {
                let still_live = {
                    let mut inner = self.inner.lock().unwrap();
                    if let Some(record) = inner
                        .execution_history
                        .iter_mut()
                        .rev()
                        .find(|record| record.item_id == item_id)
                    {
                        record.result = RecordedOutcome::Error { error: error.clone() };
                        record.execution_time_ms = elapsed_ms;
                    }
                    // Same §5 guard as the success branch: don't flip an
                    // already-`Cancelled` slot to `Error`, record the error
                    // and stop there.
                    let still_live = !inner.state.is_cancelling;
                    if still_live {
                        if let Some(slot) = inner.timeline.get_mut(index) {
                            slot.status = ItemStatus::Error;
                            slot.end_time = Some(Utc::now());
                        }
                        inner.state.error = Some(error.clone());
                    }
                    still_live
                };
                if !still_live {
                    tracing::debug!(item_id = %item_id, %error, "item resolved error after cancel, result recorded without advancing");
                    return false;
                }
                self.events.emit(EngineEvent::ItemError {
                    item: item.clone(),
                    message: error.clone(),
                });
                tracing::warn!(item_id = %item_id, error = %error, "item failed");
                self.stop().await;
                false
            }
            ExecutionOutcome::UserActionRequired {
                ui_content,
                actions,
                pause_workflow,
            } => {
                let descriptors: Vec<UserActionDescriptor> =
                    actions.iter().map(|action| action.descriptor()).collect();
                let recorded = RecordedOutcome::UserActionRequired {
                    ui_content,
                    actions: descriptors,
                    pause_workflow,
                };
                {
                    let mut inner = self.inner.lock().unwrap();
                    if let Some(record) = inner
                        .execution_history
                        .iter_mut()
                        .rev()
                        .find(|record| record.item_id == item_id)
                    {
                        record.result = recorded.clone();
                        record.execution_time_ms = elapsed_ms;
                    }
                    if let Some(slot) = inner.timeline.get_mut(index) {
                        slot.status = ItemStatus::UserActionRequired;
                    }
                    inner.pending_actions.insert(item_id.clone(), actions);
                }
                self.events.emit(EngineEvent::UserActionRequired {
                    item: item.clone(),
                    result: recorded,
                });
                tracing::info!(item_id = %item_id, "item awaiting user action");
                if pause_workflow {
                    self.pause();
                }
                false
            }
        }
    }

    async fn complete(&self) {
        {
            let mut inner = self.inner.lock().unwrap();
            inner.state.is_running = false;
            inner.state.is_complete = true;
            inner.state.end_time = Some(Utc::now());
        }
        self.flush_history(RunStatus::Finished).await;
        self.events.emit(EngineEvent::Completed);
    }

    /// Called by `Context::emit_progress`, kept as an associated function
    /// (rather than a `&self` method) so `Context` can invoke it without
    /// holding a whole `Engine` clone, just the `Inner`/`EventBus` it shares.
    pub(crate) fn emit_progress_for(
        inner: &Arc<Mutex<Inner>>,
        events: &Arc<EventBus>,
        item_id: &str,
        data: Value,
    ) {
        let item = {
            let mut guard = inner.lock().unwrap();
            let guard_ok = guard
                .execution_history
                .iter()
                .rev()
                .find(|record| record.item_id == item_id)
                .map(|record| matches!(record.result, RecordedOutcome::Success { .. }) && record.applied_actions.is_empty())
                .unwrap_or(false);
            if !guard_ok {
                return;
            }
            if let Some(record) = guard
                .execution_history
                .iter_mut()
                .rev()
                .find(|record| record.item_id == item_id)
            {
                if let RecordedOutcome::Success { ui_content, pause_workflow, .. } = &record.result {
                    record.result = RecordedOutcome::Success {
                        data: Some(data.clone()),
                        ui_content: ui_content.clone(),
                        pause_workflow: *pause_workflow,
                    };
                }
            }
            guard.timeline.find_index_by_id(item_id).and_then(|index| guard.timeline.item_at(index))
        };
        if let Some(item) = item {
            events.emit(EngineEvent::ItemProgress { item, data });
        }
    }

    pub fn get_timeline(&self) -> Vec<TimelineItemSnapshot> {
        let inner = self.inner.lock().unwrap();
        inner
            .timeline
            .iter()
            .map(|slot| TimelineItemSnapshot {
                id: slot.item.id().to_string(),
                title: slot.item.title().to_string(),
                description: slot.item.description().to_string(),
                status: slot.status,
                start_time: slot.start_time,
                end_time: slot.end_time,
            })
            .collect()
    }

    pub fn get_execution_history(&self) -> Vec<ExecutionRecord> {
        self.inner.lock().unwrap().execution_history.clone()
    }

    pub fn get_state(&self) -> EngineState {
        self.inner.lock().unwrap().state.clone()
    }

    pub fn get_current_item(&self) -> Option<Arc<dyn Item>> {
        let inner = self.inner.lock().unwrap();
        inner.timeline.item_at(inner.state.current_index)
    }

    pub fn get_current_index(&self) -> usize {
        self.inner.lock().unwrap().state.current_index
    }

    /// Percentage (0.0-100.0) of items at indices `< current_index` whose
    /// status is `complete` or `skipped`, or `0.0` for an empty timeline
    /// . Items at or beyond `current_index` never count,
    /// even if somehow already terminal (property 7).
    pub fn get_progress(&self) -> f64 {
        let inner = self.inner.lock().unwrap();
        if inner.timeline.is_empty() {
            return 0.0;
        }
        let current_index = inner.state.current_index;
        let done = inner
            .timeline
            .iter()
            .enumerate()
            .filter(|(i, slot)| {
                *i < current_index && matches!(slot.status, ItemStatus::Complete | ItemStatus::Skipped)
            })
            .count();
        (done as f64 / inner.timeline.len() as f64) * 100.0
    }

    /// Clears the timeline, execution history, and pending actions and
    /// resets engine-level state to its idle default — after this call the
    /// caller must re-add items before `start`ing again.
    pub fn reset(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.timeline.clear();
        inner.execution_history.clear();
        inner.pending_actions.clear();
        inner.context_values.clear();
        inner.state = EngineState::default();
        inner.history_entry = None;
    }
}
