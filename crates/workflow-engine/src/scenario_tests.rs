//! End-to-end scenarios over a live `Engine`, one test per scenario. Each
//! walks the engine through a realistic timeline rather than exercising a
//! single method in isolation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use workflow_types::ItemStatus;

use crate::action::ActionOutcome;
use crate::config::EngineConfig;
use crate::engine::Engine;
use crate::item::{ExecutionOutcome, Item};
use crate::test_support::{AwaitingItem, StubAction, StubItem};

fn item_status(engine: &Engine, id: &str) -> Option<ItemStatus> {
    engine
        .get_timeline()
        .into_iter()
        .find(|snapshot| snapshot.id == id)
        .map(|snapshot| snapshot.status)
}

/// S1: three-step happy path runs start to finish in order, with every item
/// landing `complete` and the engine reporting 100% progress.
#[tokio::test]
async fn s1_three_step_happy_path_completes_in_order() {
    let engine = Engine::with_items(
        vec![StubItem::arc("a"), StubItem::arc("b"), StubItem::arc("c")],
        EngineConfig::new(),
    );

    engine.start().await.expect("start");

    let state = engine.get_state();
    assert!(state.is_complete);
    assert!(!state.is_running);
    assert_eq!(engine.get_progress(), 100.0);
    for id in ["a", "b", "c"] {
        assert_eq!(item_status(&engine, id), Some(ItemStatus::Complete));
    }
}

/// S2: an item's outcome injects more items into the timeline (`next_items`)
/// immediately after its own position, and the engine drives straight into
/// them without the caller re-calling `start`.
#[tokio::test]
async fn s2_mid_workflow_injection_splices_and_continues() {
    let injected: Arc<dyn Item> = StubItem::arc("b-injected");
    let first = StubItem::with_outcome("a", {
        let injected = injected.clone();
        move || ExecutionOutcome::Success {
            data: None,
            ui_content: None,
            next_items: vec![injected.clone()],
            pause_workflow: false,
        }
    });
    let engine = Engine::with_items(vec![first, StubItem::arc("c")], EngineConfig::new());

    engine.start().await.expect("start");

    let timeline = engine.get_timeline();
    let ids: Vec<&str> = timeline.iter().map(|snapshot| snapshot.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b-injected", "c"]);
    for id in ids {
        assert_eq!(item_status(&engine, id), Some(ItemStatus::Complete));
    }
    assert!(engine.get_state().is_complete);
}

/// S3: an item pauses on a user-action decision point; resolving it with
/// `Continue` advances the timeline and the run completes.
#[tokio::test]
async fn s3_interactive_pause_then_continue_completes() {
    let action = StubAction::arc("go", || ActionOutcome::continue_with(Vec::new(), None));
    let decision = StubItem::with_outcome("decision", move || ExecutionOutcome::UserActionRequired {
        ui_content: None,
        actions: vec![action.clone()],
        pause_workflow: true,
    });
    let engine = Engine::with_items(vec![decision, StubItem::arc("after")], EngineConfig::new());

    engine.start().await.expect("start");
    assert_eq!(item_status(&engine, "decision"), Some(ItemStatus::UserActionRequired));
    assert!(engine.get_state().is_paused);

    engine.handle_user_action("decision", "go").await.expect("handle_user_action");

    assert_eq!(item_status(&engine, "decision"), Some(ItemStatus::Complete));
    assert_eq!(item_status(&engine, "after"), Some(ItemStatus::Complete));
    assert!(engine.get_state().is_complete);
}

/// S4: resolving a decision point with `Skip` completes the decision item
/// and marks the very next item `skipped` without executing it, then resumes
/// driving the timeline forward.
#[tokio::test]
async fn s4_interactive_skip_next_skips_without_executing() {
    let skip_target_calls = Arc::new(Mutex::new(0usize));
    let skip_target_calls_clone = skip_target_calls.clone();
    let skip_target = StubItem::with_outcome("skip-target", move || {
        *skip_target_calls_clone.lock().unwrap() += 1;
        ExecutionOutcome::success()
    });

    let decision = StubItem::with_outcome("decision", || ExecutionOutcome::UserActionRequired {
        ui_content: None,
        actions: vec![StubAction::arc("skip", || ActionOutcome::Skip)],
        pause_workflow: true,
    });
    let engine = Engine::with_items(
        vec![decision, skip_target, StubItem::arc("after")],
        EngineConfig::new(),
    );

    engine.start().await.expect("start");
    engine.handle_user_action("decision", "skip").await.expect("handle_user_action");

    assert_eq!(*skip_target_calls.lock().unwrap(), 0);
    assert_eq!(item_status(&engine, "skip-target"), Some(ItemStatus::Skipped));
    assert_eq!(item_status(&engine, "after"), Some(ItemStatus::Complete));
    assert!(engine.get_state().is_complete);
}

/// S5: an item that fails halts the run with `stop()` semantics — the
/// failing item is `error`, nothing after it ever starts, and the engine is
/// left not-running and not-complete.
#[tokio::test]
async fn s5_failure_halts_the_run() {
    let after_calls = Arc::new(Mutex::new(0usize));
    let after_calls_clone = after_calls.clone();
    let failing = StubItem::with_outcome("failing", || ExecutionOutcome::error("boom"));
    let after = StubItem::with_outcome("after", move || {
        *after_calls_clone.lock().unwrap() += 1;
        ExecutionOutcome::success()
    });
    let engine = Engine::with_items(vec![StubItem::arc("a"), failing, after], EngineConfig::new());

    engine.start().await.expect("start");

    assert_eq!(item_status(&engine, "a"), Some(ItemStatus::Complete));
    assert_eq!(item_status(&engine, "failing"), Some(ItemStatus::Error));
    assert_eq!(item_status(&engine, "after"), Some(ItemStatus::Pending));
    assert_eq!(*after_calls.lock().unwrap(), 0);
    let state = engine.get_state();
    assert!(!state.is_running);
    assert!(!state.is_complete);
    assert!(state.error.is_some());
}

/// S6: cancelling while an item is still in flight runs that item's
/// `on_cancel` hook and marks every non-terminal item `cancelled` right
/// away — `cancel()` does not wait for the in-flight item's `execute()` to
/// ever resolve, since `execute()` never will here (the release signal is
/// never fired).
#[tokio::test]
async fn s6_cancel_during_in_flight_runs_on_cancel_and_marks_cancelled() {
    let (awaiting, _release, cancelled) = AwaitingItem::new("awaiting");
    let engine = Engine::with_items(
        vec![awaiting, StubItem::arc("never-reached")],
        EngineConfig::new(),
    );

    let started = Arc::new(tokio::sync::Notify::new());
    let started_clone = started.clone();
    engine.on(workflow_types::EventKind::ItemStarted, move |_| {
        started_clone.notify_one();
    });

    let drive = {
        let engine = engine.clone();
        tokio::spawn(async move {
            let _ = engine.start().await;
        })
    };
    started.notified().await;

    engine.cancel().await;

    assert!(cancelled.load(Ordering::SeqCst));
    assert_eq!(item_status(&engine, "awaiting"), Some(ItemStatus::Cancelled));
    assert_eq!(item_status(&engine, "never-reached"), Some(ItemStatus::Cancelled));
    let state = engine.get_state();
    assert!(!state.is_running);
    assert!(state.end_time.is_some());

    // `awaiting`'s `execute()` is permanently pending; the drive task that
    // polls it is left stuck rather than resolved by cancellation.
    drive.abort();
}

/// S7: an item's `execute()` resolving *after* `cancel()` has already run
/// and marked it `cancelled` must not flip that status back to `complete`
/// or move `current_index` — the result is recorded and nothing else.
#[tokio::test]
async fn s7_resolve_after_cancel_does_not_revive_the_item() {
    let (awaiting, release, _cancelled) = AwaitingItem::new("awaiting");
    let engine = Engine::with_items(vec![awaiting, StubItem::arc("never-reached")], EngineConfig::new());

    let started = Arc::new(tokio::sync::Notify::new());
    let started_clone = started.clone();
    engine.on(workflow_types::EventKind::ItemStarted, move |_| {
        started_clone.notify_one();
    });
    let completed_after_cancel = Arc::new(AtomicBool::new(false));
    let completed_after_cancel_clone = completed_after_cancel.clone();
    engine.on(workflow_types::EventKind::ItemCompleted, move |_| {
        completed_after_cancel_clone.store(true, Ordering::SeqCst);
    });

    let drive = {
        let engine = engine.clone();
        tokio::spawn(async move {
            let _ = engine.start().await;
        })
    };
    started.notified().await;

    engine.cancel().await;
    assert_eq!(item_status(&engine, "awaiting"), Some(ItemStatus::Cancelled));
    let index_after_cancel = engine.get_current_index();

    release.notify_one();
    drive.await.expect("drive task");

    assert_eq!(item_status(&engine, "awaiting"), Some(ItemStatus::Cancelled));
    assert_eq!(engine.get_current_index(), index_after_cancel);
    assert!(!completed_after_cancel.load(Ordering::SeqCst));

    let record = engine
        .get_execution_history()
        .into_iter()
        .find(|record| record.item_id == "awaiting")
        .expect("execution record for awaiting");
    assert!(matches!(record.result, workflow_types::RecordedOutcome::Success { .. }));
}

/// S8: resolving a decision point with `Skip` emits `item_completed` for
/// the acknowledged interactive item itself, not just for the
/// synthetically-skipped item after it.
#[tokio::test]
async fn s8_interactive_skip_emits_item_completed_for_current_item() {
    let decision = StubItem::with_outcome("decision", || ExecutionOutcome::UserActionRequired {
        ui_content: None,
        actions: vec![StubAction::arc("skip", || ActionOutcome::Skip)],
        pause_workflow: true,
    });
    let engine = Engine::with_items(
        vec![decision, StubItem::arc("skip-target"), StubItem::arc("after")],
        EngineConfig::new(),
    );

    let completed_ids = Arc::new(Mutex::new(Vec::new()));
    let completed_ids_clone = completed_ids.clone();
    engine.on(workflow_types::EventKind::ItemCompleted, move |event| {
        if let crate::events::EngineEvent::ItemCompleted { item, .. } = event {
            completed_ids_clone.lock().unwrap().push(item.id().to_string());
        }
    });

    engine.start().await.expect("start");
    engine.handle_user_action("decision", "skip").await.expect("handle_user_action");

    let completed_ids = completed_ids.lock().unwrap().clone();
    assert!(completed_ids.contains(&"decision".to_string()));
    assert!(completed_ids.contains(&"skip-target".to_string()));
}

/// Property 4: the placeholder record for an item exists at the moment its
/// `item_started` handler runs, and `get_execution_history()` is empty
/// before the run begins.
#[tokio::test]
async fn property4_execution_record_exists_once_item_started_fires() {
    let engine = Engine::with_items(vec![StubItem::arc("a")], EngineConfig::new());
    assert!(engine.get_execution_history().is_empty());

    let found = Arc::new(Mutex::new(false));
    let found_clone = found.clone();
    let engine_for_handler = engine.clone();
    engine.on(workflow_types::EventKind::ItemStarted, move |_event| {
        let has_record = engine_for_handler
            .get_execution_history()
            .iter()
            .any(|record| record.item_id == "a");
        *found_clone.lock().unwrap() = has_record;
    });

    engine.start().await.expect("start");
    assert!(*found.lock().unwrap());
}

/// Property 7: `getProgress()` samples taken after each `item_completed`
/// never decrease and never count the currently-active item, reaching
/// 100% only once every item has been driven past.
#[tokio::test]
async fn property7_progress_excludes_current_item_and_never_decreases() {
    let engine = Engine::with_items(
        vec![StubItem::arc("a"), StubItem::arc("b"), StubItem::arc("c")],
        EngineConfig::new(),
    );
    let samples = Arc::new(Mutex::new(Vec::new()));
    let samples_clone = samples.clone();
    let engine_for_handler = engine.clone();
    engine.on(workflow_types::EventKind::ItemCompleted, move |_event| {
        samples_clone.lock().unwrap().push(engine_for_handler.get_progress());
    });

    engine.start().await.expect("start");

    let samples = samples.lock().unwrap().clone();
    assert_eq!(samples.len(), 3);
    assert!(
        workflow_history::invariants::progress::check_progress_monotonic(&samples).is_empty()
    );
    assert_eq!(*samples.last().unwrap(), 100.0);
}
