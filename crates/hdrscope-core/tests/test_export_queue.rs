mod common;

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use hdrscope_core::command::EngineRequest;
use hdrscope_core::controller::Controller;
use hdrscope_core::error::HdrscopeError;
use hdrscope_core::export::{ExportQueue, ExportQueueEvent, ExportStatus, output_path_for};
use hdrscope_core::gateway::Gateway;
use hdrscope_core::progress::{ProgressHub, ProgressKind};

use common::{preview_happy_path, StubBridge};

fn controller_with(bridge: StubBridge) -> (Controller, Arc<StubBridge>) {
    let bridge = Arc::new(bridge);
    let gateway = Arc::new(Gateway::new());
    gateway.attach(bridge.clone());
    (Controller::new(gateway, ProgressHub::new()), bridge)
}

fn collect_events() -> (
    Arc<Mutex<Vec<ExportQueueEvent>>>,
    impl Fn(ExportQueueEvent) + Send + Clone + 'static,
) {
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);
    let emit = move |event| sink.lock().expect("event sink").push(event);
    (events, emit)
}

// ---------------------------------------------------------------------------
// Queue state machine
// ---------------------------------------------------------------------------

#[test]
fn test_output_path_substitutes_extension() {
    assert_eq!(
        output_path_for(&PathBuf::from("/shots/A.exr")),
        PathBuf::from("/shots/A.png")
    );
    assert_eq!(
        output_path_for(&PathBuf::from("/shots/B.EXR")),
        PathBuf::from("/shots/B.png")
    );
}

#[test]
fn test_enqueue_keeps_fifo_order() {
    let mut queue = ExportQueue::new();
    let first = queue.enqueue(PathBuf::from("a.exr"));
    let second = queue.enqueue(PathBuf::from("b.exr"));
    assert!(first < second);

    let batch = queue.pending_batch();
    assert_eq!(batch.len(), 2);
    assert_eq!(batch[0].id, first);
    assert_eq!(batch[1].id, second);
}

#[test]
fn test_terminal_tasks_leave_live_view() {
    let mut queue = ExportQueue::new();
    let id = queue.enqueue(PathBuf::from("a.exr"));

    queue.apply(ExportQueueEvent::Started { id });
    assert_eq!(queue.tasks()[0].status, ExportStatus::Running);

    queue.apply(ExportQueueEvent::Progress { id, percent: 40 });
    assert_eq!(queue.tasks()[0].progress, 40);

    queue.apply(ExportQueueEvent::Finished {
        id,
        status: ExportStatus::Completed,
    });
    assert!(queue.is_empty());
}

#[test]
fn test_request_cancel_reports_status_at_request_time() {
    let mut queue = ExportQueue::new();
    let id = queue.enqueue(PathBuf::from("a.exr"));
    assert_eq!(queue.request_cancel(id), Some(ExportStatus::Pending));
    assert!(queue.tasks()[0].cancel.is_cancelled());
    assert_eq!(queue.request_cancel(999), None);
}

// ---------------------------------------------------------------------------
// Batch processing through the controller
// ---------------------------------------------------------------------------

#[test]
fn test_tasks_run_strictly_one_at_a_time() {
    let (controller, bridge) = controller_with(StubBridge::new(preview_happy_path));
    let mut queue = ExportQueue::new();
    queue.enqueue(PathBuf::from("a.exr"));
    queue.enqueue(PathBuf::from("b.exr"));
    let batch = queue.pending_batch();

    let (events, emit) = collect_events();
    controller.process_exports(&batch, emit).expect("bridge attached");

    // Task 2 starts only after task 1 reached a terminal state
    let log = events.lock().expect("event sink").clone();
    let first_finish = log
        .iter()
        .position(|e| matches!(e, ExportQueueEvent::Finished { id: 1, .. }))
        .expect("task 1 finished");
    let second_start = log
        .iter()
        .position(|e| matches!(e, ExportQueueEvent::Started { id: 2 }))
        .expect("task 2 started");
    assert!(first_finish < second_start);

    // Each task is one open followed by one export
    assert_eq!(
        bridge.call_names(),
        vec!["open_image", "export_preview_png", "open_image", "export_preview_png"]
    );
}

#[test]
fn test_cancel_pending_task_skips_engine_entirely() {
    // Enqueue 3, cancel #2 while #1 is running, expect: #1 completes,
    // #2 is removed without invoking export, #3 runs next.
    let (controller, bridge) = controller_with(StubBridge::new(preview_happy_path));
    let mut queue = ExportQueue::new();
    queue.enqueue(PathBuf::from("a.exr"));
    let second = queue.enqueue(PathBuf::from("b.exr"));
    queue.enqueue(PathBuf::from("c.exr"));
    let batch = queue.pending_batch();

    let cancel_second = batch[1].cancel.clone();
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);
    let emit = move |event: ExportQueueEvent| {
        // Cancel #2 the moment #1 starts running
        if matches!(event, ExportQueueEvent::Started { id: 1 }) {
            cancel_second.cancel();
        }
        sink.lock().expect("event sink").push(event);
    };

    controller.process_exports(&batch, emit).expect("bridge attached");

    let log = events.lock().expect("event sink").clone();
    assert!(log.contains(&ExportQueueEvent::Finished {
        id: 1,
        status: ExportStatus::Completed
    }));
    assert!(log.contains(&ExportQueueEvent::Finished {
        id: second,
        status: ExportStatus::Cancelled
    }));
    assert!(!log.contains(&ExportQueueEvent::Started { id: second }));
    assert!(log.contains(&ExportQueueEvent::Finished {
        id: 3,
        status: ExportStatus::Completed
    }));

    // Only tasks 1 and 3 touched the engine
    assert_eq!(bridge.call_names().len(), 4);
}

#[test]
fn test_failed_task_does_not_halt_queue() {
    let (controller, _bridge) = controller_with(StubBridge::new(|request| match request {
        EngineRequest::OpenImage(open) if open.path.ends_with("bad.exr") => {
            Err(HdrscopeError::from_engine("file not found"))
        }
        other => preview_happy_path(other),
    }));
    let mut queue = ExportQueue::new();
    queue.enqueue(PathBuf::from("bad.exr"));
    queue.enqueue(PathBuf::from("good.exr"));
    let batch = queue.pending_batch();

    let (events, emit) = collect_events();
    controller.process_exports(&batch, emit).expect("bridge attached");

    let log = events.lock().expect("event sink").clone();
    assert!(log.contains(&ExportQueueEvent::Finished {
        id: 1,
        status: ExportStatus::Failed
    }));
    assert!(log.contains(&ExportQueueEvent::Finished {
        id: 2,
        status: ExportStatus::Completed
    }));
}

#[test]
fn test_cancelled_engine_rejection_is_expected_outcome() {
    let (controller, _bridge) = controller_with(StubBridge::new(|request| match request {
        EngineRequest::OpenImage(_) => Err(HdrscopeError::from_engine("decode cancelled")),
        other => preview_happy_path(other),
    }));
    let mut queue = ExportQueue::new();
    queue.enqueue(PathBuf::from("a.exr"));
    let batch = queue.pending_batch();

    let (events, emit) = collect_events();
    controller.process_exports(&batch, emit).expect("bridge attached");

    assert!(events.lock().expect("event sink").contains(&ExportQueueEvent::Finished {
        id: 1,
        status: ExportStatus::Cancelled
    }));
}

#[test]
fn test_progress_events_forward_to_task_and_release() {
    let hub = ProgressHub::new();
    let emitting_hub = hub.clone();
    let bridge = Arc::new(StubBridge::new(move |request| {
        if matches!(request, EngineRequest::OpenImage(_)) {
            emitting_hub.emit(ProgressKind::Export, 42);
        }
        preview_happy_path(request)
    }));
    let gateway = Arc::new(Gateway::new());
    gateway.attach(bridge.clone());
    let controller = Controller::new(gateway, hub.clone());

    let mut queue = ExportQueue::new();
    queue.enqueue(PathBuf::from("a.exr"));
    let batch = queue.pending_batch();

    let (events, emit) = collect_events();
    controller.process_exports(&batch, emit).expect("bridge attached");

    assert!(events
        .lock()
        .expect("event sink")
        .contains(&ExportQueueEvent::Progress { id: 1, percent: 42 }));
    assert_eq!(
        hub.listener_count(ProgressKind::Export),
        0,
        "per-task progress subscription released"
    );
}

#[test]
fn test_no_bridge_short_circuits_batch() {
    let controller = Controller::new(Arc::new(Gateway::new()), ProgressHub::new());
    let mut queue = ExportQueue::new();
    queue.enqueue(PathBuf::from("a.exr"));
    let (events, emit) = collect_events();

    let err = controller
        .process_exports(&queue.pending_batch(), emit)
        .expect_err("no bridge attached");
    assert!(matches!(err, HdrscopeError::BridgeUnavailable));
    assert!(events.lock().expect("event sink").is_empty());
}
