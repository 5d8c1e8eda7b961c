use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use hdrscope_core::error::{HdrscopeError, Result};
use hdrscope_core::progress::{CancelToken, ProgressHub, ProgressKind};

#[test]
fn test_emit_reaches_subscribers_of_kind_only() {
    let hub = ProgressHub::new();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let _token = hub.subscribe(ProgressKind::Export, move |pct| {
        sink.lock().expect("sink").push(pct);
    });

    hub.emit(ProgressKind::Export, 10);
    hub.emit(ProgressKind::Open, 99); // different kind — not delivered
    hub.emit(ProgressKind::Export, 50);

    assert_eq!(*seen.lock().expect("sink"), vec![10, 50]);
}

#[test]
fn test_percent_clamped_to_hundred() {
    let hub = ProgressHub::new();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let _token = hub.subscribe(ProgressKind::Video, move |pct| {
        sink.lock().expect("sink").push(pct);
    });
    hub.emit(ProgressKind::Video, 250);
    assert_eq!(*seen.lock().expect("sink"), vec![100]);
}

#[test]
fn test_token_drop_unsubscribes() {
    let hub = ProgressHub::new();
    let count = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&count);
    let token = hub.subscribe(ProgressKind::Open, move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    assert_eq!(hub.listener_count(ProgressKind::Open), 1);

    hub.emit(ProgressKind::Open, 1);
    drop(token);
    hub.emit(ProgressKind::Open, 2);

    assert_eq!(count.load(Ordering::SeqCst), 1);
    assert_eq!(hub.listener_count(ProgressKind::Open), 0);
}

#[test]
fn test_release_happens_when_guarded_operation_fails() {
    let hub = ProgressHub::new();

    fn guarded(hub: &ProgressHub) -> Result<()> {
        let _token = hub.subscribe(ProgressKind::Sequence, |_| {});
        Err(HdrscopeError::from_engine("seq_fps cancelled"))
    }

    let err = guarded(&hub).expect_err("operation fails");
    assert!(err.is_cancelled());
    assert_eq!(
        hub.listener_count(ProgressKind::Sequence),
        0,
        "exactly one unsubscribe per subscription, on every exit path"
    );
}

#[test]
fn test_independent_subscriptions_release_independently() {
    let hub = ProgressHub::new();
    let a = hub.subscribe(ProgressKind::Export, |_| {});
    let b = hub.subscribe(ProgressKind::Export, |_| {});
    assert_eq!(hub.listener_count(ProgressKind::Export), 2);
    drop(a);
    assert_eq!(hub.listener_count(ProgressKind::Export), 1);
    drop(b);
    assert_eq!(hub.listener_count(ProgressKind::Export), 0);
}

// ---------------------------------------------------------------------------
// Cancellation
// ---------------------------------------------------------------------------

#[test]
fn test_cancel_token_shared_across_clones() {
    let token = CancelToken::new();
    let clone = token.clone();
    assert!(!clone.is_cancelled());
    token.cancel();
    assert!(clone.is_cancelled());
}

#[test]
fn test_cancelled_marker_classification() {
    assert!(HdrscopeError::from_engine("open cancelled by user").is_cancelled());
    assert!(!HdrscopeError::from_engine("file not found").is_cancelled());
}
