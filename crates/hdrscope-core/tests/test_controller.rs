mod common;

use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use hdrscope_core::command::{EngineRequest, EngineResponse, TransformPreset};
use hdrscope_core::controller::Controller;
use hdrscope_core::error::HdrscopeError;
use hdrscope_core::gateway::Gateway;
use hdrscope_core::preview::PreviewState;
use hdrscope_core::progress::{ProgressHub, ProgressKind};
use hdrscope_core::raster::Raster;
use hdrscope_core::sequence::RequestSequencer;

use common::{preview_happy_path, png_blob, StubBridge};

fn ready_controller(bridge: StubBridge) -> (Controller, Arc<StubBridge>, ProgressHub) {
    let bridge = Arc::new(bridge);
    let gateway = Arc::new(Gateway::new());
    gateway.attach(bridge.clone());
    let hub = ProgressHub::new();
    (Controller::new(gateway, hub.clone()), bridge, hub)
}

fn preset(label: &str, size: Option<u32>) -> TransformPreset {
    TransformPreset {
        label: label.to_owned(),
        group: None,
        src_space: "acescg".to_owned(),
        src_tf: "linear".to_owned(),
        dst_space: "srgb".to_owned(),
        dst_tf: "srgb".to_owned(),
        size,
    }
}

// ---------------------------------------------------------------------------
// Gateway readiness
// ---------------------------------------------------------------------------

#[test]
fn test_ensure_ready_times_out_without_host() {
    let gateway = Gateway::new();
    assert!(!gateway.ensure_ready(Duration::from_millis(120)));
    assert!(gateway.bridge().is_none());
}

#[test]
fn test_ensure_ready_resolves_late_attachment() {
    let gateway = Arc::new(Gateway::new());
    let injector = Arc::clone(&gateway);
    let handle = std::thread::spawn(move || {
        std::thread::sleep(Duration::from_millis(80));
        injector.attach(Arc::new(StubBridge::new(preview_happy_path)));
    });

    assert!(gateway.ensure_ready(Duration::from_secs(2)));
    assert!(gateway.is_ready());
    handle.join().expect("injector thread");
}

#[test]
fn test_operations_short_circuit_without_bridge() {
    let controller = Controller::new(Arc::new(Gateway::new()), ProgressHub::new());
    let err = controller
        .probe_pixel(1, 1)
        .expect_err("no bridge attached");
    assert!(matches!(err, HdrscopeError::BridgeUnavailable));
}

// ---------------------------------------------------------------------------
// Open / update
// ---------------------------------------------------------------------------

#[test]
fn test_open_decodes_raster_and_refreshes_scopes() {
    let (controller, bridge, _hub) = ready_controller(StubBridge::new(preview_happy_path));
    let update = controller
        .open_image(Path::new("a.exr"), &Default::default(), |_| {})
        .expect("open succeeds");

    assert_eq!((update.raster.width, update.raster.height), (4, 4));
    assert_eq!(&update.raster.rgba[..4], &[10, 20, 30, 255]);
    let stats = update.stats.expect("stats refreshed");
    assert_eq!(stats.hist_r[128], 500);
    assert_eq!(update.waveform.expect("waveform refreshed").x_bins, 4);
    assert_eq!(
        bridge.call_names(),
        vec!["open_image", "image_stats", "image_waveform"]
    );
}

#[test]
fn test_open_progress_subscription_released_on_error() {
    let (controller, _bridge, hub) = ready_controller(StubBridge::new(|request| match request {
        EngineRequest::OpenImage(_) => Err(HdrscopeError::from_engine("load failed")),
        other => preview_happy_path(other),
    }));

    let err = controller
        .open_image(Path::new("a.exr"), &Default::default(), |_| {})
        .expect_err("open fails");
    assert!(!err.is_cancelled());
    assert_eq!(hub.listener_count(ProgressKind::Open), 0);
}

#[test]
fn test_cancelled_open_is_expected_and_leaves_preview_untouched() {
    let (controller, _bridge, _hub) = ready_controller(StubBridge::new(|request| match request {
        EngineRequest::OpenImage(_) => Err(HdrscopeError::from_engine("open cancelled")),
        other => preview_happy_path(other),
    }));

    let mut preview = PreviewState::new();
    let existing = Raster::new(2, 2, vec![7u8; 16]).expect("valid raster");
    preview.commit(existing.clone());

    match controller.open_image(Path::new("a.exr"), &Default::default(), |_| {}) {
        Ok(update) => preview.commit(update.raster),
        Err(error) if error.is_cancelled() => {
            // informational only — no state change, no error surface
        }
        Err(error) => panic!("unexpected failure: {error}"),
    }

    assert_eq!(preview.current(), Some(&existing));
    assert!(!preview.has_previous());
}

#[test]
fn test_scope_refresh_failure_is_not_fatal() {
    let (controller, _bridge, _hub) = ready_controller(StubBridge::new(|request| match request {
        EngineRequest::ImageStats => Err(HdrscopeError::from_engine("stats not ready")),
        EngineRequest::ImageWaveform => Ok(EngineResponse::Ack), // wrong shape
        other => preview_happy_path(other),
    }));

    let update = controller
        .open_image(Path::new("a.exr"), &Default::default(), |_| {})
        .expect("open still succeeds");
    assert!(update.stats.is_none());
    assert!(update.waveform.is_none());
}

#[test]
fn test_update_preview_carries_state_lut_flag() {
    let sent = Arc::new(Mutex::new(Vec::new()));
    let log = Arc::clone(&sent);
    let (mut controller, _bridge, _hub) = ready_controller(StubBridge::new(move |request| {
        if let EngineRequest::UpdatePreview(update) = request {
            log.lock().expect("flag log").push(update.use_state_lut);
        }
        match request {
            EngineRequest::UpdatePreview(_) => {
                Ok(EngineResponse::Raster(png_blob(2, 2, [0, 0, 0, 255])))
            }
            other => preview_happy_path(other),
        }
    }));

    controller
        .update_preview(&Default::default())
        .expect("update");
    controller.clear_transform().expect("clear");
    controller
        .update_preview(&Default::default())
        .expect("update");
    controller
        .apply_transform(&preset("ACEScg to sRGB", Some(33)))
        .expect("apply");
    controller
        .update_preview(&Default::default())
        .expect("update");

    assert_eq!(*sent.lock().expect("flag log"), vec![true, false, true]);
}

// ---------------------------------------------------------------------------
// Transforms
// ---------------------------------------------------------------------------

#[test]
fn test_transform_size_clamped_to_engine_range() {
    let sizes = Arc::new(Mutex::new(Vec::new()));
    let log = Arc::clone(&sizes);
    let (mut controller, _bridge, _hub) = ready_controller(StubBridge::new(move |request| {
        if let EngineRequest::SetLut3d(lut) = request {
            log.lock().expect("size log").push(lut.size);
        }
        preview_happy_path(request)
    }));

    controller
        .apply_transform(&preset("huge", Some(100)))
        .expect("apply");
    controller
        .apply_transform(&preset("tiny", Some(5)))
        .expect("apply");
    controller
        .apply_transform(&preset("default", None))
        .expect("apply");

    assert_eq!(*sizes.lock().expect("size log"), vec![65, 17, 33]);
}

#[test]
fn test_clear_transform_tolerates_engine_failure() {
    let (mut controller, _bridge, _hub) = ready_controller(StubBridge::new(|request| {
        match request {
            EngineRequest::ClearLut => Err(HdrscopeError::from_engine("no lut set")),
            other => preview_happy_path(other),
        }
    }));
    controller.clear_transform().expect("clear is tolerant");
    assert!(!controller.use_state_lut());
}

// ---------------------------------------------------------------------------
// Probe and long-running operations
// ---------------------------------------------------------------------------

#[test]
fn test_probe_returns_linear_sample() {
    let (controller, _bridge, _hub) = ready_controller(StubBridge::new(preview_happy_path));
    let sample = controller.probe_pixel(3, 5).expect("probe");
    assert_eq!(sample.g, 0.5);
}

#[test]
fn test_sequence_fps_releases_progress_subscription() {
    let (controller, _bridge, hub) = ready_controller(StubBridge::new(|request| match request {
        EngineRequest::SequenceFps(_) => Ok(EngineResponse::Sequence(
            hdrscope_core::command::SequenceSummary {
                success: 12,
                failure: 0,
            },
        )),
        other => preview_happy_path(other),
    }));

    let summary = controller
        .sequence_fps(
            hdrscope_core::command::SequenceFps {
                dir: "/seq".into(),
                fps: 24.0,
                attr: "FramesPerSecond".to_owned(),
                recursive: false,
                dry_run: false,
                backup: true,
            },
            |_| {},
        )
        .expect("seq fps");
    assert_eq!(summary.success, 12);
    assert_eq!(hub.listener_count(ProgressKind::Sequence), 0);
}

// ---------------------------------------------------------------------------
// Response ordering
// ---------------------------------------------------------------------------

#[test]
fn test_stale_responses_are_discarded() {
    let mut sequencer = RequestSequencer::new();
    let first = sequencer.begin();
    let second = sequencer.begin();

    // The older in-flight response arrives after the newer dispatch
    assert!(!sequencer.is_current(first));
    assert!(sequencer.is_current(second));

    let third = sequencer.begin();
    assert!(!sequencer.is_current(second));
    assert!(sequencer.is_current(third));
}
