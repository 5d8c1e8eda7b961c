use std::path::Path;
use std::sync::mpsc;
use std::sync::Arc;

use hdrscope_core::command::{ExportVideo, PreviewParams, SequenceFps, TransformPreset};
use hdrscope_core::consts::BRIDGE_TIMEOUT;
use hdrscope_core::controller::Controller;
use hdrscope_core::error::HdrscopeError;
use hdrscope_core::export::ExportTask;
use hdrscope_core::gateway::Gateway;
use hdrscope_core::progress::{ProgressHub, ProgressKind};

use crate::messages::{WorkerCommand, WorkerResult};

/// Spawn the worker thread that drives all engine-bound operations.
/// Returns the command sender.
pub fn spawn_worker(
    result_tx: mpsc::Sender<WorkerResult>,
    ctx: egui::Context,
    gateway: Arc<Gateway>,
    hub: ProgressHub,
) -> mpsc::Sender<WorkerCommand> {
    let (cmd_tx, cmd_rx) = mpsc::channel::<WorkerCommand>();

    std::thread::Builder::new()
        .name("hdrscope-worker".into())
        .spawn(move || {
            worker_loop(cmd_rx, result_tx, ctx, gateway, hub);
        })
        .expect("Failed to spawn worker thread");

    cmd_tx
}

fn send(tx: &mpsc::Sender<WorkerResult>, ctx: &egui::Context, result: WorkerResult) {
    let _ = tx.send(result);
    ctx.request_repaint();
}

fn send_log(tx: &mpsc::Sender<WorkerResult>, ctx: &egui::Context, msg: impl Into<String>) {
    send(tx, ctx, WorkerResult::Log { message: msg.into() });
}

fn send_error(
    tx: &mpsc::Sender<WorkerResult>,
    ctx: &egui::Context,
    context: &'static str,
    error: HdrscopeError,
) {
    send(
        tx,
        ctx,
        WorkerResult::Error {
            context,
            message: error.to_string(),
        },
    );
}

fn worker_loop(
    cmd_rx: mpsc::Receiver<WorkerCommand>,
    tx: mpsc::Sender<WorkerResult>,
    ctx: egui::Context,
    gateway: Arc<Gateway>,
    hub: ProgressHub,
) {
    let mut controller = Controller::new(gateway, hub);

    // One readiness gate per session; a resolved bridge stays valid for the
    // process lifetime.
    let ready = controller.gateway().ensure_ready(BRIDGE_TIMEOUT);
    send(&tx, &ctx, WorkerResult::BridgeReady(ready));
    if ready {
        handle_session_start(&controller, &tx, &ctx);
    } else {
        send_log(
            &tx,
            &ctx,
            "engine bridge unavailable; engine operations will be skipped",
        );
    }

    while let Ok(cmd) = cmd_rx.recv() {
        match cmd {
            WorkerCommand::OpenImage {
                path,
                params,
                stamp,
            } => handle_open(&controller, &path, &params, stamp, &tx, &ctx),
            WorkerCommand::UpdatePreview { params, stamp } => {
                handle_update(&controller, &params, stamp, &tx, &ctx)
            }
            WorkerCommand::ProbePixel { x, y } => handle_probe(&controller, x, y, &tx, &ctx),
            WorkerCommand::ApplyTransform { preset } => {
                handle_apply_transform(&mut controller, &preset, &tx, &ctx)
            }
            WorkerCommand::ClearTransform => handle_clear_transform(&mut controller, &tx, &ctx),
            WorkerCommand::SavePreview { out_path } => {
                handle_save_preview(&controller, &out_path, &tx, &ctx)
            }
            WorkerCommand::RunExports { tasks } => handle_run_exports(&controller, &tasks, &tx, &ctx),
            WorkerCommand::SequenceFps { request } => {
                handle_sequence_fps(&controller, request, &tx, &ctx)
            }
            WorkerCommand::ExportVideo { request } => {
                handle_export_video(&controller, request, &tx, &ctx)
            }
            WorkerCommand::SetLogPermission { allow } => {
                if let Err(error) = controller.set_log_permission(allow) {
                    send_log(&tx, &ctx, format!("log permission update failed: {error}"));
                }
            }
        }
    }
}

/// Load everything the session needs once the bridge resolves: the transform
/// preset list and the engine-side log consent flag.
fn handle_session_start(
    controller: &Controller,
    tx: &mpsc::Sender<WorkerResult>,
    ctx: &egui::Context,
) {
    match controller.transform_presets() {
        Ok(presets) => {
            send_log(tx, ctx, format!("{} transform presets loaded", presets.len()));
            send(tx, ctx, WorkerResult::TransformsLoaded(presets));
        }
        Err(error) => send_log(tx, ctx, format!("transform list failed: {error}")),
    }
    match controller.log_permission() {
        Ok(allow) => send(tx, ctx, WorkerResult::LogPermission(allow)),
        Err(error) => send_log(tx, ctx, format!("log permission query failed: {error}")),
    }
}

fn handle_open(
    controller: &Controller,
    path: &Path,
    params: &PreviewParams,
    stamp: u64,
    tx: &mpsc::Sender<WorkerResult>,
    ctx: &egui::Context,
) {
    let progress_tx = tx.clone();
    let progress_ctx = ctx.clone();
    let result = controller.open_image(path, params, move |percent| {
        let _ = progress_tx.send(WorkerResult::Progress {
            kind: ProgressKind::Open,
            percent,
        });
        progress_ctx.request_repaint();
    });

    match result {
        Ok(update) => {
            send_log(
                tx,
                ctx,
                format!("open ok: {}x{}", update.raster.width, update.raster.height),
            );
            send(
                tx,
                ctx,
                WorkerResult::PreviewReady {
                    stamp,
                    raster: update.raster,
                    stats: update.stats,
                    waveform: update.waveform,
                },
            );
            match controller.read_metadata(path) {
                Ok(entries) => send(tx, ctx, WorkerResult::MetadataLoaded(entries)),
                Err(error) => send_log(tx, ctx, format!("metadata load failed: {error}")),
            }
        }
        Err(error) if error.is_cancelled() => {
            send_log(tx, ctx, "open cancelled");
            send(tx, ctx, WorkerResult::Cancelled { context: "open" });
        }
        Err(error) => send_error(tx, ctx, "open", error),
    }
}

fn handle_update(
    controller: &Controller,
    params: &PreviewParams,
    stamp: u64,
    tx: &mpsc::Sender<WorkerResult>,
    ctx: &egui::Context,
) {
    match controller.update_preview(params) {
        Ok(update) => send(
            tx,
            ctx,
            WorkerResult::PreviewReady {
                stamp,
                raster: update.raster,
                stats: update.stats,
                waveform: update.waveform,
            },
        ),
        Err(error) if error.is_cancelled() => {
            send(tx, ctx, WorkerResult::Cancelled { context: "update" })
        }
        Err(error) => send_error(tx, ctx, "update", error),
    }
}

fn handle_probe(
    controller: &Controller,
    x: u32,
    y: u32,
    tx: &mpsc::Sender<WorkerResult>,
    ctx: &egui::Context,
) {
    // Probe failures (no image, out of range) are silently ignored
    if let Ok(sample) = controller.probe_pixel(x, y) {
        send(tx, ctx, WorkerResult::ProbeResult { x, y, sample });
    }
}

fn handle_apply_transform(
    controller: &mut Controller,
    preset: &TransformPreset,
    tx: &mpsc::Sender<WorkerResult>,
    ctx: &egui::Context,
) {
    match controller.apply_transform(preset) {
        Ok(()) => send(
            tx,
            ctx,
            WorkerResult::TransformApplied {
                label: preset.label.clone(),
            },
        ),
        Err(error) => send_log(tx, ctx, format!("transform apply failed: {error}")),
    }
}

fn handle_clear_transform(
    controller: &mut Controller,
    tx: &mpsc::Sender<WorkerResult>,
    ctx: &egui::Context,
) {
    match controller.clear_transform() {
        Ok(()) => send(tx, ctx, WorkerResult::TransformCleared),
        Err(error) => send_log(tx, ctx, format!("transform clear failed: {error}")),
    }
}

fn handle_save_preview(
    controller: &Controller,
    out_path: &Path,
    tx: &mpsc::Sender<WorkerResult>,
    ctx: &egui::Context,
) {
    match controller.export_preview_png(out_path) {
        Ok(()) => send(
            tx,
            ctx,
            WorkerResult::PreviewSaved {
                out_path: out_path.to_path_buf(),
            },
        ),
        Err(error) => send_error(tx, ctx, "save", error),
    }
}

fn handle_run_exports(
    controller: &Controller,
    tasks: &[ExportTask],
    tx: &mpsc::Sender<WorkerResult>,
    ctx: &egui::Context,
) {
    let event_tx = tx.clone();
    let event_ctx = ctx.clone();
    let emit = move |event| {
        let _ = event_tx.send(WorkerResult::Export(event));
        event_ctx.request_repaint();
    };
    if let Err(error) = controller.process_exports(tasks, emit) {
        send_log(tx, ctx, format!("export batch skipped: {error}"));
    }
    send(tx, ctx, WorkerResult::ExportsDrained);
}

fn handle_sequence_fps(
    controller: &Controller,
    request: SequenceFps,
    tx: &mpsc::Sender<WorkerResult>,
    ctx: &egui::Context,
) {
    let dry_run = request.dry_run;
    let progress_tx = tx.clone();
    let progress_ctx = ctx.clone();
    let result = controller.sequence_fps(request, move |percent| {
        let _ = progress_tx.send(WorkerResult::Progress {
            kind: ProgressKind::Sequence,
            percent,
        });
        progress_ctx.request_repaint();
    });

    match result {
        Ok(summary) => send(
            tx,
            ctx,
            WorkerResult::SequenceComplete {
                success: summary.success,
                failure: summary.failure,
                dry_run,
            },
        ),
        Err(error) if error.is_cancelled() => {
            send_log(tx, ctx, "seq_fps cancelled");
            send(tx, ctx, WorkerResult::Cancelled { context: "seq_fps" });
        }
        Err(error) => send_error(tx, ctx, "seq_fps", error),
    }
}

fn handle_export_video(
    controller: &Controller,
    request: ExportVideo,
    tx: &mpsc::Sender<WorkerResult>,
    ctx: &egui::Context,
) {
    let out = request.out.clone();
    let progress_tx = tx.clone();
    let progress_ctx = ctx.clone();
    let result = controller.export_video(request, move |percent| {
        let _ = progress_tx.send(WorkerResult::Progress {
            kind: ProgressKind::Video,
            percent,
        });
        progress_ctx.request_repaint();
    });

    match result {
        Ok(()) => send(tx, ctx, WorkerResult::VideoComplete { out }),
        Err(error) if error.is_cancelled() => {
            send_log(tx, ctx, "video export cancelled");
            send(tx, ctx, WorkerResult::Cancelled { context: "video" });
        }
        Err(error) => send_error(tx, ctx, "video", error),
    }
}
