use std::sync::mpsc;
use std::sync::Arc;
use std::time::Instant;

use tracing::debug;

use hdrscope_core::command::{EngineRequest, PreviewParams};
use hdrscope_core::consts::UPDATE_DEBOUNCE;
use hdrscope_core::debounce::Debouncer;
use hdrscope_core::export::ExportQueue;
use hdrscope_core::gateway::Gateway;
use hdrscope_core::metadata::AttributeTable;
use hdrscope_core::preview::PreviewState;
use hdrscope_core::progress::{ProgressHub, ProgressKind};
use hdrscope_core::sequence::RequestSequencer;

use crate::config::GuiConfig;
use crate::convert::raster_to_color_image;
use crate::messages::{WorkerCommand, WorkerResult};
use crate::panels;
use crate::state::{
    ParamsState, ScopePanelState, UiState, VideoState, ViewportState, NON_TRANSFORM,
};
use crate::worker;

pub struct HdrscopeApp {
    pub cmd_tx: mpsc::Sender<WorkerCommand>,
    pub result_tx: mpsc::Sender<WorkerResult>,
    pub result_rx: mpsc::Receiver<WorkerResult>,
    pub gateway: Arc<Gateway>,

    pub ui: UiState,
    pub viewport: ViewportState,
    pub scopes: ScopePanelState,
    pub preview: PreviewState,
    pub exports: ExportQueue,
    pub attributes: AttributeTable,
    pub params: ParamsState,
    pub video: VideoState,
    pub config: GuiConfig,

    pub debouncer: Debouncer<PreviewParams>,
    pub sequencer: RequestSequencer,
    pub show_about: bool,
}

impl HdrscopeApp {
    pub fn new(ctx: &egui::Context, gateway: Arc<Gateway>, hub: ProgressHub) -> Self {
        let (result_tx, result_rx) = mpsc::channel();
        let cmd_tx = worker::spawn_worker(result_tx.clone(), ctx.clone(), gateway.clone(), hub);

        let config = GuiConfig::load();
        let ui = UiState {
            selected_transform: config
                .default_transform
                .clone()
                .unwrap_or_else(|| NON_TRANSFORM.to_owned()),
            ..UiState::default()
        };

        Self {
            cmd_tx,
            result_tx,
            result_rx,
            gateway,
            ui,
            viewport: ViewportState::default(),
            scopes: ScopePanelState::default(),
            preview: PreviewState::new(),
            exports: ExportQueue::new(),
            attributes: AttributeTable::default(),
            params: ParamsState::default(),
            video: VideoState::default(),
            config,
            debouncer: Debouncer::new(UPDATE_DEBOUNCE),
            sequencer: RequestSequencer::new(),
            show_about: false,
        }
    }

    pub fn send_command(&self, cmd: WorkerCommand) {
        let _ = self.cmd_tx.send(cmd);
    }

    /// Coalesce a parameter change into the debounced update schedule.
    pub fn schedule_update(&mut self) {
        self.debouncer
            .trigger(self.params.to_preview_params(), Instant::now());
    }

    /// Open the document named in the path field.
    pub fn open_path(&mut self) {
        let path = self.ui.path_input.trim().to_owned();
        if path.is_empty() {
            self.ui.add_log("no path to open");
            return;
        }
        self.viewport.pipette_fixed = false;
        self.viewport.last_probe = None;
        let stamp = self.sequencer.begin();
        self.send_command(WorkerCommand::OpenImage {
            path: path.into(),
            params: self.params.to_preview_params(),
            stamp,
        });
    }

    /// Dispatch pending export tasks unless a batch is already running.
    pub fn dispatch_exports(&mut self) {
        if self.ui.exporting {
            return;
        }
        let batch = self.exports.pending_batch();
        if batch.is_empty() {
            return;
        }
        self.ui.exporting = true;
        self.send_command(WorkerCommand::RunExports { tasks: batch });
    }

    /// Apply the currently selected transform (or bypass) on the worker.
    pub fn apply_selected_transform(&mut self) {
        if self.ui.selected_transform == NON_TRANSFORM {
            self.send_command(WorkerCommand::ClearTransform);
        } else if let Some(preset) = self.ui.preset(&self.ui.selected_transform).cloned() {
            self.send_command(WorkerCommand::ApplyTransform { preset });
        } else {
            self.ui.add_log("no transform selected");
        }
    }

    /// Cheap cancel command issued directly from the UI thread while the
    /// worker is blocked inside the operation being cancelled.
    pub fn request_cancel_open(&mut self) {
        self.invoke_direct(EngineRequest::CancelOpen);
    }

    pub fn request_cancel_sequence(&mut self) {
        self.invoke_direct(EngineRequest::CancelSequenceFps);
    }

    fn invoke_direct(&mut self, request: EngineRequest) {
        let Some(bridge) = self.gateway.bridge() else {
            self.ui.add_log("cancel skipped: engine bridge unavailable");
            return;
        };
        let name = request.name();
        if let Err(error) = bridge.invoke(request) {
            self.ui.add_log(format!("{name} failed: {error}"));
        }
    }

    /// Re-upload the displayed raster (channel mode and A/B applied).
    pub fn refresh_texture(&mut self, ctx: &egui::Context) {
        match self.preview.displayed() {
            Some(raster) => {
                let image = raster_to_color_image(raster, self.preview.channel_mode());
                let size = image.size;
                let texture = ctx.load_texture("preview", image, egui::TextureOptions::NEAREST);
                self.viewport.texture = Some(texture);
                self.viewport.image_size = Some(size);
            }
            None => {
                self.viewport.texture = None;
                self.viewport.image_size = None;
            }
        }
    }

    /// Drain all pending results from the worker and dialog threads.
    fn poll_results(&mut self, ctx: &egui::Context) {
        while let Ok(result) = self.result_rx.try_recv() {
            match result {
                WorkerResult::BridgeReady(ready) => {
                    self.ui.bridge_ready = Some(ready);
                    if ready {
                        self.ui.add_log("engine bridge ready");
                    }
                }
                WorkerResult::PreviewReady {
                    stamp,
                    raster,
                    stats,
                    waveform,
                } => {
                    self.ui.open_progress = None;
                    if self.sequencer.is_current(stamp) {
                        self.preview.commit(raster);
                        self.scopes.stats = stats;
                        self.scopes.waveform = waveform;
                        self.refresh_texture(ctx);
                        self.ui.error = None;
                    } else {
                        debug!("discarding stale preview response (stamp {stamp})");
                    }
                }
                WorkerResult::MetadataLoaded(entries) => {
                    self.attributes = AttributeTable::load(entries);
                }
                WorkerResult::ProbeResult { x, y, sample } => {
                    self.viewport.readout = format!(
                        "x:{x}, y:{y}  linear: R {:.6}  G {:.6}  B {:.6}  A {:.6}",
                        sample.r, sample.g, sample.b, sample.a
                    );
                }
                WorkerResult::TransformsLoaded(presets) => {
                    self.ui.transforms = presets;
                    let configured = self.config.default_transform.clone();
                    self.ui.selected_transform = configured
                        .filter(|label| {
                            label.as_str() == NON_TRANSFORM || self.ui.preset(label).is_some()
                        })
                        .or_else(|| self.ui.transforms.first().map(|p| p.label.clone()))
                        .unwrap_or_else(|| NON_TRANSFORM.to_owned());
                    // Apply the startup selection immediately
                    self.apply_selected_transform();
                }
                WorkerResult::TransformApplied { label } => {
                    self.ui.add_log(format!("transform applied: {label}"));
                    self.schedule_update();
                }
                WorkerResult::TransformCleared => {
                    self.ui.add_log("transform bypassed");
                    self.schedule_update();
                }
                WorkerResult::Export(event) => {
                    self.exports.apply(event);
                }
                WorkerResult::ExportsDrained => {
                    self.ui.exporting = false;
                    // Tasks enqueued while the batch ran go out next
                    self.dispatch_exports();
                }
                WorkerResult::Progress { kind, percent } => match kind {
                    ProgressKind::Open => self.ui.open_progress = Some(percent),
                    ProgressKind::Sequence => self.ui.seq_progress = Some(percent),
                    ProgressKind::Video => self.ui.video_progress = Some(percent),
                    // Export progress arrives through queue events
                    ProgressKind::Export => {}
                },
                WorkerResult::SequenceComplete {
                    success,
                    failure,
                    dry_run,
                } => {
                    self.ui.seq_progress = None;
                    self.ui.seq_running = false;
                    let suffix = if dry_run { " (dry-run)" } else { "" };
                    self.ui
                        .add_log(format!("sequence fps: {success} ok / {failure} failed{suffix}"));
                }
                WorkerResult::VideoComplete { out } => {
                    self.ui.video_progress = None;
                    self.ui.video_running = false;
                    self.ui.add_log(format!("video exported: {}", out.display()));
                }
                WorkerResult::PreviewSaved { out_path } => {
                    self.ui.add_log(format!("PNG saved: {}", out_path.display()));
                }
                WorkerResult::LogPermission(allow) => {
                    self.ui.log_consent = allow;
                }
                WorkerResult::FilesPicked(paths) => {
                    if let Some(first) = paths.first() {
                        self.ui.path_input = first.to_string_lossy().into_owned();
                        self.open_path();
                    }
                    if paths.len() > 1 {
                        for path in &paths {
                            self.exports.enqueue(path.clone());
                        }
                        self.ui
                            .add_log(format!("{} files queued for export", paths.len()));
                    }
                }
                WorkerResult::SaveTargetPicked(out_path) => {
                    self.send_command(WorkerCommand::SavePreview { out_path });
                }
                WorkerResult::FolderPicked(dir) => {
                    self.video.seq_dir = dir.to_string_lossy().into_owned();
                }
                WorkerResult::VideoTargetPicked(out) => {
                    self.video.prores_out = out.to_string_lossy().into_owned();
                }
                WorkerResult::Cancelled { context } => {
                    self.clear_progress_for(context);
                }
                WorkerResult::Error { context, message } => {
                    self.clear_progress_for(context);
                    self.ui.error = Some(format!("{context} failed: {message}"));
                    self.ui.add_log(format!("ERROR: {context} failed: {message}"));
                }
                WorkerResult::Log { message } => {
                    self.ui.add_log(message);
                }
            }
        }
    }

    /// Progress UI is cleared on every settle path, success or not.
    fn clear_progress_for(&mut self, context: &str) {
        match context {
            "open" | "update" => self.ui.open_progress = None,
            "seq_fps" => {
                self.ui.seq_progress = None;
                self.ui.seq_running = false;
            }
            "video" => {
                self.ui.video_progress = None;
                self.ui.video_running = false;
            }
            _ => {}
        }
    }
}

impl eframe::App for HdrscopeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_results(ctx);

        // Fire the debounced preview update once its quiet period elapses
        let now = Instant::now();
        if let Some(params) = self.debouncer.poll(now) {
            let stamp = self.sequencer.begin();
            self.send_command(WorkerCommand::UpdatePreview { params, stamp });
        } else if let Some(wait) = self.debouncer.time_until_fire(now) {
            ctx.request_repaint_after(wait);
        }

        panels::menu_bar::show(ctx, self);
        panels::controls::show(ctx, self);
        panels::scopes::show(ctx, self);
        panels::exports::show(ctx, self);
        panels::status::show(ctx, self);
        panels::viewport::show(ctx, self);
        panels::video::show(ctx, self);
        panels::attributes::show(ctx, self);

        if self.show_about {
            egui::Window::new("About hdrscope")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.heading("hdrscope");
                        ui.label("HDR image inspection");
                        ui.add_space(8.0);
                        ui.label(format!("Version {}", env!("CARGO_PKG_VERSION")));
                        ui.add_space(8.0);
                        if ui.button("Close").clicked() {
                            self.show_about = false;
                        }
                    });
                });
        }
    }
}
