use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::command::{
    EngineBridge, EngineRequest, ExportVideo, OpenImage, PixelSample, PreviewParams, SequenceFps,
    SequenceSummary, SetLut3d, TransformPreset, UpdatePreview,
};
use crate::error::{HdrscopeError, Result};
use crate::export::{ExportQueueEvent, ExportStatus, ExportTask};
use crate::gateway::Gateway;
use crate::progress::{ProgressHub, ProgressKind};
use crate::raster::Raster;
use crate::scope::{ScopeStats, WaveformStats};

/// Result of a successful open or preview update: the decoded raster plus
/// the refreshed scope statistics. Scope refresh failures are non-fatal and
/// leave the corresponding field empty (the draw is skipped).
#[derive(Debug)]
pub struct PreviewUpdate {
    pub raster: Raster,
    pub stats: Option<ScopeStats>,
    pub waveform: Option<WaveformStats>,
}

/// Operation driver for one controller session.
///
/// Owns the gateway, the progress hub, and the in-memory LUT flag that
/// preview updates carry. Every operation resolves the bridge through the
/// gateway and fails with [`HdrscopeError::BridgeUnavailable`] when the host
/// has not attached one; no failure propagates past a single operation.
pub struct Controller {
    gateway: Arc<Gateway>,
    hub: ProgressHub,
    use_state_lut: bool,
}

impl Controller {
    pub fn new(gateway: Arc<Gateway>, hub: ProgressHub) -> Self {
        Self {
            gateway,
            hub,
            use_state_lut: true,
        }
    }

    pub fn gateway(&self) -> &Arc<Gateway> {
        &self.gateway
    }

    pub fn hub(&self) -> &ProgressHub {
        &self.hub
    }

    /// Whether preview updates use the engine's in-memory LUT.
    pub fn use_state_lut(&self) -> bool {
        self.use_state_lut
    }

    fn bridge(&self) -> Result<Arc<dyn EngineBridge>> {
        self.gateway.bridge().ok_or(HdrscopeError::BridgeUnavailable)
    }

    /// Open a document and decode its first preview frame, then refresh the
    /// scopes. `on_progress` receives decode percents for the duration of
    /// the call; the subscription is released on every exit path.
    pub fn open_image(
        &self,
        path: &Path,
        params: &PreviewParams,
        on_progress: impl Fn(u8) + Send + 'static,
    ) -> Result<PreviewUpdate> {
        let bridge = self.bridge()?;
        let _token = self.hub.subscribe(ProgressKind::Open, on_progress);
        let blob = bridge
            .invoke(EngineRequest::OpenImage(OpenImage {
                path: path.to_path_buf(),
                params: params.clone(),
            }))?
            .into_raster("open_image")?;
        let raster = Raster::decode(&blob)?;
        info!("open ok: {}x{}", raster.width, raster.height);
        let (stats, waveform) = self.refresh_scopes_with(&bridge);
        Ok(PreviewUpdate {
            raster,
            stats,
            waveform,
        })
    }

    /// Re-render the preview of the open document with the given parameters.
    /// High-frequency parameter changes are debounced upstream; each call
    /// here is one engine round-trip.
    pub fn update_preview(&self, params: &PreviewParams) -> Result<PreviewUpdate> {
        let bridge = self.bridge()?;
        let blob = bridge
            .invoke(EngineRequest::UpdatePreview(UpdatePreview {
                params: params.clone(),
                use_state_lut: self.use_state_lut,
            }))?
            .into_raster("update_preview")?;
        let raster = Raster::decode(&blob)?;
        let (stats, waveform) = self.refresh_scopes_with(&bridge);
        Ok(PreviewUpdate {
            raster,
            stats,
            waveform,
        })
    }

    /// Ask the engine to abort the in-flight open/decode at its next safe
    /// point. The aborted call settles with a cancelled rejection on its own.
    pub fn cancel_open(&self) -> Result<()> {
        self.bridge()?.invoke(EngineRequest::CancelOpen)?;
        Ok(())
    }

    /// Refresh both scopes from the engine without touching the preview.
    pub fn refresh_scopes(&self) -> Result<(Option<ScopeStats>, Option<WaveformStats>)> {
        let bridge = self.bridge()?;
        Ok(self.refresh_scopes_with(&bridge))
    }

    fn refresh_scopes_with(
        &self,
        bridge: &Arc<dyn EngineBridge>,
    ) -> (Option<ScopeStats>, Option<WaveformStats>) {
        let stats = match bridge
            .invoke(EngineRequest::ImageStats)
            .and_then(|response| response.into_stats("image_stats"))
        {
            Ok(stats) => Some(stats),
            Err(error) => {
                warn!("image_stats failed: {error}");
                None
            }
        };
        let waveform = match bridge
            .invoke(EngineRequest::ImageWaveform)
            .and_then(|response| response.into_waveform("image_waveform"))
            .and_then(WaveformStats::try_from)
        {
            Ok(waveform) => Some(waveform),
            Err(error) => {
                warn!("image_waveform failed: {error}");
                None
            }
        };
        (stats, waveform)
    }

    /// Linear-light sample at a preview pixel. The engine owns the
    /// preview→source coordinate scale.
    pub fn probe_pixel(&self, x: u32, y: u32) -> Result<PixelSample> {
        self.bridge()?
            .invoke(EngineRequest::ProbePixel { x, y })?
            .into_pixel("probe_pixel")
    }

    /// Write the current preview to `out_path` as PNG.
    pub fn export_preview_png(&self, out_path: &Path) -> Result<()> {
        self.bridge()?.invoke(EngineRequest::ExportPreviewPng {
            out_path: out_path.to_path_buf(),
        })?;
        info!("png saved: {}", out_path.display());
        Ok(())
    }

    /// Transform presets advertised by the engine, in engine order.
    pub fn transform_presets(&self) -> Result<Vec<TransformPreset>> {
        self.bridge()?
            .invoke(EngineRequest::TransformPresets)?
            .into_presets("transform_presets")
    }

    /// Build the preset's 3D LUT in engine memory and enable its use for
    /// subsequent preview updates.
    pub fn apply_transform(&mut self, preset: &TransformPreset) -> Result<()> {
        let size = preset.size.unwrap_or(33).clamp(17, 65);
        self.bridge()?.invoke(EngineRequest::SetLut3d(SetLut3d {
            src_space: preset.src_space.clone(),
            src_tf: preset.src_tf.clone(),
            dst_space: preset.dst_space.clone(),
            dst_tf: preset.dst_tf.clone(),
            size,
            clip_mode: "clip".to_owned(),
        }))?;
        self.use_state_lut = true;
        info!("transform applied: {}", preset.label);
        Ok(())
    }

    /// Bypass color transforms: clear the engine's in-memory LUT and stop
    /// sending the use flag. A failed clear is ignored, matching the
    /// engine's own tolerance for clearing an absent LUT.
    pub fn clear_transform(&mut self) -> Result<()> {
        let bridge = self.bridge()?;
        if let Err(error) = bridge.invoke(EngineRequest::ClearLut) {
            debug!("clear_lut failed (ignored): {error}");
        }
        self.use_state_lut = false;
        Ok(())
    }

    /// Run a batch of export tasks strictly one at a time, in FIFO order.
    ///
    /// A task whose cancel flag is already set is finished as `Cancelled`
    /// without any engine call. A task failure is logged and the batch
    /// continues with the next task. `emit` receives every state change and
    /// progress tick.
    pub fn process_exports<F>(&self, tasks: &[ExportTask], emit: F) -> Result<()>
    where
        F: Fn(ExportQueueEvent) + Send + Clone + 'static,
    {
        let bridge = self.bridge()?;
        for task in tasks {
            if task.cancel.is_cancelled() {
                emit(ExportQueueEvent::Finished {
                    id: task.id,
                    status: ExportStatus::Cancelled,
                });
                continue;
            }
            emit(ExportQueueEvent::Started { id: task.id });
            let status = self.run_one_export(&bridge, task, emit.clone());
            emit(ExportQueueEvent::Finished {
                id: task.id,
                status,
            });
        }
        Ok(())
    }

    fn run_one_export<F>(
        &self,
        bridge: &Arc<dyn EngineBridge>,
        task: &ExportTask,
        emit: F,
    ) -> ExportStatus
    where
        F: Fn(ExportQueueEvent) + Send + Clone + 'static,
    {
        let id = task.id;
        let _token = self.hub.subscribe(ProgressKind::Export, move |percent| {
            emit(ExportQueueEvent::Progress { id, percent });
        });

        // Establish the shared current-image state, then export from it.
        let open = EngineRequest::OpenImage(OpenImage {
            path: task.source.clone(),
            params: PreviewParams::default(),
        });
        match bridge.invoke(open) {
            Ok(_) => {}
            Err(error) if error.is_cancelled() => return ExportStatus::Cancelled,
            Err(error) => {
                warn!("export open failed for {}: {error}", task.source.display());
                return ExportStatus::Failed;
            }
        }
        if task.cancel.is_cancelled() {
            return ExportStatus::Cancelled;
        }
        let export = EngineRequest::ExportPreviewPng {
            out_path: task.output.clone(),
        };
        match bridge.invoke(export) {
            Ok(_) => {
                info!("exported {}", task.output.display());
                ExportStatus::Completed
            }
            Err(error) if error.is_cancelled() => ExportStatus::Cancelled,
            Err(error) => {
                warn!("export failed for {}: {error}", task.source.display());
                ExportStatus::Failed
            }
        }
    }

    /// Rewrite the frame-rate attribute across an EXR sequence, reporting
    /// progress for the duration of the call.
    pub fn sequence_fps(
        &self,
        request: SequenceFps,
        on_progress: impl Fn(u8) + Send + 'static,
    ) -> Result<SequenceSummary> {
        let bridge = self.bridge()?;
        let _token = self.hub.subscribe(ProgressKind::Sequence, on_progress);
        bridge
            .invoke(EngineRequest::SequenceFps(request))?
            .into_sequence("seq_fps")
    }

    /// Cooperative cancel for an in-flight sequence rewrite.
    pub fn cancel_sequence(&self) -> Result<()> {
        self.bridge()?.invoke(EngineRequest::CancelSequenceFps)?;
        Ok(())
    }

    /// Encode an EXR sequence to a ProRes movie, reporting progress for the
    /// duration of the call.
    pub fn export_video(
        &self,
        request: ExportVideo,
        on_progress: impl Fn(u8) + Send + 'static,
    ) -> Result<()> {
        let bridge = self.bridge()?;
        let _token = self.hub.subscribe(ProgressKind::Video, on_progress);
        let out = request.out.clone();
        bridge.invoke(EngineRequest::ExportVideo(request))?;
        info!("video exported: {}", out.display());
        Ok(())
    }

    /// Attribute entries of the given file, flattened for the editor table.
    pub fn read_metadata(&self, path: &Path) -> Result<Vec<(String, String)>> {
        self.bridge()?
            .invoke(EngineRequest::ReadMetadata {
                path: path.to_path_buf(),
            })?
            .into_metadata("read_metadata")
    }

    pub fn log_permission(&self) -> Result<bool> {
        self.bridge()?
            .invoke(EngineRequest::GetLogPermission)?
            .into_log_permission("get_log_permission")
    }

    pub fn set_log_permission(&self, allow: bool) -> Result<()> {
        self.bridge()?
            .invoke(EngineRequest::SetLogPermission { allow })?;
        Ok(())
    }
}
