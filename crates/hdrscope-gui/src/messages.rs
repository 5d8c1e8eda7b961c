use std::path::PathBuf;

use hdrscope_core::command::{
    ExportVideo, PixelSample, PreviewParams, SequenceFps, TransformPreset,
};
use hdrscope_core::export::{ExportQueueEvent, ExportTask};
use hdrscope_core::progress::ProgressKind;
use hdrscope_core::raster::Raster;
use hdrscope_core::scope::{ScopeStats, WaveformStats};

/// Commands sent from the UI thread to the worker thread.
pub enum WorkerCommand {
    /// Open a document, decode its first preview, and load its metadata.
    OpenImage {
        path: PathBuf,
        params: PreviewParams,
        stamp: u64,
    },

    /// Debounced preview re-render. `stamp` orders overlapping responses.
    UpdatePreview { params: PreviewParams, stamp: u64 },

    /// Pixel probe at preview coordinates.
    ProbePixel { x: u32, y: u32 },

    /// Build a preset's 3D LUT in engine memory and enable it.
    ApplyTransform { preset: TransformPreset },

    /// Bypass color transforms entirely.
    ClearTransform,

    /// Save the current preview as PNG.
    SavePreview { out_path: PathBuf },

    /// Drive a batch of queued exports, strictly one task at a time.
    RunExports { tasks: Vec<ExportTask> },

    /// Rewrite the frame-rate attribute across a sequence folder.
    SequenceFps { request: SequenceFps },

    /// Encode a sequence folder to a ProRes movie.
    ExportVideo { request: ExportVideo },

    SetLogPermission { allow: bool },
}

/// Results sent from the worker thread back to the UI thread.
pub enum WorkerResult {
    /// Outcome of the session's bridge readiness gate.
    BridgeReady(bool),

    /// A decoded preview frame plus its refreshed scope statistics.
    PreviewReady {
        stamp: u64,
        raster: Raster,
        stats: Option<ScopeStats>,
        waveform: Option<WaveformStats>,
    },

    /// Attribute entries of the opened document.
    MetadataLoaded(Vec<(String, String)>),

    ProbeResult {
        x: u32,
        y: u32,
        sample: PixelSample,
    },

    /// Engine preset list, loaded once the bridge resolves.
    TransformsLoaded(Vec<TransformPreset>),
    TransformApplied {
        label: String,
    },
    TransformCleared,

    /// Export queue state change or per-task progress tick.
    Export(ExportQueueEvent),
    /// All dispatched export tasks settled.
    ExportsDrained,

    /// Progress tick of a long-running operation.
    Progress {
        kind: ProgressKind,
        percent: u8,
    },

    SequenceComplete {
        success: usize,
        failure: usize,
        dry_run: bool,
    },
    VideoComplete {
        out: PathBuf,
    },
    PreviewSaved {
        out_path: PathBuf,
    },
    LogPermission(bool),

    /// Files chosen in the open dialog (UI-bound, sent by the dialog thread).
    FilesPicked(Vec<PathBuf>),
    /// PNG destination chosen in the save dialog.
    SaveTargetPicked(PathBuf),
    /// Sequence folder chosen in the folder dialog.
    FolderPicked(PathBuf),
    /// ProRes destination chosen in the save dialog.
    VideoTargetPicked(PathBuf),

    /// Expected user-initiated cancel — informational, never an error.
    Cancelled {
        context: &'static str,
    },
    Error {
        context: &'static str,
        message: String,
    },
    Log {
        message: String,
    },
}
