use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::consts::MAX_PREVIEW_SIZE;
use crate::error::{HdrscopeError, Result};
use crate::scope::{RawWaveform, ScopeStats};

/// Parameters shared by `open_image` and `update_preview`.
#[derive(Clone, Debug, PartialEq)]
pub struct PreviewParams {
    /// Largest edge of the generated preview.
    pub max_size: u32,
    /// Exposure adjustment in stops.
    pub exposure: f32,
    /// Display gamma.
    pub gamma: f32,
    /// Optional external LUT file.
    pub lut_path: Option<PathBuf>,
    /// High-quality resampling.
    pub high_quality: bool,
}

impl Default for PreviewParams {
    fn default() -> Self {
        Self {
            max_size: MAX_PREVIEW_SIZE,
            exposure: 0.0,
            gamma: 1.0,
            lut_path: None,
            high_quality: true,
        }
    }
}

#[derive(Clone, Debug)]
pub struct OpenImage {
    pub path: PathBuf,
    pub params: PreviewParams,
}

#[derive(Clone, Debug)]
pub struct UpdatePreview {
    pub params: PreviewParams,
    /// Use the engine's in-memory LUT instead of `params.lut_path`.
    pub use_state_lut: bool,
}

#[derive(Clone, Debug)]
pub struct SetLut3d {
    pub src_space: String,
    pub src_tf: String,
    pub dst_space: String,
    pub dst_tf: String,
    pub size: u32,
    pub clip_mode: String,
}

#[derive(Clone, Debug)]
pub struct SequenceFps {
    pub dir: PathBuf,
    pub fps: f32,
    /// Attribute name to rewrite, usually "FramesPerSecond".
    pub attr: String,
    pub recursive: bool,
    pub dry_run: bool,
    pub backup: bool,
}

#[derive(Clone, Debug)]
pub struct ExportVideo {
    pub dir: PathBuf,
    pub out: PathBuf,
    pub fps: f32,
    pub colorspace: String,
    pub profile: String,
    pub max_size: u32,
    pub exposure: f32,
    pub gamma: f32,
    pub quality: String,
}

/// One strongly-typed request per engine command.
#[derive(Clone, Debug)]
pub enum EngineRequest {
    OpenImage(OpenImage),
    UpdatePreview(UpdatePreview),
    ImageStats,
    ImageWaveform,
    ProbePixel { x: u32, y: u32 },
    ExportPreviewPng { out_path: PathBuf },
    CancelOpen,
    TransformPresets,
    SetLut3d(SetLut3d),
    ClearLut,
    SequenceFps(SequenceFps),
    CancelSequenceFps,
    ExportVideo(ExportVideo),
    ReadMetadata { path: PathBuf },
    GetLogPermission,
    SetLogPermission { allow: bool },
}

impl EngineRequest {
    /// Engine-side command name, for logs and error contexts.
    pub fn name(&self) -> &'static str {
        match self {
            EngineRequest::OpenImage(_) => "open_image",
            EngineRequest::UpdatePreview(_) => "update_preview",
            EngineRequest::ImageStats => "image_stats",
            EngineRequest::ImageWaveform => "image_waveform",
            EngineRequest::ProbePixel { .. } => "probe_pixel",
            EngineRequest::ExportPreviewPng { .. } => "export_preview_png",
            EngineRequest::CancelOpen => "cancel_open",
            EngineRequest::TransformPresets => "transform_presets",
            EngineRequest::SetLut3d(_) => "set_lut_3d",
            EngineRequest::ClearLut => "clear_lut",
            EngineRequest::SequenceFps(_) => "seq_fps",
            EngineRequest::CancelSequenceFps => "cancel_seq_fps",
            EngineRequest::ExportVideo(_) => "export_prores",
            EngineRequest::ReadMetadata { .. } => "read_metadata",
            EngineRequest::GetLogPermission => "get_log_permission",
            EngineRequest::SetLogPermission { .. } => "set_log_permission",
        }
    }
}

/// Preview dimensions plus the encoded raster produced by the engine.
#[derive(Clone, Debug, PartialEq)]
pub struct RasterBlob {
    pub width: u32,
    pub height: u32,
    /// PNG-encoded RGBA data.
    pub data: Vec<u8>,
}

/// Linear-light sample at one source pixel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PixelSample {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

/// One color-transform preset advertised by the engine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransformPreset {
    pub label: String,
    #[serde(default)]
    pub group: Option<String>,
    pub src_space: String,
    pub src_tf: String,
    pub dst_space: String,
    pub dst_tf: String,
    #[serde(default)]
    pub size: Option<u32>,
}

/// Outcome counts of a sequence FPS rewrite.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SequenceSummary {
    pub success: usize,
    pub failure: usize,
}

#[derive(Clone, Debug)]
pub enum EngineResponse {
    Raster(RasterBlob),
    Stats(ScopeStats),
    Waveform(RawWaveform),
    Pixel(PixelSample),
    Presets(Vec<TransformPreset>),
    Sequence(SequenceSummary),
    Metadata(Vec<(String, String)>),
    LogPermission(bool),
    Ack,
}

impl EngineResponse {
    pub fn into_raster(self, command: &'static str) -> Result<RasterBlob> {
        match self {
            EngineResponse::Raster(blob) => Ok(blob),
            _ => Err(HdrscopeError::UnexpectedResponse { command }),
        }
    }

    pub fn into_stats(self, command: &'static str) -> Result<ScopeStats> {
        match self {
            EngineResponse::Stats(stats) => Ok(stats),
            _ => Err(HdrscopeError::UnexpectedResponse { command }),
        }
    }

    pub fn into_waveform(self, command: &'static str) -> Result<RawWaveform> {
        match self {
            EngineResponse::Waveform(raw) => Ok(raw),
            _ => Err(HdrscopeError::UnexpectedResponse { command }),
        }
    }

    pub fn into_pixel(self, command: &'static str) -> Result<PixelSample> {
        match self {
            EngineResponse::Pixel(sample) => Ok(sample),
            _ => Err(HdrscopeError::UnexpectedResponse { command }),
        }
    }

    pub fn into_presets(self, command: &'static str) -> Result<Vec<TransformPreset>> {
        match self {
            EngineResponse::Presets(presets) => Ok(presets),
            _ => Err(HdrscopeError::UnexpectedResponse { command }),
        }
    }

    pub fn into_sequence(self, command: &'static str) -> Result<SequenceSummary> {
        match self {
            EngineResponse::Sequence(summary) => Ok(summary),
            _ => Err(HdrscopeError::UnexpectedResponse { command }),
        }
    }

    pub fn into_metadata(self, command: &'static str) -> Result<Vec<(String, String)>> {
        match self {
            EngineResponse::Metadata(entries) => Ok(entries),
            _ => Err(HdrscopeError::UnexpectedResponse { command }),
        }
    }

    pub fn into_log_permission(self, command: &'static str) -> Result<bool> {
        match self {
            EngineResponse::LogPermission(allow) => Ok(allow),
            _ => Err(HdrscopeError::UnexpectedResponse { command }),
        }
    }
}

/// The request/response command bridge to the external engine.
///
/// Implementations execute synchronously on the calling thread; slow
/// commands stay off the UI thread because the GUI invokes them from its
/// worker. Progress for long-running commands arrives out-of-band through
/// the [`ProgressHub`](crate::progress::ProgressHub) the bridge was built
/// with, never through the return value.
pub trait EngineBridge: Send + Sync {
    fn invoke(&self, request: EngineRequest) -> Result<EngineResponse>;
}
