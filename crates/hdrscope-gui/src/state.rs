use hdrscope_core::command::{ExportVideo, PreviewParams, SequenceFps, TransformPreset};
use hdrscope_core::consts::MAX_PREVIEW_SIZE;
use hdrscope_core::scope::{ScopeStats, WaveformStats};

/// Preset label standing for "no transform" in the transform selector.
pub const NON_TRANSFORM: &str = "NonTransform";

pub const COLORSPACE_NAMES: &[&str] = &["linear:srgb", "acescg:srgb", "aces2065:srgb"];
pub const PROFILE_NAMES: &[&str] = &["422hq", "422", "4444"];
pub const TRANSFER_NAMES: &[&str] = &["g22", "g24", "linear"];
pub const QUALITY_NAMES: &[&str] = &["High", "Fast"];

/// Overall UI state.
#[derive(Default)]
pub struct UiState {
    pub path_input: String,

    /// `None` until the worker's readiness gate settles.
    pub bridge_ready: Option<bool>,

    /// Visible error indicator; cleared by the next successful update.
    pub error: Option<String>,

    pub log_messages: Vec<String>,

    /// Progress of the in-flight open/decode, when one is running.
    pub open_progress: Option<u8>,
    pub seq_progress: Option<u8>,
    pub video_progress: Option<u8>,
    pub seq_running: bool,
    pub video_running: bool,

    /// An export batch is being driven by the worker.
    pub exporting: bool,

    pub transforms: Vec<TransformPreset>,
    pub selected_transform: String,

    pub log_consent: bool,

    pub show_attributes: bool,
    pub show_video: bool,
}

impl UiState {
    pub fn add_log(&mut self, message: impl Into<String>) {
        self.log_messages.push(message.into());
    }

    pub fn preset(&self, label: &str) -> Option<&TransformPreset> {
        self.transforms.iter().find(|preset| preset.label == label)
    }
}

/// Viewport display state.
pub struct ViewportState {
    pub texture: Option<egui::TextureHandle>,
    /// Preview raster size (texture size before zoom).
    pub image_size: Option<[usize; 2]>,
    pub zoom: f32,
    pub pan_offset: egui::Vec2,

    /// Pixel probe readout line.
    pub readout: String,
    /// Probe frozen by a click; a second click releases it.
    pub pipette_fixed: bool,
    /// Last probed preview pixel, to avoid re-probing the same position.
    pub last_probe: Option<(u32, u32)>,
}

impl Default for ViewportState {
    fn default() -> Self {
        Self {
            texture: None,
            image_size: None,
            zoom: 1.0,
            pan_offset: egui::Vec2::ZERO,
            readout: String::new(),
            pipette_fixed: false,
            last_probe: None,
        }
    }
}

/// Last received scope statistics, replaced wholesale on every update.
#[derive(Default)]
pub struct ScopePanelState {
    pub stats: Option<ScopeStats>,
    pub waveform: Option<WaveformStats>,
}

/// Preview parameters as editable UI fields.
pub struct ParamsState {
    pub exposure: f32,
    pub gamma: f32,
    pub high_quality: bool,
}

impl Default for ParamsState {
    fn default() -> Self {
        Self {
            exposure: 0.0,
            gamma: 1.0,
            high_quality: true,
        }
    }
}

impl ParamsState {
    pub fn to_preview_params(&self) -> PreviewParams {
        PreviewParams {
            max_size: MAX_PREVIEW_SIZE,
            exposure: self.exposure,
            gamma: self.gamma,
            lut_path: None,
            high_quality: self.high_quality,
        }
    }
}

/// Video tab fields: sequence FPS rewrite and ProRes export.
pub struct VideoState {
    pub seq_dir: String,
    pub seq_fps: f32,
    pub seq_attr: String,
    pub seq_recursive: bool,
    pub seq_dry_run: bool,

    pub prores_fps: f32,
    pub prores_colorspace_index: usize,
    pub prores_profile_index: usize,
    pub prores_max_size: u32,
    pub prores_transfer_index: usize,
    pub prores_quality_index: usize,
    pub prores_out: String,
}

impl Default for VideoState {
    fn default() -> Self {
        Self {
            seq_dir: String::new(),
            seq_fps: 24.0,
            seq_attr: "FramesPerSecond".to_owned(),
            seq_recursive: false,
            seq_dry_run: false,
            prores_fps: 24.0,
            prores_colorspace_index: 0,
            prores_profile_index: 0,
            prores_max_size: 2048,
            prores_transfer_index: 0,
            prores_quality_index: 0,
            prores_out: String::new(),
        }
    }
}

impl VideoState {
    pub fn sequence_request(&self) -> SequenceFps {
        SequenceFps {
            dir: self.seq_dir.trim().into(),
            fps: self.seq_fps,
            attr: self.seq_attr.clone(),
            recursive: self.seq_recursive,
            dry_run: self.seq_dry_run,
            backup: true,
        }
    }

    pub fn video_request(&self) -> ExportVideo {
        // The transfer selector maps to the encode gamma
        let gamma = match TRANSFER_NAMES[self.prores_transfer_index] {
            "g24" => 2.4,
            "linear" => 1.0,
            _ => 2.2,
        };
        ExportVideo {
            dir: self.seq_dir.trim().into(),
            out: self.prores_out.trim().into(),
            fps: self.prores_fps,
            colorspace: COLORSPACE_NAMES[self.prores_colorspace_index].to_owned(),
            profile: PROFILE_NAMES[self.prores_profile_index].to_owned(),
            max_size: self.prores_max_size,
            exposure: 0.0,
            gamma,
            quality: QUALITY_NAMES[self.prores_quality_index].to_owned(),
        }
    }
}
