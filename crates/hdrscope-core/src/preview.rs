use crate::raster::{ChannelMode, Raster};

/// Dual-buffer preview state for one open document.
///
/// `previous` always holds the raster displaced by the most recent
/// successful decode (a ring of depth two), which is what A/B compare shows.
/// Buffers are replaced wholesale, never mutated, so a render always paints
/// a fully-received frame.
#[derive(Debug, Default)]
pub struct PreviewState {
    current: Option<Raster>,
    previous: Option<Raster>,
    channel_mode: ChannelMode,
    compare_active: bool,
}

impl PreviewState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a newly decoded raster, rotating the old current frame into
    /// `previous` and leaving compare mode.
    pub fn commit(&mut self, raster: Raster) {
        self.previous = self.current.take();
        self.current = Some(raster);
        self.compare_active = false;
    }

    /// Presentation-only change; no engine round-trip.
    pub fn set_channel_mode(&mut self, mode: ChannelMode) {
        self.channel_mode = mode;
    }

    pub fn channel_mode(&self) -> ChannelMode {
        self.channel_mode
    }

    /// Flip A/B compare. No-op while no previous frame exists.
    pub fn toggle_compare(&mut self) {
        if self.previous.is_some() {
            self.compare_active = !self.compare_active;
        }
    }

    pub fn compare_active(&self) -> bool {
        self.compare_active
    }

    pub fn has_previous(&self) -> bool {
        self.previous.is_some()
    }

    pub fn current(&self) -> Option<&Raster> {
        self.current.as_ref()
    }

    pub fn previous(&self) -> Option<&Raster> {
        self.previous.as_ref()
    }

    /// The raster a render paints: previous while comparing, else current.
    pub fn displayed(&self) -> Option<&Raster> {
        if self.compare_active {
            self.previous.as_ref()
        } else {
            self.current.as_ref()
        }
    }

    /// Status line encoding resolution, channel mode, and A/B state.
    pub fn status_line(&self) -> String {
        match self.displayed() {
            Some(raster) => {
                let mut line = format!(
                    "preview: {}x{} [{}]",
                    raster.width,
                    raster.height,
                    self.channel_mode.label()
                );
                if self.compare_active {
                    line.push_str(" (A/B: previous)");
                }
                line
            }
            None => "no image".to_owned(),
        }
    }

    /// Drop both buffers (document closed).
    pub fn clear(&mut self) {
        self.current = None;
        self.previous = None;
        self.compare_active = false;
    }
}
