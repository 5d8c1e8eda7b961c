use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::consts::{STATS_BINS, WAVEFORM_SATURATION};
use crate::error::{HdrscopeError, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Channel {
    R,
    G,
    B,
}

/// Scope channel filter; `Rgb` overlays all three channels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChannelFilter {
    #[default]
    Rgb,
    R,
    G,
    B,
}

impl ChannelFilter {
    /// Channels rendered under this filter, in draw order.
    pub fn channels(&self) -> &'static [Channel] {
        match self {
            ChannelFilter::Rgb => &[Channel::R, Channel::G, Channel::B],
            ChannelFilter::R => &[Channel::R],
            ChannelFilter::G => &[Channel::G],
            ChannelFilter::B => &[Channel::B],
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ChannelFilter::Rgb => "RGB",
            ChannelFilter::R => "R",
            ChannelFilter::G => "G",
            ChannelFilter::B => "B",
        }
    }
}

/// Presentation state for both scopes. Changing it re-renders from cached
/// statistics without an engine round-trip.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScopeViewConfig {
    pub channel_filter: ChannelFilter,
    pub scale: f32,
}

impl Default for ScopeViewConfig {
    fn default() -> Self {
        Self {
            channel_filter: ChannelFilter::Rgb,
            scale: 1.0,
        }
    }
}

/// Per-channel histograms as the engine reports them: 256 bins each.
/// Immutable once received; superseded wholesale by the next update.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct ScopeStats {
    pub hist_r: Vec<u32>,
    pub hist_g: Vec<u32>,
    pub hist_b: Vec<u32>,
}

impl ScopeStats {
    pub fn histogram(&self, channel: Channel) -> &[u32] {
        match channel {
            Channel::R => &self.hist_r,
            Channel::G => &self.hist_g,
            Channel::B => &self.hist_b,
        }
    }

    /// A histogram is drawable when it carries the expected bin count.
    pub fn is_drawable(&self, channel: Channel) -> bool {
        self.histogram(channel).len() == STATS_BINS
    }

    /// Largest bin across the channels the filter renders. Recomputed per
    /// draw — the filter or scale can change without new stats arriving.
    pub fn max_bin(&self, filter: ChannelFilter) -> u32 {
        filter
            .channels()
            .iter()
            .flat_map(|&channel| self.histogram(channel).iter().copied())
            .max()
            .unwrap_or(0)
    }
}

/// Normalized histogram bar heights for one channel, as fractions of the
/// canvas height: `bin / max_bin * scale`, clamped to 1.
pub fn histogram_heights(hist: &[u32], max_bin: u32, scale: f32) -> Vec<f32> {
    if max_bin == 0 {
        return vec![0.0; hist.len()];
    }
    hist.iter()
        .map(|&count| ((count as f32 / max_bin as f32) * scale).clamp(0.0, 1.0))
        .collect()
}

/// Wire shape of `image_waveform`: flat per-channel count arrays with index
/// `x * y_bins + y`, where bin y=0 is the visual bottom.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct RawWaveform {
    pub x_bins: usize,
    pub y_bins: usize,
    pub r: Vec<u32>,
    pub g: Vec<u32>,
    pub b: Vec<u32>,
}

/// Validated waveform statistics with bins laid out as `(x, y)` grids.
#[derive(Clone, Debug, PartialEq)]
pub struct WaveformStats {
    pub x_bins: usize,
    pub y_bins: usize,
    r: Array2<u32>,
    g: Array2<u32>,
    b: Array2<u32>,
}

impl TryFrom<RawWaveform> for WaveformStats {
    type Error = HdrscopeError;

    fn try_from(raw: RawWaveform) -> Result<Self> {
        let shape = (raw.x_bins, raw.y_bins);
        let to_grid = |counts: Vec<u32>, channel: &str| {
            Array2::from_shape_vec(shape, counts).map_err(|_| {
                HdrscopeError::InvalidStats(format!(
                    "waveform channel {channel}: expected {} counts",
                    raw.x_bins * raw.y_bins
                ))
            })
        };
        Ok(Self {
            x_bins: raw.x_bins,
            y_bins: raw.y_bins,
            r: to_grid(raw.r, "r")?,
            g: to_grid(raw.g, "g")?,
            b: to_grid(raw.b, "b")?,
        })
    }
}

impl WaveformStats {
    pub fn count(&self, channel: Channel, x: usize, y: usize) -> u32 {
        self.grid(channel)[[x, y]]
    }

    pub fn grid(&self, channel: Channel) -> &Array2<u32> {
        match channel {
            Channel::R => &self.r,
            Channel::G => &self.g,
            Channel::B => &self.b,
        }
    }
}

/// One paintable waveform cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WaveformCell {
    /// Column index.
    pub x: usize,
    /// Row from the top of the canvas; bin y=0 maps to the bottom row.
    pub row: usize,
    pub alpha: f32,
}

/// Cell opacity: `min(1, count * scale / 10)`. Monotonic in the count and
/// saturating, so sparse bins stay visible while dense bins cannot exceed
/// full opacity.
pub fn cell_alpha(count: u32, scale: f32) -> f32 {
    (count as f32 * scale / WAVEFORM_SATURATION).min(1.0)
}

/// Cells to paint for one channel, vertically flipped into screen rows.
/// Zero-count bins produce no cell.
pub fn waveform_cells(waveform: &WaveformStats, channel: Channel, scale: f32) -> Vec<WaveformCell> {
    let mut cells = Vec::new();
    for x in 0..waveform.x_bins {
        for y in 0..waveform.y_bins {
            let count = waveform.count(channel, x, y);
            if count > 0 {
                cells.push(WaveformCell {
                    x,
                    row: waveform.y_bins - 1 - y,
                    alpha: cell_alpha(count, scale),
                });
            }
        }
    }
    cells
}
