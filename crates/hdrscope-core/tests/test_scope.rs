mod common;

use approx::assert_relative_eq;
use hdrscope_core::scope::{
    cell_alpha, histogram_heights, waveform_cells, Channel, ChannelFilter, RawWaveform,
    ScopeStats, WaveformStats,
};

use common::{stats_with_peaks, waveform_filled};

// ---------------------------------------------------------------------------
// Histogram normalization
// ---------------------------------------------------------------------------

#[test]
fn test_peak_bin_reaches_full_height_at_scale_one() {
    // open "A.exr" → hist_r max bin 500 at index 128
    let stats = stats_with_peaks((128, 500), (64, 250), (32, 125));
    let max = stats.max_bin(ChannelFilter::R);
    assert_eq!(max, 500);

    let heights = histogram_heights(stats.histogram(Channel::R), max, 1.0);
    assert_relative_eq!(heights[128], 1.0);
    assert_relative_eq!(heights[0], 0.0);
}

#[test]
fn test_scale_two_clamps_at_canvas_height() {
    let stats = stats_with_peaks((128, 500), (64, 250), (32, 125));
    let max = stats.max_bin(ChannelFilter::R);
    let heights = histogram_heights(stats.histogram(Channel::R), max, 2.0);
    assert_relative_eq!(heights[128], 1.0, epsilon = 1e-6);
}

#[test]
fn test_scale_is_linear_below_clamp() {
    let mut hist = vec![0u32; 256];
    hist[10] = 100;
    hist[20] = 400;
    let base = histogram_heights(&hist, 1000, 1.0);
    let scaled = histogram_heights(&hist, 1000, 3.0);
    assert_relative_eq!(scaled[10], base[10] * 3.0);
    assert_relative_eq!(scaled[20], base[20] * 3.0);
}

#[test]
fn test_max_bin_spans_rendered_channels() {
    let stats = stats_with_peaks((128, 500), (64, 250), (32, 125));
    // RGB overlay normalizes against the largest bin across all three
    assert_eq!(stats.max_bin(ChannelFilter::Rgb), 500);
    // A single-channel filter only observes its own channel
    assert_eq!(stats.max_bin(ChannelFilter::B), 125);
}

#[test]
fn test_empty_histogram_draws_nothing() {
    let heights = histogram_heights(&[0; 256], 0, 1.0);
    assert!(heights.iter().all(|&h| h == 0.0));
}

#[test]
fn test_malformed_stats_not_drawable() {
    let stats = ScopeStats {
        hist_r: vec![1; 256],
        hist_g: vec![1; 17],
        hist_b: Vec::new(),
    };
    assert!(stats.is_drawable(Channel::R));
    assert!(!stats.is_drawable(Channel::G));
    assert!(!stats.is_drawable(Channel::B));
}

// ---------------------------------------------------------------------------
// Waveform cells
// ---------------------------------------------------------------------------

#[test]
fn test_cell_alpha_monotonic_and_saturating() {
    let scale = 1.0;
    let mut last = 0.0f32;
    for count in 0..40 {
        let alpha = cell_alpha(count, scale);
        assert!(alpha >= last, "opacity must not decrease with count");
        last = alpha;
    }
    // Saturates at counts >= 10 / scale
    assert_relative_eq!(cell_alpha(10, 1.0), 1.0);
    assert_relative_eq!(cell_alpha(1000, 1.0), 1.0);
    assert_relative_eq!(cell_alpha(5, 2.0), 1.0);
    assert_relative_eq!(cell_alpha(2, 1.0), 0.2);
}

#[test]
fn test_waveform_rows_flip_vertically() {
    // One count at bin (x=1, y=0) → painted on the bottom row
    let mut raw = waveform_filled(3, 4, 0);
    raw.r[4] = 9; // index x * y_bins + y with x=1, y=0
    let waveform = WaveformStats::try_from(raw).expect("valid shape");

    let cells = waveform_cells(&waveform, Channel::R, 1.0);
    assert_eq!(cells.len(), 1);
    assert_eq!(cells[0].x, 1);
    assert_eq!(cells[0].row, 3, "bin y=0 is the visual bottom");
    assert_relative_eq!(cells[0].alpha, 0.9);
}

#[test]
fn test_zero_count_bins_produce_no_cells() {
    let waveform = WaveformStats::try_from(waveform_filled(4, 4, 0)).expect("valid shape");
    assert!(waveform_cells(&waveform, Channel::G, 1.0).is_empty());
}

#[test]
fn test_waveform_shape_mismatch_rejected() {
    let raw = RawWaveform {
        x_bins: 4,
        y_bins: 4,
        r: vec![0; 16],
        g: vec![0; 15], // short by one
        b: vec![0; 16],
    };
    assert!(WaveformStats::try_from(raw).is_err());
}

// ---------------------------------------------------------------------------
// Wire shapes
// ---------------------------------------------------------------------------

#[test]
fn test_stats_wire_shape() {
    let json = r#"{"hist_r": [1, 2], "hist_g": [3, 4], "hist_b": [5, 6]}"#;
    let stats: ScopeStats = serde_json::from_str(json).expect("stats decode");
    assert_eq!(stats.hist_g, vec![3, 4]);
}

#[test]
fn test_waveform_wire_shape() {
    let json = r#"{"x_bins": 2, "y_bins": 1, "r": [1, 2], "g": [0, 0], "b": [0, 0]}"#;
    let raw: RawWaveform = serde_json::from_str(json).expect("waveform decode");
    let waveform = WaveformStats::try_from(raw).expect("valid shape");
    assert_eq!(waveform.count(Channel::R, 1, 0), 2);
}

// ---------------------------------------------------------------------------
// Filters
// ---------------------------------------------------------------------------

#[test]
fn test_filter_channel_sets() {
    assert_eq!(
        ChannelFilter::Rgb.channels(),
        &[Channel::R, Channel::G, Channel::B]
    );
    assert_eq!(ChannelFilter::G.channels(), &[Channel::G]);
}
