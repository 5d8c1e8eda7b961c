use std::time::Duration;

/// Largest edge of a generated preview, in pixels.
pub const MAX_PREVIEW_SIZE: u32 = 2048;

/// Histogram bins per channel.
pub const STATS_BINS: usize = 256;

/// Quiet period for coalescing preview parameter changes into one engine call.
pub const UPDATE_DEBOUNCE: Duration = Duration::from_millis(120);

/// Interval between engine-bridge readiness polls.
pub const BRIDGE_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Default deadline for resolving the engine bridge.
pub const BRIDGE_TIMEOUT: Duration = Duration::from_secs(5);

/// Bin count at which a waveform cell reaches full opacity at scale 1.
pub const WAVEFORM_SATURATION: f32 = 10.0;
