/// Monotonic stamping for overlapping preview requests.
///
/// Engine responses can settle out of dispatch order; only a response
/// carrying the most recently issued stamp may update preview state, so a
/// stale in-flight frame can never overwrite a newer one.
#[derive(Clone, Copy, Debug, Default)]
pub struct RequestSequencer {
    latest: u64,
}

impl RequestSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stamp a new dispatch; invalidates all earlier stamps.
    pub fn begin(&mut self) -> u64 {
        self.latest += 1;
        self.latest
    }

    /// Whether a response with `stamp` is still authoritative.
    pub fn is_current(&self, stamp: u64) -> bool {
        stamp == self.latest
    }
}
