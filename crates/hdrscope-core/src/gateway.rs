use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use tracing::warn;

use crate::command::EngineBridge;
use crate::consts::BRIDGE_POLL_INTERVAL;

/// Resolution point for the engine bridge.
///
/// The host attaches the bridge asynchronously, possibly well after the UI
/// has started, so callers gate their first bridge use on [`ensure_ready`].
/// Once resolved the reference stays valid for the gateway's lifetime; if
/// the engine later disappears, individual calls fail rather than this gate.
///
/// [`ensure_ready`]: Gateway::ensure_ready
#[derive(Default)]
pub struct Gateway {
    slot: RwLock<Option<Arc<dyn EngineBridge>>>,
}

impl Gateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the engine bridge. Called by the host once the engine is up.
    pub fn attach(&self, bridge: Arc<dyn EngineBridge>) {
        *self.slot.write().expect("bridge slot poisoned") = Some(bridge);
    }

    /// The resolved bridge, if one has been attached.
    pub fn bridge(&self) -> Option<Arc<dyn EngineBridge>> {
        self.slot.read().expect("bridge slot poisoned").clone()
    }

    pub fn is_ready(&self) -> bool {
        self.slot.read().expect("bridge slot poisoned").is_some()
    }

    /// Block until the bridge is attached or `timeout` elapses.
    ///
    /// Polls at a short fixed interval; there is no ordering dependency
    /// between UI startup and host injection. Returns `false` on timeout,
    /// after which callers short-circuit their operation with a logged
    /// message instead of failing loudly.
    pub fn ensure_ready(&self, timeout: Duration) -> bool {
        let start = Instant::now();
        loop {
            if self.is_ready() {
                return true;
            }
            if start.elapsed() >= timeout {
                warn!("engine bridge not resolved within {timeout:?}");
                return false;
            }
            std::thread::sleep(BRIDGE_POLL_INTERVAL);
        }
    }
}
