use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, Weak};

/// Operation kinds that report out-of-band progress events.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ProgressKind {
    Open,
    Export,
    Sequence,
    Video,
}

type Listener = Box<dyn Fn(u8) + Send>;

#[derive(Default)]
struct Registry {
    next_id: u64,
    listeners: HashMap<ProgressKind, Vec<(u64, Listener)>>,
}

/// Pub/sub channel for engine progress events.
///
/// Engine implementations emit `(kind, percent)`; controller operations
/// subscribe for the duration of a single call and release through the
/// returned token. Listeners must not call back into the hub.
#[derive(Clone, Default)]
pub struct ProgressHub {
    inner: Arc<Mutex<Registry>>,
}

impl ProgressHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener for `kind`.
    ///
    /// Dropping the token unsubscribes — exactly once per subscription, on
    /// every exit path of the guarded operation.
    pub fn subscribe(
        &self,
        kind: ProgressKind,
        listener: impl Fn(u8) + Send + 'static,
    ) -> ProgressToken {
        let mut registry = self.inner.lock().expect("progress registry poisoned");
        registry.next_id += 1;
        let id = registry.next_id;
        registry
            .listeners
            .entry(kind)
            .or_default()
            .push((id, Box::new(listener)));
        ProgressToken {
            registry: Arc::downgrade(&self.inner),
            kind,
            id,
        }
    }

    /// Deliver a percent (clamped to 100) to all current subscribers of `kind`.
    pub fn emit(&self, kind: ProgressKind, percent: u8) {
        if let Ok(registry) = self.inner.lock() {
            if let Some(listeners) = registry.listeners.get(&kind) {
                for (_, listener) in listeners {
                    listener(percent.min(100));
                }
            }
        }
    }

    /// Live subscription count for `kind`.
    pub fn listener_count(&self, kind: ProgressKind) -> usize {
        self.inner
            .lock()
            .map(|registry| registry.listeners.get(&kind).map_or(0, Vec::len))
            .unwrap_or(0)
    }
}

/// RAII guard for one progress subscription.
pub struct ProgressToken {
    registry: Weak<Mutex<Registry>>,
    kind: ProgressKind,
    id: u64,
}

impl Drop for ProgressToken {
    fn drop(&mut self) {
        if let Some(inner) = self.registry.upgrade() {
            if let Ok(mut registry) = inner.lock() {
                if let Some(listeners) = registry.listeners.get_mut(&self.kind) {
                    listeners.retain(|(id, _)| *id != self.id);
                }
            }
        }
    }
}

/// Cooperative cancellation flag shared between the UI, the controller, and
/// the engine. Cancelling never guarantees an immediate stop; the holder
/// observes the flag at its next safe point.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}
