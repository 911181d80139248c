use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use hidayah_types::HidayahError;
use tracing::{debug, trace};

use super::{HeadingCallback, RawHeading, SubscriptionId};

/// Listener table shared by the platform heading sources.
///
/// The platform pushes samples with [`publish`](Self::publish); the registry
/// fans them out to every live listener, sequentially and under one lock, so
/// listeners never observe two samples concurrently. Samples arriving sooner
/// than the update interval after the last delivered one are dropped.
///
/// Callbacks run while the registry is locked and must not call back into it.
pub struct ListenerRegistry {
    available: bool,
    state: Mutex<RegistryState>,
}

struct RegistryState {
    next_id: u64,
    interval: Duration,
    last_delivery: Option<Instant>,
    listeners: Vec<(SubscriptionId, HeadingCallback)>,
}

impl ListenerRegistry {
    pub fn new(interval: Duration) -> Self {
        Self {
            available: true,
            state: Mutex::new(RegistryState {
                next_id: 1,
                interval,
                last_delivery: None,
                listeners: Vec::new(),
            }),
        }
    }

    /// A registry for hardware that does not exist. Every subscribe fails.
    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::new(Duration::ZERO)
        }
    }

    pub fn is_available(&self) -> bool {
        self.available
    }

    fn lock(&self) -> MutexGuard<'_, RegistryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn subscribe(&self, callback: HeadingCallback) -> Result<SubscriptionId, HidayahError> {
        if !self.is_available() {
            return Err(HidayahError::SensorUnavailable(
                "no compass capability on this device".to_string(),
            ));
        }
        let mut state = self.lock();
        let id = SubscriptionId(state.next_id);
        state.next_id += 1;
        state.listeners.push((id, callback));
        debug!(id = id.0, listeners = state.listeners.len(), "heading listener added");
        Ok(id)
    }

    /// Removes a listener. Unknown or already-removed ids are ignored.
    pub fn unsubscribe(&self, id: SubscriptionId) {
        let mut state = self.lock();
        let before = state.listeners.len();
        state.listeners.retain(|(sid, _)| *sid != id);
        if state.listeners.len() != before {
            debug!(id = id.0, listeners = state.listeners.len(), "heading listener removed");
        }
        if state.listeners.is_empty() {
            state.last_delivery = None;
        }
    }

    pub fn set_interval(&self, interval: Duration) {
        self.lock().interval = interval;
    }

    pub fn interval(&self) -> Duration {
        self.lock().interval
    }

    pub fn listener_count(&self) -> usize {
        self.lock().listeners.len()
    }

    /// Delivers `sample` to every listener, subject to the interval.
    /// Returns how many listeners received it.
    pub fn publish(&self, sample: RawHeading) -> usize {
        self.publish_at(sample, Instant::now())
    }

    /// [`publish`](Self::publish) with an explicit clock reading.
    pub fn publish_at(&self, sample: RawHeading, now: Instant) -> usize {
        let mut state = self.lock();
        if state.listeners.is_empty() {
            return 0;
        }
        if let Some(last) = state.last_delivery {
            if now.saturating_duration_since(last) < state.interval {
                trace!(?sample, "heading sample throttled");
                return 0;
            }
        }
        state.last_delivery = Some(now);
        for (_, callback) in state.listeners.iter_mut() {
            callback(sample);
        }
        state.listeners.len()
    }
}

impl std::fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.lock();
        f.debug_struct("ListenerRegistry")
            .field("available", &self.available)
            .field("interval", &state.interval)
            .field("listeners", &state.listeners.len())
            .finish()
    }
}
