// Copyright 2026 Daniel Pelikan
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Listener registry for platform events.
//!
//! Every registration returns a [`Subscription`] token. Disposing the token
//! (explicitly or by dropping it) removes the listener before the next
//! publish, so a step that has been deselected never sees another callback.

use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, trace};

use super::capability::{EventKind, PlatformEvent};

type Listener = Box<dyn FnMut(&PlatformEvent) + Send>;

struct Entry {
    kind: EventKind,
    listener: Arc<Mutex<Listener>>,
}

#[derive(Default)]
struct HubInner {
    next_id: AtomicU64,
    listeners: Mutex<BTreeMap<u64, Entry>>,
}

impl HubInner {
    fn remove(&self, id: u64) -> bool {
        self.listeners.lock().remove(&id).is_some()
    }
}

/// Registry of platform event listeners.
#[derive(Clone, Default)]
pub struct PlatformHub {
    inner: Arc<HubInner>,
}

impl PlatformHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener for one kind of event.
    pub fn subscribe<F>(&self, kind: EventKind, listener: F) -> Subscription
    where
        F: FnMut(&PlatformEvent) + Send + 'static,
    {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        self.inner.listeners.lock().insert(
            id,
            Entry {
                kind,
                listener: Arc::new(Mutex::new(Box::new(listener))),
            },
        );
        debug!("Subscription {} registered for {:?}", id, kind);

        Subscription {
            id,
            hub: self.inner.clone(),
            disposed: false,
        }
    }

    /// Deliver an event to every live listener of its kind, in registration
    /// order. Returns the number of listeners invoked.
    pub fn publish(&self, event: &PlatformEvent) -> usize {
        let kind = event.kind();
        let targets: Vec<(u64, Arc<Mutex<Listener>>)> = self
            .inner
            .listeners
            .lock()
            .iter()
            .filter(|(_, entry)| entry.kind == kind)
            .map(|(id, entry)| (*id, entry.listener.clone()))
            .collect();

        let mut delivered = 0;
        for (id, listener) in targets {
            // A listener earlier in this round may have disposed a later one.
            if !self.inner.listeners.lock().contains_key(&id) {
                continue;
            }
            let mut listener = listener.lock();
            (*listener)(event);
            delivered += 1;
        }

        trace!("Published {:?} to {} listener(s)", event, delivered);
        delivered
    }

    /// Number of live listeners.
    pub fn listener_count(&self) -> usize {
        self.inner.listeners.lock().len()
    }
}

/// Registration token for a hub listener.
#[must_use = "dropping a subscription unregisters its listener"]
pub struct Subscription {
    id: u64,
    hub: Arc<HubInner>,
    disposed: bool,
}

impl Subscription {
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Unregister the listener now.
    pub fn dispose(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if !self.disposed {
            self.disposed = true;
            if self.hub.remove(self.id) {
                debug!("Subscription {} disposed", self.id);
            }
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::Radio;
    use std::sync::atomic::AtomicUsize;

    fn bluetooth(enabled: bool) -> PlatformEvent {
        PlatformEvent::RadioChanged {
            radio: Radio::Bluetooth,
            enabled,
        }
    }

    #[test]
    fn test_publish_reaches_matching_kind_only() {
        let hub = PlatformHub::new();
        let hits = Arc::new(AtomicUsize::new(0));

        let h = hits.clone();
        let _bt = hub.subscribe(EventKind::Radio(Radio::Bluetooth), move |_| {
            h.fetch_add(1, Ordering::SeqCst);
        });
        let h = hits.clone();
        let _wifi = hub.subscribe(EventKind::Radio(Radio::Wifi), move |_| {
            h.fetch_add(100, Ordering::SeqCst);
        });

        assert_eq!(hub.publish(&bluetooth(true)), 1);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_dispose_stops_delivery() {
        let hub = PlatformHub::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let h = hits.clone();
        let sub = hub.subscribe(EventKind::Radio(Radio::Bluetooth), move |_| {
            h.fetch_add(1, Ordering::SeqCst);
        });

        hub.publish(&bluetooth(true));
        sub.dispose();
        hub.publish(&bluetooth(false));

        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(hub.listener_count(), 0);
    }

    #[test]
    fn test_drop_unregisters() {
        let hub = PlatformHub::new();
        {
            let _sub = hub.subscribe(EventKind::Radio(Radio::Wifi), |_| {});
            assert_eq!(hub.listener_count(), 1);
        }
        assert_eq!(hub.listener_count(), 0);
        assert_eq!(hub.publish(&bluetooth(true)), 0);
    }

    #[test]
    fn test_listener_disposed_mid_publish_is_skipped() {
        let hub = PlatformHub::new();
        let slot: Arc<Mutex<Option<Subscription>>> = Arc::new(Mutex::new(None));
        let hits = Arc::new(AtomicUsize::new(0));

        let s = slot.clone();
        let _first = hub.subscribe(EventKind::Radio(Radio::Bluetooth), move |_| {
            if let Some(sub) = s.lock().take() {
                sub.dispose();
            }
        });
        let h = hits.clone();
        let second = hub.subscribe(EventKind::Radio(Radio::Bluetooth), move |_| {
            h.fetch_add(1, Ordering::SeqCst);
        });
        *slot.lock() = Some(second);

        assert_eq!(hub.publish(&bluetooth(true)), 1);
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }
}
